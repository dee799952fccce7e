use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::DetectionReport;
use crate::error::DetectError;
use crate::settings;

use super::detect::{ServerError, detect_request};
use super::models::{DetectRequest, ErrorResponse};
use super::shutdown::shutdown_signal;
use super::state::ServerState;

pub async fn run_server(settings: settings::Settings, addr: String) -> Result<()> {
    let state = Arc::new(ServerState::new(settings)?);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind server address: {}", addr))?;
    tracing::info!(addr = %addr, "listening for text detection requests");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "server terminated with an error")?;
    tracing::info!("server shut down");
    Ok(())
}

pub fn router(state: Arc<ServerState>) -> Router {
    let body_limit = state.settings.max_body_bytes;
    Router::new()
        .route("/health", get(health))
        .route("/detectar-texto/", post(detect_text))
        .route("/detectar-texto", post(detect_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state.clone())
        .layer(axum::middleware::from_fn_with_state(state, cors_middleware))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn cors_middleware(
    State(state): State<Arc<ServerState>>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut(), &state.allow_origin);
        return response;
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut(), &state.allow_origin);
    response
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: &HeaderValue) {
    headers.insert("access-control-allow-origin", origin.clone());
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type,authorization"),
    );
}

async fn detect_text(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<DetectRequest>,
) -> Result<Json<DetectionReport>, (StatusCode, Json<ErrorResponse>)> {
    let result = tokio::task::spawn_blocking(move || detect_request(state.as_ref(), payload))
        .await
        .unwrap_or_else(|err| {
            Err(ServerError::from(DetectError::Processing(format!(
                "detection task failed: {}",
                err
            ))))
        });

    match result {
        Ok(report) => Ok(Json(report)),
        Err(err) => Err((err.status, Json(ErrorResponse { error: err.message }))),
    }
}
