use axum::http::StatusCode;

use crate::DetectionReport;
use crate::error::DetectError;

use super::models::DetectRequest;
use super::state::ServerState;

#[derive(Debug)]
pub(crate) struct ServerError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl ServerError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<DetectError> for ServerError {
    fn from(err: DetectError) -> Self {
        if err.is_client_error() {
            tracing::warn!(error = %err, "rejected image payload");
            ServerError {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            }
        } else {
            tracing::error!(error = %err, kind = ?err.kind(), "text detection failed");
            ServerError::internal(err.to_string())
        }
    }
}

pub(crate) fn detect_request(
    state: &ServerState,
    request: DetectRequest,
) -> Result<DetectionReport, ServerError> {
    let report = state.detector.detect_base64(&request.image_base64)?;
    tracing::info!(
        width = report.width,
        height = report.height,
        regions = report.stats.regions,
        density = report.stats.density_percent,
        confidence = report.stats.confidence,
        "detected text regions"
    );
    Ok(report)
}
