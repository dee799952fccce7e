use anyhow::{Context, Result};
use axum::http::HeaderValue;

use crate::Detector;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct ServerState {
    pub(crate) settings: Settings,
    pub(crate) detector: Detector,
    pub(crate) allow_origin: HeaderValue,
}

impl ServerState {
    pub fn new(settings: Settings) -> Result<Self> {
        let detector = Detector::from_settings(&settings)?;
        let allow_origin = HeaderValue::from_str(&settings.allow_origin)
            .with_context(|| format!("invalid server.allow_origin: {}", settings.allow_origin))?;
        Ok(Self {
            settings,
            detector,
            allow_origin,
        })
    }
}
