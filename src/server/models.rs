use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct DetectRequest {
    #[serde(rename = "imagem_base64")]
    pub(crate) image_base64: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}
