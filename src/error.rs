use thiserror::Error;

/// Coarse classification used at the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something that is not a decodable image.
    Decode,
    /// The annotated raster could not be re-encoded.
    Encode,
    /// Thresholding or contour extraction failed on a valid raster.
    Processing,
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("image payload is empty")]
    EmptyPayload,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("failed to decode image: {0}")]
    UndecodableImage(#[source] image::ImageError),

    #[error("decoded image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("cannot encode an empty raster ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("text region processing failed: {0}")]
    Processing(String),
}

impl DetectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DetectError::EmptyPayload
            | DetectError::InvalidBase64(_)
            | DetectError::UndecodableImage(_)
            | DetectError::EmptyImage { .. } => ErrorKind::Decode,
            DetectError::EmptyRaster { .. } | DetectError::Encode(_) => ErrorKind::Encode,
            DetectError::Processing(_) => ErrorKind::Processing,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }

    pub(crate) fn processing(message: impl Into<String>) -> Self {
        DetectError::Processing(message.into())
    }
}

pub type Result<T, E = DetectError> = std::result::Result<T, E>;
