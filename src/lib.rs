pub mod codec;
pub mod detect;
mod detector;
pub mod error;
pub mod logging;
pub mod server;
pub mod settings;
#[cfg(test)]
mod test_util;

pub use detect::{
    Analysis, AnnotationStyle, BBoxPx, DetectionParams, TextStats, ThresholdMethod,
    ThresholdParams, analyze,
};
pub use detector::{DetectionReport, Detector};
pub use error::{DetectError, ErrorKind};
