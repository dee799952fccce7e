use image::RgbImage;
use serde::Serialize;

use crate::codec;
use crate::detect::{self, Analysis, DetectionParams, TextStats};
use crate::error::Result;
use crate::settings::Settings;

/// Result of the full decode -> analyze -> encode pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    #[serde(rename = "imagem_processada_base64")]
    pub image_base64: String,
    #[serde(flatten)]
    pub stats: TextStats,
    #[serde(skip)]
    pub width: u32,
    #[serde(skip)]
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct Detector {
    params: DetectionParams,
    jpeg_quality: u8,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(DetectionParams::default(), codec::DEFAULT_JPEG_QUALITY)
    }
}

impl Detector {
    pub fn new(params: DetectionParams, jpeg_quality: u8) -> Self {
        Self {
            params,
            jpeg_quality,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(settings.detection_params()?, settings.jpeg_quality))
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn analyze(&self, raster: &RgbImage) -> Result<Analysis> {
        detect::analyze(raster, &self.params)
    }

    /// Base64 payload in, annotated JPEG (base64) and statistics out.
    pub fn detect_base64(&self, payload: &str) -> Result<DetectionReport> {
        let raster = codec::decode_base64_image(payload)?;
        self.report(&raster)
    }

    pub fn detect_bytes(&self, bytes: &[u8]) -> Result<DetectionReport> {
        let raster = codec::decode_image_bytes(bytes)?;
        self.report(&raster)
    }

    fn report(&self, raster: &RgbImage) -> Result<DetectionReport> {
        let analysis = self.analyze(raster)?;
        let image_base64 = codec::encode_base64_jpeg(&analysis.annotated, self.jpeg_quality)?;
        Ok(DetectionReport {
            image_base64,
            stats: analysis.stats,
            width: raster.width(),
            height: raster.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectError;
    use crate::test_util::{blank_raster, fill_dark_rect, png_base64};

    #[test]
    fn blank_image_report() {
        let report = Detector::default()
            .detect_base64(&png_base64(&blank_raster(64, 48)))
            .expect("detect");
        assert_eq!(report.stats.regions, 0);
        assert_eq!(report.stats.density_percent, 0.0);
        assert_eq!(report.stats.confidence, 20);
        assert_eq!(report.stats.total_area_px, 64 * 48);
        let annotated = codec::decode_base64_image(&report.image_base64).expect("decode output");
        assert_eq!(annotated.dimensions(), (64, 48));
    }

    #[test]
    fn report_serializes_with_wire_names() {
        let mut raster = blank_raster(200, 100);
        fill_dark_rect(&mut raster, 40, 30, 100, 30);
        let report = Detector::default()
            .detect_base64(&png_base64(&raster))
            .expect("detect");

        let value = serde_json::to_value(&report).expect("serialize");
        assert!(value["imagem_processada_base64"].is_string());
        assert_eq!(value["areas_texto"], 1);
        assert_eq!(value["densidade_texto"], 15.0);
        assert_eq!(value["confianca"], 35);
        assert_eq!(value["area_total_px2"], 20000);
        assert!(value.get("width").is_none());
    }

    #[test]
    fn undecodable_payload_surfaces_decode_error() {
        let err = Detector::default()
            .detect_base64("not-base64!!")
            .expect_err("must fail");
        assert!(matches!(err, DetectError::InvalidBase64(_)));
    }
}
