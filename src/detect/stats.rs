use serde::Serialize;

use super::BBoxPx;

const CONFIDENCE_BASELINE: f64 = 20.0;
const CONFIDENCE_MAX: f64 = 100.0;

/// Aggregate figures over the qualifying regions of one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStats {
    #[serde(rename = "areas_texto")]
    pub regions: usize,
    /// Summed box area over image area, in percent, two decimals.
    /// Overlapping boxes are summed as-is, so this can exceed 100.
    #[serde(rename = "densidade_texto")]
    pub density_percent: f64,
    #[serde(rename = "confianca")]
    pub confidence: u8,
    #[serde(rename = "area_total_px2")]
    pub total_area_px: u64,
}

pub(super) fn summarize(boxes: &[BBoxPx], width: u32, height: u32) -> TextStats {
    let total_area_px = width as u64 * height as u64;
    let covered = boxes.iter().map(BBoxPx::area).sum::<u64>();
    let fraction = if total_area_px > 0 {
        covered as f64 / total_area_px as f64
    } else {
        0.0
    };
    TextStats {
        regions: boxes.len(),
        density_percent: round_to_hundredths(fraction * 100.0),
        confidence: confidence_from(fraction),
        total_area_px,
    }
}

// Uses the unrounded fraction.
fn confidence_from(fraction: f64) -> u8 {
    (fraction * 100.0 + CONFIDENCE_BASELINE)
        .floor()
        .clamp(0.0, CONFIDENCE_MAX) as u8
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
