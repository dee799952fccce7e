mod annotate;
mod contours;
mod geom;
mod preprocess;
mod stats;
mod threshold;

use image::RgbImage;
use serde::Serialize;

use crate::error::Result;

pub use annotate::AnnotationStyle;
pub use stats::TextStats;
pub use threshold::{ThresholdMethod, ThresholdParams};

/// Axis-aligned box in pixel coordinates; `w` and `h` count pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BBoxPx {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BBoxPx {
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionParams {
    pub threshold: ThresholdParams,
    /// A region qualifies only when strictly wider than this.
    pub min_width: u32,
    /// A region qualifies only when strictly taller than this.
    pub min_height: u32,
    pub annotation: AnnotationStyle,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            threshold: ThresholdParams::default(),
            min_width: 50,
            min_height: 15,
            annotation: AnnotationStyle::default(),
        }
    }
}

impl DetectionParams {
    fn qualifies(&self, bbox: &BBoxPx) -> bool {
        bbox.w > self.min_width && bbox.h > self.min_height
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    /// Copy of the input with qualifying regions outlined.
    pub annotated: RgbImage,
    pub boxes: Vec<BBoxPx>,
    pub stats: TextStats,
}

/// Finds text-like regions in `raster` and outlines them on a copy.
///
/// grayscale -> inverted adaptive threshold -> external contours ->
/// size filter -> annotate -> statistics. The input is not modified.
pub fn analyze(raster: &RgbImage, params: &DetectionParams) -> Result<Analysis> {
    let (width, height) = raster.dimensions();
    let gray = preprocess::to_grayscale(raster);
    let mask = threshold::adaptive_threshold_inv(&gray, &params.threshold)?;

    let boxes = contours::external_bounding_boxes(&mask)
        .into_iter()
        .filter(|bbox| params.qualifies(bbox))
        .collect::<Vec<_>>();

    let overlaps = geom::overlapping_pairs(&boxes);
    if overlaps > 0 {
        tracing::debug!(
            overlaps,
            regions = boxes.len(),
            "qualifying regions overlap; density counts shared pixels more than once"
        );
    }

    let annotated = annotate::draw_boxes(raster, &boxes, &params.annotation);
    let stats = stats::summarize(&boxes, width, height);
    Ok(Analysis {
        annotated,
        boxes,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectError;
    use crate::test_util::{blank_raster, fill_dark_rect};

    #[test]
    fn blank_raster_has_no_text() {
        let raster = blank_raster(120, 80);
        let analysis = analyze(&raster, &DetectionParams::default()).expect("analyze");
        assert!(analysis.boxes.is_empty());
        assert_eq!(analysis.stats.regions, 0);
        assert_eq!(analysis.stats.density_percent, 0.0);
        assert_eq!(analysis.stats.confidence, 20);
        assert_eq!(analysis.stats.total_area_px, 120 * 80);
        assert_eq!(analysis.annotated, raster);
    }

    #[test]
    fn single_dark_block_is_detected() {
        let mut raster = blank_raster(200, 100);
        fill_dark_rect(&mut raster, 40, 30, 100, 30);

        let analysis = analyze(&raster, &DetectionParams::default()).expect("analyze");
        assert_eq!(
            analysis.boxes,
            vec![BBoxPx {
                x: 40,
                y: 30,
                w: 100,
                h: 30
            }]
        );
        assert_eq!(analysis.stats.regions, 1);
        assert!((analysis.stats.density_percent - 15.0).abs() < 1e-9);
        assert_eq!(analysis.stats.confidence, 35);
        assert_eq!(*analysis.annotated.get_pixel(40, 30), image::Rgb([0, 255, 0]));
    }

    #[test]
    fn two_separate_blocks_sum_their_areas() {
        let mut raster = blank_raster(200, 120);
        fill_dark_rect(&mut raster, 10, 10, 60, 20);
        fill_dark_rect(&mut raster, 100, 60, 80, 25);

        for method in [ThresholdMethod::Mean, ThresholdMethod::Gaussian] {
            let params = DetectionParams {
                threshold: ThresholdParams {
                    method,
                    ..ThresholdParams::default()
                },
                ..DetectionParams::default()
            };
            let analysis = analyze(&raster, &params).expect("analyze");
            assert_eq!(analysis.stats.regions, 2, "{method:?}");
            let expected = ((1200.0 + 2000.0) / 24000.0 * 100.0 * 100.0_f64).round() / 100.0;
            assert!((analysis.stats.density_percent - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn small_blobs_are_filtered_out() {
        let mut raster = blank_raster(200, 100);
        // too narrow
        fill_dark_rect(&mut raster, 10, 10, 50, 30);
        // too short
        fill_dark_rect(&mut raster, 80, 60, 100, 15);

        let analysis = analyze(&raster, &DetectionParams::default()).expect("analyze");
        assert_eq!(analysis.stats.regions, 0);
        assert_eq!(analysis.stats.confidence, 20);
        assert_eq!(analysis.annotated, raster);
    }

    #[test]
    fn near_full_coverage_caps_confidence() {
        let mut raster = blank_raster(200, 100);
        fill_dark_rect(&mut raster, 1, 1, 198, 98);

        let analysis = analyze(&raster, &DetectionParams::default()).expect("analyze");
        assert_eq!(analysis.stats.regions, 1);
        assert!((analysis.stats.density_percent - 97.02).abs() < 1e-9);
        assert_eq!(analysis.stats.confidence, 100);
    }

    #[test]
    fn default_window_is_gaussian_weighted() {
        let params = DetectionParams::default();
        assert_eq!(params.threshold.method, ThresholdMethod::Gaussian);
        assert_eq!(params.threshold.block_size, 11);
        assert_eq!(params.threshold.bias, 2);
    }

    #[test]
    fn invalid_window_is_a_processing_error() {
        let params = DetectionParams {
            threshold: ThresholdParams {
                block_size: 4,
                ..ThresholdParams::default()
            },
            ..DetectionParams::default()
        };
        let err = analyze(&blank_raster(10, 10), &params).expect_err("must fail");
        assert!(matches!(err, DetectError::Processing(_)));
    }
}
