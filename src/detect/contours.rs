use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use super::BBoxPx;

/// Bounding boxes of the outermost foreground regions of `mask`.
///
/// Holes, and regions sitting inside holes, are skipped.
pub(super) fn external_bounding_boxes(mask: &GrayImage) -> Vec<BBoxPx> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
        .filter_map(|contour| bounding_box(&contour.points))
        .collect()
}

fn bounding_box(points: &[Point<i32>]) -> Option<BBoxPx> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    Some(BBoxPx {
        x: min_x.max(0) as u32,
        y: min_y.max(0) as u32,
        w: (max_x - min_x + 1) as u32,
        h: (max_y - min_y + 1) as u32,
    })
}
