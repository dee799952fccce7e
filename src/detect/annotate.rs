use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use super::BBoxPx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationStyle {
    pub color: Rgb<u8>,
    /// Stroke width in pixels, grown outward from the box edge.
    pub thickness: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: Rgb([0, 255, 0]),
            thickness: 2,
        }
    }
}

/// Returns a copy of `raster` with every box outlined.
pub(super) fn draw_boxes(
    raster: &RgbImage,
    boxes: &[BBoxPx],
    style: &AnnotationStyle,
) -> RgbImage {
    let mut canvas = raster.clone();
    for bbox in boxes {
        for layer in 0..style.thickness {
            let grow = layer.saturating_mul(2);
            let rect = Rect::at(
                (bbox.x as i32).saturating_sub(layer as i32),
                (bbox.y as i32).saturating_sub(layer as i32),
            )
            .of_size(bbox.w.saturating_add(grow), bbox.h.saturating_add(grow));
            draw_hollow_rect_mut(&mut canvas, rect, style.color);
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::blank_raster;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

    #[test]
    fn outlines_box_and_leaves_source_untouched() {
        let raster = blank_raster(40, 30);
        let bbox = BBoxPx {
            x: 10,
            y: 8,
            w: 20,
            h: 12,
        };
        let canvas = draw_boxes(&raster, &[bbox], &AnnotationStyle::default());

        assert_eq!(*canvas.get_pixel(10, 8), GREEN);
        assert_eq!(*canvas.get_pixel(29, 19), GREEN);
        // second layer sits just outside the box
        assert_eq!(*canvas.get_pixel(9, 7), GREEN);
        assert_eq!(*canvas.get_pixel(30, 20), GREEN);
        // interior and far outside are untouched
        assert_eq!(*canvas.get_pixel(20, 14), WHITE);
        assert_eq!(*canvas.get_pixel(8, 6), WHITE);

        assert!(raster.pixels().all(|pixel| *pixel == WHITE));
    }

    #[test]
    fn boxes_on_the_image_border_are_clipped() {
        let raster = blank_raster(20, 20);
        let bbox = BBoxPx {
            x: 0,
            y: 0,
            w: 20,
            h: 20,
        };
        let style = AnnotationStyle {
            color: Rgb([255, 0, 0]),
            thickness: 3,
        };
        let canvas = draw_boxes(&raster, &[bbox], &style);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(19, 19), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(10, 10), WHITE);
    }

    #[test]
    fn widest_stroke_reaches_past_the_border_without_panicking() {
        let raster = blank_raster(30, 20);
        let bbox = BBoxPx {
            x: 5,
            y: 5,
            w: 10,
            h: 8,
        };
        let style = AnnotationStyle {
            color: GREEN,
            thickness: 64,
        };
        let canvas = draw_boxes(&raster, &[bbox], &style);
        assert_eq!(*canvas.get_pixel(0, 0), GREEN);
        assert_eq!(*canvas.get_pixel(29, 19), GREEN);
        assert_eq!(*canvas.get_pixel(10, 9), WHITE);
    }
}
