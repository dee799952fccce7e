use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{Rgb, RgbImage};

pub(crate) fn blank_raster(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
}

/// Fills `w x h` pixels at (`x`, `y`) with black.
pub(crate) fn fill_dark_rect(raster: &mut RgbImage, x: u32, y: u32, w: u32, h: u32) {
    for py in y..y + h {
        for px in x..x + w {
            raster.put_pixel(px, py, Rgb([0, 0, 0]));
        }
    }
}

pub(crate) fn png_base64(raster: &RgbImage) -> String {
    let mut cursor = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(raster.clone())
        .write_to(&mut cursor, image::ImageFormat::Png)
        .expect("png encode");
    BASE64.encode(cursor.into_inner())
}
