use image::{GrayImage, Luma, RgbImage};

pub(super) fn to_grayscale(raster: &RgbImage) -> GrayImage {
    let (width, height) = raster.dimensions();
    let mut luma = GrayImage::new(width, height);

    for (x, y, pixel) in raster.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let value = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8;
        luma.put_pixel(x, y, Luma([value]));
    }
    luma
}
