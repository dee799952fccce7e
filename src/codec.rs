use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::codecs::jpeg::JpegEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader, RgbImage};

use crate::error::{DetectError, Result};

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Decodes a base64 image payload into a 3-channel raster.
///
/// Whitespace inside the payload is ignored and a browser data URL prefix
/// (`data:image/png;base64,`) is accepted. Alpha channels are dropped.
pub fn decode_base64_image(payload: &str) -> Result<RgbImage> {
    let bytes = decode_base64_payload(payload)?;
    decode_image_bytes(&bytes)
}

/// Decodes a compressed image byte stream (any format `image` recognizes).
///
/// An EXIF orientation tag is applied, so phone photos come out upright.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<RgbImage> {
    let image = decode_oriented(bytes).map_err(DetectError::UndecodableImage)?;
    let raster = image.to_rgb8();
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectError::EmptyImage { width, height });
    }
    Ok(raster)
}

/// Compresses the raster to JPEG and returns it base64-encoded.
pub fn encode_base64_jpeg(raster: &RgbImage, quality: u8) -> Result<String> {
    let bytes = encode_jpeg(raster, quality)?;
    Ok(BASE64.encode(bytes))
}

pub fn encode_jpeg(raster: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectError::EmptyRaster { width, height });
    }
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode_image(raster)
        .map_err(DetectError::Encode)?;
    Ok(bytes)
}

fn decode_oriented(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    // unreadable EXIF is ignored rather than failing the decode
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

fn decode_base64_payload(payload: &str) -> Result<Vec<u8>> {
    let body = strip_data_url(payload.trim());
    let compact = body
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect::<String>();
    if compact.is_empty() {
        return Err(DetectError::EmptyPayload);
    }
    Ok(BASE64.decode(compact.as_bytes())?)
}

fn strip_data_url(payload: &str) -> &str {
    if !payload.starts_with("data:") {
        return payload;
    }
    match payload.split_once(',') {
        Some((header, body)) if header.ends_with(";base64") => body,
        _ => payload,
    }
}
