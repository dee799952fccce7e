use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::{DetectError, Result};

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// How the pixels of the local window are weighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMethod {
    Mean,
    #[default]
    Gaussian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdParams {
    pub method: ThresholdMethod,
    /// Side of the square window; odd and at least 3.
    pub block_size: u32,
    /// Subtracted from the local mean before comparison.
    pub bias: i32,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            method: ThresholdMethod::Gaussian,
            block_size: 11,
            bias: 2,
        }
    }
}

impl ThresholdParams {
    pub fn validate(&self) -> Result<()> {
        if self.block_size < 3 || self.block_size % 2 == 0 {
            return Err(DetectError::processing(format!(
                "threshold block size must be odd and at least 3, got {}",
                self.block_size
            )));
        }
        Ok(())
    }
}

/// Inverted adaptive threshold: pixels darker than their neighbourhood
/// mean by at least `bias` become foreground (255).
pub(super) fn adaptive_threshold_inv(
    gray: &GrayImage,
    params: &ThresholdParams,
) -> Result<GrayImage> {
    params.validate()?;
    let (width, height) = gray.dimensions();
    let weights = window_weights(params.method, params.block_size);
    let local = local_means(gray, &weights);

    let mut mask = GrayImage::new(width, height);
    for ((src, mean), out) in gray.pixels().zip(local.iter()).zip(mask.pixels_mut()) {
        let diff = src[0] as i32 - *mean as i32;
        out[0] = if diff <= -params.bias {
            FOREGROUND
        } else {
            BACKGROUND
        };
    }
    Ok(mask)
}

fn window_weights(method: ThresholdMethod, size: u32) -> Vec<f32> {
    match method {
        ThresholdMethod::Mean => vec![1.0 / size as f32; size as usize],
        ThresholdMethod::Gaussian => {
            let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
            let center = (size / 2) as f32;
            let raw = (0..size)
                .map(|i| {
                    let d = i as f32 - center;
                    (-(d * d) / (2.0 * sigma * sigma)).exp()
                })
                .collect::<Vec<_>>();
            let sum = raw.iter().sum::<f32>();
            raw.into_iter().map(|weight| weight / sum).collect()
        }
    }
}

// Separable pass, rows then columns; out-of-range taps repeat the edge pixel.
fn local_means(gray: &GrayImage, weights: &[f32]) -> Vec<u8> {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let radius = (weights.len() / 2) as isize;
    let src = gray.as_raw();

    let mut rows = vec![0f32; w * h];
    for y in 0..h {
        let line = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, weight) in weights.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - radius, w);
                acc += weight * line[sx] as f32;
            }
            rows[y * w + x] = acc;
        }
    }

    let mut means = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, weight) in weights.iter().enumerate() {
                let sy = clamp_index(y as isize + k as isize - radius, h);
                acc += weight * rows[sy * w + x];
            }
            means[y * w + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }
    means
}

fn clamp_index(index: isize, len: usize) -> usize {
    index.clamp(0, len as isize - 1) as usize
}
