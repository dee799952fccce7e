use anyhow::{Context, Result, anyhow, bail};
use image::Rgb;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::detect::{AnnotationStyle, DetectionParams, ThresholdMethod, ThresholdParams};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");
const MAX_BOX_THICKNESS: u32 = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_addr: String,
    pub max_body_bytes: usize,
    pub allow_origin: String,
    pub threshold_method: ThresholdMethod,
    pub block_size: u32,
    pub bias: i32,
    pub min_width: u32,
    pub min_height: u32,
    pub box_color: String,
    pub box_thickness: u32,
    pub jpeg_quality: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8000".to_string(),
            max_body_bytes: 20 * 1024 * 1024,
            allow_origin: "*".to_string(),
            threshold_method: ThresholdMethod::Gaussian,
            block_size: 11,
            bias: 2,
            min_width: 50,
            min_height: 15,
            box_color: "#00ff00".to_string(),
            box_thickness: 2,
            jpeg_quality: 95,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server: Option<ServerSettings>,
    detection: Option<DetectionSettings>,
    annotation: Option<AnnotationSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSettings {
    addr: Option<String>,
    max_body_bytes: Option<usize>,
    allow_origin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DetectionSettings {
    method: Option<ThresholdMethod>,
    block_size: Option<u32>,
    bias: Option<i32>,
    min_width: Option<u32>,
    min_height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct AnnotationSettings {
    color: Option<String>,
    thickness: Option<u32>,
    jpeg_quality: Option<u8>,
}

/// Loads the embedded defaults, then layers every settings file that exists:
/// `./settings.toml`, `./settings.local.toml`, the same two names under
/// `$HOME/.text-region-detector`, and finally `extra_path`.
pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home_dir() {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    load_layers(&ordered_paths)
}

fn load_layers(paths: &[PathBuf]) -> Result<Settings> {
    let mut settings = Settings::default();
    let defaults: SettingsFile =
        toml::from_str(DEFAULT_SETTINGS_TOML).with_context(|| "failed to parse embedded settings")?;
    settings.merge(defaults);

    for path in paths {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
            tracing::debug!(path = %path.display(), "loaded settings");
        }
    }

    settings.validate()?;
    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(server) = incoming.server {
            if let Some(addr) = server.addr {
                if !addr.trim().is_empty() {
                    self.server_addr = addr;
                }
            }
            if let Some(limit) = server.max_body_bytes {
                self.max_body_bytes = limit;
            }
            if let Some(origin) = server.allow_origin {
                if !origin.trim().is_empty() {
                    self.allow_origin = origin;
                }
            }
        }
        if let Some(detection) = incoming.detection {
            if let Some(method) = detection.method {
                self.threshold_method = method;
            }
            if let Some(size) = detection.block_size {
                self.block_size = size;
            }
            if let Some(bias) = detection.bias {
                self.bias = bias;
            }
            if let Some(width) = detection.min_width {
                self.min_width = width;
            }
            if let Some(height) = detection.min_height {
                self.min_height = height;
            }
        }
        if let Some(annotation) = incoming.annotation {
            if let Some(color) = annotation.color {
                if !color.trim().is_empty() {
                    self.box_color = color;
                }
            }
            if let Some(thickness) = annotation.thickness {
                self.box_thickness = thickness;
            }
            if let Some(quality) = annotation.jpeg_quality {
                self.jpeg_quality = quality;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size < 3 || self.block_size % 2 == 0 {
            bail!(
                "detection.block_size must be odd and at least 3, got {}",
                self.block_size
            );
        }
        if !(1..=MAX_BOX_THICKNESS).contains(&self.box_thickness) {
            bail!(
                "annotation.thickness must be within 1..={}, got {}",
                MAX_BOX_THICKNESS,
                self.box_thickness
            );
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            bail!(
                "annotation.jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            );
        }
        if self.max_body_bytes == 0 {
            bail!("server.max_body_bytes must be greater than 0");
        }
        parse_hex_color(&self.box_color)
            .with_context(|| format!("invalid annotation.color: {}", self.box_color))?;
        Ok(())
    }

    pub fn detection_params(&self) -> Result<DetectionParams> {
        Ok(DetectionParams {
            threshold: ThresholdParams {
                method: self.threshold_method,
                block_size: self.block_size,
                bias: self.bias,
            },
            min_width: self.min_width,
            min_height: self.min_height,
            annotation: AnnotationStyle {
                color: parse_hex_color(&self.box_color)?,
                thickness: self.box_thickness,
            },
        })
    }
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(value: &str) -> Result<Rgb<u8>> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        bail!("expected a #rrggbb color, got {:?}", value);
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".text-region-detector"))
        }
    })
}
