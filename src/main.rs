use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use text_region_detector::{BBoxPx, Detector, TextStats, codec, server, settings};

#[derive(Parser, Debug)]
#[command(
    name = "text-region-detector",
    version,
    about = "Detect probable text regions in images"
)]
struct Cli {
    /// Run the HTTP server (address defaults to [server] addr from settings)
    #[arg(long = "server", value_name = "ADDR", num_args = 0..=1, default_missing_value = "")]
    server: Option<String>,

    /// Image file to analyze (default: base64 payload on stdin)
    #[arg(short = 'd', long = "data")]
    data: Option<PathBuf>,

    /// Write the annotated JPEG to this path
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Include the annotated image as base64 in the JSON output
    #[arg(long = "with-image")]
    with_image: bool,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

#[derive(Serialize)]
struct CliOutput {
    #[serde(flatten)]
    stats: TextStats,
    regions: Vec<BBoxPx>,
    #[serde(
        rename = "imagem_processada_base64",
        skip_serializing_if = "Option::is_none"
    )]
    image_base64: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    text_region_detector::logging::init(cli.verbose)?;
    let settings = settings::load_settings(cli.read_settings.as_deref().map(Path::new))?;

    if let Some(addr) = cli.server {
        let addr = if addr.trim().is_empty() {
            settings.server_addr.clone()
        } else {
            addr
        };
        return server::run_server(settings, addr).await;
    }

    let detector = Detector::from_settings(&settings)?;
    let raster = if let Some(path) = cli.data.as_deref() {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read image: {}", path.display()))?;
        codec::decode_image_bytes(&bytes)?
    } else {
        if io::stdin().is_terminal() {
            return Err(anyhow!(
                "no input: pass --data <PATH>, pipe a base64 payload on stdin, or use --server"
            ));
        }
        let mut payload = String::new();
        io::stdin()
            .read_to_string(&mut payload)
            .with_context(|| "failed to read stdin")?;
        codec::decode_base64_image(&payload)?
    };

    let analysis = detector.analyze(&raster)?;
    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        regions = analysis.stats.regions,
        "analysis finished"
    );

    if let Some(out) = cli.out.as_deref() {
        let jpeg = codec::encode_jpeg(&analysis.annotated, detector.jpeg_quality())?;
        std::fs::write(out, jpeg)
            .with_context(|| format!("failed to write annotated image: {}", out.display()))?;
        tracing::info!(path = %out.display(), "wrote annotated image");
    }

    let image_base64 = if cli.with_image {
        Some(codec::encode_base64_jpeg(
            &analysis.annotated,
            detector.jpeg_quality(),
        )?)
    } else {
        None
    };
    let output = CliOutput {
        stats: analysis.stats,
        regions: analysis.boxes,
        image_base64,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
