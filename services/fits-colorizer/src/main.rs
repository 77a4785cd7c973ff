//! FITS colorizer.
//!
//! Renders every image plane of a FITS file through a matrix of stripe
//! counts and color ramps, writing one BMP or PNG per combination.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use colorizer::ColorizeMode;
use fits_parser::FitsReader;
use renderer::{RasterFormat, RasterSink};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use fits_colorizer::{pipeline, ConfigOverrides, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "fits-colorizer")]
#[command(about = "Render FITS image planes through stripe and color ramp combinations")]
struct Args {
    /// FITS file to render
    input: PathBuf,

    /// Directory for rendered files (created if missing)
    #[arg(short, long, env = "FITS_COLORIZER_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// YAML run configuration
    #[arg(short, long, env = "FITS_COLORIZER_CONFIG")]
    config: Option<PathBuf>,

    /// Stripe counts, comma separated
    #[arg(long, value_delimiter = ',')]
    stripes: Option<Vec<f64>>,

    /// Color modes, comma separated (greyscale, roygbiv, nickrgb, binary, snrgb)
    #[arg(long, value_delimiter = ',')]
    modes: Option<Vec<ColorizeMode>>,

    /// Lower window cut as a fraction of the data range
    #[arg(long)]
    start: Option<f64>,

    /// Upper window cut as a fraction of the data range
    #[arg(long)]
    end: Option<f64>,

    /// Output format: bmp or png
    #[arg(long)]
    format: Option<RasterFormat>,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            stripes: self.stripes.clone(),
            modes: self.modes.clone(),
            start: self.start,
            end: self.end,
            format: self.format,
            output_dir: self.output_dir.clone(),
        }
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt().with_env_filter(filter).with_target(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json);

    let mut config = match &args.config {
        Some(path) => RunConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load run configuration: {}", path.display()))?,
        None => RunConfig::default(),
    };
    config.apply(args.overrides());
    config.validate().context("Invalid run configuration")?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    info!(
        input = %args.input.display(),
        output_dir = %config.output_dir.display(),
        format = %config.format,
        stripes = ?config.stripes,
        modes = ?config.modes,
        "Starting FITS colorizer"
    );

    let start = Instant::now();
    let mut reader = FitsReader::open(&args.input)
        .with_context(|| format!("Failed to open FITS file: {}", args.input.display()))?;
    let sink = RasterSink::new(config.format);

    let input_name = args.input.to_string_lossy();
    let summary = pipeline::run(&mut reader, &sink, &config, &input_name)
        .with_context(|| format!("Failed to colorize {}", args.input.display()))?;

    info!(
        planes = summary.planes,
        skipped = summary.skipped,
        files = summary.files,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Done"
    );
    Ok(())
}
