//! Mesoscale discussion mapper.
//!
//! Turns a discussion (link or pasted text) into:
//! - the discussion polygon as GeoJSON
//! - the matching 5-minute reflectivity composite, georeferenced and masked
//! - a composite map PNG of both
//! - a JSON summary of the run

mod config;
mod fetch;
mod pipeline;
mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use meso_common::{BoundingBox, MesoError};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::MapperConfig;
use fetch::HttpFetcher;
use source::SourceSelection;

#[derive(Parser, Debug)]
#[command(name = "mapper")]
#[command(about = "Map a mesoscale discussion over the current radar composite")]
struct Args {
    /// Link to the discussion page
    #[arg(long)]
    url: Option<String>,

    /// Discussion text pasted directly
    #[arg(long)]
    text: Option<String>,

    /// File holding the discussion text ("-" for stdin)
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, env = "MESO_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for output files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Hours added to UTC validity times
    #[arg(long, allow_hyphen_values = true)]
    utc_offset_hours: Option<i32>,

    /// Radar archive root URL
    #[arg(long)]
    radar_base_url: Option<String>,

    /// Map bounds as "min_lon,min_lat,max_lon,max_lat"
    #[arg(long, allow_hyphen_values = true)]
    view: Option<String>,

    /// Reference time (RFC 3339) instead of the current clock
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<MesoError>())
                .map(|err| {
                    error!(kind = err.kind(), error = %err, "Mapping failed");
                    err.exit_code()
                })
                .unwrap_or_else(|| {
                    error!(error = %format!("{:#}", e), "Mapping failed");
                    1
                });
            ExitCode::from(code as u8)
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = MapperConfig::load(args.config.as_deref())?;
    config.apply_env();
    apply_args(&mut config, &args)?;
    config.validate().context("Invalid configuration")?;

    let source = SourceSelection::from_inputs(
        args.url.as_deref(),
        args.text.as_deref(),
        args.text_file.as_deref(),
    )?;

    let now = args.now.unwrap_or_else(Utc::now);
    info!(
        now = %now,
        utc_offset_hours = config.utc_offset_hours,
        radar_base_url = %config.radar_base_url,
        "Starting discussion mapper"
    );

    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let products = pipeline::run(&source, &config, now, &fetcher).await?;

    let paths = pipeline::write_outputs(&products, &config.output_dir)
        .await
        .with_context(|| format!("Failed to write outputs to {}", config.output_dir.display()))?;

    info!(
        map = %paths.map_png.display(),
        geojson = %paths.polygon_geojson.display(),
        summary = %paths.summary_json.display(),
        validity = %products.validity_label,
        "Mapping complete"
    );
    Ok(())
}

/// Command-line flags take precedence over file and environment.
fn apply_args(config: &mut MapperConfig, args: &Args) -> Result<()> {
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(hours) = args.utc_offset_hours {
        config.utc_offset_hours = hours;
    }
    if let Some(url) = &args.radar_base_url {
        config.radar_base_url = url.clone();
    }
    if let Some(view) = &args.view {
        let bounds = BoundingBox::parse(view).with_context(|| format!("Invalid --view '{}'", view))?;
        config.view.set_bounds(&bounds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "mapper",
            "--text",
            "40125075 41005076 40755074",
            "--utc-offset-hours",
            "-5",
            "--view",
            "-90,30,-80,40",
            "--output-dir",
            "/tmp/meso",
        ]);

        let mut config = MapperConfig::default();
        apply_args(&mut config, &args).unwrap();

        assert_eq!(config.utc_offset_hours, -5);
        assert_eq!(config.view.min_lon, -90.0);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/meso"));
    }

    #[test]
    fn test_bad_view_rejected() {
        let args = Args::parse_from(["mapper", "--view", "-70,40,-80,45"]);
        let mut config = MapperConfig::default();
        assert!(apply_args(&mut config, &args).is_err());
    }

    #[test]
    fn test_now_flag_parses_rfc3339() {
        let args = Args::parse_from(["mapper", "--now", "2024-01-05T20:47:00Z"]);
        assert_eq!(
            args.now.map(|t| t.to_rfc3339()),
            Some("2024-01-05T20:47:00+00:00".to_string())
        );
    }
}
