use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod analysis;
mod client;
mod config;
mod error;
mod models;


use crate::analysis::{AnalysisSettings, Analyzer, Collaborators, LexiconScorer};
use crate::client::{GeniusClient, SpotifyClient};
use crate::config::load_config;
use crate::error::AnalysisError;

const INVALID_FORMAT_MESSAGE: &str = "Invalid StreamingHistory.json format.";

#[derive(Parser)]
#[command(name = "streaming-report")]
#[command(about = "Listening report generator for Spotify streaming history exports")]
#[command(version)]
struct Args {
    /// Path to the streaming history JSON export
    input: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Pretty-print the report JSON
    #[arg(long = "pretty")]
    pretty: bool,

    /// Maximum concurrent catalog and lyrics requests (overrides MAX_CONCURRENCY)
    #[arg(long = "concurrency")]
    concurrency: Option<usize>,

    /// Timeout in seconds for every external request (overrides REQUEST_TIMEOUT_SECS)
    #[arg(long = "timeout")]
    timeout: Option<u64>,

    /// Quiet mode - only log warnings and errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet);

    if !args.input.exists() {
        return Err(anyhow::anyhow!(
            "Streaming history file '{}' not found",
            args.input.display()
        ));
    }

    let mut config = load_config()?;
    if let Some(concurrency) = args.concurrency {
        config.max_concurrency = concurrency.max(1);
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout = Duration::from_secs(timeout);
    }

    // Collaborators are built once and handed to the analyzer
    let catalog = SpotifyClient::new(&config);
    let lyrics = GeniusClient::new(&config);
    let scorer = LexiconScorer::new();
    let analyzer = Analyzer::new(
        Collaborators {
            catalog: &catalog,
            lyrics: &lyrics,
            sentiment: &scorer,
        },
        AnalysisSettings {
            max_concurrency: config.max_concurrency,
            ..AnalysisSettings::default()
        },
    );

    let history = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read '{}'", args.input.display()))?;
    info!("Loaded {} ({} bytes)", args.input.display(), history.len());

    match analyzer.analyze_json(&history) {
        Ok(report) => {
            write_json(&report, args.output.as_deref(), args.pretty)?;
            info!(
                "Report written: {} top tracks, {} top artists, {} recommended artists",
                report.top_tracks.len(),
                report.top_artists.len(),
                report.recommendations.len()
            );
            Ok(())
        }
        Err(AnalysisError::InvalidFormat(reason)) => {
            error!("Rejected input: {reason}");
            write_json(
                &ErrorBody {
                    error: INVALID_FORMAT_MESSAGE,
                },
                args.output.as_deref(),
                args.pretty,
            )?;
            Err(anyhow::anyhow!("{INVALID_FORMAT_MESSAGE} {reason}"))
        }
        Err(e) => Err(e.into()),
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let mut json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    json.push('\n');

    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to '{}'", path.display())),
        None => {
            print!("{json}");
            Ok(())
        }
    }
}
