#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch CLI for the launch-site analysis engine.
//!
//! Reads an analysis request document (target point plus input layers)
//! from disk, runs the full pipeline, and writes the response envelope
//! (statistics record plus scored candidate features) as JSON. `--offline`
//! skips the elevation service and applies the documented 0.0 fallback,
//! which also makes runs fully deterministic for fixture comparisons.

use std::path::PathBuf;

use clap::Parser;
use launch_map_analysis::{AnalysisConfig, AnalysisRequest, analyze, build_response};
use launch_map_elevation::ElevationClient;

#[derive(Parser)]
#[command(name = "launch-map", about = "Score drone-launch candidate sites around a target")]
struct Args {
    /// Path to the analysis request document (JSON).
    #[arg(long)]
    input: PathBuf,

    /// Output path for the response envelope; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip the elevation service and use the 0.0 fallback.
    #[arg(long)]
    offline: bool,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let args = Args::parse();

    let document = std::fs::read_to_string(&args.input)?;
    let request: AnalysisRequest = serde_json::from_str(&document)?;

    let config = AnalysisConfig {
        search_radius_m: request.radius_m,
        ..AnalysisConfig::default()
    };
    let layers = request.layer_bundle();

    let client;
    let elevation = if args.offline {
        None
    } else {
        client = ElevationClient::new(config.elevation.clone());
        Some(&client)
    };

    let outcome = analyze(&layers, request.target_point(), &config, elevation).await?;
    let response = build_response(&outcome, &layers.security, &config);

    let json = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!(
                "wrote {} candidates to {}",
                response.stats.total_candidates,
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
