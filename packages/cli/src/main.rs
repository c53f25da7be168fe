#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line interface for crime risk hotspot analysis.
//!
//! Reads incident, prediction or patrol suggestion batches from disk, runs
//! them through the hotspot builder or the statistics engine, and prints
//! the result as JSON on stdout. Logs go to stderr via `pretty_env_logger` (`RUST_LOG`).

mod input;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use chrono::NaiveDate;
use crime_risk_analytics::{
    compute_statistics, filter_hotspots, filter_predictions, filter_suggestions, sort_hotspots,
    suggestion_metrics, suggestions_above_confidence,
};
use crime_risk_analytics_models::{
    HotspotFilter, HotspotSortKey, PredictionFilter, PredictionStatus, SuggestionFilter,
    SuggestionStatus,
};
use crime_risk_crime_models::RiskLevel;
use crime_risk_geography_models::GeoPoint;
use crime_risk_hotspot::{ClusterConfig, ClusterOutcome, cluster_incidents, hotspots_to_geojson};
use input::InputFormat;

#[derive(Parser)]
#[command(name = "crime_risk", about = "Crime risk hotspot analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster incidents into risk-scored hotspots
    Hotspots {
        /// Incident file (JSON array or CSV)
        #[arg(long)]
        input: PathBuf,
        /// Input format (inferred from the extension when omitted)
        #[arg(long, value_enum)]
        format: Option<InputFormat>,
        /// TOML file overriding the default cluster configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Sort key: `risk-level`, `crime-density` or `last-updated`
        #[arg(long)]
        sort: Option<HotspotSortKey>,
        /// Sort ascending instead of descending
        #[arg(long, requires = "sort")]
        ascending: bool,
        /// Only keep hotspots at this risk level
        #[arg(long)]
        risk_level: Option<RiskLevel>,
        /// Only keep hotspots with at least this many incidents per km²
        #[arg(long)]
        min_density: Option<f64>,
        /// Only keep hotspots dominated by this crime type
        #[arg(long)]
        crime_type: Option<String>,
        /// Also write the hotspots as a GeoJSON `FeatureCollection` here
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Summarize a JSON array of predictions
    Stats {
        /// Prediction file (JSON array)
        #[arg(long)]
        input: PathBuf,
        /// Only include predictions with this status
        #[arg(long)]
        status: Option<PredictionStatus>,
        /// Only include predictions with at least this risk score
        #[arg(long)]
        min_risk_score: Option<f64>,
        /// Only include predictions for this area
        #[arg(long)]
        area: Option<String>,
    },
    /// Review metrics over a JSON array of patrol suggestions
    Suggestions {
        /// Suggestion file (JSON array)
        #[arg(long)]
        input: PathBuf,
        /// Only include suggestions with this review status
        #[arg(long)]
        status: Option<SuggestionStatus>,
        /// Only include suggestions for this patrol date (YYYY-MM-DD)
        #[arg(long)]
        patrol_date: Option<NaiveDate>,
        /// Only include suggestions for this shift
        #[arg(long)]
        shift: Option<String>,
        /// Only include suggestions with at least this confidence
        #[arg(long)]
        min_confidence: Option<f64>,
    },
    /// Great-circle distance in meters between two coordinates
    Distance {
        /// Latitude of the first point
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        /// Longitude of the first point
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        /// Latitude of the second point
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        /// Longitude of the second point
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Hotspots {
            input,
            format,
            config,
            sort,
            ascending,
            risk_level,
            min_density,
            crime_type,
            geojson,
        } => {
            let config = match config {
                Some(path) => crime_risk_hotspot::load_config(&path)?,
                None => ClusterConfig::default(),
            };
            let incidents = input::read_incidents(&input, format)?;
            let outcome = cluster_incidents(&incidents, &config)?;

            let filter = HotspotFilter {
                risk_level,
                min_density,
                crime_type,
            };
            let mut hotspots = filter_hotspots(&outcome.hotspots, &filter);
            if let Some(key) = sort {
                hotspots = sort_hotspots(&hotspots, key, ascending);
            }

            if let Some(path) = geojson {
                let collection = hotspots_to_geojson(&hotspots);
                std::fs::write(&path, serde_json::to_string_pretty(&collection)?)?;
                log::info!(
                    "Wrote {} hotspots as GeoJSON to {}",
                    hotspots.len(),
                    path.display()
                );
            }

            let result = ClusterOutcome {
                hotspots,
                unclustered_ids: outcome.unclustered_ids,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Stats {
            input,
            status,
            min_risk_score,
            area,
        } => {
            let predictions = input::read_predictions(&input)?;
            let filter = PredictionFilter {
                status,
                min_risk_score,
                area_name: area,
            };
            let matching = filter_predictions(&predictions, &filter);
            let stats = compute_statistics(&matching)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Suggestions {
            input,
            status,
            patrol_date,
            shift,
            min_confidence,
        } => {
            let suggestions = input::read_suggestions(&input)?;
            let filter = SuggestionFilter {
                patrol_date,
                shift_period: shift,
                status,
            };
            let mut matching = filter_suggestions(&suggestions, &filter);
            if let Some(threshold) = min_confidence {
                matching = suggestions_above_confidence(&matching, threshold);
            }
            let metrics = suggestion_metrics(&matching)?;
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let meters = crime_risk_spatial::distance_meters(
                &GeoPoint::new(lat1, lon1)?,
                &GeoPoint::new(lat2, lon2)?,
            )?;
            println!("{meters:.3}");
        }
    }

    Ok(())
}
