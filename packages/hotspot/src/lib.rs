#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Density-radius clustering of incidents into risk-scored hotspots.
//!
//! [`build_hotspots`] groups nearby incidents around seed incidents taken in
//! chronological order. A seed whose neighborhood holds at least
//! `min_points` unassigned incidents becomes a hotspot; otherwise the seed is
//! marked visited and only joins later hotspots as a member. Each build is a
//! pure function of its input batch and configuration.

mod cluster;
pub mod config;
pub mod export;

use crime_risk_geography_models::InvalidCoordinateError;
use crime_risk_scoring::ScoringError;
use crime_risk_spatial::SpatialError;
use thiserror::Error;

pub use cluster::{build_hotspots, cluster_incidents, validate_config};
pub use config::{ConfigError, load_config, parse_config};
pub use export::hotspots_to_geojson;
pub use crime_risk_hotspot_models::{ClusterConfig, ClusterOutcome, Hotspot};

/// Errors that can occur while building hotspots.
#[derive(Debug, Error)]
pub enum HotspotError {
    /// The clustering configuration is malformed.
    #[error("Invalid cluster configuration: {message}")]
    InvalidConfig {
        /// Description of what is wrong.
        message: String,
    },

    /// An incident carries an invalid location.
    #[error("Incident '{id}' has an invalid location: {source}")]
    InvalidLocation {
        /// Incident id.
        id: String,
        /// Underlying coordinate error.
        source: InvalidCoordinateError,
    },

    /// Two incidents share the same id.
    #[error("Duplicate incident id '{0}'")]
    DuplicateIncident(String),

    /// A geo primitive failed.
    #[error("Spatial error: {0}")]
    Spatial(#[from] SpatialError),

    /// Risk scoring failed.
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),
}
