#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime risk server.
//!
//! Request bodies reuse the domain types directly; only the envelopes
//! around them live here.

use crime_risk_analytics_models::{
    HotspotFilter, HotspotSort, PatrolSuggestion, PredictionFilter, PredictionRecord,
    SuggestionFilter,
};
use crime_risk_crime_models::IncidentRecord;
use crime_risk_hotspot_models::{ClusterConfig, Hotspot};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Body of the hotspot endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotRequest {
    /// Incidents to cluster.
    pub incidents: Vec<IncidentRecord>,
    /// Overrides for the server's default clustering configuration.
    #[serde(default)]
    pub config: Option<ClusterConfig>,
    /// Optional ordering of the result.
    #[serde(default)]
    pub sort: Option<HotspotSort>,
    /// Optional filters applied after clustering.
    #[serde(default)]
    pub filter: Option<HotspotFilter>,
}

/// Response of `POST /api/hotspots`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotResponse {
    /// Hotspots after sorting and filtering.
    pub hotspots: Vec<Hotspot>,
    /// Ids of incidents that joined no hotspot, in chronological order.
    pub unclustered_ids: Vec<String>,
}

/// Body of `POST /api/predictions/statistics`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRequest {
    /// Predictions to summarize.
    pub predictions: Vec<PredictionRecord>,
    /// Filters applied before summarizing.
    #[serde(default)]
    pub filter: PredictionFilter,
}

/// Body of `POST /api/suggestions/metrics`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionMetricsRequest {
    /// Patrol suggestions to summarize.
    pub suggestions: Vec<PatrolSuggestion>,
    /// Filters applied before summarizing.
    #[serde(default)]
    pub filter: SuggestionFilter,
    /// Only count suggestions with at least this confidence.
    #[serde(default)]
    pub min_confidence: Option<f64>,
}

/// Query parameters for the distance endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceQueryParams {
    /// Latitude of the first point.
    pub from_lat: f64,
    /// Longitude of the first point.
    pub from_lon: f64,
    /// Latitude of the second point.
    pub to_lat: f64,
    /// Longitude of the second point.
    pub to_lon: f64,
}

/// Response of the distance endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResponse {
    /// Great-circle distance in meters.
    pub meters: f64,
}
