#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hotspot and clustering configuration types.
//!
//! A [`Hotspot`] is produced by the cluster builder from a batch of
//! incidents and is never mutated afterwards: a changed batch produces a
//! fresh set of hotspots.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use crime_risk_crime_models::{RiskLevel, Severity};
use crime_risk_geography_models::GeoPoint;
use crime_risk_scoring::RiskScoringConfig;
use serde::{Deserialize, Serialize};

/// A spatially bounded cluster of incidents treated as one elevated-risk
/// area.
///
/// Every member incident lies within `radius_meters` of `center`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Identifier in formation order (`HS-001`, `HS-002`, ...).
    pub id: String,
    /// Centroid of the member incidents.
    pub center: GeoPoint,
    /// Distance from `center` to the farthest member, always positive.
    pub radius_meters: f64,
    /// Categorical risk level.
    pub risk_level: RiskLevel,
    /// Normalized risk score in `[0, 1]`.
    pub risk_score: f64,
    /// Incidents per square kilometer.
    pub crime_density: f64,
    /// Member crime types, most frequent first (ties alphabetical).
    pub dominant_crime_types: Vec<String>,
    /// Ids of the member incidents.
    pub member_incident_ids: BTreeSet<String>,
    /// Number of member incidents.
    pub incident_count: usize,
    /// Member count per severity.
    pub severity_mix: BTreeMap<Severity, u64>,
    /// Up to three one-hour windows (`"20:00-21:00"`) in which members
    /// occurred most often.
    pub active_hours: Vec<String>,
    /// When the earliest member occurred.
    pub first_incident_at: DateTime<Utc>,
    /// When the most recent member occurred.
    pub last_updated: DateTime<Utc>,
}

impl Hotspot {
    /// Returns `true` if the incident with `id` is a member of this hotspot.
    #[must_use]
    pub fn contains_incident(&self, id: &str) -> bool {
        self.member_incident_ids.contains(id)
    }
}

/// Configuration for the cluster builder.
///
/// Every field has a default, so any subset can be overridden from TOML or
/// JSON. Scoring weights are flattened so the keys read `densityWeight`,
/// `recencyWeight` and `severityWeight` at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Radius around a seed incident within which members are collected.
    pub cluster_radius_meters: f64,
    /// Upper bound on a hotspot's radius.
    pub max_radius_meters: f64,
    /// Minimum member count for a hotspot to form.
    pub min_points: usize,
    /// Risk scoring knobs.
    #[serde(flatten)]
    pub scoring: RiskScoringConfig,
    /// Instant that recency is measured against. Defaults to the latest
    /// incident in the batch so results depend only on the input.
    pub reference_time: Option<DateTime<Utc>>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cluster_radius_meters: 500.0,
            max_radius_meters: 2_000.0,
            min_points: 3,
            scoring: RiskScoringConfig::default(),
            reference_time: None,
        }
    }
}

/// Result of clustering a batch of incidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOutcome {
    /// Hotspots in formation order.
    pub hotspots: Vec<Hotspot>,
    /// Incidents that joined no hotspot, in seed order.
    pub unclustered_ids: Vec<String>,
}
