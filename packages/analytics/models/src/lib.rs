#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Prediction records, patrol suggestions and aggregate query types.
//!
//! Prediction records and patrol suggestions come from an external model;
//! this workspace only filters and summarizes them. The query types here
//! describe the sort and filter options the aggregate query engine accepts
//! for hotspots, predictions and suggestions.

use chrono::{DateTime, NaiveDate, Utc};
use crime_risk_crime_models::RiskLevel;
use crime_risk_geography_models::GeoPoint;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lifecycle status of a prediction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PredictionStatus {
    /// Currently valid.
    #[default]
    Active,
    /// Past its prediction window.
    Expired,
    /// Manually archived.
    Archived,
    /// Replaced by a newer prediction.
    Superseded,
}

/// Where a prediction applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionLocation {
    /// Coordinate of the predicted area.
    #[serde(flatten)]
    pub point: GeoPoint,
    /// Human-readable area name.
    #[serde(default)]
    pub area_name: Option<String>,
}

/// One crime type a prediction expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedCrimeType {
    /// Crime type label.
    pub crime_type: String,
    /// Probability in `[0, 1]`.
    pub probability: f64,
    /// Expected number of incidents.
    #[serde(default)]
    pub expected_incidents: u32,
}

/// A risk prediction supplied by an external model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    /// Unique prediction identifier.
    pub id: String,
    /// Predicted location.
    pub location: PredictionLocation,
    /// Risk score in `[0, 1]`.
    pub risk_score: f64,
    /// Expected crime types, in model order.
    #[serde(default)]
    pub predicted_crime_types: Vec<PredictedCrimeType>,
    /// When the prediction was generated.
    pub generated_at: DateTime<Utc>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: PredictionStatus,
}

/// Summary statistics over a set of predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionStatistics {
    /// Number of predictions.
    pub total: u64,
    /// Mean risk score, rounded to two decimals.
    pub average_risk_score: f64,
    /// Predictions with a risk score of at least 0.7.
    pub high_risk_count: u64,
    /// Predictions with a risk score in `[0.4, 0.7)`.
    pub medium_risk_count: u64,
    /// Predictions with a risk score below 0.4.
    pub low_risk_count: u64,
    /// Crime type with the most expected incidents.
    pub most_common_crime_type: Option<String>,
    /// Area of the prediction with the greatest risk score.
    pub highest_risk_area: Option<String>,
}

impl PredictionStatistics {
    /// Statistics of an empty prediction set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total: 0,
            average_risk_score: 0.0,
            high_risk_count: 0,
            medium_risk_count: 0,
            low_risk_count: 0,
            most_common_crime_type: None,
            highest_risk_area: None,
        }
    }
}

/// Filters for prediction queries. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PredictionFilter {
    /// Only predictions with this status.
    pub status: Option<PredictionStatus>,
    /// Only predictions with at least this risk score.
    pub min_risk_score: Option<f64>,
    /// Only predictions for this area (case-insensitive).
    pub area_name: Option<String>,
}

/// Review status of a patrol suggestion.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SuggestionStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Accepted by a supervisor.
    Accepted,
    /// Rejected by a supervisor.
    Rejected,
    /// Accepted with changes.
    Modified,
    /// Carried out as part of a patrol plan.
    Implemented,
}

/// One area a patrol suggestion asks officers to cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityZone {
    /// Human-readable zone name.
    pub zone_name: String,
    /// Center of the zone.
    pub location: GeoPoint,
    /// Risk level of the zone.
    pub risk_level: RiskLevel,
    /// Suggested patrol window, e.g. `"18:00-19:00"`.
    #[serde(default)]
    pub recommended_patrol_time: Option<String>,
    /// Number of officers suggested for the zone.
    #[serde(default)]
    pub suggested_officers: u32,
    /// Confidence in `[0, 1]`.
    pub confidence_score: f64,
}

/// A patrol plan suggested by an external model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatrolSuggestion {
    /// Unique suggestion identifier.
    pub id: String,
    /// When the suggestion was generated.
    pub generated_at: DateTime<Utc>,
    /// Day the patrol applies to.
    pub patrol_date: NaiveDate,
    /// Shift label, e.g. `"Evening"`.
    #[serde(default)]
    pub shift_period: Option<String>,
    /// Zones to cover, highest priority first.
    #[serde(default)]
    pub priority_zones: Vec<PriorityZone>,
    /// Overall confidence in `[0, 1]`.
    pub confidence_score: f64,
    /// Total officers recommended.
    #[serde(default)]
    pub recommended_officers: u32,
    /// Review status.
    #[serde(default)]
    pub status: SuggestionStatus,
}

/// Filters for patrol suggestion queries. Absent fields impose no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestionFilter {
    /// Only suggestions for this patrol day.
    pub patrol_date: Option<NaiveDate>,
    /// Only suggestions for this shift (case-insensitive).
    pub shift_period: Option<String>,
    /// Only suggestions with this status.
    pub status: Option<SuggestionStatus>,
}

/// Review metrics over a set of patrol suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionMetrics {
    /// Number of suggestions.
    pub total: u64,
    /// Suggestions with status `accepted`.
    pub accepted: u64,
    /// Suggestions with status `rejected`.
    pub rejected: u64,
    /// Suggestions with status `implemented`.
    pub implemented: u64,
    /// Mean confidence score, `0` for an empty set.
    pub average_confidence_score: f64,
}

/// Field to sort hotspots by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum HotspotSortKey {
    /// By risk level rank.
    RiskLevel,
    /// By incidents per square kilometer.
    CrimeDensity,
    /// By most recent member incident.
    LastUpdated,
}

/// Sort options for hotspot queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotSort {
    /// Field to sort by.
    pub key: HotspotSortKey,
    /// Ascending when `true`, descending otherwise.
    #[serde(default)]
    pub ascending: bool,
}

/// Filters for hotspot queries. All supplied filters are `AND`ed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotspotFilter {
    /// Only hotspots at exactly this risk level.
    pub risk_level: Option<RiskLevel>,
    /// Only hotspots with at least this density (incidents per km²).
    pub min_density: Option<f64>,
    /// Only hotspots listing this crime type among their dominant types
    /// (case-insensitive).
    pub crime_type: Option<String>,
}

impl HotspotFilter {
    /// Returns `true` if no filter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.risk_level.is_none() && self.min_density.is_none() && self.crime_type.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_record_deserializes_with_defaults() {
        let json = r#"{
            "id": "prediction_001",
            "location": {"latitude": 19.19, "longitude": 72.97, "areaName": "Thane West"},
            "riskScore": 0.82,
            "predictedCrimeTypes": [
                {"crimeType": "Theft", "probability": 0.6, "expectedIncidents": 3}
            ],
            "generatedAt": "2024-03-01T06:00:00Z"
        }"#;
        let record: PredictionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, PredictionStatus::Active);
        assert_eq!(record.location.area_name.as_deref(), Some("Thane West"));
        assert!((record.location.point.latitude - 19.19).abs() < f64::EPSILON);
        assert_eq!(record.predicted_crime_types[0].expected_incidents, 3);
    }

    #[test]
    fn sort_key_parses_from_cli_and_json_forms() {
        assert_eq!(
            "risk-level".parse::<HotspotSortKey>().unwrap(),
            HotspotSortKey::RiskLevel
        );
        assert_eq!(
            "Crime-Density".parse::<HotspotSortKey>().unwrap(),
            HotspotSortKey::CrimeDensity
        );
        let json: HotspotSortKey = serde_json::from_str(r#""lastUpdated""#).unwrap();
        assert_eq!(json, HotspotSortKey::LastUpdated);
    }

    #[test]
    fn patrol_suggestion_deserializes_with_defaults() {
        let json = r#"{
            "id": "ai_suggestion_001",
            "generatedAt": "2023-07-16T20:30:00Z",
            "patrolDate": "2023-07-17",
            "priorityZones": [{
                "zoneName": "West Central Market Area",
                "location": {"latitude": 19.076, "longitude": 72.8777},
                "riskLevel": "High",
                "confidenceScore": 0.89
            }],
            "confidenceScore": 0.82
        }"#;
        let suggestion: PatrolSuggestion = serde_json::from_str(json).unwrap();
        assert_eq!(suggestion.status, SuggestionStatus::Pending);
        assert_eq!(suggestion.patrol_date.to_string(), "2023-07-17");
        assert_eq!(suggestion.priority_zones[0].risk_level, RiskLevel::High);
        assert!(suggestion.priority_zones[0].recommended_patrol_time.is_none());
        assert_eq!(
            "IMPLEMENTED".parse::<SuggestionStatus>().unwrap(),
            SuggestionStatus::Implemented
        );
    }

    #[test]
    fn empty_filter() {
        assert!(HotspotFilter::default().is_empty());
        let filter: HotspotFilter = serde_json::from_str(r#"{"riskLevel": "High"}"#).unwrap();
        assert_eq!(filter.risk_level, Some(RiskLevel::High));
        assert!(!filter.is_empty());
    }
}
