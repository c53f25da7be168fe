#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident severity and risk level taxonomy types.
//!
//! This crate defines the canonical severity scale attached to every
//! incident and the categorical risk level assigned to hotspots. Both
//! scales are fixed: their weights, ranks and thresholds are part of the
//! public contract and are tested at their boundaries.

use chrono::{DateTime, Utc};
use crime_risk_geography_models::GeoPoint;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity reported for a single incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    /// Minor offenses (petty theft, trespassing)
    Low,
    /// Moderate offenses (burglary, vandalism)
    Medium,
    /// Serious offenses (robbery, aggravated assault)
    High,
    /// Most severe offenses (homicide, armed assault)
    Critical,
}

impl Severity {
    /// Returns the weight this severity contributes to a risk score.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Low => 0.25,
            Self::Medium => 0.5,
            Self::High => 0.75,
            Self::Critical => 1.0,
        }
    }

    /// Parses a severity name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not one of `low`, `medium`, `high`
    /// or `critical`.
    pub fn from_name(name: &str) -> Result<Self, InvalidSeverityError> {
        name.trim().parse().map_err(|_| InvalidSeverityError {
            value: name.to_string(),
        })
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

/// Error returned when a string does not name a [`Severity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid severity name that was provided.
    pub value: String,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid severity '{}': expected low, medium, high or critical",
            self.value
        )
    }
}

impl std::error::Error for InvalidSeverityError {}

/// Categorical risk level assigned to a hotspot.
///
/// Ordering follows [`RiskLevel::rank`], so `Critical > High > Medium > Low`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RiskLevel {
    /// Score below 0.35
    Low,
    /// Score in `[0.35, 0.6)`
    Medium,
    /// Score in `[0.6, 0.8)`
    High,
    /// Score of 0.8 or above
    Critical,
}

impl RiskLevel {
    /// Lowest score that maps to [`RiskLevel::Critical`].
    pub const CRITICAL_THRESHOLD: f64 = 0.8;
    /// Lowest score that maps to [`RiskLevel::High`].
    pub const HIGH_THRESHOLD: f64 = 0.6;
    /// Lowest score that maps to [`RiskLevel::Medium`].
    pub const MEDIUM_THRESHOLD: f64 = 0.35;

    /// Maps a normalized risk score to its level.
    ///
    /// The thresholds are exact cut points: a score equal to a threshold
    /// belongs to the higher level.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= Self::CRITICAL_THRESHOLD {
            Self::Critical
        } else if score >= Self::HIGH_THRESHOLD {
            Self::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Returns the fixed sort rank: Critical 4, High 3, Medium 2, Low 1.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Returns all variants of this enum, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

/// A single point-located incident supplied by report intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Unique incident identifier.
    pub id: String,
    /// Where the incident happened.
    pub location: GeoPoint,
    /// Free-form crime type label (e.g. "Theft").
    pub crime_type: String,
    /// Reported severity.
    pub severity: Severity,
    /// When the incident happened.
    pub occurred_at: DateTime<Utc>,
}
