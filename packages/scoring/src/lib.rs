#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Deterministic risk scoring for incident clusters.
//!
//! A risk score in `[0, 1]` is a weighted combination of three terms:
//!
//! * **density**: `1 - exp(-count / density_saturation)`, so additional
//!   incidents have diminishing returns
//! * **recency**: `exp(-recency_days / recency_window_days)`, favoring
//!   clusters with recent activity
//! * **severity**: the count-weighted mean of [`Severity::weight`]
//!
//! The score is mapped to a [`RiskLevel`] with [`RiskLevel::from_score`].

use std::collections::BTreeMap;

use crime_risk_crime_models::{RiskLevel, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed deviation of the weight sum from 1.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Errors that can occur while scoring.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Weights were negative, non-finite, or did not sum to 1.
    #[error(
        "Invalid risk weights (density {density}, recency {recency}, severity {severity}): \
         weights must be non-negative and sum to 1"
    )]
    InvalidWeights {
        /// Density weight that was provided.
        density: f64,
        /// Recency weight that was provided.
        recency: f64,
        /// Severity weight that was provided.
        severity: f64,
    },

    /// A scoring parameter was out of range.
    #[error("Invalid scoring parameter {name} = {value}: must be positive and finite")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The value that was provided.
        value: f64,
    },

    /// Recency was negative or non-finite.
    #[error("Invalid recency {0} days: must be non-negative and finite")]
    InvalidRecency(f64),
}

/// Relative weights of the three score terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskWeights {
    /// Weight of the density term.
    pub density_weight: f64,
    /// Weight of the recency term.
    pub recency_weight: f64,
    /// Weight of the severity term.
    pub severity_weight: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            density_weight: 0.4,
            recency_weight: 0.3,
            severity_weight: 0.3,
        }
    }
}

impl RiskWeights {
    /// Checks that every weight is finite and non-negative and that they sum
    /// to 1.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidWeights`] otherwise.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let parts = [
            self.density_weight,
            self.recency_weight,
            self.severity_weight,
        ];
        let sum: f64 = parts.iter().sum();

        if parts.iter().all(|w| w.is_finite() && *w >= 0.0)
            && (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
        {
            Ok(())
        } else {
            Err(ScoringError::InvalidWeights {
                density: self.density_weight,
                recency: self.recency_weight,
                severity: self.severity_weight,
            })
        }
    }
}

/// Scoring configuration. Every field has a default, so a partial TOML or
/// JSON document is enough to override a single knob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskScoringConfig {
    /// Term weights.
    #[serde(flatten)]
    pub weights: RiskWeights,
    /// Incident count at which the density term reaches `1 - 1/e`.
    pub density_saturation: f64,
    /// Age in days at which the recency term decays to `1/e`.
    pub recency_window_days: f64,
}

impl Default for RiskScoringConfig {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            density_saturation: 5.0,
            recency_window_days: 7.0,
        }
    }
}

impl RiskScoringConfig {
    /// Validates weights and parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ScoringError> {
        self.weights.validate()?;
        positive("densitySaturation", self.density_saturation)?;
        positive("recencyWindowDays", self.recency_window_days)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScoringError::InvalidParameter { name, value })
    }
}

/// A normalized score and its categorical level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Score in `[0, 1]`.
    pub score: f64,
    /// Level derived from `score`.
    pub level: RiskLevel,
}

/// Scores a group of incidents.
///
/// * `incident_count`: number of incidents in the group
/// * `recency_days`: days since the most recent incident
/// * `severity_mix`: incident count per severity
///
/// # Errors
///
/// Returns [`ScoringError`] if the configuration is invalid or
/// `recency_days` is negative or non-finite.
pub fn score_risk(
    incident_count: u64,
    recency_days: f64,
    severity_mix: &BTreeMap<Severity, u64>,
    config: &RiskScoringConfig,
) -> Result<RiskAssessment, ScoringError> {
    config.validate()?;
    if !recency_days.is_finite() || recency_days < 0.0 {
        return Err(ScoringError::InvalidRecency(recency_days));
    }

    #[allow(clippy::cast_precision_loss)]
    let density = 1.0 - (-(incident_count as f64) / config.density_saturation).exp();
    let recency = (-recency_days / config.recency_window_days).exp();
    let severity = severity_term(severity_mix);

    let weights = config.weights;
    let score = (weights.density_weight * density
        + weights.recency_weight * recency
        + weights.severity_weight * severity)
        .clamp(0.0, 1.0);

    log::trace!(
        "score_risk: count={incident_count} recency_days={recency_days:.2} \
         density={density:.3} recency={recency:.3} severity={severity:.3} -> {score:.3}"
    );

    Ok(RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
    })
}

/// Count-weighted mean severity weight, or 0 for an empty mix.
#[allow(clippy::cast_precision_loss)]
fn severity_term(severity_mix: &BTreeMap<Severity, u64>) -> f64 {
    let total: u64 = severity_mix.values().sum();
    if total == 0 {
        return 0.0;
    }

    let weighted: f64 = severity_mix
        .iter()
        .map(|(severity, count)| severity.weight() * *count as f64)
        .sum();

    weighted / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix(entries: &[(Severity, u64)]) -> BTreeMap<Severity, u64> {
        entries.iter().copied().collect()
    }

    fn recency_only(recency_weight: f64) -> RiskScoringConfig {
        RiskScoringConfig {
            weights: RiskWeights {
                density_weight: 0.0,
                recency_weight,
                severity_weight: 1.0 - recency_weight,
            },
            ..RiskScoringConfig::default()
        }
    }

    #[test]
    fn level_cut_points_are_exact() {
        let empty = BTreeMap::new();
        let cases = [
            (0.8, RiskLevel::Critical),
            (0.6, RiskLevel::High),
            (0.35, RiskLevel::Medium),
        ];
        for (weight, expected) in cases {
            let assessment = score_risk(0, 0.0, &empty, &recency_only(weight)).unwrap();
            assert!((assessment.score - weight).abs() < f64::EPSILON);
            assert_eq!(assessment.level, expected, "score {weight}");
        }

        assert_eq!(RiskLevel::from_score(0.8 - 1e-12), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.6 - 1e-12), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.35 - 1e-12), RiskLevel::Low);
    }

    #[test]
    fn default_weights_split() {
        let weights = RiskWeights::default();
        assert!((weights.density_weight - 0.4).abs() < f64::EPSILON);
        assert!((weights.recency_weight - 0.3).abs() < f64::EPSILON);
        assert!((weights.severity_weight - 0.3).abs() < f64::EPSILON);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn three_recent_high_severity_incidents_score_high() {
        let assessment = score_risk(
            3,
            0.5,
            &mix(&[(Severity::High, 3)]),
            &RiskScoringConfig::default(),
        )
        .unwrap();
        assert!(assessment.score >= 0.6, "{}", assessment.score);
        assert!(assessment.level >= RiskLevel::High);
    }

    #[test]
    fn score_is_bounded() {
        let config = RiskScoringConfig::default();
        let max = score_risk(
            u64::MAX,
            0.0,
            &mix(&[(Severity::Critical, 10)]),
            &config,
        )
        .unwrap();
        assert!(max.score <= 1.0);
        assert_eq!(max.level, RiskLevel::Critical);

        let min = score_risk(0, 10_000.0, &BTreeMap::new(), &config).unwrap();
        assert!(min.score >= 0.0);
        assert_eq!(min.level, RiskLevel::Low);
    }

    #[test]
    fn more_recent_and_more_severe_scores_higher() {
        let config = RiskScoringConfig::default();
        let low = mix(&[(Severity::Low, 4)]);
        let critical = mix(&[(Severity::Critical, 4)]);

        let old = score_risk(4, 30.0, &low, &config).unwrap().score;
        let recent = score_risk(4, 1.0, &low, &config).unwrap().score;
        let severe = score_risk(4, 1.0, &critical, &config).unwrap().score;
        let denser = score_risk(12, 1.0, &critical, &config).unwrap().score;

        assert!(old < recent);
        assert!(recent < severe);
        assert!(severe < denser);
    }

    #[test]
    fn severity_term_is_weighted_mean() {
        let term = severity_term(&mix(&[(Severity::Low, 1), (Severity::Critical, 3)]));
        assert!((term - (0.25 + 3.0) / 4.0).abs() < 1e-12);
        assert!(severity_term(&BTreeMap::new()).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_weights_and_inputs() {
        let bad_sum = RiskScoringConfig {
            weights: RiskWeights {
                density_weight: 0.5,
                recency_weight: 0.5,
                severity_weight: 0.5,
            },
            ..RiskScoringConfig::default()
        };
        assert!(matches!(
            score_risk(1, 0.0, &BTreeMap::new(), &bad_sum),
            Err(ScoringError::InvalidWeights { .. })
        ));

        let negative = RiskScoringConfig {
            weights: RiskWeights {
                density_weight: 1.2,
                recency_weight: -0.2,
                severity_weight: 0.0,
            },
            ..RiskScoringConfig::default()
        };
        assert!(negative.validate().is_err());

        let config = RiskScoringConfig::default();
        assert!(matches!(
            score_risk(1, -1.0, &BTreeMap::new(), &config),
            Err(ScoringError::InvalidRecency(_))
        ));

        let zero_window = RiskScoringConfig {
            recency_window_days: 0.0,
            ..RiskScoringConfig::default()
        };
        assert!(matches!(
            zero_window.validate(),
            Err(ScoringError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: RiskScoringConfig = toml::from_str(
            "densityWeight = 0.5\nrecencyWeight = 0.25\nseverityWeight = 0.25\n",
        )
        .unwrap();
        assert!((config.weights.density_weight - 0.5).abs() < f64::EPSILON);
        assert!((config.density_saturation - 5.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());

        let json: RiskScoringConfig = serde_json::from_str(r#"{"recencyWindowDays": 14}"#).unwrap();
        assert!((json.recency_window_days - 14.0).abs() < f64::EPSILON);
        assert_eq!(json.weights, RiskWeights::default());
    }
}
