//! Review metrics over patrol suggestions, and patrol zones derived from
//! hotspots.

use crime_risk_analytics_models::{
    PatrolSuggestion, PriorityZone, SuggestionFilter, SuggestionMetrics, SuggestionStatus,
};
use crime_risk_crime_models::RiskLevel;
use crime_risk_hotspot_models::Hotspot;

use crate::{AnalyticsError, validate_score};

/// Counts suggestions by review outcome and averages their confidence.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidScore`] if any confidence score is not
/// a number in `[0, 1]`.
#[allow(clippy::cast_precision_loss)]
pub fn suggestion_metrics(
    suggestions: &[PatrolSuggestion],
) -> Result<SuggestionMetrics, AnalyticsError> {
    for suggestion in suggestions {
        validate_score(&suggestion.id, "confidenceScore", suggestion.confidence_score)?;
    }

    let with_status = |status: SuggestionStatus| -> u64 {
        suggestions.iter().filter(|s| s.status == status).count() as u64
    };

    let average_confidence_score = if suggestions.is_empty() {
        0.0
    } else {
        suggestions.iter().map(|s| s.confidence_score).sum::<f64>() / suggestions.len() as f64
    };

    Ok(SuggestionMetrics {
        total: suggestions.len() as u64,
        accepted: with_status(SuggestionStatus::Accepted),
        rejected: with_status(SuggestionStatus::Rejected),
        implemented: with_status(SuggestionStatus::Implemented),
        average_confidence_score,
    })
}

/// Suggestions with a confidence score of at least `threshold`, in input
/// order.
#[must_use]
pub fn suggestions_above_confidence(
    suggestions: &[PatrolSuggestion],
    threshold: f64,
) -> Vec<PatrolSuggestion> {
    suggestions
        .iter()
        .filter(|s| s.confidence_score >= threshold)
        .cloned()
        .collect()
}

/// Returns the suggestions matching every supplied filter, newest first.
/// Suggestions generated at the same instant keep their input order.
#[must_use]
pub fn filter_suggestions(
    suggestions: &[PatrolSuggestion],
    filter: &SuggestionFilter,
) -> Vec<PatrolSuggestion> {
    let shift = filter.shift_period.as_deref().map(str::to_lowercase);

    let mut matching: Vec<PatrolSuggestion> = suggestions
        .iter()
        .filter(|s| filter.patrol_date.is_none_or(|date| s.patrol_date == date))
        .filter(|s| filter.status.is_none_or(|status| s.status == status))
        .filter(|s| {
            shift.as_deref().is_none_or(|wanted| {
                s.shift_period
                    .as_deref()
                    .is_some_and(|period| period.to_lowercase() == wanted)
            })
        })
        .cloned()
        .collect();

    matching.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
    matching
}

const fn officers_for(level: RiskLevel) -> u32 {
    match level {
        RiskLevel::Critical => 3,
        RiskLevel::High => 2,
        RiskLevel::Medium | RiskLevel::Low => 1,
    }
}

/// Turns hotspots at or above `min_level` into patrol zones, most urgent
/// first.
///
/// Zones are ordered by risk level, then risk score, both descending, then
/// by hotspot id. The patrol window is the hotspot's busiest active hour and
/// the confidence is its risk score.
#[must_use]
pub fn priority_zones_from_hotspots(
    hotspots: &[Hotspot],
    min_level: RiskLevel,
) -> Vec<PriorityZone> {
    let mut selected: Vec<&Hotspot> = hotspots
        .iter()
        .filter(|h| h.risk_level >= min_level)
        .collect();
    selected.sort_by(|a, b| {
        b.risk_level
            .cmp(&a.risk_level)
            .then_with(|| b.risk_score.total_cmp(&a.risk_score))
            .then_with(|| a.id.cmp(&b.id))
    });

    selected
        .into_iter()
        .map(|h| PriorityZone {
            zone_name: h.id.clone(),
            location: h.center,
            risk_level: h.risk_level,
            recommended_patrol_time: h.active_hours.first().cloned(),
            suggested_officers: officers_for(h.risk_level),
            confidence_score: h.risk_score,
        })
        .collect()
}
