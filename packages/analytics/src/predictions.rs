//! Filtering and summary statistics over prediction records.

use crime_risk_analytics_models::{PredictionFilter, PredictionRecord, PredictionStatistics};

use crate::{AnalyticsError, validate_score};

/// Risk score at or above which a prediction counts as high risk.
pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Risk score at or above which a prediction counts as medium risk.
const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Summarizes a set of predictions.
///
/// Crime types are tallied by `expected_incidents`, with a prediction that
/// expects zero incidents still counting once. Ties for the most common
/// crime type and for the highest risk area go to whichever was encountered
/// first.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidScore`] if any risk score is not a
/// number in `[0, 1]`, since it would fall into no bucket.
#[allow(clippy::cast_precision_loss)]
pub fn compute_statistics(
    predictions: &[PredictionRecord],
) -> Result<PredictionStatistics, AnalyticsError> {
    for prediction in predictions {
        validate_score(&prediction.id, "riskScore", prediction.risk_score)?;
    }

    if predictions.is_empty() {
        return Ok(PredictionStatistics::empty());
    }

    let total_risk: f64 = predictions.iter().map(|p| p.risk_score).sum();
    let average = total_risk / predictions.len() as f64;

    let count_where = |pred: fn(f64) -> bool| -> u64 {
        predictions.iter().filter(|p| pred(p.risk_score)).count() as u64
    };

    let stats = PredictionStatistics {
        total: predictions.len() as u64,
        average_risk_score: (average * 100.0).round() / 100.0,
        high_risk_count: count_where(|s| s >= DEFAULT_HIGH_RISK_THRESHOLD),
        medium_risk_count: count_where(|s| {
            (MEDIUM_RISK_THRESHOLD..DEFAULT_HIGH_RISK_THRESHOLD).contains(&s)
        }),
        low_risk_count: count_where(|s| s < MEDIUM_RISK_THRESHOLD),
        most_common_crime_type: most_common_crime_type(predictions),
        highest_risk_area: highest_risk_area(predictions),
    };

    log::debug!(
        "Computed statistics over {} predictions (average risk {})",
        stats.total,
        stats.average_risk_score
    );

    Ok(stats)
}

fn most_common_crime_type(predictions: &[PredictionRecord]) -> Option<String> {
    // Insertion-ordered tally so ties resolve to the first type seen.
    let mut tally: Vec<(&str, u64)> = Vec::new();
    for crime in predictions.iter().flat_map(|p| &p.predicted_crime_types) {
        let weight = u64::from(crime.expected_incidents.max(1));
        match tally.iter_mut().find(|(t, _)| *t == crime.crime_type) {
            Some((_, count)) => *count += weight,
            None => tally.push((crime.crime_type.as_str(), weight)),
        }
    }

    let mut best: Option<(&str, u64)> = None;
    for (crime_type, count) in tally {
        if best.is_none_or(|(_, max)| count > max) {
            best = Some((crime_type, count));
        }
    }
    best.map(|(t, _)| t.to_string())
}

fn highest_risk_area(predictions: &[PredictionRecord]) -> Option<String> {
    let mut best: Option<&PredictionRecord> = None;
    for prediction in predictions {
        if best.is_none_or(|b| prediction.risk_score > b.risk_score) {
            best = Some(prediction);
        }
    }
    best.and_then(|p| p.location.area_name.clone())
}

/// Returns the predictions matching every supplied filter, highest risk
/// first. Equal scores keep their input order.
#[must_use]
pub fn filter_predictions(
    predictions: &[PredictionRecord],
    filter: &PredictionFilter,
) -> Vec<PredictionRecord> {
    let area = filter.area_name.as_deref().map(str::to_lowercase);

    let mut matching: Vec<PredictionRecord> = predictions
        .iter()
        .filter(|p| filter.status.is_none_or(|status| p.status == status))
        .filter(|p| filter.min_risk_score.is_none_or(|min| p.risk_score >= min))
        .filter(|p| {
            area.as_deref().is_none_or(|wanted| {
                p.location
                    .area_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase() == wanted)
            })
        })
        .cloned()
        .collect();

    matching.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    matching
}

/// Predictions with a risk score of at least `min_risk_score`
/// ([`DEFAULT_HIGH_RISK_THRESHOLD`] when `None`), highest risk first.
#[must_use]
pub fn high_risk_predictions(
    predictions: &[PredictionRecord],
    min_risk_score: Option<f64>,
) -> Vec<PredictionRecord> {
    filter_predictions(
        predictions,
        &PredictionFilter {
            min_risk_score: Some(min_risk_score.unwrap_or(DEFAULT_HIGH_RISK_THRESHOLD)),
            ..PredictionFilter::default()
        },
    )
}
