#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate query engine over hotspots, predictions and patrol suggestions.
//!
//! Every function is a read-only query over the slice it is given: sorting
//! and filtering hotspots, proximity lookups against hotspot circles, and
//! summary statistics over externally generated predictions and patrol
//! suggestions.

pub mod hotspots;
pub mod predictions;
pub mod suggestions;

use crime_risk_spatial::SpatialError;
use thiserror::Error;

pub use hotspots::{
    filter_hotspots, find_hotspot, hotspots_containing, nearest_hotspot, sort_hotspots,
};
pub use predictions::{
    DEFAULT_HIGH_RISK_THRESHOLD, compute_statistics, filter_predictions, high_risk_predictions,
};
pub use suggestions::{
    filter_suggestions, priority_zones_from_hotspots, suggestion_metrics,
    suggestions_above_confidence,
};

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A geo primitive rejected its input.
    #[error("Spatial error: {0}")]
    Spatial(#[from] SpatialError),

    /// A score that must lie in `[0, 1]` is out of range or not a number.
    #[error("Record '{id}' has invalid {field} {value}, expected a number in [0, 1]")]
    InvalidScore {
        /// Id of the offending record.
        id: String,
        /// Name of the score field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Checks that `value` is a finite score in `[0, 1]`.
pub(crate) fn validate_score(
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), AnalyticsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidScore {
            id: id.to_string(),
            field,
            value,
        })
    }
}
