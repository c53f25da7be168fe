//! Reading incident and prediction batches from disk.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use crime_risk_analytics_models::{PatrolSuggestion, PredictionRecord};
use crime_risk_crime_models::{IncidentRecord, Severity};
use crime_risk_geography_models::GeoPoint;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading an input file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// JSON input did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV input could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV row parsed but holds an unusable value.
    #[error("Invalid row {row}: {message}")]
    InvalidRow {
        /// 1-based data row number (the header is row 0).
        row: usize,
        /// Description of what is wrong.
        message: String,
    },
}

/// On-disk format of an incident batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// A JSON array of incident objects.
    Json,
    /// CSV with `id,latitude,longitude,crime_type,severity,occurred_at`.
    Csv,
}

impl InputFormat {
    /// Guesses the format from the file extension, defaulting to JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvIncident {
    id: String,
    latitude: f64,
    longitude: f64,
    crime_type: String,
    severity: String,
    occurred_at: DateTime<Utc>,
}

fn read_file(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads incidents from `path`. When `format` is `None` it is inferred from
/// the extension.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read or parsed.
pub fn read_incidents(
    path: &Path,
    format: Option<InputFormat>,
) -> Result<Vec<IncidentRecord>, InputError> {
    let format = format.unwrap_or_else(|| InputFormat::from_path(path));
    let contents = read_file(path)?;

    let incidents = match format {
        InputFormat::Json => parse_incidents_json(&contents)?,
        InputFormat::Csv => parse_incidents_csv(contents.as_bytes())?,
    };

    log::info!(
        "Read {} incidents from {} ({format:?})",
        incidents.len(),
        path.display()
    );
    Ok(incidents)
}

/// Parses a JSON array of incidents.
///
/// # Errors
///
/// Returns [`InputError::Json`] if the text is not a valid incident array.
pub fn parse_incidents_json(json: &str) -> Result<Vec<IncidentRecord>, InputError> {
    Ok(serde_json::from_str(json)?)
}

/// Parses incidents from CSV with a header row. Severity names are matched
/// case-insensitively and timestamps must be RFC 3339.
///
/// # Errors
///
/// Returns [`InputError::Csv`] for malformed rows and
/// [`InputError::InvalidRow`] for unknown severities.
pub fn parse_incidents_csv(reader: impl Read) -> Result<Vec<IncidentRecord>, InputError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut incidents = Vec::new();
    for (i, result) in reader.deserialize::<CsvIncident>().enumerate() {
        let row = result?;
        let severity =
            Severity::from_name(&row.severity).map_err(|e| InputError::InvalidRow {
                row: i + 1,
                message: e.to_string(),
            })?;

        incidents.push(IncidentRecord {
            id: row.id,
            location: GeoPoint {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            crime_type: row.crime_type,
            severity,
            occurred_at: row.occurred_at,
        });
    }

    Ok(incidents)
}

/// Reads a JSON array of predictions from `path`.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read or parsed.
pub fn read_predictions(path: &Path) -> Result<Vec<PredictionRecord>, InputError> {
    let predictions: Vec<PredictionRecord> = serde_json::from_str(&read_file(path)?)?;
    log::info!(
        "Read {} predictions from {}",
        predictions.len(),
        path.display()
    );
    Ok(predictions)
}

/// Reads a JSON array of patrol suggestions from `path`.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read or parsed.
pub fn read_suggestions(path: &Path) -> Result<Vec<PatrolSuggestion>, InputError> {
    let suggestions: Vec<PatrolSuggestion> = serde_json::from_str(&read_file(path)?)?;
    log::info!(
        "Read {} patrol suggestions from {}",
        suggestions.len(),
        path.display()
    );
    Ok(suggestions)
}
