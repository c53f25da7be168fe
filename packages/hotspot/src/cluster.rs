//! Seed-ordered density-radius clustering.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Timelike as _, Utc};
use crime_risk_crime_models::{IncidentRecord, Severity};
use crime_risk_geography_models::GeoPoint;
use crime_risk_hotspot_models::{ClusterConfig, ClusterOutcome, Hotspot};
use crime_risk_scoring::score_risk;
use crime_risk_spatial::{PointIndex, centroid, distance_meters};

use crate::HotspotError;

/// Floor applied to a hotspot radius so it stays positive when every member
/// shares one location.
const MIN_RADIUS_METERS: f64 = 1.0;

/// Number of one-hour windows reported in [`Hotspot::active_hours`].
const ACTIVE_HOUR_WINDOWS: usize = 3;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Checks the clustering configuration.
///
/// # Errors
///
/// Returns [`HotspotError::InvalidConfig`] if `min_points` is zero, a radius
/// is not a positive finite number, or the scoring configuration is invalid.
pub fn validate_config(config: &ClusterConfig) -> Result<(), HotspotError> {
    if config.min_points < 1 {
        return Err(HotspotError::InvalidConfig {
            message: "minPoints must be at least 1".to_string(),
        });
    }

    for (name, value) in [
        ("clusterRadiusMeters", config.cluster_radius_meters),
        ("maxRadiusMeters", config.max_radius_meters),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(HotspotError::InvalidConfig {
                message: format!("{name} must be a positive number of meters, got {value}"),
            });
        }
    }

    config
        .scoring
        .validate()
        .map_err(|e| HotspotError::InvalidConfig {
            message: e.to_string(),
        })
}

/// Clusters `incidents` into hotspots.
///
/// # Errors
///
/// Returns [`HotspotError`] if the configuration is invalid, an incident has
/// an invalid location, or two incidents share an id.
pub fn build_hotspots(
    incidents: &[IncidentRecord],
    config: &ClusterConfig,
) -> Result<Vec<Hotspot>, HotspotError> {
    cluster_incidents(incidents, config).map(|outcome| outcome.hotspots)
}

/// Clusters `incidents` into hotspots and also reports which incidents were
/// left out of every hotspot.
///
/// # Errors
///
/// See [`build_hotspots`].
pub fn cluster_incidents(
    incidents: &[IncidentRecord],
    config: &ClusterConfig,
) -> Result<ClusterOutcome, HotspotError> {
    validate_config(config)?;
    validate_incidents(incidents)?;

    let mut ordered: Vec<&IncidentRecord> = incidents.iter().collect();
    ordered.sort_by(|a, b| {
        a.occurred_at
            .cmp(&b.occurred_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let locations: Vec<GeoPoint> = ordered.iter().map(|i| i.location).collect();
    let index = PointIndex::build(&locations)?;

    let Some(reference_time) = config
        .reference_time
        .or_else(|| ordered.last().map(|i| i.occurred_at))
    else {
        log::debug!("No incidents to cluster");
        return Ok(ClusterOutcome {
            hotspots: Vec::new(),
            unclustered_ids: Vec::new(),
        });
    };

    let mut assigned = vec![false; ordered.len()];
    let mut visited = vec![false; ordered.len()];
    let mut hotspots = Vec::new();

    for seed in 0..ordered.len() {
        if assigned[seed] || visited[seed] {
            continue;
        }

        let candidates: Vec<usize> = index
            .within_radius(&locations[seed], config.cluster_radius_meters)?
            .into_iter()
            .filter(|&position| !assigned[position])
            .collect();

        let id = format!("HS-{:03}", hotspots.len() + 1);
        match form_hotspot(id, &ordered, &candidates, reference_time, config)? {
            Some((hotspot, members)) => {
                log::debug!(
                    "Seed '{}' formed {} with {} members ({} risk)",
                    ordered[seed].id,
                    hotspot.id,
                    members.len(),
                    hotspot.risk_level
                );
                for position in members {
                    assigned[position] = true;
                }
                hotspots.push(hotspot);
            }
            None => {
                log::trace!(
                    "Seed '{}' has {} unassigned neighbors, below minPoints {}",
                    ordered[seed].id,
                    candidates.len(),
                    config.min_points
                );
            }
        }

        visited[seed] = true;
    }

    let unclustered_ids: Vec<String> = ordered
        .iter()
        .zip(&assigned)
        .filter(|(_, assigned)| !**assigned)
        .map(|(incident, _)| incident.id.clone())
        .collect();

    log::info!(
        "Built {} hotspots from {} incidents ({} unclustered)",
        hotspots.len(),
        incidents.len(),
        unclustered_ids.len()
    );

    Ok(ClusterOutcome {
        hotspots,
        unclustered_ids,
    })
}

fn validate_incidents(incidents: &[IncidentRecord]) -> Result<(), HotspotError> {
    let mut seen = BTreeSet::new();
    for incident in incidents {
        incident
            .location
            .validate()
            .map_err(|source| HotspotError::InvalidLocation {
                id: incident.id.clone(),
                source,
            })?;
        if !seen.insert(incident.id.as_str()) {
            return Err(HotspotError::DuplicateIncident(incident.id.clone()));
        }
    }
    Ok(())
}

/// Builds a hotspot from the candidate positions, or returns `None` if too
/// few candidates remain within `max_radius_meters` of their centroid.
///
/// Returns the hotspot together with the positions of its members.
fn form_hotspot(
    id: String,
    ordered: &[&IncidentRecord],
    candidates: &[usize],
    reference_time: DateTime<Utc>,
    config: &ClusterConfig,
) -> Result<Option<(Hotspot, Vec<usize>)>, HotspotError> {
    if candidates.len() < config.min_points {
        return Ok(None);
    }

    let points: Vec<GeoPoint> = candidates.iter().map(|&p| ordered[p].location).collect();
    let Some(center) = centroid(&points)? else {
        return Ok(None);
    };

    let mut members = Vec::with_capacity(candidates.len());
    let mut radius_meters: f64 = 0.0;
    for &position in candidates {
        let distance = distance_meters(&ordered[position].location, &center)?;
        if distance <= config.max_radius_meters {
            members.push(position);
            radius_meters = radius_meters.max(distance);
        }
    }

    if members.len() < config.min_points {
        log::trace!(
            "{} of {} candidates lie beyond maxRadiusMeters {}",
            candidates.len() - members.len(),
            candidates.len(),
            config.max_radius_meters
        );
        return Ok(None);
    }

    let radius_meters = radius_meters.max(MIN_RADIUS_METERS);
    let member_records: Vec<&IncidentRecord> = members.iter().map(|&p| ordered[p]).collect();

    let mut severity_mix: BTreeMap<Severity, u64> = BTreeMap::new();
    for incident in &member_records {
        *severity_mix.entry(incident.severity).or_default() += 1;
    }

    let first_incident_at = member_records
        .iter()
        .map(|i| i.occurred_at)
        .min()
        .unwrap_or(reference_time);
    let last_updated = member_records
        .iter()
        .map(|i| i.occurred_at)
        .max()
        .unwrap_or(reference_time);

    #[allow(clippy::cast_precision_loss)]
    let recency_days =
        ((reference_time - last_updated).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0);

    let assessment = score_risk(
        member_records.len() as u64,
        recency_days,
        &severity_mix,
        &config.scoring,
    )?;

    let area_sq_km = std::f64::consts::PI * radius_meters * radius_meters / 1_000_000.0;
    #[allow(clippy::cast_precision_loss)]
    let crime_density = member_records.len() as f64 / area_sq_km;

    let hotspot = Hotspot {
        id,
        center,
        radius_meters,
        risk_level: assessment.level,
        risk_score: assessment.score,
        crime_density,
        dominant_crime_types: rank_crime_types(&member_records),
        member_incident_ids: member_records.iter().map(|i| i.id.clone()).collect(),
        incident_count: member_records.len(),
        severity_mix,
        active_hours: active_hours(&member_records),
        first_incident_at,
        last_updated,
    };

    Ok(Some((hotspot, members)))
}

/// Crime types by member count, most frequent first, ties alphabetical.
fn rank_crime_types(members: &[&IncidentRecord]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for incident in members {
        *counts.entry(incident.crime_type.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // BTreeMap iteration is alphabetical and the sort is stable.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(t, _)| t.to_string()).collect()
}

/// The busiest one-hour windows, by count then hour.
fn active_hours(members: &[&IncidentRecord]) -> Vec<String> {
    let mut counts = [0usize; 24];
    for incident in members {
        counts[incident.occurred_at.hour() as usize] += 1;
    }

    let mut hours: Vec<(usize, usize)> = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(hour, count)| (hour, *count))
        .collect();
    hours.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    hours
        .into_iter()
        .take(ACTIVE_HOUR_WINDOWS)
        .map(|(hour, _)| format!("{hour:02}:00-{:02}:00", (hour + 1) % 24))
        .collect()
}
