//! Sorting, filtering and proximity queries over hotspots.

use std::cmp::Ordering;

use crime_risk_analytics_models::{HotspotFilter, HotspotSortKey};
use crime_risk_geography_models::GeoPoint;
use crime_risk_hotspot_models::Hotspot;
use crime_risk_spatial::{distance_meters, is_within_radius};

use crate::AnalyticsError;

/// Returns the hotspots ordered by `key`.
///
/// Risk levels compare by rank (Critical 4, High 3, Medium 2, Low 1). Ties
/// are broken by `id` ascending in both directions so the order is stable.
#[must_use]
pub fn sort_hotspots(hotspots: &[Hotspot], key: HotspotSortKey, ascending: bool) -> Vec<Hotspot> {
    let mut sorted = hotspots.to_vec();
    sorted.sort_by(|a, b| {
        let primary = compare_by_key(a, b, key);
        let primary = if ascending { primary } else { primary.reverse() };
        primary.then_with(|| a.id.cmp(&b.id))
    });
    sorted
}

fn compare_by_key(a: &Hotspot, b: &Hotspot, key: HotspotSortKey) -> Ordering {
    match key {
        HotspotSortKey::RiskLevel => a.risk_level.rank().cmp(&b.risk_level.rank()),
        HotspotSortKey::CrimeDensity => a.crime_density.total_cmp(&b.crime_density),
        HotspotSortKey::LastUpdated => a.last_updated.cmp(&b.last_updated),
    }
}

/// Returns the hotspots matching every supplied filter, in input order.
#[must_use]
pub fn filter_hotspots(hotspots: &[Hotspot], filter: &HotspotFilter) -> Vec<Hotspot> {
    let crime_type = filter.crime_type.as_deref().map(str::to_lowercase);

    hotspots
        .iter()
        .filter(|h| filter.risk_level.is_none_or(|level| h.risk_level == level))
        .filter(|h| filter.min_density.is_none_or(|min| h.crime_density >= min))
        .filter(|h| {
            crime_type.as_deref().is_none_or(|wanted| {
                h.dominant_crime_types
                    .iter()
                    .any(|t| t.to_lowercase() == wanted)
            })
        })
        .cloned()
        .collect()
}

/// Looks up a hotspot by id.
#[must_use]
pub fn find_hotspot<'a>(hotspots: &'a [Hotspot], id: &str) -> Option<&'a Hotspot> {
    hotspots.iter().find(|h| h.id == id)
}

/// Returns every hotspot whose circle contains `point`, in input order.
///
/// # Errors
///
/// Returns [`AnalyticsError::Spatial`] if `point` or a hotspot is invalid.
pub fn hotspots_containing<'a>(
    hotspots: &'a [Hotspot],
    point: &GeoPoint,
) -> Result<Vec<&'a Hotspot>, AnalyticsError> {
    let mut containing = Vec::new();
    for hotspot in hotspots {
        if is_within_radius(point, &hotspot.center, hotspot.radius_meters)? {
            containing.push(hotspot);
        }
    }
    Ok(containing)
}

/// Returns the hotspot whose center is closest to `point`, with the distance
/// in meters. Equal distances resolve to the smaller id.
///
/// # Errors
///
/// Returns [`AnalyticsError::Spatial`] if `point` or a hotspot is invalid.
pub fn nearest_hotspot<'a>(
    hotspots: &'a [Hotspot],
    point: &GeoPoint,
) -> Result<Option<(&'a Hotspot, f64)>, AnalyticsError> {
    let mut best: Option<(&Hotspot, f64)> = None;

    for hotspot in hotspots {
        let distance = distance_meters(point, &hotspot.center)?;
        best = match best {
            Some((current, current_distance))
                if current_distance < distance
                    || (current_distance.total_cmp(&distance) == Ordering::Equal
                        && current.id <= hotspot.id) =>
            {
                Some((current, current_distance))
            }
            _ => Some((hotspot, distance)),
        };
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::{DateTime, TimeZone as _, Utc};
    use crime_risk_crime_models::RiskLevel;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap()
    }

    fn hotspot(id: &str, risk_level: RiskLevel, crime_density: f64, day: u32) -> Hotspot {
        Hotspot {
            id: id.to_string(),
            center: GeoPoint {
                latitude: 19.2,
                longitude: 72.9,
            },
            radius_meters: 300.0,
            risk_level,
            risk_score: 0.5,
            crime_density,
            dominant_crime_types: vec!["Theft".to_string(), "Burglary".to_string()],
            member_incident_ids: BTreeSet::new(),
            incident_count: 3,
            severity_mix: BTreeMap::new(),
            active_hours: Vec::new(),
            first_incident_at: at(day),
            last_updated: at(day),
        }
    }

    fn ids(hotspots: &[Hotspot]) -> Vec<&str> {
        hotspots.iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn sorts_by_risk_level_descending() {
        let hotspots = [
            hotspot("HS-001", RiskLevel::Low, 1.0, 1),
            hotspot("HS-002", RiskLevel::Critical, 1.0, 1),
            hotspot("HS-003", RiskLevel::Medium, 1.0, 1),
        ];
        let sorted = sort_hotspots(&hotspots, HotspotSortKey::RiskLevel, false);
        let levels: Vec<RiskLevel> = sorted.iter().map(|h| h.risk_level).collect();
        assert_eq!(
            levels,
            vec![RiskLevel::Critical, RiskLevel::Medium, RiskLevel::Low]
        );

        let ascending = sort_hotspots(&hotspots, HotspotSortKey::RiskLevel, true);
        assert_eq!(ids(&ascending), vec!["HS-001", "HS-003", "HS-002"]);
    }

    #[test]
    fn ties_break_by_id_in_both_directions() {
        let hotspots = [
            hotspot("HS-003", RiskLevel::High, 5.0, 1),
            hotspot("HS-001", RiskLevel::High, 5.0, 1),
            hotspot("HS-002", RiskLevel::High, 5.0, 1),
        ];
        for ascending in [true, false] {
            for key in [
                HotspotSortKey::RiskLevel,
                HotspotSortKey::CrimeDensity,
                HotspotSortKey::LastUpdated,
            ] {
                let sorted = sort_hotspots(&hotspots, key, ascending);
                assert_eq!(ids(&sorted), vec!["HS-001", "HS-002", "HS-003"]);
            }
        }
    }

    #[test]
    fn sorts_by_density_and_recency() {
        let hotspots = [
            hotspot("a", RiskLevel::Low, 20.0, 3),
            hotspot("b", RiskLevel::Low, 45.2, 1),
            hotspot("c", RiskLevel::Low, 18.5, 2),
        ];
        assert_eq!(
            ids(&sort_hotspots(&hotspots, HotspotSortKey::CrimeDensity, false)),
            vec!["b", "a", "c"]
        );
        assert_eq!(
            ids(&sort_hotspots(&hotspots, HotspotSortKey::CrimeDensity, true)),
            vec!["c", "a", "b"]
        );
        assert_eq!(
            ids(&sort_hotspots(&hotspots, HotspotSortKey::LastUpdated, true)),
            vec!["b", "c", "a"]
        );
    }

    #[test]
    fn filters_are_anded() {
        let mut vandalism = hotspot("c", RiskLevel::High, 50.0, 1);
        vandalism.dominant_crime_types = vec!["Vandalism".to_string()];
        let hotspots = [
            hotspot("a", RiskLevel::High, 10.0, 1),
            hotspot("b", RiskLevel::High, 40.0, 1),
            vandalism,
            hotspot("d", RiskLevel::Low, 90.0, 1),
        ];

        assert_eq!(
            ids(&filter_hotspots(&hotspots, &HotspotFilter::default())),
            vec!["a", "b", "c", "d"]
        );

        let filter = HotspotFilter {
            risk_level: Some(RiskLevel::High),
            min_density: Some(20.0),
            crime_type: Some("theft".to_string()),
        };
        assert_eq!(ids(&filter_hotspots(&hotspots, &filter)), vec!["b"]);

        let by_type = HotspotFilter {
            crime_type: Some("VANDALISM".to_string()),
            ..HotspotFilter::default()
        };
        assert_eq!(ids(&filter_hotspots(&hotspots, &by_type)), vec!["c"]);

        let min_density = HotspotFilter {
            min_density: Some(40.0),
            ..HotspotFilter::default()
        };
        assert_eq!(
            ids(&filter_hotspots(&hotspots, &min_density)),
            vec!["b", "c", "d"]
        );
    }

    #[test]
    fn proximity_queries() {
        let mut far = hotspot("HS-002", RiskLevel::High, 1.0, 1);
        far.center = GeoPoint {
            latitude: 19.3,
            longitude: 72.9,
        };
        let hotspots = [hotspot("HS-001", RiskLevel::Low, 1.0, 1), far];

        let inside = GeoPoint {
            latitude: 19.2005,
            longitude: 72.9,
        };
        let containing = hotspots_containing(&hotspots, &inside).unwrap();
        assert_eq!(containing.len(), 1);
        assert_eq!(containing[0].id, "HS-001");

        let (nearest, distance) = nearest_hotspot(&hotspots, &inside).unwrap().unwrap();
        assert_eq!(nearest.id, "HS-001");
        assert!(distance < 100.0);

        let near_far = GeoPoint {
            latitude: 19.29,
            longitude: 72.9,
        };
        assert_eq!(
            nearest_hotspot(&hotspots, &near_far).unwrap().unwrap().0.id,
            "HS-002"
        );
        assert!(hotspots_containing(&hotspots, &near_far).unwrap().is_empty());

        assert!(nearest_hotspot(&[], &inside).unwrap().is_none());
        assert_eq!(find_hotspot(&hotspots, "HS-002").unwrap().id, "HS-002");
        assert!(find_hotspot(&hotspots, "HS-404").is_none());
    }

    #[test]
    fn nearest_ties_resolve_to_smaller_id() {
        let hotspots = [
            hotspot("HS-009", RiskLevel::Low, 1.0, 1),
            hotspot("HS-004", RiskLevel::Low, 1.0, 1),
        ];
        let point = GeoPoint {
            latitude: 19.21,
            longitude: 72.9,
        };
        assert_eq!(
            nearest_hotspot(&hotspots, &point).unwrap().unwrap().0.id,
            "HS-004"
        );
    }

    #[test]
    fn proximity_rejects_invalid_point() {
        let hotspots = [hotspot("HS-001", RiskLevel::Low, 1.0, 1)];
        let bad = GeoPoint {
            latitude: -91.0,
            longitude: 0.0,
        };
        assert!(hotspots_containing(&hotspots, &bad).is_err());
        assert!(nearest_hotspot(&hotspots, &bad).is_err());
    }
}
