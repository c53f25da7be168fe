//! `GeoJSON` export of hotspots for map views.
//!
//! Each hotspot becomes a `Point` feature at its center carrying the
//! hotspot's attributes as properties, so a map layer can size circles by
//! `radiusMeters` and color them by `riskLevel`.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, feature::Id};

use crate::Hotspot;

/// Converts hotspots into a `FeatureCollection`, preserving order.
#[must_use]
pub fn hotspots_to_geojson(hotspots: &[Hotspot]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: hotspots.iter().map(hotspot_feature).collect(),
        foreign_members: None,
    }
}

fn hotspot_feature(hotspot: &Hotspot) -> Feature {
    let point = geo::Point::new(hotspot.center.longitude, hotspot.center.latitude);

    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), serde_json::json!(hotspot.id));
    properties.insert(
        "riskLevel".to_string(),
        serde_json::json!(hotspot.risk_level.to_string()),
    );
    properties.insert("riskScore".to_string(), serde_json::json!(hotspot.risk_score));
    properties.insert(
        "radiusMeters".to_string(),
        serde_json::json!(hotspot.radius_meters),
    );
    properties.insert(
        "crimeDensity".to_string(),
        serde_json::json!(hotspot.crime_density),
    );
    properties.insert(
        "incidentCount".to_string(),
        serde_json::json!(hotspot.incident_count),
    );
    properties.insert(
        "dominantCrimeTypes".to_string(),
        serde_json::json!(hotspot.dominant_crime_types),
    );
    properties.insert(
        "activeHours".to_string(),
        serde_json::json!(hotspot.active_hours),
    );
    properties.insert(
        "lastUpdated".to_string(),
        serde_json::json!(hotspot.last_updated.to_rfc3339()),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&point))),
        id: Some(Id::String(hotspot.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}
