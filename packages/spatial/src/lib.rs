#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geo primitives for hotspot clustering.
//!
//! Provides great-circle distance on a spherical earth, radius and
//! bounding-box containment tests, centroids, and an R-tree backed
//! [`PointIndex`] for radius queries over many points. Every function
//! validates its coordinates and fails instead of returning a meaningless
//! distance.

mod index;

use crime_risk_geography_models::{BoundingBox, GeoPoint, InvalidCoordinateError};
use geo::{Centroid, Intersects, MultiPoint, Point, Rect, coord};
use thiserror::Error;

pub use index::PointIndex;

/// Mean earth radius used for all distance calculations.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Slack added to computed bounding boxes so points sitting exactly on the
/// circle survive floating point rounding.
const BBOX_PAD_DEGREES: f64 = 1e-9;

/// Errors that can occur in geo primitives.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// A latitude or longitude was non-finite or out of range.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] InvalidCoordinateError),

    /// A radius was negative or non-finite.
    #[error("Invalid radius {radius_meters}: expected a non-negative, finite number of meters")]
    InvalidRadius {
        /// The radius that was provided.
        radius_meters: f64,
    },
}

/// Great-circle distance in meters between two points (haversine formula).
///
/// # Errors
///
/// Returns [`SpatialError::InvalidCoordinate`] if either point is invalid.
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> Result<f64, SpatialError> {
    a.validate()?;
    b.validate()?;
    Ok(haversine_meters(a, b))
}

/// Returns `true` if `point` lies within `radius_meters` of `center`
/// (inclusive).
///
/// # Errors
///
/// Returns [`SpatialError::InvalidRadius`] if the radius is negative or
/// non-finite, or [`SpatialError::InvalidCoordinate`] if either point is
/// invalid.
pub fn is_within_radius(
    point: &GeoPoint,
    center: &GeoPoint,
    radius_meters: f64,
) -> Result<bool, SpatialError> {
    validate_radius(radius_meters)?;
    Ok(distance_meters(point, center)? <= radius_meters)
}

/// Checks that a radius is a non-negative, finite number of meters.
///
/// # Errors
///
/// Returns [`SpatialError::InvalidRadius`] otherwise.
pub fn validate_radius(radius_meters: f64) -> Result<(), SpatialError> {
    if radius_meters.is_finite() && radius_meters >= 0.0 {
        Ok(())
    } else {
        Err(SpatialError::InvalidRadius { radius_meters })
    }
}

/// Computes a degree-space box that fully contains the circle of
/// `radius_meters` around `center`.
///
/// Boxes never wrap the antimeridian: circles that would cross it, or that
/// reach a pole, get the full longitude range instead.
///
/// # Errors
///
/// Returns [`SpatialError`] if the center or radius is invalid.
pub fn bounding_box_around(
    center: &GeoPoint,
    radius_meters: f64,
) -> Result<BoundingBox, SpatialError> {
    center.validate()?;
    validate_radius(radius_meters)?;

    let angular = radius_meters / EARTH_RADIUS_METERS;
    if angular >= std::f64::consts::FRAC_PI_2 {
        return Ok(BoundingBox::WORLD);
    }

    let d_lat = angular.to_degrees() + BBOX_PAD_DEGREES;
    let south = center.latitude - d_lat;
    let north = center.latitude + d_lat;

    let full_longitude = |south: f64, north: f64| BoundingBox {
        west: -180.0,
        south: south.max(-90.0),
        east: 180.0,
        north: north.min(90.0),
    };

    if south <= -90.0 || north >= 90.0 {
        return Ok(full_longitude(south, north));
    }

    let ratio = angular.sin() / center.latitude.to_radians().cos();
    if ratio >= 1.0 {
        return Ok(full_longitude(south, north));
    }

    let d_lon = ratio.asin().to_degrees() + BBOX_PAD_DEGREES;
    let west = center.longitude - d_lon;
    let east = center.longitude + d_lon;

    if west < -180.0 || east > 180.0 {
        return Ok(full_longitude(south, north));
    }

    Ok(BoundingBox {
        west,
        south,
        east,
        north,
    })
}

/// Returns `true` if `point` lies inside `bbox`, boundary included.
#[must_use]
pub fn bbox_contains(bbox: &BoundingBox, point: &GeoPoint) -> bool {
    let rect = Rect::new(
        coord! { x: bbox.west, y: bbox.south },
        coord! { x: bbox.east, y: bbox.north },
    );
    rect.intersects(&Point::new(point.longitude, point.latitude))
}

/// Arithmetic mean of latitudes and longitudes.
///
/// Longitudes are unwrapped relative to the first point before averaging, so
/// a cluster straddling the antimeridian averages to a point beside its
/// members rather than near longitude 0. The result is normalized back into
/// `[-180, 180]`. This is a planar approximation that is accurate at city
/// scale. Returns `None` for an empty slice.
///
/// # Errors
///
/// Returns [`SpatialError::InvalidCoordinate`] if any point is invalid.
pub fn centroid(points: &[GeoPoint]) -> Result<Option<GeoPoint>, SpatialError> {
    for point in points {
        point.validate()?;
    }

    let Some(reference) = points.first().map(|p| p.longitude) else {
        return Ok(None);
    };

    let multi: MultiPoint<f64> = points
        .iter()
        .map(|p| Point::new(unwrap_longitude(p.longitude, reference), p.latitude))
        .collect();

    Ok(multi.centroid().map(|c| GeoPoint {
        latitude: c.y(),
        longitude: normalize_longitude(c.x()),
    }))
}

/// Shifts `longitude` by a full turn so it lies within 180 degrees of
/// `reference`.
fn unwrap_longitude(longitude: f64, reference: f64) -> f64 {
    let delta = longitude - reference;
    if delta > 180.0 {
        longitude - 360.0
    } else if delta < -180.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

/// Maps an unwrapped longitude back into `[-180, 180]`.
fn normalize_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else if longitude < -180.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

/// Haversine distance without validation. Callers must have validated both
/// points.
fn haversine_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}
