#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic coordinate and bounding box value types.
//!
//! These types are plain values shared by every other crate in the
//! workspace. Fields are public so records can be deserialized straight
//! from untrusted input; call [`GeoPoint::validate`] (or construct through
//! [`GeoPoint::new`]) before trusting a coordinate.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in degrees, `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, `[-180, 180]`.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if either component is non-finite
    /// or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinateError> {
        let point = Self {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }

    /// Checks that both components are finite and within range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] describing the offending point.
    pub fn validate(&self) -> Result<(), InvalidCoordinateError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(InvalidCoordinateError {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Returns `true` if both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Error returned when a coordinate is non-finite or out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinateError {
    /// The latitude that was provided.
    pub latitude: f64,
    /// The longitude that was provided.
    pub longitude: f64,
}

impl std::fmt::Display for InvalidCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinate (latitude {}, longitude {}): expected finite latitude in \
             [-90, 90] and longitude in [-180, 180]",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidCoordinateError {}

/// An axis-aligned box in degree space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Western longitude bound.
    pub west: f64,
    /// Southern latitude bound.
    pub south: f64,
    /// Eastern longitude bound.
    pub east: f64,
    /// Northern latitude bound.
    pub north: f64,
}

impl BoundingBox {
    /// The whole globe.
    pub const WORLD: Self = Self {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    /// Returns the south-west corner as a point.
    #[must_use]
    pub const fn south_west(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.south,
            longitude: self.west,
        }
    }

    /// Returns the north-east corner as a point.
    #[must_use]
    pub const fn north_east(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.north,
            longitude: self.east,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range_limits() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(19.2183, 72.9781).is_ok());
    }

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert!(GeoPoint::new(90.0001, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn error_reports_offending_values() {
        let err = GeoPoint::new(91.0, 10.0).unwrap_err();
        assert!((err.latitude - 91.0).abs() < f64::EPSILON);
        assert!(err.to_string().contains("latitude 91"));
    }

    #[test]
    fn deserializes_camel_case() {
        let point: GeoPoint =
            serde_json::from_str(r#"{"latitude": 19.5, "longitude": 72.25}"#).unwrap();
        assert!(point.is_valid());
        assert!((point.longitude - 72.25).abs() < f64::EPSILON);
    }
}
