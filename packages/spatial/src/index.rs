//! R-tree point index for radius queries.

use crime_risk_geography_models::GeoPoint;
use rstar::{AABB, RTree, primitives::GeomWithData};

use crate::{SpatialError, bounding_box_around, haversine_meters, validate_radius};

/// A point stored in the R-tree as `[lng, lat]` with its position in the
/// original slice.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Pre-built spatial index over a fixed slice of points.
///
/// Points are identified by their position in the slice passed to
/// [`PointIndex::build`]. Radius queries pre-filter with a bounding box and
/// then apply the exact haversine test.
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
    points: Vec<GeoPoint>,
}

impl PointIndex {
    /// Validates every point and bulk-loads the R-tree.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidCoordinate`] for the first invalid
    /// point.
    pub fn build(points: &[GeoPoint]) -> Result<Self, SpatialError> {
        let mut entries = Vec::with_capacity(points.len());
        for (position, point) in points.iter().enumerate() {
            point.validate()?;
            entries.push(GeomWithData::new([point.longitude, point.latitude], position));
        }

        let tree = RTree::bulk_load(entries);
        log::debug!("Built point index over {} points", tree.size());

        Ok(Self {
            tree,
            points: points.to_vec(),
        })
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the index holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the point stored at `position`.
    #[must_use]
    pub fn point(&self, position: usize) -> Option<&GeoPoint> {
        self.points.get(position)
    }

    /// Positions of every indexed point within `radius_meters` of `center`
    /// (inclusive), in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the center or radius is invalid.
    pub fn within_radius(
        &self,
        center: &GeoPoint,
        radius_meters: f64,
    ) -> Result<Vec<usize>, SpatialError> {
        validate_radius(radius_meters)?;
        let bbox = bounding_box_around(center, radius_meters)?;
        let envelope = AABB::from_corners([bbox.west, bbox.south], [bbox.east, bbox.north]);

        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .filter(|&position| haversine_meters(&self.points[position], center) <= radius_meters)
            .collect();
        hits.sort_unstable();

        log::trace!("{} points within {radius_meters}m of {center}", hits.len());

        Ok(hits)
    }
}
