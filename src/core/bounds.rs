use crate::core::constants::TILE_SIZE;
use crate::core::geo::GeoCoordinate;
use crate::core::projection::{to_geo_coordinate, to_global_pixel};
use serde::{Deserialize, Serialize};

/// An axis-aligned geographic bounding box in degrees.
///
/// `north >= south` is expected. Rectangles crossing the antimeridian
/// (longitude ±180) are not supported and produce degenerate, non-crashing
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRectangle {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl GeoRectangle {
    pub fn new(north: f64, south: f64, west: f64, east: f64) -> Self {
        Self {
            north,
            south,
            west,
            east,
        }
    }

    /// Smallest rectangle containing both corner coordinates.
    pub fn from_corners(c1: &GeoCoordinate, c2: &GeoCoordinate) -> Self {
        Self::new(
            c1.latitude.max(c2.latitude),
            c1.latitude.min(c2.latitude),
            c1.longitude.min(c2.longitude),
            c1.longitude.max(c2.longitude),
        )
    }

    /// Smallest rectangle containing every coordinate, `None` when empty.
    pub fn from_coordinates<'a, I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoCoordinate>,
    {
        let mut iter = coordinates.into_iter();
        let first = iter.next()?;
        let mut rect = Self::from_corners(first, first);
        for coord in iter {
            rect.north = rect.north.max(coord.latitude);
            rect.south = rect.south.min(coord.latitude);
            rect.west = rect.west.min(coord.longitude);
            rect.east = rect.east.max(coord.longitude);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn north_west(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.north, self.west)
    }

    pub fn north_east(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.north, self.east)
    }

    pub fn south_west(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.south, self.west)
    }

    pub fn south_east(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.south, self.east)
    }

    /// Geographic center, computed through the pixel-space midpoint at
    /// zoom 0 rather than by averaging degrees. The two differ visibly
    /// towards the poles, where Mercator stretches latitude.
    pub fn center(&self) -> GeoCoordinate {
        let nw_px = to_global_pixel(&self.north_west(), 0, TILE_SIZE);
        let se_px = to_global_pixel(&self.south_east(), 0, TILE_SIZE);
        let center_px = nw_px.add(&se_px).multiply(0.5);
        to_geo_coordinate(&center_px, 0, TILE_SIZE)
    }

    /// Smallest rectangle containing both rectangles.
    pub fn merge(&self, other: &GeoRectangle) -> GeoRectangle {
        GeoRectangle::new(
            self.north.max(other.north),
            self.south.min(other.south),
            self.west.min(other.west),
            self.east.max(other.east),
        )
    }

    /// Strict interior test; points on the boundary are outside.
    pub fn contains(&self, point: &GeoCoordinate) -> bool {
        point.latitude < self.north
            && point.longitude > self.west
            && point.latitude > self.south
            && point.longitude < self.east
    }

    /// Resizes around the center by a multiplicative factor.
    pub fn scale(&self, factor: f64) -> GeoRectangle {
        let center = self.center();
        let width = self.width() * factor;
        let height = self.height() * factor;
        GeoRectangle::new(
            center.latitude + height / 2.0,
            center.latitude - height / 2.0,
            center.longitude - width / 2.0,
            center.longitude + width / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_orders_edges() {
        let rect = GeoRectangle::from_corners(
            &GeoCoordinate::new(51.5, 5.0),
            &GeoCoordinate::new(52.5, 4.0),
        );
        assert_eq!(rect.north, 52.5);
        assert_eq!(rect.south, 51.5);
        assert_eq!(rect.west, 4.0);
        assert_eq!(rect.east, 5.0);
    }

    #[test]
    fn test_from_coordinates_empty() {
        assert!(GeoRectangle::from_coordinates([]).is_none());
    }

    #[test]
    fn test_contains_is_boundary_exclusive() {
        let rect = GeoRectangle::new(52.0, 51.0, 4.0, 5.0);
        assert!(rect.contains(&GeoCoordinate::new(51.5, 4.5)));
        assert!(!rect.contains(&GeoCoordinate::new(52.0, 4.5)));
        assert!(!rect.contains(&GeoCoordinate::new(51.5, 4.0)));
        assert!(!rect.contains(&GeoCoordinate::new(50.0, 4.5)));
    }

    #[test]
    fn test_merge_contains_all_corners() {
        let a = GeoRectangle::new(52.0, 51.0, 4.0, 5.0);
        let b = GeoRectangle::new(48.5, 47.0, 7.5, 9.0);
        let merged = a.merge(&b);
        for rect in [&a, &b] {
            for corner in [
                rect.north_west(),
                rect.north_east(),
                rect.south_west(),
                rect.south_east(),
            ] {
                assert!(merged.north >= corner.latitude);
                assert!(merged.south <= corner.latitude);
                assert!(merged.west <= corner.longitude);
                assert!(merged.east >= corner.longitude);
            }
        }
    }

    #[test]
    fn test_center_midway_at_equator() {
        let rect = GeoRectangle::new(10.0, -10.0, -20.0, 20.0);
        let center = rect.center();
        assert!(center.latitude.abs() < 1e-6);
        assert!(center.longitude.abs() < 1e-6);
    }

    #[test]
    fn test_center_skews_poleward_in_pixel_space() {
        // A tall northern rectangle: the pixel-space midpoint sits south of
        // the naive degree average because Mercator stretches high latitudes.
        let rect = GeoRectangle::new(80.0, 20.0, 0.0, 10.0);
        let center = rect.center();
        assert!(center.latitude < 50.0);
        assert!(center.latitude > 20.0);
    }

    #[test]
    fn test_scale_around_center() {
        let rect = GeoRectangle::new(10.0, -10.0, -10.0, 10.0);
        let scaled = rect.scale(2.0);
        assert!((scaled.width() - 40.0).abs() < 1e-9);
        assert!((scaled.height() - 40.0).abs() < 1e-9);
        assert!((scaled.center().longitude - rect.center().longitude).abs() < 1e-6);
    }
}
