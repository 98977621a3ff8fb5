use serde::{Deserialize, Serialize};

/// A geographic position in WGS-84 degrees.
///
/// Plain value type; latitude is only clamped to the Web-Mercator-valid
/// range when the coordinate is projected, never at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Creates a new coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parses the decimal `"lat,lon"` format, splitting at the last comma.
    ///
    /// Malformed input yields `None`; an absent coordinate is an expected
    /// outcome for callers, not an error.
    pub fn parse(location: &str) -> Option<GeoCoordinate> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }
        let split = location.rfind(',')?;
        let latitude = location[..split].trim().parse::<f64>().ok()?;
        let longitude = location[split + 1..].trim().parse::<f64>().ok()?;
        Some(Self::new(latitude, longitude))
    }

    /// Parses the ISO 6709 annex H signed-degree format, e.g. `"+52.0+004.3"`.
    ///
    /// Optional `/` separators are stripped before splitting at the last
    /// sign character. Malformed input yields `None`.
    pub fn parse_iso(location: &str) -> Option<GeoCoordinate> {
        let location = location.trim().replace('/', "");
        if location.is_empty() {
            return None;
        }
        let split = location.rfind(|c| c == '+' || c == '-')?;
        let latitude = location[..split].parse::<f64>().ok()?;
        let longitude = location[split..].parse::<f64>().ok()?;
        Some(Self::new(latitude, longitude))
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A point in pixel or vector space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn floor(&self) -> Point {
        Point::new(self.x.floor(), self.y.floor())
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A tile address in the tile pyramid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileId {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Checks that the tile indices fit the pyramid at this zoom level
    pub fn is_valid(&self) -> bool {
        let max_coord = 2_u32.pow(self.z as u32);
        self.x < max_coord && self.y < max_coord
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        let coord = GeoCoordinate::parse("52.0,4.3").unwrap();
        assert_eq!(coord.latitude, 52.0);
        assert_eq!(coord.longitude, 4.3);
    }

    #[test]
    fn test_parse_negative_longitude() {
        let coord = GeoCoordinate::parse("40.7128,-74.0060").unwrap();
        assert_eq!(coord.latitude, 40.7128);
        assert_eq!(coord.longitude, -74.0060);
    }

    #[test]
    fn test_parse_malformed() {
        assert!(GeoCoordinate::parse("abc").is_none());
        assert!(GeoCoordinate::parse("").is_none());
        assert!(GeoCoordinate::parse("   ").is_none());
        assert!(GeoCoordinate::parse("52.0;4.3").is_none());
        assert!(GeoCoordinate::parse(",4.3").is_none());
    }

    #[test]
    fn test_parse_iso() {
        let coord = GeoCoordinate::parse_iso("+52.0+004.3").unwrap();
        assert_eq!(coord.latitude, 52.0);
        assert_eq!(coord.longitude, 4.3);

        let coord = GeoCoordinate::parse_iso("-33.8567+151.2094/").unwrap();
        assert_eq!(coord.latitude, -33.8567);
        assert_eq!(coord.longitude, 151.2094);
    }

    #[test]
    fn test_parse_iso_malformed() {
        assert!(GeoCoordinate::parse_iso("abc").is_none());
        assert!(GeoCoordinate::parse_iso("").is_none());
        assert!(GeoCoordinate::parse_iso("+52.0").is_none());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let coord = GeoCoordinate::new(52.0, 4.3);
        let parsed = GeoCoordinate::parse(&coord.to_string()).unwrap();
        assert_eq!(parsed, coord);
    }

    #[test]
    fn test_tile_id_validity() {
        assert!(TileId::new(0, 0, 0).is_valid());
        assert!(!TileId::new(1, 0, 0).is_valid());
        assert!(TileId::new(31, 31, 5).is_valid());
        assert!(!TileId::new(32, 0, 5).is_valid());
    }

    #[test]
    fn test_tile_id_display() {
        assert_eq!(TileId::new(3, 7, 5).to_string(), "5/3/7");
    }
}
