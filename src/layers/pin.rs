use crate::core::constants::PIN_SIZE;
use crate::core::geo::{GeoCoordinate, Point};
use crate::core::projection::project_to_viewport;
use crate::core::viewport::Viewport;
use serde::Deserialize;
use std::path::Path;

/// One marker record as loaded from the pin data source.
///
/// `lng`/`lat` are optional in the source data; a record without them is a
/// known place with an unknown location and is never projected.
#[derive(Debug, Clone, Deserialize)]
pub struct PinRecord {
    pub id: String,
    pub description: Option<String>,
    #[serde(rename = "nameNL")]
    pub name_nl: Option<String>,
    #[serde(rename = "nameEN")]
    pub name_en: Option<String>,
    #[serde(rename = "nameFR")]
    pub name_fr: Option<String>,
    #[serde(rename = "nameDE")]
    pub name_de: Option<String>,
    pub country: Option<String>,
    pub lng: Option<f64>,
    pub lat: Option<f64>,
    pub region: Option<String>,
}

impl PinRecord {
    /// The record's location, when it has one
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        Some(GeoCoordinate::new(self.lat?, self.lng?))
    }

    /// Preferred display name: English, then Dutch, then the free-form
    /// description, then the raw id.
    pub fn display_name(&self) -> &str {
        self.name_en
            .as_deref()
            .or(self.name_nl.as_deref())
            .or(self.description.as_deref())
            .unwrap_or(&self.id)
    }
}

/// A pin's on-screen placement for the current viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct PinPlacement {
    pub id: String,
    pub name: String,
    /// Top-left corner of the marker graphic in viewport pixels
    pub anchor: Point,
}

/// The set of overlay pins, loaded once and reprojected on every viewport
/// change.
#[derive(Debug, Clone)]
pub struct PinLayer {
    records: Vec<PinRecord>,
    width: f64,
    height: f64,
}

impl PinLayer {
    pub fn new(records: Vec<PinRecord>) -> Self {
        let (width, height) = PIN_SIZE;
        Self {
            records,
            width,
            height,
        }
    }

    /// Overrides the marker graphic size the anchor offset is derived from
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Loads pins from a JSON array file. A malformed file is a typed
    /// error; it never panics.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let records: Vec<PinRecord> = serde_json::from_str(&json)?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[PinRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Projects every located pin into viewport pixels.
    ///
    /// The viewport's visible rectangle is clipped to the pyramid before
    /// the geographic bounds are derived, so placement stays accurate when
    /// the window hangs past the map edges. The anchor is offset so the
    /// marker's bottom-center tip sits on the geographic point.
    pub fn project(&self, viewport: &Viewport, tile_size: u32) -> Vec<PinPlacement> {
        let bounds = viewport.geo_bounds(tile_size);
        let (offset, resolution) = viewport.visible_rect(tile_size);

        self.records
            .iter()
            .filter_map(|record| {
                let coordinate = record.coordinate()?;
                let position =
                    project_to_viewport(&coordinate, &bounds, resolution.x, resolution.y);
                Some(PinPlacement {
                    id: record.id.clone(),
                    name: record.display_name().to_string(),
                    anchor: Point::new(
                        position.x - self.width / 2.0 + offset.x,
                        position.y - self.height + self.height * 0.15 + offset.y,
                    ),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::TILE_SIZE;

    fn record(id: &str, lat: Option<f64>, lng: Option<f64>) -> PinRecord {
        PinRecord {
            id: id.to_string(),
            description: None,
            name_nl: None,
            name_en: None,
            name_fr: None,
            name_de: None,
            country: None,
            lng,
            lat,
            region: None,
        }
    }

    #[test]
    fn test_display_name_precedence() {
        let mut pin = record("p1", None, None);
        assert_eq!(pin.display_name(), "p1");

        pin.description = Some("old windmill".to_string());
        assert_eq!(pin.display_name(), "old windmill");

        pin.name_nl = Some("molen".to_string());
        assert_eq!(pin.display_name(), "molen");

        pin.name_en = Some("windmill".to_string());
        assert_eq!(pin.display_name(), "windmill");
    }

    #[test]
    fn test_pin_without_coordinate_is_excluded() {
        let layer = PinLayer::new(vec![
            record("located", Some(52.0), Some(4.3)),
            record("unlocated", None, None),
            record("half", Some(52.0), None),
        ]);
        let viewport = Viewport::new(Point::new(1000.0, 600.0), Point::new(800.0, 600.0), 5);

        let placements = layer.project(&viewport, TILE_SIZE);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].id, "located");
    }

    #[test]
    fn test_anchor_offsets_bottom_center() {
        // Pin exactly at the viewport's geographic center.
        let viewport = Viewport::new(Point::new(2000.0, 2000.0), Point::new(800.0, 600.0), 5);
        let center = viewport.geo_bounds(TILE_SIZE).center();
        let layer = PinLayer::new(vec![record(
            "center",
            Some(center.latitude),
            Some(center.longitude),
        )]);

        let placements = layer.project(&viewport, TILE_SIZE);
        let anchor = placements[0].anchor;
        // Bottom-center of a 40x40 marker on the point: x shifts by -20,
        // y by -40 + 6.
        assert!((anchor.x - (400.0 - 20.0)).abs() < 1.0);
        assert!((anchor.y - (300.0 - 34.0)).abs() < 1.0);
    }

    #[test]
    fn test_records_parse_from_json() {
        let json = r#"[
            {"id": "a", "nameEN": "Alpha", "lng": 4.3, "lat": 52.0},
            {"id": "b", "description": "no location"}
        ]"#;
        let records: Vec<PinRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].display_name(), "Alpha");
        assert!(records[0].coordinate().is_some());
        assert!(records[1].coordinate().is_none());
    }

    #[test]
    fn test_malformed_pin_file_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pins.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            PinLayer::from_json_file(&path),
            Err(crate::MapError::Serialization(_))
        ));
    }
}
