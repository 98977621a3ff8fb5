use crate::core::bounds::GeoRectangle;
use crate::core::constants::{MAX_ZOOM, MIN_ZOOM};
use crate::core::geo::Point;
use crate::core::projection::{map_size, to_geo_coordinate};
use serde::{Deserialize, Serialize};

/// The visible window into global pixel space.
///
/// Owned and mutated by the caller (the UI layer); the engine only reads
/// it. `top_left` is the offset of the window's top-left corner in global
/// pixel coordinates at the current zoom, and may be negative or extend
/// past the pyramid when the caller pans beyond the map edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Top-left corner in global pixel space
    pub top_left: Point,
    /// Window size in pixels
    pub size: Point,
    /// Integer zoom level, clamped to the pyramid's range
    pub zoom: u8,
}

impl Viewport {
    /// Creates a viewport, clamping zoom to the supported range
    pub fn new(top_left: Point, size: Point, zoom: u8) -> Self {
        Self {
            top_left,
            size,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Bottom-right corner in global pixel space
    pub fn bottom_right(&self) -> Point {
        self.top_left.add(&self.size)
    }

    /// Shifts the viewport opposite to a pointer drag vector.
    pub fn pan(&mut self, drag: &Point) {
        self.top_left = self.top_left.subtract(drag);
    }

    /// Steps one zoom level in, keeping `focus` (a global pixel point at
    /// the current zoom) stationary on screen. Pixel space doubles, so the
    /// new top-left is `top_left + focus`. Returns false at the zoom limit.
    pub fn zoom_in(&mut self, focus: &Point) -> bool {
        if self.zoom >= MAX_ZOOM {
            return false;
        }
        self.zoom += 1;
        self.top_left = self.top_left.add(focus);
        true
    }

    /// Steps one zoom level out around `focus`; the inverse of [`zoom_in`].
    ///
    /// [`zoom_in`]: Viewport::zoom_in
    pub fn zoom_out(&mut self, focus: &Point) -> bool {
        if self.zoom <= MIN_ZOOM {
            return false;
        }
        self.zoom -= 1;
        self.top_left = self.top_left.subtract(&focus.multiply(0.5));
        true
    }

    /// The visible pixel rectangle clipped to the tile pyramid's extent.
    ///
    /// Returns `(offset, resolution)`: the screen offset at which the
    /// clipped region starts and its pixel size. When the viewport hangs
    /// past the pyramid on any side, the region shrinks accordingly; pin
    /// placement near the map edges depends on this.
    pub fn visible_rect(&self, tile_size: u32) -> (Point, Point) {
        let world_size = map_size(self.zoom, tile_size);
        let bottom_right = self.bottom_right();

        let mut offset = Point::default();
        let mut resolution = self.size;
        if self.top_left.x < 0.0 {
            offset.x = -self.top_left.x;
            resolution.x += self.top_left.x;
        }
        if self.top_left.y < 0.0 {
            offset.y = -self.top_left.y;
            resolution.y += self.top_left.y;
        }
        if bottom_right.x > world_size {
            resolution.x -= bottom_right.x - world_size;
        }
        if bottom_right.y > world_size {
            resolution.y -= bottom_right.y - world_size;
        }
        (offset, resolution)
    }

    /// Geographic bounds of the viewport, from inverse-projecting its
    /// corners (clamped to the pyramid extent).
    pub fn geo_bounds(&self, tile_size: u32) -> GeoRectangle {
        let top_left = to_geo_coordinate(&self.top_left, self.zoom, tile_size);
        let bottom_right = to_geo_coordinate(&self.bottom_right(), self.zoom, tile_size);
        GeoRectangle::from_corners(&top_left, &bottom_right)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Point::default(), Point::new(800.0, 600.0), 0)
    }
}
