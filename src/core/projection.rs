//! Web Mercator projection between geographic coordinates, global pixel
//! space, and local viewport pixel space.
//!
//! Global pixel coordinates are relative to the top-left corner of the
//! whole tile pyramid at a given zoom level. All functions here are pure;
//! out-of-range input is clamped rather than rejected, so the worst
//! possible output is degenerate but finite.

use crate::core::bounds::GeoRectangle;
use crate::core::constants::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
use crate::core::geo::{GeoCoordinate, Point};
use std::f64::consts::PI;

/// Width and height in pixels of the whole map at a zoom level.
pub fn map_size(zoom: u8, tile_size: u32) -> f64 {
    (tile_size as f64 * (1u64 << zoom) as f64).ceil()
}

/// Projects a WGS-84 coordinate to global pixel coordinates at a zoom level.
///
/// Latitude and longitude are clamped to the Web-Mercator-valid range
/// before projecting; the result is clamped to `[0, map_size - 1]` per axis.
pub fn to_global_pixel(position: &GeoCoordinate, zoom: u8, tile_size: u32) -> Point {
    let latitude = clip(position.latitude, MIN_LATITUDE, MAX_LATITUDE);
    let longitude = clip(position.longitude, MIN_LONGITUDE, MAX_LONGITUDE);

    let x = (longitude + 180.0) / 360.0;
    let sin_latitude = (latitude * PI / 180.0).sin();
    let y = 0.5 - ((1.0 + sin_latitude) / (1.0 - sin_latitude)).ln() / (4.0 * PI);

    let map_size = map_size(zoom, tile_size);

    Point::new(
        clip(x * map_size, 0.0, map_size - 1.0),
        clip(y * map_size, 0.0, map_size - 1.0),
    )
}

/// Converts a global pixel coordinate back into a geographic position.
///
/// Exact inverse of [`to_global_pixel`] up to the clamping at the pyramid
/// edges.
pub fn to_geo_coordinate(pixel: &Point, zoom: u8, tile_size: u32) -> GeoCoordinate {
    let map_size = map_size(zoom, tile_size);

    let x = (clip(pixel.x, 0.0, map_size - 1.0) / map_size) - 0.5;
    let y = 0.5 - (clip(pixel.y, 0.0, map_size - 1.0) / map_size);

    let longitude = 360.0 * x;
    let latitude = 90.0 - 360.0 * (-y * 2.0 * PI).exp().atan() / PI;

    GeoCoordinate::new(latitude, longitude)
}

/// Projects a coordinate into the local pixel space of a viewport covering
/// `bounds` at `pixel_width` by `pixel_height` pixels.
///
/// The rectangle's NW and SE corners are projected into the zoom-0 unit
/// square; the per-axis ratio between that local extent and the requested
/// pixel size is then applied to the target coordinate's unit projection.
/// If the local extent is degenerate (zero width or height) the raw unit
/// projection is returned as a best-effort fallback.
pub fn project_to_viewport(
    position: &GeoCoordinate,
    bounds: &GeoRectangle,
    pixel_width: f64,
    pixel_height: f64,
) -> Point {
    let pixel_north_west = project_unit(&bounds.north_west());
    let pixel_south_east = project_unit(&bounds.south_east());
    let local_width = pixel_south_east.x - pixel_north_west.x;
    let local_height = pixel_south_east.y - pixel_north_west.y;

    if local_width != 0.0 && local_height != 0.0 {
        let width_scale = pixel_width / local_width;
        let height_scale = pixel_height / local_height;
        let pixel_in_world = project_unit(position);
        let x = pixel_in_world.x - pixel_north_west.x;
        let y = pixel_in_world.y - pixel_north_west.y;
        Point::new(x * width_scale, y * height_scale)
    } else {
        project_unit(position)
    }
}

/// Mercator projection onto the unit square (the zoom-0 map scaled to 1x1).
fn project_unit(position: &GeoCoordinate) -> Point {
    let sin_latitude = (position.latitude * PI / 180.0).sin();
    let x = (position.longitude + 180.0) / 360.0;
    let y = 0.5 - ((1.0 + sin_latitude) / (1.0 - sin_latitude)).ln() / (4.0 * PI);
    Point::new(x, y)
}

fn clip(n: f64, min_value: f64, max_value: f64) -> f64 {
    n.max(min_value).min(max_value)
}
