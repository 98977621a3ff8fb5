//! Engine-wide constants derived from web-map conventions and the tile
//! provider's limits. Keeping them in a single place makes it easier to
//! tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Lowest zoom level of the tile pyramid (the whole world in one tile).
pub const MIN_ZOOM: u8 = 0;

/// Highest zoom level served by the tile provider.
pub const MAX_ZOOM: u8 = 14;

/// Southernmost latitude representable in Web Mercator without the
/// projection going infinite.
pub const MIN_LATITUDE: f64 = -85.05112878;

/// Northernmost latitude representable in Web Mercator.
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Westernmost longitude.
pub const MIN_LONGITUDE: f64 = -180.0;

/// Easternmost longitude.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Default pin marker size in pixels (width, height).
pub const PIN_SIZE: (f64, f64) = (40.0, 40.0);
