//! # Tilekit
//!
//! A pannable, zoomable tile-pyramid map core, inspired by Leaflet-style
//! slippy maps.
//!
//! The crate covers the non-UI half of a raster map viewer: Web Mercator
//! projection math, viewport-to-tile-set mapping, a layered tile cache
//! (memory, disk, session-gated remote fetch with request deduplication),
//! and projection of overlay pins into viewport pixels. Event handling,
//! image decoding, and drawing stay with the caller: it holds a
//! [`Viewport`], asks the core what changed on every pan or zoom, and
//! renders whatever comes back.

pub mod core;
pub mod layers;
pub mod prelude;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::GeoRectangle,
    geo::{GeoCoordinate, Point, TileId},
    map::{MapEngine, TileLoadResult, TilePlacement, ViewportUpdate},
    viewport::Viewport,
};

pub use crate::layers::pin::{PinLayer, PinPlacement, PinRecord};

pub use crate::tiles::{
    cache::TileCache,
    disk::DiskCache,
    fetcher::{read_api_key, FetchError, FetchResult, TileFetcher, TileFetcherConfig},
    mapper::TileSetDiff,
    source::{HttpTransport, SessionRequest, SessionResponse, TileTransport},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Error type alias for convenience
pub type Error = MapError;
