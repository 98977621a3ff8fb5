//! Prelude module for common tilekit types and traits
//!
//! Re-exports the most commonly used types and functions for easy
//! importing with `use tilekit::prelude::*;`

pub use crate::core::{
    bounds::GeoRectangle,
    geo::{GeoCoordinate, Point, TileId},
    map::{MapEngine, TileLoadResult, TilePlacement, ViewportUpdate},
    projection::{map_size, project_to_viewport, to_geo_coordinate, to_global_pixel},
    viewport::Viewport,
};

pub use crate::layers::pin::{PinLayer, PinPlacement, PinRecord};

pub use crate::tiles::{
    cache::TileCache,
    disk::DiskCache,
    fetcher::{FetchError, FetchResult, TileFetcher, TileFetcherConfig},
    mapper::{tile_placement, visible_tiles, TileSetDiff},
    source::{HttpTransport, SessionRequest, SessionResponse, TileTransport},
};

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
