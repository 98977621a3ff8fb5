//! Maps a viewport onto the set of tiles needed to cover it, and diffs
//! that set against what is currently on screen.

use crate::core::geo::{Point, TileId};
use crate::core::viewport::Viewport;
use crate::prelude::HashSet;

/// Computes the tiles intersecting the viewport at its zoom level.
///
/// The range is the cartesian product of the clipped x and y tile index
/// ranges; indices are clamped to `[0, 2^zoom - 1]`, so a viewport hanging
/// past the pyramid simply covers fewer tiles. The result is empty when
/// the viewport lies entirely outside the pyramid.
pub fn visible_tiles(viewport: &Viewport, tile_size: u32) -> Vec<TileId> {
    let tile_count = 1i64 << viewport.zoom;
    let tile_size = tile_size as f64;
    let bottom_right = viewport.bottom_right();

    let min_x = ((viewport.top_left.x / tile_size).floor() as i64).max(0);
    let max_x = ((bottom_right.x / tile_size).floor() as i64).min(tile_count - 1);
    let min_y = ((viewport.top_left.y / tile_size).floor() as i64).max(0);
    let max_y = ((bottom_right.y / tile_size).floor() as i64).min(tile_count - 1);

    let mut tiles = Vec::new();
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            tiles.push(TileId::new(x as u32, y as u32, viewport.zoom));
        }
    }
    tiles
}

/// On-screen position of a tile's top-left corner for the given viewport.
///
/// A pure function of the tile id and the viewport offset; callers
/// recompute it on every viewport change whether or not the tile set
/// changed.
pub fn tile_placement(id: &TileId, viewport: &Viewport, tile_size: u32) -> Point {
    let tile_size = tile_size as f64;
    Point::new(
        id.x as f64 * tile_size - viewport.top_left.x,
        id.y as f64 * tile_size - viewport.top_left.y,
    )
}

/// The reconciliation of a new required tile set against the previous one.
///
/// `removed` tiles leave the display only; their cache entries stay warm
/// for when they scroll back into view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileSetDiff {
    /// Tiles required now but not previously displayed
    pub added: Vec<TileId>,
    /// Tiles required now and already displayed (reposition only)
    pub retained: Vec<TileId>,
    /// Previously displayed tiles no longer required
    pub removed: Vec<TileId>,
}

impl TileSetDiff {
    pub fn between(previous: &HashSet<TileId>, required: &[TileId]) -> Self {
        let mut added = Vec::new();
        let mut retained = Vec::new();
        for id in required {
            if previous.contains(id) {
                retained.push(*id);
            } else {
                added.push(*id);
            }
        }
        let required: HashSet<TileId> = required.iter().copied().collect();
        let removed = previous
            .iter()
            .filter(|id| !required.contains(id))
            .copied()
            .collect();
        Self {
            added,
            retained,
            removed,
        }
    }
}
