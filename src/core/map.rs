//! Pull-based map engine: the caller owns the [`Viewport`] and calls
//! [`MapEngine::update_viewport`] after every pan, zoom, or resize; the
//! engine answers with tile placements, the display-set diff, and pin
//! positions. Tile bytes arrive separately, per tile, as fetches finish.

use crate::core::constants::TILE_SIZE;
use crate::core::geo::{Point, TileId};
use crate::core::viewport::Viewport;
use crate::layers::pin::{PinLayer, PinPlacement};
use crate::prelude::HashSet;
use crate::tiles::fetcher::{FetchResult, TileFetcher};
use crate::tiles::mapper::{tile_placement, visible_tiles, TileSetDiff};
use crossbeam_channel::Sender;

/// A tile and where it sits on screen for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub id: TileId,
    /// Top-left corner in viewport pixels
    pub position: Point,
}

/// Everything the display needs after a viewport change.
#[derive(Debug, Clone)]
pub struct ViewportUpdate {
    /// Placement for every required tile, newly needed or retained
    pub tiles: Vec<TilePlacement>,
    /// Reconciliation against the previously displayed set; `diff.added`
    /// is what to hand to [`MapEngine::request_tiles`]
    pub diff: TileSetDiff,
    /// Current on-screen pin positions
    pub pins: Vec<PinPlacement>,
}

/// Completed tile fetch, delivered over the result channel.
#[derive(Debug, Clone)]
pub struct TileLoadResult {
    pub id: TileId,
    pub data: FetchResult,
}

/// Ties the tile pipeline together and tracks what is currently displayed.
pub struct MapEngine {
    fetcher: TileFetcher,
    pins: PinLayer,
    tile_size: u32,
    displayed: HashSet<TileId>,
}

impl MapEngine {
    pub fn new(fetcher: TileFetcher, pins: PinLayer) -> Self {
        Self {
            fetcher,
            pins,
            tile_size: TILE_SIZE,
            displayed: HashSet::default(),
        }
    }

    pub fn fetcher(&self) -> &TileFetcher {
        &self.fetcher
    }

    pub fn pins(&self) -> &PinLayer {
        &self.pins
    }

    /// Recomputes the required tile set, diffs it against the displayed
    /// set, and reprojects pins. Synchronous; no I/O.
    ///
    /// Placements are recomputed for every required tile on every call,
    /// whether or not the set changed; a pan moves all of them.
    pub fn update_viewport(&mut self, viewport: &Viewport) -> ViewportUpdate {
        let required = visible_tiles(viewport, self.tile_size);
        let diff = TileSetDiff::between(&self.displayed, &required);
        self.displayed = required.iter().copied().collect();

        let tiles = required
            .iter()
            .map(|id| TilePlacement {
                id: *id,
                position: tile_placement(id, viewport, self.tile_size),
            })
            .collect();
        let pins = self.pins.project(viewport, self.tile_size);

        log::debug!(
            "viewport update at z{}: {} tiles ({} new, {} dropped), {} pins",
            viewport.zoom,
            required.len(),
            diff.added.len(),
            diff.removed.len(),
            pins.len()
        );

        ViewportUpdate { tiles, diff, pins }
    }

    /// Spawns one fetch task per tile; each completion is sent over
    /// `results` in whatever order the fetches finish.
    ///
    /// Must be called from within a tokio runtime. A result arriving for a
    /// tile that has since left the display set is harmless (the bytes are
    /// cached for when it scrolls back); the display should simply ignore
    /// ids outside the latest diff.
    pub fn request_tiles(&self, ids: &[TileId], results: Sender<TileLoadResult>) {
        for &id in ids {
            let fetcher = self.fetcher.clone();
            let results = results.clone();
            tokio::spawn(async move {
                let data = fetcher.get_tile(id).await;
                if let Err(e) = &data {
                    log::warn!("tile {} failed to load: {}", id, e);
                }
                // The receiver may be gone if the caller shut down; that
                // is not this task's problem.
                let _ = results.send(TileLoadResult { id, data });
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::pin::PinLayer;
    use crate::tiles::fetcher::{TileFetcher, TileFetcherConfig};

    fn engine() -> MapEngine {
        let fetcher = TileFetcher::new("test-key", TileFetcherConfig::default()).unwrap();
        MapEngine::new(fetcher, PinLayer::new(Vec::new()))
    }

    #[test]
    fn test_first_update_adds_everything() {
        let mut engine = engine();
        let viewport = Viewport::new(Point::new(0.0, 0.0), Point::new(256.0, 256.0), 0);

        let update = engine.update_viewport(&viewport);
        assert_eq!(update.tiles.len(), 1);
        assert_eq!(update.diff.added, vec![TileId::new(0, 0, 0)]);
        assert!(update.diff.retained.is_empty());
        assert!(update.diff.removed.is_empty());
    }

    #[test]
    fn test_pan_retains_overlap_and_drops_the_rest() {
        let mut engine = engine();
        let mut viewport = Viewport::new(Point::new(0.0, 0.0), Point::new(512.0, 512.0), 2);
        let first = engine.update_viewport(&viewport);
        assert_eq!(first.tiles.len(), 9);

        // Pan one full tile east: the leftmost column leaves, a new one enters.
        viewport.pan(&Point::new(-256.0, 0.0));
        let second = engine.update_viewport(&viewport);
        assert_eq!(second.diff.added.len(), 3);
        assert_eq!(second.diff.removed.len(), 3);
        assert_eq!(second.diff.retained.len(), 6);
    }

    #[test]
    fn test_unchanged_viewport_recomputes_placements_only() {
        let mut engine = engine();
        let viewport = Viewport::new(Point::new(100.0, 100.0), Point::new(512.0, 512.0), 3);
        engine.update_viewport(&viewport);

        let update = engine.update_viewport(&viewport);
        assert!(update.diff.added.is_empty());
        assert!(update.diff.removed.is_empty());
        assert_eq!(update.diff.retained.len(), update.tiles.len());
    }

    #[test]
    fn test_placements_follow_the_viewport_offset() {
        let mut engine = engine();
        let viewport = Viewport::new(Point::new(10.0, 20.0), Point::new(256.0, 256.0), 4);
        let update = engine.update_viewport(&viewport);

        for tile in &update.tiles {
            let expected = Point::new(
                tile.id.x as f64 * 256.0 - 10.0,
                tile.id.y as f64 * 256.0 - 20.0,
            );
            assert_eq!(tile.position, expected);
        }
    }
}
