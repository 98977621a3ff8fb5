use crate::core::geo::TileId;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Bounded in-memory cache of fetched tile bytes, LRU-evicted.
///
/// Entries are immutable once inserted; readers either miss or see a
/// fully-populated entry. Cloning shares the underlying storage, so one
/// cache can serve many concurrent fetch tasks.
#[derive(Debug)]
pub struct TileCache {
    cache: Arc<Mutex<LruCache<TileId, Arc<Vec<u8>>>>>,
}

/// Default capacity in tiles; at ~30 KB per raster tile this bounds the
/// cache around 60 MB.
const DEFAULT_CAPACITY: usize = 2048;

impl TileCache {
    /// Creates a cache holding at most `capacity` tiles
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap());
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Gets a tile, marking it most recently used
    pub fn get(&self, id: &TileId) -> Option<Arc<Vec<u8>>> {
        self.cache.lock().ok()?.get(id).cloned()
    }

    /// Inserts a tile, evicting the least recently used entry when full
    pub fn insert(&self, id: TileId, data: Arc<Vec<u8>>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(id, data);
        }
    }

    pub fn contains(&self, id: &TileId) -> bool {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.contains(id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().ok().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

impl Clone for TileCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
