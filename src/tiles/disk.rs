use crate::core::geo::TileId;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// On-disk tile cache with a deterministic per-tile layout:
/// `{root}/tiles/{z}/{x}/{y}.png`.
///
/// Reads and writes are synchronous; a disk hit is expected to be cheap
/// next to a network fetch. Nothing here evicts; the directory grows
/// until the user clears it.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path a tile is stored at, whether or not it exists yet
    pub fn path_for(&self, id: &TileId) -> PathBuf {
        self.root
            .join("tiles")
            .join(id.z.to_string())
            .join(id.x.to_string())
            .join(format!("{}.png", id.y))
    }

    /// Reads a cached tile. A missing file is a plain miss; any other I/O
    /// failure is logged and also treated as a miss, so the caller falls
    /// through to the network.
    pub fn read(&self, id: &TileId) -> Option<Vec<u8>> {
        match fs::read(self.path_for(id)) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("disk cache read failed for tile {}: {}", id, e);
                None
            }
        }
    }

    /// Persists tile bytes, creating parent directories on demand.
    pub fn write(&self, id: &TileId, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_for(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let cache = DiskCache::new("/var/cache/map");
        let path = cache.path_for(&TileId::new(3, 7, 5));
        assert_eq!(path, PathBuf::from("/var/cache/map/tiles/5/3/7.png"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        let id = TileId::new(1, 2, 3);

        assert!(cache.read(&id).is_none());
        cache.write(&id, &[9, 8, 7]).unwrap();
        assert_eq!(cache.read(&id).unwrap(), vec![9, 8, 7]);
    }

    #[test]
    fn test_write_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        let id = TileId::new(100, 200, 9);

        cache.write(&id, &[1]).unwrap();
        assert!(cache.path_for(&id).exists());
    }
}
