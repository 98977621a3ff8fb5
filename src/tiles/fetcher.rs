//! Resolves tile ids to image bytes through a layered lookup: in-memory
//! cache, disk cache, then a session-gated remote fetch.
//!
//! Every concern that involves shared state lives here: the single-flight
//! session bootstrap, and the per-tile deduplication that guarantees N
//! concurrent requests for one tile produce exactly one network call with
//! all callers observing the same outcome.

use crate::core::geo::TileId;
use crate::prelude::HashMap;
use crate::tiles::cache::TileCache;
use crate::tiles::disk::DiskCache;
use crate::tiles::source::{
    HttpTransport, SessionRequest, SessionResponse, TileTransport, DEFAULT_MAPS_URL,
    DEFAULT_SESSION_URL,
};
use crate::MapError;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// Per-tile failure, cloneable so every waiter on a deduplicated fetch
/// receives the same error. A failed tile is not cached; the next request
/// for it starts a fresh fetch (retry policy belongs to the caller).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("tile {id} request failed with HTTP status {status}")]
    Status { id: TileId, status: u16 },

    #[error("tile {id} request failed: {reason}")]
    Transport { id: TileId, reason: String },

    #[error("session bootstrap failed: {0}")]
    Session(String),
}

/// Outcome of a single tile resolution.
pub type FetchResult = Result<Arc<Vec<u8>>, FetchError>;

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// Configuration for a [`TileFetcher`].
#[derive(Debug, Clone)]
pub struct TileFetcherConfig {
    /// Root directory of the disk cache
    pub cache_root: PathBuf,
    /// Memory cache bound, in tiles
    pub memory_capacity: usize,
    /// Session-bootstrap endpoint
    pub session_url: String,
    /// Tile endpoint
    pub maps_url: String,
    /// Session-bootstrap request body
    pub session: SessionRequest,
}

impl Default for TileFetcherConfig {
    fn default() -> Self {
        Self {
            cache_root: PathBuf::from("."),
            memory_capacity: 2048,
            session_url: DEFAULT_SESSION_URL.to_string(),
            maps_url: DEFAULT_MAPS_URL.to_string(),
            session: SessionRequest::default(),
        }
    }
}

/// Reads the plaintext API key credential. An unreadable or empty file is
/// a configuration error: without the key no tile can ever be fetched.
pub fn read_api_key(path: impl AsRef<Path>) -> crate::Result<String> {
    let path = path.as_ref();
    let key = std::fs::read_to_string(path).map_err(|e| {
        MapError::Configuration(format!("cannot read API key from {}: {}", path.display(), e))
    })?;
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(MapError::Configuration(format!(
            "API key file {} is empty",
            path.display()
        )));
    }
    Ok(key)
}

/// Resolves tiles to image bytes: memory hit, else disk hit, else one
/// deduplicated remote fetch.
///
/// Cloning is cheap and shares all state, so the fetcher can be handed to
/// any number of concurrent tasks.
#[derive(Clone)]
pub struct TileFetcher {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Box<dyn TileTransport>,
    memory: TileCache,
    disk: DiskCache,
    key: String,
    session_request: SessionRequest,
    session: OnceCell<SessionResponse>,
    inflight: Mutex<HashMap<TileId, SharedFetch>>,
}

impl TileFetcher {
    /// Creates a fetcher against the provider's HTTP endpoints.
    pub fn new(key: impl Into<String>, config: TileFetcherConfig) -> crate::Result<Self> {
        let transport = HttpTransport::new(&config.session_url, &config.maps_url);
        Self::with_transport(key, Box::new(transport), config)
    }

    /// Creates a fetcher over an arbitrary transport (used by tests to
    /// substitute fakes).
    pub fn with_transport(
        key: impl Into<String>,
        transport: Box<dyn TileTransport>,
        config: TileFetcherConfig,
    ) -> crate::Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(MapError::Configuration("API key is empty".to_string()));
        }
        Ok(Self {
            inner: Arc::new(Inner {
                transport,
                memory: TileCache::new(config.memory_capacity),
                disk: DiskCache::new(config.cache_root),
                key,
                session_request: config.session,
                session: OnceCell::new(),
                inflight: Mutex::new(HashMap::default()),
            }),
        })
    }

    /// Memory-cache-only lookup; never touches disk or the network.
    pub fn get_cached(&self, id: &TileId) -> Option<Arc<Vec<u8>>> {
        self.inner.memory.get(id)
    }

    /// Resolves a tile to its image bytes.
    ///
    /// Cache hits return synchronously-computed results without
    /// suspending. A miss joins the in-flight fetch for this tile if one
    /// exists, otherwise starts it; either way exactly one network request
    /// is made per tile however many callers are waiting.
    pub async fn get_tile(&self, id: TileId) -> FetchResult {
        if let Some(bytes) = self.inner.memory.get(&id) {
            return Ok(bytes);
        }

        if let Some(bytes) = self.inner.disk.read(&id) {
            let bytes = Arc::new(bytes);
            self.inner.memory.insert(id, Arc::clone(&bytes));
            return Ok(bytes);
        }

        let fetch = {
            let mut inflight = lock(&self.inner.inflight);
            match inflight.get(&id) {
                Some(fetch) => fetch.clone(),
                None => {
                    let inner = Arc::clone(&self.inner);
                    let fetch = async move {
                        let result = inner.fetch_remote(id).await;
                        // Runs exactly once, before any waiter observes the
                        // result: success is already in the memory cache, and
                        // a failed tile becomes re-requestable immediately.
                        lock(&inner.inflight).remove(&id);
                        result
                    }
                    .boxed()
                    .shared();
                    inflight.insert(id, fetch.clone());
                    fetch
                }
            }
        };

        fetch.await
    }

    /// The session established by the first remote fetch, if any.
    pub fn session(&self) -> Option<&SessionResponse> {
        self.inner.session.get()
    }
}

impl Inner {
    async fn fetch_remote(&self, id: TileId) -> FetchResult {
        // A fetch that finished between this caller's cache miss and its
        // claim on the in-flight slot may have populated the cache already.
        if let Some(bytes) = self.memory.get(&id) {
            return Ok(bytes);
        }

        let session = self.ensure_session().await?;

        log::debug!("fetching tile {}", id);
        let bytes = self.transport.fetch_tile(id, &self.key, &session).await?;

        if let Err(e) = self.disk.write(&id, &bytes) {
            log::warn!("failed to persist tile {} to disk cache: {}", id, e);
        }

        let bytes = Arc::new(bytes);
        self.memory.insert(id, Arc::clone(&bytes));
        log::debug!("tile {} fetched ({} bytes)", id, bytes.len());
        Ok(bytes)
    }

    /// Exchanges the API key for a session token at most once; concurrent
    /// first fetches all wait on the same bootstrap.
    async fn ensure_session(&self) -> Result<String, FetchError> {
        let response = self
            .session
            .get_or_try_init(|| async {
                log::info!("creating tile session");
                self.transport
                    .create_session(&self.key, &self.session_request)
                    .await
            })
            .await?;
        Ok(response.session.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
