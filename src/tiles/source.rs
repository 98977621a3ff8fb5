use crate::core::geo::TileId;
use crate::tiles::fetcher::FetchError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Default session-bootstrap endpoint of the tile provider.
pub const DEFAULT_SESSION_URL: &str = "https://tile.googleapis.com/v1/createSession";

/// Default 2D raster tile endpoint.
pub const DEFAULT_MAPS_URL: &str = "https://tile.googleapis.com/v1/2dtiles";

/// Shared async HTTP client. Building it once avoids re-paying TLS and
/// connection-pool setup on every tile, and the timeout bounds how long
/// every waiter on a deduplicated fetch can be held up.
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("tilekit/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("failed to build reqwest async client")
});

/// Body of the session-bootstrap request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub map_type: String,
    pub language: String,
    pub region: String,
}

impl Default for SessionRequest {
    fn default() -> Self {
        Self {
            map_type: "roadmap".to_string(),
            language: "en-US".to_string(),
            region: "US".to_string(),
        }
    }
}

/// Session-bootstrap response. `session` accompanies every tile request;
/// `expiry` is provider-reported and not acted upon here, as the session
/// is never refreshed within a fetcher's lifetime.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session: String,
    pub expiry: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub image_format: String,
}

/// The seam between the fetcher and the remote tile provider.
///
/// Production code uses [`HttpTransport`]; tests substitute
/// counting/faulting implementations to exercise the fetcher's
/// deduplication and failure paths without a network.
#[async_trait]
pub trait TileTransport: Send + Sync {
    /// Exchanges the API key for a session token. Called at most once per
    /// fetcher lifetime.
    async fn create_session(
        &self,
        key: &str,
        request: &SessionRequest,
    ) -> Result<SessionResponse, FetchError>;

    /// Fetches one tile's raw image bytes.
    async fn fetch_tile(
        &self,
        id: TileId,
        key: &str,
        session: &str,
    ) -> Result<Vec<u8>, FetchError>;
}

/// Transport backed by the provider's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    session_url: String,
    maps_url: String,
}

impl HttpTransport {
    pub fn new(session_url: impl Into<String>, maps_url: impl Into<String>) -> Self {
        Self {
            session_url: session_url.into(),
            maps_url: maps_url.into(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_URL, DEFAULT_MAPS_URL)
    }
}

#[async_trait]
impl TileTransport for HttpTransport {
    async fn create_session(
        &self,
        key: &str,
        request: &SessionRequest,
    ) -> Result<SessionResponse, FetchError> {
        let url = format!("{}?key={}", self.session_url, key);
        let response = HTTP_CLIENT
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| FetchError::Session(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Session(format!("HTTP {}", status)));
        }

        response
            .json::<SessionResponse>()
            .await
            .map_err(|e| FetchError::Session(format!("malformed session response: {}", e)))
    }

    async fn fetch_tile(
        &self,
        id: TileId,
        key: &str,
        session: &str,
    ) -> Result<Vec<u8>, FetchError> {
        let url = format!(
            "{}/{}/{}/{}?key={}&session={}&orientation=0",
            self.maps_url, id.z, id.x, id.y, key, session
        );
        let response = HTTP_CLIENT.get(&url).send().await.map_err(|e| {
            FetchError::Transport {
                id,
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                id,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::Transport {
            id,
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}
