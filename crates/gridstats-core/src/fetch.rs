// Raw record readers: where export text comes from.
//
// `HttpSource` GETs `<base>/<resource>` from a static file server.
// `LocalSource` reads the same file name from a directory on disk and is the
// manual fallback when the server copy is missing.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;

/// A place export text can be read from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the full text of `resource_name`.
    async fn fetch_text(&self, resource_name: &str) -> Result<String, FetchError>;

    /// Human-readable location, for status lines and logs.
    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// HttpSource
// ---------------------------------------------------------------------------

/// Reads exports from a static HTTP server.
pub struct HttpSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source rooted at `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(HttpSource {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, resource_name: &str) -> String {
        format!("{}/{}", self.base_url, resource_name)
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    async fn fetch_text(&self, resource_name: &str) -> Result<String, FetchError> {
        let url = self.url_for(resource_name);
        debug!("GET {url}");

        let transport = |source: reqwest::Error| FetchError::Transport {
            resource: resource_name.to_string(),
            source,
        };
        let response = self.http.get(&url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                resource: resource_name.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

// ---------------------------------------------------------------------------
// LocalSource
// ---------------------------------------------------------------------------

/// Reads exports from a local directory.
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalSource { dir: dir.into() }
    }

    pub fn path_for(&self, resource_name: &str) -> PathBuf {
        self.dir.join(resource_name)
    }
}

#[async_trait]
impl RecordSource for LocalSource {
    async fn fetch_text(&self, resource_name: &str) -> Result<String, FetchError> {
        let path = self.path_for(resource_name);
        debug!("reading {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io { path, source })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
