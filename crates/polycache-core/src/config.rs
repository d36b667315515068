//! Client configuration.
//!
//! A `ClientConfig` is assembled once by the embedding program and handed
//! to `RestClient::new`. Nothing here reads the environment; the cache
//! root is supplied by the caller.

use std::path::PathBuf;
use std::time::Duration;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io/";

/// HTTP request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Connection-level retries applied by the transport.
const DEFAULT_MAX_RETRIES: u32 = 5;

/// Upper bound on pages fetched by one paginated call.
const DEFAULT_MAX_PAGES: u32 = 1000;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub staging: bool,
    pub cache_enabled: bool,
    pub cache_dir: PathBuf,
    pub max_pages: u32,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            staging: false,
            cache_enabled: true,
            cache_dir: cache_dir.into(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_staging(mut self, staging: bool) -> Self {
        self.staging = staging;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Base URL with exactly one trailing slash.
    pub(crate) fn normalized_base_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}
