//! REST client module for the Polygon market-data API.
//!
//! `RestClient` turns each endpoint call into one GET request, consulting
//! the on-disk cache first. The HTTP round trip itself goes through the
//! `Transport` trait so it can be replaced in tests.

pub mod aggregates;
pub mod client;
pub mod error;
pub mod pagination;
pub mod transport;

use std::collections::BTreeMap;
use std::fmt;

pub use client::{RestClient, MAX_BATCH_SYMBOLS};
pub use error::ApiError;
pub use reqwest::Method;
pub use transport::{HttpTransport, Transport};

/// Query parameters of a request. Ordered so that cache keys are stable.
pub type Params = BTreeMap<String, String>;

/// API version path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
