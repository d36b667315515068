//! Blocking client for the Polygon market-data REST API.
//!
//! Every endpoint call maps to a single GET request. Responses are cached
//! on disk, keyed by a hash of the request shape, and served from the
//! cache on later calls with the same shape.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;

pub use api::{
    ApiError, ApiVersion, HttpTransport, Method, Params, RestClient, Transport, MAX_BATCH_SYMBOLS,
};
pub use cache::{CacheError, CacheKey, FileCache};
pub use config::ClientConfig;
