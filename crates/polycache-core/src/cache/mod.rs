//! On-disk response cache.
//!
//! This module provides `FileCache`, a flat directory of JSON files with
//! one file per request shape, and `CacheKey`, the filesystem-safe name
//! derived from that shape. Entries never expire and are never removed.

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::{CacheError, FileCache};
