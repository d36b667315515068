use std::collections::BTreeMap;
use std::fmt;

use serde_json::json;
use sha2::{Digest, Sha256};

/// Filesystem-safe identifier for one logical request.
///
/// The request descriptor is rendered as canonical JSON (object keys
/// sorted) and hashed with SHA-256, so the key is a 64-character lowercase
/// hex string. Distinct descriptors cannot collide through character
/// stripping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(
        method: &str,
        path: &str,
        params: &BTreeMap<String, String>,
        version: &str,
    ) -> Self {
        let descriptor = json!({
            "method": method,
            "path": path,
            "params": params,
            "version": version,
        });

        let mut hasher = Sha256::new();
        hasher.update(descriptor.to_string().as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
