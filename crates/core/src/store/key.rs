//! Request-descriptor cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a request descriptor.
///
/// The descriptor is the tuple (method, absolute URL, Accept header); any two
/// requests with the same descriptor address the same entry, regardless of the
/// partition consulted.
pub fn descriptor_key(method: &str, url: &str, accept: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hasher.update(b"\n");
    hasher.update(accept.as_bytes());
    hex::encode(hasher.finalize())
}
