//! Content hashing using blake3.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let h = hash::content_hash(b"body{color:red}");
//! let tag = hash::etag(b"body{color:red}"); // -> "\"a1b2c3d4e5f60718\""
//! ```

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 8 bytes (16 hex chars) for brevity
        f.write_str(&hex::encode(&self.0[..8]))
    }
}

/// Compute blake3 hash of in-memory content.
#[inline]
pub fn content_hash(data: &[u8]) -> ContentHash {
    ContentHash(*blake3::hash(data).as_bytes())
}

/// Strong entity tag for `data`, quoted for the `ETag` header.
pub fn etag(data: &[u8]) -> String {
    format!("\"{}\"", content_hash(data))
}
