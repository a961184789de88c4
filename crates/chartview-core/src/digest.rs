//! Content hashing for override values

use md5::{Digest, Md5};

/// Width of a content hash in hex characters
pub const CONTENT_HASH_LEN: usize = 32;

/// Compute the content hash of a byte payload
///
/// The digest is taken over the raw bytes with no normalization, so two
/// payloads hash equal exactly when they are byte-identical.
pub fn content_hash(payload: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_fixed_width() {
        assert_eq!(content_hash(b"").len(), CONTENT_HASH_LEN);
        assert_eq!(content_hash(b"affinity: {}").len(), CONTENT_HASH_LEN);
    }

    #[test]
    fn test_content_hash_known_value() {
        assert_eq!(content_hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_content_hash_is_byte_sensitive() {
        // Semantically equal YAML, different bytes
        assert_ne!(content_hash(b"affinity: {}"), content_hash(b"affinity:  {}"));
        assert_eq!(content_hash(b"affinity: {}"), content_hash(b"affinity: {}"));
    }
}
