//! Content hashing utilities.

use xxhash_rust::xxh3::xxh3_64;

fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// Content hash as fixed-width lower-case hex, as stored in manifests
#[must_use]
pub fn content_hash_hex(data: &[u8]) -> String {
    format!("{:016x}", content_hash(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash() {
        let data = b"hello world";
        let hash = content_hash(data);
        assert_ne!(hash, 0);

        // Same input should produce same hash
        assert_eq!(hash, content_hash(data));

        // Different input should produce different hash
        assert_ne!(hash, content_hash(b"hello world!"));
    }

    #[test]
    fn test_content_hash_hex_is_fixed_width() {
        assert_eq!(content_hash_hex(b"").len(), 16);
        assert_eq!(content_hash_hex(b"hello").len(), 16);
        assert_eq!(
            content_hash_hex(b"hello"),
            format!("{:016x}", content_hash(b"hello"))
        );
    }
}
