//! BLAKE3 fingerprints for logging and identifiers.
//!
//! Cache keys embed the raw query text. Logs carry a 64-bit fingerprint of the
//! key instead, so questions never land in log files verbatim.

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// With 64 bits the birthday bound sits around 4 billion items, far beyond the
/// number of distinct questions a single process sees. A collision only makes
/// two log lines share a fingerprint; it never affects cache lookups, which
/// compare full keys.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Fingerprint of a full cache key string.
#[inline]
pub fn hash_cache_key(key: &str) -> u64 {
    hash_to_u64(key.as_bytes())
}

/// Hex fingerprint of a query, for log fields.
#[inline]
pub fn query_fingerprint(query: &str) -> String {
    format!("{:016x}", hash_to_u64(query.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_to_u64_determinism() {
        let data = b"document:What is the flash point?:a.pdf";
        assert_eq!(hash_to_u64(data), hash_to_u64(data));
    }

    #[test]
    fn test_hash_cache_key_uniqueness() {
        let keys = [
            "document:What is the flash point?",
            "document:What is the flash point?:a.pdf",
            "web:What is the flash point?",
            "sql:What is the flash point?:inventory",
            "document:what is the flash point?",
        ];

        let hashes: HashSet<_> = keys.iter().map(|k| hash_cache_key(k)).collect();
        assert_eq!(hashes.len(), keys.len());
    }

    #[test]
    fn test_query_fingerprint_is_fixed_width_hex() {
        let fp = query_fingerprint("");
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(fp, query_fingerprint(" "));
    }
}
