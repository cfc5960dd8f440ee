//! Content hashing with FxHash.
//!
//! Used for sprite fingerprints in the manifest.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// 64-bit hash of `data`.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// 8-char hex fingerprint of `value`.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    format!("{:016x}", compute(value))[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_deterministic() {
        assert_eq!(compute("<svg/>"), compute(b"<svg/>".as_slice()));
        assert_ne!(compute("<svg/>"), compute("<svg></svg>"));
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint("icons");
        assert_eq!(fp.len(), 8);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
