//! Space-efficient probabilistic data structure to test for membership in a set with the ability
//! to remove items.

mod bucket;
mod cuckoo_filter;

/// Number of slots in every bucket.
pub const BUCKET_LEN: usize = 4;

/// Default maximum number of fingerprint relocations before an insertion gives up.
pub const DEFAULT_MAX_KICKS: usize = 500;

pub use self::bucket::{Bucket, Fingerprint};
pub use self::cuckoo_filter::CuckooFilter;
pub use crate::util::DIGEST_LEN;

/// Returns the fingerprint length in bytes needed to keep the false positive probability near
/// `fpp` when a lookup compares against `2 * entries_per_bucket` candidate slots.
///
/// The bit length is `ceil(log2(2 * entries_per_bucket / fpp))`, truncated to whole bytes, with a
/// floor of one byte.
///
/// # Examples
///
/// ```
/// use cuckoo_filter::cuckoo::fingerprint_size;
///
/// assert_eq!(fingerprint_size(4, 0.001), 1);
/// assert_eq!(fingerprint_size(4, 0.000_001), 2);
/// ```
pub fn fingerprint_size(entries_per_bucket: usize, fpp: f64) -> usize {
    let bit_count = (2.0 * entries_per_bucket as f64 / fpp).log2().ceil();
    // `as` saturates: NaN and negative bit counts become 0, infinity becomes usize::MAX
    let byte_count = bit_count as usize / 8;
    byte_count.max(1)
}

#[cfg(test)]
mod tests {
    use super::fingerprint_size;

    #[test]
    fn test_fingerprint_size() {
        assert_eq!(fingerprint_size(4, 0.001), 1);
        assert_eq!(fingerprint_size(4, 0.000_01), 2);
        assert_eq!(fingerprint_size(4, 0.000_001), 2);
        assert_eq!(fingerprint_size(4, 1e-9), 4);
        assert_eq!(fingerprint_size(4, 1e-12), 5);
    }

    #[test]
    fn test_fingerprint_size_floor() {
        assert_eq!(fingerprint_size(4, 0.5), 1);
        assert_eq!(fingerprint_size(4, 0.99), 1);
        assert_eq!(fingerprint_size(1, 0.5), 1);
    }

    #[test]
    fn test_fingerprint_size_grows() {
        assert!(fingerprint_size(4, 1e-6) > fingerprint_size(4, 1e-2));
        assert!(fingerprint_size(256, 1e-3) > fingerprint_size(4, 1e-3));
    }

    #[test]
    fn test_fingerprint_size_out_of_range() {
        assert_eq!(fingerprint_size(4, 16.0), 1);
        assert_eq!(fingerprint_size(4, std::f64::NAN), 1);
        assert!(fingerprint_size(4, 0.0) > 4);
    }
}
