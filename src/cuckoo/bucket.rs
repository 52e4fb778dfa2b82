use crate::cuckoo::{BUCKET_LEN, DIGEST_LEN};
use crate::error::{CuckooError, Result};
use std::fmt;

/// A short, fixed-length byte digest stored in place of a key.
///
/// Two fingerprints are equal when their bytes are equal. Distinct keys may share a fingerprint,
/// which is the only source of false positives in the filter.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    bytes: [u8; DIGEST_LEN],
    len: u8,
}

impl Fingerprint {
    /// Constructs a fingerprint from `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is empty or longer than [`DIGEST_LEN`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::Fingerprint;
    ///
    /// let fingerprint = Fingerprint::new(&[0x9d, 0x01]);
    /// assert_eq!(fingerprint.as_bytes(), &[0x9d, 0x01]);
    /// ```
    pub fn new(bytes: &[u8]) -> Self {
        assert!(!bytes.is_empty() && bytes.len() <= DIGEST_LEN);
        let mut fingerprint = Fingerprint {
            bytes: [0; DIGEST_LEN],
            len: bytes.len() as u8,
        };
        fingerprint.bytes[..bytes.len()].copy_from_slice(bytes);
        fingerprint
    }

    /// Returns the bytes of the fingerprint.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint(")?;
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

/// A fixed group of [`BUCKET_LEN`] slots, each holding at most one fingerprint.
///
/// Slots are never shifted: removing a fingerprint leaves a hole that the next insertion into
/// the bucket fills first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bucket {
    slots: [Option<Fingerprint>; BUCKET_LEN],
}

impl Bucket {
    /// Constructs an empty bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if any slot holds `fingerprint`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::{Bucket, Fingerprint};
    ///
    /// let mut bucket = Bucket::new();
    /// let fingerprint = Fingerprint::new(&[1]);
    ///
    /// assert!(!bucket.contains(&fingerprint));
    /// bucket.insert(fingerprint).unwrap();
    /// assert!(bucket.contains(&fingerprint));
    /// ```
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.index_of(fingerprint).is_some()
    }

    /// Returns the position of the first slot holding `fingerprint`.
    pub fn index_of(&self, fingerprint: &Fingerprint) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(fingerprint))
    }

    /// Empties the first slot holding `fingerprint`. Returns `true` if a slot was emptied.
    pub fn remove(&mut self, fingerprint: &Fingerprint) -> bool {
        match self.index_of(fingerprint) {
            Some(slot) => {
                self.slots[slot] = None;
                true
            }
            None => false,
        }
    }

    /// Returns the position of the first empty slot.
    ///
    /// # Errors
    ///
    /// Returns [`CuckooError::BucketFull`] if every slot is occupied.
    pub fn first_empty_slot(&self) -> Result<usize> {
        self.slots
            .iter()
            .position(Option::is_none)
            .ok_or(CuckooError::BucketFull)
    }

    /// Places `fingerprint` in the first empty slot and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`CuckooError::BucketFull`] if every slot is occupied.
    pub fn insert(&mut self, fingerprint: Fingerprint) -> Result<usize> {
        let slot = self.first_empty_slot()?;
        self.slots[slot] = Some(fingerprint);
        Ok(slot)
    }

    // Puts `fingerprint` at `slot` and hands back whatever was there.
    pub(super) fn swap(&mut self, slot: usize, fingerprint: Fingerprint) -> Option<Fingerprint> {
        self.slots[slot].replace(fingerprint)
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Returns `true` if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Empties every slot.
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{Bucket, Fingerprint};
    use crate::cuckoo::BUCKET_LEN;
    use crate::error::CuckooError;

    fn fingerprint(byte: u8) -> Fingerprint {
        Fingerprint::new(&[byte])
    }

    fn full_bucket() -> Bucket {
        let mut bucket = Bucket::new();
        for byte in 0..BUCKET_LEN as u8 {
            bucket.insert(fingerprint(byte + 1)).unwrap();
        }
        bucket
    }

    #[test]
    fn test_fingerprint_equality_is_byte_exact() {
        assert_eq!(Fingerprint::new(&[1, 2]), Fingerprint::new(&[1, 2]));
        assert_ne!(Fingerprint::new(&[1, 2]), Fingerprint::new(&[1, 3]));
        assert_ne!(Fingerprint::new(&[1]), Fingerprint::new(&[1, 0]));
    }

    #[test]
    #[should_panic]
    fn test_fingerprint_too_long() {
        Fingerprint::new(&[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_fingerprint_debug() {
        assert_eq!(
            format!("{:?}", Fingerprint::new(&[0x9d, 0x0a])),
            "Fingerprint(9d0a)",
        );
    }

    #[test]
    fn test_new() {
        let bucket = Bucket::new();
        assert!(bucket.is_empty());
        assert!(!bucket.is_full());
        assert_eq!(bucket.len(), 0);
        assert_eq!(bucket.first_empty_slot(), Ok(0));
    }

    #[test]
    fn test_insert_first_fit() {
        let mut bucket = Bucket::new();
        assert_eq!(bucket.insert(fingerprint(1)), Ok(0));
        assert_eq!(bucket.insert(fingerprint(2)), Ok(1));
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket.index_of(&fingerprint(2)), Some(1));
        assert_eq!(bucket.index_of(&fingerprint(3)), None);
    }

    #[test]
    fn test_insert_full() {
        let mut bucket = full_bucket();
        assert!(bucket.is_full());
        assert_eq!(bucket.first_empty_slot(), Err(CuckooError::BucketFull));
        assert_eq!(bucket.insert(fingerprint(9)), Err(CuckooError::BucketFull));
        assert!(!bucket.contains(&fingerprint(9)));
    }

    #[test]
    fn test_remove_does_not_shift() {
        let mut bucket = full_bucket();
        assert!(bucket.remove(&fingerprint(2)));
        assert!(!bucket.remove(&fingerprint(2)));

        assert_eq!(bucket.len(), BUCKET_LEN - 1);
        assert_eq!(bucket.index_of(&fingerprint(3)), Some(2));
        assert_eq!(bucket.first_empty_slot(), Ok(1));
    }

    #[test]
    fn test_remove_duplicates_one_at_a_time() {
        let mut bucket = Bucket::new();
        bucket.insert(fingerprint(7)).unwrap();
        bucket.insert(fingerprint(7)).unwrap();

        assert!(bucket.remove(&fingerprint(7)));
        assert!(bucket.contains(&fingerprint(7)));
        assert_eq!(bucket.index_of(&fingerprint(7)), Some(1));
        assert!(bucket.remove(&fingerprint(7)));
        assert!(bucket.is_empty());
    }

    #[test]
    fn test_swap() {
        let mut bucket = full_bucket();
        assert_eq!(bucket.swap(3, fingerprint(9)), Some(fingerprint(4)));
        assert!(bucket.contains(&fingerprint(9)));
        assert!(!bucket.contains(&fingerprint(4)));

        let mut bucket = Bucket::new();
        assert_eq!(bucket.swap(0, fingerprint(9)), None);
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut bucket = full_bucket();
        bucket.clear();
        assert!(bucket.is_empty());
        assert_eq!(bucket.len(), 0);
        assert_eq!(bucket.first_empty_slot(), Ok(0));
    }
}
