use crate::cuckoo::{fingerprint_size, Bucket, Fingerprint, BUCKET_LEN, DEFAULT_MAX_KICKS};
use crate::error::{CuckooError, Result};
use crate::util::{HashPair, DIGEST_LEN};
use crate::SipHasherBuilder;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::hash::BuildHasher;
use tracing::{debug, trace, warn};

/// A space-efficient probabilistic data structure to test for membership in a set. Cuckoo filters
/// also provide the flexibility to remove items.
///
/// A cuckoo filter is based on cuckoo hashing and is essentially a cuckoo hash table storing
/// each keys' fingerprint. Every fingerprint lives in one of two candidate buckets; when both are
/// full, resident fingerprints are kicked to their alternate bucket until a free slot turns up or
/// the relocation budget runs out.
///
/// The table is allocated once and never resized. Concurrent use needs an external lock around
/// the whole filter, since a single insertion may touch a chain of buckets.
///
/// # Examples
///
/// ```
/// use cuckoo_filter::cuckoo::CuckooFilter;
///
/// let mut filter = CuckooFilter::new(20, 0.001);
///
/// assert!(!filter.contains(b"foo"));
/// filter.insert(b"foo").unwrap();
/// assert!(filter.contains(b"foo"));
///
/// assert!(filter.remove(b"foo"));
/// assert!(!filter.contains(b"foo"));
///
/// assert_eq!(filter.len(), 0);
/// assert_eq!(filter.capacity(), 32);
/// assert_eq!(filter.bucket_len(), 8);
/// assert_eq!(filter.fingerprint_len(), 1);
/// ```
#[derive(Debug)]
pub struct CuckooFilter<B = SipHasherBuilder, R = XorShiftRng> {
    max_kicks: usize,
    fingerprint_len: usize,
    len: usize,
    buckets: Vec<Bucket>,
    hash_pair: HashPair<B>,
    rng: R,
}

impl CuckooFilter {
    /// Constructs a new, empty `CuckooFilter` with an estimated max capacity of `item_count` and
    /// a target false positive probability of `fpp`. The hashers and the relocation RNG are
    /// seeded from entropy, and insertions give up after 500 relocations.
    ///
    /// `item_count` is rounded up to the next power of two and split into buckets of four slots,
    /// with at least one bucket. A count too large to round up gets a single bucket. An `fpp`
    /// outside `(0, 1)` still yields a usable filter with fingerprints between one and four bytes
    /// long.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let filter = CuckooFilter::new(100, 0.01);
    /// ```
    pub fn new(item_count: usize, fpp: f64) -> Self {
        Self::with_hashers(
            item_count,
            fpp,
            [
                SipHasherBuilder::from_entropy(),
                SipHasherBuilder::from_entropy(),
            ],
        )
    }
}

impl<B> CuckooFilter<B>
where
    B: BuildHasher,
{
    /// Constructs a new, empty `CuckooFilter` with an estimated max capacity of `item_count`, a
    /// target false positive probability of `fpp`, and two hasher builders. The relocation RNG is
    /// seeded from entropy.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    /// use cuckoo_filter::SipHasherBuilder;
    ///
    /// let filter = CuckooFilter::with_hashers(
    ///     100,
    ///     0.01,
    ///     [SipHasherBuilder::from_seed(0, 0), SipHasherBuilder::from_seed(1, 1)],
    /// );
    /// ```
    pub fn with_hashers(item_count: usize, fpp: f64, hash_builders: [B; 2]) -> Self {
        Self::with_hashers_and_rng(
            item_count,
            fpp,
            hash_builders,
            XorShiftRng::from_entropy(),
        )
    }
}

impl<B, R> CuckooFilter<B, R>
where
    B: BuildHasher,
    R: Rng,
{
    /// Constructs a new, empty `CuckooFilter` with an estimated max capacity of `item_count`, a
    /// target false positive probability of `fpp`, two hasher builders, and the RNG used to pick
    /// which fingerprint to kick during relocation. A seeded RNG makes relocation reproducible.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    /// use cuckoo_filter::SipHasherBuilder;
    /// use rand::SeedableRng;
    /// use rand_xorshift::XorShiftRng;
    ///
    /// let filter = CuckooFilter::with_hashers_and_rng(
    ///     100,
    ///     0.01,
    ///     [SipHasherBuilder::from_seed(0, 0), SipHasherBuilder::from_seed(1, 1)],
    ///     XorShiftRng::seed_from_u64(0),
    /// );
    /// ```
    pub fn with_hashers_and_rng(
        item_count: usize,
        fpp: f64,
        hash_builders: [B; 2],
        rng: R,
    ) -> Self {
        // counts past the largest power of two wrap to 0, which still yields one bucket
        let slot_count = item_count.checked_next_power_of_two().unwrap_or(0);
        let bucket_len = (slot_count / BUCKET_LEN).max(1);
        CuckooFilter {
            max_kicks: DEFAULT_MAX_KICKS,
            fingerprint_len: fingerprint_size(BUCKET_LEN, fpp).min(DIGEST_LEN),
            len: 0,
            buckets: vec![Bucket::new(); bucket_len],
            hash_pair: HashPair::with_hashers(hash_builders),
            rng,
        }
    }

    /// Sets the maximum number of relocations an insertion attempts before giving up. With a
    /// budget of 0, an insertion into two full candidate buckets fails without touching the
    /// filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let filter = CuckooFilter::new(100, 0.01).with_max_kicks(64);
    /// assert_eq!(filter.max_kicks(), 64);
    /// ```
    pub fn with_max_kicks(mut self, max_kicks: usize) -> Self {
        self.max_kicks = max_kicks;
        self
    }

    fn get_fingerprint_and_indexes(&self, key: &[u8]) -> (Fingerprint, usize, usize) {
        let digest = self.hash_pair.digest(key);
        let fingerprint = Fingerprint::new(&digest[..self.fingerprint_len]);
        let index_1 = self.hash_pair.hash2(&digest) as usize % self.bucket_len();
        let index_2 = self.get_alternate_index(index_1, &fingerprint);
        (fingerprint, index_1, index_2)
    }

    // Symmetric: applying it twice with the same fingerprint returns the original index.
    #[inline]
    fn get_alternate_index(&self, index: usize, fingerprint: &Fingerprint) -> usize {
        let offset = self.hash_pair.hash1(fingerprint.as_bytes()) as usize % self.bucket_len();
        (index ^ offset) % self.bucket_len()
    }

    /// Inserts a key into the cuckoo filter. Inserting the same key twice stores two copies of its
    /// fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`CuckooError::FilterFull`] if both candidate buckets are full and relocation ran
    /// out of kicks. In that case the fingerprints along the relocation path stay where they were
    /// moved and the last evicted one is dropped, so one stored fingerprint is lost. It may belong
    /// to a previously inserted key rather than to `key`.
    ///
    /// Returns [`CuckooError::NoEmptySlot`] if both candidate buckets are full and the relocation
    /// budget is 0. The filter is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    /// use cuckoo_filter::CuckooError;
    ///
    /// let mut filter = CuckooFilter::new(4, 0.01);
    /// for key in &[b"foo", b"bar", b"baz", b"qux"] {
    ///     filter.insert(*key).unwrap();
    /// }
    ///
    /// assert_eq!(filter.insert(b"quux"), Err(CuckooError::FilterFull { kicks: 500 }));
    /// ```
    pub fn insert(&mut self, key: &[u8]) -> Result<()> {
        let (fingerprint, index_1, index_2) = self.get_fingerprint_and_indexes(key);
        if self.buckets[index_1].insert(fingerprint).is_ok()
            || self.buckets[index_2].insert(fingerprint).is_ok()
        {
            self.len += 1;
            return Ok(());
        }

        if self.max_kicks == 0 {
            return Err(CuckooError::NoEmptySlot);
        }

        // have to kick out an entry, always starting from the primary bucket
        trace!(index_1, index_2, "both candidate buckets full, relocating");
        let mut fingerprint = fingerprint;
        let mut index = index_1;
        for kicks in 1..=self.max_kicks {
            let slot = self.rng.gen_range(0, BUCKET_LEN);
            fingerprint = match self.buckets[index].swap(slot, fingerprint) {
                Some(evicted) => evicted,
                None => {
                    self.len += 1;
                    return Ok(());
                }
            };
            index = self.get_alternate_index(index, &fingerprint);
            if self.buckets[index].insert(fingerprint).is_ok() {
                debug!(kicks, index, "relocated fingerprint");
                self.len += 1;
                return Ok(());
            }
        }

        warn!(
            kicks = self.max_kicks,
            index,
            ?fingerprint,
            "relocation budget exhausted, dropping evicted fingerprint"
        );
        Err(CuckooError::FilterFull {
            kicks: self.max_kicks,
        })
    }

    /// Removes a key from the cuckoo filter, trying its primary bucket before its alternate.
    /// Returns `true` if a matching fingerprint was removed.
    ///
    /// Only fingerprints are stored, so removing a key whose fingerprint and buckets collide with
    /// another inserted key may remove that key's entry instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let mut filter = CuckooFilter::new(100, 0.01);
    ///
    /// filter.insert(b"foo").unwrap();
    /// assert!(filter.contains(b"foo"));
    ///
    /// assert!(filter.remove(b"foo"));
    /// assert!(!filter.contains(b"foo"));
    /// assert!(!filter.remove(b"foo"));
    /// ```
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let (fingerprint, index_1, index_2) = self.get_fingerprint_and_indexes(key);
        let removed =
            self.buckets[index_1].remove(&fingerprint) || self.buckets[index_2].remove(&fingerprint);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Checks if a key is possibly in the cuckoo filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let mut filter = CuckooFilter::new(100, 0.01);
    ///
    /// filter.insert(b"foo").unwrap();
    /// assert!(filter.contains(b"foo"));
    /// ```
    pub fn contains(&self, key: &[u8]) -> bool {
        let (fingerprint, index_1, index_2) = self.get_fingerprint_and_indexes(key);
        self.buckets[index_1].contains(&fingerprint) || self.buckets[index_2].contains(&fingerprint)
    }

    /// Clears the cuckoo filter, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let mut filter = CuckooFilter::new(100, 0.01);
    ///
    /// filter.insert(b"foo").unwrap();
    /// filter.clear();
    ///
    /// assert!(!filter.contains(b"foo"));
    /// assert!(filter.is_empty());
    /// ```
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Returns the number of occupied slots in the cuckoo filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let filter = CuckooFilter::new(100, 0.01);
    ///
    /// assert_eq!(filter.len(), 0);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no occupied slots in the cuckoo filter.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the total number of slots in the cuckoo filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let filter = CuckooFilter::new(100, 0.01);
    ///
    /// assert_eq!(filter.capacity(), 128);
    /// ```
    pub fn capacity(&self) -> usize {
        self.bucket_len() * BUCKET_LEN
    }

    /// Returns the number of buckets in the cuckoo filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let filter = CuckooFilter::new(100, 0.01);
    ///
    /// assert_eq!(filter.bucket_len(), 32);
    /// ```
    pub fn bucket_len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of slots in each bucket.
    pub fn entries_per_bucket(&self) -> usize {
        BUCKET_LEN
    }

    /// Returns the number of bytes in each fingerprint.
    pub fn fingerprint_len(&self) -> usize {
        self.fingerprint_len
    }

    /// Returns the maximum number of relocations an insertion attempts.
    pub fn max_kicks(&self) -> usize {
        self.max_kicks
    }

    /// Returns the fraction of occupied slots.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Returns the estimated false positive probability of the cuckoo filter. This value will
    /// increase as more items are added.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let mut filter = CuckooFilter::new(100, 0.01);
    /// assert!(filter.estimated_fpp() < std::f64::EPSILON);
    ///
    /// filter.insert(b"foo").unwrap();
    /// assert!(filter.estimated_fpp() > std::f64::EPSILON);
    /// assert!(filter.estimated_fpp() < 0.01);
    /// ```
    pub fn estimated_fpp(&self) -> f64 {
        let fingerprints_count = 2.0f64.powi(8 * self.fingerprint_len as i32);
        let single_fpp = 1.0 - 1.0 / fingerprints_count;
        1.0 - single_fpp.powf(2.0 * BUCKET_LEN as f64 * self.load_factor())
    }

    /// Returns the number of bytes of fingerprint storage, fixed at construction.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::cuckoo::CuckooFilter;
    ///
    /// let filter = CuckooFilter::new(1000, 0.000_001);
    ///
    /// assert_eq!(filter.memory_usage(), 256 * 4 * 2);
    /// ```
    pub fn memory_usage(&self) -> usize {
        self.capacity() * self.fingerprint_len
    }

    /// Returns a reference to the cuckoo filter's hasher builders.
    pub fn hashers(&self) -> &[B; 2] {
        self.hash_pair.hashers()
    }
}

impl<B, R> PartialEq for CuckooFilter<B, R>
where
    B: PartialEq,
{
    fn eq(&self, other: &CuckooFilter<B, R>) -> bool {
        self.max_kicks == other.max_kicks
            && self.fingerprint_len == other.fingerprint_len
            && self.len == other.len
            && self.buckets == other.buckets
            && self.hash_pair == other.hash_pair
    }
}
