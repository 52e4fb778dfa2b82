use byteorder::{BigEndian, ByteOrder};
use rand::Rng;
use siphasher::sip::SipHasher;
use std::hash::{BuildHasher, Hasher};
use std::{cmp, fmt};

/// Number of bytes in a digest produced by [`HashPair`].
pub const DIGEST_LEN: usize = 4;

/// The default hash builder for the filter.
#[derive(Clone, Copy)]
pub struct SipHasherBuilder {
    k0: u64,
    k1: u64,
    hasher: SipHasher,
}

impl SipHasherBuilder {
    /// Constructs a new `SipHasherBuilder` that uses the thread-local RNG to seed itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::SipHasherBuilder;
    ///
    /// let hash_builder = SipHasherBuilder::from_entropy();
    /// ```
    pub fn from_entropy() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_seed(rng.gen(), rng.gen())
    }

    /// Constructs a new `SipHasherBuilder` that is seeded with the given keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::SipHasherBuilder;
    ///
    /// let hash_builder = SipHasherBuilder::from_seed(0, 0);
    /// ```
    pub fn from_seed(k0: u64, k1: u64) -> Self {
        SipHasherBuilder {
            k0,
            k1,
            hasher: SipHasher::new_with_keys(k0, k1),
        }
    }
}

impl fmt::Debug for SipHasherBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SipHasherBuilder")
            .field("k0", &self.k0)
            .field("k1", &self.k1)
            .finish()
    }
}

impl cmp::PartialEq for SipHasherBuilder {
    fn eq(&self, other: &SipHasherBuilder) -> bool {
        self.k0 == other.k0 && self.k1 == other.k1
    }
}

impl BuildHasher for SipHasherBuilder {
    type Hasher = SipHasher;

    #[inline]
    fn build_hasher(&self) -> SipHasher {
        self.hasher
    }
}

/// Two independent 32-bit hash functions over byte strings.
///
/// `hash1` digests keys and re-hashes fingerprints into the alternate bucket offset, `hash2`
/// turns a key's digest into its primary bucket index. Any two independently seeded
/// `BuildHasher`s will do; the default is a pair of keyed SipHash builders.
#[derive(Debug, PartialEq)]
pub struct HashPair<B = SipHasherBuilder> {
    hash_builders: [B; 2],
}

impl<B> HashPair<B>
where
    B: BuildHasher,
{
    /// Constructs a new `HashPair` from two hasher builders.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::{HashPair, SipHasherBuilder};
    ///
    /// let hash_pair = HashPair::with_hashers([
    ///     SipHasherBuilder::from_seed(0, 0),
    ///     SipHasherBuilder::from_seed(1, 1),
    /// ]);
    /// ```
    pub fn with_hashers(hash_builders: [B; 2]) -> Self {
        HashPair { hash_builders }
    }

    /// Returns the first hash of `data`.
    pub fn hash1(&self, data: &[u8]) -> u32 {
        hash(&self.hash_builders[0], data)
    }

    /// Returns the second hash of `data`.
    pub fn hash2(&self, data: &[u8]) -> u32 {
        hash(&self.hash_builders[1], data)
    }

    /// Returns the first hash of `data` as big-endian bytes.
    pub fn digest(&self, data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut digest = [0; DIGEST_LEN];
        BigEndian::write_u32(&mut digest, self.hash1(data));
        digest
    }

    /// Returns a reference to the hasher builders.
    pub fn hashers(&self) -> &[B; 2] {
        &self.hash_builders
    }
}

// Bytes are written as-is so that the digest depends only on the key's contents.
pub fn hash(hash_builder: &impl BuildHasher, data: &[u8]) -> u32 {
    let mut hasher = hash_builder.build_hasher();
    hasher.write(data);
    hasher.finish() as u32
}

#[cfg(test)]
pub mod tests {
    use super::{HashPair, SipHasherBuilder, DIGEST_LEN};
    use byteorder::{BigEndian, ByteOrder};
    use siphasher::sip::SipHasher;

    pub fn hash_builder_1() -> SipHasherBuilder {
        SipHasherBuilder {
            k0: 0,
            k1: 0,
            hasher: SipHasher::new_with_keys(0, 0),
        }
    }

    pub fn hash_builder_2() -> SipHasherBuilder {
        SipHasherBuilder {
            k0: 1,
            k1: 1,
            hasher: SipHasher::new_with_keys(1, 1),
        }
    }

    pub fn hash_pair() -> HashPair {
        HashPair::with_hashers([hash_builder_1(), hash_builder_2()])
    }

    #[test]
    fn test_from_seed() {
        assert_eq!(SipHasherBuilder::from_seed(0, 0), hash_builder_1());
        assert_ne!(SipHasherBuilder::from_seed(0, 0), hash_builder_2());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let hash_pair = hash_pair();
        assert_eq!(hash_pair.hash1(b"foo"), hash_pair.hash1(b"foo"));
        assert_eq!(hash_pair.hash2(b"foo"), hash_pair.hash2(b"foo"));
        assert_ne!(hash_pair.hash1(b"foo"), hash_pair.hash1(b"bar"));
    }

    #[test]
    fn test_hashes_are_independent() {
        let hash_pair = hash_pair();
        let keys: [&[u8]; 5] = [b"foo", b"bar", b"baz", b"Bess", b"Jane"];
        for key in keys.iter() {
            assert_ne!(hash_pair.hash1(key), hash_pair.hash2(key));
        }
    }

    #[test]
    fn test_digest() {
        let hash_pair = hash_pair();
        let digest = hash_pair.digest(b"Bess");
        assert_eq!(digest.len(), DIGEST_LEN);
        assert_eq!(BigEndian::read_u32(&digest), hash_pair.hash1(b"Bess"));
    }

    #[test]
    fn test_hashers() {
        let hash_pair = hash_pair();
        assert_eq!(hash_pair.hashers(), &[hash_builder_1(), hash_builder_2()]);
    }
}
