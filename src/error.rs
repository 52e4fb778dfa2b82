//! Error types for cuckoo filter operations.

/// Result type alias for cuckoo filter operations.
pub type Result<T> = std::result::Result<T, CuckooError>;

/// Errors that can occur when placing fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CuckooError {
    /// A single bucket has no empty slot.
    #[error("bucket has no empty slot")]
    BucketFull,

    /// Both candidate buckets were full and relocation is disabled. The filter is unchanged.
    #[error("both candidate buckets are full and relocation is disabled")]
    NoEmptySlot,

    /// The relocation budget was exhausted without finding an empty slot.
    ///
    /// Fingerprints moved along the relocation path stay where they were moved and the last
    /// evicted fingerprint is dropped, so one previously stored item is no longer in the filter.
    #[error("filter is full: no empty slot found after {kicks} kicks")]
    FilterFull {
        /// Number of relocations attempted.
        kicks: usize,
    },
}

impl CuckooError {
    /// Returns `true` if the error means the key could not be inserted because the filter is
    /// full, whether or not relocation was attempted.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_filter::CuckooError;
    ///
    /// assert!(CuckooError::NoEmptySlot.is_full());
    /// assert!(CuckooError::FilterFull { kicks: 500 }.is_full());
    /// assert!(!CuckooError::BucketFull.is_full());
    /// ```
    pub fn is_full(&self) -> bool {
        match self {
            CuckooError::NoEmptySlot | CuckooError::FilterFull { .. } => true,
            CuckooError::BucketFull => false,
        }
    }
}
