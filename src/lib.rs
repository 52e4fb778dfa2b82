//! # cuckoo-filter
//!
//! `cuckoo-filter` is a compact, fixed-memory approximate set-membership filter. Unlike a Bloom
//! filter it supports deletion, and its false positive rate is bounded when the filter is
//! constructed. It is meant to sit in front of an expensive lookup (a backing store, an index) and
//! answer "does this key possibly exist?" cheaply.
//!
//! Keys are raw byte strings. Each key is reduced to a short fingerprint that lives in one of two
//! candidate buckets of four slots each. When both candidate buckets are full, existing
//! fingerprints are kicked to their alternate bucket, up to a bounded number of times.
//!
//! ## Usage
//!
//! ```rust
//! use cuckoo_filter::cuckoo::CuckooFilter;
//!
//! let mut filter = CuckooFilter::new(1000, 0.001);
//! filter.insert(b"Bess").unwrap();
//!
//! assert!(filter.contains(b"Bess"));
//! assert!(filter.remove(b"Bess"));
//! assert!(!filter.contains(b"Bess"));
//! ```
//!
//! ## References
//!
//!  - [Cuckoo Filter: Practically Better Than Bloom](https://dl.acm.org/citation.cfm?id=2674994)
//!  > Fan, Bin, Dave G. Andersen, Michael Kaminsky, and Michael D. Mitzenmacher. 2014. “Cuckoo Filter: Practically Better Than Bloom.” In *Proceedings of the 10th Acm International on Conference on Emerging Networking Experiments and Technologies*, 75–88. CoNEXT ’14. New York, NY, USA: ACM. doi:[10.1145/2674005.2674994](https://doi.org/10.1145/2674005.2674994).

#![warn(missing_docs)]

pub mod cuckoo;
pub mod error;
mod util;

pub use self::error::{CuckooError, Result};
pub use self::util::{HashPair, SipHasherBuilder};
