//! Uniform sample derivation.
//!
//! Maps a `(salt, key)` pair onto the unit interval via SHA-256. The digest is
//! computed over `salt + "_" + key`; the first 8 bytes are read as a
//! big-endian u64 and divided by 2^64. The hash choice, prefix width,
//! endianness, and separator are a compatibility contract: two services that
//! agree on them agree on every assignment for the same salt, with no shared
//! state and no coordination.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Separator inserted between salt and key before hashing.
///
/// Part of the interop contract — changing it changes every assignment.
pub const KEY_SEPARATOR: &str = "_";

/// A real number in the unit interval, used as the pseudo-random source for
/// bucket selection.
///
/// [`UnitSample::new`] accepts only `[0, 1)`, but samples derived by
/// [`unit_interval`] can equal exactly 1.0 when the digest prefix rounds up
/// during the u64→f64 conversion; the bucket scan's trailing fallback
/// absorbs that case. Derived samples are never stored; each one exists only
/// for the duration of a single assignment call.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct UnitSample(f64);

impl UnitSample {
    /// Wrap a raw value, rejecting anything outside `[0, 1)` (including NaN).
    ///
    /// This is the entry point for synthetic samples in tests and diagnostics;
    /// production samples come from [`unit_interval`].
    pub fn new(value: f64) -> Result<Self, SampleError> {
        if !(0.0..1.0).contains(&value) {
            return Err(SampleError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    #[error("sample {value} is outside the unit interval [0, 1)")]
    OutOfRange { value: f64 },
}

/// Derive the uniform sample for a `(salt, key)` pair.
///
/// Deterministic and stateless: the same inputs produce the same sample in
/// any process, on any machine, at any point in time. Distinct salts produce
/// uncorrelated samples for the same key.
pub fn unit_interval(salt: &str, key: &str) -> UnitSample {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(KEY_SEPARATOR.as_bytes());
    hasher.update(key.as_bytes());
    let digest = hasher.finalize();
    let prefix = u64::from_be_bytes(digest[..8].try_into().unwrap());
    // The u64→f64 conversion rounds to nearest, so a prefix within 2^10 of
    // u64::MAX lands on 2^64 exactly and the quotient is 1.0. The bucket
    // scan's trailing fallback absorbs that case, so it is left unclamped to
    // stay bit-identical with other conforming implementations.
    UnitSample(prefix as f64 / 2f64.powi(64))
}
