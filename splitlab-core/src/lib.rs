//! SplitLab Core — deterministic hash-based group assignment.
//!
//! The engine behind A/B/N experimentation without an assignment table:
//! - Uniform sample derivation (SHA-256 over salt + key → `[0, 1)`)
//! - Stable key encoding for identifier types
//! - Validated, ordered group specifications with weighted buckets
//! - The `Splitter` entry point composing the two
//!
//! Everything here is purely functional and stateless: no assignment is ever
//! stored, and any process that knows the salt and group spec computes the
//! same assignment for the same key.

pub mod groups;
pub mod key;
pub mod sample;
pub mod splitter;

pub use groups::{GroupSpec, SpecError, WEIGHT_SUM_EPSILON};
pub use key::StableKey;
pub use sample::{unit_interval, SampleError, UnitSample, KEY_SEPARATOR};
pub use splitter::Splitter;
