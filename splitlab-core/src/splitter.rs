//! The assignment entry point: salt + key + groups → group name.

use crate::groups::GroupSpec;
use crate::key::StableKey;
use crate::sample::{unit_interval, UnitSample};

/// Deterministic group assignment for one experiment.
///
/// Holds nothing but the salt. Every call is an independent, pure
/// computation, so a single `Splitter` can be shared freely across threads —
/// or reconstructed from the salt on any machine — and all of them agree on
/// every assignment.
///
/// ```
/// use splitlab_core::Splitter;
///
/// let splitter = Splitter::new("pricing_2026");
/// let group = splitter.group_default(&12345_u64);
/// assert_eq!(group, splitter.group_default(&12345_u64));
/// ```
#[derive(Debug, Clone)]
pub struct Splitter {
    salt: String,
}

impl Splitter {
    /// Create a splitter for one experiment. Distinct salts produce
    /// statistically independent assignments for the same population.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Derive the uniform sample for a key under this experiment's salt.
    pub fn sample<K: StableKey + ?Sized>(&self, key: &K) -> UnitSample {
        unit_interval(&self.salt, &key.stable_key())
    }

    /// Assign a key to one of the spec's groups.
    ///
    /// Infallible: spec validation happened at construction, and bucket
    /// assignment is total over the unit interval.
    pub fn group<'a, K: StableKey + ?Sized>(&self, key: &K, spec: &'a GroupSpec) -> &'a str {
        spec.assign(self.sample(key))
    }

    /// Assign a key under the default `control`/`test` 50/50 split.
    pub fn group_default<K: StableKey + ?Sized>(&self, key: &K) -> &'static str {
        let spec = GroupSpec::control_test();
        match spec.assign_index(self.sample(key)) {
            0 => "control",
            _ => "test",
        }
    }
}
