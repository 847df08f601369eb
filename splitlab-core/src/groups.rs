//! Group specification and bucket assignment.
//!
//! A [`GroupSpec`] is an ordered list of named, weighted buckets that
//! partitions the unit interval into contiguous left-closed/right-open
//! sub-intervals. Declaration order defines the interval boundaries, so
//! reordering the groups of a running experiment reassigns its population —
//! a breaking change, never a cosmetic one.
//!
//! Validation is eager and one-time: a constructed `GroupSpec` is always
//! internally consistent, and assignment from it is total (every sample maps
//! to exactly one group).

use serde::{Deserialize, Serialize};

use crate::sample::UnitSample;
use thiserror::Error;

/// Absolute tolerance for "weights sum to 1".
///
/// The original ratio specs people write (0.3/0.7, thirds, …) accumulate
/// float error well below this; anything above it is a caller mistake.
pub const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Errors from group/weight validation. Detected before any sample is
/// computed; never silently corrected.
#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    #[error("group specification is empty")]
    Empty,

    #[error("{names} group names but {weights} weights")]
    LengthMismatch { names: usize, weights: usize },

    #[error("group '{name}' has invalid weight {weight} (must be finite and >= 0)")]
    InvalidWeight { name: String, weight: f64 },

    #[error("weights sum to {sum}, expected 1 (absolute tolerance 1e-9)")]
    SumMismatch { sum: f64 },

    #[error("duplicate group name '{0}'")]
    DuplicateName(String),
}

/// Validated, ordered group specification.
///
/// Serialization round-trips through the raw `{groups, weights}` form and
/// re-validates on deserialize, so a `GroupSpec` decoded from a config file
/// carries the same guarantees as one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGroupSpec", into = "RawGroupSpec")]
pub struct GroupSpec {
    names: Vec<String>,
    weights: Vec<f64>,
    // Cumulative weight boundaries in declaration order; same length as
    // `names`, last entry ≈ 1.0.
    boundaries: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawGroupSpec {
    groups: Vec<String>,
    weights: Vec<f64>,
}

impl From<GroupSpec> for RawGroupSpec {
    fn from(spec: GroupSpec) -> Self {
        Self {
            groups: spec.names,
            weights: spec.weights,
        }
    }
}

impl TryFrom<RawGroupSpec> for GroupSpec {
    type Error = SpecError;

    fn try_from(raw: RawGroupSpec) -> Result<Self, SpecError> {
        GroupSpec::new(raw.groups, raw.weights)
    }
}

impl GroupSpec {
    /// Build a spec from parallel name/weight lists.
    ///
    /// Validates eagerly: matching lengths, at least one group, unique names,
    /// finite non-negative weights, sum within [`WEIGHT_SUM_EPSILON`] of 1.
    pub fn new(names: Vec<String>, weights: Vec<f64>) -> Result<Self, SpecError> {
        if names.len() != weights.len() {
            return Err(SpecError::LengthMismatch {
                names: names.len(),
                weights: weights.len(),
            });
        }
        if names.is_empty() {
            return Err(SpecError::Empty);
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(SpecError::DuplicateName(name.clone()));
            }
        }
        for (name, &weight) in names.iter().zip(&weights) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SpecError::InvalidWeight {
                    name: name.clone(),
                    weight,
                });
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(SpecError::SumMismatch { sum });
        }

        let mut boundaries = Vec::with_capacity(weights.len());
        let mut cumulative = 0.0;
        for &weight in &weights {
            cumulative += weight;
            boundaries.push(cumulative);
        }

        Ok(Self {
            names,
            weights,
            boundaries,
        })
    }

    /// Build a spec with equal weights over the given names.
    pub fn even(names: Vec<String>) -> Result<Self, SpecError> {
        if names.is_empty() {
            return Err(SpecError::Empty);
        }
        let weight = 1.0 / names.len() as f64;
        let weights = vec![weight; names.len()];
        Self::new(names, weights)
    }

    /// The default experiment: `control` and `test` at 50/50.
    ///
    /// Constructed fresh on every call — there is no shared default instance
    /// anywhere in the crate.
    pub fn control_test() -> Self {
        Self::new(
            vec!["control".to_string(), "test".to_string()],
            vec![0.5, 0.5],
        )
        .expect("control/test 50/50 is a valid spec")
    }

    /// `control`/`test` with the given test fraction.
    ///
    /// `test_fraction` outside `[0, 1]` fails weight validation. The
    /// endpoints are legal: `0.0` and `1.0` produce a zero-weight group that
    /// simply never receives interior samples.
    pub fn two_way(test_fraction: f64) -> Result<Self, SpecError> {
        Self::new(
            vec!["control".to_string(), "test".to_string()],
            vec![1.0 - test_fraction, test_fraction],
        )
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        // Always false: empty specs are unconstructible.
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Index of the bucket owning the sub-interval that contains `sample`.
    ///
    /// Scans boundaries in declaration order and returns on the first one the
    /// sample is strictly below (left-closed, right-open intervals). If float
    /// summation left the final boundary below 1.0 and the sample clears
    /// every boundary, the last group wins — assignment is total.
    pub fn assign_index(&self, sample: UnitSample) -> usize {
        let value = sample.value();
        for (i, &boundary) in self.boundaries.iter().enumerate() {
            if value < boundary {
                return i;
            }
        }
        self.names.len() - 1
    }

    /// Name of the group that contains `sample`.
    pub fn assign(&self, sample: UnitSample) -> &str {
        &self.names[self.assign_index(sample)]
    }
}
