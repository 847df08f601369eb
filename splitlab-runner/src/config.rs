//! Serializable experiment configuration.
//!
//! Captures an experiment's identity in a TOML file so services and batch
//! jobs share one source of truth for (salt, groups, weights):
//!
//! ```toml
//! salt = "pricing_2026"
//! groups = ["control", "variant_a", "variant_b"]
//! weights = [0.5, 0.25, 0.25]
//! ```
//!
//! `groups`/`weights` are optional: omitting both yields the default
//! control/test 50/50; groups alone get equal weights.

use serde::{Deserialize, Serialize};
use splitlab_core::{GroupSpec, SpecError, Splitter};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("weights given without groups")]
    WeightsWithoutGroups,

    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// One experiment: salt plus optional group specification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentConfig {
    /// Experiment identity. Changing the salt re-randomizes the population.
    pub salt: String,

    /// Group names in boundary order. Defaults to `["control", "test"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,

    /// Weights matching `groups`. Defaults to an equal split.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

impl ExperimentConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Resolve the configured groups/weights into a validated spec.
    pub fn group_spec(&self) -> Result<GroupSpec, ConfigError> {
        match (&self.groups, &self.weights) {
            (None, None) => Ok(GroupSpec::control_test()),
            (Some(groups), None) => Ok(GroupSpec::even(groups.clone())?),
            (Some(groups), Some(weights)) => {
                Ok(GroupSpec::new(groups.clone(), weights.clone())?)
            }
            (None, Some(_)) => Err(ConfigError::WeightsWithoutGroups),
        }
    }

    pub fn splitter(&self) -> Splitter {
        Splitter::new(self.salt.clone())
    }
}
