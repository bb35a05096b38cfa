//! Simulator configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with KVANT_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SimError, SimResult};

/// Environment variable holding the RNG seed.
pub const ENV_SEED: &str = "KVANT_SEED";
/// Environment variable holding the probability tolerance.
pub const ENV_TOLERANCE: &str = "KVANT_TOLERANCE";
/// Environment variable holding the deallocation tolerance.
pub const ENV_DEALLOC_TOLERANCE: &str = "KVANT_DEALLOC_TOLERANCE";

/// Settings for a [`Simulator`](crate::Simulator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Seed for the measurement RNG. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Probabilities within this distance of 0 or 1 are treated as exact,
    /// so measurement of a basis state consumes no randomness.
    pub tolerance: f64,

    /// Largest P(1) accepted when deallocating an unmeasured qubit.
    pub dealloc_tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tolerance: 1e-10,
            dealloc_tolerance: 1e-10,
        }
    }
}

impl SimulatorConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the probability tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the deallocation tolerance.
    #[must_use]
    pub fn with_dealloc_tolerance(mut self, tolerance: f64) -> Self {
        self.dealloc_tolerance = tolerance;
        self
    }

    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> SimResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| SimError::Config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml_str(&contents)
    }

    /// Defaults overridden by `KVANT_*` environment variables.
    pub fn from_env() -> SimResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> SimResult<Self> {
        let base = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Apply `KVANT_*` environment variables on top of this configuration.
    pub fn with_env_overrides(self) -> SimResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> SimResult<Self> {
        if let Some(raw) = lookup(ENV_SEED) {
            let seed = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| SimError::Config(format!("{ENV_SEED}={raw:?}: {e}")))?;
            self.seed = Some(seed);
        }
        if let Some(raw) = lookup(ENV_TOLERANCE) {
            self.tolerance = parse_f64(ENV_TOLERANCE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DEALLOC_TOLERANCE) {
            self.dealloc_tolerance = parse_f64(ENV_DEALLOC_TOLERANCE, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that both tolerances lie in `[0, 0.5)`.
    pub fn validate(&self) -> SimResult<()> {
        for (name, value) in [
            ("tolerance", self.tolerance),
            ("dealloc_tolerance", self.dealloc_tolerance),
        ] {
            if !(0.0..0.5).contains(&value) {
                return Err(SimError::Config(format!(
                    "{name} must be in [0, 0.5), got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn parse_f64(key: &str, raw: &str) -> SimResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| SimError::Config(format!("{key}={raw:?}: {e}")))
}
