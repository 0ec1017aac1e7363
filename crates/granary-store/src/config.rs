use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Capacities a store is built with.
///
/// ```toml
/// container_capacity = 10.0
/// storage_capacity = 20.0
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub container_capacity: f32,
    pub storage_capacity: f32,
}

impl StoreConfig {
    pub fn new(container_capacity: f32, storage_capacity: f32) -> Self {
        Self {
            container_capacity,
            storage_capacity,
        }
    }

    /// Parse a config from TOML text. The capacities are not validated.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check the capacity bounds enforced at store construction.
    ///
    /// Comparisons are written so that NaN fails both checks.
    pub fn validate(&self) -> StoreResult<()> {
        if !(self.container_capacity >= 0.0) {
            return Err(self.invalid("container capacity must not be negative"));
        }
        if !(self.storage_capacity >= self.container_capacity) {
            return Err(self.invalid("storage capacity must not be less than container capacity"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &'static str) -> StoreError {
        StoreError::InvalidConfiguration {
            container_capacity: self.container_capacity,
            storage_capacity: self.storage_capacity,
            reason,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            container_capacity: 10.0,
            storage_capacity: 20.0,
        }
    }
}
