//! Scanner configuration
//!
//! Loaded from YAML (every field optional) and then adjusted by environment
//! variables:
//! - `SCAN_CONFIRM_THRESHOLD`: consecutive identical reads needed to confirm
//! - `SCAN_SINGLE_SHOT`: pause scanning after each confirmation (`0`/`1`)
//! - `SCAN_VERIFY_CHECKSUM`: require a valid EAN check digit (`0`/`1`)

use crate::error::{Result, ScanError};
use crate::models::Symbology;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Consecutive identical candidates required before a code is accepted
pub const DEFAULT_CONFIRM_THRESHOLD: u32 = 3;

fn parse_env_u32(value: Option<String>) -> Option<u32> {
    value.and_then(|v| v.trim().parse::<u32>().ok())
}

fn parse_env_bool_u8(value: Option<String>) -> Option<bool> {
    value
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
}

/// Debounce and session policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Consecutive identical candidates required to confirm
    pub confirm_threshold: u32,
    /// Accepted symbol lengths (subset of 8 and 13)
    pub accepted_lengths: Vec<usize>,
    /// Pause scanning after every confirmation
    pub suspend_on_confirm: bool,
    /// Reject candidates whose EAN check digit does not match
    pub verify_checksum: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            confirm_threshold: DEFAULT_CONFIRM_THRESHOLD,
            accepted_lengths: Symbology::ALL.iter().map(Symbology::symbol_len).collect(),
            suspend_on_confirm: false,
            verify_checksum: false,
        }
    }
}

impl ScanConfig {
    /// Load and validate a YAML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        debug!(path = %path.display(), ?config, "Loaded scan config");
        Ok(config)
    }

    /// Parse and validate YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults"
        let config: ScanConfig = if yaml.trim().is_empty() {
            ScanConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply `SCAN_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides using `lookup` in place of the process environment.
    ///
    /// Unparseable values are ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(threshold) = parse_env_u32(lookup("SCAN_CONFIRM_THRESHOLD")) {
            self.confirm_threshold = threshold;
        }
        if let Some(single_shot) = parse_env_bool_u8(lookup("SCAN_SINGLE_SHOT")) {
            self.suspend_on_confirm = single_shot;
        }
        if let Some(verify) = parse_env_bool_u8(lookup("SCAN_VERIFY_CHECKSUM")) {
            self.verify_checksum = verify;
        }
        self
    }

    /// Reject a zero threshold and lengths no symbology uses
    pub fn validate(&self) -> Result<()> {
        if self.confirm_threshold == 0 {
            return Err(ScanError::Config(
                "confirm_threshold must be at least 1".to_string(),
            ));
        }
        if self.accepted_lengths.is_empty() {
            return Err(ScanError::Config(
                "accepted_lengths must not be empty".to_string(),
            ));
        }
        if let Some(len) = self
            .accepted_lengths
            .iter()
            .find(|len| Symbology::from_len(**len).is_none())
        {
            return Err(ScanError::Config(format!(
                "unsupported symbol length {len} (expected 8 or 13)"
            )));
        }
        Ok(())
    }

    /// Whether candidates of this symbology pass the length filter
    pub fn accepts(&self, symbology: Symbology) -> bool {
        self.accepted_lengths.contains(&symbology.symbol_len())
    }
}
