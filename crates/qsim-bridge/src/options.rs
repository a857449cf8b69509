//! Simulator options.

use std::collections::BTreeMap;

use qsim_engine::RunOptions;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// Option keys the bridge fills in itself: `c` carries the circuit and `i`
/// the amplitude bitstrings.
pub const RESERVED_KEYS: [&str; 2] = ["c", "i"];

/// Options applied to every engine call.
///
/// Keys follow the engine's single-letter convention: `t` threads, `f`
/// maximum fused gate size, `v` verbosity. Any other key is passed through
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QsimOptions {
    /// Number of engine worker threads.
    #[serde(rename = "t", alias = "threads", default = "default_threads")]
    pub num_threads: u32,
    /// Maximum fused gate size.
    #[serde(rename = "f", alias = "max_fused_size", default = "default_fused_size")]
    pub max_fused_size: u32,
    /// Engine verbosity.
    #[serde(rename = "v", alias = "verbosity", default)]
    pub verbosity: u32,
    /// Further options passed to the engine.
    #[serde(flatten)]
    pub extra: BTreeMap<String, i64>,
}

fn default_threads() -> u32 {
    1
}

fn default_fused_size() -> u32 {
    2
}

impl Default for QsimOptions {
    fn default() -> Self {
        Self {
            num_threads: default_threads(),
            max_fused_size: default_fused_size(),
            verbosity: 0,
            extra: BTreeMap::new(),
        }
    }
}

impl QsimOptions {
    /// Build options from a string-keyed map, starting from the defaults.
    pub fn from_map<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, i64)>,
    ) -> BridgeResult<Self> {
        let mut options = Self::default();
        for (key, value) in entries {
            options.set(key, value)?;
        }
        Ok(options)
    }

    /// Parse options from JSON and validate them.
    pub fn from_json(json: &str) -> BridgeResult<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| BridgeError::InvalidOption(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Set a single option.
    pub fn set(&mut self, key: impl Into<String>, value: i64) -> BridgeResult<()> {
        let key = key.into();
        match key.as_str() {
            k if RESERVED_KEYS.contains(&k) => return Err(BridgeError::ReservedOption(key)),
            "t" => self.num_threads = to_u32(&key, value)?,
            "f" => self.max_fused_size = to_u32(&key, value)?,
            "v" => self.verbosity = to_u32(&key, value)?,
            _ => {
                self.extra.insert(key, value);
            }
        }
        Ok(())
    }

    /// Check for reserved keys and unusable values.
    pub fn validate(&self) -> BridgeResult<()> {
        if let Some(key) = self.extra.keys().find(|k| RESERVED_KEYS.contains(&k.as_str())) {
            return Err(BridgeError::ReservedOption(key.clone()));
        }
        if self.num_threads == 0 {
            return Err(BridgeError::InvalidOption(
                "thread count must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Engine options for one call.
    pub fn to_run_options(&self, seed: u64) -> RunOptions {
        RunOptions {
            num_threads: self.num_threads,
            max_fused_size: self.max_fused_size,
            verbosity: self.verbosity,
            seed,
            extra: self.extra.clone(),
        }
    }
}

fn to_u32(key: &str, value: i64) -> BridgeResult<u32> {
    u32::try_from(value)
        .map_err(|_| BridgeError::InvalidOption(format!("'{key}' must be non-negative, got {value}")))
}
