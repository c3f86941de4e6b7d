// Persisted dashboard preferences: the watchlist and view defaults.
// An explicit struct with a load/save lifecycle at process boundaries;
// never ambient global state.

use crate::identity;
use crate::models::TimeRange;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub watchlist: Vec<WatchedNode>,
    #[serde(default)]
    pub zen_mode: bool,
    #[serde(default = "default_range")]
    pub last_range: TimeRange,
}

fn default_range() -> TimeRange {
    TimeRange::H24
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            watchlist: Vec::new(),
            zen_mode: false,
            last_range: default_range(),
        }
    }
}

/// One watched node. Identity is derived, not stored, so an address change
/// in the file naturally re-scopes the node's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedNode {
    pub public_key: String,
    #[serde(default)]
    pub address: String,
    pub network: String,
    /// Committed capacity in bytes; set for fleets that re-register with a
    /// different capacity on the same key/host.
    #[serde(default)]
    pub committed: Option<u64>,
}

impl WatchedNode {
    pub fn identity(&self) -> String {
        match self.committed {
            Some(bytes) => identity::derive_identity_with_capacity(
                &self.public_key,
                &self.address,
                &self.network,
                bytes,
            ),
            None => identity::derive_identity(&self.public_key, &self.address, &self.network),
        }
    }
}

impl Preferences {
    /// Loads from `path`; a missing file yields defaults, not an error.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let s = std::fs::read_to_string(path)?;
        Self::load_from_str(&s)
    }

    /// Parse from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
