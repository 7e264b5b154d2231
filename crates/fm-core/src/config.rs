//! Source list configuration
//!
//! ```json
//! {
//!   "whitelist": ["https://example.com/allow.txt"],
//!   "blocklist": ["https://example.com/ads.txt", "https://example.com/trackers.txt"]
//! }
//! ```
//!
//! Order matters: sources are folded into their category store in the order
//! they are listed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::Category;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered source identifiers per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sources {
    #[serde(default)]
    pub whitelist: Vec<String>,
    #[serde(default)]
    pub blocklist: Vec<String>,
}

impl Sources {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn for_category(&self, category: Category) -> &[String] {
        match category {
            Category::Whitelist => &self.whitelist,
            Category::Blocklist => &self.blocklist,
        }
    }

    pub fn total(&self) -> usize {
        self.whitelist.len() + self.blocklist.len()
    }
}
