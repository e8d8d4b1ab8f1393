use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{TransformParams, DEFAULT_MAX_TRANSFORM_ROUNDS};
use crate::errors::{Kdb1Error, Result};
use crate::format::Cipher;

/// Reader configuration, loaded from `.kdb1.toml`.
///
/// Every field has a default, so no config file is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Databases declaring more key transform rounds are refused.
    #[serde(default = "default_max_transform_rounds")]
    pub max_transform_rounds: u32,

    /// Run the two key transform lanes on separate threads.
    #[serde(default = "default_parallel_transform")]
    pub parallel_transform: bool,

    /// Also try the Latin-1 bytes of non-ASCII passwords.
    #[serde(default = "default_legacy_password_encodings")]
    pub legacy_password_encodings: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_max_transform_rounds() -> u32 {
    DEFAULT_MAX_TRANSFORM_ROUNDS
}

fn default_parallel_transform() -> bool {
    true
}

fn default_legacy_password_encodings() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_transform_rounds: default_max_transform_rounds(),
            parallel_transform: default_parallel_transform(),
            legacy_password_encodings: default_legacy_password_encodings(),
        }
    }
}

impl Settings {
    /// Name of the config file looked up in a directory.
    pub const FILE_NAME: &'static str = ".kdb1.toml";

    /// Load settings from `<dir>/.kdb1.toml`.
    ///
    /// A missing file gives the defaults; a file that does not parse is
    /// an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        toml::from_str(&contents).map_err(|e| {
            Kdb1Error::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Key transform parameters for the crypto layer.
    pub fn transform_params(&self) -> TransformParams {
        TransformParams {
            max_rounds: self.max_transform_rounds,
            parallel: self.parallel_transform,
            cipher: Cipher::Aes256,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
