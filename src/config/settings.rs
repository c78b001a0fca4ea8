use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ExplorerError, Result};
use crate::sync::descriptor::DEFAULT_MAX_VALUE_BYTES;
use crate::sync::Limits;

/// Project-level configuration, loaded from `.kvx.toml`.
///
/// Every field has a sensible default so the explorer works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file (relative to the project root).
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Identity stamped into the `ChangedBy` tag.  Falls back to the
    /// login name when unset.
    #[serde(default)]
    pub changed_by: Option<String>,

    /// Maximum size of an encoded secret value, in bytes.
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,

    /// Maximum size of a file loaded as a secret, in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Record executed writes in the audit log.
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    ".kvx/vault.json".to_string()
}

fn default_max_value_bytes() -> usize {
    DEFAULT_MAX_VALUE_BYTES
}

fn default_max_file_bytes() -> u64 {
    1024 * 1024 // 1 MB
}

fn default_audit_enabled() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            changed_by: None,
            max_value_bytes: default_max_value_bytes(),
            max_file_bytes: default_max_file_bytes(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".kvx.toml";

    /// Load settings from `<project_dir>/.kvx.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ExplorerError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.max_value_bytes == 0 {
            return Err(ExplorerError::ConfigError(
                "max_value_bytes must be greater than zero".into(),
            ));
        }

        Ok(settings)
    }

    /// Full path to the vault file.
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_file)
    }

    /// Reconciliation limits derived from these settings.
    pub fn limits(&self) -> Limits {
        Limits {
            max_value_bytes: self.max_value_bytes,
        }
    }

    /// Identity for the `ChangedBy` tag: config, then `USER` /
    /// `USERNAME`, then "unknown".
    pub fn changed_by(&self) -> String {
        if let Some(name) = self.changed_by.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        ["USER", "USERNAME"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
