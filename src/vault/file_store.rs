//! Local JSON-file vault.
//!
//! A stand-in for a remote vault, used offline and in tests.  The file
//! holds a single JSON document:
//!
//! ```text
//! { "format": 1, "revision": 42, "secrets": [ SecretRecord, ... ] }
//! ```
//!
//! Every mutation rewrites the whole document **atomically** (temp file
//! in the same directory + rename), so readers never see a half-written
//! vault.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::client::{MemoryVault, VaultClient};
use super::record::{SecretAttributes, SecretRecord};
use crate::errors::{ExplorerError, Result};

/// Current document format version.
pub const CURRENT_FORMAT: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct VaultDocument {
    format: u8,
    #[serde(default)]
    revision: u64,
    #[serde(default)]
    secrets: Vec<SecretRecord>,
}

/// A vault persisted as a JSON file.
pub struct FileVault {
    path: PathBuf,
    inner: MemoryVault,
}

impl FileVault {
    /// Open the vault at `path`.
    ///
    /// A missing file is an empty vault; it is created on the first write.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                inner: MemoryVault::new(),
            });
        }

        let data = fs::read(path)?;
        let doc: VaultDocument = serde_json::from_slice(&data)
            .map_err(|e| ExplorerError::VaultFormat(format!("{}: {e}", path.display())))?;

        if doc.format != CURRENT_FORMAT {
            return Err(ExplorerError::VaultFormat(format!(
                "unsupported format {}, expected {CURRENT_FORMAT}",
                doc.format
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            inner: MemoryVault::from_records(doc.secrets, doc.revision),
        })
    }

    /// Path to the vault file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of secrets in the vault.
    pub fn secret_count(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    /// Serialize the vault and write it to disk atomically.
    pub fn save(&self) -> Result<()> {
        let doc = VaultDocument {
            format: CURRENT_FORMAT,
            revision: self.inner.revision(),
            secrets: self.inner.records().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&doc)
            .map_err(|e| ExplorerError::SerializationError(format!("vault: {e}")))?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // The temp file is in the same directory so the rename stays on
        // one filesystem.
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));

        fs::write(&tmp_path, &bytes)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600));
        }

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl VaultClient for FileVault {
    fn list(&self) -> Result<Vec<SecretRecord>> {
        self.inner.list()
    }

    fn get(&self, name: &str) -> Result<SecretRecord> {
        self.inner.get(name)
    }

    fn set(
        &mut self,
        name: &str,
        value: &str,
        tags: &BTreeMap<String, String>,
        content_type: &str,
        attributes: &SecretAttributes,
    ) -> Result<SecretRecord> {
        let record = self.inner.set(name, value, tags, content_type, attributes)?;
        self.save()?;
        Ok(record)
    }

    fn update(
        &mut self,
        name: &str,
        tags: &BTreeMap<String, String>,
        content_type: Option<&str>,
        attributes: &SecretAttributes,
    ) -> Result<SecretRecord> {
        let record = self.inner.update(name, tags, content_type, attributes)?;
        self.save()?;
        Ok(record)
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.inner.delete(name)?;
        self.save()
    }
}
