//! The vault-client boundary.
//!
//! Everything that talks to a vault goes through `VaultClient`.  The
//! reconciler never calls it; the executor and the CLI do.
//! `MemoryVault` is the reference implementation and the backing map of
//! `FileVault`.

use std::collections::BTreeMap;

use chrono::Utc;

use super::record::{SecretAttributes, SecretRecord};
use crate::errors::{ExplorerError, Result};

/// Operations a vault must support.
pub trait VaultClient {
    /// All secrets, sorted by name.
    fn list(&self) -> Result<Vec<SecretRecord>>;

    /// One secret by name.  Fails with `SecretNotFound` if absent.
    fn get(&self, name: &str) -> Result<SecretRecord>;

    /// Write a new version of a secret (creates it if needed).
    fn set(
        &mut self,
        name: &str,
        value: &str,
        tags: &BTreeMap<String, String>,
        content_type: &str,
        attributes: &SecretAttributes,
    ) -> Result<SecretRecord>;

    /// Replace tags and attributes of an existing secret.
    /// `content_type: None` keeps the stored label.
    fn update(
        &mut self,
        name: &str,
        tags: &BTreeMap<String, String>,
        content_type: Option<&str>,
        attributes: &SecretAttributes,
    ) -> Result<SecretRecord>;

    /// Remove a secret.  Fails with `SecretNotFound` if absent.
    fn delete(&mut self, name: &str) -> Result<()>;
}

/// An in-process vault keyed by secret name.
#[derive(Debug, Default, Clone)]
pub struct MemoryVault {
    secrets: BTreeMap<String, SecretRecord>,
    /// Incremented on every write; becomes part of the record id.
    revision: u64,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vault from existing records (e.g. loaded from disk).
    pub fn from_records(records: Vec<SecretRecord>, revision: u64) -> Self {
        let secrets = records.into_iter().map(|r| (r.name.clone(), r)).collect();
        Self { secrets, revision }
    }

    /// Number of writes performed so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn records(&self) -> impl Iterator<Item = &SecretRecord> {
        self.secrets.values()
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.secrets.contains_key(name)
    }

    fn next_id(&mut self, name: &str) -> String {
        self.revision += 1;
        format!("kvx://secrets/{name}/{:08}", self.revision)
    }
}

fn label_of(content_type: &str) -> Option<String> {
    if content_type.is_empty() {
        None
    } else {
        Some(content_type.to_string())
    }
}

impl VaultClient for MemoryVault {
    fn list(&self) -> Result<Vec<SecretRecord>> {
        Ok(self.secrets.values().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<SecretRecord> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| ExplorerError::SecretNotFound(name.to_string()))
    }

    fn set(
        &mut self,
        name: &str,
        value: &str,
        tags: &BTreeMap<String, String>,
        content_type: &str,
        attributes: &SecretAttributes,
    ) -> Result<SecretRecord> {
        let record = SecretRecord {
            id: self.next_id(name),
            name: name.to_string(),
            value: value.to_string(),
            content_type: label_of(content_type),
            tags: tags.clone(),
            attributes: *attributes,
            updated: Utc::now(),
        };
        self.secrets.insert(name.to_string(), record.clone());
        Ok(record)
    }

    fn update(
        &mut self,
        name: &str,
        tags: &BTreeMap<String, String>,
        content_type: Option<&str>,
        attributes: &SecretAttributes,
    ) -> Result<SecretRecord> {
        let record = self
            .secrets
            .get_mut(name)
            .ok_or_else(|| ExplorerError::SecretNotFound(name.to_string()))?;

        record.tags = tags.clone();
        if let Some(ct) = content_type {
            record.content_type = label_of(ct);
        }
        record.attributes = *attributes;
        record.updated = Utc::now();
        Ok(record.clone())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        if self.secrets.remove(name).is_none() {
            return Err(ExplorerError::SecretNotFound(name.to_string()));
        }
        Ok(())
    }
}
