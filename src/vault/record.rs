//! Secret records as exchanged with a vault.
//!
//! A `SecretRecord` is a read-only snapshot: the raw value exactly as
//! stored, its content-type label, tags and attributes.  Records fetched
//! right before an edit double as the "prior state" for reconciliation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{ContentType, DisplayValue};
use crate::errors::Result;
use crate::sync::{Fingerprint, FINGERPRINT_TAG};

/// Secret attributes controlled by the vault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretAttributes {
    /// `None` means the vault default (enabled).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,
}

impl SecretAttributes {
    /// Effective enabled flag (unspecified means enabled).
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// `true` if `now` falls inside the validity window.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_enabled()
            && self.not_before.map_or(true, |nb| nb <= now)
            && self.expires.map_or(true, |exp| now < exp)
    }
}

/// A secret as returned by the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    pub id: String,
    pub name: String,

    /// The raw value exactly as stored.
    pub value: String,

    /// Persisted content-type label (absent = no content type).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub attributes: SecretAttributes,

    /// When the vault last wrote this record.
    pub updated: DateTime<Utc>,
}

impl SecretRecord {
    pub fn content_type(&self) -> ContentType {
        ContentType::from_label(self.content_type.as_deref())
    }

    /// Decode the stored value with this record's content type.
    pub fn display_value(&self) -> Result<DisplayValue> {
        self.content_type().decode(&self.value)
    }

    /// The fingerprint recorded in the tags, if present and well-formed.
    pub fn stored_fingerprint(&self) -> Option<Fingerprint> {
        self.tags
            .get(FINGERPRINT_TAG)
            .and_then(|tag| tag.parse().ok())
    }

    /// Case-insensitive match against the name, content type and tags.
    pub fn matches(&self, needle: &regex::Regex) -> bool {
        needle.is_match(&self.name)
            || needle.is_match(self.content_type().display_name())
            || self
                .tags
                .iter()
                .any(|(k, v)| needle.is_match(k) || needle.is_match(v))
    }
}

/// Lightweight metadata about a secret (no value).
#[derive(Debug, Clone)]
pub struct SecretMetadata {
    pub name: String,
    pub content_type: ContentType,
    pub enabled: bool,
    pub expires: Option<DateTime<Utc>>,
    pub updated: DateTime<Utc>,
    pub fingerprint: Option<Fingerprint>,
    pub changed_by: Option<String>,
}

impl From<&SecretRecord> for SecretMetadata {
    fn from(record: &SecretRecord) -> Self {
        Self {
            name: record.name.clone(),
            content_type: record.content_type(),
            enabled: record.attributes.is_enabled(),
            expires: record.attributes.expires,
            updated: record.updated,
            fingerprint: record.stored_fingerprint(),
            changed_by: record.tags.get(crate::sync::CHANGED_BY_TAG).cloned(),
        }
    }
}
