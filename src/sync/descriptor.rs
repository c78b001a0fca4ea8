//! The desired state of a secret, and the rules it must satisfy
//! before anything is written.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::fingerprint::Fingerprint;
use crate::content::{ContentType, DisplayValue};
use crate::errors::{ExplorerError, Result};
use crate::vault::SecretAttributes;

/// Reserved tag holding the content fingerprint.
pub const FINGERPRINT_TAG: &str = "Fingerprint";

/// Reserved tag holding the identity of the last writer.
pub const CHANGED_BY_TAG: &str = "ChangedBy";

/// Tag names owned by the system, never by the user.
pub const RESERVED_TAGS: [&str; 2] = [FINGERPRINT_TAG, CHANGED_BY_TAG];

/// Vault limits on tags (reserved tags count toward `MAX_TAGS`).
pub const MAX_TAGS: usize = 15;
pub const MAX_TAG_NAME_LEN: usize = 512;
pub const MAX_TAG_VALUE_LEN: usize = 256;

/// Default maximum size of an encoded raw value (25 KiB).
pub const DEFAULT_MAX_VALUE_BYTES: usize = 25 * 1024;

/// Size limits applied during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_value_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
        }
    }
}

/// One user-visible custom tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagItem {
    pub name: String,
    pub value: String,
}

impl TagItem {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse `name=value` as typed on the command line.
    pub fn parse(s: &str) -> Result<Self> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| ExplorerError::InvalidTag(format!("'{s}' is not in NAME=VALUE form")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ExplorerError::InvalidTag("tag name cannot be empty".into()));
        }
        Ok(Self::new(name, value.trim()))
    }
}

/// `true` if `name` is one of the reserved tag names.
pub fn is_reserved_tag(name: &str) -> bool {
    RESERVED_TAGS.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// Drop reserved tags from a vault tag map, leaving only custom tags.
pub fn custom_tags(tags: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    tags.iter()
        .filter(|(k, _)| !is_reserved_tag(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// The new desired state of a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretDescriptor {
    pub name: String,
    /// Custom tags only; reserved tags are added by the reconciler.
    pub tags: BTreeMap<String, String>,
    pub attributes: SecretAttributes,
    pub content_type: ContentType,
    pub value: DisplayValue,
}

impl SecretDescriptor {
    pub fn new(name: impl Into<String>, content_type: ContentType, value: DisplayValue) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
            attributes: SecretAttributes::default(),
            content_type,
            value,
        }
    }

    pub fn with_tag(mut self, tag: TagItem) -> Self {
        self.tags.insert(tag.name, tag.value);
        self
    }

    pub fn with_attributes(mut self, attributes: SecretAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// The raw value to store.
    pub fn raw_value(&self) -> Result<String> {
        self.content_type.encode(&self.value)
    }

    /// Fingerprint of the raw value.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        Ok(Fingerprint::of(self.raw_value()?.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9A-Za-z-]{1,127}$").expect("static pattern compiles"))
}

/// Validate a secret name against the vault naming scheme.
///
/// Allowed: 1-127 ASCII letters, digits and hyphens.
pub fn validate_secret_name(name: &str) -> Result<()> {
    if name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(ExplorerError::InvalidName(name.to_string()))
    }
}

/// Validate custom tags: no reserved names, within vault limits.
pub fn validate_tags(tags: &BTreeMap<String, String>) -> Result<()> {
    if let Some(reserved) = tags.keys().find(|k| is_reserved_tag(k)) {
        return Err(ExplorerError::ReservedTag(reserved.clone()));
    }

    let total = tags.len() + RESERVED_TAGS.len();
    if total > MAX_TAGS {
        return Err(ExplorerError::InvalidTag(format!(
            "{} custom tags given, at most {} allowed",
            tags.len(),
            MAX_TAGS - RESERVED_TAGS.len()
        )));
    }

    for (name, value) in tags {
        if name.is_empty() {
            return Err(ExplorerError::InvalidTag("tag name cannot be empty".into()));
        }
        if name.chars().count() > MAX_TAG_NAME_LEN {
            return Err(ExplorerError::InvalidTag(format!(
                "tag name '{name}' exceeds {MAX_TAG_NAME_LEN} characters"
            )));
        }
        if value.chars().count() > MAX_TAG_VALUE_LEN {
            return Err(ExplorerError::InvalidTag(format!(
                "value of tag '{name}' exceeds {MAX_TAG_VALUE_LEN} characters"
            )));
        }
    }
    Ok(())
}

/// Validate the validity window.
pub fn validate_attributes(attributes: &SecretAttributes) -> Result<()> {
    if let (Some(nb), Some(exp)) = (attributes.not_before, attributes.expires) {
        if nb > exp {
            return Err(ExplorerError::InvalidAttributes(format!(
                "valid-from {nb} is after valid-until {exp}"
            )));
        }
    }
    Ok(())
}
