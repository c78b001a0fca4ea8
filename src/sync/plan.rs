//! Write plans handed to the vault client.
//!
//! A plan has one or two steps.  The `primary` step always runs first;
//! `cleanup` (only present for renames) may only run once the primary
//! step has been acknowledged by the vault.

use std::collections::BTreeMap;
use std::fmt;

use crate::vault::SecretAttributes;

/// Which kind of write reconciliation decided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// No prior secret.
    Create,
    /// Name changed: write under the new name, then delete the old one.
    Rename,
    /// Same name, new content.
    Replace,
    /// Same name, same content: tags and attributes only.
    AttributesOnly,
    /// Enable or disable.
    Toggle,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Rename => "rename",
            Self::Replace => "replace",
            Self::AttributesOnly => "attributes-only",
            Self::Toggle => "toggle",
        };
        f.write_str(s)
    }
}

/// A single vault mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Write a new version of the secret (value + metadata).
    Set {
        name: String,
        value: String,
        tags: BTreeMap<String, String>,
        content_type: String,
        attributes: SecretAttributes,
    },
    /// Update metadata without touching the stored value.
    /// `content_type: None` leaves the stored label as is.
    UpdateAttributesAndTags {
        name: String,
        tags: BTreeMap<String, String>,
        content_type: Option<String>,
        attributes: SecretAttributes,
    },
    Delete {
        name: String,
    },
}

impl WriteOp {
    /// Name of the secret this step touches.
    pub fn name(&self) -> &str {
        match self {
            Self::Set { name, .. }
            | Self::UpdateAttributesAndTags { name, .. }
            | Self::Delete { name } => name,
        }
    }

    /// Short verb used in output and the audit log.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Set { .. } => "set",
            Self::UpdateAttributesAndTags { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    pub fn tags(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Set { tags, .. } | Self::UpdateAttributesAndTags { tags, .. } => Some(tags),
            Self::Delete { .. } => None,
        }
    }
}

/// Ordered vault mutations produced by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePlan {
    pub kind: PlanKind,
    pub primary: WriteOp,
    pub cleanup: Option<WriteOp>,
}

impl WritePlan {
    pub fn single(kind: PlanKind, op: WriteOp) -> Self {
        Self {
            kind,
            primary: op,
            cleanup: None,
        }
    }

    /// The steps, in execution order.
    pub fn ops(&self) -> impl Iterator<Item = &WriteOp> {
        std::iter::once(&self.primary).chain(self.cleanup.as_ref())
    }

    /// `true` if the plan rewrites the stored value.
    pub fn writes_value(&self) -> bool {
        matches!(self.primary, WriteOp::Set { .. })
    }
}
