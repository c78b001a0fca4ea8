//! Run a `WritePlan` against a vault.
//!
//! Plans run as a two-step saga: the primary step (a write) must succeed
//! before the cleanup step (a delete, for renames) is issued.  If the
//! primary step fails nothing has changed and the error is returned.  If
//! the cleanup fails the new secret already exists, so the outcome is
//! `PartiallyApplied` and the old name is reported as orphaned.  Nothing
//! is retried here.

use super::client::VaultClient;
use super::record::SecretRecord;
use crate::errors::{ExplorerError, Result};
use crate::sync::{WriteOp, WritePlan};

/// Result of running a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Every step succeeded.
    Completed { written: SecretRecord },
    /// The write succeeded but the old secret could not be deleted.
    PartiallyApplied {
        written: SecretRecord,
        orphaned: String,
        reason: String,
    },
}

impl ExecutionOutcome {
    pub fn written(&self) -> &SecretRecord {
        match self {
            Self::Completed { written } | Self::PartiallyApplied { written, .. } => written,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Execute `plan` step by step.
pub fn execute_plan(client: &mut dyn VaultClient, plan: &WritePlan) -> Result<ExecutionOutcome> {
    let written = apply_write(client, &plan.primary)?;

    let Some(cleanup) = &plan.cleanup else {
        return Ok(ExecutionOutcome::Completed { written });
    };

    match apply_cleanup(client, cleanup) {
        Ok(()) => Ok(ExecutionOutcome::Completed { written }),
        Err(e) => Ok(ExecutionOutcome::PartiallyApplied {
            written,
            orphaned: cleanup.name().to_string(),
            reason: e.to_string(),
        }),
    }
}

fn apply_write(client: &mut dyn VaultClient, op: &WriteOp) -> Result<SecretRecord> {
    match op {
        WriteOp::Set {
            name,
            value,
            tags,
            content_type,
            attributes,
        } => client.set(name, value, tags, content_type, attributes),
        WriteOp::UpdateAttributesAndTags {
            name,
            tags,
            content_type,
            attributes,
        } => client.update(name, tags, content_type.as_deref(), attributes),
        WriteOp::Delete { name } => Err(ExplorerError::CommandFailed(format!(
            "plan must start with a write, not a delete of '{name}'"
        ))),
    }
}

fn apply_cleanup(client: &mut dyn VaultClient, op: &WriteOp) -> Result<()> {
    match op {
        WriteOp::Delete { name } => client.delete(name),
        other => apply_write(client, other).map(|_| ()),
    }
}
