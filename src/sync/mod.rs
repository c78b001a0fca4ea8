//! Sync module: deciding what to write to the vault.
//!
//! This module provides:
//! - `SecretDescriptor`, tags and validation rules (`descriptor`)
//! - Content fingerprints and duplicate detection (`fingerprint`)
//! - `WritePlan` and its steps (`plan`)
//! - The reconciler that classifies a write (`reconcile`)

pub mod descriptor;
pub mod fingerprint;
pub mod plan;
pub mod reconcile;

pub use descriptor::{
    custom_tags, Limits, SecretDescriptor, TagItem, CHANGED_BY_TAG, FINGERPRINT_TAG,
};
pub use fingerprint::{find_collisions, snapshot, Fingerprint, KnownDigest};
pub use plan::{PlanKind, WriteOp, WritePlan};
pub use reconcile::{plan, plan_toggle};
