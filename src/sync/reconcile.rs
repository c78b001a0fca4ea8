//! Write reconciliation: compare the desired state of a secret with the
//! state last fetched from the vault and decide what to write.
//!
//! Everything here is pure.  Validation runs before classification, so a
//! failure never yields a partial plan.

use std::collections::BTreeMap;

use super::descriptor::{
    validate_attributes, validate_secret_name, validate_tags, Limits, SecretDescriptor,
    CHANGED_BY_TAG, FINGERPRINT_TAG, MAX_TAG_VALUE_LEN,
};
use super::fingerprint::Fingerprint;
use super::plan::{PlanKind, WriteOp, WritePlan};
use crate::errors::{ExplorerError, Result};
use crate::vault::{SecretAttributes, SecretRecord};

/// Plan the write that turns `prior` (if any) into `desired`.
///
/// - no prior: **Create**
/// - prior under another name: **Rename** (set new, then delete old)
/// - same name, same content: **AttributesOnly**
/// - same name, new content: **Replace**
pub fn plan(
    prior: Option<&SecretRecord>,
    desired: &SecretDescriptor,
    changed_by: &str,
    limits: &Limits,
) -> Result<WritePlan> {
    validate_secret_name(&desired.name)?;
    validate_tags(&desired.tags)?;
    validate_attributes(&desired.attributes)?;

    let raw = desired.raw_value()?;

    let Some(prior) = prior else {
        check_size(&raw, limits)?;
        let op = set_op(desired, raw, changed_by);
        return Ok(WritePlan::single(PlanKind::Create, op));
    };

    if prior.name != desired.name {
        check_size(&raw, limits)?;
        return Ok(WritePlan {
            kind: PlanKind::Rename,
            primary: set_op(desired, raw, changed_by),
            cleanup: Some(WriteOp::Delete {
                name: prior.name.clone(),
            }),
        });
    }

    if content_unchanged(prior, desired, &raw)? {
        // The stored value stays, so the fingerprint describes it.
        let fingerprint = Fingerprint::of(prior.value.as_bytes());
        let op = WriteOp::UpdateAttributesAndTags {
            name: desired.name.clone(),
            tags: stamped_tags(&desired.tags, Some(fingerprint), changed_by),
            content_type: Some(desired.content_type.label().to_string()),
            attributes: desired.attributes,
        };
        return Ok(WritePlan::single(PlanKind::AttributesOnly, op));
    }

    check_size(&raw, limits)?;
    Ok(WritePlan::single(
        PlanKind::Replace,
        set_op(desired, raw, changed_by),
    ))
}

/// Plan an enable/disable of an existing secret.
///
/// Only `enabled` changes.  Tags are carried through as stored, apart
/// from the `ChangedBy` stamp and a missing `Fingerprint`, and the
/// content type is left alone.
pub fn plan_toggle(prior: &SecretRecord, enable: bool, changed_by: &str) -> Result<WritePlan> {
    validate_secret_name(&prior.name)?;

    let mut tags = prior.tags.clone();
    tags.insert(CHANGED_BY_TAG.to_string(), changed_by_stamp(changed_by));
    // Secrets written by other tools may lack a usable fingerprint.
    if prior.stored_fingerprint().is_none() {
        tags.insert(
            FINGERPRINT_TAG.to_string(),
            Fingerprint::of(prior.value.as_bytes()).to_string(),
        );
    }

    let op = WriteOp::UpdateAttributesAndTags {
        name: prior.name.clone(),
        tags,
        content_type: None,
        attributes: SecretAttributes {
            enabled: Some(enable),
            ..prior.attributes
        },
    };
    Ok(WritePlan::single(PlanKind::Toggle, op))
}

/// Normalize the writer identity to fit a tag value.
pub fn changed_by_stamp(changed_by: &str) -> String {
    let trimmed = changed_by.trim();
    if trimmed.is_empty() {
        return "unknown".to_string();
    }
    trimmed.chars().take(MAX_TAG_VALUE_LEN).collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn set_op(desired: &SecretDescriptor, raw: String, changed_by: &str) -> WriteOp {
    let fingerprint = Fingerprint::of(raw.as_bytes());
    WriteOp::Set {
        name: desired.name.clone(),
        tags: stamped_tags(&desired.tags, Some(fingerprint), changed_by),
        value: raw,
        content_type: desired.content_type.label().to_string(),
        attributes: desired.attributes,
    }
}

/// Custom tags plus the reserved ones.
fn stamped_tags(
    custom: &BTreeMap<String, String>,
    fingerprint: Option<Fingerprint>,
    changed_by: &str,
) -> BTreeMap<String, String> {
    let mut tags = custom.clone();
    if let Some(fp) = fingerprint {
        tags.insert(FINGERPRINT_TAG.to_string(), fp.to_string());
    }
    tags.insert(CHANGED_BY_TAG.to_string(), changed_by_stamp(changed_by));
    tags
}

fn check_size(raw: &str, limits: &Limits) -> Result<()> {
    if raw.len() > limits.max_value_bytes {
        return Err(ExplorerError::OversizedValue {
            size: raw.len(),
            max: limits.max_value_bytes,
        });
    }
    Ok(())
}

/// Is the content the same as what the vault holds?
///
/// Byte-equal raw values always are.  For content types with a real
/// transform (JSON, certificates) a raw value written by another tool
/// may differ only in formatting, so both sides are decoded and compared.
fn content_unchanged(prior: &SecretRecord, desired: &SecretDescriptor, raw: &str) -> Result<bool> {
    if prior.value == raw {
        return Ok(true);
    }

    let ct = &desired.content_type;
    if !ct.has_transform() || prior.content_type() != *ct {
        return Ok(false);
    }

    let previous = ct
        .decode(&prior.value)
        .map_err(|_| ExplorerError::UndecodableProvenanceValue(prior.name.clone()))?;
    let current = ct.decode(raw)?;
    Ok(previous == current || ct.same_content(&prior.value, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CertificateValueObject, ContentType, DisplayValue};
    use chrono::Utc;

    fn prior(name: &str, value: &str, label: Option<&str>) -> SecretRecord {
        SecretRecord {
            id: format!("id-{name}"),
            name: name.into(),
            value: value.into(),
            content_type: label.map(str::to_string),
            tags: BTreeMap::new(),
            attributes: SecretAttributes::default(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn json_reformatted_by_another_tool_is_unchanged() {
        let p = prior("cfg", "{ \"a\" : 1 }", Some("application/json"));
        let desired = SecretDescriptor::new(
            "cfg",
            ContentType::Json,
            DisplayValue::Text("{\"a\":1}".into()),
        );
        let plan = plan(Some(&p), &desired, "me", &Limits::default()).unwrap();
        assert_eq!(plan.kind, PlanKind::AttributesOnly);
        assert_eq!(
            plan.primary.tags().unwrap()[FINGERPRINT_TAG],
            Fingerprint::of(p.value.as_bytes()).to_string()
        );
    }

    #[test]
    fn corrupt_prior_certificate_blocks_in_place_diff() {
        let p = prior("cert", "garbage", Some("application/x-pkcs12"));
        let desired = SecretDescriptor::new(
            "cert",
            ContentType::CertificatePfx,
            DisplayValue::Certificate(CertificateValueObject::new(vec![1], "pw")),
        );
        let err = plan(Some(&p), &desired, "me", &Limits::default()).unwrap_err();
        assert!(matches!(err, ExplorerError::UndecodableProvenanceValue(_)));
    }

    #[test]
    fn corrupt_prior_certificate_can_still_be_renamed() {
        let p = prior("cert", "garbage", Some("application/x-pkcs12"));
        let desired = SecretDescriptor::new(
            "cert-2",
            ContentType::CertificatePfx,
            DisplayValue::Certificate(CertificateValueObject::new(vec![1], "pw")),
        );
        let plan = plan(Some(&p), &desired, "me", &Limits::default()).unwrap();
        assert_eq!(plan.kind, PlanKind::Rename);
    }

    #[test]
    fn content_type_change_with_new_bytes_is_replace() {
        let p = prior("x", "garbage", Some("application/x-pkcs12"));
        let desired =
            SecretDescriptor::new("x", ContentType::Text, DisplayValue::Text("fixed".into()));
        let plan = plan(Some(&p), &desired, "me", &Limits::default()).unwrap();
        assert_eq!(plan.kind, PlanKind::Replace);
    }

    #[test]
    fn oversized_value_rejected() {
        let desired = SecretDescriptor::new(
            "big",
            ContentType::Text,
            DisplayValue::Text("x".repeat(11)),
        );
        let limits = Limits {
            max_value_bytes: 10,
        };
        let err = plan(None, &desired, "me", &limits).unwrap_err();
        assert!(matches!(
            err,
            ExplorerError::OversizedValue { size: 11, max: 10 }
        ));
    }

    #[test]
    fn changed_by_is_normalized() {
        assert_eq!(changed_by_stamp("  alice  "), "alice");
        assert_eq!(changed_by_stamp(""), "unknown");
        assert_eq!(changed_by_stamp(&"x".repeat(300)).len(), MAX_TAG_VALUE_LEN);
    }
}
