//! Integration tests for write reconciliation and duplicate detection.

use std::collections::BTreeMap;

use chrono::Utc;
use kvexplorer::content::{CertificateValueObject, ContentType, DisplayValue};
use kvexplorer::errors::ExplorerError;
use kvexplorer::sync::{
    find_collisions, plan, plan_toggle, snapshot, Fingerprint, Limits, PlanKind,
    SecretDescriptor, TagItem, WriteOp, CHANGED_BY_TAG, FINGERPRINT_TAG,
};
use kvexplorer::vault::{SecretAttributes, SecretRecord};

fn stored(name: &str, raw: &str) -> SecretRecord {
    SecretRecord {
        id: format!("kvx://secrets/{name}/00000001"),
        name: name.into(),
        value: raw.into(),
        content_type: Some("text/plain".into()),
        tags: BTreeMap::from([
            (FINGERPRINT_TAG.to_string(), Fingerprint::of(raw.as_bytes()).to_string()),
            (CHANGED_BY_TAG.to_string(), "bob".to_string()),
            ("owner".to_string(), "payments".to_string()),
        ]),
        attributes: SecretAttributes {
            enabled: Some(true),
            ..Default::default()
        },
        updated: Utc::now(),
    }
}

fn text_secret(name: &str, value: &str) -> SecretDescriptor {
    SecretDescriptor::new(name, ContentType::Text, DisplayValue::Text(value.into()))
}

// ---------------------------------------------------------------------------
// Plan classification
// ---------------------------------------------------------------------------

#[test]
fn new_secret_is_a_single_create() {
    let plan = plan(None, &text_secret("db-pass", "hunter2"), "alice", &Limits::default()).unwrap();

    assert_eq!(plan.kind, PlanKind::Create);
    assert!(plan.cleanup.is_none());
    match &plan.primary {
        WriteOp::Set {
            name,
            value,
            tags,
            content_type,
            ..
        } => {
            assert_eq!(name, "db-pass");
            assert_eq!(value, "hunter2");
            assert_eq!(content_type, "text/plain");
            assert_eq!(tags[CHANGED_BY_TAG], "alice");
            assert_eq!(
                tags[FINGERPRINT_TAG],
                Fingerprint::of(b"hunter2").to_string()
            );
        }
        other => panic!("expected set, got {other:?}"),
    }
}

#[test]
fn unchanged_content_updates_attributes_only() {
    let prior = stored("db-pass", "hunter2");
    let desired = text_secret("db-pass", "hunter2").with_tag(TagItem::new("owner", "payments"));

    let plan = plan(Some(&prior), &desired, "alice", &Limits::default()).unwrap();

    assert_eq!(plan.kind, PlanKind::AttributesOnly);
    assert!(!plan.writes_value());
    let tags = plan.primary.tags().unwrap();
    assert_eq!(tags[FINGERPRINT_TAG], prior.tags[FINGERPRINT_TAG]);
    assert_eq!(tags[CHANGED_BY_TAG], "alice");
}

#[test]
fn changed_content_replaces_value_and_fingerprint() {
    let prior = stored("db-pass", "hunter2");
    let plan = plan(
        Some(&prior),
        &text_secret("db-pass", "hunter3"),
        "alice",
        &Limits::default(),
    )
    .unwrap();

    assert_eq!(plan.kind, PlanKind::Replace);
    match &plan.primary {
        WriteOp::Set { value, tags, .. } => {
            assert_eq!(value, "hunter3");
            assert_eq!(tags[FINGERPRINT_TAG], Fingerprint::of(b"hunter3").to_string());
            assert_ne!(tags[FINGERPRINT_TAG], prior.tags[FINGERPRINT_TAG]);
        }
        other => panic!("expected set, got {other:?}"),
    }
}

#[test]
fn rename_sets_new_before_deleting_old() {
    let prior = stored("old-cert", "R1");
    let cert = CertificateValueObject::new(vec![0x30, 0x82], "pw");
    let desired = SecretDescriptor::new(
        "new-cert",
        ContentType::CertificatePfx,
        DisplayValue::Certificate(cert.clone()),
    );

    let plan = plan(Some(&prior), &desired, "alice", &Limits::default()).unwrap();
    assert_eq!(plan.kind, PlanKind::Rename);

    let ops: Vec<_> = plan.ops().collect();
    assert_eq!(ops.len(), 2);
    match ops[0] {
        WriteOp::Set { name, value, .. } => {
            assert_eq!(name, "new-cert");
            assert_eq!(value, &cert.serialize().unwrap());
        }
        other => panic!("expected set first, got {other:?}"),
    }
    assert_eq!(
        ops[1],
        &WriteOp::Delete {
            name: "old-cert".into()
        }
    );
}

#[test]
fn empty_name_is_rejected() {
    let err = plan(None, &text_secret("", "v"), "alice", &Limits::default()).unwrap_err();
    assert!(matches!(err, ExplorerError::InvalidName(_)));
}

#[test]
fn reserved_tag_in_desired_state_is_rejected() {
    let desired = text_secret("db-pass", "v").with_tag(TagItem::new("fingerprint", "x"));
    let err = plan(None, &desired, "alice", &Limits::default()).unwrap_err();
    assert!(matches!(err, ExplorerError::ReservedTag(_)));
}

#[test]
fn toggle_flips_only_enabled() {
    let mut prior = stored("db-pass", "hunter2");
    prior.attributes.expires = Some(Utc::now());

    let plan = plan_toggle(&prior, false, "carol").unwrap();
    assert_eq!(plan.kind, PlanKind::Toggle);
    match &plan.primary {
        WriteOp::UpdateAttributesAndTags {
            name,
            tags,
            content_type,
            attributes,
        } => {
            assert_eq!(name, "db-pass");
            assert_eq!(attributes.enabled, Some(false));
            assert_eq!(attributes.expires, prior.attributes.expires);
            assert!(content_type.is_none());
            assert_eq!(tags[CHANGED_BY_TAG], "carol");
            assert_eq!(tags["owner"], "payments");
            assert_eq!(tags[FINGERPRINT_TAG], prior.tags[FINGERPRINT_TAG]);
        }
        other => panic!("expected update, got {other:?}"),
    }
}

#[test]
fn toggle_adds_missing_fingerprint() {
    let mut prior = stored("legacy", "from-another-tool");
    prior.tags.clear();

    let plan = plan_toggle(&prior, false, "me").unwrap();
    let tags = plan.primary.tags().unwrap();
    assert_eq!(tags[CHANGED_BY_TAG], "me");
    assert_eq!(
        tags[FINGERPRINT_TAG],
        Fingerprint::of(b"from-another-tool").to_string()
    );
    assert_eq!(tags.len(), 2);
}

#[test]
fn rename_keeps_non_canonical_json_verbatim() {
    let raw = r#"{"a":1,"a":2,"u":"a\/b"}"#;
    let mut prior = stored("cfg", raw);
    prior.content_type = Some("application/json".into());

    let desired = SecretDescriptor::new("cfg-2", ContentType::Json, prior.display_value().unwrap());
    let plan = plan(Some(&prior), &desired, "alice", &Limits::default()).unwrap();

    assert_eq!(plan.kind, PlanKind::Rename);
    match &plan.primary {
        WriteOp::Set { value, tags, .. } => {
            assert_eq!(value, raw);
            assert_eq!(tags[FINGERPRINT_TAG], prior.tags[FINGERPRINT_TAG]);
        }
        other => panic!("expected set, got {other:?}"),
    }
}

#[test]
fn reformatted_json_is_attributes_only() {
    let mut prior = stored("cfg", "{ \"a\" : 1 }");
    prior.content_type = Some("application/json".into());

    let desired = SecretDescriptor::new("cfg", ContentType::Json, DisplayValue::Text(r#"{"a":1}"#.into()));
    let plan = plan(Some(&prior), &desired, "alice", &Limits::default()).unwrap();
    assert_eq!(plan.kind, PlanKind::AttributesOnly);
}

// ---------------------------------------------------------------------------
// Duplicate detection
// ---------------------------------------------------------------------------

#[test]
fn collisions_never_include_own_name() {
    let records = vec![stored("db-pass", "hunter2"), stored("db-pass-copy", "hunter2")];
    let known = snapshot(&records);

    let found = find_collisions(&text_secret("db-pass", "hunter2"), &known).unwrap();
    assert_eq!(found, vec!["db-pass-copy".to_string()]);
}

#[test]
fn distinct_content_has_no_collisions() {
    let known = snapshot(&[stored("a", "one"), stored("b", "two")]);
    let found = find_collisions(&text_secret("c", "three"), &known).unwrap();
    assert!(found.is_empty());
}
