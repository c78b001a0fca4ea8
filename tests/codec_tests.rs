//! Integration tests for the content codecs.

use kvexplorer::content::{CertificateValueObject, ContentType, DisplayValue};
use kvexplorer::errors::ExplorerError;

fn text(s: &str) -> DisplayValue {
    DisplayValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Round-trip laws
// ---------------------------------------------------------------------------

#[test]
fn decode_encode_decode_is_stable_for_every_builtin_type() {
    let cert = CertificateValueObject::new(vec![0x30, 0x82, 0x01, 0x0a], "s3cret")
        .serialize()
        .unwrap();

    for ct in ContentType::BUILTIN {
        let raw = if ct.is_certificate() {
            cert.clone()
        } else {
            r#"{"user":"app","port":5432}"#.to_string()
        };

        let shown = ct.decode(&raw).unwrap();
        let again = ct.decode(&ct.encode(&shown).unwrap()).unwrap();
        assert_eq!(again, shown, "round trip failed for {ct}");
    }
}

#[test]
fn lossless_types_reproduce_raw_bytes() {
    let samples = [
        (ContentType::Secret, "p@ss w0rd\n"),
        (ContentType::Text, "multi\nline\r\ntext"),
        (ContentType::Json, r#"{"z":[1,2.50,"x"],"a":{"nested":null}}"#),
        (ContentType::Json, r#"{"a":1,"a":2}"#),
        (ContentType::Json, r#"{"u":"a\/b"}"#),
        (ContentType::Json, "{\n    \"indent\": 4\n}"),
        (ContentType::Xml, "<config><item key=\"a\"/></config>"),
        (ContentType::ConfigFile, "[section]\nkey = value\n"),
    ];

    for (ct, raw) in samples {
        let shown = ct.decode(raw).unwrap();
        assert_eq!(ct.encode(&shown).unwrap(), raw, "raw changed for {ct}");
    }
}

#[test]
fn json_display_is_indented() {
    let shown = ContentType::Json.decode(r#"{"a":1}"#).unwrap();
    assert_eq!(shown, text("{\n  \"a\": 1\n}"));
}

// ---------------------------------------------------------------------------
// Certificates
// ---------------------------------------------------------------------------

#[test]
fn certificate_payload_round_trip() {
    let cases = [
        CertificateValueObject::new(Vec::new(), ""),
        CertificateValueObject::new(vec![0u8; 300], "pw"),
        CertificateValueObject::new((0..=255).collect(), "ünïcödé \"quoted\""),
    ];
    for cert in cases {
        let raw = cert.serialize().unwrap();
        assert_eq!(CertificateValueObject::parse(&raw).unwrap(), cert);
    }
}

#[test]
fn pfx_keeps_password_cer_drops_it() {
    let raw = CertificateValueObject::new(vec![1, 2, 3], "pw")
        .serialize()
        .unwrap();

    match ContentType::CertificatePfx.decode(&raw).unwrap() {
        DisplayValue::Certificate(c) => assert_eq!(c.password, "pw"),
        other => panic!("expected certificate, got {other:?}"),
    }
    match ContentType::CertificateCert.decode(&raw).unwrap() {
        DisplayValue::Certificate(c) => {
            assert_eq!(c.data, vec![1, 2, 3]);
            assert!(!c.has_password());
        }
        other => panic!("expected certificate, got {other:?}"),
    }
}

#[test]
fn malformed_certificate_payloads_fail() {
    assert!(matches!(
        ContentType::CertificatePfx.decode("not json"),
        Err(ExplorerError::MalformedCertificatePayload(_))
    ));
    assert!(matches!(
        ContentType::CertificatePfx.decode(r#"{"Data":"%%%","Password":""}"#),
        Err(ExplorerError::InvalidBase64(_))
    ));
}

#[test]
fn clipboard_and_export_rules() {
    let cert = DisplayValue::Certificate(CertificateValueObject::new(vec![9, 9], "pw"));
    assert_eq!(ContentType::CertificatePfx.clipboard_value(&cert).unwrap(), "pw");
    assert_eq!(ContentType::CertificatePfx.export_bytes(&cert).unwrap(), vec![9, 9]);

    let plain = text("hello");
    assert_eq!(ContentType::Text.clipboard_value(&plain).unwrap(), "hello");
    assert_eq!(ContentType::Text.export_bytes(&plain).unwrap(), b"hello".to_vec());
}

#[test]
fn file_names_use_extension() {
    assert_eq!(ContentType::CertificatePfx.file_name("site"), "site.pfx");
    assert_eq!(ContentType::Json.file_name("cfg"), "cfg.json");
    assert_eq!(ContentType::Secret.file_name("pw"), "pw.secret");
}

#[test]
fn unknown_label_is_opaque_text() {
    let ct = ContentType::from_label(Some("application/x-custom"));
    assert_eq!(ct, ContentType::Custom("application/x-custom".into()));
    assert_eq!(ct.label(), "application/x-custom");
    assert_eq!(ct.decode("{ \"a\": 1 }").unwrap(), text("{ \"a\": 1 }"));
}
