//! Content fingerprints and duplicate detection.
//!
//! A fingerprint is SHA-256 over the raw (post-encoding) value,
//! truncated to 128 bits and written as 32 lowercase hex characters.
//! It is stored in the reserved `Fingerprint` tag on every write, so a
//! duplicate scan only needs the tags of other secrets, never their
//! values.
//!
//! Two secrets with different content types but identical raw bytes are
//! duplicates: this is a content check, not a type check.

use std::fmt::{self, Write};
use std::str::FromStr;

use sha2::{Digest, Sha256};

use super::descriptor::SecretDescriptor;
use crate::errors::{ExplorerError, Result};
use crate::vault::SecretRecord;

/// Number of digest bytes kept.
const FINGERPRINT_LEN: usize = 16;

/// 128-bit content digest of a raw secret value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Fingerprint of a raw value.
    pub fn of(raw: &[u8]) -> Self {
        let digest = Sha256::digest(raw);
        let mut out = [0u8; FINGERPRINT_LEN];
        out.copy_from_slice(&digest[..FINGERPRINT_LEN]);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::with_capacity(FINGERPRINT_LEN * 2);
        for b in self.0 {
            let _ = write!(s, "{b:02x}");
        }
        f.write_str(&s)
    }
}

impl FromStr for Fingerprint {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != FINGERPRINT_LEN * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ExplorerError::InvalidFingerprint(s.to_string()));
        }

        let mut out = [0u8; FINGERPRINT_LEN];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| ExplorerError::InvalidFingerprint(s.to_string()))?;
        }
        Ok(Self(out))
    }
}

// ---------------------------------------------------------------------------
// Duplicate detection
// ---------------------------------------------------------------------------

/// One entry of the snapshot scanned for duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownDigest {
    pub name: String,
    /// `None` when the secret was never written with a fingerprint tag.
    pub fingerprint: Option<Fingerprint>,
}

impl KnownDigest {
    pub fn new(name: impl Into<String>, fingerprint: Option<Fingerprint>) -> Self {
        Self {
            name: name.into(),
            fingerprint,
        }
    }

    pub fn from_record(record: &SecretRecord) -> Self {
        Self::new(record.name.clone(), record.stored_fingerprint())
    }
}

/// Build a snapshot from a listing.
pub fn snapshot(records: &[SecretRecord]) -> Vec<KnownDigest> {
    records.iter().map(KnownDigest::from_record).collect()
}

/// Names of existing secrets holding the same content as `candidate`.
///
/// The candidate's own name is never reported, so re-saving unchanged
/// content is not a collision.  The result is advisory.
pub fn find_collisions(
    candidate: &SecretDescriptor,
    existing: &[KnownDigest],
) -> Result<Vec<String>> {
    let fingerprint = candidate.fingerprint()?;
    Ok(existing
        .iter()
        .filter(|known| known.name != candidate.name)
        .filter(|known| known.fingerprint == Some(fingerprint))
        .map(|known| known.name.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentType, DisplayValue};

    fn text_secret(name: &str, value: &str) -> SecretDescriptor {
        SecretDescriptor::new(
            name,
            ContentType::Text,
            DisplayValue::Text(value.to_string()),
        )
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(Fingerprint::of(b"hunter2"), Fingerprint::of(b"hunter2"));
        assert_ne!(Fingerprint::of(b"hunter2"), Fingerprint::of(b"hunter3"));
    }

    #[test]
    fn fingerprint_hex_round_trip() {
        let fp = Fingerprint::of(b"abc");
        let hex = fp.to_string();
        assert_eq!(hex.len(), 32);
        // First 16 bytes of SHA-256("abc").
        assert_eq!(hex, "ba7816bf8f01cfea414140de5dae2223");
        assert_eq!(hex.parse::<Fingerprint>().unwrap(), fp);
    }

    #[test]
    fn fingerprint_parse_rejects_garbage() {
        assert!("xyz".parse::<Fingerprint>().is_err());
        assert!("zz7816bf8f01cfea414140de5dae2223".parse::<Fingerprint>().is_err());
    }

    #[test]
    fn collisions_report_other_names() {
        let fp = Fingerprint::of(b"hunter2");
        let existing = vec![
            KnownDigest::new("a", Some(fp)),
            KnownDigest::new("b", Some(Fingerprint::of(b"other"))),
            KnownDigest::new("c", Some(fp)),
            KnownDigest::new("d", None),
        ];
        let hits = find_collisions(&text_secret("new", "hunter2"), &existing).unwrap();
        assert_eq!(hits, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn collisions_exclude_self() {
        let fp = Fingerprint::of(b"hunter2");
        let existing = vec![KnownDigest::new("db-pass", Some(fp))];
        let hits = find_collisions(&text_secret("db-pass", "hunter2"), &existing).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn collisions_ignore_content_type() {
        let fp = Fingerprint::of(b"same-bytes");
        let existing = vec![KnownDigest::new("as-text", Some(fp))];
        let candidate = SecretDescriptor::new(
            "as-config",
            ContentType::ConfigFile,
            DisplayValue::Text("same-bytes".into()),
        );
        assert_eq!(
            find_collisions(&candidate, &existing).unwrap(),
            vec!["as-text".to_string()]
        );
    }
}
