//! Certificate payload sub-format.
//!
//! Certificate secrets carry binary material (a PFX bundle or a DER/PEM
//! certificate) and an optional password.  Both travel inside a single
//! raw string:
//!
//! ```text
//! {"Data":"<base64 certificate bytes>","Password":"<password>"}
//! ```
//!
//! Serialization is deterministic (fixed key order, compact JSON) so two
//! equal certificates always produce byte-identical raw values and hence
//! identical fingerprints.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::errors::{ExplorerError, Result};

/// Certificate material plus the password protecting it.
///
/// An empty `password` means "no password"; a missing or `null`
/// `Password` field parses to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CertificateValueObject {
    pub data: Vec<u8>,
    pub password: String,
}

/// Wire shape used for serialization.  Field order here is the field
/// order in the output, which keeps `serialize` deterministic.
#[derive(Serialize)]
struct WirePayload<'a> {
    #[serde(rename = "Data")]
    data: String,
    #[serde(rename = "Password")]
    password: &'a str,
}

/// Lenient parse shape: `Password` may be absent or null.
#[derive(Deserialize)]
struct WirePayloadIn {
    #[serde(rename = "Data")]
    data: String,
    #[serde(rename = "Password", default)]
    password: Option<String>,
}

impl CertificateValueObject {
    pub fn new(data: Vec<u8>, password: impl Into<String>) -> Self {
        Self {
            data,
            password: password.into(),
        }
    }

    /// Build a value from certificate bytes read off disk.
    pub fn from_file_bytes(bytes: Vec<u8>, password: Option<&str>) -> Self {
        Self::new(bytes, password.unwrap_or_default())
    }

    /// Parse a raw certificate payload.
    pub fn parse(raw: &str) -> Result<Self> {
        let wire: WirePayloadIn = serde_json::from_str(raw)
            .map_err(|e| ExplorerError::MalformedCertificatePayload(e.to_string()))?;

        let data = BASE64
            .decode(wire.data.as_bytes())
            .map_err(|e| ExplorerError::InvalidBase64(e.to_string()))?;

        Ok(Self {
            data,
            password: wire.password.unwrap_or_default(),
        })
    }

    /// Serialize into the raw payload string.
    pub fn serialize(&self) -> Result<String> {
        let wire = WirePayload {
            data: BASE64.encode(&self.data),
            password: &self.password,
        };
        serde_json::to_string(&wire)
            .map_err(|e| ExplorerError::SerializationError(format!("certificate payload: {e}")))
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// The same certificate with the password cleared.
    pub fn without_password(&self) -> Self {
        Self {
            data: self.data.clone(),
            password: String::new(),
        }
    }
}
