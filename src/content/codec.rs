//! Raw <-> display transforms for each content type.
//!
//! `decode` turns the string stored in the vault into what a person (or
//! a script) works with; `encode` goes the other way.  For every value
//! `decode` produces, `decode(encode(v)) == v`.
//!
//! | content type      | decode                 | encode               |
//! |-------------------|------------------------|----------------------|
//! | Json              | pretty-print (1)       | compact (1)          |
//! | CertificatePfx    | parse payload          | serialize payload    |
//! | CertificateCert   | parse, drop password   | serialize, no password |
//! | everything else   | identity               | identity             |
//!
//! (1) Only JSON in canonical form is reformatted; any other text is kept
//! verbatim, so `encode(decode(raw)) == raw` for every raw value.

use std::fmt;

use super::certificate::CertificateValueObject;
use super::kind::ContentType;
use crate::errors::{ExplorerError, Result};

/// The decoded, human/application-facing form of a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayValue {
    Text(String),
    Certificate(CertificateValueObject),
}

impl DisplayValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Certificate(_) => None,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Certificate(cert) => write!(
                f,
                "<certificate: {} bytes, {}>",
                cert.data.len(),
                if cert.has_password() {
                    "password protected"
                } else {
                    "no password"
                }
            ),
        }
    }
}

impl ContentType {
    /// Decode a raw vault value into its display form.
    pub fn decode(&self, raw: &str) -> Result<DisplayValue> {
        match self {
            Self::Json => Ok(DisplayValue::Text(json_pretty(raw))),
            Self::CertificatePfx => Ok(DisplayValue::Certificate(CertificateValueObject::parse(
                raw,
            )?)),
            Self::CertificateCert => Ok(DisplayValue::Certificate(
                CertificateValueObject::parse(raw)?.without_password(),
            )),
            _ => Ok(DisplayValue::Text(raw.to_string())),
        }
    }

    /// Encode a display value into the raw string stored in the vault.
    pub fn encode(&self, value: &DisplayValue) -> Result<String> {
        if self.is_certificate() {
            let cert = self.certificate_of(value)?;
            return match self {
                Self::CertificateCert => cert.without_password().serialize(),
                _ => cert.serialize(),
            };
        }

        let text = match value {
            DisplayValue::Text(s) => s,
            DisplayValue::Certificate(_) => {
                return Err(ExplorerError::ContentTypeMismatch(format!(
                    "certificate value cannot be stored as '{self}'"
                )));
            }
        };

        match self {
            Self::Json => Ok(json_compact(text)),
            _ => Ok(text.clone()),
        }
    }

    /// What goes on the clipboard: the password for certificates (never
    /// the binary), the plain value otherwise.
    pub fn clipboard_value(&self, value: &DisplayValue) -> Result<String> {
        if self.is_certificate() {
            return Ok(self.certificate_of(value)?.password);
        }
        Ok(value.to_string())
    }

    /// Bytes written when the secret is saved to a file.
    pub fn export_bytes(&self, value: &DisplayValue) -> Result<Vec<u8>> {
        if self.is_certificate() {
            return Ok(self.certificate_of(value)?.data);
        }
        match value {
            DisplayValue::Text(s) => Ok(s.as_bytes().to_vec()),
            DisplayValue::Certificate(_) => Err(ExplorerError::ContentTypeMismatch(format!(
                "certificate value cannot be exported as '{self}'"
            ))),
        }
    }

    /// File name used when saving the secret: `name + extension`.
    pub fn file_name(&self, secret_name: &str) -> String {
        format!("{secret_name}{}", self.extension())
    }

    /// `true` if two raw values hold the same content once formatting is
    /// ignored.  Only JSON has formatting worth ignoring.
    pub fn same_content(&self, a: &str, b: &str) -> bool {
        match self {
            Self::Json => matches!((parse_json(a), parse_json(b)), (Some(x), Some(y)) if x == y),
            _ => a == b,
        }
    }

    /// Interpret a display value as certificate material.  Text is
    /// accepted when it holds a serialized payload.
    fn certificate_of(&self, value: &DisplayValue) -> Result<CertificateValueObject> {
        match value {
            DisplayValue::Certificate(cert) => Ok(cert.clone()),
            DisplayValue::Text(s) => CertificateValueObject::parse(s),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

fn parse_json(text: &str) -> Option<serde_json::Value> {
    serde_json::from_str(text).ok()
}

/// Pretty-print JSON stored in canonical compact form.  Anything else
/// (invalid JSON, other formatting, duplicate keys, non-minimal escapes)
/// is shown verbatim so that encoding can give back the exact bytes.
fn json_pretty(raw: &str) -> String {
    let Some(v) = parse_json(raw) else {
        return raw.to_string();
    };
    match (serde_json::to_string(&v), serde_json::to_string_pretty(&v)) {
        (Ok(compact), Ok(pretty)) if compact == raw => pretty,
        _ => raw.to_string(),
    }
}

/// Compact text that is exactly the pretty form of its own content.
/// Everything else passes through untouched.
fn json_compact(text: &str) -> String {
    let Some(v) = parse_json(text) else {
        return text.to_string();
    };
    match (serde_json::to_string(&v), serde_json::to_string_pretty(&v)) {
        (Ok(compact), Ok(pretty)) if pretty == text => compact,
        _ => text.to_string(),
    }
}
