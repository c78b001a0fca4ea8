//! The closed set of content types a secret can carry.
//!
//! The content-type label is persisted next to the raw value so a later
//! read can pick the right codec.  Labels we don't know become
//! `ContentType::Custom` and are treated as opaque text, which keeps
//! older builds working against vaults written by newer ones.

use std::fmt;
use std::path::Path;

/// How a secret's raw value is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    /// No content type recorded.
    #[default]
    Secret,
    Text,
    Json,
    Xml,
    ConfigFile,
    CertificatePfx,
    CertificateCert,
    /// A label this build does not recognize (kept verbatim).
    Custom(String),
}

// ---------------------------------------------------------------------------
// Behavior table
// ---------------------------------------------------------------------------

const LABEL_TEXT: &str = "text/plain";
const LABEL_JSON: &str = "application/json";
const LABEL_XML: &str = "application/xml";
const LABEL_CONFIG: &str = "application/x-config";
const LABEL_PFX: &str = "application/x-pkcs12";
const LABEL_CERT: &str = "application/x-x509-ca-cert";

impl ContentType {
    /// Every built-in variant (excludes `Custom`).
    pub const BUILTIN: [ContentType; 7] = [
        ContentType::Secret,
        ContentType::Text,
        ContentType::Json,
        ContentType::Xml,
        ContentType::ConfigFile,
        ContentType::CertificatePfx,
        ContentType::CertificateCert,
    ];

    /// Map a persisted label back to a content type.  Never fails.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label.map(str::trim) else {
            return Self::Secret;
        };
        match label.to_ascii_lowercase().as_str() {
            "" => Self::Secret,
            LABEL_TEXT => Self::Text,
            LABEL_JSON => Self::Json,
            LABEL_XML | "text/xml" => Self::Xml,
            LABEL_CONFIG => Self::ConfigFile,
            LABEL_PFX | "application/pkcs12" => Self::CertificatePfx,
            LABEL_CERT | "application/pkix-cert" => Self::CertificateCert,
            _ => Self::Custom(label.to_string()),
        }
    }

    /// The label persisted alongside the raw value.
    pub fn label(&self) -> &str {
        match self {
            Self::Secret => "",
            Self::Text => LABEL_TEXT,
            Self::Json => LABEL_JSON,
            Self::Xml => LABEL_XML,
            Self::ConfigFile => LABEL_CONFIG,
            Self::CertificatePfx => LABEL_PFX,
            Self::CertificateCert => LABEL_CERT,
            Self::Custom(label) => label,
        }
    }

    /// File extension (with leading dot) used when saving to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Secret => ".secret",
            Self::Text | Self::Custom(_) => ".txt",
            Self::Json => ".json",
            Self::Xml => ".xml",
            Self::ConfigFile => ".config",
            Self::CertificatePfx => ".pfx",
            Self::CertificateCert => ".cer",
        }
    }

    pub fn is_certificate(&self) -> bool {
        matches!(self, Self::CertificatePfx | Self::CertificateCert)
    }

    /// `true` if decode/encode are not simply the identity.
    pub fn has_transform(&self) -> bool {
        matches!(self, Self::Json) || self.is_certificate()
    }

    /// Guess the content type of a file from its extension.
    pub fn from_extension(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pfx" | "p12" => Self::CertificatePfx,
            "cer" | "crt" | "der" => Self::CertificateCert,
            "json" => Self::Json,
            "xml" => Self::Xml,
            "config" | "ini" | "conf" | "yaml" | "yml" | "toml" => Self::ConfigFile,
            _ => Self::Text,
        }
    }

    /// Parse a name as typed on the command line (`pfx`, `json`, ...) or
    /// a full label (`application/json`).
    pub fn from_cli_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "secret" | "none" => Self::Secret,
            "text" | "txt" => Self::Text,
            "json" => Self::Json,
            "xml" => Self::Xml,
            "config" | "configfile" => Self::ConfigFile,
            "pfx" | "pkcs12" => Self::CertificatePfx,
            "cer" | "cert" | "certificate" => Self::CertificateCert,
            _ => Self::from_label(Some(name)),
        }
    }

    /// Short human name shown in tables.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Secret => "secret",
            Self::Text => "text",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::ConfigFile => "config",
            Self::CertificatePfx => "pfx",
            Self::CertificateCert => "cer",
            Self::Custom(label) => label,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_labels_round_trip() {
        for ct in ContentType::BUILTIN {
            assert_eq!(ContentType::from_label(Some(ct.label())), ct);
        }
    }

    #[test]
    fn missing_label_is_secret() {
        assert_eq!(ContentType::from_label(None), ContentType::Secret);
        assert_eq!(ContentType::from_label(Some("  ")), ContentType::Secret);
    }

    #[test]
    fn unknown_label_is_preserved() {
        let ct = ContentType::from_label(Some("application/x-future"));
        assert_eq!(ct, ContentType::Custom("application/x-future".into()));
        assert_eq!(ct.label(), "application/x-future");
        assert!(!ct.is_certificate());
        assert_eq!(ct.extension(), ".txt");
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(
            ContentType::from_label(Some("Application/JSON")),
            ContentType::Json
        );
    }

    #[test]
    fn certificate_predicate() {
        assert!(ContentType::CertificatePfx.is_certificate());
        assert!(ContentType::CertificateCert.is_certificate());
        assert!(!ContentType::Json.is_certificate());
        assert!(!ContentType::Secret.is_certificate());
    }

    #[test]
    fn extension_guessing() {
        assert_eq!(
            ContentType::from_extension(Path::new("site.PFX")),
            ContentType::CertificatePfx
        );
        assert_eq!(
            ContentType::from_extension(Path::new("root.crt")),
            ContentType::CertificateCert
        );
        assert_eq!(
            ContentType::from_extension(Path::new("app.yaml")),
            ContentType::ConfigFile
        );
        assert_eq!(
            ContentType::from_extension(Path::new("notes")),
            ContentType::Text
        );
    }

    #[test]
    fn cli_names() {
        assert_eq!(ContentType::from_cli_name("pfx"), ContentType::CertificatePfx);
        assert_eq!(ContentType::from_cli_name("JSON"), ContentType::Json);
        assert_eq!(
            ContentType::from_cli_name("application/x-pkcs12"),
            ContentType::CertificatePfx
        );
    }
}
