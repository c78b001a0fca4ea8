use thiserror::Error;

/// All errors that can occur in the explorer.
#[derive(Debug, Error)]
pub enum ExplorerError {
    // --- Content errors ---
    #[error("Malformed certificate payload: {0}")]
    MalformedCertificatePayload(String),

    #[error("Certificate data is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("Content type mismatch: {0}")]
    ContentTypeMismatch(String),

    #[error("Value is {size} bytes, the maximum allowed is {max} bytes")]
    OversizedValue { size: usize, max: usize },

    #[error("Invalid fingerprint '{0}'")]
    InvalidFingerprint(String),

    // --- Reconciliation errors ---
    #[error("Invalid secret name '{0}' — use 1-127 ASCII letters, digits and hyphens")]
    InvalidName(String),

    #[error("Tag '{0}' is reserved and cannot be set by hand")]
    ReservedTag(String),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Invalid attributes: {0}")]
    InvalidAttributes(String),

    #[error("Stored value of '{0}' cannot be decoded, content comparison is impossible")]
    UndecodableProvenanceValue(String),

    // --- Vault errors ---
    #[error("Secret '{0}' not found")]
    SecretNotFound(String),

    #[error("Secret '{0}' already exists")]
    SecretAlreadyExists(String),

    #[error("Secret '{0}' is disabled, enable it with `kvx toggle {0}` first")]
    SecretDisabled(String),

    #[error("Invalid vault file: {0}")]
    VaultFormat(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("Audit error: {0}")]
    AuditError(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for explorer results.
pub type Result<T> = std::result::Result<T, ExplorerError>;
