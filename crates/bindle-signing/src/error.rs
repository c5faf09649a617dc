//! Error types for invoice signing and verification.

use std::path::PathBuf;

use crate::role::SignatureRole;

/// Signing, verification and keyring errors.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Role string outside the closed set of signature roles.
    #[error("invalid role: {role} (expected one of creator, approver, proxy, host)")]
    InvalidRole { role: String },

    /// The key is not authorized for the requested or claimed role.
    #[error("role mismatch: key {key} is not authorized for role {role}")]
    RoleMismatch { role: SignatureRole, key: String },

    /// The signing author is not listed in the invoice authors.
    #[error("author not present in invoice: {author}")]
    AuthorNotPresent { author: String },

    /// A signature names a key that is not in the trusted set.
    #[error("unknown key: {key}")]
    UnknownKey { key: String },

    /// Cryptographic verification failed.
    #[error("invalid signature by {by} for role {role}")]
    InvalidSignature { by: String, role: SignatureRole },

    /// A key's self-signature over its label does not verify.
    #[error("label signature does not verify for {label}")]
    InvalidLabelSignature { label: String },

    /// Malformed base64 or key/signature material.
    #[error("decoding error: {what}: {reason}")]
    Decoding { what: &'static str, reason: String },

    /// The private key does not belong to the given key record.
    #[error("private key does not match public key {key}")]
    KeyMismatch { key: String },

    /// No keyring file at the given path.
    #[error("keyring not found: {}", path.display())]
    KeyringNotFound { path: PathBuf },

    /// Filesystem error.
    #[error("io error at {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Invoice or keyring content could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Invoice or keyring could not be serialized.
    #[error("serialize error: {message}")]
    Serialize { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl SignatureError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Bad input / config
            Self::InvalidRole { .. } => 1,
            Self::AuthorNotPresent { .. } => 1,
            Self::KeyMismatch { .. } => 1,
            Self::Parse { .. } => 1,
            Self::Config { .. } => 1,

            // Trust failures
            Self::RoleMismatch { .. } => 4,
            Self::UnknownKey { .. } => 4,
            Self::InvalidSignature { .. } => 4,
            Self::InvalidLabelSignature { .. } => 4,
            Self::Decoding { .. } => 4,

            // Storage
            Self::KeyringNotFound { .. } => 6,
            Self::Io { .. } => 6,
            Self::Serialize { .. } => 6,
        }
    }

    /// Whether the error means the invoice must not be trusted.
    pub fn is_trust_failure(&self) -> bool {
        matches!(
            self,
            Self::RoleMismatch { .. }
                | Self::UnknownKey { .. }
                | Self::InvalidSignature { .. }
                | Self::InvalidLabelSignature { .. }
                | Self::Decoding { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SignatureError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SignatureError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialize {
            message: err.to_string(),
        }
    }
}

/// Result type for signing operations.
pub type SignatureResult<T> = Result<T, SignatureError>;
