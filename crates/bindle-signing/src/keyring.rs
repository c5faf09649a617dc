//! Keyring: the set of keys a party trusts.
//!
//! # Keyring Format
//!
//! ```toml
//! version = "1.0.0"
//!
//! [[key]]
//! label = "Jane Doe <jane@example.com>"
//! roles = ["creator", "approver"]
//! key = "<base64 ed25519 public key>"
//! labelSignature = "<base64 self-signature over label>"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SignatureResult;
use crate::key::{decode_public_key_bytes, SignatureKey};
use crate::role::SignatureRole;

/// Keyring schema version written for new keyrings.
pub const KEYRING_VERSION: &str = "1.0.0";

/// An ordered collection of signature keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyring {
    /// Schema version.
    pub version: String,

    /// Keys, in insertion order.
    #[serde(default)]
    pub key: Vec<SignatureKey>,
}

impl Keyring {
    /// Create an empty keyring.
    pub fn new() -> Self {
        Self {
            version: KEYRING_VERSION.to_string(),
            key: Vec::new(),
        }
    }

    /// Create a keyring from keys.
    pub fn with_keys(keys: Vec<SignatureKey>) -> Self {
        Self {
            version: KEYRING_VERSION.to_string(),
            key: keys,
        }
    }

    /// Append a key.
    pub fn add_key(&mut self, key: SignatureKey) {
        self.key.push(key);
    }

    /// The keys, for passing to [`crate::verify_signatures`].
    pub fn keys(&self) -> &[SignatureKey] {
        &self.key
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// Whether the keyring is empty.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Find the entry for a base64 public key.
    pub fn find_by_key(&self, encoded: &str) -> Option<&SignatureKey> {
        let wanted = decode_public_key_bytes(encoded).ok()?;
        self.key.iter().find(|k| {
            decode_public_key_bytes(&k.key)
                .map(|bytes| bytes == wanted)
                .unwrap_or(false)
        })
    }

    /// Entries whose label equals `label`.
    pub fn find_by_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a SignatureKey> {
        self.key.iter().filter(move |k| k.label == label)
    }

    /// Entries authorized for `role`.
    pub fn keys_for_role(&self, role: SignatureRole) -> impl Iterator<Item = &SignatureKey> {
        self.key.iter().filter(move |k| k.includes_role(role))
    }

    /// Parse a keyring from TOML.
    pub fn from_toml(content: &str) -> SignatureResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the keyring to TOML.
    pub fn to_toml(&self) -> SignatureResult<String> {
        Ok(toml::to_string(self)?)
    }
}

impl Default for Keyring {
    fn default() -> Self {
        Self::new()
    }
}
