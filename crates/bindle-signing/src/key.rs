//! Signing keys bound to an author label and a set of roles.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{
    Signature as Ed25519Signature, Signer, SigningKey, Verifier, VerifyingKey, KEYPAIR_LENGTH,
    PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH,
};
use serde::{Deserialize, Serialize};

use crate::error::{SignatureError, SignatureResult};
use crate::role::SignatureRole;

/// A public key that speaks for `label` in the listed roles.
///
/// `label_signature` is the key's own signature over the raw label bytes,
/// binding the identity string to this key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureKey {
    /// Author identity, e.g. `Jane Doe <jane@example.com>`.
    pub label: String,

    /// Roles this key may sign for.
    pub roles: Vec<SignatureRole>,

    /// Base64 Ed25519 public key.
    pub key: String,

    /// Base64 self-signature over `label`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_signature: Option<String>,
}

impl SignatureKey {
    /// Generate a fresh key pair for `author` in `role`.
    ///
    /// The private half is returned separately and never stored on the
    /// `SignatureKey`; the caller owns its storage.
    pub fn generate(author: &str, role: SignatureRole) -> (Self, SigningKey) {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        let key = Self::from_signing_key(author, vec![role], &signing_key);
        tracing::debug!(label = %author, role = %role, "generated signing key");
        (key, signing_key)
    }

    /// Build the public record for an existing private key.
    pub fn from_signing_key(
        author: &str,
        roles: Vec<SignatureRole>,
        signing_key: &SigningKey,
    ) -> Self {
        let label_signature = signing_key.sign(author.as_bytes());
        Self {
            label: author.to_string(),
            roles,
            key: BASE64.encode(signing_key.verifying_key().as_bytes()),
            label_signature: Some(BASE64.encode(label_signature.to_bytes())),
        }
    }

    /// Whether this key may sign for `role`.
    pub fn includes_role(&self, role: SignatureRole) -> bool {
        self.roles.contains(&role)
    }

    /// Authorize an additional role. Returns `false` if already present.
    pub fn add_role(&mut self, role: SignatureRole) -> bool {
        if self.includes_role(role) {
            return false;
        }
        self.roles.push(role);
        true
    }

    /// Decode the public key.
    pub fn verifying_key(&self) -> SignatureResult<VerifyingKey> {
        decode_verifying_key(&self.key)
    }

    /// Whether `signing_key` is the private half of this key.
    pub fn matches(&self, signing_key: &SigningKey) -> bool {
        decode_public_key_bytes(&self.key)
            .map(|bytes| bytes == signing_key.verifying_key().to_bytes())
            .unwrap_or(false)
    }

    /// Check the self-signature over the label.
    pub fn verify_label(&self) -> SignatureResult<()> {
        let encoded = self
            .label_signature
            .as_deref()
            .ok_or_else(|| SignatureError::Decoding {
                what: "label signature",
                reason: "missing".to_string(),
            })?;

        let signature = decode_signature(encoded)?;
        self.verifying_key()?
            .verify(self.label.as_bytes(), &signature)
            .map_err(|_| SignatureError::InvalidLabelSignature {
                label: self.label.clone(),
            })
    }
}

/// Encode a private key as base64 of the 64-byte keypair form.
pub fn encode_private_key(signing_key: &SigningKey) -> String {
    BASE64.encode(signing_key.to_keypair_bytes())
}

/// Decode a base64 private key (64-byte keypair or 32-byte seed).
pub fn decode_private_key(encoded: &str) -> SignatureResult<SigningKey> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| SignatureError::Decoding {
            what: "private key",
            reason: format!("invalid base64: {}", e),
        })?;

    match bytes.len() {
        KEYPAIR_LENGTH => {
            let mut keypair = [0_u8; KEYPAIR_LENGTH];
            keypair.copy_from_slice(&bytes);
            SigningKey::from_keypair_bytes(&keypair).map_err(|e| SignatureError::Decoding {
                what: "private key",
                reason: format!("invalid keypair: {}", e),
            })
        }
        SECRET_KEY_LENGTH => {
            let mut seed = [0_u8; SECRET_KEY_LENGTH];
            seed.copy_from_slice(&bytes);
            Ok(SigningKey::from_bytes(&seed))
        }
        n => Err(SignatureError::Decoding {
            what: "private key",
            reason: format!(
                "expected {} or {} bytes, got {}",
                KEYPAIR_LENGTH, SECRET_KEY_LENGTH, n
            ),
        }),
    }
}

pub(crate) fn decode_public_key_bytes(encoded: &str) -> SignatureResult<[u8; PUBLIC_KEY_LENGTH]> {
    let bytes = BASE64.decode(encoded).map_err(|e| SignatureError::Decoding {
        what: "public key",
        reason: format!("invalid base64: {}", e),
    })?;

    bytes
        .as_slice()
        .try_into()
        .map_err(|_| SignatureError::Decoding {
            what: "public key",
            reason: format!("expected {} bytes, got {}", PUBLIC_KEY_LENGTH, bytes.len()),
        })
}

pub(crate) fn decode_verifying_key(encoded: &str) -> SignatureResult<VerifyingKey> {
    let bytes = decode_public_key_bytes(encoded)?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| SignatureError::Decoding {
        what: "public key",
        reason: format!("invalid ed25519 key: {}", e),
    })
}

pub(crate) fn decode_signature(encoded: &str) -> SignatureResult<Ed25519Signature> {
    let bytes = BASE64.decode(encoded).map_err(|e| SignatureError::Decoding {
        what: "signature",
        reason: format!("invalid base64: {}", e),
    })?;

    Ed25519Signature::from_slice(&bytes).map_err(|e| SignatureError::Decoding {
        what: "signature",
        reason: format!("invalid signature bytes: {}", e),
    })
}
