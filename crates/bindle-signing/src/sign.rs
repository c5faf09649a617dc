//! Invoice signing.
//!
//! # Signing Steps
//!
//! 1. Check the key is authorized for the role
//! 2. Check the signer is a declared author of the invoice
//! 3. Check the private key belongs to the key record
//! 4. Build the cleartext for the role and sign it
//! 5. Append the signature to the invoice

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use ed25519_dalek::{Signer, SigningKey};

use crate::cleartext::build_cleartext;
use crate::error::{SignatureError, SignatureResult};
use crate::key::SignatureKey;
use crate::role::SignatureRole;
use crate::types::{Invoice, Signature};

/// Sign `invoice` as `author` in `role` and append the signature.
///
/// Existing signatures are left untouched. On error the invoice is not
/// modified.
pub fn generate_signature(
    invoice: &mut Invoice,
    author: &str,
    role: SignatureRole,
    key: &SignatureKey,
    signing_key: &SigningKey,
) -> SignatureResult<()> {
    if !key.includes_role(role) {
        return Err(SignatureError::RoleMismatch {
            role,
            key: key.key.clone(),
        });
    }

    if !invoice.has_author(author) {
        return Err(SignatureError::AuthorNotPresent {
            author: author.to_string(),
        });
    }

    if !key.matches(signing_key) {
        return Err(SignatureError::KeyMismatch {
            key: key.key.clone(),
        });
    }

    let cleartext = build_cleartext(invoice, role);
    let at = Utc::now().timestamp();
    let signature = signing_key.sign(cleartext.as_bytes());

    invoice.append_signature(Signature {
        by: author.to_string(),
        signature: BASE64.encode(signature.to_bytes()),
        key: key.key.clone(),
        role,
        at,
    });

    tracing::debug!(
        invoice = %invoice.name(),
        by = %author,
        role = %role,
        "signed invoice"
    );
    Ok(())
}

impl Invoice {
    /// Sign as the primary author in the `creator` role.
    pub fn sign_as_creator(
        &mut self,
        key: &SignatureKey,
        signing_key: &SigningKey,
    ) -> SignatureResult<()> {
        let author = self
            .primary_author()
            .ok_or_else(|| SignatureError::AuthorNotPresent {
                author: key.label.clone(),
            })?
            .to_string();
        generate_signature(self, &author, SignatureRole::Creator, key, signing_key)
    }
}
