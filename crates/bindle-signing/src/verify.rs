//! Invoice signature verification.
//!
//! # Verification Steps (per signature)
//!
//! 1. Decode the claimed public key
//! 2. Find the trusted entries with the same public key bytes
//! 3. Check one of those entries is authorized for the claimed role
//! 4. Rebuild the cleartext from the current invoice and the claimed role
//! 5. Verify the Ed25519 signature with the claimed public key
//!
//! The first failing signature aborts verification. An invoice without
//! signatures verifies trivially; callers that need "at least one signature
//! in role R" check [`VerifyResult::has_role`] themselves.

use ed25519_dalek::{Verifier, VerifyingKey};

use crate::cleartext::build_cleartext;
use crate::error::{SignatureError, SignatureResult};
use crate::key::{decode_public_key_bytes, decode_signature, SignatureKey};
use crate::role::SignatureRole;
use crate::types::{Invoice, Signature};

/// A signature that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSignature {
    /// Signer identity.
    pub by: String,

    /// Role attested to.
    pub role: SignatureRole,

    /// Signing time (unix seconds).
    pub at: i64,

    /// Base64 public key.
    pub key: String,

    /// Label of the trusted key that vouched for it.
    pub trusted_label: String,
}

/// Result of successful verification.
#[derive(Debug, Clone, Default)]
pub struct VerifyResult {
    /// Verified signatures, in invoice order.
    pub verified: Vec<VerifiedSignature>,
}

impl VerifyResult {
    /// Number of verified signatures in `role`.
    pub fn count_role(&self, role: SignatureRole) -> usize {
        self.verified.iter().filter(|s| s.role == role).count()
    }

    /// Whether at least one verified signature is in `role`.
    pub fn has_role(&self, role: SignatureRole) -> bool {
        self.count_role(role) > 0
    }

    /// Whether the invoice carried no signatures at all.
    pub fn is_unsigned(&self) -> bool {
        self.verified.is_empty()
    }
}

/// Verify every signature on `invoice` against `trusted_keys`.
pub fn verify_signatures(
    invoice: &Invoice,
    trusted_keys: &[SignatureKey],
) -> SignatureResult<VerifyResult> {
    let mut result = VerifyResult::default();

    for signature in invoice.signatures() {
        match verify_single_signature(invoice, signature, trusted_keys) {
            Ok(trusted) => {
                tracing::debug!(
                    invoice = %invoice.name(),
                    by = %signature.by,
                    role = %signature.role,
                    "signature verified"
                );
                result.verified.push(VerifiedSignature {
                    by: signature.by.clone(),
                    role: signature.role,
                    at: signature.at,
                    key: signature.key.clone(),
                    trusted_label: trusted.label.clone(),
                });
            }
            Err(e) => {
                tracing::warn!(
                    invoice = %invoice.name(),
                    by = %signature.by,
                    role = %signature.role,
                    error = %e,
                    "signature rejected"
                );
                return Err(e);
            }
        }
    }

    Ok(result)
}

/// Verify one signature, returning the trusted key that vouched for it.
fn verify_single_signature<'k>(
    invoice: &Invoice,
    signature: &Signature,
    trusted_keys: &'k [SignatureKey],
) -> SignatureResult<&'k SignatureKey> {
    // 1. Decode claimed key
    let claimed = decode_public_key_bytes(&signature.key)?;

    // 2. Find it among the trusted keys
    let mut matching = trusted_entries(trusted_keys, claimed).peekable();
    if matching.peek().is_none() {
        return Err(SignatureError::UnknownKey {
            key: signature.key.clone(),
        });
    }

    // 3. Role authorization, across every entry for the key
    let trusted = matching
        .find(|k| k.includes_role(signature.role))
        .ok_or_else(|| SignatureError::RoleMismatch {
            role: signature.role,
            key: signature.key.clone(),
        })?;

    // 4. Cleartext from current state
    let cleartext = build_cleartext(invoice, signature.role);

    // 5. Verify with the claimed key
    let verifying_key =
        VerifyingKey::from_bytes(&claimed).map_err(|e| SignatureError::Decoding {
            what: "public key",
            reason: format!("invalid ed25519 key: {}", e),
        })?;
    let sig = decode_signature(&signature.signature)?;

    verifying_key
        .verify(cleartext.as_bytes(), &sig)
        .map_err(|_| SignatureError::InvalidSignature {
            by: signature.by.clone(),
            role: signature.role,
        })?;

    Ok(trusted)
}

/// Entries for `claimed`. A keyring may list one key several times with
/// different roles. Entries with malformed keys never match.
fn trusted_entries<'k>(
    trusted_keys: &'k [SignatureKey],
    claimed: [u8; 32],
) -> impl Iterator<Item = &'k SignatureKey> {
    trusted_keys.iter().filter(move |k| {
        decode_public_key_bytes(&k.key)
            .map(|bytes| bytes == claimed)
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::generate_signature;
    use crate::types::{BindleSpec, Parcel};
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use ed25519_dalek::SigningKey;

    fn invoice() -> Invoice {
        Invoice::new(
            BindleSpec::new("proj", "0.1.0")
                .with_author("Alice")
                .with_author("Bob"),
        )
        .with_parcel(Parcel::from_sha256("abc123"))
        .with_parcel(Parcel::from_sha256("def456"))
    }

    fn signed(role: SignatureRole) -> (Invoice, SignatureKey) {
        let (key, signing_key) = SignatureKey::generate("Alice", role);
        let mut invoice = invoice();
        generate_signature(&mut invoice, "Alice", role, &key, &signing_key).unwrap();
        (invoice, key)
    }

    /// Rebuild an invoice carrying exactly `signature`, bypassing the signer.
    fn with_forged_signature(invoice: &Invoice, signature: Signature) -> Invoice {
        let mut forged = invoice.clone();
        forged.append_signature(signature);
        forged
    }

    #[test]
    fn test_roundtrip() {
        let (invoice, key) = signed(SignatureRole::Creator);
        let result = verify_signatures(&invoice, &[key]).unwrap();
        assert_eq!(result.verified.len(), 1);
        assert_eq!(result.verified[0].trusted_label, "Alice");
        assert!(result.has_role(SignatureRole::Creator));
        assert!(!result.has_role(SignatureRole::Approver));
    }

    #[test]
    fn test_unsigned_verifies_trivially() {
        let result = verify_signatures(&invoice(), &[]).unwrap();
        assert!(result.is_unsigned());
        assert_eq!(result.count_role(SignatureRole::Creator), 0);
    }

    #[test]
    fn test_unknown_key() {
        let (invoice, _) = signed(SignatureRole::Creator);
        let (other, _) = SignatureKey::generate("Alice", SignatureRole::Creator);

        assert!(matches!(
            verify_signatures(&invoice, &[]),
            Err(SignatureError::UnknownKey { .. })
        ));
        assert!(matches!(
            verify_signatures(&invoice, &[other]),
            Err(SignatureError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_trusted_key_without_role() {
        let (invoice, mut key) = signed(SignatureRole::Creator);
        key.roles = vec![SignatureRole::Approver];

        assert!(matches!(
            verify_signatures(&invoice, &[key]),
            Err(SignatureError::RoleMismatch {
                role: SignatureRole::Creator,
                ..
            })
        ));
    }

    #[test]
    fn test_claimed_role_changed_after_signing() {
        // Key is trusted for both roles, but the signature was made as creator.
        let signing_key = SigningKey::from_bytes(&[7_u8; 32]);
        let key = SignatureKey::from_signing_key(
            "Alice",
            vec![SignatureRole::Creator, SignatureRole::Approver],
            &signing_key,
        );
        let mut original = invoice();
        generate_signature(&mut original, "Alice", SignatureRole::Creator, &key, &signing_key)
            .unwrap();

        let mut relabeled = original.signatures()[0].clone();
        relabeled.role = SignatureRole::Approver;
        let forged = with_forged_signature(&invoice(), relabeled);

        assert!(matches!(
            verify_signatures(&forged, &[key]),
            Err(SignatureError::InvalidSignature {
                role: SignatureRole::Approver,
                ..
            })
        ));
    }

    #[test]
    fn test_tampered_parcels() {
        let (invoice, key) = signed(SignatureRole::Creator);

        let mut appended = invoice.clone();
        appended.parcel.push(Parcel::from_sha256("0badc0de"));

        let mut removed = invoice.clone();
        removed.parcel.pop();

        let mut reordered = invoice.clone();
        reordered.parcel.swap(0, 1);

        for tampered in [appended, removed, reordered] {
            assert!(matches!(
                verify_signatures(&tampered, std::slice::from_ref(&key)),
                Err(SignatureError::InvalidSignature { .. })
            ));
        }
    }

    #[test]
    fn test_forged_signature_bytes() {
        let (invoice, key) = signed(SignatureRole::Creator);
        let mut sig = invoice.signatures()[0].clone();
        sig.signature = BASE64.encode([0_u8; 64]);
        let forged = with_forged_signature(&self::invoice(), sig);

        assert!(matches!(
            verify_signatures(&forged, &[key]),
            Err(SignatureError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_malformed_base64() {
        let (invoice, key) = signed(SignatureRole::Creator);

        let mut bad_sig = invoice.signatures()[0].clone();
        bad_sig.signature = "***".to_string();
        let forged = with_forged_signature(&self::invoice(), bad_sig);
        assert!(matches!(
            verify_signatures(&forged, std::slice::from_ref(&key)),
            Err(SignatureError::Decoding { what: "signature", .. })
        ));

        let mut bad_key = invoice.signatures()[0].clone();
        bad_key.key = "not-a-key".to_string();
        let forged = with_forged_signature(&self::invoice(), bad_key);
        assert!(matches!(
            verify_signatures(&forged, &[key]),
            Err(SignatureError::Decoding { what: "public key", .. })
        ));
    }

    #[test]
    fn test_one_bad_signature_fails_all() {
        let (mut invoice, creator) = signed(SignatureRole::Creator);
        let (approver, approver_sk) = SignatureKey::generate("Bob", SignatureRole::Approver);
        generate_signature(&mut invoice, "Bob", SignatureRole::Approver, &approver, &approver_sk)
            .unwrap();

        let both = vec![creator.clone(), approver];
        let result = verify_signatures(&invoice, &both).unwrap();
        assert_eq!(result.count_role(SignatureRole::Creator), 1);
        assert_eq!(result.count_role(SignatureRole::Approver), 1);

        assert!(matches!(
            verify_signatures(&invoice, &[creator]),
            Err(SignatureError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_duplicate_entries_for_one_key() {
        let signing_key = SigningKey::from_bytes(&[11_u8; 32]);
        let as_creator =
            SignatureKey::from_signing_key("Alice", vec![SignatureRole::Creator], &signing_key);
        let as_approver =
            SignatureKey::from_signing_key("Alice", vec![SignatureRole::Approver], &signing_key);

        let mut invoice = invoice();
        generate_signature(
            &mut invoice,
            "Alice",
            SignatureRole::Approver,
            &as_approver,
            &signing_key,
        )
        .unwrap();

        let result = verify_signatures(&invoice, &[as_creator.clone(), as_approver]).unwrap();
        assert!(result.has_role(SignatureRole::Approver));

        assert!(matches!(
            verify_signatures(&invoice, &[as_creator]),
            Err(SignatureError::RoleMismatch {
                role: SignatureRole::Approver,
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_keyring_entry_is_skipped() {
        let (invoice, key) = signed(SignatureRole::Creator);
        let broken = SignatureKey {
            label: "Broken".to_string(),
            roles: vec![SignatureRole::Creator],
            key: "%%%".to_string(),
            label_signature: None,
        };

        let result = verify_signatures(&invoice, &[broken, key]).unwrap();
        assert_eq!(result.verified[0].trusted_label, "Alice");
    }
}
