//! Signing and verification for Bindle invoices.
//!
//! An invoice describes a named, versioned bundle and its content-addressed
//! parcels. Creators, approvers, proxies and hosts attest to an invoice by
//! appending role-scoped Ed25519 signatures over a canonical cleartext; a
//! verifier checks every signature against the keys in its keyring.
//!
//! - Canonical cleartext construction
//! - Key generation with label self-signatures
//! - Signing (append-only) and verification against trusted keys
//! - Keyring and private key files
//!
//! # Quick Start
//!
//! ```
//! use bindle_signing::{
//!     generate_signature, verify_signatures, BindleSpec, Invoice, Parcel, SignatureKey,
//!     SignatureRole,
//! };
//!
//! # fn example() -> bindle_signing::SignatureResult<()> {
//! let mut invoice = Invoice::new(BindleSpec::new("proj", "0.1.0").with_author("Alice"))
//!     .with_parcel(Parcel::new("index.html", "text/html", b"<h1>hi</h1>"));
//!
//! let (key, secret) = SignatureKey::generate("Alice", SignatureRole::Creator);
//! generate_signature(&mut invoice, "Alice", SignatureRole::Creator, &key, &secret)?;
//!
//! let result = verify_signatures(&invoice, &[key])?;
//! assert!(result.has_role(SignatureRole::Creator));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Policy
//!
//! Verification checks each signature present. It does not require any
//! minimum number of signatures: an unsigned invoice verifies. Use
//! [`VerifyResult::has_role`] / [`VerifyResult::count_role`] to enforce
//! such policies.
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `BINDLE_KEYRING` | Keyring path (default: `<config dir>/bindle/keyring.toml`) |

pub mod cleartext;
pub mod error;
pub mod key;
pub mod keyring;
pub mod parcel;
pub mod role;
pub mod sign;
pub mod store;
pub mod types;
pub mod verify;

// Re-export main types
pub use cleartext::{build_cleartext, CLEARTEXT_SEPARATOR};
pub use error::{SignatureError, SignatureResult};
pub use key::{decode_private_key, encode_private_key, SignatureKey};
pub use keyring::{Keyring, KEYRING_VERSION};
pub use parcel::{sha256_hex_bytes, sha256_hex_reader};
pub use role::SignatureRole;
pub use sign::generate_signature;
pub use store::{
    default_keyring_path, read_private_key, write_private_key, KeyringStore, KEYRING_ENV,
    KEYRING_FILE_NAME,
};
pub use types::{BindleSpec, Condition, Group, Invoice, Label, Parcel, Signature, BINDLE_VERSION};
pub use verify::{verify_signatures, VerifiedSignature, VerifyResult};

// Private keys are plain ed25519-dalek keys.
pub use ed25519_dalek::SigningKey;
