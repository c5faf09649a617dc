//! Local keyring and private key files.
//!
//! # Layout
//!
//! ```text
//! ~/.config/bindle/keyring.toml   # Keyring (public keys, roles)
//! <anywhere>/secret.key           # base64 private key, mode 0600
//! ```
//!
//! The keyring location can be overridden with `BINDLE_KEYRING`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ed25519_dalek::SigningKey;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{SignatureError, SignatureResult};
use crate::key::{decode_private_key, encode_private_key, SignatureKey};
use crate::keyring::Keyring;

/// Environment variable overriding the keyring path.
pub const KEYRING_ENV: &str = "BINDLE_KEYRING";

/// Keyring file name inside the bindle config directory.
pub const KEYRING_FILE_NAME: &str = "keyring.toml";

/// A keyring stored in a TOML file.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    path: PathBuf,
}

impl KeyringStore {
    /// Use the keyring at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `BINDLE_KEYRING` if set, otherwise the default location.
    pub fn from_env() -> SignatureResult<Self> {
        match std::env::var_os(KEYRING_ENV) {
            Some(path) if !path.is_empty() => Ok(Self::new(path)),
            _ => Ok(Self::new(default_keyring_path()?)),
        }
    }

    /// Path of the keyring file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the keyring.
    pub fn load(&self) -> SignatureResult<Keyring> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SignatureError::KeyringNotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(SignatureError::io(&self.path, e)),
        };

        let keyring = Keyring::from_toml(&content)?;
        debug!(path = %self.path.display(), keys = keyring.len(), "loaded keyring");
        Ok(keyring)
    }

    /// Load the keyring, or start an empty one if the file does not exist.
    pub fn load_or_default(&self) -> SignatureResult<Keyring> {
        match self.load() {
            Ok(keyring) => Ok(keyring),
            Err(SignatureError::KeyringNotFound { .. }) => Ok(Keyring::new()),
            Err(e) => Err(e),
        }
    }

    /// Write the keyring, replacing any existing file.
    pub fn save(&self, keyring: &Keyring) -> SignatureResult<()> {
        let content = keyring.to_toml()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SignatureError::io(parent, e))?;
            }
        }

        write_atomic(&self.path, content.as_bytes())?;
        info!(path = %self.path.display(), keys = keyring.len(), "saved keyring");
        Ok(())
    }

    /// Append `key` to the stored keyring, creating it if needed.
    pub fn add_key(&self, key: SignatureKey) -> SignatureResult<Keyring> {
        let mut keyring = self.load_or_default()?;
        keyring.add_key(key);
        self.save(&keyring)?;
        Ok(keyring)
    }
}

/// Default keyring path.
///
/// `<config dir>/bindle/keyring.toml`, falling back to
/// `<home>/.bindle/keyring.toml`.
pub fn default_keyring_path() -> SignatureResult<PathBuf> {
    if let Some(config) = dirs::config_dir() {
        return Ok(config.join("bindle").join(KEYRING_FILE_NAME));
    }

    dirs::home_dir()
        .map(|home| home.join(".bindle").join(KEYRING_FILE_NAME))
        .ok_or_else(|| SignatureError::Config {
            message: "could not determine keyring directory".to_string(),
        })
}

/// Write a private key as base64 with owner-only permissions.
pub fn write_private_key(path: impl AsRef<Path>, signing_key: &SigningKey) -> SignatureResult<()> {
    let path = path.as_ref();
    write_atomic(path, encode_private_key(signing_key).as_bytes())?;
    debug!(path = %path.display(), "wrote private key");
    Ok(())
}

/// Read a base64 private key file.
pub fn read_private_key(path: impl AsRef<Path>) -> SignatureResult<SigningKey> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| SignatureError::io(path, e))?;
    decode_private_key(&content)
}

fn write_atomic(path: &Path, content: &[u8]) -> SignatureResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Created 0600 on unix and removed on drop if never persisted.
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| SignatureError::io(dir, e))?;
    temp.write_all(content)
        .map_err(|e| SignatureError::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| SignatureError::io(temp.path(), e))?;

    temp.persist(path)
        .map_err(|e| SignatureError::io(path, e.error))?;
    Ok(())
}
