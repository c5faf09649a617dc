//! Parcel labels built from raw content.

use std::io::Read;

use sha2::{Digest, Sha256};

use crate::types::{Label, Parcel};

/// Lowercase hex SHA-256 of everything `reader` yields.
pub fn sha256_hex_reader<R: Read>(mut reader: R) -> std::io::Result<(String, u64)> {
    let mut hasher = Sha256::new();
    let mut buf = [0_u8; 8192];
    let mut size = 0_u64;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }

    Ok((hex::encode(hasher.finalize()), size))
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

impl Label {
    /// Build a label for `data`, computing its digest and size.
    pub fn from_bytes(name: impl Into<String>, media_type: impl Into<String>, data: &[u8]) -> Self {
        Self {
            sha256: sha256_hex_bytes(data),
            media_type: media_type.into(),
            name: name.into(),
            size: data.len() as u64,
            annotations: None,
            feature: None,
        }
    }

    /// Build a label from a stream.
    pub fn from_reader<R: Read>(
        name: impl Into<String>,
        media_type: impl Into<String>,
        reader: R,
    ) -> std::io::Result<Self> {
        let (sha256, size) = sha256_hex_reader(reader)?;
        Ok(Self {
            sha256,
            media_type: media_type.into(),
            name: name.into(),
            size,
            annotations: None,
            feature: None,
        })
    }
}

impl Parcel {
    /// A parcel with no group conditions for `data`.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: &[u8]) -> Self {
        Self {
            label: Label::from_bytes(name, media_type, data),
            conditions: None,
        }
    }

    /// A parcel that only carries a precomputed digest.
    pub fn from_sha256(sha256: impl Into<String>) -> Self {
        Self {
            label: Label {
                sha256: sha256.into(),
                ..Label::default()
            },
            conditions: None,
        }
    }
}
