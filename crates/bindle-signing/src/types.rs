//! Invoice data model.
//!
//! Field names follow the Bindle TOML encoding (`bindleVersion`, `parcel`,
//! `label`, `sha256`, `signature`, ...) so invoices round-trip with other
//! implementations of the format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SignatureResult;
use crate::role::SignatureRole;

/// Invoice schema version written by [`Invoice::new`].
pub const BINDLE_VERSION: &str = "1.0.0";

/// A Bindle invoice: a named, versioned bundle and its parcels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Invoice schema version.
    pub bindle_version: String,

    /// Whether the invoice has been yanked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yanked: Option<bool>,

    /// Name, version and authors.
    pub bindle: BindleSpec,

    /// Free-form annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,

    /// Parcels, in signing order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parcel: Vec<Parcel>,

    /// Membership groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group: Vec<Group>,

    // Append-only; only `sign` pushes to it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    signature: Vec<Signature>,
}

impl Invoice {
    /// Create an unsigned invoice with no parcels.
    pub fn new(bindle: BindleSpec) -> Self {
        Self {
            bindle_version: BINDLE_VERSION.to_string(),
            yanked: None,
            bindle,
            annotations: None,
            parcel: Vec::new(),
            group: Vec::new(),
            signature: Vec::new(),
        }
    }

    /// Add a parcel at the end of the parcel list.
    pub fn with_parcel(mut self, parcel: Parcel) -> Self {
        self.parcel.push(parcel);
        self
    }

    /// Add a group.
    pub fn with_group(mut self, group: Group) -> Self {
        self.group.push(group);
        self
    }

    /// Full bindle name (`name/version`).
    pub fn name(&self) -> String {
        format!("{}/{}", self.bindle.name, self.bindle.version)
    }

    /// Signatures attached to this invoice, in the order they were added.
    pub fn signatures(&self) -> &[Signature] {
        &self.signature
    }

    /// Whether `author` is a declared author of this invoice.
    pub fn has_author(&self, author: &str) -> bool {
        self.bindle.authors.iter().any(|a| a == author)
    }

    /// First declared author, the default signer for creator signatures.
    pub fn primary_author(&self) -> Option<&str> {
        self.bindle.authors.first().map(String::as_str)
    }

    pub(crate) fn append_signature(&mut self, signature: Signature) {
        self.signature.push(signature);
    }

    /// Parse an invoice from TOML.
    pub fn from_toml(content: &str) -> SignatureResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the invoice to TOML.
    pub fn to_toml(&self) -> SignatureResult<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Identifying data of a bindle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindleSpec {
    /// Bindle name (may contain `/`).
    pub name: String,

    /// Version string.
    pub version: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Authors; the first one is the primary author.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
}

impl BindleSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            authors: Vec::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }
}

/// A parcel reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Parcel metadata.
    pub label: Label,

    /// Group membership conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Condition>,
}

/// Metadata of a stored parcel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// Lowercase hex SHA-256 of the parcel bytes.
    pub sha256: String,

    /// Media type of the parcel.
    pub media_type: String,

    /// File name.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<BTreeMap<String, BTreeMap<String, String>>>,
}

/// Associates a parcel with groups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_of: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Vec<String>>,
}

/// A named group of parcels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfied_by: Option<String>,
}

/// A signature attached to an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Author identity of the signer.
    pub by: String,

    /// Base64 Ed25519 signature over the cleartext.
    pub signature: String,

    /// Base64 public key of the signer.
    pub key: String,

    /// Role the signature attests to.
    pub role: SignatureRole,

    /// Unix timestamp (seconds) of signing.
    pub at: i64,
}
