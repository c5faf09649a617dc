//! Signature roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SignatureError;

/// The role a signature attests to.
///
/// The set is closed. Unknown role strings are rejected when parsed, and
/// serde goes through the same parser, so an invoice or keyring carrying an
/// unknown role fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SignatureRole {
    /// The party that created the bindle.
    Creator,
    /// A party that vouches for the bindle after review.
    Approver,
    /// A party that signs on behalf of another.
    Proxy,
    /// Hosting infrastructure.
    Host,
}

impl SignatureRole {
    /// All roles, in wire order.
    pub const ALL: [SignatureRole; 4] = [Self::Creator, Self::Approver, Self::Proxy, Self::Host];

    /// Wire token for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Approver => "approver",
            Self::Proxy => "proxy",
            Self::Host => "host",
        }
    }
}

impl fmt::Display for SignatureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureRole {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator" => Ok(Self::Creator),
            "approver" => Ok(Self::Approver),
            "proxy" => Ok(Self::Proxy),
            "host" => Ok(Self::Host),
            other => Err(SignatureError::InvalidRole {
                role: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SignatureRole {
    type Error = SignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SignatureRole> for String {
    fn from(role: SignatureRole) -> Self {
        role.as_str().to_string()
    }
}
