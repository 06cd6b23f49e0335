//! Chain identifiers
//!
//! A token's chain is either a numeric chain ID (EVM-style deployments) or
//! one of the named non-EVM chains. Both forms participate in token identity
//! and both are accepted wherever a tool takes a chain parameter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Named non-EVM chains supported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainName {
    Solana,
    Bnb,
    Ton,
}

impl ChainName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainName::Solana => "solana",
            ChainName::Bnb => "bnb",
            ChainName::Ton => "ton",
        }
    }

    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "solana" => Some(ChainName::Solana),
            "bnb" => Some(ChainName::Bnb),
            "ton" => Some(ChainName::Ton),
            _ => None,
        }
    }
}

/// Identity component selecting which network a token lives on.
///
/// Serialized untagged, so a JSON chain value is either a number (`1`) or a
/// name string (`"solana"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainKey {
    Id(u64),
    Named(ChainName),
}

impl ChainKey {
    /// Parse a chain tool parameter. Accepts a JSON number, a numeric string,
    /// or a named chain (case-insensitive).
    pub fn from_value(value: &Value) -> Option<ChainKey> {
        match value {
            Value::Number(n) => n.as_u64().map(ChainKey::Id),
            Value::String(s) => ChainKey::from_param(s),
            _ => None,
        }
    }

    /// Parse a chain string parameter (number first, then name).
    pub fn from_param(s: &str) -> Option<ChainKey> {
        if let Ok(id) = s.parse::<u64>() {
            return Some(ChainKey::Id(id));
        }
        ChainName::from_str_ci(s).map(ChainKey::Named)
    }
}

impl fmt::Display for ChainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainKey::Id(id) => write!(f, "{}", id),
            ChainKey::Named(name) => write!(f, "{}", name.as_str()),
        }
    }
}
