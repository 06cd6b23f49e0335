//! Configuration for the token catalog server

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::chain::ChainKey;

/// One configured token source.
///
/// Distinguished by shape: an HTTP token-list JSON source carries a `url`,
/// a local CSV source carries a `path` plus the chain tag its schema-less
/// rows belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceConfig {
    Http {
        name: String,
        url: String,
        /// Fallback chain for records that carry no chain id of their own.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chain: Option<ChainKey>,
    },
    Csv {
        name: String,
        path: String,
        chain: ChainKey,
    },
}

impl SourceConfig {
    pub fn name(&self) -> &str {
        match self {
            SourceConfig::Http { name, .. } => name,
            SourceConfig::Csv { name, .. } => name,
        }
    }
}

/// Server configuration: which sources to merge, in which order, plus query
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Sources, merged strictly in this order (first writer wins).
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,

    /// Chain assumed by `get-token-by-address` when none is given.
    #[serde(default = "default_chain")]
    pub default_chain: ChainKey,

    /// Result cap applied when a search gives no `limit`.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::Http {
            name: "optimism".to_string(),
            url: "https://static.optimism.io/optimism.tokenlist.json".to_string(),
            chain: None,
        },
        SourceConfig::Http {
            name: "uniswap".to_string(),
            url: "https://tokens.uniswap.org".to_string(),
            chain: None,
        },
    ]
}

fn default_chain() -> ChainKey {
    ChainKey::Id(1)
}

fn default_limit() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            default_chain: default_chain(),
            default_limit: default_limit(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file: {}", path_ref.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path_ref.display()))?;

        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Tries `~/.token-catalog-mcp.json` first, then falls back to the
    /// built-in source set.
    pub fn load_default() -> Self {
        if let Ok(home) = std::env::var("HOME") {
            let default_path = format!("{}/.token-catalog-mcp.json", home);
            if Path::new(&default_path).exists() {
                match Self::from_file(&default_path) {
                    Ok(config) => {
                        eprintln!("✓ Loaded config from: {}", default_path);
                        return config;
                    }
                    Err(e) => {
                        eprintln!(
                            "⚠ Warning: Failed to parse config at {}: {}",
                            default_path, e
                        );
                    }
                }
            }
        }

        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainName;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.default_chain, ChainKey::Id(1));
        assert_eq!(config.default_limit, 100);
    }

    #[test]
    fn test_source_config_shapes() {
        let http: SourceConfig =
            serde_json::from_str(r#"{"name": "a", "url": "https://x/list.json"}"#).unwrap();
        assert!(matches!(http, SourceConfig::Http { .. }));

        let csv: SourceConfig =
            serde_json::from_str(r#"{"name": "b", "path": "tokens.csv", "chain": "ton"}"#).unwrap();
        match csv {
            SourceConfig::Csv { chain, .. } => {
                assert_eq!(chain, ChainKey::Named(ChainName::Ton));
            }
            _ => panic!("expected CSV source"),
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "sources": [
                    {{"name": "solana-main", "url": "https://x/solana.json", "chain": "solana"}},
                    {{"name": "extra", "path": "/data/extra.csv", "chain": "solana"}}
                ],
                "defaultChain": "solana",
                "defaultLimit": 1000
            }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].name(), "solana-main");
        assert_eq!(config.default_chain, ChainKey::Named(ChainName::Solana));
        assert_eq!(config.default_limit, 1000);
    }

    #[test]
    fn test_from_file_partial_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"defaultLimit": 5}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.default_chain, ChainKey::Id(1));
        assert!(!config.sources.is_empty());
    }

    #[test]
    fn test_from_file_missing() {
        assert!(Config::from_file("/nonexistent/config.json").is_err());
    }
}
