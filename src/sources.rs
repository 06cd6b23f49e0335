//! Token source loading
//!
//! Each configured source is either a token-list JSON document fetched over
//! HTTP or a local CSV export. A source loads into an ephemeral
//! [`SourceList`] that the merge step consumes; a source that fails to fetch
//! or parse contributes nothing and initialization continues, so one flaky
//! upstream cannot take the whole catalog down.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::chain::ChainKey;
use crate::config::SourceConfig;
use crate::csv;
use crate::logging::LogSink;

/// Token list version triple, as carried by token-list JSON documents.
#[derive(Debug, Clone, Deserialize)]
pub struct ListVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// One raw token record as read from a source, before merging.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToken {
    pub address: String,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "deserialize_decimals")]
    pub decimals: Option<u32>,
    #[serde(default, rename = "logoURI")]
    pub logo_uri: Option<String>,
}

/// One unmerged source list. Discarded after its merge completes.
#[derive(Debug)]
pub struct SourceList {
    /// Name recorded in every contributed token's provenance.
    pub name: String,
    pub timestamp: Option<String>,
    pub version: Option<ListVersion>,
    /// Chain tag from the source descriptor, used for records that do not
    /// carry their own chain id.
    pub chain: Option<ChainKey>,
    pub tokens: Vec<RawToken>,
}

/// Token list JSON document shape (the token-list standard).
#[derive(Debug, Deserialize)]
struct TokenListDoc {
    #[serde(default)]
    name: String,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    version: Option<ListVersion>,
    tokens: Vec<RawToken>,
}

/// Deserialize a decimals field that upstream lists variously encode as a
/// number or a numeric string; anything unparseable falls back to 18.
fn deserialize_decimals<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer) {
        Ok(Some(NumberOrString::Number(n))) => Ok(Some(n)),
        Ok(Some(NumberOrString::String(s))) => {
            Ok(Some(s.trim().parse().unwrap_or(csv::DEFAULT_DECIMALS)))
        }
        Ok(None) => Ok(None),
        Err(_) => Ok(Some(csv::DEFAULT_DECIMALS)),
    }
}

/// Load one configured source, never raising to the caller.
///
/// Fetch, read, or parse failures are written to the sink's error channel
/// and the source is skipped for this process lifetime (no retries).
pub async fn load_source(source: &SourceConfig, log: &dyn LogSink) -> Option<SourceList> {
    match fetch_source(source).await {
        Ok(list) => Some(list),
        Err(e) => {
            log.error(&format!("Failed to load source '{}': {:#}", source.name(), e));
            None
        }
    }
}

async fn fetch_source(source: &SourceConfig) -> Result<SourceList> {
    match source {
        SourceConfig::Http { name, url, chain } => {
            let client = reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .user_agent("token-catalog-mcp")
                .build()?;

            let response = client.get(url).send().await?;
            if !response.status().is_success() {
                bail!("HTTP {} from {}", response.status(), url);
            }

            // Grab the text first so parse errors can mention the source.
            let text = response.text().await?;
            let doc: TokenListDoc = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse token list from {}", url))?;

            // The payload's own list name wins for provenance when present.
            let list_name = if doc.name.is_empty() {
                name.clone()
            } else {
                doc.name
            };

            Ok(SourceList {
                name: list_name,
                timestamp: doc.timestamp,
                version: doc.version,
                chain: *chain,
                tokens: doc.tokens,
            })
        }
        SourceConfig::Csv { name, path, chain } => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read CSV source: {}", path))?;
            let tokens = csv::parse_tokens(&text)
                .with_context(|| format!("Failed to parse CSV source: {}", path))?;

            Ok(SourceList {
                name: name.clone(),
                timestamp: None,
                version: None,
                chain: Some(*chain),
                tokens,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainName;
    use crate::logging::MemorySink;
    use std::io::Write;

    #[test]
    fn test_token_list_doc_parse() {
        let json = r#"{
            "name": "Test List",
            "timestamp": "2024-01-01T00:00:00Z",
            "version": {"major": 1, "minor": 2, "patch": 3},
            "tokens": [
                {"chainId": 1, "address": "0xA", "name": "Alpha", "symbol": "ALF", "decimals": 6},
                {"chainId": 1, "address": "0xB", "name": "Beta", "symbol": "BET", "decimals": "9"}
            ]
        }"#;
        let doc: TokenListDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name, "Test List");
        assert_eq!(doc.version.as_ref().unwrap().major, 1);
        assert_eq!(doc.tokens[0].decimals, Some(6));
        // numeric string is accepted
        assert_eq!(doc.tokens[1].decimals, Some(9));
    }

    #[test]
    fn test_decimals_fallback_on_garbage() {
        let json = r#"{"address": "0xA", "decimals": "N/A"}"#;
        let token: RawToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.decimals, Some(csv::DEFAULT_DECIMALS));

        let json = r#"{"address": "0xA"}"#;
        let token: RawToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.decimals, None);
    }

    #[test]
    fn test_raw_token_defaults() {
        let json = r#"{"address": "0xA"}"#;
        let token: RawToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.name, "");
        assert_eq!(token.symbol, "");
        assert_eq!(token.chain_id, None);
        assert_eq!(token.logo_uri, None);
    }

    #[tokio::test]
    async fn test_load_csv_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "address,name,symbol,decimals").unwrap();
        writeln!(file, "So1111,Wrapped SOL,SOL,9").unwrap();

        let source = SourceConfig::Csv {
            name: "local".to_string(),
            path: file.path().to_string_lossy().into_owned(),
            chain: ChainKey::Named(ChainName::Solana),
        };

        let sink = MemorySink::new();
        let list = load_source(&source, &sink).await.unwrap();
        assert_eq!(list.name, "local");
        assert_eq!(list.chain, Some(ChainKey::Named(ChainName::Solana)));
        assert_eq!(list.tokens.len(), 1);
        assert!(sink.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_csv_is_soft_failure() {
        let source = SourceConfig::Csv {
            name: "missing".to_string(),
            path: "/nonexistent/tokens.csv".to_string(),
            chain: ChainKey::Named(ChainName::Ton),
        };

        let sink = MemorySink::new();
        assert!(load_source(&source, &sink).await.is_none());
        let errors = sink.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("missing"));
    }
}
