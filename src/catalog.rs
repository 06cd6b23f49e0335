//! The merged token catalog
//!
//! The catalog is built exactly once at startup by folding each source list
//! in, in declaration order, and is read-only for the rest of the process.
//! Identity is the pair (address lower-cased, chain); at most one token
//! exists per identity. When two sources disagree on a field, the first
//! source to supply a non-empty value wins; later sources can only fill
//! fields the earlier ones left empty.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::chain::ChainKey;
use crate::config::Config;
use crate::csv;
use crate::logging::LogSink;
use crate::sources::{self, RawToken, SourceList};

/// One merged catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: String,
    pub chain: ChainKey,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    /// Names of every source list that contributed to this entry, in
    /// first-seen order, without duplicates.
    pub token_lists: Vec<String>,
}

impl Token {
    /// Identity pair used for dedup: lower-cased address plus chain.
    pub fn identity(&self) -> (String, ChainKey) {
        (self.address.to_lowercase(), self.chain)
    }
}

/// Ordered, deduplicated token collection with an identity index.
///
/// Append-only for new identities, update-in-place for existing ones.
/// Populated by [`initialize`] and never mutated afterwards.
#[derive(Debug, Default)]
pub struct Catalog {
    tokens: Vec<Token>,
    index: HashMap<(String, ChainKey), usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tokens in insertion order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Fold one source list into the catalog.
    ///
    /// New identities are appended with a fresh provenance of just this
    /// list's name. Existing identities get field-fill-only reconciliation:
    /// a later source never overrides a populated field, it only fills
    /// empty ones. The list's name is appended to provenance either way.
    pub fn merge(&mut self, list: &SourceList) {
        for raw in &list.tokens {
            if raw.address.is_empty() {
                continue;
            }
            // Records without their own chain id inherit the descriptor's
            // chain tag; a record with neither is unusable and skipped.
            let chain = match raw.chain_id.map(ChainKey::Id).or(list.chain) {
                Some(chain) => chain,
                None => continue,
            };

            let identity = (raw.address.to_lowercase(), chain);
            match self.index.get(&identity).copied() {
                Some(idx) => fill_token(&mut self.tokens[idx], raw, &list.name),
                None => {
                    self.tokens.push(Token {
                        address: raw.address.clone(),
                        chain,
                        name: raw.name.clone(),
                        symbol: raw.symbol.clone(),
                        decimals: raw.decimals.unwrap_or(csv::DEFAULT_DECIMALS),
                        logo_uri: raw.logo_uri.clone(),
                        token_lists: vec![list.name.clone()],
                    });
                    self.index.insert(identity, self.tokens.len() - 1);
                }
            }
        }
    }
}

/// Fill empty fields of an existing token from a later source's record.
///
/// `decimals` uses a zero-is-unset check, so a stored 0 can be filled by a
/// later non-zero value. Zero-decimal tokens from a first source are
/// therefore not protected; see DESIGN.md.
fn fill_token(existing: &mut Token, raw: &RawToken, source_name: &str) {
    if existing.name.is_empty() && !raw.name.is_empty() {
        existing.name = raw.name.clone();
    }
    if existing.symbol.is_empty() && !raw.symbol.is_empty() {
        existing.symbol = raw.symbol.clone();
    }
    if existing.decimals == 0 {
        if let Some(decimals) = raw.decimals {
            if decimals != 0 {
                existing.decimals = decimals;
            }
        }
    }
    if existing.logo_uri.is_none() && raw.logo_uri.is_some() {
        existing.logo_uri = raw.logo_uri.clone();
    }
    if !existing.token_lists.iter().any(|name| name == source_name) {
        existing.token_lists.push(source_name.to_string());
    }
}

/// Build the catalog from the configured sources.
///
/// Sources are loaded and merged strictly one at a time, in declaration
/// order; the next fetch does not start until the previous merge completes,
/// because the first-writer-wins rule makes merge order significant. A
/// source that fails to load is skipped (already logged by the loader);
/// any error escaping this loop is fatal to the process.
pub async fn initialize(config: &Config, log: &dyn LogSink) -> Result<Catalog> {
    log.progress("Initializing token list...");

    let mut catalog = Catalog::new();
    for source in &config.sources {
        log.progress(&format!("Fetching source '{}'...", source.name()));
        if let Some(list) = sources::load_source(source, log).await {
            log.progress(&format!(
                "Merging {} tokens from '{}'",
                list.tokens.len(),
                list.name
            ));
            catalog.merge(&list);
        }
    }

    log.progress(&format!(
        "Token list initialized with {} tokens",
        catalog.len()
    ));
    Ok(catalog)
}
