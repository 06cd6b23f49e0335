//! Catalog queries
//!
//! Lookup, search, and listing over the finished catalog. All functions
//! borrow tokens and never mutate. Search runs in two stages: a
//! case-insensitive substring prefilter, then an optional exact-equality
//! refinement, and every result set is ranked by how many source lists
//! vouch for each token before truncation.

use crate::catalog::Token;
use crate::chain::ChainKey;

/// Search refinement mode.
///
/// `FullMatch` keeps only tokens whose symbol or name equals the query
/// exactly (case-insensitive); the substring search acts purely as the
/// candidate prefilter. `PartialMatch` returns the substring matches as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    #[default]
    FullMatch,
    PartialMatch,
}

impl SearchType {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "full-match" => Some(SearchType::FullMatch),
            "partial-match" => Some(SearchType::PartialMatch),
            _ => None,
        }
    }
}

/// Find a token by address on a specific chain.
///
/// Address comparison is case-insensitive, chain comparison exact. Returns
/// the first match in catalog order; a miss is not an error.
pub fn find_token_by_address<'a>(
    tokens: &'a [Token],
    address: &str,
    chain: ChainKey,
) -> Option<&'a Token> {
    let address_lower = address.to_lowercase();
    tokens
        .iter()
        .find(|t| t.chain == chain && t.address.to_lowercase() == address_lower)
}

/// All tokens on a chain, in catalog order.
pub fn tokens_by_chain<'a>(tokens: &'a [Token], chain: ChainKey) -> Vec<&'a Token> {
    tokens.iter().filter(|t| t.chain == chain).collect()
}

/// Case-insensitive substring search over symbol or name, optionally
/// restricted to one chain. Results stay in catalog order.
pub fn search_tokens<'a>(
    tokens: &'a [Token],
    query: &str,
    chain: Option<ChainKey>,
) -> Vec<&'a Token> {
    let query_lower = query.to_lowercase();
    tokens
        .iter()
        .filter(|t| {
            let matches_chain = chain.is_none_or(|c| t.chain == c);
            matches_chain && matches_name_or_symbol(t, &query_lower)
        })
        .collect()
}

/// Address-inclusive search: address substring matches first, then the
/// name/symbol substring matches, deduplicated by identity.
pub fn general_search<'a>(
    tokens: &'a [Token],
    query: &str,
    chain: Option<ChainKey>,
) -> Vec<&'a Token> {
    let query_lower = query.to_lowercase();

    let address_matches: Vec<&Token> = tokens
        .iter()
        .filter(|t| {
            let matches_chain = chain.is_none_or(|c| t.chain == c);
            matches_chain && t.address.to_lowercase().contains(&query_lower)
        })
        .collect();

    let mut results = address_matches;
    for token in search_tokens(tokens, query, chain) {
        let identity = token.identity();
        if !results.iter().any(|t| t.identity() == identity) {
            results.push(token);
        }
    }
    results
}

fn matches_name_or_symbol(token: &Token, query_lower: &str) -> bool {
    token.symbol.to_lowercase().contains(query_lower)
        || token.name.to_lowercase().contains(query_lower)
}

/// Apply the full/partial refinement to a substring-matched candidate set.
pub fn refine<'a>(matches: Vec<&'a Token>, query: &str, search_type: SearchType) -> Vec<&'a Token> {
    match search_type {
        SearchType::PartialMatch => matches,
        SearchType::FullMatch => {
            let query_lower = query.to_lowercase();
            matches
                .into_iter()
                .filter(|t| {
                    t.symbol.to_lowercase() == query_lower || t.name.to_lowercase() == query_lower
                })
                .collect()
        }
    }
}

/// Rank matches by provenance weight and truncate.
///
/// Tokens appearing in more source lists sort first; ties keep their
/// relative catalog order (stable sort). No upper bound is enforced on
/// `limit`.
pub fn rank_and_truncate<'a>(mut matches: Vec<&'a Token>, limit: usize) -> Vec<&'a Token> {
    matches.sort_by_key(|t| std::cmp::Reverse(t.token_lists.len()));
    matches.truncate(limit);
    matches
}
