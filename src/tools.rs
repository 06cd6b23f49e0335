//! MCP tool declarations and handlers for catalog queries
//!
//! Each tool takes a structured argument object and returns a text payload
//! containing JSON. A lookup miss is a tool-level error result with a
//! descriptive message, not a protocol fault; malformed arguments are
//! protocol-level invalid-params errors.

use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::chain::ChainKey;
use crate::query::{self, SearchType};

/// Get all catalog query tools
pub fn get_catalog_tools() -> Vec<Tool> {
    vec![
        get_token_by_address_tool(),
        search_tokens_tool(),
        get_tokens_by_chain_tool(),
        general_search_tool(),
    ]
}

fn chain_property() -> Value {
    json!({
        "type": ["string", "number"],
        "description": "Chain to search on: a chain ID (e.g. 1, 56) or a chain name ('solana', 'bnb', 'ton')"
    })
}

fn search_type_property() -> Value {
    json!({
        "type": "string",
        "enum": ["full-match", "partial-match"],
        "description": "'full-match' returns only exact symbol/name matches (default); 'partial-match' returns substring matches"
    })
}

fn get_token_by_address_tool() -> Tool {
    let mut input_schema = serde_json::Map::new();
    input_schema.insert("type".to_string(), Value::String("object".to_string()));

    let mut properties = serde_json::Map::new();
    properties.insert(
        "address".to_string(),
        json!({
            "type": "string",
            "description": "Token contract address (case-insensitive)"
        }),
    );
    properties.insert("chain".to_string(), chain_property());

    input_schema.insert("properties".to_string(), Value::Object(properties));
    input_schema.insert(
        "required".to_string(),
        Value::Array(vec![Value::String("address".to_string())]),
    );

    Tool::new(
        "get-token-by-address".to_string(),
        "Get one token by contract address on a specific chain. Defaults to the configured primary chain when no chain is given.".to_string(),
        Arc::new(input_schema),
    )
}

fn search_tokens_tool() -> Tool {
    let mut input_schema = serde_json::Map::new();
    input_schema.insert("type".to_string(), Value::String("object".to_string()));

    let mut properties = serde_json::Map::new();
    properties.insert(
        "query".to_string(),
        json!({
            "type": "string",
            "description": "Token name or symbol to search for (e.g. 'USDC', 'Wrapped')"
        }),
    );
    properties.insert("chain".to_string(), chain_property());
    properties.insert("searchType".to_string(), search_type_property());
    properties.insert(
        "limit".to_string(),
        json!({
            "type": "number",
            "description": "Maximum number of results (default from server config)"
        }),
    );

    input_schema.insert("properties".to_string(), Value::Object(properties));
    input_schema.insert(
        "required".to_string(),
        Value::Array(vec![Value::String("query".to_string())]),
    );

    Tool::new(
        "search-tokens".to_string(),
        "Search tokens by name or symbol. Results are ranked by how many source lists contain the token.".to_string(),
        Arc::new(input_schema),
    )
}

fn get_tokens_by_chain_tool() -> Tool {
    let mut input_schema = serde_json::Map::new();
    input_schema.insert("type".to_string(), Value::String("object".to_string()));

    let mut properties = serde_json::Map::new();
    properties.insert("chain".to_string(), chain_property());

    input_schema.insert("properties".to_string(), Value::Object(properties));
    input_schema.insert(
        "required".to_string(),
        Value::Array(vec![Value::String("chain".to_string())]),
    );

    Tool::new(
        "get-tokens-by-chain".to_string(),
        "List all tokens known on one chain, in catalog order.".to_string(),
        Arc::new(input_schema),
    )
}

fn general_search_tool() -> Tool {
    let mut input_schema = serde_json::Map::new();
    input_schema.insert("type".to_string(), Value::String("object".to_string()));

    let mut properties = serde_json::Map::new();
    properties.insert(
        "query".to_string(),
        json!({
            "type": "string",
            "description": "Text to match against token addresses, names, and symbols"
        }),
    );
    properties.insert("chain".to_string(), chain_property());
    properties.insert("searchType".to_string(), search_type_property());
    properties.insert(
        "limit".to_string(),
        json!({
            "type": "number",
            "description": "Maximum number of results (default from server config)"
        }),
    );

    input_schema.insert("properties".to_string(), Value::Object(properties));
    input_schema.insert(
        "required".to_string(),
        Value::Array(vec![Value::String("query".to_string())]),
    );

    Tool::new(
        "general-search".to_string(),
        "Search tokens by address, name, or symbol. Address matches are listed first.".to_string(),
        Arc::new(input_schema),
    )
}

/// Read the optional chain parameter (accepts `chain` or `chainId`, as a
/// number or a name string).
fn optional_chain(args: &serde_json::Map<String, Value>) -> Result<Option<ChainKey>, rmcp::ErrorData> {
    let value = match args.get("chain").or_else(|| args.get("chainId")) {
        Some(value) => value,
        None => return Ok(None),
    };
    match ChainKey::from_value(value) {
        Some(chain) => Ok(Some(chain)),
        None => Err(rmcp::ErrorData::invalid_params(
            format!(
                "Invalid chain '{}'. Use a chain ID or one of: solana, bnb, ton",
                value
            ),
            None,
        )),
    }
}

fn required_query(args: &serde_json::Map<String, Value>) -> Result<&str, rmcp::ErrorData> {
    args.get("query").and_then(|v| v.as_str()).ok_or_else(|| {
        rmcp::ErrorData::invalid_params("Missing or invalid 'query' parameter", None)
    })
}

fn search_type(args: &serde_json::Map<String, Value>) -> Result<SearchType, rmcp::ErrorData> {
    match args.get("searchType").and_then(|v| v.as_str()) {
        None => Ok(SearchType::default()),
        Some(s) => SearchType::from_param(s).ok_or_else(|| {
            rmcp::ErrorData::invalid_params(
                format!(
                    "Invalid searchType '{}'. Use 'full-match' or 'partial-match'",
                    s
                ),
                None,
            )
        }),
    }
}

fn limit(args: &serde_json::Map<String, Value>, default_limit: usize) -> usize {
    args.get("limit")
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .unwrap_or(default_limit)
}

fn json_result(payload: &Value) -> Result<CallToolResult, rmcp::ErrorData> {
    let text = serde_json::to_string_pretty(payload)
        .map_err(|e| rmcp::ErrorData::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Handle get-token-by-address tool call
pub fn handle_get_token_by_address(
    catalog: &Catalog,
    default_chain: ChainKey,
    args: &serde_json::Map<String, Value>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let address = args
        .get("address")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            rmcp::ErrorData::invalid_params("Missing or invalid 'address' parameter", None)
        })?;

    let chain = optional_chain(args)?.unwrap_or(default_chain);

    match query::find_token_by_address(catalog.tokens(), address, chain) {
        Some(token) => json_result(&serde_json::to_value(token).unwrap_or(Value::Null)),
        None => Ok(CallToolResult::error(vec![Content::text(format!(
            "No token found with address {} on chain {}",
            address, chain
        ))])),
    }
}

/// Handle search-tokens tool call
pub fn handle_search_tokens(
    catalog: &Catalog,
    default_limit: usize,
    args: &serde_json::Map<String, Value>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let query_str = required_query(args)?;
    let chain = optional_chain(args)?;
    let search_type = search_type(args)?;
    let limit = limit(args, default_limit);

    let candidates = query::search_tokens(catalog.tokens(), query_str, chain);
    let refined = query::refine(candidates, query_str, search_type);
    let results = query::rank_and_truncate(refined, limit);

    json_result(&json!({
        "count": results.len(),
        "tokens": results,
    }))
}

/// Handle get-tokens-by-chain tool call
pub fn handle_get_tokens_by_chain(
    catalog: &Catalog,
    args: &serde_json::Map<String, Value>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let chain_value = args
        .get("chain")
        .or_else(|| args.get("chainId"))
        .ok_or_else(|| rmcp::ErrorData::invalid_params("Missing 'chain' parameter", None))?;
    let chain = ChainKey::from_value(chain_value).ok_or_else(|| {
        rmcp::ErrorData::invalid_params(
            format!(
                "Invalid chain '{}'. Use a chain ID or one of: solana, bnb, ton",
                chain_value
            ),
            None,
        )
    })?;

    let results = query::tokens_by_chain(catalog.tokens(), chain);

    json_result(&json!({
        "chain": chain,
        "count": results.len(),
        "tokens": results,
    }))
}

/// Handle general-search tool call
pub fn handle_general_search(
    catalog: &Catalog,
    default_limit: usize,
    args: &serde_json::Map<String, Value>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let query_str = required_query(args)?;
    let chain = optional_chain(args)?;
    let search_type = search_type(args)?;
    let limit = limit(args, default_limit);

    let candidates = query::general_search(catalog.tokens(), query_str, chain);
    let refined = query::refine(candidates, query_str, search_type);
    let results = query::rank_and_truncate(refined, limit);

    json_result(&json!({
        "count": results.len(),
        "tokens": results,
    }))
}
