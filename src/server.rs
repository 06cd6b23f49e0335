//! MCP server handler implementation

use rmcp::{
    model::*,
    service::{RequestContext, RoleServer},
    ErrorData as McpError, ServerHandler,
};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::chain::ChainKey;
use crate::tools;

/// MCP server handler over the finished token catalog.
///
/// Constructed only after initialization completes, so every query observes
/// the fully merged catalog.
#[derive(Clone)]
pub struct TokenCatalogServer {
    catalog: Arc<Catalog>,
    default_chain: ChainKey,
    default_limit: usize,
}

impl TokenCatalogServer {
    pub fn new(catalog: Catalog, default_chain: ChainKey, default_limit: usize) -> Self {
        Self {
            catalog: Arc::new(catalog),
            default_chain,
            default_limit,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl ServerHandler for TokenCatalogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                prompts: None,
                resources: Some(ResourcesCapability {
                    subscribe: None,
                    list_changed: None,
                }),
                tools: Some(ToolsCapability {
                    list_changed: None,
                }),
                logging: None,
                completions: None,
                experimental: None,
            },
            server_info: Implementation {
                name: "token-catalog-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Token Catalog MCP Server".to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some("MCP server exposing a merged catalog of blockchain token metadata. Look tokens up by address, list them by chain, or search by name/symbol/address with full-match or partial-match semantics.".into()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: tools::get_catalog_tools(),
            next_cursor: None,
        })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut catalog_resource = RawResource::new("tokenlist://all", "Merged Token Catalog");
        catalog_resource.description = Some(
            "Every token in the merged catalog, with provenance, as one JSON array".to_string(),
        );
        catalog_resource.mime_type = Some("application/json".to_string());

        Ok(ListResourcesResult {
            resources: vec![catalog_resource.no_annotation()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match request.uri.as_str() {
            "tokenlist://all" => {
                let json = serde_json::to_string_pretty(self.catalog.tokens())
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;

                Ok(ReadResourceResult {
                    contents: vec![ResourceContents::TextResourceContents {
                        uri: request.uri,
                        mime_type: Some("application/json".to_string()),
                        text: json,
                        meta: None,
                    }],
                })
            }
            _ => Err(McpError::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            )),
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .as_ref()
            .ok_or_else(|| McpError::invalid_params("Missing arguments", None))?;

        match request.name.as_ref() {
            "get-token-by-address" => {
                tools::handle_get_token_by_address(&self.catalog, self.default_chain, args)
            }
            "search-tokens" => tools::handle_search_tokens(&self.catalog, self.default_limit, args),
            "get-tokens-by-chain" => tools::handle_get_tokens_by_chain(&self.catalog, args),
            "general-search" => {
                tools::handle_general_search(&self.catalog, self.default_limit, args)
            }
            _ => Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            )),
        }
    }
}
