//! Token Catalog MCP Server - Entry point

use anyhow::Result;
use clap::Parser;
use rmcp::service::ServiceExt;

use token_catalog_mcp::{
    catalog, config::Config, logging::StderrSink, TokenCatalogServer,
};

/// Token Catalog MCP Server - merged token list lookup and search over stdio
#[derive(Parser, Debug)]
#[command(name = "token-catalog-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from CLI flag or default
    let config = match cli.config {
        Some(ref config_path) => Config::from_file(config_path)?,
        None => Config::load_default(),
    };

    eprintln!(
        "✓ {} source(s) configured, default chain {}",
        config.sources.len(),
        config.default_chain
    );

    // Build the catalog before the transport starts; token data is a hard
    // prerequisite for serving any query, so failure here exits non-zero.
    let log = StderrSink;
    let catalog = catalog::initialize(&config, &log).await?;

    let server = TokenCatalogServer::new(catalog, config.default_chain, config.default_limit);

    // Serve using stdio transport (diagnostics stay on stderr)
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let service = server.serve((stdin, stdout)).await?;
    service.waiting().await?;

    Ok(())
}
