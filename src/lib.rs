//! Token Catalog MCP Server
//!
//! A Model Context Protocol (MCP) server exposing a queryable in-memory
//! catalog of blockchain token metadata. At startup the catalog is built by
//! merging several external token-list sources (HTTP token-list JSON or
//! local CSV files), deduplicated by (address, chain) with first-writer-wins
//! field reconciliation; clients then query it through lookup and search
//! tools over stdio.

pub mod catalog;
pub mod chain;
pub mod config;
pub mod csv;
pub mod logging;
pub mod query;
pub mod server;
pub mod sources;
pub mod tools;

pub use server::TokenCatalogServer;
