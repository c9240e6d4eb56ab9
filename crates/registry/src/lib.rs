//! Marketplace integration catalog for the SecOps SOAR MCP server.
//!
//! This crate loads vendor integration manifests (embedded in the binary or
//! read from a directory), selects the integrations the operator enabled, and
//! indexes their actions by MCP tool name.

mod catalog;
mod error;
mod models;

pub use catalog::{ManifestFormat, embedded_manifests, load_manifest_dir, merge_manifests, parse_manifest};
pub use error::RegistryError;
pub use models::{IntegrationRegistry, IntegrationSelection, MarketplaceAction};
