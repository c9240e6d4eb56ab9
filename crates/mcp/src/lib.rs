//! Model Context Protocol (MCP) server for SecOps SOAR.
//!
//! This crate exposes SOAR case management and marketplace integration
//! actions as MCP tools, including configuration management, the action
//! invocation pipeline, and the stdio transport.

pub mod action;
pub mod bootstrap;
pub mod config;
pub mod server;

#[cfg(test)]
mod testing;

pub use bootstrap::{SCOPES_UNAVAILABLE, build_registry, build_services, build_services_with_backend, serve_stdio};
pub use config::{ConfigError, SoarConfig};
pub use server::{McpToolServices, SoarMcpCore, ToolNameConflict};
