mod cases;
mod core;
mod marketplace;
mod schemas;

pub use core::{McpToolServices, SoarMcpCore, ToolNameConflict};
pub use marketplace::{input_schema, tool_definition};
