//! MCP Common - Shared utilities for MCP servers
//!
//! - **Initialization**: [`init_tracing`] writes logs to stderr, text or JSON
//! - **Results**: helpers for building `CallToolResult` responses
//! - **Errors**: [`ToolFailure`] for typed, client-visible failures and
//!   [`IntoMcpError`] for everything else
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process execution
//!
//! ```rust,ignore
//! use mcp_common::{tool_result, ToolFailure};
//!
//! async fn get_component_by_path(&self, ...) -> Result<CallToolResult, McpError> {
//!     tool_result(self.engine.get_component_by_path(&params.path))
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{IntoMcpError, ResultExt, ToolErrorBody, ToolFailure};
pub use init::{init_tracing, init_tracing_at, LogFormat};
pub use result::{failure_result, json_success, tool_result};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
