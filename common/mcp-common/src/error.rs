//! Error handling utilities for MCP servers
//!
//! Two kinds of failure leave a tool:
//!
//! - **Tool failures** are expected domain outcomes ("not found", "bad
//!   query"). They implement [`ToolFailure`] and are returned to the client
//!   as an error *result* with a machine-readable [`ToolErrorBody`], so the
//!   client can decide whether to retry, reformulate or give up.
//! - **Protocol errors** ([`McpError`]) are reserved for things the client
//!   cannot act on: serialization failures, panicked worker tasks.

use rmcp::ErrorData as McpError;
use serde::{Deserialize, Serialize};

/// A domain error that is reported to the client as a typed tool result
pub trait ToolFailure: std::fmt::Display {
    /// Stable snake_case identifier of the failure, e.g. `not_found`
    fn kind(&self) -> &'static str;

    /// Whether repeating the same call later may succeed
    fn retryable(&self) -> bool {
        false
    }

    /// The JSON body sent to the client
    fn to_body(&self) -> ToolErrorBody {
        ToolErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
            retryable: self.retryable(),
        }
    }
}

/// Wire shape of a tool failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolErrorBody {
    pub error: String,
    pub message: String,
    pub retryable: bool,
}

/// Conversion of unexpected errors into protocol errors
pub trait IntoMcpError {
    /// Convert this error into an MCP error
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for serde_json::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(format!("JSON error: {}", self), None)
    }
}

impl IntoMcpError for anyhow::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(self.to_string(), None)
    }
}

impl IntoMcpError for String {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(self, None)
    }
}

/// Extension trait adding `to_mcp_err()` to results
///
/// ```rust,ignore
/// use mcp_common::ResultExt;
///
/// let snapshot = tokio::task::spawn_blocking(work)
///     .await
///     .map_err(|e| e.to_string())
///     .to_mcp_err()?;
/// ```
pub trait ResultExt<T> {
    /// Convert the error to an MCP error
    fn to_mcp_err(self) -> Result<T, McpError>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> Result<T, McpError> {
        self.map_err(|e| e.into_mcp_error())
    }
}
