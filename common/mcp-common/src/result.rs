//! Result helpers for MCP tool responses

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

use crate::error::ToolFailure;

/// Create a successful JSON response from any serializable data
///
/// ```rust,ignore
/// use mcp_common::json_success;
///
/// fn list_frameworks(&self) -> Result<CallToolResult, McpError> {
///     json_success(&snapshot.list_frameworks())
/// }
/// ```
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Report a domain failure as an error result carrying a JSON
/// [`ToolErrorBody`](crate::ToolErrorBody)
///
/// ```rust,ignore
/// match snapshot.get_component_by_path(&params.path) {
///     Ok(record) => json_success(&record),
///     Err(e) => failure_result(&e),
/// }
/// ```
pub fn failure_result<E: ToolFailure + ?Sized>(failure: &E) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(&failure.to_body())
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::error(vec![Content::text(json)]))
}

/// Convert a domain result into a tool result
///
/// `Ok` values become JSON successes, `Err` values become typed failures.
pub fn tool_result<T, E>(result: Result<T, E>) -> Result<CallToolResult, McpError>
where
    T: Serialize,
    E: ToolFailure,
{
    match result {
        Ok(data) => json_success(&data),
        Err(failure) => {
            tracing::debug!(kind = failure.kind(), "tool failure: {}", failure);
            failure_result(&failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolErrorBody;
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[derive(Debug)]
    struct NotReady;

    impl std::fmt::Display for NotReady {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "catalog is still loading")
        }
    }

    impl ToolFailure for NotReady {
        fn kind(&self) -> &'static str {
            "catalog_not_ready"
        }

        fn retryable(&self) -> bool {
            true
        }
    }

    fn first_text(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_json_success() {
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };
        let result = json_success(&data).unwrap();
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result.content.len(), 1);
    }

    #[test]
    fn test_failure_result_carries_body() {
        let result = failure_result(&NotReady).unwrap();
        assert!(result.is_error.unwrap_or(false));

        let body: ToolErrorBody = serde_json::from_str(&first_text(&result)).unwrap();
        assert_eq!(body.error, "catalog_not_ready");
        assert!(body.retryable);
    }

    #[test]
    fn test_tool_result_dispatch() {
        let ok: Result<u32, NotReady> = Ok(7);
        assert!(!tool_result(ok).unwrap().is_error.unwrap_or(false));

        let err: Result<u32, NotReady> = Err(NotReady);
        assert!(tool_result(err).unwrap().is_error.unwrap_or(false));
    }
}
