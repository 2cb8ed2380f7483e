//! Tool parameter types for components-mcp

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::SearchRequest;

/// Parameters for listing the components of a framework
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct ListComponentsParams {
    /// Framework name (e.g., "hyperui", "daisyui", "flyonui")
    pub framework: String,
    /// Restrict to one category (e.g., "application", "marketing")
    #[serde(default)]
    pub category: Option<String>,
}

/// Parameters for fetching one component by its fields
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetComponentParams {
    pub framework: String,
    pub category: String,
    /// Component type (e.g., "modals", "badges", or "components" for flat frameworks)
    pub component_type: String,
    /// Variant name (e.g., "1", "1-dark", "modal")
    pub variant: String,
}

/// Parameters for fetching one component by path
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetComponentByPathParams {
    /// Four-segment path: framework/category/component_type/variant
    pub path: String,
}

/// Parameters for keyword search
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct SearchComponentsParams {
    /// Keywords; every keyword must match the path or content
    pub query: String,
    /// Restrict results to one framework
    #[serde(default)]
    pub framework: Option<String>,
    /// Maximum number of results (capped by the server page size)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Include component content in each result (default: false)
    #[serde(default)]
    pub include_content: bool,
    /// Time budget in milliseconds, overriding the server default
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl SearchComponentsParams {
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            framework: self.framework.clone(),
            limit: self.limit,
            include_content: self.include_content,
        }
    }
}

/// Parameters for the catalog status tool
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct CatalogStatusParams {
    /// Include per-file load warnings (default: true)
    #[serde(default)]
    pub include_warnings: Option<bool>,
}
