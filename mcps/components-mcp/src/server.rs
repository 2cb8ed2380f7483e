//! MCP Server implementation for the component reference index

use std::sync::Arc;
use std::time::{Duration, Instant};

use mcp_common::{
    async_trait, tool_result, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError,
    ResultExt,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{ComponentsConfig, ConfigError};
use crate::engine::QueryEngine;
use crate::error::LoadError;
use crate::handle::CatalogHandle;
use crate::loader::CorpusLoader;
use crate::params::{
    CatalogStatusParams, GetComponentByPathParams, GetComponentParams, ListComponentsParams,
    SearchComponentsParams,
};
use crate::types::ReloadSummary;
use crate::watcher::CorpusWatcher;

const INSTRUCTIONS: &str = "Frontend component reference index - look up ready-made UI \
    snippets from HyperUI, DaisyUI, FlyonUI and HeadlessUI. Components are addressed as \
    framework/category/component_type/variant. Use list_frameworks and list_components to \
    browse, search_components to find snippets by keyword, and get_component or \
    get_component_by_path to fetch the content.";

/// The main components MCP server
#[derive(Clone)]
pub struct ComponentsMcpServer {
    config: Arc<ComponentsConfig>,
    loader: Arc<CorpusLoader>,
    engine: QueryEngine,
    shutdown: CancellationToken,
    watcher: Arc<parking_lot::Mutex<Option<CorpusWatcher>>>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl ComponentsMcpServer {
    /// Create a server in the `Loading` state; nothing is read yet
    pub fn new(config: ComponentsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let loader = config.loader()?;
        let engine =
            QueryEngine::new(Arc::new(CatalogHandle::new())).with_page_size(config.page_size);

        Ok(Self {
            config: Arc::new(config),
            loader: Arc::new(loader),
            engine,
            shutdown: CancellationToken::new(),
            watcher: Arc::new(parking_lot::Mutex::new(None)),
            tool_router: Self::tool_router(),
        })
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn config(&self) -> &ComponentsConfig {
        &self.config
    }

    /// Fail fast when the corpus root cannot be read
    pub fn probe(&self) -> Result<(), LoadError> {
        self.loader.probe()
    }

    /// Load the corpus on the blocking pool and install the new snapshot
    pub async fn load_now(&self) -> Result<Result<ReloadSummary, LoadError>, McpError> {
        let handle = Arc::clone(self.engine.handle());
        let loader = Arc::clone(&self.loader);
        tokio::task::spawn_blocking(move || handle.reload(&loader))
            .await
            .map_err(|e| format!("Reload task failed: {}", e))
            .to_mcp_err()
    }

    /// Run the first load in the background; queries answer
    /// `catalog_not_ready` until it completes
    ///
    /// The handle resolves to the load error when the corpus could not be
    /// read, so the caller can stop serving.
    pub fn spawn_initial_load(&self) -> JoinHandle<Result<(), LoadError>> {
        let server = self.clone();
        tokio::spawn(async move {
            match server.load_now().await {
                Ok(Ok(summary)) => {
                    tracing::info!(
                        generation = summary.generation,
                        frameworks = summary.framework_count,
                        components = summary.component_count,
                        warnings = summary.warning_count,
                        "Catalog ready"
                    );
                    Ok(())
                }
                Ok(Err(e)) => {
                    tracing::error!("Initial corpus load failed: {}", e);
                    Err(e)
                }
                Err(e) => {
                    tracing::error!("Initial corpus load failed: {}", e.message);
                    Ok(())
                }
            }
        })
    }

    /// Start reloading on filesystem changes under the corpus root
    pub fn watch(&self) -> notify::Result<()> {
        let watcher = CorpusWatcher::spawn(
            Arc::clone(self.engine.handle()),
            Arc::clone(&self.loader),
            self.config.watch_debounce(),
            self.shutdown.child_token(),
        )?;
        *self.watcher.lock() = Some(watcher);
        Ok(())
    }

    /// Cancel running searches and stop the watcher
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        self.watcher.lock().take();
    }

    #[tool(
        description = "List the available component frameworks with their path scheme, component count and categories"
    )]
    async fn list_frameworks(&self) -> Result<CallToolResult, McpError> {
        tool_result(self.engine.list_frameworks())
    }

    #[tool(
        description = "List the components of one framework, optionally restricted to a category. Returns descriptors without content."
    )]
    async fn list_components(
        &self,
        Parameters(params): Parameters<ListComponentsParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            self.engine
                .list_components(&params.framework, params.category.as_deref()),
        )
    }

    #[tool(description = "Get one component, including its content, by framework, category, component type and variant")]
    async fn get_component(
        &self,
        Parameters(params): Parameters<GetComponentParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.engine.get_component(
            &params.framework,
            &params.category,
            &params.component_type,
            &params.variant,
        ))
    }

    #[tool(
        description = "Get one component, including its content, by its path framework/category/component_type/variant"
    )]
    async fn get_component_by_path(
        &self,
        Parameters(params): Parameters<GetComponentByPathParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.engine.get_component_by_path(&params.path))
    }

    #[tool(
        description = "Search components by keywords. Every keyword must match the component path or content. Results are ranked by path matches, then shorter path."
    )]
    async fn search_components(
        &self,
        Parameters(params): Parameters<SearchComponentsParams>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.to_request();
        let timeout = params
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.config.search_timeout());
        let deadline = Instant::now() + timeout;

        // Cancelled when this future is dropped, so an abandoned request
        // stops its worker too
        let cancel = self.shutdown.child_token();
        let _abandon = cancel.clone().drop_guard();

        let engine = self.engine.clone();
        let result = tokio::task::spawn_blocking(move || {
            engine.search_components(&request, cancel, Some(deadline))
        })
        .await
        .map_err(|e| format!("Search task failed: {}", e))
        .to_mcp_err()?;

        if let Err(e) = &result {
            tracing::debug!(query = %params.query, "Search failed: {}", e);
        }
        tool_result(result)
    }

    #[tool(
        description = "Get catalog health: loading or ready, snapshot generation, counts and per-file load warnings"
    )]
    async fn catalog_status(
        &self,
        Parameters(params): Parameters<CatalogStatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut status = self.engine.status();
        if !params.include_warnings.unwrap_or(true) {
            status.warnings.clear();
        }
        mcp_common::json_success(&status)
    }

    #[tool(
        description = "Reload the corpus from disk and atomically replace the catalog. In-flight queries finish on the previous snapshot."
    )]
    async fn reload_catalog(&self) -> Result<CallToolResult, McpError> {
        tool_result(self.load_now().await?)
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for ComponentsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for ComponentsMcpServer {
    fn server_name(&self) -> &str {
        "components"
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "list_frameworks" => self.list_frameworks().await.map_err(Into::into),

            "list_components" => {
                let params: ListComponentsParams = serde_json::from_value(params)?;
                self.list_components(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "get_component" => {
                let params: GetComponentParams = serde_json::from_value(params)?;
                self.get_component(Parameters(params)).await.map_err(Into::into)
            }

            "get_component_by_path" => {
                let params: GetComponentByPathParams = serde_json::from_value(params)?;
                self.get_component_by_path(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "search_components" => {
                let params: SearchComponentsParams = serde_json::from_value(params)?;
                self.search_components(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "catalog_status" => {
                let params: CatalogStatusParams = if params.is_null() {
                    CatalogStatusParams::default()
                } else {
                    serde_json::from_value(params)?
                };
                self.catalog_status(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "reload_catalog" => self.reload_catalog().await.map_err(Into::into),

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
