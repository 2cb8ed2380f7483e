//! Components MCP Library
//!
//! Reference index over a corpus of ready-made UI component snippets
//! (HyperUI, DaisyUI, FlyonUI, HeadlessUI). Every component is addressed as
//! `framework/category/component_type/variant`.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use components_mcp::{ComponentsConfig, ComponentsMcpServer};
//!
//! let server = ComponentsMcpServer::new(ComponentsConfig::for_root("/srv/components"))?;
//! server.load_now().await??;
//! ```
//!
//! # Usage as Binary
//!
//! Run `components-mcp` with `COMPONENTS_CORPUS_DIR` set, or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "components": { "command": "./components-mcp",
//!   "env": { "COMPONENTS_CORPUS_DIR": "/srv/components" } } } }
//! ```
//!
//! The `components` binary answers the same queries from the command line.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod handle;
pub mod loader;
pub mod params;
pub mod scheme;
pub mod server;
pub mod types;
pub mod watcher;

// Re-export main server type
pub use server::ComponentsMcpServer;

pub use catalog::{Catalog, SearchGuard};
pub use config::{ComponentsConfig, ConfigError};
pub use engine::QueryEngine;
pub use error::{LoadError, LoadWarning, QueryError};
pub use handle::CatalogHandle;
pub use loader::CorpusLoader;
pub use scheme::PathScheme;
pub use types::{
    CatalogState, CatalogStatus, ComponentDescriptor, ComponentRecord, FrameworkSummary,
    ReloadSummary, SearchHit, SearchRequest,
};

// Re-export parameter types for direct API usage
pub use params::*;

// Re-export EmbeddableMcp trait for in-process usage
pub use mcp_common::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
