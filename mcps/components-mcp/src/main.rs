//! Components MCP - frontend component reference index over stdio
//!
//! The corpus root is checked before serving; an unreadable root exits with
//! status 2. The first load then runs in the background, and queries made
//! before it finishes answer `catalog_not_ready`. If that load finds the
//! corpus gone, the process also exits with status 2.

use std::process::ExitCode;

use components_mcp::{ComponentsConfig, ComponentsMcpServer};
use rmcp::{transport::io::stdio, ServiceExt};

/// Exit status when the corpus cannot be read
const EXIT_CORPUS_UNAVAILABLE: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    mcp_common::init_tracing("components_mcp")?;

    tracing::info!("Starting Components MCP server");

    let config = ComponentsConfig::load()?;
    let server = ComponentsMcpServer::new(config)?;

    if let Err(e) = server.probe() {
        tracing::error!("{}", e);
        return Ok(ExitCode::from(EXIT_CORPUS_UNAVAILABLE));
    }

    let initial_load = server.spawn_initial_load();
    if server.config().watch {
        if let Err(e) = server.watch() {
            tracing::warn!("Corpus watching disabled: {}", e);
        }
    }

    let service = server.clone().serve(stdio()).await?;

    tracing::info!("Components MCP server running");

    tokio::select! {
        res = service.waiting() => {
            res?;
        }
        Ok(Err(e)) = initial_load => {
            tracing::error!("Stopping: {}", e);
            server.shutdown();
            // a pending stdin read would block runtime shutdown
            std::process::exit(i32::from(EXIT_CORPUS_UNAVAILABLE));
        }
    }
    server.shutdown();

    tracing::info!("Components MCP server stopped");

    Ok(ExitCode::SUCCESS)
}
