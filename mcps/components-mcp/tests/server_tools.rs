//! Tool-level tests for the components MCP server
//!
//! Calls go through `EmbeddableMcp::call_tool`, the same path an in-process
//! host uses, and check the JSON payloads and typed error bodies.

mod common;

use std::time::Duration;

use common::{Fixture, BADGE_1};
use components_mcp::{ComponentsConfig, ComponentsMcpServer, EmbeddableMcp, LoadError};
use mcp_common::{CallToolResult, ToolErrorBody};
use serde_json::{json, Value};

fn server(fixture: &Fixture) -> ComponentsMcpServer {
    ComponentsMcpServer::new(ComponentsConfig::for_root(fixture.root())).unwrap()
}

async fn ready_server(fixture: &Fixture) -> ComponentsMcpServer {
    let server = server(fixture);
    server.load_now().await.unwrap().unwrap();
    server
}

fn text(result: &CallToolResult) -> String {
    result.content[0]
        .as_text()
        .map(|t| t.text.clone())
        .unwrap_or_default()
}

async fn call_ok(server: &ComponentsMcpServer, tool: &str, params: Value) -> Value {
    let result = server.call_tool(tool, params).await.unwrap();
    assert!(
        !result.is_error.unwrap_or(false),
        "{} failed: {}",
        tool,
        text(&result)
    );
    serde_json::from_str(&text(&result)).unwrap()
}

async fn call_err(server: &ComponentsMcpServer, tool: &str, params: Value) -> ToolErrorBody {
    let result = server.call_tool(tool, params).await.unwrap();
    assert!(result.is_error.unwrap_or(false), "{} should fail", tool);
    serde_json::from_str(&text(&result)).unwrap()
}

#[tokio::test]
async fn test_list_frameworks_tool() {
    let fixture = Fixture::standard();
    let server = ready_server(&fixture).await;

    let frameworks = call_ok(&server, "list_frameworks", json!({})).await;
    let names: Vec<&str> = frameworks
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["daisyui", "flyonui", "headlessui-react", "headlessui-vue", "hyperui"]
    );
    assert_eq!(frameworks[4]["component_count"], 5);
    assert_eq!(frameworks[4]["scheme"], "numbered");
}

#[tokio::test]
async fn test_get_component_tool() {
    let fixture = Fixture::standard();
    let server = ready_server(&fixture).await;

    let badge = call_ok(
        &server,
        "get_component",
        json!({
            "framework": "hyperui",
            "category": "application",
            "component_type": "badges",
            "variant": "1"
        }),
    )
    .await;
    assert_eq!(badge["content"], BADGE_1);
    assert_eq!(badge["path"], "hyperui/application/badges/1");

    let missing = call_err(
        &server,
        "get_component",
        json!({
            "framework": "hyperui",
            "category": "application",
            "component_type": "badges",
            "variant": "99"
        }),
    )
    .await;
    assert_eq!(missing.error, "not_found");
    assert!(!missing.retryable);
}

#[tokio::test]
async fn test_list_components_tool() {
    let fixture = Fixture::standard();
    let server = ready_server(&fixture).await;

    let listing = call_ok(
        &server,
        "list_components",
        json!({ "framework": "flyonui", "category": "plugins" }),
    )
    .await;
    let paths: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec![
            "flyonui/plugins/accordion/index",
            "flyonui/plugins/accordion/types"
        ]
    );
    assert!(listing[0].get("content").is_none());
}

#[tokio::test]
async fn test_search_tool_limit_and_filter() {
    let fixture = Fixture::standard();
    let server = ready_server(&fixture).await;

    let hits = call_ok(
        &server,
        "search_components",
        json!({ "query": "display", "limit": 2 }),
    )
    .await;
    assert_eq!(hits.as_array().unwrap().len(), 2);

    let hits = call_ok(
        &server,
        "search_components",
        json!({ "query": "modal dark", "framework": "hyperui" }),
    )
    .await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["path"], "hyperui/application/modals/1-dark");
    assert_eq!(hits[0]["path_matches"], 2);

    let unknown = call_err(
        &server,
        "search_components",
        json!({ "query": "modal", "framework": "bootstrap" }),
    )
    .await;
    assert_eq!(unknown.error, "unknown_framework");
}

#[tokio::test]
async fn test_zero_timeout_search_is_cancelled() {
    let fixture = Fixture::standard();
    let server = ready_server(&fixture).await;

    let body = call_err(
        &server,
        "search_components",
        json!({ "query": "modal", "timeout_ms": 0 }),
    )
    .await;
    assert_eq!(body.error, "cancelled");
    assert!(body.retryable);
}

#[tokio::test]
async fn test_status_reports_warnings() {
    let fixture = Fixture::standard();
    fixture.write("hyperui/application/badges/2.html", &[0xc3, 0x28]);
    let server = ready_server(&fixture).await;

    let status = call_ok(&server, "catalog_status", json!({})).await;
    assert_eq!(status["state"], "ready");
    assert_eq!(status["generation"], 1);
    assert_eq!(status["component_count"], common::standard_count());
    assert_eq!(status["warnings"].as_array().unwrap().len(), 1);
    assert_eq!(
        status["warnings"][0]["source"],
        "hyperui/application/badges/2.html"
    );

    let quiet = call_ok(&server, "catalog_status", json!({ "include_warnings": false })).await;
    assert!(quiet["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reload_tool_picks_up_new_files() {
    let fixture = Fixture::standard();
    let server = ready_server(&fixture).await;

    fixture.write("daisyui/card.css", b".card { display: flex; }");
    let summary = call_ok(&server, "reload_catalog", json!({})).await;
    assert_eq!(summary["generation"], 2);
    assert_eq!(summary["previous_generation"], 1);
    assert_eq!(summary["component_count"], common::standard_count() + 1);

    let card = call_ok(
        &server,
        "get_component_by_path",
        json!({ "path": "daisyui/all/components/card" }),
    )
    .await;
    assert_eq!(card["content"], ".card { display: flex; }");
}

#[tokio::test]
async fn test_reload_of_vanished_corpus_keeps_catalog() {
    let fixture = Fixture::standard();
    let server = ComponentsMcpServer::new(ComponentsConfig::for_root(fixture.path("corpus")))
        .unwrap();
    assert!(server.probe().is_err());

    let body = call_err(&server, "reload_catalog", json!({})).await;
    assert_eq!(body.error, "corpus_unavailable");
    assert!(body.retryable);

    let body = call_err(&server, "list_frameworks", json!({})).await;
    assert_eq!(body.error, "catalog_not_ready");
}

#[tokio::test]
async fn test_background_initial_load() {
    let fixture = Fixture::standard();
    let server = server(&fixture);

    server.spawn_initial_load().await.unwrap().unwrap();

    let status = call_ok(&server, "catalog_status", json!({})).await;
    assert_eq!(status["state"], "ready");
    let frameworks = call_ok(&server, "list_frameworks", json!({})).await;
    assert_eq!(frameworks.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_initial_load_reports_vanished_corpus() {
    let fixture = Fixture::standard();
    let server = server(&fixture);
    server.probe().unwrap();

    std::fs::remove_dir_all(fixture.root()).unwrap();
    let err = server.spawn_initial_load().await.unwrap().unwrap_err();
    assert!(matches!(err, LoadError::CorpusUnavailable { .. }));

    let body = call_err(&server, "list_frameworks", json!({})).await;
    assert_eq!(body.error, "catalog_not_ready");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_searches_during_reloads() {
    let fixture = Fixture::standard();
    let server = ready_server(&fixture).await;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let server = server.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..20 {
                let hits = call_ok(&server, "search_components", json!({ "query": "dialog" })).await;
                assert_eq!(hits.as_array().unwrap().len(), 3);
            }
        }));
    }
    for _ in 0..10 {
        call_ok(&server, "reload_catalog", json!({})).await;
    }
    for task in tasks {
        task.await.unwrap();
    }

    let status = call_ok(&server, "catalog_status", json!({})).await;
    assert_eq!(status["generation"], 11);
}

#[tokio::test]
async fn test_watcher_reloads_on_change() {
    let fixture = Fixture::standard();
    let mut config = ComponentsConfig::for_root(fixture.root());
    config.watch_debounce_ms = 50;
    let server = ComponentsMcpServer::new(config).unwrap();
    server.load_now().await.unwrap().unwrap();
    server.watch().unwrap();

    fixture.write("daisyui/card.css", b".card { display: flex; }");

    let mut found = false;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if server
            .engine()
            .get_component_by_path("daisyui/all/components/card")
            .is_ok()
        {
            found = true;
            break;
        }
    }
    server.shutdown();
    assert!(found, "watcher did not reload the catalog");
}
