//! MCP handler integration tests
//!
//! Drives ProtocolHandlers directly with JSON-RPC requests against
//! mock backends.

use std::fs;
use tempfile::TempDir;

use semdex::mcp::handlers::ProtocolHandlers;
use semdex::mcp::protocol::*;
use serde_json::{json, Value};

use crate::common::create_test_services;

fn request(id: i64, method: &str, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(id)),
        method: method.to_string(),
        params,
    }
}

fn tool_call(id: i64, name: &str, arguments: Value) -> JsonRpcRequest {
    request(
        id,
        "tools/call",
        Some(json!({ "name": name, "arguments": arguments })),
    )
}

fn result_text(response: &JsonRpcResponse) -> String {
    response.result.as_ref().unwrap()["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

fn handlers_with_fixture() -> (TempDir, ProtocolHandlers) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("alpha.txt"), "alpha document content").unwrap();
    fs::write(dir.path().join("beta.txt"), "beta document content").unwrap();

    let services = create_test_services(dir.path());
    (dir, ProtocolHandlers::new(services))
}

#[tokio::test]
async fn test_initialize_advertises_server() {
    let (_dir, handlers) = handlers_with_fixture();

    let response = handlers
        .handle_initialize(request(1, "initialize", Some(json!({}))))
        .await
        .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "semdex-mcp");
    assert!(response.error.is_none());
}

#[tokio::test]
async fn test_tools_list_contains_all_five_tools() {
    let (_dir, handlers) = handlers_with_fixture();

    let response = handlers
        .handle_tools_list(request(2, "tools/list", None))
        .await
        .unwrap();

    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 5);

    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in [
        "index_documents",
        "query_documents",
        "remove_document",
        "remove_all_documents",
        "list_documents",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }

    for tool in &tools {
        assert!(tool["inputSchema"]["type"] == "object");
        assert!(!tool["description"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_index_then_query_through_tools() {
    let (_dir, handlers) = handlers_with_fixture();

    let response = handlers
        .handle_tools_call(tool_call(3, "index_documents", json!({"path": "."})))
        .await
        .unwrap();
    assert!(response.error.is_none());
    assert!(result_text(&response).starts_with("Successfully indexed ."));

    let response = handlers
        .handle_tools_call(tool_call(
            4,
            "query_documents",
            json!({"query": "alpha document content", "k": 1}),
        ))
        .await
        .unwrap();
    let text = result_text(&response);
    assert!(text.contains("[DOCUMENT:alpha_txt_chunk1]"));
    assert!(text.contains("alpha document content"));
}

#[tokio::test]
async fn test_index_missing_path_maps_to_tool_error() {
    let (_dir, handlers) = handlers_with_fixture();

    let response = handlers
        .handle_tools_call(tool_call(5, "index_documents", json!({"path": "missing"})))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, PATH_NOT_FOUND);
    assert!(error.message.contains("missing"));
}

#[tokio::test]
async fn test_query_before_indexing_reports_no_results() {
    let (_dir, handlers) = handlers_with_fixture();

    let response = handlers
        .handle_tools_call(tool_call(6, "query_documents", json!({"query": "anything"})))
        .await
        .unwrap();

    assert_eq!(
        result_text(&response),
        "No relevant documents found in the index."
    );
}

#[tokio::test]
async fn test_query_rejects_blank_and_bad_filter() {
    let (_dir, handlers) = handlers_with_fixture();

    let response = handlers
        .handle_tools_call(tool_call(7, "query_documents", json!({"query": "  "})))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);

    let response = handlers
        .handle_tools_call(tool_call(
            8,
            "query_documents",
            json!({"query": "x", "filter": {"contentType": {"$eq": "code"}}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
}

#[tokio::test]
async fn test_remove_all_requires_confirm_flag() {
    let (_dir, handlers) = handlers_with_fixture();

    handlers
        .handle_tools_call(tool_call(9, "index_documents", json!({"path": "."})))
        .await
        .unwrap();

    // Missing confirm
    let response = handlers
        .handle_tools_call(tool_call(10, "remove_all_documents", json!({})))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);

    // Explicit false
    let response = handlers
        .handle_tools_call(tool_call(
            11,
            "remove_all_documents",
            json!({"confirm": false}),
        ))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);

    // Confirmed
    let response = handlers
        .handle_tools_call(tool_call(
            12,
            "remove_all_documents",
            json!({"confirm": true}),
        ))
        .await
        .unwrap();
    assert!(result_text(&response).contains("2 records deleted"));
}

#[tokio::test]
async fn test_remove_document_and_list() {
    let (_dir, handlers) = handlers_with_fixture();

    handlers
        .handle_tools_call(tool_call(13, "index_documents", json!({"path": "."})))
        .await
        .unwrap();

    let response = handlers
        .handle_tools_call(tool_call(
            14,
            "remove_document",
            json!({"path": "alpha.txt"}),
        ))
        .await
        .unwrap();
    assert_eq!(
        result_text(&response),
        "Successfully removed document: alpha.txt"
    );

    let response = handlers
        .handle_tools_call(tool_call(15, "list_documents", json!({})))
        .await
        .unwrap();
    let text = result_text(&response);
    assert!(text.starts_with("Found 1 unique document paths in the index:"));
    assert!(text.contains("- beta.txt"));
    assert!(!text.contains("alpha.txt"));
}

#[tokio::test]
async fn test_list_documents_empty_index() {
    let (_dir, handlers) = handlers_with_fixture();

    let response = handlers
        .handle_tools_call(tool_call(16, "list_documents", json!({})))
        .await
        .unwrap();
    assert_eq!(result_text(&response), "No documents found in the index.");
}

#[tokio::test]
async fn test_unknown_tool_rejected() {
    let (_dir, handlers) = handlers_with_fixture();

    let response = handlers
        .handle_tools_call(tool_call(17, "unknown_tool", json!({})))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, INVALID_REQUEST);
    assert!(error.message.contains("unknown_tool"));
}

#[tokio::test]
async fn test_ping_returns_empty_object() {
    let (_dir, handlers) = handlers_with_fixture();

    let response = handlers
        .handle_ping(request(18, "ping", None))
        .await
        .unwrap();
    assert_eq!(response.result.unwrap(), json!({}));
}
