//! MCP protocol unit tests

#[cfg(test)]
mod tests {
    use semdex::mcp::protocol::*;
    use serde_json::json;

    #[test]
    fn test_parse_initialize_request() {
        let json = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}},
                "clientInfo": {
                    "name": "test",
                    "version": "1.0"
                }
            }
        }"#;

        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.method, "initialize");
        assert_eq!(req.jsonrpc, "2.0");
        assert!(req.id.is_some());
        assert!(req.params.is_some());
    }

    #[test]
    fn test_parse_tools_call_request() {
        let json = r#"{
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {
                "name": "query_documents",
                "arguments": {"query": "zebra", "k": 5}
            }
        }"#;

        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        let params: ToolCallParams = serde_json::from_value(req.params.unwrap()).unwrap();
        assert_eq!(params.name, "query_documents");
        assert_eq!(params.arguments["k"], 5);
    }

    #[test]
    fn test_tool_call_params_default_arguments() {
        let params: ToolCallParams =
            serde_json::from_value(json!({"name": "list_documents"})).unwrap();
        assert!(params.arguments.is_null());
    }

    #[test]
    fn test_serialize_initialize_response() {
        let response = InitializeResult {
            protocol_version: "2024-11-05".to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "semdex-mcp".to_string(),
                version: "0.3.2".to_string(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["protocolVersion"], "2024-11-05");
        assert_eq!(json["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(json["serverInfo"]["name"], "semdex-mcp");
    }

    #[test]
    fn test_success_response_omits_error() {
        let response = JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(7)),
            result: Some(json!({"ok": true})),
            error: None,
        };

        let serialized = serde_json::to_string(&response).unwrap();
        assert!(serialized.contains("\"result\""));
        assert!(!serialized.contains("\"error\""));
    }

    #[test]
    fn test_error_response_shape() {
        let response = JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(8)),
            result: None,
            error: Some(JsonRpcError {
                code: PATH_NOT_FOUND,
                message: "Path not found: docs".to_string(),
                data: None,
            }),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], -32001);
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_tool_result_content_block() {
        let result = ToolResult {
            content: vec![ContentBlock::Text {
                text: "Found 2 unique document paths".to_string(),
            }],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert!(json["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Found 2"));
    }

    #[test]
    fn test_error_code_values() {
        assert_eq!(PARSE_ERROR, -32700);
        assert_eq!(INVALID_REQUEST, -32600);
        assert_eq!(METHOD_NOT_FOUND, -32601);
        assert_eq!(INVALID_PARAMS, -32602);
        assert_eq!(INTERNAL_ERROR, -32603);
        assert_eq!(PATH_NOT_FOUND, -32001);
        assert_eq!(EMPTY_DIRECTORY, -32002);
    }
}
