/// Protocol-level behaviour of the stdio server
use std::sync::Arc;

use mort_mcp::mcp::protocol::{MCP_VERSION, SERVER_NAME};
use mort_mcp::ServerConfig;
use serde_json::json;

use crate::support::{run_bytes, run_lines, run_lines_with, FakeGateway};

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_or_wrong_protocol_marker_is_dropped() {
        let out = run_lines(
            Arc::new(FakeGateway::default()),
            &[
                r#"{"id":1,"method":"initialize"}"#,
                r#"{"jsonrpc":"1.0","id":2,"method":"initialize"}"#,
                r#"{"jsonrpc":2.0,"id":3,"method":"tools/list"}"#,
                r#"[{"jsonrpc":"2.0","id":4,"method":"tools/list"}]"#,
            ],
        )
        .await;

        assert!(out.is_empty(), "unexpected output: {:?}", out);
    }

    #[tokio::test]
    async fn test_each_request_with_id_gets_exactly_one_matching_response() {
        let out = run_lines(
            Arc::new(FakeGateway::default()),
            &[
                r#"{"jsonrpc":"2.0","id":"abc","method":"initialize","params":{}}"#,
                r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#,
                r#"{"jsonrpc":"2.0","id":8,"method":"resources/list"}"#,
                r#"{"jsonrpc":"2.0","id":9.5,"method":"tools/call","params":{"name":"stripe_list_products"}}"#,
            ],
        )
        .await;

        let ids: Vec<_> = out.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!("abc"), json!(7), json!(8), json!(9.5)]);
        for response in &out {
            assert_eq!(response["jsonrpc"], "2.0");
        }
    }

    #[tokio::test]
    async fn test_initialized_notification_never_answers() {
        let out = run_lines(
            Arc::new(FakeGateway::default()),
            &[
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
                r#"{"jsonrpc":"2.0","id":11,"method":"notifications/initialized"}"#,
            ],
        )
        .await;

        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_requests_without_id_produce_no_output() {
        let out = run_lines(
            Arc::new(FakeGateway::default()),
            &[
                r#"{"jsonrpc":"2.0","method":"initialize"}"#,
                r#"{"jsonrpc":"2.0","id":null,"method":"no/such/method"}"#,
                r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"missing_tool"}}"#,
            ],
        )
        .await;

        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_reports_identity_and_capabilities() {
        let out = run_lines(
            Arc::new(FakeGateway::default()),
            &[r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#],
        )
        .await;

        let result = &out[0]["result"];
        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["serverInfo"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_non_json_line_yields_parse_error_with_null_id() {
        let out = run_lines(Arc::new(FakeGateway::default()), &["this is not json"]).await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["jsonrpc"], "2.0");
        assert!(out[0]["id"].is_null());
        assert_eq!(out[0]["error"]["code"], -32700);
        assert!(out[0].get("result").is_none());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_parse_error_and_server_keeps_going() {
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"initialize"}"#);
        input.push(b'\n');

        let out = run_bytes(Arc::new(FakeGateway::default()), ServerConfig::default(), &input).await;

        assert_eq!(out.len(), 2);
        assert!(out[0]["id"].is_null());
        assert_eq!(out[0]["error"]["code"], -32700);
        assert_eq!(out[1]["id"], 2);
        assert!(out[1].get("result").is_some());
    }

    #[tokio::test]
    async fn test_blank_malformed_and_valid_lines_in_order() {
        let out = run_lines(
            Arc::new(FakeGateway::default()),
            &["", "{malformed", r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#],
        )
        .await;

        assert_eq!(out.len(), 2);
        assert!(out[0]["id"].is_null());
        assert_eq!(out[0]["error"]["code"], -32700);
        assert_eq!(out[1]["id"], 1);
        assert!(out[1].get("result").is_some());
    }

    #[tokio::test]
    async fn test_unknown_method_is_method_not_found() {
        let out = run_lines(
            Arc::new(FakeGateway::default()),
            &[r#"{"jsonrpc":"2.0","id":3,"method":"shutdown"}"#],
        )
        .await;

        assert_eq!(out[0]["error"]["code"], -32601);
        assert_eq!(out[0]["error"]["message"], "Method not found: shutdown");
    }

    #[tokio::test]
    async fn test_non_string_method_is_invalid_request() {
        let out = run_lines(
            Arc::new(FakeGateway::default()),
            &[r#"{"jsonrpc":"2.0","id":4,"method":42}"#],
        )
        .await;

        assert_eq!(out[0]["id"], 4);
        assert_eq!(out[0]["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_over_long_line_is_rejected_and_server_keeps_going() {
        let config = ServerConfig {
            max_line_bytes: 64,
            ..ServerConfig::default()
        };
        let long_line = format!(
            r#"{{"jsonrpc":"2.0","id":1,"method":"initialize","params":{{"pad":"{}"}}}}"#,
            "x".repeat(200)
        );

        let out = run_lines_with(
            Arc::new(FakeGateway::default()),
            config,
            &[&long_line, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#],
        )
        .await;

        assert_eq!(out.len(), 2);
        assert!(out[0]["id"].is_null());
        assert_eq!(out[0]["error"]["code"], -32600);
        assert_eq!(out[1]["id"], 2);
    }

    #[tokio::test]
    async fn test_tools_list_enumerates_catalogue_in_order() {
        let out = run_lines(
            Arc::new(FakeGateway::default()),
            &[r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#],
        )
        .await;

        let names: Vec<&str> = out[0]["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();

        assert_eq!(
            names,
            vec![
                "stripe_create_customer",
                "stripe_create_product",
                "stripe_create_price",
                "stripe_create_payment_link",
                "stripe_list_customers",
                "stripe_list_products",
                "stripe_list_prices",
            ]
        );

        for tool in out[0]["result"]["tools"].as_array().unwrap() {
            assert_eq!(tool["inputSchema"]["type"], "object");
            assert!(tool["description"].as_str().map_or(false, |d| !d.is_empty()));
        }
    }
}
