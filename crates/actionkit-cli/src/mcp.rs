//! MCP (Model Context Protocol) server implementation

use actionkit::{Error, Tool, ToolOutput, Toolbox};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// MCP protocol revision spoken by this server
const PROTOCOL_VERSION: &str = "2025-06-18";

/// Server name reported in `initialize`
const SERVER_NAME: &str = "github-actions-utils";

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC 2.0 response
///
/// `id` is always present; it is `null` when the request id could not be read.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// MCP Server implementation
struct McpServer {
    tools: Toolbox,
}

impl McpServer {
    fn new(tools: Toolbox) -> Self {
        Self { tools }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools: Vec<Value> = Tool::ALL
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.input_schema()
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Value, params: Value) -> JsonRpcResponse {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        match self.tools.call(tool_name, arguments).await {
            Ok(output) => JsonRpcResponse::success(id, tool_result(output)),
            Err(e @ (Error::UnknownTool(_) | Error::InvalidArguments(_))) => {
                JsonRpcResponse::error(id, -32602, e.to_string())
            }
            Err(e) => {
                tracing::warn!(tool = tool_name, error = %e, "Tool call failed");
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": format!("Error: {}", e)
                        }],
                        "isError": true
                    }),
                )
            }
        }
    }
}

/// Render a tool output as an MCP `CallToolResult`
fn tool_result(output: ToolOutput) -> Value {
    let mut result = json!({
        "content": [{
            "type": "text",
            "text": output.text
        }],
        "isError": false
    });
    if let Some(structured) = output.structured {
        result["structuredContent"] = structured;
    }
    result
}

/// Serve JSON-RPC lines from `reader`, writing responses to `writer`
///
/// Each request runs on its own task, so responses are written in
/// completion order and a slow fetch does not hold up other calls.
async fn serve<R, W>(server: Arc<McpServer>, reader: R, writer: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let request: JsonRpcRequest = match serde_json::from_str(line) {
                    Ok(req) => req,
                    Err(e) => {
                        let response =
                            JsonRpcResponse::error(Value::Null, -32700, format!("Parse error: {}", e));
                        write_response(writer, &response).await?;
                        continue;
                    }
                };

                // Notifications (no id) are never answered
                if request.id.is_none() {
                    tracing::debug!(method = %request.method, "Ignoring notification");
                    continue;
                }

                let server = Arc::clone(&server);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let response = server.handle_request(request).await;
                    let _ = tx.send(response);
                });
            }
            Some(response) = rx.recv() => {
                write_response(writer, &response).await?;
            }
        }
    }

    // Input closed: flush whatever is still in flight
    drop(tx);
    while let Some(response) = rx.recv().await {
        write_response(writer, &response).await?;
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> std::io::Result<()> {
    let mut json = serde_json::to_string(response).unwrap_or_default();
    json.push('\n');
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await
}

/// Run the MCP server over stdio
pub async fn run_server(tools: Toolbox) {
    let server = Arc::new(McpServer::new(tools));
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting MCP server on stdio");
    if let Err(e) = serve(server, stdin, &mut stdout).await {
        tracing::error!(error = %e, "MCP server stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actionkit::{ActionsService, FetchError, RawFileSource};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::time::Duration;

    /// Serves `action.yml` for `o/r@v1`, a README for `o/r` on main and a
    /// delayed README for `o/slow`
    struct FixtureSource;

    #[async_trait]
    impl RawFileSource for FixtureSource {
        fn name(&self) -> &'static str {
            "fixture"
        }

        async fn fetch_raw_file(
            &self,
            owner: &str,
            repo: &str,
            path_prefix: &str,
            filename: &str,
        ) -> Result<Bytes, FetchError> {
            let path = format!("{}/{}/{}/{}", owner, repo, path_prefix, filename);
            match path.as_str() {
                "o/r/refs/tags/v1/action.yml" => Ok(Bytes::from_static(
                    b"name: Tool\ndescription: Does things\ninputs:\n  a:\n    required: true\n",
                )),
                "o/r/refs/heads/main/README.md" => Ok(Bytes::from_static(b"# Readme")),
                "o/slow/refs/heads/main/README.md" => {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    Ok(Bytes::from_static(b"# Slow"))
                }
                _ => Err(FetchError::NotFound {
                    filename: filename.to_string(),
                    url: format!("fixture://{}", path),
                }),
            }
        }
    }

    fn server() -> McpServer {
        McpServer::new(Toolbox::new(ActionsService::with_source(FixtureSource)))
    }

    fn request(id: i64, method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(id)),
            method: method.to_string(),
            params,
        }
    }

    async fn call(server: &McpServer, method: &str, params: Value) -> Value {
        let response = server.handle_request(request(1, method, params)).await;
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = call(&server(), "initialize", json!({})).await;
        assert_eq!(response["jsonrpc"], "2.0");
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = call(&server(), "tools/list", json!({})).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "get_action_parameters");
        assert!(tools[0]["inputSchema"]["properties"]["actionRef"].is_object());
        assert_eq!(tools[1]["name"], "get_readme");
        assert!(tools[1]["inputSchema"]["properties"]["repoRef"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_get_action_parameters() {
        let response = call(
            &server(),
            "tools/call",
            json!({"name": "get_action_parameters", "arguments": {"actionRef": "o/r@v1"}}),
        )
        .await;

        let result = &response["result"];
        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Action: o/r@v1"));
        assert!(text.contains("Inputs: 1 defined"));
        assert_eq!(result["structuredContent"]["inputs"]["a"]["required"], true);
    }

    #[tokio::test]
    async fn test_tools_call_get_readme() {
        let response = call(
            &server(),
            "tools/call",
            json!({"name": "get_readme", "arguments": {"repoRef": "o/r"}}),
        )
        .await;

        assert_eq!(response["result"]["content"][0]["text"], "# Readme");
        assert!(response["result"].get("structuredContent").is_none());
    }

    #[tokio::test]
    async fn test_tools_call_failure_is_tool_error() {
        let response = call(
            &server(),
            "tools/call",
            json!({"name": "get_action_parameters", "arguments": {"actionRef": "o/r@v2"}}),
        )
        .await;

        let result = &response["result"];
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error: "));
        assert!(text.contains("action.yaml"));
    }

    #[tokio::test]
    async fn test_tools_call_missing_reference() {
        let response = call(
            &server(),
            "tools/call",
            json!({"name": "get_action_parameters", "arguments": {"actionRef": ""}}),
        )
        .await;

        assert_eq!(response["result"]["isError"], true);
        assert_eq!(
            response["result"]["content"][0]["text"],
            "Error: actionRef is required"
        );
    }

    #[tokio::test]
    async fn test_tools_call_protocol_errors() {
        let response = call(&server(), "tools/call", json!({"name": "unknown"})).await;
        assert_eq!(response["error"]["code"], -32602);

        let response = call(
            &server(),
            "tools/call",
            json!({"name": "get_readme", "arguments": {"wrong": 1}}),
        )
        .await;
        assert_eq!(response["error"]["code"], -32602);

        let response = call(&server(), "resources/list", json!({})).await;
        assert_eq!(response["error"]["code"], -32601);
    }

    async fn serve_input(input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve(Arc::new(server()), input.as_bytes(), &mut output)
            .await
            .unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn response_with_id(responses: &[Value], id: i64) -> &Value {
        responses
            .iter()
            .find(|r| r["id"] == id)
            .unwrap_or_else(|| panic!("no response with id {id}"))
    }

    #[tokio::test]
    async fn test_serve_lines() {
        let responses = serve_input(concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\",\"params\":{}}\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
            "\n",
            "not json\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n",
        ))
        .await;

        assert_eq!(responses.len(), 3);
        assert!(response_with_id(&responses, 1)["result"]["serverInfo"].is_object());
        assert!(response_with_id(&responses, 2)["result"].is_object());

        let parse_error = responses
            .iter()
            .find(|r| r.get("error").is_some())
            .unwrap();
        assert_eq!(parse_error["error"]["code"], -32700);
        assert_eq!(parse_error.get("id"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_requests_without_id_get_no_response() {
        let responses = serve_input(concat!(
            "{\"jsonrpc\":\"2.0\",\"method\":\"ping\"}\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"tools/list\"}\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"no/such/method\"}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n",
        ))
        .await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 7);
    }

    #[tokio::test]
    async fn test_slow_call_does_not_block_ping() {
        let responses = serve_input(concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",",
            "\"params\":{\"name\":\"get_readme\",\"arguments\":{\"repoRef\":\"o/slow\"}}}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n",
        ))
        .await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 2);
        assert_eq!(responses[1]["id"], 1);
        assert_eq!(responses[1]["result"]["content"][0]["text"], "# Slow");
    }
}
