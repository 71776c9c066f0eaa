//! End-to-end tests for the WebSocket transport.

#![cfg(feature = "websocket")]

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use score_mcp_server::core::transport::websocket::WebSocketTransport;
use score_mcp_server::core::transport::{TransportResult, WebSocketConfig};
use score_mcp_server::core::{Config, McpServer};
use score_mcp_server::domains::tools::{Param, Tool, ToolError, ToolRegistry};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct TestServer {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<TransportResult<()>>,
}

fn registry_with_test_tools() -> ToolRegistry {
    let mut registry = ToolRegistry::with_builtin_tools(None).unwrap();
    registry
        .register(Tool::from_async_fn("slow", "Sleeps for a while", [], |_| async {
            tokio::time::sleep(Duration::from_millis(600)).await;
            Ok(json!("finally"))
        }))
        .unwrap();
    registry
        .register(Tool::from_async_fn(
            "delayed_echo",
            "Echoes its value after a short pause",
            [Param::new("value")],
            |args| async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                args.get("value")
                    .cloned()
                    .ok_or_else(|| ToolError::invalid_arguments("value"))
            },
        ))
        .unwrap();
    registry
}

async fn start(keepalive_interval_secs: u64, keepalive_timeout_secs: u64) -> TestServer {
    let config = WebSocketConfig {
        port: 0,
        host: "127.0.0.1".into(),
        keepalive_interval_secs,
        keepalive_timeout_secs,
        ..Default::default()
    };
    let server = McpServer::new(&Config::default(), registry_with_test_tools());
    let transport = WebSocketTransport::bind(config).await.unwrap();
    let addr = transport.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(transport.run_until(server, async move {
        let _ = stopped.await;
    }));
    TestServer { addr, stop, handle }
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _response) = connect_async(format!("ws://{addr}/")).await.unwrap();
    client
}

async fn send(client: &mut Client, request: Value) {
    client
        .send(Message::Text(request.to_string().into()))
        .await
        .unwrap();
}

/// Next text frame as JSON, skipping control frames.
async fn recv(client: &mut Client) -> Value {
    loop {
        let message = client.next().await.unwrap().unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn call(client: &mut Client, request: Value) -> Value {
    send(client, request).await;
    recv(client).await
}

#[tokio::test]
async fn test_initialize_over_websocket() {
    let server = start(0, 10).await;
    let mut client = connect(server.addr).await;

    let reply = call(&mut client, json!({"id": 1, "method": "initialize", "params": {}})).await;
    assert_eq!(reply["jsonrpc"], "2.0");
    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(reply["result"]["serverInfo"]["name"], "mcp_server");
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_usable() {
    let server = start(0, 10).await;
    let mut client = connect(server.addr).await;

    client
        .send(Message::Text("{\"id\": 1, \"method\"".to_string().into()))
        .await
        .unwrap();
    let reply = recv(&mut client).await;
    assert_eq!(reply["id"], Value::Null);
    assert_eq!(reply["error"]["code"], -32700);

    let reply = call(&mut client, json!({"id": 2, "method": "tools/list"})).await;
    assert_eq!(reply["id"], 2);
    assert_eq!(reply["result"]["tools"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_unknown_tool_then_known_tool() {
    let server = start(0, 10).await;
    let mut client = connect(server.addr).await;

    let reply = call(
        &mut client,
        json!({"id": 3, "method": "tools/call", "params": {"name": "nope", "arguments": {}}}),
    )
    .await;
    assert_eq!(reply["error"]["code"], -32601);
    assert_eq!(reply["error"]["message"], "Tool not found: nope");

    let reply = call(
        &mut client,
        json!({"id": 4, "method": "tools/call", "params": {"name": "health_check"}}),
    )
    .await;
    assert_eq!(reply["id"], 4);
    assert_eq!(reply["result"]["isError"], false);
}

#[tokio::test]
async fn test_binary_frame_is_dispatched() {
    let server = start(0, 10).await;
    let mut client = connect(server.addr).await;

    let body = json!({"id": "bin", "method": "initialize"}).to_string();
    client
        .send(Message::Binary(body.into_bytes().into()))
        .await
        .unwrap();
    let reply = recv(&mut client).await;
    assert_eq!(reply["id"], "bin");
    assert!(reply["result"].is_object());
}

#[tokio::test]
async fn test_replies_follow_request_order() {
    let server = start(0, 10).await;
    let mut client = connect(server.addr).await;

    send(
        &mut client,
        json!({"id": 1, "method": "tools/call", "params": {"name": "slow"}}),
    )
    .await;
    send(&mut client, json!({"id": 2, "method": "initialize"})).await;

    let first = recv(&mut client).await;
    let second = recv(&mut client).await;
    assert_eq!(first["id"], 1);
    assert_eq!(first["result"]["content"][0]["text"], "finally");
    assert_eq!(second["id"], 2);
}

#[tokio::test]
async fn test_slow_call_does_not_block_other_connections() {
    let server = start(0, 10).await;
    let mut busy = connect(server.addr).await;
    let mut idle = connect(server.addr).await;

    send(
        &mut busy,
        json!({"id": 1, "method": "tools/call", "params": {"name": "slow"}}),
    )
    .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let reply = tokio::time::timeout(
        Duration::from_millis(300),
        call(&mut idle, json!({"id": 9, "method": "initialize"})),
    )
    .await
    .expect("initialize on an idle connection should not wait for another connection");
    assert_eq!(reply["id"], 9);

    let reply = recv(&mut busy).await;
    assert_eq!(reply["id"], 1);
}

#[tokio::test]
async fn test_concurrent_tool_calls_get_their_own_results() {
    let server = start(0, 10).await;
    let mut left = connect(server.addr).await;
    let mut right = connect(server.addr).await;

    let (echo, prediction) = tokio::join!(
        call(
            &mut left,
            json!({"id": "L", "method": "tools/call",
                   "params": {"name": "delayed_echo", "arguments": {"value": "left"}}}),
        ),
        call(
            &mut right,
            json!({"id": "R", "method": "tools/call",
                   "params": {"name": "predict_score", "arguments": {"price": 19.99}}}),
        ),
    );

    assert_eq!(echo["id"], "L");
    assert_eq!(echo["result"]["isError"], false);
    assert_eq!(echo["result"]["content"][0]["text"], "left");

    assert_eq!(prediction["id"], "R");
    let text = prediction["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["input_parameters"]["price"], 19.99);

    let (a, b) = tokio::join!(
        call(
            &mut left,
            json!({"id": 1, "method": "tools/call",
                   "params": {"name": "delayed_echo", "arguments": {"value": "from left"}}}),
        ),
        call(
            &mut right,
            json!({"id": 2, "method": "tools/call",
                   "params": {"name": "delayed_echo", "arguments": {"value": "from right"}}}),
        ),
    );
    assert_eq!(a["id"], 1);
    assert_eq!(a["result"]["content"][0]["text"], "from left");
    assert_eq!(b["id"], 2);
    assert_eq!(b["result"]["content"][0]["text"], "from right");
}

#[tokio::test]
async fn test_shutdown_closes_connections_and_returns() {
    let server = start(0, 10).await;
    let mut client = connect(server.addr).await;
    let reply = call(&mut client, json!({"id": 1, "method": "initialize"})).await;
    assert_eq!(reply["id"], 1);

    server.stop.send(()).unwrap();

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(frame) = client.next().await {
            if let Ok(Message::Close(frame)) = frame {
                return frame.map(|f| f.code);
            }
        }
        None
    })
    .await
    .unwrap();
    assert_eq!(closed, Some(CloseCode::Away));

    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_silent_peer_is_dropped_by_keepalive() {
    let server = start(1, 1).await;
    let mut client = connect(server.addr).await;

    // Not reading means the client never answers the ping.
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let ended = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return true,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await
    .unwrap();
    assert!(ended);
}

#[tokio::test]
async fn test_active_peer_survives_keepalive() {
    let server = start(1, 1).await;
    let mut client = connect(server.addr).await;

    for id in 0..6 {
        let reply = call(&mut client, json!({"id": id, "method": "initialize"})).await;
        assert_eq!(reply["id"], id);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}
