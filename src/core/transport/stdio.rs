//! STDIO transport implementation.
//!
//! A single connection over stdin/stdout: one JSON-RPC message per line in,
//! one reply per line out. Logs go to stderr so stdout stays clean.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::TransportResult;
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until stdin closes.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");
        Self::serve(server, tokio::io::stdin(), tokio::io::stdout()).await?;
        info!("STDIO transport finished");
        Ok(())
    }

    /// Serve line-delimited requests from `reader`, writing replies to
    /// `writer`. Blank lines are skipped.
    pub async fn serve<R, W>(server: McpServer, reader: R, mut writer: W) -> TransportResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            // Raw bytes: invalid UTF-8 is answered with a parse error.
            let frame = line.trim_ascii();
            if frame.is_empty() {
                continue;
            }
            let reply = server.handle_bytes(frame).await;
            debug!("Reply: {}", reply);
            writer.write_all(reply.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::tools::ToolRegistry;
    use serde_json::Value;

    #[tokio::test]
    async fn test_serves_each_line_in_order() {
        let server = McpServer::new(
            &Config::default(),
            ToolRegistry::with_builtin_tools(None).unwrap(),
        );
        let input = concat!(
            "{\"id\":1,\"method\":\"initialize\"}\n",
            "\n",
            "not json\n",
            "{\"id\":2,\"method\":\"tools/list\"}\n",
        );
        let mut output = Vec::new();
        StdioTransport::serve(server, input.as_bytes(), &mut output)
            .await
            .unwrap();

        let replies: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["error"]["code"], -32700);
        assert_eq!(replies[2]["result"]["tools"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_keeps_serving() {
        let server = McpServer::new(
            &Config::default(),
            ToolRegistry::with_builtin_tools(None).unwrap(),
        );
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"id\":1,\"method\":\"initialize\"}\n");
        input.extend_from_slice(&[0x7b, 0xff, 0x7d, b'\n']);
        input.extend_from_slice(b"{\"id\":3,\"method\":\"initialize\"}\r\n");

        let mut output = Vec::new();
        StdioTransport::serve(server, input.as_slice(), &mut output)
            .await
            .unwrap();

        let replies: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["id"], Value::Null);
        assert_eq!(replies[1]["error"]["code"], -32700);
        assert_eq!(replies[2]["id"], 3);
        assert!(replies[2]["result"].is_object());
    }
}
