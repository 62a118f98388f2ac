// ABOUTME: Stdio transport reading newline-delimited JSON-RPC from stdin and writing to stdout
// ABOUTME: Handles each request on its own task and serializes output through one writer task
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use async_trait::async_trait;
use odoolink::BridgeError;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};
use crate::server::McpServer;
use crate::transport::McpTransport;

/// Responses waiting for the writer before readers back off
const OUTBOUND_QUEUE: usize = 64;

/// MCP transport over stdin/stdout using newline-delimited JSON-RPC
///
/// Each line on stdin is expected to be a complete JSON-RPC message.
/// Requests are handled concurrently, so responses may leave in a different
/// order than requests arrived; clients correlate them by id. Logs go to
/// stderr to avoid polluting the protocol channel.
pub struct StdioTransport;

#[async_trait]
impl McpTransport for StdioTransport {
    async fn serve(self, server: Arc<McpServer>) -> Result<(), BridgeError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        let (tx, rx) = mpsc::channel::<JsonRpcResponse>(OUTBOUND_QUEUE);
        let writer = tokio::spawn(write_responses(tokio::io::stdout(), rx));
        let mut in_flight = JoinSet::new();

        debug!("Stdio transport ready, waiting for JSON-RPC messages on stdin");

        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    error!(error = %e, "Failed to parse JSON-RPC request");
                    let resp =
                        JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                    if tx.send(resp).await.is_err() {
                        break;
                    }
                    continue;
                }
            };

            debug!(method = %request.method, "Handling MCP request");

            let server = Arc::clone(&server);
            let tx = tx.clone();
            in_flight.spawn(async move {
                if let Some(response) = server.handle_request(request).await {
                    // Writer gone means stdout failed; the error surfaces from the writer task
                    let _ = tx.send(response).await;
                }
            });

            while in_flight.try_join_next().is_some() {}
        }

        debug!("Stdin closed, draining in-flight requests");
        while in_flight.join_next().await.is_some() {}
        drop(tx);

        writer
            .await
            .map_err(|e| BridgeError::internal(format!("stdout writer task failed: {e}")))?
    }
}

/// Drain the response queue, writing each response as one line
async fn write_responses<W>(
    mut out: W,
    mut rx: mpsc::Receiver<JsonRpcResponse>,
) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin + Send,
{
    while let Some(response) = rx.recv().await {
        write_response(&mut out, &response).await?;
    }
    Ok(())
}

/// Serialize and write a JSON-RPC response as a single line
async fn write_response<W>(out: &mut W, response: &JsonRpcResponse) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin + Send,
{
    let json = serde_json::to_string(response)
        .map_err(|e| BridgeError::internal(format!("JSON serialization failed: {e}")))?;

    out.write_all(json.as_bytes())
        .await
        .map_err(|e| BridgeError::internal(format!("stdout write failed: {e}")))?;

    out.write_all(b"\n")
        .await
        .map_err(|e| BridgeError::internal(format!("stdout newline write failed: {e}")))?;

    out.flush()
        .await
        .map_err(|e| BridgeError::internal(format!("stdout flush failed: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn writer_emits_one_line_per_response() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(JsonRpcResponse::success(Some(json!(1)), json!({})))
            .await
            .expect("send");
        tx.send(JsonRpcResponse::error(Some(json!(2)), PARSE_ERROR, "bad".to_owned()))
            .await
            .expect("send");
        drop(tx);

        let mut out = Vec::new();
        write_responses(&mut out, rx).await.expect("write");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], json!(1));
        assert_eq!(lines[1]["error"]["code"], json!(PARSE_ERROR));
    }
}
