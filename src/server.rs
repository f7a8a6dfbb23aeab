use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::sync::mpsc;

use crate::checker::{CheckerError, LinkChecker};
use crate::config::ServerConfig;
use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Maximum bytes per JSON-RPC message (1 MiB).
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// MCP server that communicates over newline-delimited JSON-RPC 2.0.
pub struct McpServer {
    checker: LinkChecker,
    initialized: bool,
}

/// One line read from the input stream.
enum Frame {
    Eof,
    Line,
    Oversized(usize),
}

impl McpServer {
    pub fn new(config: ServerConfig) -> Result<Self, CheckerError> {
        Ok(Self {
            checker: LinkChecker::new(&config)?,
            initialized: false,
        })
    }

    /// Serve stdin/stdout until stdin closes.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!(
            deadline_ms = self.checker.deadline().as_millis() as u64,
            "link-checker listening on stdio"
        );
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve one message stream until `input` reaches end of file.
    ///
    /// Handshake and discovery messages are answered in arrival order.
    /// `tools/call` requests run as separate tasks, so a slow check never
    /// holds up later messages; their responses are written as they finish.
    /// Returns once input is exhausted and every in-flight call has answered.
    pub async fn serve<R, W>(&mut self, input: R, output: W) -> Result<(), Box<dyn std::error::Error>>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let writer = tokio::spawn(write_responses(rx, output));

        let mut reader = BufReader::new(input);
        let mut raw = Vec::new();

        loop {
            let n = match read_frame(&mut reader, &mut raw).await? {
                Frame::Eof => break,
                Frame::Line => raw.len(),
                Frame::Oversized(n) => {
                    tracing::warn!(bytes = n, limit = MAX_MESSAGE_BYTES, "message too large");
                    if tx.send(JsonRpcResponse::error(None, JsonRpcError::parse_error())).is_err() {
                        break;
                    }
                    continue;
                }
            };

            let trimmed = match std::str::from_utf8(&raw[..n]) {
                Ok(s) => s.trim(),
                Err(_) => {
                    tracing::warn!("message is not valid UTF-8");
                    if tx.send(JsonRpcResponse::error(None, JsonRpcError::parse_error())).is_err() {
                        break;
                    }
                    continue;
                }
            };

            if trimmed.is_empty() {
                continue;
            }

            let req: JsonRpcRequest = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("parse error: {e}");
                    if tx.send(JsonRpcResponse::error(None, JsonRpcError::parse_error())).is_err() {
                        break;
                    }
                    continue;
                }
            };

            if req.jsonrpc != "2.0" {
                if tx
                    .send(JsonRpcResponse::error(req.id.clone(), JsonRpcError::invalid_request()))
                    .is_err()
                {
                    break;
                }
                continue;
            }

            // Only `initialize` is allowed before the handshake completes
            if !self.initialized && req.method != "initialize" {
                if req.is_notification() {
                    continue;
                }
                let resp = JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::invalid_request_with("Server not initialized"),
                );
                if tx.send(resp).is_err() {
                    break;
                }
                continue;
            }

            if req.method == "tools/call" {
                let checker = self.checker.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(resp) = handlers::dispatch(&req, &checker).await {
                        let _ = tx.send(resp);
                    }
                });
                continue;
            }

            if let Some(resp) = handlers::dispatch(&req, &self.checker).await {
                if tx.send(resp).is_err() {
                    break;
                }
            }

            if req.method == "initialize" {
                self.initialized = true;
            }
        }

        // The writer drains until the last in-flight call drops its sender.
        drop(tx);
        writer.await??;

        tracing::info!("input closed, shutting down");
        Ok(())
    }
}

/// Read one newline-terminated line into `buf`, holding at most
/// `MAX_MESSAGE_BYTES + 1` bytes of it in memory.
async fn read_frame<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let limit = MAX_MESSAGE_BYTES as u64 + 1;
    let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
    if n == 0 {
        return Ok(Frame::Eof);
    }
    if n <= MAX_MESSAGE_BYTES {
        return Ok(Frame::Line);
    }

    let mut total = n;
    if buf.last() != Some(&b'\n') {
        total += discard_line(reader).await?;
    }
    buf.clear();
    Ok(Frame::Oversized(total))
}

/// Skip the rest of the current line without buffering it.
async fn discard_line<R>(reader: &mut R) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut discarded = 0;
    loop {
        let (consumed, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(discarded);
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        discarded += consumed;
        if done {
            return Ok(discarded);
        }
    }
}

async fn write_responses<W>(
    mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>,
    mut output: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(resp) = rx.recv().await {
        let out = serde_json::to_string(&resp)?;
        output.write_all(out.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(())
}
