//! STDIO Transport
//!
//! Serves the dispatcher over standard input and output: inbound frames are
//! newline-delimited JSON-RPC messages on stdin, outbound replies are
//! written to stdout with a trailing newline. The listener accepts exactly
//! one connection.
//!
//! All internal diagnostics go through `tracing` (stderr-side); stdout
//! carries only protocol frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::errors::Error;
use crate::logging::LogSink;
use crate::protocol::{error_response, success_response, Request, RequestId, Response};
use crate::server::{Handler, RequestContext};
use crate::transport::ServeOptions;

/// A transport that serves a single connection over stdin/stdout.
///
/// See <https://modelcontextprotocol.io/specification/2025-03-26/basic/transports#stdio>
pub struct StdioTransport {
    accepted: AtomicBool,
}

impl StdioTransport {
    /// Create a new STDIO transport.
    pub fn new() -> Self {
        Self {
            accepted: AtomicBool::new(false),
        }
    }

    /// Serve the dispatcher over stdin/stdout with default options.
    pub async fn serve(&self, handler: Arc<Handler>) -> Result<(), Error> {
        self.serve_with_options(handler, ServeOptions::default())
            .await
    }

    /// Serve the dispatcher over stdin/stdout.
    ///
    /// Returns an error if called more than once; the stdio listener can
    /// only accept a single connection.
    pub async fn serve_with_options(
        &self,
        handler: Arc<Handler>,
        options: ServeOptions,
    ) -> Result<(), Error> {
        if self.accepted.swap(true, Ordering::SeqCst) {
            return Err(Error::Transport(
                "stdio listener can only accept a single connection".to_string(),
            ));
        }
        tracing::info!("stdio transport started");
        let result = serve_connection(io::stdin(), io::stdout(), handler, options).await;
        tracing::info!("stdio transport closed");
        result
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve the dispatcher over stdin/stdout until EOF.
pub async fn serve_stdio(handler: Arc<Handler>) -> Result<(), Error> {
    StdioTransport::new().serve(handler).await
}

/// Serve the dispatcher over an arbitrary full-duplex byte stream.
///
/// Each inbound line is parsed as a JSON-RPC message and dispatched on its
/// own task, so replies may be written out of order. The loop ends at EOF
/// or when the ambient cancellation scope fires; either way every in-flight
/// request's scope is cancelled and outstanding tasks are drained before
/// returning.
pub async fn serve_connection<R, W>(
    reader: R,
    writer: W,
    handler: Arc<Handler>,
    options: ServeOptions,
) -> Result<(), Error>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    // When the logging capability is not advertised, client-facing log
    // records must not reach the protocol stream.
    let sink = if handler.capabilities().logging.is_some() {
        options.log_sink.unwrap_or_else(LogSink::stdout)
    } else {
        LogSink::discard()
    };
    let root = RequestContext::root(options.cancellation.clone(), sink);
    let writer = Arc::new(Mutex::new(writer));
    let mut lines = BufReader::new(reader).lines();
    let mut tasks: JoinSet<()> = JoinSet::new();

    loop {
        let line = tokio::select! {
            _ = options.cancellation.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("failed to read from transport: {}", e);
                    break;
                }
            },
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let req: Request = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                tracing::error!("failed to parse message: {}", e);
                continue;
            }
        };

        if let Some(preempter) = &options.preempter {
            if let Some(result) = preempter.preempt(&req).await {
                respond(&writer, req.id, result).await;
                continue;
            }
        }

        let handler = Arc::clone(&handler);
        let root = root.clone();
        let writer = Arc::clone(&writer);
        tasks.spawn(async move {
            let result = handler.handle(&root, &req).await;
            respond(&writer, req.id, result).await;
        });
    }

    // EOF or shutdown: cancel every in-flight request scope, then let the
    // handlers run to completion.
    options.cancellation.cancel();
    while tasks.join_next().await.is_some() {}
    Ok(())
}

async fn respond<W>(
    writer: &Arc<Mutex<W>>,
    id: Option<RequestId>,
    result: Result<Option<Value>, Error>,
) where
    W: AsyncWrite + Unpin,
{
    let Some(id) = id else {
        if let Err(e) = result {
            tracing::error!("failed to handle notification: {}", e);
        }
        return;
    };
    let response = match result {
        Ok(value) => success_response(id, value.unwrap_or(Value::Null)),
        Err(err) => error_response(id, &err),
    };
    write_frame(writer, &response).await;
}

async fn write_frame<W>(writer: &Arc<Mutex<W>>, response: &Response)
where
    W: AsyncWrite + Unpin,
{
    let bytes = match serde_json::to_vec(response) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("failed to serialize response: {}", e);
            return;
        }
    };
    let mut writer = writer.lock().await;
    if let Err(e) = async {
        writer.write_all(&bytes).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await
    }
    .await
    {
        tracing::error!("failed to write response: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Implementation, ServerCapabilities};
    use serde_json::json;
    use tokio::io::AsyncReadExt;

    fn test_handler() -> Arc<Handler> {
        Arc::new(Handler::new(
            ServerCapabilities::default(),
            Implementation {
                name: "t".into(),
                version: "0".into(),
            },
        ))
    }

    #[tokio::test]
    async fn test_single_accept() {
        let transport = StdioTransport::new();
        transport.accepted.store(true, Ordering::SeqCst);
        let err = transport.serve(test_handler()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_ping_over_connection() {
        let (client, server) = io::duplex(4096);
        let (server_read, server_write) = io::split(server);
        let (mut client_read, mut client_write) = io::split(client);

        let serve = tokio::spawn(serve_connection(
            server_read,
            server_write,
            test_handler(),
            ServeOptions::default(),
        ));

        client_write
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
            .await
            .unwrap();
        client_write.shutdown().await.unwrap();

        let mut out = String::new();
        client_read.read_to_string(&mut out).await.unwrap();
        let frame: Value = serde_json::from_str(out.lines().next().unwrap()).unwrap();
        assert_eq!(frame, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));

        serve.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let (client, server) = io::duplex(4096);
        let (server_read, server_write) = io::split(server);
        let (mut client_read, mut client_write) = io::split(client);

        let serve = tokio::spawn(serve_connection(
            server_read,
            server_write,
            test_handler(),
            ServeOptions::default(),
        ));

        client_write.write_all(b"not json\n").await.unwrap();
        client_write
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n")
            .await
            .unwrap();
        client_write.shutdown().await.unwrap();

        let mut out = String::new();
        client_read.read_to_string(&mut out).await.unwrap();
        assert_eq!(out.lines().count(), 1);
        let frame: Value = serde_json::from_str(out.lines().next().unwrap()).unwrap();
        assert_eq!(frame["id"], json!(2));

        serve.await.unwrap().unwrap();
    }
}
