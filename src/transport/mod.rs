//! Transport adapters
//!
//! This module implements the framing and serving layer between a
//! full-duplex byte stream and the dispatcher: newline-delimited JSON-RPC
//! messages in both directions, one task per in-flight request, and the
//! single-connection stdio listener.

mod stdio;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::errors::Error;
use crate::logging::LogSink;
use crate::protocol::Request;

pub use stdio::{serve_connection, serve_stdio, StdioTransport};

/// A hook consulted before a message is queued for dispatch.
///
/// Returning `Some` answers the message in place of the dispatcher;
/// returning `None` lets dispatch proceed normally.
#[async_trait]
pub trait Preempter: Send + Sync {
    /// Inspect an incoming message before dispatch.
    async fn preempt(&self, req: &Request) -> Option<Result<Option<Value>, Error>>;
}

/// Options for serving a connection.
pub struct ServeOptions {
    /// Hook consulted before each message is queued for dispatch
    pub preempter: Option<Arc<dyn Preempter>>,
    /// Ambient cancellation scope; cancelling it stops the serve loop and
    /// cancels every in-flight request
    pub cancellation: CancellationToken,
    /// Client-facing log sink; defaults to the outbound stdout stream.
    /// Ignored (replaced by a discard sink) when the handler does not
    /// advertise the logging capability.
    pub log_sink: Option<LogSink>,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            preempter: None,
            cancellation: CancellationToken::new(),
            log_sink: None,
        }
    }
}

impl std::fmt::Debug for ServeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServeOptions")
            .field("preempter", &self.preempter.is_some())
            .field("cancellation", &self.cancellation)
            .field("log_sink", &self.log_sink)
            .finish()
    }
}
