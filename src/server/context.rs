//! Per-request context
//!
//! Each dispatched request runs with a [`RequestContext`] carrying its
//! cancellation scope, the pagination cursor (for `resources/list`), and
//! the client-facing log sink.

use tokio_util::sync::CancellationToken;

use crate::logging::{ClientLogger, LogSink};

/// The context handed to every handler invocation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    cancellation: CancellationToken,
    cursor: Option<String>,
    log_sink: LogSink,
}

impl RequestContext {
    /// The ambient context of a transport connection.
    ///
    /// The dispatcher derives a child context per request from this one.
    pub fn root(cancellation: CancellationToken, log_sink: LogSink) -> Self {
        Self {
            cancellation,
            cursor: None,
            log_sink,
        }
    }

    /// A detached context with a fresh cancellation scope and a discard log
    /// sink. Useful for hosting applications and tests that drive the
    /// dispatcher directly.
    pub fn background() -> Self {
        Self::root(CancellationToken::new(), LogSink::discard())
    }

    /// Derive the child context for a single request.
    pub(crate) fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            cursor: None,
            log_sink: self.log_sink.clone(),
        }
    }

    /// The same context with the pagination cursor attached.
    pub(crate) fn with_cursor(&self, cursor: Option<String>) -> Self {
        Self {
            cancellation: self.cancellation.clone(),
            cursor,
            log_sink: self.log_sink.clone(),
        }
    }

    /// The cancellation token of this request's scope.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Whether this request has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolves when this request is cancelled.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }

    /// The pagination cursor parsed from a `resources/list` request.
    ///
    /// Returns `None` when the client did not supply a cursor or the method
    /// does not support pagination. The cursor is opaque; the dispatcher
    /// never interprets its content.
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// A client-facing logger with the given name.
    ///
    /// Records are sent to the client as `notifications/message`; when the
    /// logging capability is not advertised the frames are discarded.
    pub fn logger(&self, name: impl Into<String>) -> ClientLogger {
        ClientLogger::new(name, self.log_sink.clone())
    }

    /// The log sink backing this context.
    pub fn log_sink(&self) -> &LogSink {
        &self.log_sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_inherits_parent_cancellation() {
        let root = RequestContext::background();
        let child = root.child();
        assert!(!child.is_cancelled());

        root.cancellation_token().cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_child_cancellation_does_not_escape() {
        let root = RequestContext::background();
        let child = root.child();
        child.cancellation_token().cancel();
        assert!(!root.is_cancelled());
    }

    #[test]
    fn test_cursor_attachment() {
        let cx = RequestContext::background();
        assert!(cx.next_cursor().is_none());

        let cx = cx.with_cursor(Some("page-2".into()));
        assert_eq!(cx.next_cursor(), Some("page-2"));
    }
}
