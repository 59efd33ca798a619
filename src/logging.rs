//! MCP Log Bridge
//!
//! This module implements client-facing logging: records emitted through a
//! [`ClientLogger`] are serialized as `notifications/message` frames and
//! written to the outbound stream, filtered by the process-wide minimum
//! level that `logging/setLevel` controls.
//!
//! This logger is for communication with the client, not for internal
//! diagnostics; those go through `tracing` and never touch stdout.

use std::io::Write;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};

use crate::protocol::LogLevel;

/// The minimum severity the client wants to receive, shared process-wide.
static MINIMUM_LOG_LEVEL: AtomicI64 = AtomicI64::new(0);

/// Set the minimum level for client-facing log notifications.
pub fn set_minimum_level(level: LogLevel) {
    MINIMUM_LOG_LEVEL.store(level.value(), Ordering::SeqCst);
}

/// The current minimum level for client-facing log notifications.
pub fn minimum_level() -> LogLevel {
    LogLevel::from_value(MINIMUM_LOG_LEVEL.load(Ordering::SeqCst))
}

/// The destination for `notifications/message` frames.
///
/// A sink either wraps a shared writer (the transport's outbound stream) or
/// discards everything. Transports construct a discard sink when the
/// `logging` capability is not advertised, so handlers can log
/// unconditionally without contaminating the protocol stream.
#[derive(Clone)]
pub struct LogSink {
    writer: Option<Arc<Mutex<Box<dyn Write + Send>>>>,
}

impl LogSink {
    /// A sink over the given writer. Frames are serialized under an
    /// internal mutex so interleaved notifications stay well-formed.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Some(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    /// A sink over the process's standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// A sink that drops every frame.
    pub fn discard() -> Self {
        Self { writer: None }
    }

    /// Whether frames written to this sink are discarded.
    pub fn is_discard(&self) -> bool {
        self.writer.is_none()
    }

    fn write_frame(&self, frame: &Value) {
        let Some(writer) = &self.writer else {
            return;
        };
        let bytes = match serde_json::to_vec(frame) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("failed to serialize log notification: {}", e);
                return;
            }
        };
        let mut guard = match writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = guard
            .write_all(&bytes)
            .and_then(|_| guard.write_all(b"\n"))
            .and_then(|_| guard.flush())
        {
            tracing::error!("failed to write log notification: {}", e);
        }
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_discard() {
            f.write_str("LogSink::Discard")
        } else {
            f.write_str("LogSink")
        }
    }
}

/// A named logger whose records are sent to the client as
/// `notifications/message`.
///
/// Obtained from a request context via
/// [`RequestContext::logger`](crate::server::RequestContext::logger).
#[derive(Debug, Clone)]
pub struct ClientLogger {
    name: String,
    sink: LogSink,
}

impl ClientLogger {
    /// Create a logger with the given name writing to the given sink.
    pub fn new(name: impl Into<String>, sink: LogSink) -> Self {
        Self {
            name: name.into(),
            sink,
        }
    }

    /// The logger name carried in each notification's `logger` field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Emit a record at the given level.
    ///
    /// The record is a JSON object holding the message under `msg` plus the
    /// supplied attributes; no timestamp, level, or source keys are added.
    pub fn log(&self, level: LogLevel, message: &str, fields: &[(&str, Value)]) {
        if level.value() < MINIMUM_LOG_LEVEL.load(Ordering::SeqCst) {
            return;
        }

        let mut record = Map::new();
        record.insert("msg".to_string(), Value::String(message.to_string()));
        for (key, value) in fields {
            record.insert((*key).to_string(), value.clone());
        }

        let frame = json!({
            "jsonrpc": "2.0",
            "method": "notifications/message",
            "params": {
                "level": level.name(),
                "logger": self.name,
                "data": Value::Object(record),
            },
        });
        self.sink.write_frame(&frame);
    }

    /// Emit a record at debug level.
    pub fn debug(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Debug, message, fields);
    }

    /// Emit a record at info level.
    pub fn info(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Info, message, fields);
    }

    /// Emit a record at notice level.
    pub fn notice(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Notice, message, fields);
    }

    /// Emit a record at warning level.
    pub fn warning(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Warning, message, fields);
    }

    /// Emit a record at error level.
    pub fn error(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Error, message, fields);
    }

    /// Emit a record at critical level.
    pub fn critical(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Critical, message, fields);
    }

    /// Emit a record at alert level.
    pub fn alert(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Alert, message, fields);
    }

    /// Emit a record at emergency level.
    pub fn emergency(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Emergency, message, fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn frames(&self) -> Vec<Value> {
            let data = self.0.lock().unwrap();
            String::from_utf8_lossy(&data)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_notification_frame_shape() {
        let buf = SharedBuf::default();
        let logger = ClientLogger::new("weather", LogSink::new(buf.clone()));
        logger.error("fetch failed", &[("city", serde_json::json!("tokyo"))]);

        let frames = buf.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["jsonrpc"], "2.0");
        assert_eq!(frames[0]["method"], "notifications/message");
        assert_eq!(frames[0]["params"]["level"], "error");
        assert_eq!(frames[0]["params"]["logger"], "weather");
        assert_eq!(
            frames[0]["params"]["data"],
            serde_json::json!({"msg": "fetch failed", "city": "tokyo"})
        );
    }

    #[test]
    fn test_discard_sink_writes_nothing() {
        let logger = ClientLogger::new("system", LogSink::discard());
        logger.emergency("unobserved", &[]);
        assert!(logger.sink.is_discard());
    }

    #[test]
    fn test_minimum_level_filtering() {
        let buf = SharedBuf::default();
        let logger = ClientLogger::new("system", LogSink::new(buf.clone()));

        set_minimum_level(LogLevel::Warning);
        logger.info("dropped", &[]);
        logger.debug("dropped", &[]);
        logger.warning("kept", &[]);
        logger.error("kept", &[]);
        assert_eq!(minimum_level(), LogLevel::Warning);

        set_minimum_level(LogLevel::Info);
        logger.info("kept", &[]);

        let frames = buf.frames();
        let levels: Vec<_> = frames
            .iter()
            .map(|f| f["params"]["level"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(levels, vec!["warning", "error", "info"]);
    }
}
