//! MCP Error Types
//!
//! This module defines the error type shared by the dispatcher, the
//! transport, and generated server code, along with the mapping from each
//! failure class to its JSON-RPC 2.0 error code.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error data for JSON-RPC responses
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct ErrorData {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Optional additional data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// The main Error type for the MCP library
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-related errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol errors (e.g., invalid message format)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Method not found, or the method's capability was not advertised
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Resource errors
    #[error("Resource error: {0}")]
    Resource(String),

    /// Tool errors (unknown tool; tool runtime failures use `isError` replies)
    #[error("Tool error: {0}")]
    Tool(String),

    /// Prompt errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Schema validation error
    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    /// A user handler returned an error that is not protocol-shaped
    #[error("{0}")]
    Handler(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    /// Parse error
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid request
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = -32603;
    /// MCP-specific error codes live below the reserved server error range
    pub const RESOURCE_NOT_FOUND: i32 = -33000;
    /// Tool not found
    pub const TOOL_NOT_FOUND: i32 = -33001;
    /// Prompt not found
    pub const PROMPT_NOT_FOUND: i32 = -33003;
}

impl Error {
    /// Convert an error to a JSON-RPC error code
    pub fn to_code(&self) -> i32 {
        use error_codes::*;
        match self {
            Error::Json(_) => PARSE_ERROR,
            Error::Protocol(_) => INVALID_REQUEST,
            Error::MethodNotFound(_) => METHOD_NOT_FOUND,
            Error::InvalidParams(_) => INVALID_PARAMS,
            Error::SchemaValidation(_) => INVALID_PARAMS,
            Error::Resource(_) => RESOURCE_NOT_FOUND,
            Error::Tool(_) => TOOL_NOT_FOUND,
            Error::Prompt(_) => PROMPT_NOT_FOUND,
            Error::Io(_) => INTERNAL_ERROR,
            Error::Transport(_) => INTERNAL_ERROR,
            Error::Handler(_) => INTERNAL_ERROR,
            Error::Other(_) => INTERNAL_ERROR,
        }
    }

    /// Create the error payload carried by a JSON-RPC error response
    pub fn to_error_data(&self) -> ErrorData {
        ErrorData {
            code: self.to_code(),
            message: self.to_string(),
            data: None,
        }
    }

    /// Wrap a user handler failure, preserving protocol-shaped errors.
    ///
    /// Errors the client must be able to distinguish (invalid params, schema
    /// violations, unknown tools/prompts/resources) keep their code;
    /// everything else becomes an internal error annotated with the method
    /// that failed.
    pub fn handler_failure(method: &str, err: Error) -> Error {
        match err {
            e @ (Error::InvalidParams(_)
            | Error::SchemaValidation(_)
            | Error::MethodNotFound(_)
            | Error::Tool(_)
            | Error::Prompt(_)
            | Error::Resource(_)) => e,
            other => Error::Handler(format!("failed to handle {}: {}", method, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::MethodNotFound("x".into()).to_code(),
            error_codes::METHOD_NOT_FOUND
        );
        assert_eq!(
            Error::InvalidParams("x".into()).to_code(),
            error_codes::INVALID_PARAMS
        );
        assert_eq!(
            Error::SchemaValidation("x".into()).to_code(),
            error_codes::INVALID_PARAMS
        );
        assert_eq!(
            Error::Handler("x".into()).to_code(),
            error_codes::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_handler_failure_preserves_protocol_errors() {
        let wrapped = Error::handler_failure("tools/call", Error::Tool("tool not found: x".into()));
        assert!(matches!(wrapped, Error::Tool(_)));

        let wrapped = Error::handler_failure("tools/call", Error::Other("boom".into()));
        match wrapped {
            Error::Handler(msg) => assert_eq!(msg, "failed to handle tools/call: boom"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
