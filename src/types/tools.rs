//! MCP Tool Types
//!
//! This module defines types related to tools in the MCP protocol: the
//! `Tool` catalog entry with its JSON-Schema input description, advisory
//! `ToolAnnotations`, and the `tools/list` / `tools/call` result shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::content::CallToolContent;

/// A definition for a tool the client can call.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Tool {
    /// Name of the tool
    pub name: String,
    /// Human-readable description of the tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema object defining the expected parameters for the tool
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
    /// Optional additional tool information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

/// Additional properties describing a tool to clients.
///
/// All properties are hints; they are not guaranteed to faithfully describe
/// tool behavior.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct ToolAnnotations {
    /// Human-readable title for the tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Whether the tool does not modify its environment
    #[serde(rename = "readOnlyHint", default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only_hint: bool,
    /// Whether the tool may perform destructive updates; meaningful only
    /// when `read_only_hint` is false
    #[serde(rename = "destructiveHint", default, skip_serializing_if = "std::ops::Not::not")]
    pub destructive_hint: bool,
    /// Whether repeated calls with the same arguments have no additional
    /// effect; meaningful only when `read_only_hint` is false
    #[serde(rename = "idempotentHint", default, skip_serializing_if = "std::ops::Not::not")]
    pub idempotent_hint: bool,
    /// Whether the tool interacts with an open world of external entities
    #[serde(rename = "openWorldHint", default, skip_serializing_if = "std::ops::Not::not")]
    pub open_world_hint: bool,
}

/// The server's response to a `tools/list` request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ListToolsResult {
    /// Opaque token for the next page, if any
    #[serde(rename = "nextCursor", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// The tool catalog, in declaration order
    pub tools: Vec<Tool>,
}

/// The server's response to a `tools/call` request.
///
/// Errors that originate from the tool itself are reported inside the
/// result with `is_error` set, not as a protocol-level error response, so
/// the calling model can observe the failure and self-correct.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CallToolResult {
    /// The content of the tool call
    pub content: Vec<CallToolContent>,
    /// Whether the tool call ended in an error
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl CallToolResult {
    /// A successful result carrying a single text content item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![crate::types::content::TextContent::new(text).into()],
            is_error: false,
        }
    }

    /// A tool error carrying a single text content item.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![crate::types::content::TextContent::new(text).into()],
            is_error: true,
        }
    }
}
