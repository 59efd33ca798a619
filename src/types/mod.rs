//! MCP Data Types
//!
//! This module groups the content model and the catalog/request/result
//! types for prompts, resources, and tools.

pub mod content;
pub mod prompts;
pub mod resources;
pub mod tools;

pub use content::{
    Annotations, AudioContent, ByteStream, CallToolContent, EmbeddedResource, ImageContent,
    PromptMessageContent, ResourceContent, Role, TextContent,
};
pub use prompts::{GetPromptResult, ListPromptsResult, Prompt, PromptArgument, PromptMessage};
pub use resources::{
    ListResourceTemplatesResult, ListResourcesResult, ReadResourceRequest, ReadResourceResult,
    Resource, ResourceTemplate, SubscribeResourceParams, UnsubscribeResourceParams,
};
pub use tools::{CallToolResult, ListToolsResult, Tool, ToolAnnotations};
