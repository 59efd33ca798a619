//! Server module: the protocol dispatcher and its handler seams
//!
//! This module contains the dispatcher ([`Handler`]) and the traits user
//! code (usually through generated routers) implements to serve prompts,
//! tools, resources, and completions.

use async_trait::async_trait;

use crate::errors::Error;
use crate::protocol::{
    CallToolRequestParams, CompleteRequestParams, CompleteResult, GetPromptRequestParams,
};
use crate::types::prompts::GetPromptResult;
use crate::types::resources::{ListResourcesResult, ReadResourceRequest, ReadResourceResult};
use crate::types::tools::CallToolResult;

mod context;
mod handler;
mod subscriptions;

pub use context::RequestContext;
pub use handler::Handler;
pub use subscriptions::SubscriptionSet;

/// Serves `prompts/get` requests.
///
/// Generated code implements this with a router that matches the prompt
/// name, unmarshals the arguments into the typed request record, and calls
/// the user's per-prompt method.
#[async_trait]
pub trait PromptHandler: Send + Sync {
    /// Render the named prompt.
    async fn get_prompt(
        &self,
        cx: &RequestContext,
        req: GetPromptRequestParams,
    ) -> Result<GetPromptResult, Error>;
}

/// Serves `tools/call` requests.
///
/// Generated code implements this with a router that matches the tool name,
/// unmarshals and schema-validates the arguments, and calls the user's
/// per-tool method. Tool runtime failures must be reported through
/// [`CallToolResult::is_error`](crate::types::tools::CallToolResult), not
/// as errors from this method.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Invoke the named tool.
    async fn call_tool(
        &self,
        cx: &RequestContext,
        req: CallToolRequestParams,
    ) -> Result<CallToolResult, Error>;
}

/// Serves `resources/list` and `resources/read` requests.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// List the resources the server offers. The pagination cursor, if the
    /// client supplied one, is available via
    /// [`RequestContext::next_cursor`].
    async fn list_resources(&self, cx: &RequestContext) -> Result<ListResourcesResult, Error>;

    /// Read a specific resource URI.
    async fn read_resource(
        &self,
        cx: &RequestContext,
        req: ReadResourceRequest,
    ) -> Result<ReadResourceResult, Error>;
}

/// Serves `completion/complete` requests.
#[async_trait]
pub trait CompletionHandler: Send + Sync {
    /// Produce completion options for a prompt argument or resource URI
    /// parameter.
    async fn complete(
        &self,
        cx: &RequestContext,
        req: CompleteRequestParams,
    ) -> Result<CompleteResult, Error>;
}
