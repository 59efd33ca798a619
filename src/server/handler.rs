//! The protocol dispatcher
//!
//! [`Handler`] routes incoming JSON-RPC requests across the MCP method
//! surface: it negotiates protocol versions, gates capability-scoped
//! methods, tracks per-request cancellation keyed by the canonical request
//! id, maintains the resource subscription set, and delegates to the
//! configured handler seams.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::errors::Error;
use crate::logging::{self, ClientLogger};
use crate::protocol::{
    decode_params, is_supported_protocol_version, CancelledNotificationParams, Implementation,
    InitializeRequestParams, InitializeResult, Method, PaginationParams, Request,
    ServerCapabilities, SetLevelRequestParams, LATEST_PROTOCOL_VERSION,
};
use crate::server::{
    CompletionHandler, PromptHandler, RequestContext, ResourceHandler, SubscriptionSet,
    ToolHandler,
};
use crate::types::prompts::{ListPromptsResult, Prompt};
use crate::types::resources::{
    ListResourceTemplatesResult, ResourceTemplate, SubscribeResourceParams,
    UnsubscribeResourceParams,
};
use crate::types::tools::{ListToolsResult, Tool};

/// The MCP protocol dispatcher.
///
/// Catalogs and handler seams are fixed at construction time; the
/// subscription set and the cancellation registry are owned by the
/// dispatcher and internally synchronized, so `handle` may be called from
/// any number of concurrent tasks.
pub struct Handler {
    capabilities: ServerCapabilities,
    implementation: Implementation,
    instructions: Option<String>,

    prompts: Vec<Prompt>,
    prompt_handler: Option<Arc<dyn PromptHandler>>,

    tools: Vec<Tool>,
    tool_handler: Option<Arc<dyn ToolHandler>>,

    resource_templates: Vec<ResourceTemplate>,
    resource_handler: Option<Arc<dyn ResourceHandler>>,

    completion_handler: Option<Arc<dyn CompletionHandler>>,

    subscriptions: SubscriptionSet,
    in_flight: DashMap<String, CancellationToken>,
}

impl Handler {
    /// Create a dispatcher with the given capabilities and identity.
    pub fn new(capabilities: ServerCapabilities, implementation: Implementation) -> Self {
        Self {
            capabilities,
            implementation,
            instructions: None,
            prompts: Vec::new(),
            prompt_handler: None,
            tools: Vec::new(),
            tool_handler: None,
            resource_templates: Vec::new(),
            resource_handler: None,
            completion_handler: None,
            subscriptions: SubscriptionSet::new(),
            in_flight: DashMap::new(),
        }
    }

    /// Set the usage instructions returned from `initialize`.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Set the prompt catalog. Names must be unique.
    pub fn with_prompts(mut self, prompts: Vec<Prompt>) -> Self {
        debug_assert!(unique_names(prompts.iter().map(|p| p.name.as_str())));
        self.prompts = prompts;
        self
    }

    /// Set the prompt handler.
    pub fn with_prompt_handler(mut self, handler: impl PromptHandler + 'static) -> Self {
        self.prompt_handler = Some(Arc::new(handler));
        self
    }

    /// Set the tool catalog. Names must be unique.
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        debug_assert!(unique_names(tools.iter().map(|t| t.name.as_str())));
        self.tools = tools;
        self
    }

    /// Set the tool handler.
    pub fn with_tool_handler(mut self, handler: impl ToolHandler + 'static) -> Self {
        self.tool_handler = Some(Arc::new(handler));
        self
    }

    /// Set the resource-template catalog. Names must be unique.
    pub fn with_resource_templates(mut self, templates: Vec<ResourceTemplate>) -> Self {
        debug_assert!(unique_names(templates.iter().map(|t| t.name.as_str())));
        self.resource_templates = templates;
        self
    }

    /// Set the resource handler.
    pub fn with_resource_handler(mut self, handler: impl ResourceHandler + 'static) -> Self {
        self.resource_handler = Some(Arc::new(handler));
        self
    }

    /// Set the completion handler.
    pub fn with_completion_handler(mut self, handler: impl CompletionHandler + 'static) -> Self {
        self.completion_handler = Some(Arc::new(handler));
        self
    }

    /// The capabilities this server advertises.
    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    /// The implementation identity this server reports.
    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    /// The prompt catalog, in declaration order.
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// The tool catalog, in declaration order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// The resource-template catalog, in declaration order.
    pub fn resource_templates(&self) -> &[ResourceTemplate] {
        &self.resource_templates
    }

    /// Whether the given resource URI is currently subscribed.
    pub fn is_subscribed(&self, uri: &str) -> bool {
        self.subscriptions.is_subscribed(uri)
    }

    /// Whether a request with the given id is currently in flight.
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains_key(id)
    }

    /// Handle an incoming request or notification.
    ///
    /// A child cancellation scope is derived from `cx` and registered under
    /// the request's canonical id before dispatch; it is fired and removed
    /// on return or on receipt of a matching `notifications/cancelled`.
    /// Returns `Ok(None)` for notifications and `Ok(Some(reply))` for
    /// requests. A cancelled request still produces whatever reply its
    /// handler returns after observing cancellation.
    pub async fn handle(&self, cx: &RequestContext, req: &Request) -> Result<Option<Value>, Error> {
        let cx = cx.child();
        let key = req.id.as_ref().map(|id| id.canonical());
        if let Some(key) = &key {
            self.in_flight
                .insert(key.clone(), cx.cancellation_token().clone());
        }

        let result = self.dispatch(&cx, req).await;

        if let Some(key) = &key {
            if let Some((_, token)) = self.in_flight.remove(key) {
                token.cancel();
            }
        }
        result
    }

    async fn dispatch(&self, cx: &RequestContext, req: &Request) -> Result<Option<Value>, Error> {
        let logger = cx.logger("system");
        logger.info("req", &[("method", Value::String(req.method.clone()))]);

        let method: Method = match req.method.parse() {
            Ok(method) => method,
            Err(_) => {
                logger.error("unknown method", &[("method", json!(req.method))]);
                return Err(Error::MethodNotFound(req.method.clone()));
            }
        };
        self.gate(&method, &logger)?;

        match method {
            Method::Ping => Ok(Some(json!({}))),

            // Lifecycle: https://modelcontextprotocol.io/specification/2025-03-26/basic/lifecycle
            Method::Initialize => {
                let params: InitializeRequestParams = decode(&logger, req.params.as_deref())?;
                let protocol_version = if is_supported_protocol_version(&params.protocol_version) {
                    params.protocol_version
                } else {
                    LATEST_PROTOCOL_VERSION.to_string()
                };
                let result = InitializeResult {
                    protocol_version,
                    capabilities: self.capabilities.clone(),
                    server_info: self.implementation.clone(),
                    instructions: self.instructions.clone(),
                };
                Ok(Some(serde_json::to_value(result)?))
            }
            Method::NotificationsInitialized => Ok(None),

            Method::PromptsList => {
                let result = ListPromptsResult {
                    next_cursor: None,
                    prompts: self.prompts.clone(),
                };
                Ok(Some(serde_json::to_value(result)?))
            }
            Method::PromptsGet => {
                let Some(handler) = &self.prompt_handler else {
                    logger.error("prompts/get is not supported", &[]);
                    return Err(Error::MethodNotFound(req.method.clone()));
                };
                let params = decode(&logger, req.params.as_deref())?;
                let result = handler
                    .get_prompt(cx, params)
                    .await
                    .map_err(|e| Error::handler_failure(&req.method, e))?;
                Ok(Some(serde_json::to_value(result)?))
            }

            Method::ResourcesList => {
                let Some(handler) = &self.resource_handler else {
                    logger.error("resources/list is not supported", &[]);
                    return Err(Error::MethodNotFound(req.method.clone()));
                };
                let pagination: PaginationParams = decode(&logger, req.params.as_deref())?;
                let cx = cx.with_cursor(pagination.cursor);
                let result = handler
                    .list_resources(&cx)
                    .await
                    .map_err(|e| Error::handler_failure(&req.method, e))?;
                Ok(Some(serde_json::to_value(result)?))
            }
            Method::ResourcesRead => {
                let Some(handler) = &self.resource_handler else {
                    logger.error("resources/read is not supported", &[]);
                    return Err(Error::MethodNotFound(req.method.clone()));
                };
                let params = decode(&logger, req.params.as_deref())?;
                let result = handler
                    .read_resource(cx, params)
                    .await
                    .map_err(|e| Error::handler_failure(&req.method, e))?;
                Ok(Some(serde_json::to_value(result)?))
            }
            Method::ResourcesTemplatesList => {
                let result = ListResourceTemplatesResult {
                    next_cursor: None,
                    resource_templates: self.resource_templates.clone(),
                };
                Ok(Some(serde_json::to_value(result)?))
            }
            Method::ResourcesSubscribe => {
                let params: SubscribeResourceParams = decode(&logger, req.params.as_deref())?;
                self.subscriptions.subscribe(params.uri);
                Ok(Some(json!({})))
            }
            Method::ResourcesUnsubscribe => {
                let params: UnsubscribeResourceParams = decode(&logger, req.params.as_deref())?;
                self.subscriptions.unsubscribe(&params.uri);
                Ok(Some(json!({})))
            }

            Method::ToolsList => {
                let result = ListToolsResult {
                    next_cursor: None,
                    tools: self.tools.clone(),
                };
                Ok(Some(serde_json::to_value(result)?))
            }
            Method::ToolsCall => {
                let Some(handler) = &self.tool_handler else {
                    logger.error("tools/call is not supported", &[]);
                    return Err(Error::MethodNotFound(req.method.clone()));
                };
                let params = decode(&logger, req.params.as_deref())?;
                let result = handler
                    .call_tool(cx, params)
                    .await
                    .map_err(|e| Error::handler_failure(&req.method, e))?;
                Ok(Some(serde_json::to_value(result)?))
            }

            Method::LoggingSetLevel => {
                let params: SetLevelRequestParams = decode(&logger, req.params.as_deref())?;
                logging::set_minimum_level(params.level);
                Ok(Some(json!({})))
            }

            Method::NotificationsCancelled => {
                let params: CancelledNotificationParams = decode(&logger, req.params.as_deref())?;
                let key = params.request_id.canonical();
                if let Some((_, token)) = self.in_flight.remove(&key) {
                    token.cancel();
                }
                logger.info(
                    "cancelled",
                    &[("requestId", json!(key)), ("reason", json!(params.reason))],
                );
                Ok(None)
            }

            Method::CompletionComplete => {
                let Some(handler) = &self.completion_handler else {
                    logger.error("completion/complete is not supported", &[]);
                    return Err(Error::MethodNotFound(req.method.clone()));
                };
                let params = decode(&logger, req.params.as_deref())?;
                let result = handler
                    .complete(cx, params)
                    .await
                    .map_err(|e| Error::handler_failure(&req.method, e))?;
                Ok(Some(json!({ "completion": serde_json::to_value(result)? })))
            }

            // Server-to-client notifications are never dispatched inbound.
            Method::NotificationsMessage
            | Method::NotificationsResourcesListChanged
            | Method::NotificationsResourcesUpdated => {
                logger.error("unknown method", &[("method", json!(req.method))]);
                Err(Error::MethodNotFound(req.method.clone()))
            }
        }
    }

    /// Reject capability-scoped methods whose capability was not advertised,
    /// before any params are decoded or handlers consulted.
    fn gate(&self, method: &Method, logger: &ClientLogger) -> Result<(), Error> {
        let supported = match method {
            Method::ToolsList | Method::ToolsCall => self.capabilities.tools.is_some(),
            Method::ResourcesList | Method::ResourcesRead | Method::ResourcesTemplatesList => {
                self.capabilities.resources.is_some()
            }
            Method::CompletionComplete => self.capabilities.completions.is_some(),
            _ => true,
        };
        if !supported {
            logger.error(&format!("{} is not supported", method), &[]);
            return Err(Error::MethodNotFound(method.to_string()));
        }
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    logger: &ClientLogger,
    params: Option<&serde_json::value::RawValue>,
) -> Result<T, Error> {
    decode_params(params).map_err(|err| {
        logger.error(
            "failed to unmarshal params",
            &[("error", Value::String(err.to_string()))],
        );
        err
    })
}

fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = std::collections::HashSet::new();
    names.into_iter().all(|name| seen.insert(name))
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("capabilities", &self.capabilities)
            .field("implementation", &self.implementation)
            .field("prompts", &self.prompts.len())
            .field("tools", &self.tools.len())
            .field("resource_templates", &self.resource_templates.len())
            .finish()
    }
}
