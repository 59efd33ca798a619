//! MCP Protocol Model
//!
//! This module defines the protocol-level vocabulary of the MCP server:
//! recognized protocol versions, capability descriptors, the JSON-RPC
//! request/response shapes handed to and returned by the dispatcher, the
//! request parameter types for every supported method, and the RFC-5424
//! log level mapping.

pub mod method;
pub mod validation;

pub use method::Method;
pub use validation::validate_json_schema;

use std::collections::HashMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::errors::{Error, ErrorData};

/// Protocol revision 2025-03-26.
pub const PROTOCOL_VERSION_2025_03_26: &str = "2025-03-26";
/// Protocol revision 2024-11-05.
pub const PROTOCOL_VERSION_2024_11_05: &str = "2024-11-05";

/// The most recent protocol revision this server speaks.
pub const LATEST_PROTOCOL_VERSION: &str = PROTOCOL_VERSION_2025_03_26;

/// All protocol revisions this server recognizes.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 2] =
    [PROTOCOL_VERSION_2025_03_26, PROTOCOL_VERSION_2024_11_05];

/// Check whether a proposed protocol version is recognized.
pub fn is_supported_protocol_version(version: &str) -> bool {
    SUPPORTED_PROTOCOL_VERSIONS.contains(&version)
}

/// A JSON-RPC request identifier, which may be a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric identifier
    Number(i64),
    /// String identifier
    String(String),
}

impl RequestId {
    /// The canonical string form of this identifier.
    ///
    /// Cancellation notifications carry the target id as a string even when
    /// the original request used a number; both forms normalize to the same
    /// key so in-flight lookups always match.
    pub fn canonical(&self) -> String {
        match self {
            RequestId::Number(n) => n.to_string(),
            RequestId::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{}", s),
        }
    }
}

/// An incoming JSON-RPC request or notification, with params left raw for
/// the dispatcher to decode per method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Request ID; absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// Method name (e.g., "tools/call")
    pub method: String,
    /// Raw parameters, decoded by the dispatcher based on the method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Box<RawValue>>,
}

/// Response for a JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// JSON-RPC version, always "2.0"
    pub jsonrpc: String,
    /// ID from the request
    pub id: RequestId,
    /// Either a result or an error
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
}

/// Represents either a successful result or an error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOutcome {
    /// Success case with a result
    Success {
        /// The reply value
        result: serde_json::Value,
    },
    /// Error case with error details
    Error {
        /// The error payload
        error: ErrorData,
    },
}

/// Create a success response for the given request id.
pub fn success_response(id: RequestId, result: serde_json::Value) -> Response {
    Response {
        jsonrpc: "2.0".to_string(),
        id,
        outcome: ResponseOutcome::Success { result },
    }
}

/// Create an error response for the given request id.
pub fn error_response(id: RequestId, error: &Error) -> Response {
    Response {
        jsonrpc: "2.0".to_string(),
        id,
        outcome: ResponseOutcome::Error {
            error: error.to_error_data(),
        },
    }
}

/// Decode raw request params into a typed value.
///
/// Absent params decode as an empty object, so methods whose params are all
/// optional accept a bare request while methods with required fields report
/// invalid params.
pub fn decode_params<T: serde::de::DeserializeOwned>(
    params: Option<&RawValue>,
) -> Result<T, Error> {
    let raw = params.map(|p| p.get()).unwrap_or("{}");
    serde_json::from_str(raw).map_err(|e| Error::InvalidParams(e.to_string()))
}

/// Describes the name and version of an MCP implementation.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema, PartialEq, Eq)]
pub struct Implementation {
    /// Name of the implementation
    pub name: String,
    /// Version of the implementation
    pub version: String,
}

//
// Capability descriptors
//

/// Server capability for prompts.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct PromptCapability {
    /// Whether this server emits notifications for prompt list changes
    #[serde(rename = "listChanged", default, skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

/// Server capability for resources.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct ResourceCapability {
    /// Whether this server supports subscribing to resource updates
    #[serde(default, skip_serializing_if = "is_false")]
    pub subscribe: bool,
    /// Whether this server emits notifications for resource list changes
    #[serde(rename = "listChanged", default, skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

/// Server capability for tools.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct ToolCapability {
    /// Whether this server emits notifications for tool list changes
    #[serde(rename = "listChanged", default, skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

/// Server capability for logging.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct LoggingCapability {}

/// Server capability for argument autocompletion.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct CompletionsCapability {}

fn is_false(v: &bool) -> bool {
    !*v
}

/// The set of capabilities a server advertises at initialization.
///
/// Presence of a capability gates which methods the dispatcher accepts;
/// absence yields method-not-found.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct ServerCapabilities {
    /// Present if the server offers any prompt templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptCapability>,
    /// Present if the server offers any resources to read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceCapability>,
    /// Present if the server offers any tools to call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapability>,
    /// Non-standard capabilities the server supports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<HashMap<String, serde_json::Value>>,
    /// Present if the server sends log messages to the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingCapability>,
    /// Present if the server supports argument autocompletion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions: Option<CompletionsCapability>,
}

/// Client capability for roots listing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct RootsCapability {
    /// Whether the client emits notifications for root list changes
    #[serde(rename = "listChanged", default, skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

/// The set of capabilities a client declares at initialization.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct ClientCapabilities {
    /// Non-standard capabilities the client supports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<HashMap<String, serde_json::Value>>,
    /// Present if the client supports listing roots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roots: Option<RootsCapability>,
}

//
// Lifecycle params and results
//

/// Parameters of the `initialize` request.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct InitializeRequestParams {
    /// The latest protocol version the client supports
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Capabilities the client declares
    #[serde(default)]
    pub capabilities: ClientCapabilities,
    /// Client implementation identity
    #[serde(rename = "clientInfo")]
    pub client_info: Implementation,
}

/// Result of the `initialize` request.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct InitializeResult {
    /// The protocol version the server wants to use; if the client cannot
    /// support it, the client must disconnect
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Capabilities the server advertises
    pub capabilities: ServerCapabilities,
    /// Server implementation identity
    #[serde(rename = "serverInfo")]
    pub server_info: Implementation,
    /// Optional usage instructions for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Pagination parameters shared by list requests.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct PaginationParams {
    /// Opaque token representing the current pagination position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Parameters of a `prompts/get` request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GetPromptRequestParams {
    /// Name of the prompt or prompt template
    pub name: String,
    /// Raw arguments for templating the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Box<RawValue>>,
}

/// Parameters of a `tools/call` request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CallToolRequestParams {
    /// Name of the tool
    pub name: String,
    /// Raw arguments for the tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Box<RawValue>>,
}

/// Parameters of a `notifications/cancelled` notification.
///
/// The id of the request to cancel is accepted in either JSON form and
/// normalized through [`RequestId::canonical`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CancelledNotificationParams {
    /// The id of the request to cancel
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    /// Optional reason for the cancellation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Parameters of a `logging/setLevel` request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SetLevelRequestParams {
    /// The minimum level the client wants to receive
    pub level: LogLevel,
}

//
// Completion
//

/// The kind of item a completion request refers to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum CompletionReferenceType {
    /// A prompt reference
    #[serde(rename = "ref/prompt")]
    Prompt,
    /// A resource or resource template reference
    #[serde(rename = "ref/resource")]
    Resource,
}

/// A reference to the prompt or resource being completed.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct CompletionReference {
    /// Reference kind
    #[serde(rename = "type")]
    pub reference_type: CompletionReferenceType,
    /// Name of the prompt or URI of the resource
    pub name: String,
}

/// The argument being completed.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct CompletionArgument {
    /// Name of the argument
    pub name: String,
    /// Current value used for completion matching
    pub value: String,
}

/// Parameters of a `completion/complete` request.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct CompleteRequestParams {
    /// Reference to a prompt or resource
    #[serde(rename = "ref")]
    pub reference: CompletionReference,
    /// The argument being completed
    pub argument: CompletionArgument,
}

/// Completion options for argument autocompletion.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct CompleteResult {
    /// Completion values; must not exceed 100 items
    pub values: Vec<String>,
    /// Total number of options available, which can exceed `values`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Whether more options exist beyond those returned
    #[serde(rename = "hasMore", default, skip_serializing_if = "is_false")]
    pub has_more: bool,
}

//
// Logging levels
//

/// The severity of a log message.
///
/// Levels map to syslog message severities as specified in RFC-5424 and are
/// named with lowercase strings on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Detailed debugging information
    Debug,
    /// General informational messages
    Info,
    /// Normal but significant events
    Notice,
    /// Warning conditions
    Warning,
    /// Error conditions
    Error,
    /// Critical conditions
    Critical,
    /// Action must be taken immediately
    Alert,
    /// System is unusable
    Emergency,
}

impl LogLevel {
    /// The numeric severity of this level.
    pub const fn value(self) -> i64 {
        match self {
            LogLevel::Debug => -4,
            LogLevel::Info => 0,
            LogLevel::Notice => 1,
            LogLevel::Warning => 4,
            LogLevel::Error => 8,
            LogLevel::Critical => 9,
            LogLevel::Alert => 10,
            LogLevel::Emergency => 11,
        }
    }

    /// The lowercase wire name of this level.
    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Notice => "notice",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::Alert => "alert",
            LogLevel::Emergency => "emergency",
        }
    }

    /// Map a numeric severity to a named level.
    ///
    /// Uses a `<=` cascade so that intermediate values map to the
    /// next-higher named severity.
    pub fn from_value(value: i64) -> LogLevel {
        if value <= LogLevel::Debug.value() {
            LogLevel::Debug
        } else if value <= LogLevel::Info.value() {
            LogLevel::Info
        } else if value <= LogLevel::Notice.value() {
            LogLevel::Notice
        } else if value <= LogLevel::Warning.value() {
            LogLevel::Warning
        } else if value <= LogLevel::Error.value() {
            LogLevel::Error
        } else if value <= LogLevel::Critical.value() {
            LogLevel::Critical
        } else if value <= LogLevel::Alert.value() {
            LogLevel::Alert
        } else {
            LogLevel::Emergency
        }
    }

    /// Parse a lowercase wire name into a level.
    pub fn from_name(name: &str) -> Option<LogLevel> {
        match name {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "notice" => Some(LogLevel::Notice),
            "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            "critical" => Some(LogLevel::Critical),
            "alert" => Some(LogLevel::Alert),
            "emergency" => Some(LogLevel::Emergency),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        LogLevel::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid log level: {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_version_recognition() {
        assert!(is_supported_protocol_version("2025-03-26"));
        assert!(is_supported_protocol_version("2024-11-05"));
        assert!(!is_supported_protocol_version("1999-01-01"));
    }

    #[test]
    fn test_request_id_canonical() {
        assert_eq!(RequestId::Number(7).canonical(), "7");
        assert_eq!(RequestId::String("7".into()).canonical(), "7");
        assert_eq!(RequestId::Number(-3).canonical(), "-3");
    }

    #[test]
    fn test_request_id_deserialization() {
        let id: RequestId = serde_json::from_str("42").unwrap();
        assert_eq!(id, RequestId::Number(42));
        let id: RequestId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id, RequestId::String("abc".into()));
    }

    #[test]
    fn test_request_without_params() {
        let req: Request = serde_json::from_str(r#"{"id":1,"method":"ping"}"#).unwrap();
        assert_eq!(req.method, "ping");
        assert!(req.params.is_none());

        let params: PaginationParams = decode_params(req.params.as_deref()).unwrap();
        assert!(params.cursor.is_none());
    }

    #[test]
    fn test_decode_params_reports_missing_fields() {
        let err = decode_params::<InitializeRequestParams>(None).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }

    #[test]
    fn test_capabilities_serialization() {
        let caps = ServerCapabilities {
            resources: Some(ResourceCapability {
                subscribe: true,
                list_changed: false,
            }),
            logging: Some(LoggingCapability {}),
            ..Default::default()
        };
        let value = serde_json::to_value(&caps).unwrap();
        assert_eq!(value, json!({"resources": {"subscribe": true}, "logging": {}}));
    }

    #[test]
    fn test_log_level_wire_names() {
        let level: LogLevel = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(level, LogLevel::Warning);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"warning\"");
        assert!(serde_json::from_str::<LogLevel>("\"verbose\"").is_err());
    }

    #[test]
    fn test_log_level_cascade() {
        assert_eq!(LogLevel::from_value(-10), LogLevel::Debug);
        assert_eq!(LogLevel::from_value(0), LogLevel::Info);
        assert_eq!(LogLevel::from_value(2), LogLevel::Warning);
        assert_eq!(LogLevel::from_value(5), LogLevel::Error);
        assert_eq!(LogLevel::from_value(9), LogLevel::Critical);
        assert_eq!(LogLevel::from_value(99), LogLevel::Emergency);
    }

    #[test]
    fn test_response_shapes() {
        let ok = success_response(RequestId::Number(1), json!({}));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"jsonrpc": "2.0", "id": 1, "result": {}})
        );

        let err = error_response(RequestId::Number(2), &Error::MethodNotFound("nope".into()));
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["error"]["code"], json!(-32601));
    }
}
