//! Type-safe definitions for the Model Context Protocol (MCP) method identifiers.
//! This module provides structured representation of the methods this server
//! dispatches or emits.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Represents the methods defined in the Model Context Protocol (MCP).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum Method {
    /// Core initialization
    #[serde(rename = "initialize")]
    Initialize,

    /// Simple ping to check connection
    #[serde(rename = "ping")]
    Ping,

    /// Notification that initialization is complete
    #[serde(rename = "notifications/initialized")]
    NotificationsInitialized,

    /// Request cancellation notification
    #[serde(rename = "notifications/cancelled")]
    NotificationsCancelled,

    /// List available resources
    #[serde(rename = "resources/list")]
    ResourcesList,

    /// List resource templates
    #[serde(rename = "resources/templates/list")]
    ResourcesTemplatesList,

    /// Read a specific resource
    #[serde(rename = "resources/read")]
    ResourcesRead,

    /// Subscribe to resource updates
    #[serde(rename = "resources/subscribe")]
    ResourcesSubscribe,

    /// Unsubscribe from resource updates
    #[serde(rename = "resources/unsubscribe")]
    ResourcesUnsubscribe,

    /// Notification of resource list changes
    #[serde(rename = "notifications/resources/list_changed")]
    NotificationsResourcesListChanged,

    /// Notification of resource updates
    #[serde(rename = "notifications/resources/updated")]
    NotificationsResourcesUpdated,

    /// List available prompts
    #[serde(rename = "prompts/list")]
    PromptsList,

    /// Get a specific prompt
    #[serde(rename = "prompts/get")]
    PromptsGet,

    /// List available tools
    #[serde(rename = "tools/list")]
    ToolsList,

    /// Call a tool
    #[serde(rename = "tools/call")]
    ToolsCall,

    /// Set logging level
    #[serde(rename = "logging/setLevel")]
    LoggingSetLevel,

    /// Logging message notification
    #[serde(rename = "notifications/message")]
    NotificationsMessage,

    /// Get completion options
    #[serde(rename = "completion/complete")]
    CompletionComplete,
}

impl Method {
    /// Get the string representation of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::Ping => "ping",
            Method::NotificationsInitialized => "notifications/initialized",
            Method::NotificationsCancelled => "notifications/cancelled",
            Method::ResourcesList => "resources/list",
            Method::ResourcesTemplatesList => "resources/templates/list",
            Method::ResourcesRead => "resources/read",
            Method::ResourcesSubscribe => "resources/subscribe",
            Method::ResourcesUnsubscribe => "resources/unsubscribe",
            Method::NotificationsResourcesListChanged => "notifications/resources/list_changed",
            Method::NotificationsResourcesUpdated => "notifications/resources/updated",
            Method::PromptsList => "prompts/list",
            Method::PromptsGet => "prompts/get",
            Method::ToolsList => "tools/list",
            Method::ToolsCall => "tools/call",
            Method::LoggingSetLevel => "logging/setLevel",
            Method::NotificationsMessage => "notifications/message",
            Method::CompletionComplete => "completion/complete",
        }
    }

    /// Check if this method is a notification
    pub fn is_notification(&self) -> bool {
        matches!(
            self,
            Method::NotificationsInitialized
                | Method::NotificationsCancelled
                | Method::NotificationsResourcesListChanged
                | Method::NotificationsResourcesUpdated
                | Method::NotificationsMessage
        )
    }

    /// Check if this method is a request that requires a response
    pub fn is_request(&self) -> bool {
        !self.is_notification()
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attempts to parse a string into a Method
impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initialize" => Ok(Method::Initialize),
            "ping" => Ok(Method::Ping),
            "notifications/initialized" => Ok(Method::NotificationsInitialized),
            "notifications/cancelled" => Ok(Method::NotificationsCancelled),
            "resources/list" => Ok(Method::ResourcesList),
            "resources/templates/list" => Ok(Method::ResourcesTemplatesList),
            "resources/read" => Ok(Method::ResourcesRead),
            "resources/subscribe" => Ok(Method::ResourcesSubscribe),
            "resources/unsubscribe" => Ok(Method::ResourcesUnsubscribe),
            "notifications/resources/list_changed" => Ok(Method::NotificationsResourcesListChanged),
            "notifications/resources/updated" => Ok(Method::NotificationsResourcesUpdated),
            "prompts/list" => Ok(Method::PromptsList),
            "prompts/get" => Ok(Method::PromptsGet),
            "tools/list" => Ok(Method::ToolsList),
            "tools/call" => Ok(Method::ToolsCall),
            "logging/setLevel" => Ok(Method::LoggingSetLevel),
            "notifications/message" => Ok(Method::NotificationsMessage),
            "completion/complete" => Ok(Method::CompletionComplete),
            _ => Err(format!("Unknown method: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_serialization() {
        let serialized = serde_json::to_string(&Method::Initialize).unwrap();
        assert_eq!(serialized, "\"initialize\"");

        let serialized = serde_json::to_string(&Method::ResourcesTemplatesList).unwrap();
        assert_eq!(serialized, "\"resources/templates/list\"");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ping".parse::<Method>().unwrap(), Method::Ping);
        assert_eq!(
            "logging/setLevel".parse::<Method>().unwrap(),
            Method::LoggingSetLevel
        );
        assert!("unknown_method".parse::<Method>().is_err());
    }

    #[test]
    fn test_is_notification() {
        assert!(Method::NotificationsInitialized.is_notification());
        assert!(Method::NotificationsCancelled.is_notification());
        assert!(!Method::ToolsCall.is_notification());
        assert!(Method::Ping.is_request());
    }

    #[test]
    fn test_display() {
        assert_eq!(Method::CompletionComplete.to_string(), "completion/complete");
    }
}
