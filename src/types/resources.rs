//! MCP Resource Types
//!
//! This module defines types related to resources in the MCP protocol:
//! catalog entries (`Resource`, `ResourceTemplate`) and the request/result
//! shapes for the `resources/*` method family.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::content::{Annotations, ResourceContent};

/// A known resource that the server is capable of reading.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Resource {
    /// URI of this resource (e.g. `file://...`)
    pub uri: String,
    /// Human-readable name for this resource
    pub name: String,
    /// Description of what this resource represents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of this resource, if known
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Size of the raw resource content in bytes, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Optional annotations for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// A template description for resources available on the server.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct ResourceTemplate {
    /// URI template (RFC 6570) that can be used to construct resource URIs
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    /// Human-readable name for the type of resource this template refers to
    pub name: String,
    /// Description of what this template is for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type shared by all resources matching this template, if uniform
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Optional annotations for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// The server's response to a `resources/list` request.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ListResourcesResult {
    /// Opaque token for the next page, if any
    #[serde(rename = "nextCursor", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// The resources the server offers
    pub resources: Vec<Resource>,
}

/// The server's response to a `resources/templates/list` request.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ListResourceTemplatesResult {
    /// Opaque token for the next page, if any
    #[serde(rename = "nextCursor", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// The resource-template catalog, in declaration order
    #[serde(rename = "resourceTemplates")]
    pub resource_templates: Vec<ResourceTemplate>,
}

/// A request to read a specific resource URI.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct ReadResourceRequest {
    /// URI of the resource to read; interpretation is up to the server
    pub uri: String,
}

/// The server's response to a `resources/read` request.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ReadResourceResult {
    /// The contents of the resource
    pub contents: Vec<ResourceContent>,
}

/// Params of a `resources/subscribe` request.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct SubscribeResourceParams {
    /// URI of the resource to subscribe to
    pub uri: String,
}

/// Params of a `resources/unsubscribe` request.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct UnsubscribeResourceParams {
    /// URI of the resource to unsubscribe from
    pub uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_shape() {
        let resource = Resource {
            uri: "weather://forecast/tokyo".into(),
            name: "Tokyo Forecast".into(),
            description: None,
            mime_type: Some("application/json".into()),
            size: Some(128),
            annotations: None,
        };
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["mimeType"], json!("application/json"));
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_template_shape() {
        let template = ResourceTemplate {
            uri_template: "weather://forecast/{city}".into(),
            name: "City Weather Forecast".into(),
            description: Some("Weather forecast for a specific city".into()),
            mime_type: Some("application/json".into()),
            annotations: None,
        };
        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["uriTemplate"], json!("weather://forecast/{city}"));
    }

    #[test]
    fn test_list_results_carry_cursor() {
        let result = ListResourcesResult {
            next_cursor: Some("page-2".into()),
            resources: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"nextCursor": "page-2", "resources": []}));
    }
}
