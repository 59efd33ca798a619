//! MCP Prompt Types
//!
//! This module defines types related to prompts in the MCP protocol:
//! catalog entries (`Prompt`, `PromptArgument`) and the request/result
//! shapes for `prompts/list` and `prompts/get`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::content::{PromptMessageContent, Role};

/// A prompt or prompt template that the server offers.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Prompt {
    /// Name of the prompt or prompt template
    pub name: String,
    /// Optional description of what this prompt provides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arguments to use for templating the prompt
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<PromptArgument>,
}

/// An argument that a prompt can accept.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct PromptArgument {
    /// Name of the argument
    pub name: String,
    /// Human-readable description of the argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this argument must be provided
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

/// The server's response to a `prompts/list` request.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct ListPromptsResult {
    /// Opaque token for the next page, if any
    #[serde(rename = "nextCursor", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// The prompt catalog, in declaration order
    pub prompts: Vec<Prompt>,
}

/// A message returned as part of a rendered prompt.
#[derive(Serialize, Deserialize, Debug)]
pub struct PromptMessage {
    /// The role of the message sender/recipient
    pub role: Role,
    /// The content of the message
    pub content: PromptMessageContent,
}

/// The server's response to a `prompts/get` request.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct GetPromptResult {
    /// Optional description for the rendered prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The rendered message sequence
    pub messages: Vec<PromptMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::content::TextContent;
    use serde_json::json;

    #[test]
    fn test_prompt_catalog_shape() {
        let prompt = Prompt {
            name: "weather_report".into(),
            description: Some("Generate a weather report".into()),
            arguments: vec![
                PromptArgument {
                    name: "city".into(),
                    description: Some("City name".into()),
                    required: true,
                },
                PromptArgument {
                    name: "language".into(),
                    description: None,
                    required: false,
                },
            ],
        };
        let value = serde_json::to_value(&prompt).unwrap();
        assert_eq!(value["arguments"][0]["required"], json!(true));
        assert!(value["arguments"][1].get("required").is_none());
    }

    #[test]
    fn test_get_prompt_result_shape() {
        let result = GetPromptResult {
            description: None,
            messages: vec![PromptMessage {
                role: Role::User,
                content: TextContent::new("What's the weather?").into(),
            }],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"messages": [{"role": "user", "content": {"type": "text", "text": "What's the weather?"}}]})
        );
    }
}
