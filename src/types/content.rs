//! MCP Content Types
//!
//! This module defines the tagged content variants shared by prompt
//! messages, tool results, and resource reads: text, image, audio, embedded
//! resources, and text/binary resource contents. Binary payloads are
//! presented as lazy byte-streams and drained through a base64 encoder at
//! serialization time.

use std::fmt;
use std::io::{self, Read};
use std::sync::Mutex;

use base64::prelude::BASE64_STANDARD;
use base64::write::EncoderWriter;
use base64::Engine;
use schemars::JsonSchema;
use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The sender or recipient of messages and data in a conversation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The user side of the conversation
    User,
    /// The assistant side of the conversation
    Assistant,
}

/// Optional annotations informing the client how an object is used or
/// displayed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct Annotations {
    /// Who the intended customer of this object or data is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Vec<Role>>,
    /// How important this data is, from 0 (optional) to 1 (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

/// A lazy binary payload.
///
/// The underlying reader is drained to completion and base64-encoded the
/// first time the enclosing content value is serialized; a second
/// serialization of the same value yields empty data. A read failure makes
/// the enclosing value fail to serialize.
pub struct ByteStream {
    inner: Mutex<Option<Box<dyn Read + Send>>>,
}

impl ByteStream {
    /// Wrap a reader whose contents are encoded at serialization time.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self {
            inner: Mutex::new(Some(Box::new(reader))),
        }
    }

    /// Wrap an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_reader(io::Cursor::new(bytes.into()))
    }

    /// Drain the payload through a standard-alphabet, padded base64 encoder.
    pub(crate) fn encode_base64(&self) -> io::Result<String> {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut encoded = Vec::new();
        if let Some(mut reader) = guard.take() {
            let mut encoder = EncoderWriter::new(&mut encoded, &BASE64_STANDARD);
            io::copy(&mut reader, &mut encoder)?;
            encoder.finish()?;
        }
        String::from_utf8(encoded)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "base64 output was not ASCII"))
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteStream(..)")
    }
}

fn annotations_value<S: serde::Serializer>(
    annotations: &Annotations,
) -> Result<Value, S::Error> {
    serde_json::to_value(annotations).map_err(S::Error::custom)
}

/// Text content of a prompt message or tool result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextContent {
    /// The text of the message
    pub text: String,
    /// Optional annotations for the client
    pub annotations: Option<Annotations>,
}

impl TextContent {
    /// Text content without annotations.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: None,
        }
    }
}

impl Serialize for TextContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String("text".to_string()));
        map.insert("text".to_string(), Value::String(self.text.clone()));
        if let Some(annotations) = &self.annotations {
            map.insert(
                "annotations".to_string(),
                annotations_value::<S>(annotations)?,
            );
        }
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TextContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        let text = map
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DeError::missing_field("text"))?
            .to_string();
        let annotations = deserialize_annotations::<D>(&map)?;
        Ok(Self { text, annotations })
    }
}

/// Image content of a prompt message.
#[derive(Debug)]
pub struct ImageContent {
    /// The image bytes, base64-encoded on the wire
    pub data: ByteStream,
    /// The MIME type of the image
    pub mime_type: String,
    /// Optional annotations for the client
    pub annotations: Option<Annotations>,
}

/// Audio content of a prompt message.
#[derive(Debug)]
pub struct AudioContent {
    /// The audio bytes, base64-encoded on the wire
    pub data: ByteStream,
    /// The MIME type of the audio
    pub mime_type: String,
    /// Optional annotations for the client
    pub annotations: Option<Annotations>,
}

fn serialize_binary_content<S>(
    serializer: S,
    content_type: &str,
    data: &ByteStream,
    mime_type: &str,
    annotations: &Option<Annotations>,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = data
        .encode_base64()
        .map_err(|e| S::Error::custom(format!("failed to encode {}: {}", content_type, e)))?;
    let mut map = Map::new();
    map.insert("type".to_string(), Value::String(content_type.to_string()));
    map.insert("mimeType".to_string(), Value::String(mime_type.to_string()));
    map.insert("data".to_string(), Value::String(encoded));
    if let Some(annotations) = annotations {
        map.insert(
            "annotations".to_string(),
            annotations_value::<S>(annotations)?,
        );
    }
    map.serialize(serializer)
}

fn deserialize_binary_content<'de, D>(map: &Map<String, Value>) -> Result<(ByteStream, String), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let mime_type = map
        .get("mimeType")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeError::missing_field("mimeType"))?
        .to_string();
    let encoded = map
        .get("data")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeError::missing_field("data"))?;
    let bytes = BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| DeError::custom(format!("invalid base64 data: {}", e)))?;
    Ok((ByteStream::from_bytes(bytes), mime_type))
}

fn deserialize_annotations<'de, D>(
    map: &Map<String, Value>,
) -> Result<Option<Annotations>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match map.get("annotations") {
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(DeError::custom),
        None => Ok(None),
    }
}

impl Serialize for ImageContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serialize_binary_content(serializer, "image", &self.data, &self.mime_type, &self.annotations)
    }
}

impl<'de> Deserialize<'de> for ImageContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        let (data, mime_type) = deserialize_binary_content::<D>(&map)?;
        let annotations = deserialize_annotations::<D>(&map)?;
        Ok(Self {
            data,
            mime_type,
            annotations,
        })
    }
}

impl Serialize for AudioContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serialize_binary_content(serializer, "audio", &self.data, &self.mime_type, &self.annotations)
    }
}

impl<'de> Deserialize<'de> for AudioContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        let (data, mime_type) = deserialize_binary_content::<D>(&map)?;
        let annotations = deserialize_annotations::<D>(&map)?;
        Ok(Self {
            data,
            mime_type,
            annotations,
        })
    }
}

/// Contents of a specific resource or sub-resource.
#[derive(Debug)]
pub enum ResourceContent {
    /// Textual resource content
    Text {
        /// URI of the resource
        uri: String,
        /// MIME type, if known
        mime_type: Option<String>,
        /// The text of the item
        text: String,
    },
    /// Binary resource content
    Blob {
        /// URI of the resource
        uri: String,
        /// MIME type, if known
        mime_type: Option<String>,
        /// The binary payload, base64-encoded on the wire under `data`
        data: ByteStream,
    },
}

impl Serialize for ResourceContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = Map::new();
        match self {
            ResourceContent::Text {
                uri,
                mime_type,
                text,
            } => {
                map.insert("uri".to_string(), Value::String(uri.clone()));
                if let Some(mime_type) = mime_type {
                    map.insert("mimeType".to_string(), Value::String(mime_type.clone()));
                }
                if !text.is_empty() {
                    map.insert("text".to_string(), Value::String(text.clone()));
                }
            }
            ResourceContent::Blob {
                uri,
                mime_type,
                data,
            } => {
                map.insert("uri".to_string(), Value::String(uri.clone()));
                if let Some(mime_type) = mime_type {
                    map.insert("mimeType".to_string(), Value::String(mime_type.clone()));
                }
                let encoded = data
                    .encode_base64()
                    .map_err(|e| S::Error::custom(format!("failed to encode blob: {}", e)))?;
                map.insert("data".to_string(), Value::String(encoded));
            }
        }
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        let uri = map
            .get("uri")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DeError::missing_field("uri"))?
            .to_string();
        let mime_type = map
            .get("mimeType")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        if let Some(encoded) = map.get("data").and_then(|v| v.as_str()) {
            let bytes = BASE64_STANDARD
                .decode(encoded)
                .map_err(|e| DeError::custom(format!("invalid base64 data: {}", e)))?;
            return Ok(ResourceContent::Blob {
                uri,
                mime_type,
                data: ByteStream::from_bytes(bytes),
            });
        }

        let text = map
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Ok(ResourceContent::Text {
            uri,
            mime_type,
            text,
        })
    }
}

/// The contents of a resource embedded into a prompt or tool call result.
///
/// Marshals under a `resource` field with no sibling discriminant; the
/// embedded resource's own shape distinguishes text from blob.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmbeddedResource {
    /// The resource content to embed
    pub resource: ResourceContent,
    /// Optional annotations for the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// Content that can be included in a prompt message.
#[derive(Debug)]
pub enum PromptMessageContent {
    /// Text content
    Text(TextContent),
    /// Image content
    Image(ImageContent),
    /// Audio content
    Audio(AudioContent),
    /// An embedded resource
    Resource(EmbeddedResource),
}

impl From<TextContent> for PromptMessageContent {
    fn from(content: TextContent) -> Self {
        PromptMessageContent::Text(content)
    }
}

impl Serialize for PromptMessageContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            PromptMessageContent::Text(content) => content.serialize(serializer),
            PromptMessageContent::Image(content) => content.serialize(serializer),
            PromptMessageContent::Audio(content) => content.serialize(serializer),
            PromptMessageContent::Resource(content) => content.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for PromptMessageContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.get("resource").is_some() {
            return serde_json::from_value(value)
                .map(PromptMessageContent::Resource)
                .map_err(DeError::custom);
        }
        match value.get("type").and_then(|t| t.as_str()) {
            Some("text") => serde_json::from_value(value)
                .map(PromptMessageContent::Text)
                .map_err(DeError::custom),
            Some("image") => serde_json::from_value(value)
                .map(PromptMessageContent::Image)
                .map_err(DeError::custom),
            Some("audio") => serde_json::from_value(value)
                .map(PromptMessageContent::Audio)
                .map_err(DeError::custom),
            other => Err(DeError::custom(format!(
                "unknown prompt message content type: {:?}",
                other
            ))),
        }
    }
}

/// Content that can be returned by a tool call.
///
/// Text and embedded resources are the only valid kinds.
#[derive(Debug)]
pub enum CallToolContent {
    /// Text content
    Text(TextContent),
    /// An embedded resource
    Resource(EmbeddedResource),
}

impl From<TextContent> for CallToolContent {
    fn from(content: TextContent) -> Self {
        CallToolContent::Text(content)
    }
}

impl Serialize for CallToolContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            CallToolContent::Text(content) => content.serialize(serializer),
            CallToolContent::Resource(content) => content.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CallToolContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.get("resource").is_some() {
            return serde_json::from_value(value)
                .map(CallToolContent::Resource)
                .map_err(DeError::custom);
        }
        match value.get("type").and_then(|t| t.as_str()) {
            Some("text") => serde_json::from_value(value)
                .map(CallToolContent::Text)
                .map_err(DeError::custom),
            other => Err(DeError::custom(format!(
                "unknown tool content type: {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "stream broke"))
        }
    }

    #[test]
    fn test_text_content_shape() {
        let content = TextContent::new("hello");
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hello"}));

        let parsed: TextContent = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, content);
    }

    #[test]
    fn test_text_content_with_annotations() {
        let content = TextContent {
            text: "hi".into(),
            annotations: Some(Annotations {
                audience: Some(vec![Role::User, Role::Assistant]),
                priority: Some(1.0),
            }),
        };
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["annotations"]["audience"], json!(["user", "assistant"]));
        assert_eq!(value["annotations"]["priority"], json!(1.0));
    }

    #[test]
    fn test_image_content_shape() {
        let content = ImageContent {
            data: ByteStream::from_bytes(b"abc".to_vec()),
            mime_type: "image/png".into(),
            annotations: None,
        };
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(
            value,
            json!({"type": "image", "mimeType": "image/png", "data": "YWJj"})
        );
    }

    #[test]
    fn test_audio_content_round_trip() {
        let content = AudioContent {
            data: ByteStream::from_bytes(vec![0u8, 1, 2, 255]),
            mime_type: "audio/wav".into(),
            annotations: None,
        };
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["type"], json!("audio"));

        let parsed: AudioContent = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&parsed).unwrap(), value);
    }

    #[test]
    fn test_byte_stream_is_single_shot() {
        let content = ImageContent {
            data: ByteStream::from_bytes(b"abc".to_vec()),
            mime_type: "image/png".into(),
            annotations: None,
        };
        let first = serde_json::to_value(&content).unwrap();
        let second = serde_json::to_value(&content).unwrap();
        assert_eq!(first["data"], json!("YWJj"));
        assert_eq!(second["data"], json!(""));
    }

    #[test]
    fn test_stream_failure_fails_serialization() {
        let content = ImageContent {
            data: ByteStream::from_reader(FailingReader),
            mime_type: "image/png".into(),
            annotations: None,
        };
        assert!(serde_json::to_value(&content).is_err());
    }

    #[test]
    fn test_resource_content_shapes() {
        let text = ResourceContent::Text {
            uri: "weather://x".into(),
            mime_type: Some("text/plain".into()),
            text: "sunny".into(),
        };
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            json!({"uri": "weather://x", "mimeType": "text/plain", "text": "sunny"})
        );

        let blob = ResourceContent::Blob {
            uri: "weather://y".into(),
            mime_type: None,
            data: ByteStream::from_bytes(b"abc".to_vec()),
        };
        assert_eq!(
            serde_json::to_value(&blob).unwrap(),
            json!({"uri": "weather://y", "data": "YWJj"})
        );
    }

    #[test]
    fn test_resource_content_round_trip() {
        let value = json!({"uri": "weather://y", "mimeType": "application/octet-stream", "data": "YWJj"});
        let parsed: ResourceContent = serde_json::from_value(value.clone()).unwrap();
        match &parsed {
            ResourceContent::Blob { uri, .. } => assert_eq!(uri, "weather://y"),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(serde_json::to_value(&parsed).unwrap(), value);
    }

    #[test]
    fn test_embedded_resource_has_no_discriminant() {
        let embedded = EmbeddedResource {
            resource: ResourceContent::Text {
                uri: "weather://x".into(),
                mime_type: None,
                text: "sunny".into(),
            },
            annotations: None,
        };
        let value = serde_json::to_value(&embedded).unwrap();
        assert_eq!(
            value,
            json!({"resource": {"uri": "weather://x", "text": "sunny"}})
        );
        assert!(value.get("type").is_none());
    }

    #[test]
    fn test_prompt_message_content_dispatch() {
        let parsed: PromptMessageContent =
            serde_json::from_value(json!({"type": "text", "text": "hi"})).unwrap();
        assert!(matches!(parsed, PromptMessageContent::Text(_)));

        let parsed: PromptMessageContent = serde_json::from_value(
            json!({"resource": {"uri": "weather://x", "text": "sunny"}}),
        )
        .unwrap();
        assert!(matches!(parsed, PromptMessageContent::Resource(_)));

        let parsed: Result<PromptMessageContent, _> =
            serde_json::from_value(json!({"type": "video"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_call_tool_content_rejects_media() {
        let parsed: Result<CallToolContent, _> = serde_json::from_value(
            json!({"type": "image", "mimeType": "image/png", "data": "YWJj"}),
        );
        assert!(parsed.is_err());
    }
}
