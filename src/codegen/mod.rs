//! Typed server generator
//!
//! Given a declarative [`ServerDefinition`], this module emits a single
//! Rust source file containing per-prompt and per-tool handler traits,
//! typed request records, enum types materialized from JSON-Schema `enum`
//! constraints, static catalogs with embedded schema documents, dispatch
//! routers that unmarshal and schema-validate each call, and a
//! `new_handler` constructor wiring user handlers to the dispatcher.
//!
//! Generation is deterministic: for identical input the output is
//! byte-identical.

mod generator;

use std::io;

use serde_json::{json, Map, Value};

use crate::errors::Error;
use crate::protocol::{Implementation, ServerCapabilities};
use crate::types::prompts::Prompt;
use crate::types::resources::ResourceTemplate;

use generator::Generator;

/// The definition of an MCP server, fixed at generation time.
#[derive(Debug, Clone, Default)]
pub struct ServerDefinition {
    /// Capabilities this server advertises
    pub capabilities: ServerCapabilities,
    /// Implementation identity reported from `initialize`
    pub implementation: Implementation,
    /// Prompts offered by this server, in catalog order
    pub prompts: Vec<Prompt>,
    /// Resource templates offered by this server, in catalog order
    pub resource_templates: Vec<ResourceTemplate>,
    /// Tools offered by this server, in catalog order
    pub tools: Vec<ToolSpec>,
}

/// A tool definition with a structural input schema.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Name of the tool, as it appears on the wire
    pub name: String,
    /// Human-readable description of the tool
    pub description: Option<String>,
    /// Structural description of the tool's input
    pub input_schema: InputSchema,
}

/// A structural description of a tool's input object.
///
/// Field order is declaration order and is preserved in the generated
/// request record and the derived JSON-Schema document.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    /// The fields of the input object
    pub fields: Vec<SchemaField>,
}

impl InputSchema {
    /// An input schema over the given fields.
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    /// Derive the JSON-Schema document for this input.
    ///
    /// This exact document is embedded in the generated catalog and used
    /// for runtime validation at `tools/call` time.
    pub fn to_schema_document(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            let mut property = Map::new();
            property.insert(
                "type".to_string(),
                Value::String(field.ty.json_type().to_string()),
            );
            if let Some(description) = &field.description {
                property.insert(
                    "description".to_string(),
                    Value::String(description.clone()),
                );
            }
            if !field.enum_values.is_empty() {
                property.insert(
                    "enum".to_string(),
                    Value::Array(field.enum_values.clone()),
                );
            }
            properties.insert(field.name.clone(), Value::Object(property));
            if field.required {
                required.push(Value::String(field.name.clone()));
            }
        }

        let mut document = Map::new();
        document.insert(
            "$schema".to_string(),
            json!("http://json-schema.org/draft-07/schema#"),
        );
        document.insert("type".to_string(), json!("object"));
        document.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            document.insert("required".to_string(), Value::Array(required));
        }
        document.insert("additionalProperties".to_string(), json!(false));
        Value::Object(document)
    }
}

/// One field of a tool's input object.
#[derive(Debug, Clone)]
pub struct SchemaField {
    /// Wire name of the field (snake or kebab form)
    pub name: String,
    /// Structural type of the field
    pub ty: FieldType,
    /// Description carried into the schema document
    pub description: Option<String>,
    /// Whether the field appears in the schema's `required` list
    pub required: bool,
    /// Optional `enum` constraint; a non-empty list retypes the generated
    /// record field to a nominal enum type
    pub enum_values: Vec<Value>,
}

impl SchemaField {
    /// A required field with no constraints.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            required: true,
            enum_values: Vec::new(),
        }
    }

    /// Set the field description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Constrain the field to the given enum values.
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = values;
        self
    }
}

/// The structural type of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A JSON string
    String,
    /// A JSON number
    Number,
    /// A JSON integer
    Integer,
    /// A JSON boolean
    Boolean,
}

impl FieldType {
    /// The JSON-Schema `type` keyword for this field type.
    pub fn json_type(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }

    pub(crate) fn rust_type(self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Number => "f64",
            FieldType::Integer => "i64",
            FieldType::Boolean => "bool",
        }
    }
}

/// The underlying representation of a generated enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnumRepr {
    /// Every enum value is an integer-valued number
    Int,
    /// Mixed or string values
    Str,
}

/// Classify an enum constraint: integer representation when every value is
/// an integer-valued number, string otherwise.
pub(crate) fn enum_repr(values: &[Value]) -> EnumRepr {
    if !values.is_empty() && values.iter().all(|v| value_as_integer(v).is_some()) {
        EnumRepr::Int
    } else {
        EnumRepr::Str
    }
}

pub(crate) fn value_as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Convert a wire identifier to PascalCase.
///
/// `_` and `;` are treated as word boundaries, spaces are removed, and each
/// word is title-cased. A leading digit is prefixed with `V` so the result
/// is a valid identifier.
pub(crate) fn pascal_case(name: &str) -> String {
    let cleaned = name.replace(';', "_").replace(' ', "");
    let mut out = String::with_capacity(cleaned.len());
    for word in cleaned.split('_') {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'V');
    }
    out
}

/// Convert a wire identifier to a snake_case Rust identifier.
pub(crate) fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

/// Convert a wire identifier to a SCREAMING_SNAKE_CASE Rust identifier.
pub(crate) fn screaming_snake_case(name: &str) -> String {
    snake_case(name).to_uppercase()
}

/// Generate the server source code from the server definition.
///
/// Writes a single Rust source artifact to `writer`, suitable for inclusion
/// as a module named `module_name` in the consuming crate. No files are
/// opened; the caller supplies the writer.
pub fn generate<W: io::Write>(
    writer: &mut W,
    def: &ServerDefinition,
    module_name: &str,
) -> Result<(), Error> {
    let module = if module_name.is_empty() {
        "mcpgen"
    } else {
        module_name
    };
    let source = Generator::new(def, module).generate();
    writer.write_all(source.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("convert_temperature"), "ConvertTemperature");
        assert_eq!(pascal_case("from_unit"), "FromUnit");
        assert_eq!(pascal_case("weather;report"), "WeatherReport");
        assert_eq!(pascal_case("with space"), "Withspace");
        assert_eq!(pascal_case("2x"), "V2x");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("convert_temperature"), "convert_temperature");
        assert_eq!(snake_case("from-unit"), "from_unit");
        assert_eq!(
            screaming_snake_case("convert_temperature"),
            "CONVERT_TEMPERATURE"
        );
    }

    #[test]
    fn test_enum_repr_classification() {
        assert_eq!(enum_repr(&[json!(1), json!(2)]), EnumRepr::Int);
        assert_eq!(enum_repr(&[json!(1.0), json!(2.0)]), EnumRepr::Int);
        assert_eq!(enum_repr(&[json!(1.5), json!(2)]), EnumRepr::Str);
        assert_eq!(enum_repr(&[json!("a"), json!("b")]), EnumRepr::Str);
        assert_eq!(enum_repr(&[json!(1), json!("b")]), EnumRepr::Str);
    }

    #[test]
    fn test_schema_document_shape() {
        let schema = InputSchema::new(vec![
            SchemaField::new("temperature", FieldType::Number)
                .with_description("Temperature value to convert"),
            SchemaField::new("from_unit", FieldType::String)
                .with_enum(vec![json!("celsius"), json!("fahrenheit")]),
            SchemaField::new("verbose", FieldType::Boolean).optional(),
        ]);
        let document = schema.to_schema_document();
        assert_eq!(document["type"], json!("object"));
        assert_eq!(document["additionalProperties"], json!(false));
        assert_eq!(
            document["properties"]["from_unit"]["enum"],
            json!(["celsius", "fahrenheit"])
        );
        assert_eq!(document["required"], json!(["temperature", "from_unit"]));
        assert!(document["properties"]["verbose"]["description"].is_null());
    }
}
