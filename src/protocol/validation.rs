//! JSON-Schema validation helper
//!
//! Generated tool shims validate unmarshaled tool arguments against the
//! schema document embedded in the tool catalog before invoking user code.

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::errors::Error;

/// Validate a document against a JSON schema given as its serialized text.
///
/// All violations are collected into a single error message so the client
/// sees every failing constraint at once.
pub fn validate_json_schema(schema: &str, document: &Value) -> Result<(), Error> {
    let schema_value: Value = serde_json::from_str(schema)
        .map_err(|e| Error::SchemaValidation(format!("failed to parse schema: {}", e)))?;

    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|e| Error::SchemaValidation(format!("failed to compile schema: {}", e)))?;

    if let Err(errors) = compiled.validate(document) {
        let error_msgs: Vec<String> = errors.map(|e| format!("{}", e)).collect();
        return Err(Error::SchemaValidation(format!(
            "invalid tool arguments: {}",
            error_msgs.join(", ")
        )));
    }
    Ok(())
}
