//! Parameter schemas for tool inputs.
//!
//! A [`ParameterSchema`] wraps the JSON schema of a tool's input so it can be
//! introspected when the tool is registered, handed to the LLM as the
//! function-calling declaration, and used to validate incoming arguments.
//!
//! Any type implementing [`ToolParameters`] (blanket-implemented for
//! `DeserializeOwned + JsonSchema`) can be wrapped with
//! [`ParameterSchema::of`]. Field descriptions come from doc comments.
//!
//! ```rust,ignore
//! use goat::schema::ParameterSchema;
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct BalanceParams {
//!     /// The address to query.
//!     address: String,
//! }
//!
//! let schema = ParameterSchema::of::<BalanceParams>();
//! assert_eq!(schema.name(), "BalanceParams");
//! assert!(schema.validate(&serde_json::json!({"address": "0xabc"})).is_ok());
//! ```

use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ToolError;
use crate::tool::ToolResult;

/// Types usable as the parameters argument of a tool method.
pub trait ToolParameters: DeserializeOwned + JsonSchema + Send + 'static {}

impl<T> ToolParameters for T where T: DeserializeOwned + JsonSchema + Send + 'static {}

/// Named structural description of a tool's input fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSchema {
    name: String,
    schema: Value,
}

impl ParameterSchema {
    /// Derive the schema of `T`.
    #[must_use]
    pub fn of<T: JsonSchema>() -> Self {
        let schema = Value::from(schemars::schema_for!(T));
        Self::new(T::schema_name().into_owned(), schema)
    }

    /// Wrap a hand-written JSON schema.
    ///
    /// The `$schema` and `title` keys are dropped; object schemas always get a
    /// `properties` map.
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema: normalize(schema),
        }
    }

    /// A schema accepting only an empty object.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(
            "Empty",
            serde_json::json!({
                "type": "object",
                "properties": {},
                "required": [],
                "additionalProperties": false
            }),
        )
    }

    /// Schema name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The LLM-facing JSON schema.
    #[inline]
    #[must_use]
    pub const fn descriptor(&self) -> &Value {
        &self.schema
    }

    /// Names of the required fields.
    #[must_use]
    pub fn required(&self) -> Vec<&str> {
        self.schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Per-field view of the schema: type, description, optionality, default.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        let required = self.required();
        self.properties()
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, field)| FieldDescriptor::from_property(name, field, &required))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check `input` against the schema.
    ///
    /// Checks top-level structure only: `input` must be an object, every
    /// required field must be present, present fields must match their
    /// declared primitive type, and unknown fields are rejected when the
    /// schema sets `additionalProperties: false`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] describing the first violation.
    pub fn validate(&self, input: &Value) -> ToolResult<()> {
        let Some(object) = input.as_object() else {
            return Err(ToolError::invalid_args(format!(
                "expected an object for {}, got {}",
                self.name,
                json_type_name(input)
            )));
        };

        for name in self.required() {
            if !object.contains_key(name) {
                return Err(ToolError::invalid_args(format!(
                    "missing required field '{name}'"
                )));
            }
        }

        let properties = self.properties();
        for (key, value) in object {
            match properties.and_then(|props| props.get(key)) {
                Some(field) => {
                    if let Some(types) = field.get("type")
                        && !matches_declared_type(types, value)
                    {
                        return Err(ToolError::invalid_args(format!(
                            "field '{key}' expected {types}, got {}",
                            json_type_name(value)
                        )));
                    }
                }
                None if self.denies_unknown_fields() => {
                    return Err(ToolError::invalid_args(format!("unknown field '{key}'")));
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Append a parameter listing to `description`.
    ///
    /// For adapters whose function-calling format has no room for a schema.
    #[must_use]
    pub fn describe_in(&self, description: &str) -> String {
        let fields = self.fields();
        if fields.is_empty() {
            return description.to_owned();
        }

        let mut out = format!("{description}\n\nParameters:");
        for field in fields {
            out.push_str("\n- ");
            out.push_str(&field.name);
            if field.optional {
                out.push_str(" (optional)");
            }
            if let Some(kind) = &field.kind {
                out.push_str(" (");
                out.push_str(kind);
                out.push(')');
            }
            if let Some(text) = &field.description {
                out.push_str(": ");
                out.push_str(text);
            }
        }
        out
    }

    fn properties(&self) -> Option<&Map<String, Value>> {
        self.schema.get("properties").and_then(Value::as_object)
    }

    fn denies_unknown_fields(&self) -> bool {
        matches!(self.schema.get("additionalProperties"), Some(Value::Bool(false)))
    }
}

/// One field of a [`ParameterSchema`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// JSON type of the field, when it declares a primitive one.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the field may be omitted.
    pub optional: bool,
    /// Default value, if the schema declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDescriptor {
    fn from_property(name: &str, field: &Value, required: &[&str]) -> Self {
        let (kind, nullable) = match field.get("type") {
            Some(Value::String(kind)) => (Some(kind.clone()), false),
            Some(Value::Array(kinds)) => {
                let kinds: Vec<&str> = kinds.iter().filter_map(Value::as_str).collect();
                let kind = kinds.iter().find(|k| **k != "null").map(|k| (*k).to_owned());
                (kind, kinds.contains(&"null"))
            }
            _ => (None, false),
        };

        Self {
            name: name.to_owned(),
            kind,
            description: field
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_owned),
            optional: nullable || !required.contains(&name),
            default: field.get("default").cloned(),
        }
    }
}

/// Deserialize validated tool input into its typed form.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] if `value` does not fit `T`.
pub fn decode_parameters<T: DeserializeOwned>(value: Value) -> ToolResult<T> {
    serde_json::from_value(value).map_err(|e| ToolError::invalid_args(e.to_string()))
}

fn normalize(mut schema: Value) -> Value {
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
        let is_object = object.get("type").and_then(Value::as_str) == Some("object");
        if is_object && !object.contains_key("properties") {
            object.insert("properties".to_owned(), Value::Object(Map::new()));
        }
    }
    schema
}

fn matches_declared_type(types: &Value, value: &Value) -> bool {
    match types {
        Value::String(kind) => matches_type(kind, value),
        Value::Array(kinds) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| matches_type(kind, value)),
        _ => true,
    }
}

fn matches_type(kind: &str, value: &Value) -> bool {
    match kind {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    /// Parameters for a token transfer.
    #[allow(dead_code)]
    #[derive(Debug, Deserialize, JsonSchema)]
    struct TransferParams {
        /// Recipient address.
        to: String,
        /// Amount in base units.
        amount: u64,
        /// Optional memo attached to the transfer.
        memo: Option<String>,
    }

    fn transfer_schema() -> ParameterSchema {
        ParameterSchema::of::<TransferParams>()
    }

    mod derived {
        use super::*;

        #[test]
        fn name_comes_from_type() {
            assert_eq!(transfer_schema().name(), "TransferParams");
        }

        #[test]
        fn strips_meta_keys() {
            let schema = transfer_schema();
            assert!(schema.descriptor().get("$schema").is_none());
            assert!(schema.descriptor().get("title").is_none());
            assert_eq!(schema.descriptor()["type"], "object");
        }

        #[test]
        fn required_excludes_options() {
            let schema = transfer_schema();
            let mut required = schema.required();
            required.sort_unstable();
            assert_eq!(required, vec!["amount", "to"]);
        }

        #[test]
        fn fields_carry_descriptions_and_optionality() {
            let fields = transfer_schema().fields();
            let to = fields.iter().find(|f| f.name == "to").unwrap();
            assert_eq!(to.kind.as_deref(), Some("string"));
            assert_eq!(to.description.as_deref(), Some("Recipient address."));
            assert!(!to.optional);

            let memo = fields.iter().find(|f| f.name == "memo").unwrap();
            assert!(memo.optional);
            assert_eq!(memo.kind.as_deref(), Some("string"));
        }
    }

    mod validate {
        use super::*;

        #[test]
        fn accepts_complete_input() {
            let input = serde_json::json!({"to": "0xabc", "amount": 5});
            assert!(transfer_schema().validate(&input).is_ok());
        }

        #[test]
        fn rejects_missing_required_field() {
            let input = serde_json::json!({"to": "0xabc"});
            let err = transfer_schema().validate(&input).unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments(_)));
            assert!(err.to_string().contains("amount"));
        }

        #[test]
        fn rejects_wrong_primitive_type() {
            let input = serde_json::json!({"to": 42, "amount": 5});
            let err = transfer_schema().validate(&input).unwrap_err();
            assert!(err.to_string().contains("'to'"));
        }

        #[test]
        fn accepts_null_for_optional_field() {
            let input = serde_json::json!({"to": "0xabc", "amount": 5, "memo": null});
            assert!(transfer_schema().validate(&input).is_ok());
        }

        #[test]
        fn rejects_non_object() {
            let err = transfer_schema()
                .validate(&serde_json::json!("0xabc"))
                .unwrap_err();
            assert!(err.to_string().contains("expected an object"));
        }

        #[test]
        fn empty_schema_rejects_unknown_fields() {
            let schema = ParameterSchema::empty();
            assert!(schema.validate(&serde_json::json!({})).is_ok());
            assert!(schema.validate(&serde_json::json!({"x": 1})).is_err());
        }
    }

    mod hand_written {
        use super::*;

        #[test]
        fn object_schema_gets_properties() {
            let schema = ParameterSchema::new("Bare", serde_json::json!({"type": "object"}));
            assert!(schema.descriptor()["properties"].is_object());
            assert!(schema.fields().is_empty());
        }

        #[test]
        fn default_is_reported() {
            let schema = ParameterSchema::new(
                "Paging",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "limit": {"type": "integer", "default": 20, "description": "Page size"}
                    }
                }),
            );
            let fields = schema.fields();
            assert_eq!(fields[0].default, Some(serde_json::json!(20)));
            assert!(fields[0].optional);
        }
    }

    #[test]
    fn describe_in_lists_fields() {
        let text = transfer_schema().describe_in("Transfer tokens");
        assert!(text.starts_with("Transfer tokens\n\nParameters:"));
        assert!(text.contains("- to (string): Recipient address."));
        assert!(text.contains("- memo (optional) (string)"));
    }

    #[test]
    fn describe_in_without_fields_is_unchanged() {
        assert_eq!(ParameterSchema::empty().describe_in("Get chain"), "Get chain");
    }

    #[test]
    fn decode_parameters_reports_invalid_arguments() {
        let err = decode_parameters::<TransferParams>(serde_json::json!({"to": "x"})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
