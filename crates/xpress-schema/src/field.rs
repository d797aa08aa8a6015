//! Field definitions: the per-attribute entries of a schema descriptor.
//!
//! A [`FieldDef`] carries the JSON type, the `required` flag, the human-readable
//! description used in error messages, any further JSON Schema keywords
//! (`enum`, `format`, `minimum`, `items`, `properties`, ...), and an optional
//! validation callback that runs after the built-in checks pass.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::SchemaError;

/// Keys of a serialized field definition that are not JSON Schema constraints.
const TYPE_KEY: &str = "type";
const REQUIRED_KEY: &str = "required";
const DESCRIPTION_KEY: &str = "description";
const PROPERTIES_KEY: &str = "properties";
const ITEMS_KEY: &str = "items";

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Primitive or structured JSON type of a declared attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl FieldType {
    /// Return the JSON Schema type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            "null" => Ok(Self::Null),
            other => Err(SchemaError::InvalidDescriptor(format!(
                "unknown field type '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation callbacks
// ---------------------------------------------------------------------------

/// Rejection returned by a validation callback. The message is surfaced verbatim
/// in the model's error map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvalidParam {
    message: String,
}

impl InvalidParam {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Pluggable predicate run after built-in validation succeeds.
pub type ValidateCallback = Arc<dyn Fn(&Value) -> Result<(), InvalidParam> + Send + Sync>;

// ---------------------------------------------------------------------------
// FieldDef
// ---------------------------------------------------------------------------

/// Declaration of a single model attribute.
#[derive(Clone)]
pub struct FieldDef {
    kind: FieldType,
    required: bool,
    description: String,
    constraints: Map<String, Value>,
    callback: Option<ValidateCallback>,
}

impl FieldDef {
    /// New optional field of the given type.
    pub fn new(kind: FieldType, description: impl Into<String>) -> Self {
        Self {
            kind,
            required: false,
            description: description.into(),
            constraints: Map::new(),
            callback: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(FieldType::String, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(FieldType::Number, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(FieldType::Integer, description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new(FieldType::Boolean, description)
    }

    pub fn object(description: impl Into<String>) -> Self {
        Self::new(FieldType::Object, description)
    }

    pub fn array(description: impl Into<String>) -> Self {
        Self::new(FieldType::Array, description)
    }

    /// Derive a field definition from a Rust type's [`JsonSchema`] implementation.
    ///
    /// The generated `$schema`, `title`, and `description` keywords are dropped;
    /// everything else becomes a constraint.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDescriptor`] if the generated schema does
    /// not declare a single JSON type.
    pub fn typed<T: JsonSchema>(description: impl Into<String>) -> Result<Self, SchemaError> {
        let generated = serde_json::to_value(schemars::schema_for!(T))
            .map_err(|e| SchemaError::InvalidDescriptor(e.to_string()))?;
        let Value::Object(mut constraints) = generated else {
            return Err(SchemaError::InvalidDescriptor(format!(
                "schema generated for {} is not an object",
                T::schema_name()
            )));
        };

        constraints.remove("$schema");
        constraints.remove("title");
        constraints.remove(DESCRIPTION_KEY);

        let kind = match constraints.remove(TYPE_KEY) {
            Some(Value::String(name)) => name.parse()?,
            _ => {
                return Err(SchemaError::InvalidDescriptor(format!(
                    "schema generated for {} has no single JSON type",
                    T::schema_name()
                )));
            }
        };

        Ok(Self {
            kind,
            required: false,
            description: description.into(),
            constraints: descriptor_shape(constraints),
            callback: None,
        })
    }

    /// Parse a field definition from its JSON form (`{ "type": ..., "required": ..., ... }`).
    ///
    /// A missing `description` falls back to the attribute name. Nested
    /// `properties` may mark themselves `"required": true`; a draft-style
    /// `required` array of names is accepted too.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDescriptor`] if the value is not an object,
    /// has no known `type`, or carries a non-boolean `required` / non-string
    /// `description`.
    pub fn from_json(name: &str, value: &Value) -> Result<Self, SchemaError> {
        let Value::Object(entries) = value else {
            return Err(SchemaError::InvalidDescriptor(format!(
                "definition of '{name}' must be an object"
            )));
        };

        let mut constraints = entries.clone();

        let kind = match constraints.remove(TYPE_KEY) {
            Some(Value::String(kind)) => kind.parse()?,
            Some(_) => {
                return Err(SchemaError::InvalidDescriptor(format!(
                    "'{name}': type must be a string"
                )));
            }
            None => {
                return Err(SchemaError::InvalidDescriptor(format!(
                    "'{name}': missing type"
                )));
            }
        };

        let required = match constraints.remove(REQUIRED_KEY) {
            None => false,
            Some(Value::Bool(required)) => required,
            Some(names @ Value::Array(_)) => {
                constraints.insert(REQUIRED_KEY.to_string(), names);
                false
            }
            Some(_) => {
                return Err(SchemaError::InvalidDescriptor(format!(
                    "'{name}': required must be a boolean"
                )));
            }
        };

        let description = match constraints.remove(DESCRIPTION_KEY) {
            None => name.to_string(),
            Some(Value::String(description)) => description,
            Some(_) => {
                return Err(SchemaError::InvalidDescriptor(format!(
                    "'{name}': description must be a string"
                )));
            }
        };

        Ok(Self {
            kind,
            required,
            description,
            constraints: descriptor_shape(constraints),
            callback: None,
        })
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict values to a fixed set.
    #[must_use]
    pub fn enumeration<I, T>(self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect::<Vec<_>>();
        self.constraint("enum", Value::Array(values))
    }

    #[must_use]
    pub fn format(self, format: &str) -> Self {
        self.constraint("format", format)
    }

    #[must_use]
    pub fn pattern(self, pattern: &str) -> Self {
        self.constraint("pattern", pattern)
    }

    #[must_use]
    pub fn minimum(self, minimum: impl Into<Value>) -> Self {
        self.constraint("minimum", minimum)
    }

    #[must_use]
    pub fn maximum(self, maximum: impl Into<Value>) -> Self {
        self.constraint("maximum", maximum)
    }

    #[must_use]
    pub fn min_length(self, length: u64) -> Self {
        self.constraint("minLength", length)
    }

    #[must_use]
    pub fn max_length(self, length: u64) -> Self {
        self.constraint("maxLength", length)
    }

    /// Element definition of an array field.
    #[must_use]
    pub fn items(self, item: &Self) -> Self {
        self.constraint(ITEMS_KEY, item.to_json())
    }

    /// Nested property of an object field, published in the same shape as a
    /// top-level field.
    #[must_use]
    pub fn property(mut self, name: &str, field: &Self) -> Self {
        if let Value::Object(properties) = self
            .constraints
            .entry(PROPERTIES_KEY)
            .or_insert_with(|| Value::Object(Map::new()))
        {
            properties.insert(name.to_string(), field.to_json());
        }
        self
    }

    /// Any other JSON Schema keyword.
    #[must_use]
    pub fn constraint(mut self, keyword: &str, value: impl Into<Value>) -> Self {
        self.constraints.insert(keyword.to_string(), value.into());
        self
    }

    /// Attach a callback run after the built-in checks pass.
    #[must_use]
    pub fn validate_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value) -> Result<(), InvalidParam> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub const fn kind(&self) -> FieldType {
        self.kind
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn constraints(&self) -> &Map<String, Value> {
        &self.constraints
    }

    #[must_use]
    pub fn callback(&self) -> Option<&ValidateCallback> {
        self.callback.as_ref()
    }

    /// The definition as published in a model's schema `properties`.
    ///
    /// Nested properties carry their own boolean `required` flag.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut entries = Map::new();
        entries.insert(TYPE_KEY.to_string(), Value::from(self.kind.as_str()));
        entries.insert(REQUIRED_KEY.to_string(), Value::Bool(self.required));
        entries.insert(
            DESCRIPTION_KEY.to_string(),
            Value::from(self.description.as_str()),
        );
        for (keyword, value) in descriptor_shape(self.constraints.clone()) {
            if !is_reserved(&keyword) {
                entries.insert(keyword, value);
            }
        }
        Value::Object(entries)
    }

    /// The definition handed to the JSON Schema validator.
    ///
    /// The field's own `required` flag is checked before the validator runs
    /// and is left out. Nested boolean flags become the parent's `required`
    /// array, which is what draft 4 and later expect.
    #[must_use]
    pub fn validation_schema(&self) -> Value {
        let mut entries = Map::new();
        entries.insert(TYPE_KEY.to_string(), Value::from(self.kind.as_str()));
        entries.insert(
            DESCRIPTION_KEY.to_string(),
            Value::from(self.description.as_str()),
        );
        for (keyword, value) in draft_shape(&self.constraints) {
            if !is_reserved(&keyword) {
                entries.insert(keyword, value);
            }
        }
        Value::Object(entries)
    }
}

fn is_reserved(keyword: &str) -> bool {
    matches!(keyword, TYPE_KEY | REQUIRED_KEY | DESCRIPTION_KEY)
}

/// Rewrite a schema node so every nested property states `"required": true`
/// itself instead of being listed in the node's `required` array.
fn descriptor_shape(mut node: Map<String, Value>) -> Map<String, Value> {
    let listed = match node.remove(REQUIRED_KEY) {
        Some(Value::Array(names)) => names,
        Some(flag) => {
            node.insert(REQUIRED_KEY.to_string(), flag);
            Vec::new()
        }
        None => Vec::new(),
    };

    if !listed.is_empty() {
        let properties = node
            .entry(PROPERTIES_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(properties) = properties {
            for name in listed.iter().filter_map(Value::as_str) {
                if let Value::Object(property) = properties
                    .entry(name.to_string())
                    .or_insert_with(|| Value::Object(Map::new()))
                {
                    property.insert(REQUIRED_KEY.to_string(), Value::Bool(true));
                }
            }
        }
    }

    if let Some(Value::Object(properties)) = node.remove(PROPERTIES_KEY) {
        let properties = properties
            .into_iter()
            .map(|(name, property)| (name, map_node(property, descriptor_shape)))
            .collect();
        node.insert(PROPERTIES_KEY.to_string(), Value::Object(properties));
    }
    if let Some(items) = node.remove(ITEMS_KEY) {
        node.insert(ITEMS_KEY.to_string(), map_items(items, descriptor_shape));
    }
    node
}

/// Inverse of [`descriptor_shape`]: boolean flags on nested properties move
/// into the parent's `required` array and the node's own flag is dropped.
fn draft_shape(node: &Map<String, Value>) -> Map<String, Value> {
    let mut draft = node.clone();
    if matches!(draft.get(REQUIRED_KEY), Some(Value::Bool(_))) {
        draft.remove(REQUIRED_KEY);
    }

    if let Some(Value::Object(properties)) = draft.remove(PROPERTIES_KEY) {
        let mut required = match draft.remove(REQUIRED_KEY) {
            Some(Value::Array(names)) => names,
            _ => Vec::new(),
        };
        let mut converted = Map::new();
        for (name, property) in properties {
            if let Value::Object(entries) = &property {
                let flagged = Value::from(name.as_str());
                if entries.get(REQUIRED_KEY) == Some(&Value::Bool(true))
                    && !required.contains(&flagged)
                {
                    required.push(flagged);
                }
            }
            converted.insert(name, map_node(property, |entries| draft_shape(&entries)));
        }
        draft.insert(PROPERTIES_KEY.to_string(), Value::Object(converted));
        if !required.is_empty() {
            draft.insert(REQUIRED_KEY.to_string(), Value::Array(required));
        }
    }
    if let Some(items) = draft.remove(ITEMS_KEY) {
        draft.insert(
            ITEMS_KEY.to_string(),
            map_items(items, |entries| draft_shape(&entries)),
        );
    }
    draft
}

fn map_node(value: Value, rewrite: impl Fn(Map<String, Value>) -> Map<String, Value>) -> Value {
    match value {
        Value::Object(entries) => Value::Object(rewrite(entries)),
        other => other,
    }
}

fn map_items(items: Value, rewrite: impl Fn(Map<String, Value>) -> Map<String, Value>) -> Value {
    match items {
        Value::Array(tuple) => Value::Array(
            tuple
                .into_iter()
                .map(|item| map_node(item, &rewrite))
                .collect(),
        ),
        other => map_node(other, rewrite),
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("description", &self.description)
            .field("constraints", &self.constraints)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}
