//! Schema descriptors and the attribute validation pass.
//!
//! A [`Schema`] is the per-variant declaration of which attributes exist and
//! how their values are checked. It is built once (usually into a `static`)
//! and only read afterwards. Field validators are compiled on first use and
//! cached alongside the field.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, error};

use crate::error::SchemaError;
use crate::field::FieldDef;
use crate::slug::title_slug;
use crate::validation::{ValidationErrors, is_empty_value};

// ---------------------------------------------------------------------------
// Draft & options
// ---------------------------------------------------------------------------

/// JSON Schema draft used for built-in value validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaDraft {
    #[default]
    Draft4,
    Draft6,
    Draft7,
    Draft201909,
    Draft202012,
}

impl SchemaDraft {
    /// Meta-schema URI published as `$schema`.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Draft4 => "http://json-schema.org/draft-04/schema#",
            Self::Draft6 => "http://json-schema.org/draft-06/schema#",
            Self::Draft7 => "http://json-schema.org/draft-07/schema#",
            Self::Draft201909 => "https://json-schema.org/draft/2019-09/schema",
            Self::Draft202012 => "https://json-schema.org/draft/2020-12/schema",
        }
    }

    const fn to_jsonschema(self) -> jsonschema::Draft {
        match self {
            Self::Draft4 => jsonschema::Draft::Draft4,
            Self::Draft6 => jsonschema::Draft::Draft6,
            Self::Draft7 => jsonschema::Draft::Draft7,
            Self::Draft201909 => jsonschema::Draft::Draft201909,
            Self::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

/// How field definitions are compiled into validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOptions {
    pub draft: SchemaDraft,
    /// Check `format` keywords (`email`, `uri`, `date-time`, ...).
    pub validate_formats: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            draft: SchemaDraft::Draft4,
            validate_formats: true,
        }
    }
}

impl SchemaOptions {
    fn compile(self, definition: &Value) -> Result<jsonschema::Validator, String> {
        jsonschema::options()
            .with_draft(self.draft.to_jsonschema())
            .should_validate_formats(self.validate_formats)
            .build(definition)
            .map_err(|e| e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

struct Field {
    name: String,
    def: FieldDef,
    validator: OnceLock<Result<jsonschema::Validator, String>>,
}

impl Field {
    fn new(name: String, def: FieldDef) -> Self {
        Self {
            name,
            def,
            validator: OnceLock::new(),
        }
    }

    fn validator(&self, options: SchemaOptions) -> Result<&jsonschema::Validator, &str> {
        self.validator
            .get_or_init(|| options.compile(&self.def.validation_schema()))
            .as_ref()
            .map_err(String::as_str)
    }
}

/// Declared attributes of one model variant, in declaration order.
pub struct Schema {
    type_name: String,
    title: String,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    options: SchemaOptions,
}

impl Schema {
    /// Start declaring the schema of the named type.
    pub fn builder(type_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(type_name)
    }

    /// Load a descriptor from JSON.
    ///
    /// Accepts either the full object published by [`Schema::to_json`] (with a
    /// `properties` member) or a bare map of attribute name → field definition.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDescriptor`] if the document or any field
    /// definition has the wrong shape.
    pub fn from_json(
        type_name: impl Into<String>,
        descriptor: &Value,
        options: SchemaOptions,
    ) -> Result<Self, SchemaError> {
        let Value::Object(document) = descriptor else {
            return Err(SchemaError::InvalidDescriptor(
                "descriptor must be a JSON object".into(),
            ));
        };

        let properties = match document.get("properties") {
            Some(Value::Object(properties)) => properties,
            Some(_) => {
                return Err(SchemaError::InvalidDescriptor(
                    "properties must be a JSON object".into(),
                ));
            }
            None => document,
        };

        let mut builder = SchemaBuilder::new(type_name).options(options);
        for (name, definition) in properties {
            builder = builder.field(name, FieldDef::from_json(name, definition)?);
        }
        Ok(builder.build())
    }

    /// Type name the schema was declared for.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Dash-separated slug of the type name.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn options(&self) -> SchemaOptions {
        self.options
    }

    /// True iff `attribute` is a declared key.
    #[must_use]
    pub fn is_declared(&self, attribute: &str) -> bool {
        self.index.contains_key(attribute)
    }

    #[must_use]
    pub fn field(&self, attribute: &str) -> Option<&FieldDef> {
        self.index.get(attribute).map(|&i| &self.fields[i].def)
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|f| (f.name.as_str(), &f.def))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys of `attributes` that are not declared, in input order.
    pub fn undeclared<'a, I>(&self, attributes: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        attributes
            .into_iter()
            .filter(|name| !self.is_declared(name))
            .collect()
    }

    /// The descriptor as a JSON Schema object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let properties = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.def.to_json()))
            .collect::<Map<_, _>>();

        json!({
            "$schema": self.options.draft.uri(),
            "title": self.title,
            "type": "object",
            "properties": properties,
        })
    }

    /// Compile every field validator now instead of on first validation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDefinition`] for the first field whose
    /// definition is not a valid JSON Schema under the configured draft.
    pub fn check(&self) -> Result<(), SchemaError> {
        for field in &self.fields {
            field
                .validator(self.options)
                .map_err(|reason| SchemaError::InvalidDefinition {
                    field: field.name.clone(),
                    reason: reason.to_string(),
                })?;
        }
        Ok(())
    }

    /// Run the validation pass over an attribute map.
    ///
    /// For each declared field, in declaration order: a required field with an
    /// empty value gets `"<description> is required."`; otherwise a present
    /// value is checked against the field definition, then against the
    /// field's callback. Absent optional fields are skipped.
    #[must_use]
    pub fn validate(&self, attributes: &Map<String, Value>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for field in &self.fields {
            let value = attributes.get(&field.name);

            if field.def.is_required() && is_empty_value(value) {
                errors.insert(
                    &field.name,
                    format!("{} is required.", field.def.description()),
                );
                continue;
            }

            let Some(value) = value else {
                continue;
            };

            if let Some(message) = self.check_value(field, value) {
                errors.insert(&field.name, message);
            }
        }

        debug!(
            schema = %self.title,
            errors = errors.len(),
            "validated attributes"
        );
        errors
    }

    fn check_value(&self, field: &Field, value: &Value) -> Option<String> {
        let description = field.def.description();

        let validator = match field.validator(self.options) {
            Ok(validator) => validator,
            Err(reason) => {
                error!(
                    schema = %self.title,
                    field = %field.name,
                    %reason,
                    "field definition does not compile"
                );
                return Some(format!("{description} has an invalid schema definition."));
            }
        };

        if let Some(failure) = validator.iter_errors(value).next() {
            let path = failure.instance_path.to_string();
            return Some(if path.is_empty() {
                format!("{description}: {failure}.")
            } else {
                format!("{description} ({path}): {failure}.")
            });
        }

        let callback = field.def.callback()?;
        callback(value).err().map(|invalid| invalid.message().to_string())
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("title", &self.title)
            .field(
                "fields",
                &self.fields.iter().map(|x| (&x.name, &x.def)).collect::<Vec<_>>(),
            )
            .field("options", &self.options)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SchemaBuilder
// ---------------------------------------------------------------------------

/// Declares the fields of a [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    type_name: String,
    fields: Vec<(String, FieldDef)>,
    options: SchemaOptions,
}

impl SchemaBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            options: SchemaOptions::default(),
        }
    }

    /// Declare an attribute. Declaring a name twice replaces the earlier
    /// definition and keeps its position.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = def;
        } else {
            self.fields.push((name, def));
        }
        self
    }

    #[must_use]
    pub const fn options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn draft(mut self, draft: SchemaDraft) -> Self {
        self.options.draft = draft;
        self
    }

    #[must_use]
    pub fn build(self) -> Schema {
        let index = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        let fields = self
            .fields
            .into_iter()
            .map(|(name, def)| Field::new(name, def))
            .collect();

        Schema {
            title: title_slug(&self.type_name),
            type_name: self.type_name,
            fields,
            index,
            options: self.options,
        }
    }
}
