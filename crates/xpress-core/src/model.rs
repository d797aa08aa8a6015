//! Schema-validated model instances.
//!
//! A model variant is a marker type implementing [`ModelVariant`]; it owns one
//! `&'static Schema` shared by every [`Model`] of that variant. A `Model<V>`
//! is an attribute bag whose keys are always a subset of the schema's
//! declared keys: every read and write is checked against the schema and
//! fails fast on an undeclared name.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use xpress_schema::{Schema, ValidationErrors};

use crate::errors::ModelError;

/// A model variant: a type with a declared attribute schema.
///
/// Implement it by hand with a `static` schema, or with [`model_variant!`].
pub trait ModelVariant: 'static {
    fn schema() -> &'static Schema;
}

/// Implement [`ModelVariant`] for a marker type, building its schema on first use.
///
/// ```
/// use xpress_core::{FieldDef, Schema, model_variant};
///
/// pub struct Person;
///
/// model_variant!(
///     Person,
///     Schema::builder("Person")
///         .field("name", FieldDef::string("Name").required())
///         .build()
/// );
/// ```
#[macro_export]
macro_rules! model_variant {
    ($variant:ty, $schema:expr) => {
        impl $crate::ModelVariant for $variant {
            fn schema() -> &'static $crate::Schema {
                static SCHEMA: ::std::sync::LazyLock<$crate::Schema> =
                    ::std::sync::LazyLock::new(|| $schema);
                &SCHEMA
            }
        }
    };
}

/// One entity of variant `V`.
pub struct Model<V: ModelVariant> {
    attributes: Map<String, Value>,
    modified_keys: HashSet<String>,
    is_valid: Option<bool>,
    errors: ValidationErrors,
    variant: PhantomData<fn() -> V>,
}

impl<V: ModelVariant> Model<V> {
    /// Build an instance. A non-empty `attributes` behaves exactly like
    /// [`Model::update`]; an empty one leaves the instance empty.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UndeclaredAttribute` if any key is not declared.
    pub fn new<I, K>(attributes: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut model = Self::default();
        model.update(attributes)?;
        Ok(model)
    }

    /// The variant's schema.
    #[must_use]
    pub fn schema() -> &'static Schema {
        V::schema()
    }

    /// The variant's schema as a JSON Schema object
    /// (`$schema`, `title`, `type`, `properties`).
    #[must_use]
    pub fn json_schema() -> Value {
        V::schema().to_json()
    }

    /// True iff `attribute` is declared by the schema, set or not.
    #[must_use]
    pub fn is_declared(&self, attribute: &str) -> bool {
        V::schema().is_declared(attribute)
    }

    /// True iff `attribute` is declared and currently holds a value.
    #[must_use]
    pub fn is_set(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Store a value and mark the attribute as modified.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UndeclaredAttribute` if the name is not declared.
    pub fn set(&mut self, attribute: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        self.ensure_declared(attribute)?;
        self.attributes.insert(attribute.to_string(), value.into());
        self.modified_keys.insert(attribute.to_string());
        Ok(())
    }

    /// Current value, or `None` if the attribute was never set.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UndeclaredAttribute` if the name is not declared.
    pub fn get(&self, attribute: &str) -> Result<Option<&Value>, ModelError> {
        self.ensure_declared(attribute)?;
        Ok(self.attributes.get(attribute))
    }

    /// Current value deserialized into `T`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UndeclaredAttribute` if the name is not declared,
    /// or `ModelError::Decode` if the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, attribute: &str) -> Result<Option<T>, ModelError> {
        self.get(attribute)?
            .map(|value| {
                T::deserialize(value).map_err(|source| ModelError::Decode {
                    attribute: attribute.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Replace the whole attribute map.
    ///
    /// All-or-nothing: if any key is undeclared nothing changes. Keys set
    /// before the call and missing from `attributes` are dropped. Modified-key
    /// tracking is left as is.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UndeclaredAttribute` naming every undeclared key.
    pub fn update<I, K>(&mut self, attributes: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let attributes = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect::<Map<_, _>>();

        let undeclared = V::schema().undeclared(attributes.keys().map(String::as_str));
        if !undeclared.is_empty() {
            warn!(
                model = V::schema().title(),
                attributes = ?undeclared,
                "rejected update with undeclared attributes"
            );
            return Err(ModelError::undeclared(undeclared));
        }

        self.attributes = attributes;
        Ok(())
    }

    /// Run the validation pass, replacing the previous error map.
    pub fn validate(&mut self) -> bool {
        self.errors = V::schema().validate(&self.attributes);
        let valid = self.errors.is_empty();
        self.is_valid = Some(valid);
        debug!(model = V::schema().title(), valid, "model validated");
        valid
    }

    /// Outcome of the last [`Model::validate`], `None` if it never ran.
    #[must_use]
    pub const fn is_valid(&self) -> Option<bool> {
        self.is_valid
    }

    /// Errors of the last [`Model::validate`].
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Current values of attributes written through [`Model::set`].
    ///
    /// Values come from the current attribute map, so a key dropped by a
    /// later [`Model::update`] is not returned.
    #[must_use]
    pub fn modified_attributes(&self) -> Map<String, Value> {
        self.attributes
            .iter()
            .filter(|(key, _)| self.modified_keys.contains(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn ensure_declared(&self, attribute: &str) -> Result<(), ModelError> {
        if self.is_declared(attribute) {
            Ok(())
        } else {
            warn!(
                model = V::schema().title(),
                attribute, "undeclared attribute access"
            );
            Err(ModelError::undeclared([attribute]))
        }
    }
}

impl<V: ModelVariant> Default for Model<V> {
    fn default() -> Self {
        Self {
            attributes: Map::new(),
            modified_keys: HashSet::new(),
            is_valid: None,
            errors: ValidationErrors::new(),
            variant: PhantomData,
        }
    }
}

impl<V: ModelVariant> Clone for Model<V> {
    fn clone(&self) -> Self {
        Self {
            attributes: self.attributes.clone(),
            modified_keys: self.modified_keys.clone(),
            is_valid: self.is_valid,
            errors: self.errors.clone(),
            variant: PhantomData,
        }
    }
}

impl<V: ModelVariant> fmt::Debug for Model<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("schema", &V::schema().title())
            .field("attributes", &self.attributes)
            .field("modified_keys", &self.modified_keys)
            .field("is_valid", &self.is_valid)
            .field("errors", &self.errors)
            .finish()
    }
}

impl<V: ModelVariant> Serialize for Model<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xpress_schema::FieldDef;

    struct Note;

    model_variant!(
        Note,
        Schema::builder("Note")
            .field("body", FieldDef::string("Body").required())
            .field("pinned", FieldDef::boolean("Pinned"))
            .build()
    );

    #[test]
    fn default_instance_is_empty_and_unvalidated() {
        let note = Model::<Note>::default();
        assert!(note.attributes().is_empty());
        assert_eq!(note.is_valid(), None);
        assert!(note.errors().is_empty());
        assert!(note.modified_attributes().is_empty());
    }

    #[test]
    fn new_with_undeclared_key_fails() {
        let result = Model::<Note>::new([("color", json!("red"))]);
        assert!(matches!(
            result,
            Err(ModelError::UndeclaredAttribute(ref names)) if names == "color"
        ));
    }

    #[test]
    fn new_does_not_track_modifications() {
        let note = Model::<Note>::new([("body", json!("hi"))]).unwrap();
        assert_eq!(note.get("body").unwrap(), Some(&json!("hi")));
        assert!(note.modified_attributes().is_empty());
    }

    #[test]
    fn is_set_distinguishes_unset_from_declared() {
        let mut note = Model::<Note>::default();
        assert!(note.is_declared("pinned"));
        assert!(!note.is_set("pinned"));
        note.set("pinned", true).unwrap();
        assert!(note.is_set("pinned"));
        assert!(!note.is_set("color"));
    }

    #[test]
    fn get_as_decodes_and_reports_shape_mismatch() {
        let mut note = Model::<Note>::default();
        note.set("pinned", true).unwrap();
        assert_eq!(note.get_as::<bool>("pinned").unwrap(), Some(true));
        assert_eq!(note.get_as::<String>("body").unwrap(), None);
        assert!(matches!(
            note.get_as::<String>("pinned"),
            Err(ModelError::Decode { ref attribute, .. }) if attribute == "pinned"
        ));
    }

    #[test]
    fn serializes_as_attribute_object() {
        let mut note = Model::<Note>::default();
        note.set("body", "hello").unwrap();
        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            json!({"body": "hello"})
        );
    }

    #[test]
    fn json_schema_uses_variant_title() {
        let schema = Model::<Note>::json_schema();
        assert_eq!(schema["title"], "note");
        assert_eq!(schema["properties"]["body"]["required"], true);
    }

    #[test]
    fn validate_records_outcome() {
        let mut note = Model::<Note>::default();
        assert!(!note.validate());
        assert_eq!(note.is_valid(), Some(false));
        assert_eq!(note.errors().get("body"), Some("Body is required."));

        note.set("body", "text").unwrap();
        assert!(note.validate());
        assert_eq!(note.is_valid(), Some(true));
        assert!(note.errors().is_empty());
    }
}
