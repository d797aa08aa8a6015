//! Read-only lookup table of model schemas.
//!
//! A `SchemaRegistry` is assembled once through [`SchemaRegistryBuilder`] and
//! never mutated afterwards. Registration compiles every field validator so
//! malformed declarations surface at startup rather than on the first request.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::schema::Schema;
use crate::validation::ValidationErrors;

/// Schemas keyed by title.
#[derive(Debug, Default)]
pub struct SchemaRegistry<'a> {
    schemas: HashMap<&'a str, &'a Schema>,
}

/// Collects schemas before freezing them into a [`SchemaRegistry`].
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder<'a> {
    schemas: HashMap<&'a str, &'a Schema>,
}

impl<'a> SchemaRegistryBuilder<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema under its title.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Duplicate` if the title is taken, or
    /// `SchemaError::InvalidDefinition` if a field does not compile.
    pub fn register(mut self, schema: &'a Schema) -> Result<Self, SchemaError> {
        if self.schemas.contains_key(schema.title()) {
            return Err(SchemaError::Duplicate(schema.title().to_string()));
        }
        schema.check()?;
        self.schemas.insert(schema.title(), schema);
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> SchemaRegistry<'a> {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}

impl<'a> SchemaRegistry<'a> {
    #[must_use]
    pub fn builder() -> SchemaRegistryBuilder<'a> {
        SchemaRegistryBuilder::new()
    }

    /// Get a schema by title. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&'a Schema> {
        self.schemas.get(title).copied()
    }

    /// Run the validation pass of a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the title is unknown. Validation
    /// failures are returned in the `Ok` map.
    pub fn validate(
        &self,
        title: &str,
        attributes: &Map<String, Value>,
    ) -> Result<ValidationErrors, SchemaError> {
        let schema = self
            .get(title)
            .ok_or_else(|| SchemaError::NotFound(title.to_string()))?;
        Ok(schema.validate(attributes))
    }

    /// List all registered titles.
    #[must_use]
    pub fn list(&self) -> Vec<&'a str> {
        let mut titles: Vec<&'a str> = self.schemas.keys().copied().collect();
        titles.sort_unstable();
        titles
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDef;
    use serde_json::json;

    fn person() -> Schema {
        Schema::builder("Person")
            .field("name", FieldDef::string("Name").required())
            .build()
    }

    fn blog_post() -> Schema {
        Schema::builder("BlogPost")
            .field("title", FieldDef::string("Title"))
            .build()
    }

    #[test]
    fn registry_has_expected_count() {
        let (a, b) = (person(), blog_post());
        let reg = SchemaRegistry::builder()
            .register(&a)
            .unwrap()
            .register(&b)
            .unwrap()
            .build();
        assert_eq!(reg.schema_count(), 2);
    }

    #[test]
    fn registry_list_is_sorted() {
        let (a, b) = (person(), blog_post());
        let reg = SchemaRegistry::builder()
            .register(&a)
            .unwrap()
            .register(&b)
            .unwrap()
            .build();
        assert_eq!(reg.list(), vec!["blog-post", "person"]);
    }

    #[test]
    fn get_existing_and_missing_schema() {
        let a = person();
        let reg = SchemaRegistry::builder().register(&a).unwrap().build();
        assert!(reg.get("person").is_some());
        assert!(reg.get("Person").is_none());
        assert!(reg.get("nonexistent").is_none());
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let (a, b) = (person(), person());
        let result = SchemaRegistry::builder().register(&a).unwrap().register(&b);
        assert!(matches!(result, Err(SchemaError::Duplicate(t)) if t == "person"));
    }

    #[test]
    fn invalid_definition_is_rejected_at_registration() {
        let broken = Schema::builder("Broken")
            .field("n", FieldDef::integer("N").constraint("maximum", "lots"))
            .build();
        let result = SchemaRegistry::builder().register(&broken);
        assert!(matches!(result, Err(SchemaError::InvalidDefinition { .. })));
    }

    #[test]
    fn validate_returns_error_map() {
        let a = person();
        let reg = SchemaRegistry::builder().register(&a).unwrap().build();

        let errors = reg.validate("person", &Map::new()).unwrap();
        assert_eq!(errors.get("name"), Some("Name is required."));

        let Value::Object(valid) = json!({"name": "Ada"}) else {
            unreachable!()
        };
        assert!(reg.validate("person", &valid).unwrap().is_empty());
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let reg = SchemaRegistry::builder().build();
        let result = reg.validate("bogus", &Map::new());
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }
}
