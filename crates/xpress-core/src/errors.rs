//! Structural error types for model instances.
//!
//! These cover misuse of a model (touching attributes the schema does not
//! declare, reading a value as the wrong type). Validation failures are not
//! errors; they come back as a `ValidationErrors` map from `Model::validate`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// One or more attribute names are not declared by the schema. Holds the
    /// offending names joined with `", "`.
    #[error("Invalid model attribute: {0}")]
    UndeclaredAttribute(String),

    /// A stored value could not be deserialized into the requested type.
    #[error("Attribute '{attribute}' has an unexpected shape: {source}")]
    Decode {
        attribute: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    pub(crate) fn undeclared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UndeclaredAttribute(joined)
    }

    /// Offending attribute names of an `UndeclaredAttribute` error.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<&str> {
        match self {
            Self::UndeclaredAttribute(names) => names.split(", ").collect(),
            Self::Decode { attribute, .. } => vec![attribute.as_str()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undeclared_joins_names() {
        let error = ModelError::undeclared(["color", "size"]);
        assert_eq!(error.to_string(), "Invalid model attribute: color, size");
        assert_eq!(error.attribute_names(), vec!["color", "size"]);
    }
}
