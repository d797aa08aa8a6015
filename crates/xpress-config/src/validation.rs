//! Validation engine configuration.

use serde::{Deserialize, Serialize};
use xpress_schema::{SchemaDraft, SchemaOptions};

const fn default_validate_formats() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// JSON Schema draft used to compile field definitions (`draft4` ... `draft202012`).
    #[serde(default)]
    pub draft: SchemaDraft,

    /// Whether `format` keywords are enforced.
    #[serde(default = "default_validate_formats")]
    pub validate_formats: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            draft: SchemaDraft::default(),
            validate_formats: default_validate_formats(),
        }
    }
}

impl ValidationConfig {
    /// Options for schemas loaded at runtime.
    #[must_use]
    pub const fn schema_options(&self) -> SchemaOptions {
        SchemaOptions {
            draft: self.draft,
            validate_formats: self.validate_formats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_schema_defaults() {
        let config = ValidationConfig::default();
        assert_eq!(config.schema_options(), SchemaOptions::default());
    }
}
