//! # xpress-schema
//!
//! Schema descriptors, field definitions, and validation for XPress models.
//!
//! This crate provides:
//! - `FieldDef`: one declared attribute (type, required flag, description,
//!   JSON Schema constraints, optional callback)
//! - `Schema`: the ordered, immutable set of declared attributes of a model
//!   variant, with the validation pass and JSON Schema export
//! - `SchemaRegistry`: read-only lookup of schemas by title
//!
//! Built-in value checks delegate to `jsonschema`; `schemars` derives field
//! definitions from Rust types.

mod error;
mod field;
mod registry;
mod schema;
mod slug;
mod validation;

pub use error::SchemaError;
pub use field::{FieldDef, FieldType, InvalidParam, ValidateCallback};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
pub use schema::{Schema, SchemaBuilder, SchemaDraft, SchemaOptions};
pub use slug::title_slug;
pub use validation::{ValidationErrors, is_empty_value};
