//! # xpress-core
//!
//! Schema-validated models for XPress.
//!
//! This crate provides:
//! - `ModelVariant`: a marker type owning a static attribute schema
//! - `Model<V>`: an attribute bag guarded by the schema, with change tracking
//!   and a validation pass producing an error map
//! - `Crud`: the get / find / save / delete contract storage-backed variants implement
//! - `ModelError`: structural misuse (undeclared attributes, typed read failures)
//!
//! Schema types are re-exported from `xpress-schema`.

pub mod crud;
pub mod errors;
pub mod model;

pub use crud::Crud;
pub use errors::ModelError;
pub use model::{Model, ModelVariant};
pub use xpress_schema::{
    FieldDef, FieldType, InvalidParam, Schema, SchemaDraft, SchemaOptions, ValidationErrors,
};
