use std::process::ExitCode;

use anyhow::Context;
use serde::Serialize;
use xpress_schema::{Schema, SchemaOptions, SchemaRegistry};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::loader;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct SchemaSummary {
    pub title: String,
    pub type_name: String,
    pub fields: Vec<String>,
}

/// Handle `xpress list`.
pub fn handle(
    args: &ListArgs,
    flags: &GlobalFlags,
    options: SchemaOptions,
) -> anyhow::Result<ExitCode> {
    output(&summarize(args, options)?, flags.format)?;
    Ok(ExitCode::SUCCESS)
}

fn summarize(args: &ListArgs, options: SchemaOptions) -> anyhow::Result<Vec<SchemaSummary>> {
    let schemas = args
        .schemas
        .iter()
        .map(|path| loader::load_schema(path, None, options))
        .collect::<anyhow::Result<Vec<Schema>>>()?;

    let mut builder = SchemaRegistry::builder();
    for schema in &schemas {
        builder = builder
            .register(schema)
            .context("failed to register schema descriptors")?;
    }
    let registry = builder.build();
    tracing::debug!(count = registry.schema_count(), "registered schema descriptors");

    Ok(registry
        .list()
        .into_iter()
        .filter_map(|title| registry.get(title))
        .map(|schema| SchemaSummary {
            title: schema.title().to_string(),
            type_name: schema.type_name().to_string(),
            fields: schema.fields().map(|(name, _)| name.to_string()).collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(
            &path,
            json!({"title": {"type": "string"}, "body": {"type": "string"}}).to_string(),
        )
        .unwrap();
        path
    }

    #[test]
    fn lists_titles_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        let args = ListArgs {
            schemas: vec![write(&dir, "Page.json"), write(&dir, "BlogPost.json")],
        };

        let summaries = summarize(&args, SchemaOptions::default()).unwrap();
        let titles: Vec<&str> = summaries.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["blog-post", "page"]);
        assert_eq!(summaries[0].type_name, "BlogPost");
        assert_eq!(summaries[0].fields, vec!["title", "body"]);
    }

    #[test]
    fn duplicate_titles_are_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let args = ListArgs {
            schemas: vec![write(&dir, "Page.json"), write(&dir, "nested/Page.json")],
        };

        let error = summarize(&args, SchemaOptions::default()).unwrap_err();
        assert!(format!("{error:#}").contains("page"));
    }
}
