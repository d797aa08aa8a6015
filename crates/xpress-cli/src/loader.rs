use std::path::Path;

use anyhow::{Context, bail};
use serde_json::{Map, Value};
use xpress_schema::{Schema, SchemaOptions};

/// Load a descriptor file into a checked [`Schema`].
///
/// The type name comes from `title` when given, then from the document's own
/// `title` member, then from the file stem.
pub fn load_schema(
    path: &Path,
    title: Option<&str>,
    options: SchemaOptions,
) -> anyhow::Result<Schema> {
    let document = read_json(path)?;

    let type_name = match title {
        Some(title) => title.to_string(),
        None => document
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .with_context(|| format!("cannot derive a type name from {}", path.display()))?,
    };

    let schema = Schema::from_json(type_name, &document, options)
        .with_context(|| format!("invalid descriptor in {}", path.display()))?;
    schema
        .check()
        .with_context(|| format!("invalid descriptor in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        title = schema.title(),
        fields = schema.len(),
        "loaded schema descriptor"
    );
    Ok(schema)
}

/// Load an attribute document. The top level must be a JSON object.
pub fn load_attributes(path: &Path) -> anyhow::Result<Map<String, Value>> {
    match read_json(path)? {
        Value::Object(attributes) => Ok(attributes),
        other => bail!(
            "attribute document {} must be a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse JSON in {}", path.display()))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn title_falls_back_to_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "BlogPost.json",
            &json!({"name": {"type": "string", "required": true}}),
        );

        let schema = load_schema(&path, None, SchemaOptions::default()).unwrap();
        assert_eq!(schema.title(), "blog-post");
        assert!(schema.is_declared("name"));
    }

    #[test]
    fn explicit_title_wins_over_document_title() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "post.json",
            &json!({
                "title": "article",
                "properties": {"name": {"type": "string"}}
            }),
        );

        let from_doc = load_schema(&path, None, SchemaOptions::default()).unwrap();
        assert_eq!(from_doc.title(), "article");

        let explicit = load_schema(&path, Some("NewsItem"), SchemaOptions::default()).unwrap();
        assert_eq!(explicit.title(), "news-item");
    }

    #[test]
    fn malformed_descriptor_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.json", &json!({"name": {"type": "colour"}}));

        let error = load_schema(&path, None, SchemaOptions::default()).unwrap_err();
        assert!(format!("{error:#}").contains("bad.json"));
    }

    #[test]
    fn attributes_must_be_an_object() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "list.json", &json!([1, 2]));

        let error = load_attributes(&path).unwrap_err();
        assert!(error.to_string().contains("an array"));
    }
}
