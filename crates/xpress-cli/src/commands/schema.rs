use std::process::ExitCode;

use serde_json::Value;
use xpress_schema::SchemaOptions;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::loader;
use crate::output::output;

/// Handle `xpress schema`.
pub fn handle(
    args: &SchemaArgs,
    flags: &GlobalFlags,
    options: SchemaOptions,
) -> anyhow::Result<ExitCode> {
    output(&describe(args, options)?, flags.format)?;
    Ok(ExitCode::SUCCESS)
}

fn describe(args: &SchemaArgs, options: SchemaOptions) -> anyhow::Result<Value> {
    let schema = loader::load_schema(&args.schema, args.title.as_deref(), options)?;
    Ok(schema.to_json())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;
    use xpress_schema::SchemaDraft;

    use super::*;

    #[test]
    fn publishes_descriptor_as_json_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("person.json");
        std::fs::write(
            &path,
            json!({"name": {"type": "string", "required": true, "description": "Name"}})
                .to_string(),
        )
        .unwrap();

        let args = SchemaArgs {
            schema: path,
            title: Some("Person".into()),
        };
        let published = describe(&args, SchemaOptions::default()).unwrap();

        assert_eq!(
            published,
            json!({
                "$schema": SchemaDraft::Draft4.uri(),
                "title": "person",
                "type": "object",
                "properties": {
                    "name": {"type": "string", "required": true, "description": "Name"}
                }
            })
        );
    }
}
