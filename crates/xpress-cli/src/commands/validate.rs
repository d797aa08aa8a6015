use std::process::ExitCode;

use anyhow::bail;
use serde::Serialize;
use xpress_schema::{SchemaOptions, ValidationErrors};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::loader;
use crate::output::output;

/// Outcome of validating one attribute document.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub title: String,
    pub valid: bool,
    pub errors: ValidationErrors,
}

/// Handle `xpress validate`. Exits with status 1 when the document is invalid.
pub fn handle(
    args: &ValidateArgs,
    flags: &GlobalFlags,
    options: SchemaOptions,
) -> anyhow::Result<ExitCode> {
    let report = check(args, options)?;
    output(&report, flags.format)?;

    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn check(args: &ValidateArgs, options: SchemaOptions) -> anyhow::Result<ValidationReport> {
    let schema = loader::load_schema(&args.schema, args.title.as_deref(), options)?;
    let attributes = loader::load_attributes(&args.attributes)?;

    let undeclared = schema.undeclared(attributes.keys().map(String::as_str));
    if !undeclared.is_empty() {
        bail!("Invalid model attribute: {}", undeclared.join(", "));
    }

    let errors = schema.validate(&attributes);
    tracing::info!(
        title = schema.title(),
        errors = errors.len(),
        "validated attribute document"
    );

    Ok(ValidationReport {
        title: schema.title().to_string(),
        valid: errors.is_empty(),
        errors,
    })
}
