use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the JSON Schema of a descriptor file.
    Schema(SchemaArgs),
    /// Validate an attribute document against a descriptor.
    Validate(ValidateArgs),
    /// Register descriptor files and list their titles.
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Descriptor file (JSON).
    pub schema: PathBuf,

    /// Type name used for the title (defaults to the descriptor's title or file name).
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Descriptor file (JSON).
    pub schema: PathBuf,

    /// Attribute document (JSON object).
    pub attributes: PathBuf,

    /// Type name used for the title (defaults to the descriptor's title or file name).
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Descriptor files (JSON).
    #[arg(required = true)]
    pub schemas: Vec<PathBuf>,
}
