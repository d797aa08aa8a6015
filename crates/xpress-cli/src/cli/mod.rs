use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `xpress` binary.
#[derive(Debug, Parser)]
#[command(
    name = "xpress",
    version,
    about = "XPress - schema-validated model descriptors"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["xpress", "--format", "raw", "--verbose", "schema", "a.json"])
            .expect("cli should parse");

        let flags = cli.global_flags();
        assert_eq!(flags.format, OutputFormat::Raw);
        assert!(flags.verbose);
        assert!(!flags.quiet);
        assert!(matches!(cli.command, Commands::Schema(ref args) if args.schema == PathBuf::from("a.json")));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "xpress", "validate", "post.json", "data.json", "--title", "BlogPost", "-q",
        ])
        .expect("cli should parse");

        assert!(cli.quiet);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.attributes, PathBuf::from("data.json"));
        assert_eq!(args.title.as_deref(), Some("BlogPost"));
    }

    #[test]
    fn list_requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["xpress", "list"]).is_err());
        assert!(Cli::try_parse_from(["xpress", "list", "a.json", "b.json"]).is_ok());
    }
}
