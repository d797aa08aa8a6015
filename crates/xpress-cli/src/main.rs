use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;
mod loader;
mod output;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("xpress error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    let config = xpress_config::XpressConfig::load_with_dotenv()
        .context("failed to load xpress configuration")?;
    let flags = cli.global_flags();
    init_tracing(&flags, &config.general.log_filter)?;

    let options = config.validation.schema_options();
    tracing::debug!(?options, "resolved validation options");

    match &cli.command {
        cli::Commands::Schema(args) => commands::schema::handle(args, &flags, options),
        cli::Commands::Validate(args) => commands::validate::handle(args, &flags, options),
        cli::Commands::List(args) => commands::list::handle(args, &flags, options),
    }
}

fn init_tracing(flags: &cli::GlobalFlags, configured: &str) -> anyhow::Result<()> {
    let level = if flags.quiet {
        "error"
    } else if flags.verbose {
        "debug"
    } else {
        configured
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("XPRESS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
