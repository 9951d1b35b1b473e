//! ctxpack CLI
//!
//! Command-line interface for generating AI context documents.

use anyhow::Result;
use clap::Parser;
use ctxpack::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    // Execute the command
    match cli.command {
        None => commands::generate::execute(
            &cli.root,
            config,
            Default::default(),
            cli.verbose,
            cli.quiet,
        ),
        Some(Commands::Generate(args)) => {
            commands::generate::execute(&cli.root, config, args, cli.verbose, cli.quiet)
        },
        Some(Commands::List { json, all }) => commands::list::execute(&cli.root, config, json, all),
        Some(Commands::CheckIgnore { paths, json }) => {
            commands::check_ignore::execute(&cli.root, config, paths, json)
        },
        Some(Commands::Init { force }) => {
            commands::init::execute(&cli.root, config, force, cli.quiet)
        },
    }
}
