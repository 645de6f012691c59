//! CLI entry point - the composition root.
//!
//! Parses arguments, initializes logging on stderr (stdout is reserved for
//! status lines), bootstraps the engine's adapters, and dispatches to
//! handlers. Fatal errors print a one-line diagnostic and exit non-zero.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use themesync_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() {
    // Load environment variables before parsing: several arguments take
    // their defaults from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Full {
            list,
            target,
            parallel,
            fetch_command,
        } => {
            let ctx = bootstrap(CliConfig {
                root: cli.root,
                fetch_command,
            })?;
            handlers::sync::full(&ctx, &list, &target, parallel).await?;
        }
        Commands::Partial {
            revisions,
            target,
            parallel,
            fetch_command,
        } => {
            let ctx = bootstrap(CliConfig {
                root: cli.root,
                fetch_command,
            })?;
            handlers::sync::partial(&ctx, &revisions, &target, parallel).await?;
        }
        Commands::ScanSummary {
            scan_file,
            api_base,
        } => {
            handlers::scan::execute(&scan_file, &api_base).await?;
        }
    }

    Ok(())
}
