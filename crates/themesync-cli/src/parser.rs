//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface definition for the theme mirror tool.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "themesync")]
#[command(about = "Mirror a remote theme catalog into a local directory tree")]
#[command(version)]
pub struct Cli {
    /// Root directory of the local mirror
    #[arg(long, global = true, env = "THEMESYNC_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "themesync",
            "--verbose",
            "--root",
            "/srv/mirror",
            "full",
            "themes.txt",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.root, PathBuf::from("/srv/mirror"));
    }

    #[test]
    fn test_partial_args() {
        let cli = Cli::parse_from(["themesync", "partial", "revs.json", "--parallel", "8"]);
        match cli.command {
            Some(Commands::Partial {
                revisions,
                parallel,
                ..
            }) => {
                assert_eq!(revisions, PathBuf::from("revs.json"));
                assert_eq!(parallel, 8);
            }
            _ => panic!("expected partial command"),
        }
    }
}
