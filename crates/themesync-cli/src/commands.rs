//! Main commands enum and primary subcommands.
//!
//! This module defines the available commands for the CLI tool.

use std::path::PathBuf;

use clap::Subcommand;

/// Default catalog information API queried by `scan-summary`.
pub const DEFAULT_CATALOG_API: &str = "https://api.wordpress.org/themes/info/1.1/";

/// Available commands for the theme mirror tool.
#[derive(Subcommand)]
pub enum Commands {
    /// Re-download every theme named in a list file
    Full {
        /// File with one theme slug per line ("-" reads stdin)
        list: PathBuf,

        /// Mirror tree to sync: "themes" or "readmes"
        #[arg(short, long, default_value = "themes")]
        target: String,

        /// Number of simultaneous downloads
        #[arg(short, long, default_value_t = 4, env = "THEMESYNC_PARALLEL")]
        parallel: usize,

        /// Fetch worker command run once per theme
        #[arg(long, default_value = "./download", env = "THEMESYNC_FETCH_COMMAND")]
        fetch_command: PathBuf,
    },

    /// Download the themes named by an ordered revision file, advancing the
    /// local checkpoint as revisions complete
    Partial {
        /// JSON file of revision records, oldest first
        revisions: PathBuf,

        /// Mirror tree to sync: "themes" or "readmes"
        #[arg(short, long, default_value = "themes")]
        target: String,

        /// Number of simultaneous downloads
        #[arg(short, long, default_value_t = 4, env = "THEMESYNC_PARALLEL")]
        parallel: usize,

        /// Fetch worker command run once per theme
        #[arg(long, default_value = "./download", env = "THEMESYNC_FETCH_COMMAND")]
        fetch_command: PathBuf,
    },

    /// Summarize a scan-result file and look up each matching theme in the
    /// catalog
    ScanSummary {
        /// File of scan hits, one path per line
        scan_file: PathBuf,

        /// Base URL of the catalog information API
        #[arg(long, default_value = DEFAULT_CATALOG_API, env = "THEMESYNC_CATALOG_API")]
        api_base: String,
    },
}
