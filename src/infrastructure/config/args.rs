//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::app_config::LogLevel;

/// Command line arguments; set values override the config file.
#[derive(Debug, Parser)]
#[command(
    name = "matterpost",
    version,
    about = "Mattermost post fetching and link previews in the terminal",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Mattermost server URL.
    #[arg(long, value_name = "URL")]
    pub server_url: Option<String>,

    /// Access token.
    #[arg(long, env = "MATTERPOST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Lay previews out for a tablet.
    #[arg(long)]
    pub tablet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Fetch posts of a channel with their authors and statuses.
    Posts {
        /// Channel id.
        channel: String,

        /// Page number, 0 is the most recent.
        #[arg(long, default_value_t = 0, conflicts_with = "since")]
        page: u32,

        /// Posts per page; defaults to the configured value.
        #[arg(long)]
        per_page: Option<u32>,

        /// Only posts changed since this epoch-milliseconds timestamp.
        #[arg(long)]
        since: Option<i64>,
    },
    /// Show the link preview card for a URL.
    Preview {
        /// Link to preview.
        url: String,

        /// Lay the card out as a reply.
        #[arg(long)]
        reply: bool,
    },
}
