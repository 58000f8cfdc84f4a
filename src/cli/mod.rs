//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};

use crate::access::Action;
pub use crate::output::OutputFormat;

pub mod access;
pub mod context;
pub mod fetch;
pub mod menu;
pub mod session;
pub mod status;

pub use context::CommandContext;

/// Wardgate - request cache and permission tooling for the hospital admin dashboard
#[derive(Parser, Debug)]
#[command(name = "wardgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "WARDGATE_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "WARDGATE_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override session snapshot location
    #[arg(long, global = true, env = "WARDGATE_SESSION", hide_env = true)]
    pub session: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "WARDGATE_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a single permission for the signed-in user
    Can {
        /// Module path, e.g. admin/settings
        module: String,

        /// Action to check (add, edit, delete, view)
        action: Action,
    },

    /// Show all four permissions for one or more modules
    Permissions {
        /// Module paths
        #[arg(required = true)]
        modules: Vec<String>,
    },

    /// Show the navigation menu built from the session snapshot
    Menu {
        /// List entries flat instead of as a tree
        #[arg(long)]
        flat: bool,
    },

    /// Fetch API resources through the request cache
    Fetch(FetchArgs),

    /// Show configuration and session status
    Status,

    /// Manage the persisted session snapshot
    #[command(subcommand)]
    Session(SessionCommands),

    /// Display version information
    Version,
}

/// Arguments for `wardgate fetch`
#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Paths (relative to api_base_url) or absolute URLs; repeats share one request
    #[arg(required = true)]
    pub targets: Vec<String>,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Request body, sent verbatim
    #[arg(long, short = 'd')]
    pub body: Option<String>,

    /// Extra header as "Name: value" (repeatable)
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,
}

/// Session snapshot subcommands
#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Print the persisted snapshot
    Show,

    /// Sign out: remove the persisted snapshot
    Clear,
}
