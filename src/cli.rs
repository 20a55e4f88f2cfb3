//! CLI definitions for panelkit.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Panelkit CLI.
#[derive(Parser)]
#[command(name = "panelkit")]
#[command(about = "Pluggable dashboard registry and route compiler")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.panelkit/panelkit.toml)
    #[arg(short, long, env = "PANELKIT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the compiled route table
    Routes {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the navigation visible to a user
    Nav {
        /// User id; anonymous when omitted
        #[arg(long)]
        user: Option<String>,

        /// Comma-separated permissions of the user
        #[arg(long, value_delimiter = ',')]
        permissions: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Validate the configuration and compile the routes
    Check,

    /// Serve the compiled routes over HTTP (default)
    Serve {
        /// Server host (overrides [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides [server].port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}
