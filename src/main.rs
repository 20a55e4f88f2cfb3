//! Panelkit - pluggable dashboard registry and route compiler
//!
//! Main entry point for the panelkit CLI and server.

mod cli;
mod commands;
mod logging;
mod register;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use panelkit_api::ServerConfig;
use panelkit_config::{Config, ConfigLoader};

use crate::cli::{Cli, Commands};

/// Load the explicit config file, else the default one if present, else
/// the built-in configuration.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return ConfigLoader::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    match ConfigLoader::default_path().filter(|path| path.exists()) {
        Some(path) => ConfigLoader::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(register::default_config()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    logging::init_tracing(&config.logging)?;
    debug!(site = %config.site.slug, "Configuration loaded");

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });

    if let Commands::Check = command {
        return commands::check(&config);
    }

    let site = panelkit_core::global::install(register::build_site(&config)?);
    info!(site = site.slug(), "Site configured");

    match command {
        Commands::Routes { format } => commands::routes(&site, format),
        Commands::Nav {
            user,
            permissions,
            format,
        } => commands::nav(&site, user, permissions, format),
        Commands::Serve { host, port } => {
            let server = ServerConfig::new(
                host.unwrap_or_else(|| config.server.host.clone()),
                port.unwrap_or(config.server.port),
            );
            commands::serve(site, server).await
        }
        Commands::Check => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[site]\nslug = \"horizon\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.site.slug, "horizon");
    }

    #[test]
    fn test_load_missing_explicit_config() {
        let err = load_config(Some(Path::new("/nonexistent/panelkit.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/panelkit.toml"));
    }
}
