//! Tracing setup.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use panelkit_config::{ConfigLoader, LoggingConfig};

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Get the .panelkit directory path.
pub(crate) fn panelkit_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".panelkit"))
        .unwrap_or_else(|| PathBuf::from(".panelkit"))
}

fn log_dir(config: &LoggingConfig) -> PathBuf {
    match &config.dir {
        Some(dir) => PathBuf::from(ConfigLoader::expand_path(dir)),
        None => panelkit_dir().join("logs"),
    }
}

/// Initialize tracing: console output on stderr, plus a daily rolling file
/// when `[logging].file` is set.
///
/// `RUST_LOG` takes precedence over `[logging].level`.
pub(crate) fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let file_layer = if config.file {
        let dir = log_dir(config);
        std::fs::create_dir_all(&dir)?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("panelkit")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = GUARD.set(guard);
        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()?;

    Ok(())
}
