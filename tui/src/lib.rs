//! Terminal frontend for the spotlight palette.
//!
//! The binary draws a dimmed backdrop with a centered overlay on top: a
//! query input, a debounced search round-trip, and a grouped result list
//! navigable by keyboard or mouse. All palette state lives in
//! `spotlight_core`; this crate supplies timers, terminal IO, and the
//! demo search index.

use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::Result;
use color_eyre::eyre::eyre;
use spotlight_core::PaletteConfig;
use spotlight_core::SearchProvider;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod app_event;
mod app_event_sender;
pub mod cli;
mod demo_index;
mod palette_view;
mod search_driver;
mod tui;

pub use cli::Cli;
pub use demo_index::DemoIndex;

/// Entry point invoked by the `spotlight` binary. Returns the id the user
/// committed, if any, so the caller can print it after the terminal is
/// restored.
pub async fn run_main(cli: Cli) -> Result<Option<String>> {
    let _log_guard = init_logging()?;

    let mut config = match cli.config.or_else(default_config_path) {
        Some(path) => PaletteConfig::load(&path)?,
        None => PaletteConfig::default(),
    };
    if let Some(dataset) = cli.dataset {
        config.dataset = Some(dataset);
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    tracing::info!(?config, "starting spotlight");

    let provider: Arc<dyn SearchProvider> = match &config.dataset {
        Some(path) => Arc::new(DemoIndex::from_json_path(path, config.max_hits)?),
        None => Arc::new(DemoIndex::with_sample_data(config.max_hits)),
    };
    app::run_app(&config, provider).await
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("spotlight").join("spotlight.toml"))
}

/// File logging under the user's state dir, since stderr belongs to the
/// alternate screen while the app runs. `SPOTLIGHT_LOG` controls the
/// filter, e.g. `SPOTLIGHT_LOG=spotlight_core=trace`.
fn init_logging() -> Result<WorkerGuard> {
    let log_dir = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .ok_or_else(|| eyre!("could not determine a state directory for logs"))?
        .join("spotlight");
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::never(log_dir, "spotlight-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let env_filter = EnvFilter::try_from_env("SPOTLIGHT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
