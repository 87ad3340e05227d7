use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "awstui=info";

/// Install the global subscriber.
///
/// The terminal belongs to the UI, so events go to `log_file` when given and
/// are discarded otherwise. `filter` uses `RUST_LOG` syntax; an unparsable
/// filter falls back to the default.
pub fn init_tracing(filter: Option<&str>, log_file: Option<&Path>) -> Result<()> {
    let filter = filter
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());
    let filter = EnvFilter::try_new(&filter)
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("initialize tracing filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .compact();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            let _ = builder.with_writer(Mutex::new(file)).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::sink).try_init();
        }
    }
    Ok(())
}
