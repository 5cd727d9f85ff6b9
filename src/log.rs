// src/log.rs
use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::consts::{DEBUG_LOG_FILE, STORE_DIR};
use crate::file::ensure_parent;

/// `.store/debug.log`
pub fn default_log_path() -> PathBuf {
    Path::new(STORE_DIR).join(DEBUG_LOG_FILE)
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "alchemy_scrape=info",
        1 => "alchemy_scrape=debug",
        _ => "alchemy_scrape=trace",
    }
}

/// Install the global subscriber: stderr always, plus a plain-text file when asked.
/// `RUST_LOG` wins over `verbosity`. Timestamps are elapsed time since start.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime())
        .with_target(false);

    let file = match log_file {
        Some(path) => {
            ensure_parent(path)?;
            let f = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(f))
                    .with_timer(fmt::time::uptime())
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init()?;
    Ok(())
}
