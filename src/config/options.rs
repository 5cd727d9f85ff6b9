// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;
use crate::core::retry::{Backoff, RetryPolicy};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub images: ImageOptions,
    pub resolve: ResolveOptions,
    pub export: ExportOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageSource {
    /// Live fetch
    Url(String),
    /// A saved copy of the page
    File(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub source: PageSource,
    pub retry: RetryPolicy,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            source: PageSource::Url(ELEMENTS_URL.to_string()),
            retry: RetryPolicy::new(
                PAGE_ATTEMPTS,
                Backoff::Exponential {
                    base: Duration::from_millis(RETRY_BASE_MS),
                    max: Duration::from_secs(8),
                },
            ),
        }
    }
}

impl ScrapeOptions {
    /// Page URL used as `Referer` for icon downloads.
    pub fn referer(&self) -> &str {
        match &self.source {
            PageSource::Url(u) => u,
            PageSource::File(_) => ELEMENTS_URL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageOptions {
    pub enabled: bool,
    pub dir: PathBuf,
    pub retry: RetryPolicy,
    pub pause: Duration,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            retry: RetryPolicy::new(
                IMAGE_ATTEMPTS,
                Backoff::Linear(Duration::from_millis(RETRY_BASE_MS)),
            ),
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Relaxation passes before leftovers are forced to the base tier.
    pub max_iterations: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_iterations: MAX_ITERATIONS }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub out_path: PathBuf,
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from(DEFAULT_OUT_FILE),
            pretty: true,
        }
    }
}
