// src/images.rs
//
// Icon cache. One file per (element, URL):
//   <safe name>_<first 8 hex of sha256(url)>.<png|jpg>
// A file already on disk is never fetched again.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::consts::{MIN_IMAGE_BYTES, URL_HASH_LEN};
use crate::core::net::Fetch;
use crate::core::retry::RetryPolicy;
use crate::core::sanitize::safe_file_stem;
use crate::error::{Result, ScrapeError};
use crate::file::{ensure_directory, write_atomic};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Already on disk
    Hit(PathBuf),
    Downloaded(PathBuf),
}

impl CacheOutcome {
    pub fn path(&self) -> &Path {
        match self {
            CacheOutcome::Hit(p) | CacheOutcome::Downloaded(p) => p,
        }
    }
}

pub fn image_ext(url: &str) -> &'static str {
    let lc = url.to_ascii_lowercase();
    if lc.contains(".jpg") || lc.contains(".jpeg") { "jpg" } else { "png" }
}

pub fn url_hash(url: &str) -> String {
    let mut hex = format!("{:x}", Sha256::digest(url.as_bytes()));
    hex.truncate(URL_HASH_LEN);
    hex
}

pub fn cache_filename(name: &str, url: &str) -> String {
    format!("{}_{}.{}", safe_file_stem(name), url_hash(url), image_ext(url))
}

/// Reject error pages and truncated bodies before they land in the cache.
pub fn validate_image(bytes: &[u8]) -> Result<()> {
    if bytes.len() < MIN_IMAGE_BYTES {
        return Err(ScrapeError::ImageTooSmall(bytes.len()));
    }
    image::guess_format(bytes).map_err(|_| ScrapeError::UnknownImageFormat)?;
    Ok(())
}

pub struct ImageCache<'a, F: Fetch> {
    dir: PathBuf,
    fetcher: &'a F,
    retry: RetryPolicy,
    referer: String,
}

impl<'a, F: Fetch> ImageCache<'a, F> {
    pub fn new(dir: impl Into<PathBuf>, fetcher: &'a F, retry: RetryPolicy, referer: &str) -> Result<Self> {
        let dir = dir.into();
        ensure_directory(&dir)?;
        Ok(Self { dir, fetcher, retry, referer: referer.to_string() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str, url: &str) -> PathBuf {
        self.dir.join(cache_filename(name, url))
    }

    /// Local copy of `url`, downloading it only if it isn't cached yet.
    pub fn get(&self, name: &str, url: &str) -> Result<CacheOutcome> {
        let path = self.path_for(name, url);
        if path.is_file() {
            tracing::trace!(name, path = %path.display(), "image cached");
            return Ok(CacheOutcome::Hit(path));
        }

        tracing::debug!(name, url, "downloading image");
        let bytes = self.retry.run(
            |_| self.fetcher.get_bytes(url, &self.referer),
            |e| e.is_transient() || matches!(e, ScrapeError::Status { .. }),
        )?;
        validate_image(&bytes)?;
        write_atomic(&path, &bytes)?;

        tracing::debug!(name, bytes = bytes.len(), path = %path.display(), "image saved");
        Ok(CacheOutcome::Downloaded(path))
    }
}
