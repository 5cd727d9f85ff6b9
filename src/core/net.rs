// src/core/net.rs
// Blocking HTTP over reqwest. One client for the page and every icon.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::redirect::Policy;

use crate::config::consts::{
    ACCEPT_LANGUAGE as LANG, FALLBACK_IMAGE_ORIGIN, IMAGE_ACCEPT, MAX_REDIRECTS, TIMEOUT_SECS, USER_AGENT,
};
use crate::core::retry::RetryPolicy;
use crate::error::{Result, ScrapeError};

/// Anything that can hand back the bytes behind a URL.
/// The image cache only talks to this, so tests can swap in a stub.
pub trait Fetch {
    fn get_bytes(&self, url: &str, referer: &str) -> Result<Vec<u8>>;
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }

    /// GET the page as text. Non-2xx is an error.
    pub fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).header(ACCEPT_LANGUAGE, LANG).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status { status: status.as_u16(), url: url.to_string() });
        }
        Ok(resp.text()?)
    }

    /// GET with retries on transient failures.
    pub fn fetch_page(&self, url: &str, retry: &RetryPolicy) -> Result<String> {
        reqwest::Url::parse(url).map_err(|_| ScrapeError::InvalidUrl(url.to_string()))?;
        retry.run(
            |attempt| {
                tracing::debug!(url, attempt, "GET page");
                self.get_text(url)
            },
            ScrapeError::is_transient,
        )
    }
}

impl Fetch for HttpClient {
    fn get_bytes(&self, url: &str, referer: &str) -> Result<Vec<u8>> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(IMAGE_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(LANG));
        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("image"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("cross-site"));
        if let Ok(v) = HeaderValue::from_str(&origin_of(url)) {
            headers.insert(ORIGIN, v);
        }
        if let Ok(v) = HeaderValue::from_str(referer) {
            headers.insert(REFERER, v);
        }

        let resp = self.client.get(url).headers(headers).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status { status: status.as_u16(), url: url.to_string() });
        }
        tracing::trace!(url, content_type = ?resp.headers().get(reqwest::header::CONTENT_TYPE), "image response");
        Ok(resp.bytes()?.to_vec())
    }
}

/// `scheme://host[:port]` of an absolute URL, or the wiki image host when it can't be parsed.
pub fn origin_of(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(u) if u.has_host() => u.origin().ascii_serialization(),
        _ => FALLBACK_IMAGE_ORIGIN.to_string(),
    }
}
