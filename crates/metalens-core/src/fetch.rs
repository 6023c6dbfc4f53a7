//! Page fetching over HTTP

use std::time::Duration;

use reqwest::redirect::Policy;
use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;

/// HTTP settings used for every page fetch
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_redirects: 5,
            user_agent: format!(
                "Mozilla/5.0 (compatible; metalens/{})",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

/// A fetched document and where it was finally served from
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub final_url: Url,
    pub status: u16,
}

/// Reusable page fetcher wrapping one `reqwest::Client`
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .redirect(Policy::limited(options.max_redirects))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    /// GET the page; non-2xx answers are errors, nothing is retried
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        debug!(url = %url, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| unreachable(url, source))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "page returned error status");
            return Err(FetchError::ServerError {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|source| unreachable(url, source))?;

        debug!(url = %final_url, bytes = html.len(), "fetched page");
        Ok(FetchedPage {
            html,
            final_url,
            status: status.as_u16(),
        })
    }
}

fn unreachable(url: &Url, source: reqwest::Error) -> FetchError {
    warn!(url = %url, error = %source, "page unreachable");
    FetchError::Unreachable {
        url: url.to_string(),
        source,
    }
}
