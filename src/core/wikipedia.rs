//! MediaWiki API neighbor oracle
//!
//! Forward neighbors are the article's outgoing links (`prop=links`),
//! backward neighbors the articles linking to it (`list=backlinks`). Both are
//! restricted to the main namespace and follow the API's `continue` object.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::core::error::{Error, Result};
use crate::core::oracle::NeighborOracle;
use crate::core::source::ArticleRef;

/// Default API endpoint
pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Default cap on continuation pages fetched per lookup
pub const DEFAULT_MAX_LINK_PAGES: usize = 10;

/// Maximum number of retry attempts for network errors
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff
const BASE_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Global HTTP client shared by every oracle
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(20)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("wikipath/{}", env!("WIKIPATH_VERSION")))
        .build()
        .unwrap_or_else(|err| {
            warn!("Falling back to a default HTTP client: {}", err);
            Client::new()
        })
});

/// Connection settings of a [`WikipediaOracle`]
#[derive(Debug, Clone)]
pub struct WikiConfig {
    /// `https://<lang>.wikipedia.org/w/api.php`
    pub api_url: String,

    /// Continuation pages fetched per lookup; links beyond them are ignored
    pub max_link_pages: usize,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Retries on network errors
    pub max_retries: u32,

    /// First retry delay, doubled on each further retry
    pub retry_base_delay: Duration,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            max_link_pages: DEFAULT_MAX_LINK_PAGES,
            request_timeout: Duration::from_secs(30),
            max_retries: MAX_RETRY_ATTEMPTS,
            retry_base_delay: BASE_RETRY_DELAY,
        }
    }
}

impl WikiConfig {
    /// Configuration for the wiki `article` lives on
    pub fn for_article(article: &ArticleRef) -> Self {
        Self {
            api_url: article.api_url(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "continue", default)]
    continuation: Option<HashMap<String, Value>>,
    #[serde(default)]
    query: Option<Query>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Default, Deserialize)]
struct Query {
    #[serde(default)]
    pages: HashMap<String, Page>,
    #[serde(default)]
    backlinks: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    ns: i64,
    title: String,
}

impl Query {
    fn into_titles(self) -> impl Iterator<Item = String> {
        self.pages
            .into_values()
            .flat_map(|page| page.links)
            .chain(self.backlinks)
            .filter(|link| link.ns == 0)
            .map(|link| link.title.replace(' ', "_"))
    }
}

/// Delay before retry number `attempt` (1-based): `base_delay * 2^(attempt - 1)`, saturating
fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    let factor = 1u32
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u32::MAX);
    base_delay.saturating_mul(factor)
}

/// Execute an operation with retry logic for network errors
async fn retry_on_network_error<F, Fut, T>(
    max_retries: u32,
    base_delay: Duration,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(Error::NetworkError(msg)) if attempt < max_retries => {
                attempt += 1;
                let delay = backoff_delay(base_delay, attempt);
                warn!(
                    "Network error (attempt {}): {}. Retrying in {:?}...",
                    attempt, msg, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Neighbor oracle backed by a live MediaWiki API
#[derive(Debug, Clone)]
pub struct WikipediaOracle {
    client: Client,
    config: WikiConfig,
}

impl Default for WikipediaOracle {
    fn default() -> Self {
        Self::new(WikiConfig::default())
    }
}

impl WikipediaOracle {
    pub fn new(config: WikiConfig) -> Self {
        Self {
            client: GLOBAL_CLIENT.clone(),
            config,
        }
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    /// Run a list query, following continuations up to `max_link_pages` pages
    async fn fetch_titles(&self, base: Vec<(&'static str, String)>) -> Result<Vec<String>> {
        let mut titles = Vec::new();
        let mut continuation: Vec<(String, String)> = Vec::new();

        for page in 1..=self.config.max_link_pages.max(1) {
            let mut params: Vec<(String, String)> = base
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();
            params.extend(continuation.iter().cloned());

            let response = retry_on_network_error(
                self.config.max_retries,
                self.config.retry_base_delay,
                || self.request(&params),
            )
            .await?;

            if let Some(error) = response.error {
                return Err(Error::HttpError(format!(
                    "API error {}: {}",
                    error.code, error.info
                )));
            }

            if let Some(query) = response.query {
                titles.extend(query.into_titles());
            }

            match response.continuation {
                Some(next) if !next.is_empty() => {
                    continuation = next
                        .into_iter()
                        .map(|(key, value)| (key, value_to_param(value)))
                        .collect();
                    if page == self.config.max_link_pages {
                        debug!(
                            "Stopped following continuations after {} pages ({} links)",
                            page,
                            titles.len()
                        );
                    }
                }
                _ => break,
            }
        }

        Ok(titles)
    }

    async fn request(&self, params: &[(String, String)]) -> Result<ApiResponse> {
        trace!("GET {} {:?}", self.config.api_url, params);

        let response = self
            .client
            .get(&self.config.api_url)
            .query(params)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(&self.config.api_url, status));
        }

        Ok(response.json::<ApiResponse>().await?)
    }
}

#[async_trait]
impl NeighborOracle for WikipediaOracle {
    async fn forward_neighbors(&self, node: &str) -> Result<Vec<String>> {
        self.fetch_titles(vec![
            ("action", "query".to_string()),
            ("titles", node.to_string()),
            ("prop", "links".to_string()),
            ("pllimit", "max".to_string()),
            ("plnamespace", "0".to_string()),
            ("format", "json".to_string()),
        ])
        .await
    }

    async fn backward_neighbors(&self, node: &str) -> Result<Vec<String>> {
        self.fetch_titles(vec![
            ("action", "query".to_string()),
            ("list", "backlinks".to_string()),
            ("bltitle", node.to_string()),
            ("bllimit", "max".to_string()),
            ("blnamespace", "0".to_string()),
            ("format", "json".to_string()),
        ])
        .await
    }
}

fn value_to_param(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Throttling and server errors are worth retrying, everything else is not
fn status_error(url: &str, status: StatusCode) -> Error {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Error::NetworkError(format!("{} from {}", status, url))
    } else {
        Error::HttpError(format!("{} from {}", status, url))
    }
}
