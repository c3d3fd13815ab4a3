// Stopword list: fetched from a remote newline-delimited file, or taken
// from the `stop-words` crate when running offline.
//
// The fetch is a single attempt with a bounded timeout. Whether the list
// actually filters tokens is decided by the caller (see Config::apply_stopwords).

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use stop_words::{get, LANGUAGE};
use tracing::{debug, info};

use crate::config::{Config, StopwordBackend};

/// Where to get the stopword list from.
#[derive(Debug, Clone)]
pub enum StopwordSource {
    Remote { url: String, timeout: Duration },
    Builtin,
}

impl StopwordSource {
    pub fn from_config(config: &Config) -> Self {
        match config.stopword_backend {
            StopwordBackend::Remote => Self::Remote {
                url: config.stopwords_url.clone(),
                timeout: config.http_timeout,
            },
            StopwordBackend::Builtin => Self::Builtin,
        }
    }

    pub async fn load(&self) -> Result<Vec<String>> {
        let words = match self {
            Self::Remote { url, timeout } => fetch_stopwords(url, *timeout).await?,
            Self::Builtin => builtin_stopwords(),
        };
        info!(count = words.len(), "Loaded stopwords");
        Ok(words)
    }
}

/// Fetch a newline-delimited stopword list over HTTP.
pub async fn fetch_stopwords(url: &str, timeout: Duration) -> Result<Vec<String>> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch stopwords from {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("Stopword server returned {} for {}", response.status(), url);
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read stopword response from {url}"))?;

    debug!(bytes = body.len(), "Fetched stopword list");
    Ok(parse_stopwords(&body))
}

/// Split a stopword file into entries. Handles both `\r\n` and `\n`
/// line endings and drops blank entries.
pub fn parse_stopwords(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Japanese stopwords bundled with the `stop-words` crate.
pub fn builtin_stopwords() -> Vec<String> {
    get(LANGUAGE::Japanese)
}
