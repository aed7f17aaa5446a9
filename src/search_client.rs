use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::cards::truncate_chars;
use crate::config::Config;
use crate::data_models::{RepositoryItem, SearchResult};

/// Hard cap on how many results a single search returns.
pub const MAX_RESULTS: usize = 10;

pub const GITHUB_V3_JSON: &str = "application/vnd.github.v3+json";

/// Longest slice of an upstream error body kept in a [`SearchError::Status`].
pub const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search api returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl SearchError {
    pub fn is_timeout(&self) -> bool {
        match self {
            SearchError::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Anything that can turn a free-text query into an ordered list of results.
pub trait RepositorySearch: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;
}

/// Repository search backed by the GitHub REST search endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(endpoint: &str, timeout: Duration, user_agent: &str) -> Result<Self, SearchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_V3_JSON));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(SearchError::Client)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Self::new(
            &config.search_api_url,
            config.search_timeout,
            &config.user_agent,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self, query: &str) -> Result<String, SearchError> {
        let res = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %body, "search api error response");
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }
        Ok(body)
    }
}

impl RepositorySearch for SearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let body = self.fetch(query).await?;
        let results = parse_search_page(&body);
        tracing::debug!(query, count = results.len(), "repository search finished");
        Ok(results)
    }
}

/// Extracts up to [`MAX_RESULTS`] results from a search response body.
///
/// Shape problems never fail the search: an unreadable body or a missing
/// `items` array yields nothing. Only the first [`MAX_RESULTS`] items are
/// looked at, and those without a non-empty name or url are skipped.
pub fn parse_search_page(body: &str) -> Vec<SearchResult> {
    let mut page: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "search response is not valid json");
            return Vec::new();
        }
    };

    let items = match page.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            tracing::warn!("search response `items` is not an array");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    items
        .into_iter()
        .take(MAX_RESULTS)
        .filter_map(|item| match serde_json::from_value::<RepositoryItem>(item) {
            Ok(repo) if repo.name.is_empty() || repo.html_url.is_empty() => {
                tracing::warn!(name = %repo.name, "skipping search item without name or url");
                None
            }
            Ok(repo) => Some(SearchResult::from(repo)),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed search item");
                None
            }
        })
        .collect()
}

#[test]
fn test_parse_search_page_caps_and_orders() {
    let items: Vec<Value> = (0..15)
        .map(|i| {
            serde_json::json!({
                "name": format!("repo-{i}"),
                "description": format!("desc {i}"),
                "html_url": format!("https://github.com/o/repo-{i}"),
            })
        })
        .collect();
    let body = serde_json::json!({ "total_count": 15, "items": items }).to_string();

    let results = parse_search_page(&body);
    assert_eq!(results.len(), MAX_RESULTS);
    assert_eq!(results[0].name, "repo-0");
    assert_eq!(results[9].name, "repo-9");
    assert_eq!(results[3].summary, "desc 3");
    assert_eq!(results[3].url, "https://github.com/o/repo-3");
}

#[test]
fn test_parse_search_page_null_and_missing_description() {
    let body = r#"{"items": [
        {"name": "a", "description": null, "html_url": "https://github.com/o/a"},
        {"name": "b", "html_url": "https://github.com/o/b"}
    ]}"#;

    let results = parse_search_page(body);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.summary.is_empty()));
}

#[test]
fn test_parse_search_page_tolerates_bad_shapes() {
    assert!(parse_search_page("not json at all").is_empty());
    assert!(parse_search_page(r#"{"message": "rate limited"}"#).is_empty());
    assert!(parse_search_page(r#"{"items": {"name": "x"}}"#).is_empty());
    assert!(parse_search_page("[]").is_empty());

    // bad entries are dropped, good ones kept in order
    let body = r#"{"items": [
        {"name": "first", "html_url": "https://github.com/o/first"},
        {"description": "no name", "html_url": "https://github.com/o/x"},
        42,
        {"name": "second", "description": "ok", "html_url": "https://github.com/o/second"}
    ]}"#;
    let names: Vec<String> = parse_search_page(body).into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn test_parse_search_page_caps_before_skipping() {
    let mut items: Vec<Value> = (0..MAX_RESULTS)
        .map(|_| serde_json::json!({ "bad": true }))
        .collect();
    items.push(serde_json::json!({
        "name": "eleventh",
        "description": "past the cap",
        "html_url": "https://github.com/o/eleventh",
    }));
    let body = serde_json::json!({ "items": items }).to_string();

    assert!(parse_search_page(&body).is_empty());
}

#[test]
fn test_parse_search_page_skips_empty_names() {
    let body = r#"{"items": [
        {"name": "", "description": "nameless", "html_url": "https://github.com/o/x"},
        {"name": "kept", "html_url": "https://github.com/o/kept"},
        {"name": "no-url", "html_url": ""}
    ]}"#;

    let names: Vec<String> = parse_search_page(body).into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["kept"]);
}
