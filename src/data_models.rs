use serde::{Deserialize, Serialize};

/// One repository hit, trimmed down to what the cards need.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub name: String,
    pub summary: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(name: String, summary: Option<String>, url: String) -> SearchResult {
        SearchResult {
            name,
            summary: summary.unwrap_or_default(),
            url,
        }
    }
}

/// The parts of a message extension query the bot acts on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryRequest {
    pub command_id: String,
    pub query_text: String,
}

impl QueryRequest {
    pub fn new(command_id: impl Into<String>, query_text: impl Into<String>) -> QueryRequest {
        QueryRequest {
            command_id: command_id.into(),
            query_text: query_text.into(),
        }
    }
}

/// A single entry of the `items` array returned by the repository search API.
#[derive(Deserialize, Debug, Clone)]
pub struct RepositoryItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
}

impl From<RepositoryItem> for SearchResult {
    fn from(item: RepositoryItem) -> Self {
        SearchResult::new(item.name, item.description, item.html_url)
    }
}
