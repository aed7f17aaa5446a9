use std::future::Future;

use crate::cards::{self, MessagingExtensionResponse};
use crate::data_models::QueryRequest;
use crate::search_client::RepositorySearch;

/// Command id registered for the repository search extension.
pub const SEARCH_COMMAND_ID: &str = "searchQuery";

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResponse {
    /// Cards to show for the query.
    Results(MessagingExtensionResponse),
    /// The command id is not one this bot handles.
    Rejected,
    /// The search could not be completed.
    Failed(String),
}

impl QueryResponse {
    pub fn status(&self) -> u16 {
        match self {
            QueryResponse::Results(_) => 200,
            QueryResponse::Rejected => STATUS_BAD_REQUEST,
            QueryResponse::Failed(_) => STATUS_INTERNAL_ERROR,
        }
    }
}

/// Entry point called by whatever receives message extension queries.
pub trait InvokeHandler: Send + Sync {
    fn handle(&self, request: QueryRequest) -> impl Future<Output = QueryResponse> + Send;
}

/// Answers the search command with repository cards. Holds no per-request state.
pub struct SearchCommandHandler<S> {
    search: S,
}

impl<S: RepositorySearch> SearchCommandHandler<S> {
    pub fn new(search: S) -> Self {
        Self { search }
    }

    pub fn search(&self) -> &S {
        &self.search
    }
}

impl<S: RepositorySearch> InvokeHandler for SearchCommandHandler<S> {
    async fn handle(&self, request: QueryRequest) -> QueryResponse {
        tracing::debug!(
            command_id = %request.command_id,
            query = %request.query_text,
            "message extension query received"
        );

        if request.command_id != SEARCH_COMMAND_ID {
            tracing::info!(command_id = %request.command_id, "rejecting unknown command");
            return QueryResponse::Rejected;
        }

        let results = match self.search.search(&request.query_text).await {
            Ok(results) => results,
            Err(e) => {
                if e.is_timeout() {
                    tracing::error!(query = %request.query_text, "repository search timed out");
                } else {
                    tracing::error!(query = %request.query_text, error = %e, "repository search failed");
                }
                return QueryResponse::Failed(e.to_string());
            }
        };
        tracing::debug!(count = results.len(), "got search results");

        let response = cards::render(&results);
        tracing::debug!(
            attachments = response.compose_extension.attachments.len(),
            "returning attachments"
        );
        QueryResponse::Results(response)
    }
}
