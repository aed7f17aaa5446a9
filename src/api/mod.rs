use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::query_handler::InvokeHandler;

pub mod handlers;
pub mod models;

pub fn create_router<H>(handler: Arc<H>) -> Router
where
    H: InvokeHandler + 'static,
{
    Router::new()
        .route("/api/messages", post(handlers::messages_handler::<H>))
        .route("/health", get(handlers::health_handler))
        .with_state(handler)
        .layer(TraceLayer::new_for_http())
}
