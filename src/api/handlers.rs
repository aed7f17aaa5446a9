use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::query_handler::{InvokeHandler, QueryResponse};

use super::models::Activity;

impl IntoResponse for QueryResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match self {
            QueryResponse::Results(body) => (status, Json(body)).into_response(),
            QueryResponse::Rejected => {
                (status, Json(json!({ "status": status.as_u16() }))).into_response()
            }
            QueryResponse::Failed(message) => (
                status,
                Json(json!({ "status": status.as_u16(), "error": message })),
            )
                .into_response(),
        }
    }
}

pub async fn messages_handler<H: InvokeHandler>(
    State(handler): State<Arc<H>>,
    Json(activity): Json<Activity>,
) -> Response {
    if !activity.is_query_invoke() {
        tracing::debug!(
            activity_type = %activity.activity_type,
            name = ?activity.name,
            "ignoring activity"
        );
        return StatusCode::OK.into_response();
    }

    handler
        .handle(activity.into_query_request())
        .await
        .into_response()
}

pub async fn health_handler() -> &'static str {
    "ok"
}
