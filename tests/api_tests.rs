use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use mockito::{Matcher, Server};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use msgext_search::api::create_router;
use msgext_search::query_handler::SearchCommandHandler;
use msgext_search::search_client::SearchClient;

mod test_helpers {
    use super::*;

    pub fn app_for(server: &Server) -> Router {
        let client = SearchClient::new(
            &format!("{}/search/repositories", server.url()),
            Duration::from_secs(5),
            "msgext-search-tests",
        )
        .unwrap();
        create_router(Arc::new(SearchCommandHandler::new(client)))
    }

    pub async fn silent_app() -> Router {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        let client = SearchClient::new(
            &format!("http://{addr}/search/repositories"),
            Duration::from_millis(300),
            "msgext-search-tests",
        )
        .unwrap();
        create_router(Arc::new(SearchCommandHandler::new(client)))
    }

    pub fn query_activity(command_id: &str, parameters: Value) -> Value {
        json!({
            "type": "invoke",
            "name": "composeExtension/query",
            "value": {
                "commandId": command_id,
                "parameters": parameters,
            }
        })
    }

    pub async fn post_activity(app: Router, activity: Value) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header("content-type", "application/json")
            .body(Body::from(activity.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_search_query_returns_cards() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::UrlEncoded("q".into(), "teams-ai".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total_count": 2,
                "items": [
                    {
                        "name": "teams-ai",
                        "description": "AI toolkit for building intelligent Teams apps with large language models and more",
                        "html_url": "https://github.com/microsoft/teams-ai"
                    },
                    {
                        "name": "teams-js",
                        "description": null,
                        "html_url": "https://github.com/OfficeDev/microsoft-teams-library-js"
                    }
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let activity = query_activity(
        "searchQuery",
        json!([{ "name": "searchQuery", "value": "teams-ai" }]),
    );
    let (status, body) = post_activity(app_for(&server), activity).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    let result = &body["composeExtension"];
    assert_eq!(result["type"], "result");
    assert_eq!(result["attachmentLayout"], "list");

    let attachments = result["attachments"].as_array().unwrap();
    assert_eq!(attachments.len(), 2);
    assert_eq!(
        attachments[0]["preview"]["content"]["subtitle"],
        "AI toolkit for building intelligent Teams apps wit"
    );
    assert_eq!(
        attachments[0]["content"]["actions"][0]["url"],
        "https://github.com/microsoft/teams-ai"
    );
    assert_eq!(attachments[1]["preview"]["content"]["title"], "teams-js");
    assert_eq!(attachments[1]["preview"]["content"]["subtitle"], "");
}

#[tokio::test]
async fn test_unknown_command_is_bad_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let activity = query_activity(
        "unknownCommand",
        json!([{ "name": "searchQuery", "value": "teams-ai" }]),
    );
    let (status, body) = post_activity(app_for(&server), activity).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "status": 400 }));
}

#[tokio::test]
async fn test_missing_parameters_returns_empty_list() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let activity = json!({
        "type": "invoke",
        "name": "composeExtension/query",
        "value": { "commandId": "searchQuery" }
    });
    let (status, body) = post_activity(app_for(&server), activity).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["composeExtension"]["attachmentLayout"], "list");
    assert_eq!(body["composeExtension"]["attachments"], json!([]));
}

#[tokio::test]
async fn test_null_parameters_returns_empty_list() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let activity = query_activity("searchQuery", Value::Null);
    let (status, body) = post_activity(app_for(&server), activity).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["composeExtension"]["attachments"], json!([]));
}

#[tokio::test]
async fn test_upstream_failure_is_internal_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("service unavailable")
        .create_async()
        .await;

    let activity = query_activity("searchQuery", json!([{ "name": "searchQuery", "value": "rust" }]));
    let (status, body) = post_activity(app_for(&server), activity).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], 500);
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_search_timeout_is_internal_error() {
    let activity = query_activity("searchQuery", json!([{ "name": "searchQuery", "value": "rust" }]));
    let (status, body) = post_activity(silent_app().await, activity).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], 500);
    assert!(body["error"].as_str().unwrap().starts_with("search request failed"));
}

#[tokio::test]
async fn test_other_activities_are_acknowledged() {
    let server = Server::new_async().await;

    let activity = json!({ "type": "message", "text": "hello" });
    let (status, body) = post_activity(app_for(&server), activity).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_health() {
    let server = Server::new_async().await;
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app_for(&server).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}
