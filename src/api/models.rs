use serde::Deserialize;

use crate::data_models::QueryRequest;

pub const INVOKE_ACTIVITY: &str = "invoke";
pub const QUERY_INVOKE_NAME: &str = "composeExtension/query";

/// Inbound activity. Only the fields the query path reads are modeled.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<MessagingExtensionQuery>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionQuery {
    #[serde(default)]
    pub command_id: Option<String>,
    #[serde(default)]
    pub parameters: Option<Vec<QueryParameter>>,
}

#[derive(Debug, Deserialize)]
pub struct QueryParameter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl Activity {
    pub fn is_query_invoke(&self) -> bool {
        self.activity_type == INVOKE_ACTIVITY && self.name.as_deref() == Some(QUERY_INVOKE_NAME)
    }

    /// Command id plus the first parameter's value, defaulting to an empty query.
    pub fn into_query_request(self) -> QueryRequest {
        let value = self.value.unwrap_or_default();
        let query_text = value
            .parameters
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|p| p.value)
            .unwrap_or_default();
        QueryRequest::new(value.command_id.unwrap_or_default(), query_text)
    }
}

#[test]
fn test_activity_to_query_request() {
    let activity: Activity = serde_json::from_str(
        r#"{
            "type": "invoke",
            "name": "composeExtension/query",
            "value": {
                "commandId": "searchQuery",
                "parameters": [{"name": "searchQuery", "value": "teams-ai"}, {"name": "other", "value": "x"}]
            }
        }"#,
    )
    .unwrap();
    assert!(activity.is_query_invoke());
    assert_eq!(
        activity.into_query_request(),
        QueryRequest::new("searchQuery", "teams-ai")
    );
}

#[test]
fn test_activity_missing_parameters() {
    let no_params: Activity = serde_json::from_str(
        r#"{"type": "invoke", "name": "composeExtension/query", "value": {"commandId": "searchQuery"}}"#,
    )
    .unwrap();
    assert_eq!(no_params.into_query_request(), QueryRequest::new("searchQuery", ""));

    let null_value: Activity = serde_json::from_str(
        r#"{"type": "invoke", "name": "composeExtension/query",
            "value": {"commandId": "searchQuery", "parameters": [{"name": "searchQuery", "value": null}]}}"#,
    )
    .unwrap();
    assert_eq!(null_value.into_query_request().query_text, "");

    let message: Activity = serde_json::from_str(r#"{"type": "message", "text": "hi"}"#).unwrap();
    assert!(!message.is_query_invoke());
}

#[test]
fn test_activity_null_fields() {
    let null_params: Activity = serde_json::from_str(
        r#"{"type": "invoke", "name": "composeExtension/query",
            "value": {"commandId": "searchQuery", "parameters": null}}"#,
    )
    .unwrap();
    assert_eq!(null_params.into_query_request(), QueryRequest::new("searchQuery", ""));

    let null_command: Activity = serde_json::from_str(
        r#"{"type": "invoke", "name": "composeExtension/query",
            "value": {"commandId": null, "parameters": [{"name": "q", "value": "rust"}]}}"#,
    )
    .unwrap();
    assert_eq!(null_command.into_query_request(), QueryRequest::new("", "rust"));

    let null_value: Activity = serde_json::from_str(
        r#"{"type": "invoke", "name": "composeExtension/query", "value": null}"#,
    )
    .unwrap();
    assert_eq!(null_value.into_query_request(), QueryRequest::default());
}
