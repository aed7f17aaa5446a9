use serde::Serialize;

use crate::data_models::SearchResult;

pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
pub const HERO_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.hero";
pub const ADAPTIVE_CARD_VERSION: &str = "1.4";

pub const DETAIL_SUMMARY_CHARS: usize = 100;
pub const PREVIEW_SUMMARY_CHARS: usize = 50;
pub const OPEN_URL_TITLE: &str = "View on GitHub";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum CardElement {
    TextBlock(TextBlock),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBlock {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<TextSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<TextWeight>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub wrap: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Large,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextWeight {
    Bolder,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum CardAction {
    #[serde(rename = "Action.OpenUrl")]
    OpenUrl { title: String, url: String },
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveCard {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: &'static str,
    pub body: Vec<CardElement>,
    pub actions: Vec<CardAction>,
}

impl AdaptiveCard {
    pub fn new(body: Vec<CardElement>, actions: Vec<CardAction>) -> Self {
        Self {
            kind: "AdaptiveCard",
            version: ADAPTIVE_CARD_VERSION,
            body,
            actions,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HeroCard {
    pub title: String,
    pub subtitle: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewAttachment {
    pub content_type: &'static str,
    pub content: HeroCard,
}

/// Detail card shown on selection plus the compact preview shown in the list.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultAttachment {
    pub content_type: &'static str,
    #[serde(rename = "content")]
    pub detail: AdaptiveCard,
    pub preview: PreviewAttachment,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Result,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentLayout {
    List,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionResult {
    #[serde(rename = "type")]
    pub result_type: ResultType,
    pub attachment_layout: AttachmentLayout,
    pub attachments: Vec<ResultAttachment>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionResponse {
    pub compose_extension: MessagingExtensionResult,
}

/// First `max_chars` characters of `text`. Counts chars, not words or bytes.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

pub fn detail_card(result: &SearchResult) -> AdaptiveCard {
    let title = TextBlock {
        text: result.name.clone(),
        size: Some(TextSize::Large),
        weight: Some(TextWeight::Bolder),
        ..Default::default()
    };
    let summary = TextBlock {
        text: truncate_chars(&result.summary, DETAIL_SUMMARY_CHARS),
        wrap: true,
        ..Default::default()
    };

    AdaptiveCard::new(
        vec![CardElement::TextBlock(title), CardElement::TextBlock(summary)],
        vec![CardAction::OpenUrl {
            title: OPEN_URL_TITLE.to_string(),
            url: result.url.clone(),
        }],
    )
}

pub fn preview_card(result: &SearchResult) -> HeroCard {
    HeroCard {
        title: result.name.clone(),
        subtitle: truncate_chars(&result.summary, PREVIEW_SUMMARY_CHARS),
    }
}

pub fn result_attachment(result: &SearchResult) -> ResultAttachment {
    ResultAttachment {
        content_type: ADAPTIVE_CARD_CONTENT_TYPE,
        detail: detail_card(result),
        preview: PreviewAttachment {
            content_type: HERO_CARD_CONTENT_TYPE,
            content: preview_card(result),
        },
    }
}

/// Maps results to attachments, keeping input order, in a list-layout response.
pub fn render(results: &[SearchResult]) -> MessagingExtensionResponse {
    let attachments = results.iter().map(result_attachment).collect();
    MessagingExtensionResponse {
        compose_extension: MessagingExtensionResult {
            result_type: ResultType::Result,
            attachment_layout: AttachmentLayout::List,
            attachments,
        },
    }
}

#[cfg(test)]
fn sample(name: &str, summary: &str) -> SearchResult {
    SearchResult {
        name: name.to_string(),
        summary: summary.to_string(),
        url: format!("https://github.com/org/{name}"),
    }
}

#[test]
fn test_truncate_chars() {
    assert_eq!(truncate_chars("", 50), "");
    assert_eq!(truncate_chars("short", 50), "short");
    assert_eq!(truncate_chars("abcdef", 3), "abc");
    assert_eq!(truncate_chars("abc", 3), "abc");
    // multi-byte chars count as one each
    assert_eq!(truncate_chars("héllo wörld", 4), "héll");
    assert_eq!(truncate_chars("🦀🦀🦀", 2), "🦀🦀");
    // not word aware
    assert_eq!(truncate_chars("hello world", 7), "hello w");
}

#[test]
fn test_render_truncates_summaries() {
    let long = "x".repeat(80) + &"y".repeat(80);
    let response = render(&[sample("long-repo", &long)]);
    let attachment = &response.compose_extension.attachments[0];

    let CardElement::TextBlock(text) = &attachment.detail.body[1];
    assert_eq!(text.text, &long[..100]);
    assert!(text.wrap);
    assert_eq!(attachment.preview.content.subtitle, &long[..50]);
    assert_eq!(attachment.preview.content.title, "long-repo");
}

#[test]
fn test_render_detail_card_shape() {
    let response = render(&[sample("teams-ai", "AI toolkit")]);
    let attachment = &response.compose_extension.attachments[0];

    assert_eq!(attachment.content_type, ADAPTIVE_CARD_CONTENT_TYPE);
    assert_eq!(attachment.preview.content_type, HERO_CARD_CONTENT_TYPE);

    let CardElement::TextBlock(title) = &attachment.detail.body[0];
    assert_eq!(title.text, "teams-ai");
    assert_eq!(title.size, Some(TextSize::Large));
    assert_eq!(title.weight, Some(TextWeight::Bolder));

    assert_eq!(
        attachment.detail.actions,
        vec![CardAction::OpenUrl {
            title: "View on GitHub".to_string(),
            url: "https://github.com/org/teams-ai".to_string(),
        }]
    );
}

#[test]
fn test_render_empty_and_ordering() {
    let empty = render(&[]);
    assert!(empty.compose_extension.attachments.is_empty());
    assert_eq!(empty.compose_extension.attachment_layout, AttachmentLayout::List);

    let input = vec![sample("a", ""), sample("b", "bee"), sample("c", "sea")];
    let first = render(&input);
    let titles: Vec<&str> = first
        .compose_extension
        .attachments
        .iter()
        .map(|a| a.preview.content.title.as_str())
        .collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
    assert_eq!(first.compose_extension.attachments[0].preview.content.subtitle, "");

    // pure: same input, same output
    assert_eq!(first, render(&input));
}

#[test]
fn test_render_wire_format() {
    let response = render(&[sample("teams-js", "")]);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "composeExtension": {
                "type": "result",
                "attachmentLayout": "list",
                "attachments": [{
                    "contentType": "application/vnd.microsoft.card.adaptive",
                    "content": {
                        "type": "AdaptiveCard",
                        "version": "1.4",
                        "body": [
                            {"type": "TextBlock", "text": "teams-js", "size": "Large", "weight": "Bolder"},
                            {"type": "TextBlock", "text": "", "wrap": true}
                        ],
                        "actions": [
                            {"type": "Action.OpenUrl", "title": "View on GitHub", "url": "https://github.com/org/teams-js"}
                        ]
                    },
                    "preview": {
                        "contentType": "application/vnd.microsoft.card.hero",
                        "content": {"title": "teams-js", "subtitle": ""}
                    }
                }]
            }
        })
    );
}
