//! Core types for SeaChat.
//!
//! Two families live here:
//! - the OpenAI-compatible chat completion wire types used by the AI provider layer;
//! - the resolution and aggregation data model (candidates, availability,
//!   gazetteer entries, topic flags, per-query source results).

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Messages (OpenAI chat completions format)
// ─────────────────────────────────────────────

/// A chat message in the OpenAI format.
///
/// Each variant maps to a `role` field value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },

    #[serde(rename = "assistant")]
    Assistant {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: Some(content.into()),
        }
    }

    /// Text content of the message, if any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Message::System { content } | Message::User { content } => Some(content),
            Message::Assistant { content } => content.as_deref(),
        }
    }
}

// ─────────────────────────────────────────────
// LLM Response
// ─────────────────────────────────────────────

/// Response from an LLM provider after a successful chat completion call.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Text content from the assistant.
    pub content: Option<String>,
    /// Why the model stopped generating.
    pub finish_reason: Option<String>,
    /// Token usage statistics.
    pub usage: Option<UsageInfo>,
}

impl LlmResponse {
    /// Trimmed text content, or `None` when the model said nothing.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Token usage statistics from the LLM.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Raw chat completion response from an OpenAI-compatible API.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<UsageInfo>,
}

/// A single choice in a chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message within a chat completion choice.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

impl From<ChatCompletionResponse> for LlmResponse {
    fn from(resp: ChatCompletionResponse) -> Self {
        match resp.choices.into_iter().next() {
            Some(c) => LlmResponse {
                content: c.message.content,
                finish_reason: c.finish_reason,
                usage: resp.usage,
            },
            None => LlmResponse {
                usage: resp.usage,
                ..Default::default()
            },
        }
    }
}

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

// ─────────────────────────────────────────────
// Candidate models
// ─────────────────────────────────────────────

/// One configured, rankable option for AI text generation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateModel {
    /// Model identifier sent to the API (e.g. `"gemini-2.5-flash"`).
    pub name: String,
    /// Human-readable name shown to users.
    pub display_name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl CandidateModel {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        capabilities: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Result of probing one candidate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelAvailability {
    pub candidate: CandidateModel,
    pub is_available: bool,
}

/// One complete probe of every candidate, in candidate order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub entries: Vec<ModelAvailability>,
    pub checked_at: DateTime<Utc>,
}

impl StatusSnapshot {
    /// Number of candidates that answered their probe.
    pub fn available_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_available).count()
    }
}

// ─────────────────────────────────────────────
// Geography
// ─────────────────────────────────────────────

/// A latitude/longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}, {:.2}", self.latitude, self.longitude)
    }
}

/// A gazetteer entry: a named place and the keywords that select it.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoTrigger {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// Lowercase keywords; any one appearing in the query selects this entry.
    pub keywords: &'static [&'static str],
}

impl GeoTrigger {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Inclusive date range for time-bounded source queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// ─────────────────────────────────────────────
// Topics and source results
// ─────────────────────────────────────────────

/// A data topic detected in a query. Each topic gates exactly one provider call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TopicFlag {
    /// Temperature / salinity profiles from Argo floats.
    Argo,
    /// Chlorophyll / primary productivity from satellite ocean colour.
    Chlorophyll,
    /// Ocean current forecasts.
    Currents,
    /// Tide predictions.
    Tides,
}

impl TopicFlag {
    /// All topics, in result-key order.
    pub const ALL: [TopicFlag; 4] = [
        TopicFlag::Argo,
        TopicFlag::Chlorophyll,
        TopicFlag::Currents,
        TopicFlag::Tides,
    ];

    /// The `SourceResult` key this topic's provider writes to.
    pub fn result_key(self) -> &'static str {
        match self {
            TopicFlag::Argo => "argoData",
            TopicFlag::Chlorophyll => "nasaData",
            TopicFlag::Currents => "copernicusData",
            TopicFlag::Tides => "tidesData",
        }
    }

    /// Whether the topic needs a detected location to be queried.
    pub fn requires_location(self) -> bool {
        !matches!(self, TopicFlag::Tides)
    }

    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            TopicFlag::Argo => "argo",
            TopicFlag::Chlorophyll => "chlorophyll",
            TopicFlag::Currents => "currents",
            TopicFlag::Tides => "tides",
        }
    }
}

impl fmt::Display for TopicFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-query merge of successful provider payloads, keyed by result key.
///
/// A failed provider is represented by the absence of its key; no error value
/// is ever stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SourceResult {
    entries: BTreeMap<&'static str, serde_json::Value>,
}

impl SourceResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful payload for `topic`.
    pub fn insert(&mut self, topic: TopicFlag, payload: serde_json::Value) {
        self.entries.insert(topic.result_key(), payload);
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &serde_json::Value)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_message_serialization() {
        let msg = Message::system("You are an oceanography assistant.");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are an oceanography assistant.");
    }

    #[test]
    fn test_user_message_serialization() {
        let msg = Message::user("Salinity near Goa?");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Salinity near Goa?");
    }

    #[test]
    fn test_message_content_accessor() {
        assert_eq!(Message::assistant("hi").content(), Some("hi"));
        assert_eq!(Message::Assistant { content: None }.content(), None);
    }

    #[test]
    fn test_chat_completion_response_parsing() {
        let json = json!({
            "id": "chatcmpl-123",
            "choices": [{
                "message": { "content": "Warm water." },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 12,
                "completion_tokens": 3,
                "total_tokens": 15
            }
        });

        let resp: ChatCompletionResponse = serde_json::from_value(json).unwrap();
        let llm: LlmResponse = resp.into();
        assert_eq!(llm.text(), Some("Warm water."));
        assert_eq!(llm.finish_reason.as_deref(), Some("stop"));
        assert_eq!(llm.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_chat_completion_empty_choices() {
        let json = json!({ "id": "x", "choices": [], "usage": null });
        let resp: ChatCompletionResponse = serde_json::from_value(json).unwrap();
        let llm: LlmResponse = resp.into();
        assert!(llm.text().is_none());
    }

    #[test]
    fn test_llm_response_whitespace_is_empty() {
        let llm = LlmResponse {
            content: Some("  \n".into()),
            ..Default::default()
        };
        assert!(llm.text().is_none());
    }

    #[test]
    fn test_chat_request_skips_unset_fields() {
        let req = ChatCompletionRequest {
            model: "gemini-2.5-flash".into(),
            messages: vec![Message::user("ping")],
            max_tokens: None,
            temperature: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gemini-2.5-flash");
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_candidate_model_camel_case() {
        let c = CandidateModel::new("gemini-2.5-pro", "Gemini 2.5 Pro", &["reasoning"]);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["displayName"], "Gemini 2.5 Pro");
        assert_eq!(json["capabilities"][0], "reasoning");
    }

    #[test]
    fn test_topic_result_keys_are_distinct() {
        let mut keys: Vec<&str> = TopicFlag::ALL.iter().map(|t| t.result_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_only_tides_is_location_free() {
        assert!(TopicFlag::Argo.requires_location());
        assert!(TopicFlag::Chlorophyll.requires_location());
        assert!(TopicFlag::Currents.requires_location());
        assert!(!TopicFlag::Tides.requires_location());
    }

    #[test]
    fn test_source_result_insert_and_serialize() {
        let mut result = SourceResult::new();
        assert!(result.is_empty());

        result.insert(TopicFlag::Tides, json!({"predictions": []}));
        result.insert(TopicFlag::Argo, json!([{"id": "float-1"}]));

        assert_eq!(result.len(), 2);
        assert!(result.contains_key("argoData"));
        assert!(!result.contains_key("nasaData"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["argoData"][0]["id"], "float-1");
        assert!(json["tidesData"]["predictions"].is_array());
    }

    #[test]
    fn test_snapshot_available_count() {
        let c = CandidateModel::new("a", "A", &[]);
        let snapshot = StatusSnapshot {
            entries: vec![
                ModelAvailability {
                    candidate: c.clone(),
                    is_available: true,
                },
                ModelAvailability {
                    candidate: c,
                    is_available: false,
                },
            ],
            checked_at: Utc::now(),
        };
        assert_eq!(snapshot.available_count(), 1);
    }
}
