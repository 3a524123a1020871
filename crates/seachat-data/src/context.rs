//! Context builder: turns a query and the data gathered for it into chat
//! messages for the model.

use chrono::Utc;
use tracing::debug;

use seachat_core::types::{Message, SourceResult, TopicFlag};
use seachat_core::utils::truncate_string;

use crate::classifier::{Classification, TopicStatus};

/// Characters of pretty-printed JSON kept per source.
pub const DEFAULT_SOURCE_BUDGET: usize = 6000;

/// Builds the system prompt and the message list for an answer.
#[derive(Clone, Debug)]
pub struct ContextBuilder {
    assistant_name: String,
    source_budget: usize,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new("SeaChat")
    }
}

impl ContextBuilder {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            source_budget: DEFAULT_SOURCE_BUDGET,
        }
    }

    /// Set the per-source character budget (builder pattern).
    pub fn with_source_budget(mut self, chars: usize) -> Self {
        self.source_budget = chars;
        self
    }

    // ────────────── System prompt ──────────────

    pub fn build_system_prompt(&self) -> String {
        let now = Utc::now().format("%Y-%m-%d %H:%M UTC");
        format!(
            "# Identity\n\n\
             You are **{name}**, an assistant for oceanographic questions.\n\n\
             - **Date/time**: {now}\n\n\
             Answer from the data supplied with each question. \
             When a source is listed as unavailable, say so instead of guessing its values. \
             When a source was not queried because no region was named, \
             ask which region the user means. \
             Quote units and dates as they appear in the data. \
             Be concise.",
            name = self.assistant_name,
        )
    }

    // ────────────── Data section ──────────────

    /// Describe the region, how each source fared, and the payloads.
    pub fn build_data_section(
        &self,
        classification: &Classification,
        data: &SourceResult,
    ) -> String {
        let mut parts: Vec<String> = Vec::new();

        match &classification.location {
            Some(loc) => parts.push(format!("Region: {} ({})", loc.name, loc.coordinates)),
            None => parts.push("Region: not detected".to_string()),
        }

        if classification.topics.is_empty() {
            parts.push("No data sources matched this question.".to_string());
            return parts.join("\n");
        }

        let mut answered: Vec<TopicFlag> = Vec::new();
        let mut unavailable: Vec<TopicFlag> = Vec::new();
        let mut needs_location: Vec<TopicFlag> = Vec::new();
        for &topic in &classification.topics {
            match classification.topic_status(topic, data) {
                TopicStatus::Answered => answered.push(topic),
                TopicStatus::Unavailable => unavailable.push(topic),
                TopicStatus::NeedsLocation => needs_location.push(topic),
            }
        }

        if !answered.is_empty() {
            parts.push(format!("Sources with data: {}", labels(&answered)));
        }
        if !unavailable.is_empty() {
            parts.push(format!("Sources unavailable: {}", labels(&unavailable)));
        }
        if !needs_location.is_empty() {
            parts.push(format!(
                "Sources not queried, no region named: {}",
                labels(&needs_location)
            ));
        }

        for topic in &answered {
            let Some(payload) = data.get(topic.result_key()) else {
                continue;
            };
            let pretty = serde_json::to_string_pretty(payload)
                .unwrap_or_else(|_| payload.to_string());
            let body = truncate_string(&pretty, self.source_budget);
            debug!(
                key = topic.result_key(),
                chars = pretty.chars().count(),
                kept = body.chars().count(),
                "adding source payload to context"
            );
            parts.push(format!("## {}\n\n```json\n{body}\n```", topic.label()));
        }

        parts.join("\n\n")
    }

    // ────────────── Message building ──────────────

    /// Build the full message list for an answer.
    ///
    /// 1. System prompt
    /// 2. Earlier turns
    /// 3. The question with its data
    pub fn build_messages(
        &self,
        history: &[Message],
        query: &str,
        classification: &Classification,
        data: &SourceResult,
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.build_system_prompt()));
        messages.extend_from_slice(history);
        messages.push(Message::user(format!(
            "{query}\n\n---\n\n{}",
            self.build_data_section(classification, data)
        )));
        messages
    }
}

fn labels(topics: &[TopicFlag]) -> String {
    topics
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::QueryClassifier;
    use serde_json::json;

    fn classify(query: &str) -> Classification {
        QueryClassifier::default().classify(query)
    }

    #[test]
    fn test_system_prompt_names_assistant() {
        let prompt = ContextBuilder::new("Nemo").build_system_prompt();
        assert!(prompt.contains("**Nemo**"));
        assert!(prompt.contains("unavailable"));
    }

    #[test]
    fn test_data_section_lists_missing_sources() {
        let c = classify("temperature and tides near Mumbai");
        let mut data = SourceResult::new();
        data.insert(TopicFlag::Tides, json!({ "predictions": [] }));

        let section = ContextBuilder::default().build_data_section(&c, &data);
        assert!(section.contains("Region: Mumbai (19.07, 72.88)"));
        assert!(section.contains("Sources with data: tides"));
        assert!(section.contains("Sources unavailable: argo"));
        assert!(!section.contains("not queried"));
        assert!(section.contains("\"predictions\""));
    }

    #[test]
    fn test_data_section_separates_topics_without_region() {
        let c = classify("chlorophyll and tides");
        let mut data = SourceResult::new();
        data.insert(TopicFlag::Tides, json!({ "predictions": [] }));

        let section = ContextBuilder::default().build_data_section(&c, &data);
        assert!(section.contains("Region: not detected"));
        assert!(section.contains("Sources with data: tides"));
        assert!(section.contains("Sources not queried, no region named: chlorophyll"));
        assert!(!section.contains("Sources unavailable"));
    }

    #[test]
    fn test_data_section_without_matches() {
        let section = ContextBuilder::default()
            .build_data_section(&classify("hello"), &SourceResult::new());
        assert!(section.contains("Region: not detected"));
        assert!(section.contains("No data sources matched"));
    }

    #[test]
    fn test_payload_is_truncated_to_budget() {
        let c = classify("salinity in the Pacific");
        let mut data = SourceResult::new();
        data.insert(TopicFlag::Argo, json!({ "blob": "x".repeat(500) }));

        let section = ContextBuilder::default()
            .with_source_budget(40)
            .build_data_section(&c, &data);
        assert!(section.contains("..."));
        assert!(!section.contains(&"x".repeat(100)));
    }

    #[test]
    fn test_build_messages_order() {
        let query = "tidal predictions";
        let c = classify(query);
        let history = vec![Message::user("hi"), Message::assistant("hello")];
        let data = SourceResult::new();
        let builder = ContextBuilder::default();
        let messages = builder.build_messages(&history, query, &c, &data);

        assert_eq!(messages.len(), 4);
        assert!(matches!(messages[0], Message::System { .. }));
        assert_eq!(messages[1], Message::user("hi"));
        let last = messages[3].content().unwrap();
        assert!(last.starts_with("tidal predictions"));
        assert!(last.contains("Sources unavailable"));
    }
}
