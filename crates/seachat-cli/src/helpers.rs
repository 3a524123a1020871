//! Shared CLI helpers — path expansion, result printing, version banner.

use std::path::PathBuf;

use colored::Colorize;

use seachat_core::types::{SourceResult, TopicFlag};
use seachat_data::{Classification, TopicStatus};

use crate::app::{Answer, Reply};

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print everything an `ask` produced.
pub fn print_answer(answer: &Answer) {
    println!();
    print_sources(&answer.classification, &answer.data);
    match &answer.reply {
        Some(reply) => print_reply(reply),
        None => print_data(&answer.data),
    }
    println!();
}

/// Print the model's reply, naming the model that produced it.
pub fn print_reply(reply: &Reply) {
    println!();
    let title = format!("🌊 SeaChat · {}", reply.model_display_name);
    println!("{}", title.cyan().bold());
    if reply.used_fallback {
        println!(
            "{}",
            "⚠ no preferred model answered its probe; using the fallback model".yellow()
        );
    }
    println!("{}", reply.text);
}

/// One line per requested source: answered, unavailable, or not queried.
pub fn print_sources(classification: &Classification, data: &SourceResult) {
    if classification.topics.is_empty() {
        println!("{}", "(no data sources matched this question)".dimmed());
        return;
    }
    let region = classification
        .location
        .as_ref()
        .map_or_else(|| "no region detected".to_string(), |l| l.name.to_string());
    println!("{} {}", "Region:".bold(), region);
    for topic in &classification.topics {
        let status = classification.topic_status(*topic, data);
        println!("  {}", source_line(*topic, status));
    }
}

fn source_line(topic: TopicFlag, status: TopicStatus) -> String {
    let key = topic.result_key();
    match status {
        TopicStatus::Answered => format!("{} {key}", "✓".green()),
        TopicStatus::Unavailable => format!(
            "{} {}",
            "✗".red(),
            format!("{key} (unavailable)").dimmed()
        ),
        TopicStatus::NeedsLocation => format!(
            "{} {}",
            "·".yellow(),
            format!("{key} (needs a location)").dimmed()
        ),
    }
}

/// Print the raw merged data as pretty JSON.
pub fn print_data(data: &SourceResult) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to render data: {e}"),
    }
}

/// Print a classification without fetching anything.
pub fn print_classification(classification: &Classification) {
    match &classification.location {
        Some(loc) => println!("{} {} ({})", "Location:".bold(), loc.name, loc.coordinates),
        None => println!("{} {}", "Location:".bold(), "none".dimmed()),
    }
    if classification.topics.is_empty() {
        println!("{} {}", "Topics:".bold(), "none".dimmed());
    } else {
        let topics: Vec<String> = classification
            .topics
            .iter()
            .map(|t| format!("{t} → {}", t.result_key()))
            .collect();
        println!("{} {}", "Topics:".bold(), topics.join(", "));
    }
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🌊 SeaChat".cyan().bold(), version.dimmed());
    println!("{}", "Ask about the ocean, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print a "thinking" spinner placeholder (for non-log mode).
pub fn print_thinking() {
    eprint!("{}", "⠿ fetching...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use seachat_data::QueryClassifier;
    use serde_json::json;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/sea/config.json");
        assert!(result.ends_with("sea/config.json"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_leaves_other_paths() {
        assert_eq!(
            expand_tilde("/etc/sea.json"),
            PathBuf::from("/etc/sea.json")
        );
        assert_eq!(expand_tilde("sea.json"), PathBuf::from("sea.json"));
    }

    #[test]
    fn source_line_marks_each_status() {
        colored::control::set_override(false);
        let classification = QueryClassifier::default().classify("chlorophyll and tides");
        let mut data = SourceResult::new();
        data.insert(TopicFlag::Tides, json!({}));
        let line = |topic| source_line(topic, classification.topic_status(topic, &data));
        assert_eq!(line(TopicFlag::Tides), "✓ tidesData");
        assert_eq!(
            line(TopicFlag::Chlorophyll),
            "· nasaData (needs a location)"
        );

        let empty = SourceResult::new();
        let status = classification.topic_status(TopicFlag::Tides, &empty);
        assert_eq!(
            source_line(TopicFlag::Tides, status),
            "✗ tidesData (unavailable)"
        );
    }
}
