//! Utility helpers — path resolution, dates, string truncation.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate, Utc};

use crate::types::DateRange;

/// Get the SeaChat data directory (e.g. `~/.seachat/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".seachat")
}

/// Get the REPL history file (e.g. `~/.seachat/history/chat_history`).
pub fn get_history_path() -> PathBuf {
    get_data_path().join("history").join("chat_history")
}

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The `days`-long window ending on `end` (inclusive).
pub fn lookback_range(end: NaiveDate, days: u32) -> DateRange {
    DateRange {
        start: end - Duration::days(i64::from(days)),
        end,
    }
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Helper to get home directory.
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate_string("hello world, this is a long string", 15);
        assert_eq!(result, "hello world,...");
        assert!(result.len() <= 15);
    }

    #[test]
    fn test_truncate_unicode() {
        let result = truncate_string("こんにちは世界です", 5);
        assert_eq!(result, "こん...");
    }

    #[test]
    fn test_lookback_range() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let range = lookback_range(end, 7);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 2, 27).unwrap());
        assert_eq!(range.end, end);
    }

    #[test]
    fn test_data_path_ends_with_seachat() {
        assert!(get_data_path().ends_with(".seachat"));
    }

    #[test]
    fn test_history_path() {
        let path = get_history_path();
        assert!(path.ends_with("chat_history"));
        assert!(path.to_string_lossy().contains(".seachat"));
    }
}
