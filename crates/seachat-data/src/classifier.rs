//! Keyword classification of free-text queries.

use std::collections::BTreeSet;

use tracing::debug;

use seachat_core::types::{Coordinates, GeoTrigger, SourceResult, TopicFlag};

use crate::gazetteer::{TopicRule, GAZETTEER, TOPIC_RULES};

/// A place detected in a query.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub coordinates: Coordinates,
}

/// What a query is about: at most one place, any number of topics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    pub location: Option<Location>,
    pub topics: BTreeSet<TopicFlag>,
}

/// How one detected topic fared once its data was gathered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopicStatus {
    /// The source answered.
    Answered,
    /// The source was called and failed or timed out.
    Unavailable,
    /// Not queried: the topic needs a location and none was detected.
    NeedsLocation,
}

impl Classification {
    /// No place and no topic detected.
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.topics.is_empty()
    }

    /// Status of `topic` given the data gathered for this classification.
    pub fn topic_status(&self, topic: TopicFlag, data: &SourceResult) -> TopicStatus {
        if data.contains_key(topic.result_key()) {
            TopicStatus::Answered
        } else if topic.requires_location() && self.location.is_none() {
            TopicStatus::NeedsLocation
        } else {
            TopicStatus::Unavailable
        }
    }
}

/// Maps a query to a [`Classification`] using ordered keyword rules.
#[derive(Clone, Debug)]
pub struct QueryClassifier {
    gazetteer: &'static [GeoTrigger],
    topic_rules: &'static [TopicRule],
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(GAZETTEER, TOPIC_RULES)
    }
}

impl QueryClassifier {
    pub fn new(gazetteer: &'static [GeoTrigger], topic_rules: &'static [TopicRule]) -> Self {
        Self {
            gazetteer,
            topic_rules,
        }
    }

    /// Classify `query` by case-insensitive substring match.
    ///
    /// The first gazetteer entry with any keyword in the query supplies the
    /// location and later entries are not consulted. Each topic rule is checked
    /// on its own.
    pub fn classify(&self, query: &str) -> Classification {
        let query = query.to_lowercase();

        let location = self
            .gazetteer
            .iter()
            .find(|entry| contains_any(&query, entry.keywords))
            .map(|entry| Location {
                name: entry.name,
                coordinates: entry.coordinates(),
            });

        let topics: BTreeSet<TopicFlag> = self
            .topic_rules
            .iter()
            .filter(|rule| contains_any(&query, rule.keywords))
            .map(|rule| rule.topic)
            .collect();

        debug!(
            location = location.as_ref().map_or("none", |l| l.name),
            topics = ?topics,
            "classified query"
        );

        Classification { location, topics }
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(query: &str) -> Classification {
        QueryClassifier::default().classify(query)
    }

    #[test]
    fn test_mumbai_temperature() {
        let c = classify("sea surface temperature near Mumbai");
        let loc = c.location.unwrap();
        assert_eq!(loc.name, "Mumbai");
        assert_eq!(loc.coordinates, Coordinates::new(19.07, 72.88));
        assert_eq!(c.topics, BTreeSet::from([TopicFlag::Argo]));
    }

    #[test]
    fn test_first_declared_match_wins() {
        // Both Mumbai and Arabian Sea match; Mumbai is declared first.
        let c = classify("Salinity in the Arabian Sea off Mumbai");
        assert_eq!(c.location.unwrap().name, "Mumbai");
    }

    #[test]
    fn test_later_entry_matches_when_earlier_does_not() {
        let c = classify("arabian sea salinity");
        assert_eq!(c.location.unwrap().name, "Arabian Sea");
    }

    #[test]
    fn test_chennai_beats_bay_of_bengal() {
        let c = classify("Bay of Bengal currents near Chennai");
        assert_eq!(c.location.unwrap().name, "Chennai");
        assert_eq!(c.topics, BTreeSet::from([TopicFlag::Currents]));
    }

    #[test]
    fn test_case_insensitive() {
        let c = classify("CHLOROPHYLL around GOA");
        assert_eq!(c.location.unwrap().name, "Goa");
        assert!(c.topics.contains(&TopicFlag::Chlorophyll));
    }

    #[test]
    fn test_tidal_without_location() {
        let c = classify("tidal predictions");
        assert!(c.location.is_none());
        assert_eq!(c.topics, BTreeSet::from([TopicFlag::Tides]));
    }

    #[test]
    fn test_topics_are_not_exclusive() {
        let c = classify("temperature, chlorophyll, current forecast and tides for Kochi");
        assert_eq!(c.location.unwrap().name, "Kochi");
        assert_eq!(
            c.topics,
            BTreeSet::from([
                TopicFlag::Argo,
                TopicFlag::Chlorophyll,
                TopicFlag::Currents,
                TopicFlag::Tides,
            ])
        );
    }

    #[test]
    fn test_no_keywords() {
        let c = classify("hello");
        assert!(c.is_empty());
    }

    #[test]
    fn test_location_only() {
        let c = classify("tell me about the Pacific");
        assert_eq!(c.location.unwrap().name, "Pacific");
        assert!(c.topics.is_empty());
    }

    #[test]
    fn test_topic_status_without_location() {
        let c = classify("chlorophyll and tides");
        let mut data = SourceResult::new();
        assert_eq!(
            c.topic_status(TopicFlag::Chlorophyll, &data),
            TopicStatus::NeedsLocation
        );
        assert_eq!(
            c.topic_status(TopicFlag::Tides, &data),
            TopicStatus::Unavailable
        );

        data.insert(TopicFlag::Tides, serde_json::json!({}));
        assert_eq!(
            c.topic_status(TopicFlag::Tides, &data),
            TopicStatus::Answered
        );
    }

    #[test]
    fn test_topic_status_with_location() {
        let c = classify("chlorophyll near Goa");
        assert_eq!(
            c.topic_status(TopicFlag::Chlorophyll, &SourceResult::new()),
            TopicStatus::Unavailable
        );
    }

    #[test]
    fn test_custom_rules() {
        static PLACES: &[GeoTrigger] = &[GeoTrigger {
            name: "Test Reef",
            latitude: 1.0,
            longitude: 2.0,
            keywords: &["reef"],
        }];
        static TOPICS: &[TopicRule] = &[TopicRule {
            topic: TopicFlag::Tides,
            keywords: &["water level"],
        }];

        let c = QueryClassifier::new(PLACES, TOPICS)
            .classify("Water level at the reef");
        assert_eq!(c.location.unwrap().name, "Test Reef");
        assert_eq!(c.topics, BTreeSet::from([TopicFlag::Tides]));
    }
}
