//! Static classification rules: the gazetteer and the topic keyword sets.
//!
//! Both tables are evaluated top to bottom. Gazetteer keyword sets overlap on
//! purpose ("mumbai" selects Mumbai before it can select the Arabian Sea), so
//! reordering entries changes behaviour. Bump [`GAZETTEER_VERSION`] when
//! editing either table.

use seachat_core::types::{GeoTrigger, TopicFlag};

/// Revision of the rule tables below.
pub const GAZETTEER_VERSION: u32 = 1;

/// Places a query can refer to, in match precedence order.
pub static GAZETTEER: &[GeoTrigger] = &[
    GeoTrigger {
        name: "Mumbai",
        latitude: 19.07,
        longitude: 72.88,
        keywords: &["mumbai", "bombay"],
    },
    GeoTrigger {
        name: "Arabian Sea",
        latitude: 15.0,
        longitude: 65.0,
        keywords: &["arabian sea", "arabian", "mumbai", "karachi"],
    },
    GeoTrigger {
        name: "Chennai",
        latitude: 13.08,
        longitude: 80.27,
        keywords: &["chennai", "madras"],
    },
    GeoTrigger {
        name: "Bay of Bengal",
        latitude: 15.0,
        longitude: 88.0,
        keywords: &["bay of bengal", "bengal", "chennai", "kolkata"],
    },
    GeoTrigger {
        name: "Kochi",
        latitude: 9.93,
        longitude: 76.27,
        keywords: &["kochi", "cochin", "kerala"],
    },
    GeoTrigger {
        name: "Goa",
        latitude: 15.30,
        longitude: 73.83,
        keywords: &["goa"],
    },
    GeoTrigger {
        name: "Visakhapatnam",
        latitude: 17.69,
        longitude: 83.22,
        keywords: &["visakhapatnam", "vizag"],
    },
    GeoTrigger {
        name: "Andaman Sea",
        latitude: 10.0,
        longitude: 96.0,
        keywords: &["andaman", "nicobar"],
    },
    GeoTrigger {
        name: "Sri Lanka",
        latitude: 7.87,
        longitude: 80.77,
        keywords: &["sri lanka", "colombo"],
    },
    GeoTrigger {
        name: "Indian Ocean",
        latitude: -10.0,
        longitude: 75.0,
        keywords: &["indian ocean"],
    },
    GeoTrigger {
        name: "Mediterranean",
        latitude: 35.0,
        longitude: 18.0,
        keywords: &["mediterranean"],
    },
    GeoTrigger {
        name: "North Atlantic",
        latitude: 45.0,
        longitude: -30.0,
        keywords: &["atlantic"],
    },
    GeoTrigger {
        name: "Pacific",
        latitude: 0.0,
        longitude: -160.0,
        keywords: &["pacific"],
    },
];

/// Keywords that raise one topic flag. Flags are independent of each other.
#[derive(Clone, Debug)]
pub struct TopicRule {
    pub topic: TopicFlag,
    pub keywords: &'static [&'static str],
}

/// Topic detection rules.
pub static TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        topic: TopicFlag::Argo,
        keywords: &["temperature", "argo", "salinity", "float"],
    },
    TopicRule {
        topic: TopicFlag::Chlorophyll,
        keywords: &["chlorophyll", "satellite", "productivity", "phytoplankton"],
    },
    TopicRule {
        topic: TopicFlag::Currents,
        keywords: &["current", "forecast", "european", "copernicus"],
    },
    TopicRule {
        topic: TopicFlag::Tides,
        keywords: &["tide", "tidal"],
    },
];
