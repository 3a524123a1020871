//! Ocean data layer for SeaChat.
//!
//! # Architecture
//!
//! - [`gazetteer`] — ordered place and topic keyword tables
//! - [`classifier::QueryClassifier`] — query → location + topic flags
//! - [`client::OceanDataClient`] — one call per upstream source;
//!   [`client::HttpOceanClient`] implements it over HTTP
//! - [`aggregator::Aggregator`] — concurrent fan-out, failures dropped per source
//! - [`context::ContextBuilder`] — chat messages carrying the gathered data

pub mod aggregator;
pub mod classifier;
pub mod client;
pub mod context;
pub mod gazetteer;

pub use aggregator::{Aggregator, SourceCall};
pub use classifier::{Classification, Location, QueryClassifier, TopicStatus};
pub use client::{HttpOceanClient, OceanDataClient};
pub use context::ContextBuilder;
pub use gazetteer::{TopicRule, GAZETTEER, GAZETTEER_VERSION, TOPIC_RULES};
