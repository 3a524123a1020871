//! Concurrent fan-out to the ocean data sources.
//!
//! A query is classified, turned into a plan of independent source calls, and
//! every call is started at once. The aggregator waits for all of them to
//! settle, then keeps only the successes. Each call has its own timeout, so
//! one stuck upstream cannot hold up the rest for longer than that.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use seachat_core::config::SourcesConfig;
use seachat_core::types::{Coordinates, DateRange, SourceResult, TopicFlag};
use seachat_core::utils::{lookback_range, today};
use seachat_core::SourceError;

use crate::classifier::{Classification, QueryClassifier};
use crate::client::OceanDataClient;

/// One planned source call.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceCall {
    Argo(Coordinates),
    Chlorophyll(Coordinates),
    Currents(Coordinates),
    /// Uses the configured station; independent of any detected location.
    Tides,
}

impl SourceCall {
    pub fn topic(&self) -> TopicFlag {
        match self {
            SourceCall::Argo(_) => TopicFlag::Argo,
            SourceCall::Chlorophyll(_) => TopicFlag::Chlorophyll,
            SourceCall::Currents(_) => TopicFlag::Currents,
            SourceCall::Tides => TopicFlag::Tides,
        }
    }

    fn source_name(&self) -> &'static str {
        match self {
            SourceCall::Argo(_) => "argo",
            SourceCall::Chlorophyll(_) => "nasa",
            SourceCall::Currents(_) => "copernicus",
            SourceCall::Tides => "tides",
        }
    }
}

/// Classifies queries and gathers data from every relevant source.
pub struct Aggregator {
    client: Arc<dyn OceanDataClient>,
    classifier: QueryClassifier,
    tide_station: String,
    radius_km: f64,
    call_timeout: Duration,
    lookback_days: Option<u32>,
}

impl Aggregator {
    pub fn new(client: Arc<dyn OceanDataClient>, config: &SourcesConfig) -> Self {
        Self {
            client,
            classifier: QueryClassifier::default(),
            tide_station: config.tides.station_id.clone(),
            radius_km: config.radius_km,
            call_timeout: config.call_timeout(),
            lookback_days: config.lookback_days,
        }
    }

    /// Replace the classifier (builder pattern).
    pub fn with_classifier(mut self, classifier: QueryClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }

    /// Classify `query` and fetch every source it calls for.
    pub async fn aggregate(&self, query: &str) -> SourceResult {
        let classification = self.classifier.classify(query);
        self.aggregate_classified(&classification).await
    }

    /// Fetch every source an existing classification calls for.
    ///
    /// Never fails: a source that errors or times out is left out of the result.
    pub async fn aggregate_classified(&self, classification: &Classification) -> SourceResult {
        let calls = self.plan(classification);
        if calls.is_empty() {
            debug!("no sources apply to query");
            return SourceResult::new();
        }

        let outcomes = join_all(calls.iter().map(|call| self.run(call))).await;

        let mut result = SourceResult::new();
        for (call, outcome) in calls.iter().zip(outcomes) {
            match outcome {
                Ok(payload) => result.insert(call.topic(), payload),
                Err(e) => warn!(
                    source = call.source_name(),
                    key = call.topic().result_key(),
                    error = %e,
                    "source failed, omitting from result"
                ),
            }
        }

        info!(
            requested = calls.len(),
            succeeded = result.len(),
            "aggregation complete"
        );
        result
    }

    /// The source calls a classification calls for, in topic order.
    ///
    /// Location-bound topics are dropped when no location was detected.
    pub fn plan(&self, classification: &Classification) -> Vec<SourceCall> {
        let at = classification.location.as_ref().map(|l| l.coordinates);

        classification
            .topics
            .iter()
            .filter_map(|topic| match (topic, at) {
                (TopicFlag::Argo, Some(c)) => Some(SourceCall::Argo(c)),
                (TopicFlag::Chlorophyll, Some(c)) => Some(SourceCall::Chlorophyll(c)),
                (TopicFlag::Currents, Some(c)) => Some(SourceCall::Currents(c)),
                (TopicFlag::Tides, _) => Some(SourceCall::Tides),
                (topic, None) => {
                    debug!(topic = %topic, "skipping topic without a location");
                    None
                }
            })
            .collect()
    }

    fn date_range(&self) -> Option<DateRange> {
        self.lookback_days.map(|days| lookback_range(today(), days))
    }

    async fn run(&self, call: &SourceCall) -> Result<Value, SourceError> {
        let fetch = async {
            match call {
                SourceCall::Argo(at) => self.client.argo_profiles(*at, self.radius_km).await,
                SourceCall::Chlorophyll(at) => {
                    self.client.chlorophyll(*at, self.date_range()).await
                }
                SourceCall::Currents(at) => self.client.currents(*at, self.date_range()).await,
                SourceCall::Tides => {
                    self.client
                        .tide_predictions(&self.tide_station, today())
                        .await
                }
            }
        };

        match tokio::time::timeout(self.call_timeout, fetch).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SourceError::Timeout {
                source_name: call.source_name(),
                secs: self.call_timeout.as_secs(),
            }),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
