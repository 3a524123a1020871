//! Ranked model resolution with a time-bounded availability cache.
//!
//! Candidates are ordered by preference. [`ProviderResolver::best_candidate`]
//! walks them in order and stops at the first one whose probe succeeds; when
//! none does, it hands back the designated fallback instead of failing.
//! [`ProviderResolver::status`] probes every candidate and caches the full
//! snapshot for the TTL.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use seachat_core::config::AiConfig;
use seachat_core::types::{CandidateModel, Message, ModelAvailability, StatusSnapshot};
use seachat_core::{ConfigError, ProviderError};

use crate::clock::{Clock, SystemClock};
use crate::health::ProbeHealthCheck;
use crate::traits::{HealthCheck, LlmProvider, LlmRequestConfig};

/// Default freshness window for cached results.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;

/// The candidate chosen for a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub candidate: CandidateModel,
    /// `true` when every probe failed and this is the last-resort candidate.
    pub used_fallback: bool,
}

/// Text produced by the resolved candidate.
#[derive(Clone, Debug)]
pub struct Generation {
    pub text: String,
    pub candidate: CandidateModel,
    pub used_fallback: bool,
}

/// Picks a working model out of a ranked candidate list.
pub struct ProviderResolver {
    /// Candidates in descending preference order. Never empty.
    candidates: Vec<CandidateModel>,
    /// Index into `candidates` of the last-resort model.
    fallback: usize,
    health: Arc<dyn HealthCheck>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    /// Last full probe. Replaced whole, never edited in place.
    status_cache: RwLock<Option<Arc<StatusSnapshot>>>,
    /// Serialises status refreshes so concurrent stale readers probe once.
    refresh_lock: Mutex<()>,
    /// Last successful `best_candidate` result and when it was found.
    best_cache: RwLock<Option<(Resolution, DateTime<Utc>)>>,
}

impl std::fmt::Debug for ProviderResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderResolver")
            .field("candidates", &self.candidates.len())
            .field("fallback", &self.candidates[self.fallback].name)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

impl ProviderResolver {
    /// Create a resolver over `candidates` with `fallback_model` as last resort.
    ///
    /// Fails when the list is empty or the fallback is not one of the candidates.
    pub fn new(
        candidates: Vec<CandidateModel>,
        fallback_model: &str,
        health: Arc<dyn HealthCheck>,
    ) -> Result<Self, ConfigError> {
        if candidates.is_empty() {
            return Err(ConfigError::NoCandidates);
        }
        let fallback = candidates
            .iter()
            .position(|c| c.name == fallback_model)
            .ok_or_else(|| ConfigError::UnknownFallback(fallback_model.to_string()))?;

        Ok(Self {
            candidates,
            fallback,
            health,
            clock: Arc::new(SystemClock),
            ttl: ttl_from_secs(DEFAULT_CACHE_TTL_SECS),
            status_cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            best_cache: RwLock::new(None),
        })
    }

    /// Build a resolver that probes through `provider`, using the AI config's
    /// candidates, fallback, TTL and probe timeout.
    pub fn from_config(
        config: &AiConfig,
        provider: Arc<dyn LlmProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let health = ProbeHealthCheck::new(
            provider,
            std::time::Duration::from_secs(config.probe_timeout_secs),
        );
        let resolver = Self::new(
            config.candidates.clone(),
            &config.fallback_model,
            Arc::new(health),
        )?;
        Ok(resolver.with_ttl_secs(config.cache_ttl_secs))
    }

    /// Replace the time source (builder pattern).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the cache freshness window (builder pattern).
    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.ttl = ttl_from_secs(secs);
        self
    }

    /// Configured candidates in preference order.
    pub fn candidates(&self) -> &[CandidateModel] {
        &self.candidates
    }

    /// The last-resort candidate.
    pub fn fallback(&self) -> &CandidateModel {
        &self.candidates[self.fallback]
    }

    fn is_fresh(&self, checked_at: DateTime<Utc>) -> bool {
        self.clock.now() - checked_at < self.ttl
    }

    // ────────────── Best candidate ──────────────

    /// The most preferred candidate that currently answers.
    ///
    /// Probes in order and stops at the first success. A success is reused for
    /// the TTL. When every probe fails the fallback is returned with
    /// `used_fallback = true`; that outcome is not cached, so the next call
    /// probes again.
    pub async fn best_candidate(&self) -> Resolution {
        if let Some((resolution, found_at)) = self.best_cache.read().await.as_ref() {
            if self.is_fresh(*found_at) {
                debug!(model = %resolution.candidate.name, "reusing resolved model");
                return resolution.clone();
            }
        }

        for candidate in &self.candidates {
            if self.health.check(candidate).await {
                info!(model = %candidate.name, "resolved model");
                let resolution = Resolution {
                    candidate: candidate.clone(),
                    used_fallback: false,
                };
                *self.best_cache.write().await = Some((resolution.clone(), self.clock.now()));
                return resolution;
            }
        }

        let fallback = self.fallback().clone();
        warn!(
            model = %fallback.name,
            candidates = self.candidates.len(),
            "every candidate failed its probe, using fallback"
        );
        Resolution {
            candidate: fallback,
            used_fallback: true,
        }
    }

    /// Display name of the model `best_candidate` resolves to.
    pub async fn current_display_name(&self) -> String {
        self.best_candidate().await.candidate.display_name
    }

    async fn forget_best(&self) {
        *self.best_cache.write().await = None;
    }

    // ────────────── Status ──────────────

    /// Availability of every candidate, in candidate order.
    ///
    /// Within the TTL the previous snapshot is returned untouched. Once stale,
    /// all candidates are re-probed concurrently and the snapshot is swapped in
    /// whole. Concurrent stale callers share a single refresh.
    pub async fn status(&self) -> Arc<StatusSnapshot> {
        if let Some(snapshot) = self.fresh_status().await {
            return snapshot;
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited.
        if let Some(snapshot) = self.fresh_status().await {
            return snapshot;
        }

        let snapshot = Arc::new(self.probe_all().await);
        info!(
            available = snapshot.available_count(),
            total = snapshot.entries.len(),
            "model status refreshed"
        );
        *self.status_cache.write().await = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// The cached snapshot regardless of age, without probing.
    pub async fn cached_status(&self) -> Option<Arc<StatusSnapshot>> {
        self.status_cache.read().await.clone()
    }

    async fn fresh_status(&self) -> Option<Arc<StatusSnapshot>> {
        self.status_cache
            .read()
            .await
            .as_ref()
            .filter(|s| self.is_fresh(s.checked_at))
            .cloned()
    }

    async fn probe_all(&self) -> StatusSnapshot {
        let probes = self.candidates.iter().map(|c| self.health.check(c));
        let results = join_all(probes).await;

        let entries = self
            .candidates
            .iter()
            .cloned()
            .zip(results)
            .map(|(candidate, is_available)| ModelAvailability {
                candidate,
                is_available,
            })
            .collect();

        StatusSnapshot {
            entries,
            checked_at: self.clock.now(),
        }
    }

    // ────────────── Generation ──────────────

    /// Resolve the best candidate and run one chat completion with it.
    ///
    /// No retry: a failed or empty completion is returned as an error and the
    /// cached resolution is dropped so the next call probes again.
    pub async fn generate(
        &self,
        provider: &dyn LlmProvider,
        messages: &[Message],
        config: &LlmRequestConfig,
    ) -> Result<Generation, ProviderError> {
        let Resolution {
            candidate,
            used_fallback,
        } = self.best_candidate().await;

        let result = provider.chat(messages, &candidate.name, config).await;
        let text = match result {
            Ok(resp) => resp.text().map(str::to_string),
            Err(e) => {
                self.forget_best().await;
                return Err(e);
            }
        };

        match text {
            Some(text) => Ok(Generation {
                text,
                candidate,
                used_fallback,
            }),
            None => {
                self.forget_best().await;
                Err(ProviderError::EmptyResponse)
            }
        }
    }
}

/// Upper bound on a configured TTL; keeps the conversion to `Duration` in range.
const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

fn ttl_from_secs(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_TTL_SECS) as i64)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
