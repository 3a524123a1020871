//! Configuration schema.
//!
//! Hierarchy: `Config` → `AiConfig`, `SourcesConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::CandidateModel;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.seachat/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub ai: AiConfig,
    pub sources: SourcesConfig,
}

impl Config {
    /// Check the settings the resolver cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ai.validate()
    }
}

// ─────────────────────────────────────────────
// AI provider
// ─────────────────────────────────────────────

/// Generative-AI backend settings and the ranked candidate list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiConfig {
    /// API key for Bearer authentication.
    pub api_key: String,
    /// OpenAI-compatible API base URL.
    pub api_base: String,
    /// Extra HTTP headers sent with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
    /// Candidates in descending preference order.
    pub candidates: Vec<CandidateModel>,
    /// Last-resort candidate used when every probe fails. Must be in `candidates`.
    pub fallback_model: String,
    /// How long a status snapshot stays fresh.
    pub cache_ttl_secs: u64,
    /// Upper bound for a single availability probe.
    pub probe_timeout_secs: u64,
    /// Upper bound for a generation request.
    pub request_timeout_secs: u64,
    /// Maximum tokens to generate per answer.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            extra_headers: None,
            candidates: default_candidates(),
            fallback_model: "gemini-2.0-flash-lite".to_string(),
            cache_ttl_secs: 300,
            probe_timeout_secs: 15,
            request_timeout_secs: 120,
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

/// Built-in candidate ranking, most capable first, cheapest last.
pub fn default_candidates() -> Vec<CandidateModel> {
    vec![
        CandidateModel::new(
            "gemini-2.5-pro",
            "Gemini 2.5 Pro",
            &["reasoning", "long-context", "analysis"],
        ),
        CandidateModel::new(
            "gemini-2.5-flash",
            "Gemini 2.5 Flash",
            &["reasoning", "fast"],
        ),
        CandidateModel::new("gemini-2.0-flash", "Gemini 2.0 Flash", &["fast"]),
        CandidateModel::new(
            "gemini-2.0-flash-lite",
            "Gemini 2.0 Flash-Lite",
            &["fast", "low-cost"],
        ),
    ]
}

impl AiConfig {
    /// Whether an API key is set.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Look up a configured candidate by model name.
    pub fn candidate(&self, name: &str) -> Option<&CandidateModel> {
        self.candidates.iter().find(|c| c.name == name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidates.is_empty() {
            return Err(ConfigError::NoCandidates);
        }

        let mut seen = HashSet::new();
        for c in &self.candidates {
            if !seen.insert(c.name.as_str()) {
                return Err(ConfigError::DuplicateCandidate(c.name.clone()));
            }
        }

        if self.candidate(&self.fallback_model).is_none() {
            return Err(ConfigError::UnknownFallback(self.fallback_model.clone()));
        }

        if !self.is_configured() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────
// Data sources
// ─────────────────────────────────────────────

/// Base URL and optional key for one upstream data source.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointConfig {
    pub api_base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl EndpointConfig {
    fn with_base(base: &str) -> Self {
        Self {
            api_base: base.to_string(),
            api_key: None,
        }
    }
}

/// Tide prediction source and the station used when no station is inferred.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TidesConfig {
    pub api_base: String,
    pub station_id: String,
}

impl Default for TidesConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.tidesandcurrents.noaa.gov/api/prod".to_string(),
            station_id: "9414290".to_string(),
        }
    }
}

/// All ocean data source settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourcesConfig {
    pub argo: EndpointConfig,
    pub nasa: EndpointConfig,
    pub copernicus: EndpointConfig,
    pub tides: TidesConfig,
    /// Search radius around the detected location, for Argo profiles.
    pub radius_km: f64,
    /// Upper bound for each individual source call.
    pub timeout_secs: u64,
    /// When set, chlorophyll and currents queries cover the last N days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookback_days: Option<u32>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            argo: EndpointConfig::with_base("https://argovis-api.colorado.edu"),
            nasa: EndpointConfig::with_base("https://oceandata.sci.gsfc.nasa.gov/api"),
            copernicus: EndpointConfig::with_base("https://nrt.cmems-du.eu/api"),
            tides: TidesConfig::default(),
            radius_km: 500.0,
            timeout_secs: 20,
            lookback_days: None,
        }
    }
}

impl SourcesConfig {
    /// Per-call time limit. Never shorter than one second.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.ai.api_key = "key-123".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ai.cache_ttl_secs, 300);
        assert_eq!(config.ai.candidates.len(), 4);
        assert_eq!(config.ai.fallback_model, "gemini-2.0-flash-lite");
        assert_eq!(config.sources.tides.station_id, "9414290");
        assert_eq!(config.sources.timeout_secs, 20);
        assert!(config.sources.lookback_days.is_none());
    }

    #[test]
    fn test_default_fallback_is_last_candidate() {
        let ai = AiConfig::default();
        assert_eq!(ai.candidates.last().unwrap().name, ai.fallback_model);
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(configured().validate(), Ok(()));
    }

    #[test]
    fn test_validate_missing_key() {
        assert_eq!(
            Config::default().validate(),
            Err(ConfigError::MissingApiKey)
        );
    }

    #[test]
    fn test_validate_no_candidates() {
        let mut config = configured();
        config.ai.candidates.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoCandidates));
    }

    #[test]
    fn test_validate_unknown_fallback() {
        let mut config = configured();
        config.ai.fallback_model = "gpt-4o".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownFallback("gpt-4o".to_string()))
        );
    }

    #[test]
    fn test_validate_duplicate_candidate() {
        let mut config = configured();
        let first = config.ai.candidates[0].clone();
        config.ai.candidates.push(first);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateCandidate("gemini-2.5-pro".to_string()))
        );
    }

    #[test]
    fn test_config_from_json_camel_case() {
        let json = serde_json::json!({
            "ai": {
                "apiKey": "k",
                "candidates": [
                    { "name": "m1", "displayName": "Model One" },
                    { "name": "m2", "displayName": "Model Two", "capabilities": ["fast"] }
                ],
                "fallbackModel": "m2",
                "cacheTtlSecs": 60
            },
            "sources": {
                "radiusKm": 250.0,
                "tides": { "stationId": "8518750" },
                "lookbackDays": 7
            }
        });

        let config: Config = serde_json::from_value(json).unwrap();
        assert_eq!(config.ai.candidates.len(), 2);
        assert!(config.ai.candidates[0].capabilities.is_empty());
        assert_eq!(config.ai.cache_ttl_secs, 60);
        assert_eq!(config.sources.radius_km, 250.0);
        assert_eq!(config.sources.tides.station_id, "8518750");
        assert_eq!(config.sources.lookback_days, Some(7));
        // Defaults preserved for missing fields
        assert_eq!(config.ai.probe_timeout_secs, 15);
        assert!(config.sources.tides.api_base.contains("tidesandcurrents"));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_config_json_uses_camel_case() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert!(json["ai"].get("fallbackModel").is_some());
        assert!(json["ai"].get("cacheTtlSecs").is_some());
        assert!(json["sources"].get("radiusKm").is_some());
        assert!(json["ai"].get("fallback_model").is_none());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.ai.candidates[0].name, "gemini-2.5-pro");
        assert_eq!(config.sources.radius_km, 500.0);
    }

    #[test]
    fn test_call_timeout_never_zero() {
        let mut sources = SourcesConfig::default();
        assert_eq!(sources.call_timeout(), Duration::from_secs(20));

        sources.timeout_secs = 0;
        assert_eq!(sources.call_timeout(), Duration::from_secs(1));
    }
}
