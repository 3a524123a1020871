//! Config loader — reads `~/.seachat/config.json`, merges env vars, and
//! applies legacy migrations.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.seachat/config.json`
//! 3. Environment variables `SEACHAT_<SECTION>__<FIELD>` (override JSON)
//! 4. `GEMINI_API_KEY`, only when no AI key was set by the steps above

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, EndpointConfig};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path, then apply env overrides.
fn load_config_from_path(path: &Path) -> Config {
    apply_env_overrides(read_config_file(path))
}

/// Parse and migrate the config file at `path`, without env overrides.
///
/// Returns `Config::default()` when the file is missing or unusable.
fn read_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    let mut raw: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return Config::default();
        }
    };

    migrate_config(&mut raw);

    match serde_json::from_value(raw) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to deserialize config: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply legacy config migrations.
///
/// Moves a top-level `gemini.apiKey` → `ai.apiKey`.
fn migrate_config(raw: &mut serde_json::Value) {
    let legacy_key = raw.get("gemini").and_then(|g| g.get("apiKey")).cloned();

    if let (Some(key), Some(obj)) = (legacy_key, raw.as_object_mut()) {
        let ai = obj.entry("ai").or_insert_with(|| serde_json::json!({}));
        if ai.get("apiKey").is_none() {
            ai["apiKey"] = key;
            debug!("Migrated gemini.apiKey → ai.apiKey");
        }
        obj.remove("gemini");
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `SEACHAT_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `SEACHAT_AI__API_KEY` → `ai.api_key`
/// - `SEACHAT_AI__API_BASE` → `ai.api_base`
/// - `SEACHAT_AI__FALLBACK_MODEL` → `ai.fallback_model`
/// - `SEACHAT_AI__CACHE_TTL_SECS` → `ai.cache_ttl_secs`
/// - `SEACHAT_AI__PROBE_TIMEOUT_SECS` → `ai.probe_timeout_secs`
/// - `SEACHAT_SOURCES__<NAME>__API_KEY` / `__API_BASE` → `sources.<name>`
/// - `SEACHAT_SOURCES__TIDES__STATION_ID` → `sources.tides.station_id`
/// - `SEACHAT_SOURCES__TIMEOUT_SECS` → `sources.timeout_secs`
/// - `SEACHAT_SOURCES__RADIUS_KM` → `sources.radius_km`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("SEACHAT_AI__API_KEY") {
        config.ai.api_key = val;
    }
    if let Ok(val) = std::env::var("SEACHAT_AI__API_BASE") {
        config.ai.api_base = val;
    }
    if let Ok(val) = std::env::var("SEACHAT_AI__FALLBACK_MODEL") {
        config.ai.fallback_model = val;
    }
    if let Ok(val) = std::env::var("SEACHAT_AI__CACHE_TTL_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.ai.cache_ttl_secs = n;
        }
    }
    if let Ok(val) = std::env::var("SEACHAT_AI__PROBE_TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.ai.probe_timeout_secs = n;
        }
    }

    apply_endpoint_env(&mut config.sources.argo, "ARGO");
    apply_endpoint_env(&mut config.sources.nasa, "NASA");
    apply_endpoint_env(&mut config.sources.copernicus, "COPERNICUS");

    if let Ok(val) = std::env::var("SEACHAT_SOURCES__TIDES__API_BASE") {
        config.sources.tides.api_base = val;
    }
    if let Ok(val) = std::env::var("SEACHAT_SOURCES__TIDES__STATION_ID") {
        config.sources.tides.station_id = val;
    }
    if let Ok(val) = std::env::var("SEACHAT_SOURCES__TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.sources.timeout_secs = n;
        }
    }
    if let Ok(val) = std::env::var("SEACHAT_SOURCES__RADIUS_KM") {
        if let Ok(r) = val.parse::<f64>() {
            config.sources.radius_km = r;
        }
    }

    if !config.ai.is_configured() {
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            config.ai.api_key = val;
        }
    }

    config
}

/// Apply env var overrides for a single data source endpoint.
fn apply_endpoint_env(endpoint: &mut EndpointConfig, name: &str) {
    if let Ok(val) = std::env::var(format!("SEACHAT_SOURCES__{name}__API_KEY")) {
        endpoint.api_key = Some(val);
    }
    if let Ok(val) = std::env::var(format!("SEACHAT_SOURCES__{name}__API_BASE")) {
        endpoint.api_base = val;
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = read_config_file(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.ai.cache_ttl_secs, 300);
        assert_eq!(config.sources.timeout_secs, 20);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "ai": {
                "fallbackModel": "gemini-2.0-flash",
                "maxTokens": 512
            }
        }"#,
        );

        let config = read_config_file(file.path());
        assert_eq!(config.ai.fallback_model, "gemini-2.0-flash");
        assert_eq!(config.ai.max_tokens, 512);
        // Default preserved
        assert_eq!(config.ai.temperature, 0.7);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = read_config_file(file.path());
        assert_eq!(config.ai.cache_ttl_secs, 300);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.ai.api_key = "saved-key".to_string();
        config.sources.tides.station_id = "8518750".to_string();

        save_config(&config, Some(&path)).unwrap();

        let reloaded = read_config_file(&path);
        assert_eq!(reloaded.ai.api_key, "saved-key");
        assert_eq!(reloaded.sources.tides.station_id, "8518750");
    }

    #[test]
    fn test_load_applies_env_after_file() {
        let file = write_temp_json(r#"{ "ai": { "maxTokens": 256 } }"#);
        std::env::set_var("SEACHAT_AI__API_BASE", "http://localhost:9999/v1");
        let config = load_config_from_path(file.path());
        std::env::remove_var("SEACHAT_AI__API_BASE");

        assert_eq!(config.ai.api_base, "http://localhost:9999/v1");
        assert_eq!(config.ai.max_tokens, 256);
    }

    #[test]
    fn test_migrate_legacy_gemini_key() {
        let file = write_temp_json(r#"{ "gemini": { "apiKey": "legacy-key" } }"#);
        let config = read_config_file(file.path());
        assert_eq!(config.ai.api_key, "legacy-key");
    }

    #[test]
    fn test_migrate_no_overwrite() {
        let mut raw = serde_json::json!({
            "ai": { "apiKey": "current" },
            "gemini": { "apiKey": "legacy" }
        });
        migrate_config(&mut raw);
        assert_eq!(raw["ai"]["apiKey"], "current");
        assert!(raw.get("gemini").is_none());
    }

    #[test]
    fn test_env_override_fallback_model() {
        std::env::set_var("SEACHAT_AI__FALLBACK_MODEL", "gemini-2.0-flash");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.ai.fallback_model, "gemini-2.0-flash");
        std::env::remove_var("SEACHAT_AI__FALLBACK_MODEL");
    }

    #[test]
    fn test_env_override_argo_key() {
        std::env::set_var("SEACHAT_SOURCES__ARGO__API_KEY", "argo-env-key");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.sources.argo.api_key.as_deref(), Some("argo-env-key"));
        std::env::remove_var("SEACHAT_SOURCES__ARGO__API_KEY");
    }

    #[test]
    fn test_env_override_station() {
        std::env::set_var("SEACHAT_SOURCES__TIDES__STATION_ID", "1612340");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.sources.tides.station_id, "1612340");
        std::env::remove_var("SEACHAT_SOURCES__TIDES__STATION_ID");
    }

    #[test]
    fn test_env_override_invalid_number_ignored() {
        std::env::set_var("SEACHAT_SOURCES__RADIUS_KM", "far");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.sources.radius_km, 500.0);
        std::env::remove_var("SEACHAT_SOURCES__RADIUS_KM");
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["ai"].get("probeTimeoutSecs").is_some());
        assert!(raw["ai"].get("probe_timeout_secs").is_none());
    }
}
