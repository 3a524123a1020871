//! Error taxonomy.
//!
//! - [`ConfigError`] is fatal and surfaces once, when a component is built.
//! - [`ProviderError`] and [`SourceError`] describe a single failed upstream
//!   call; callers of the resolver and aggregator never see them.

use thiserror::Error;

/// Invalid or incomplete configuration. Components refuse to construct.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no candidate models configured")]
    NoCandidates,

    #[error("no AI API key configured (set ai.apiKey, SEACHAT_AI__API_KEY or GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("fallback model '{0}' is not among the configured candidates")]
    UnknownFallback(String),

    #[error("candidate model '{0}' is configured more than once")]
    DuplicateCandidate(String),
}

/// A failed call to the AI provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

/// A failed call to an ocean data source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_name}: HTTP request failed: {message}")]
    Http {
        source_name: &'static str,
        message: String,
    },

    #[error("{source_name}: upstream returned {status}: {body}")]
    Status {
        source_name: &'static str,
        status: u16,
        body: String,
    },

    #[error("{source_name}: failed to parse response: {message}")]
    Parse {
        source_name: &'static str,
        message: String,
    },

    #[error("{source_name}: timed out after {secs}s")]
    Timeout {
        source_name: &'static str,
        secs: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::UnknownFallback("x".into()).to_string(),
            "fallback model 'x' is not among the configured candidates"
        );
        let missing = ConfigError::MissingApiKey.to_string();
        assert!(missing.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_source_error_names_the_source() {
        let err = SourceError::Status {
            source_name: "argo",
            status: 503,
            body: "down".into(),
        };
        assert_eq!(err.to_string(), "argo: upstream returned 503: down");
    }
}
