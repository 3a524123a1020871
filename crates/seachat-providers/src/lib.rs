//! AI provider layer for SeaChat.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — chat completion seam; [`http_provider::HttpProvider`]
//!   implements it for any OpenAI-compatible API
//! - [`traits::HealthCheck`] — "does this candidate answer?"; [`health::ProbeHealthCheck`]
//!   implements it with a minimal real request
//! - [`resolver::ProviderResolver`] — ranked candidate selection with a TTL cache
//! - [`clock`] — injectable time source for the cache

pub mod clock;
pub mod health;
pub mod http_provider;
pub mod resolver;
pub mod traits;

// Re-export main types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use health::ProbeHealthCheck;
pub use http_provider::HttpProvider;
pub use resolver::{Generation, ProviderResolver, Resolution};
pub use traits::{HealthCheck, LlmProvider, LlmRequestConfig};
