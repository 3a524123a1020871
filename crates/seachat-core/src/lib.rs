//! Core types, errors, configuration and utilities shared by every SeaChat crate.

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::{ConfigError, ProviderError, SourceError};
