//! Configuration Module
//!
//! Handles loading and managing application configuration from environment variables.

use std::env;

use crate::error::{Result, TypifyError};

/// Application configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of results the cache can hold
    pub cache_size: usize,
    /// HTTP control surface port
    pub server_port: u16,
    /// Base URL of the llama.cpp inference server
    pub backend_url: String,
    /// Backend request timeout in seconds
    pub backend_timeout: u64,
    /// Stats reporter interval in seconds, 0 disables it
    pub stats_interval: u64,
    /// Per-operation generation parameters
    pub generation: GenerationConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SIZE` - Cache capacity (default: 100, must not be negative)
    /// - `SERVER_PORT` - HTTP port (default: 3000)
    /// - `BACKEND_URL` - Inference server URL (default: http://127.0.0.1:8080)
    /// - `BACKEND_TIMEOUT` - Backend timeout in seconds (default: 120)
    /// - `STATS_INTERVAL` - Stats log frequency in seconds (default: 60)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_size = match lookup("CACHE_SIZE") {
            Some(raw) => parse_cache_size(&raw)?,
            None => defaults.cache_size,
        };

        Ok(Self {
            cache_size,
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            backend_url: lookup("BACKEND_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.backend_url),
            backend_timeout: lookup("BACKEND_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backend_timeout),
            stats_interval: lookup("STATS_INTERVAL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.stats_interval),
            generation: defaults.generation,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size: 100,
            server_port: 3000,
            backend_url: "http://127.0.0.1:8080".to_string(),
            backend_timeout: 120,
            stats_interval: 60,
            generation: GenerationConfig::default(),
        }
    }
}

// == Cache Size Parsing ==
/// Parses a cache capacity, rejecting negative and non-numeric values.
///
/// Zero is accepted and yields a cache that never retains anything.
pub fn parse_cache_size(raw: &str) -> Result<usize> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        TypifyError::Config(format!("CACHE_SIZE must be an integer, got '{}'", raw))
    })?;

    usize::try_from(value).map_err(|_| {
        TypifyError::Config(format!("CACHE_SIZE must not be negative, got {}", value))
    })
}

// == Generation Config ==
/// Sampling parameters passed to the model for one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repeat_penalty: f32,
}

/// Token budgets and sampling for each text operation.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub grammar_min_tokens: usize,
    pub grammar_tokens_per_char: usize,
    pub grammar: Sampling,

    pub summary_min_tokens: usize,
    pub summary_max_tokens: usize,
    pub summary: Sampling,

    pub tone_min_tokens: usize,
    pub tone_tokens_per_char: usize,
    pub tone: Sampling,

    /// Generation halts on any of these
    pub stop_tokens: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grammar_min_tokens: 100,
            grammar_tokens_per_char: 4,
            grammar: Sampling {
                temperature: 0.3,
                top_p: 0.9,
                top_k: 40,
                repeat_penalty: 1.05,
            },
            summary_min_tokens: 100,
            summary_max_tokens: 200,
            summary: Sampling {
                temperature: 0.2,
                top_p: 0.8,
                top_k: 40,
                repeat_penalty: 1.05,
            },
            tone_min_tokens: 150,
            tone_tokens_per_char: 2,
            tone: Sampling {
                temperature: 0.2,
                top_p: 0.9,
                top_k: 40,
                repeat_penalty: 1.05,
            },
            stop_tokens: vec!["[INST]".into(), "</s>".into(), "[/INST]".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_size, 100);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.backend_url, "http://127.0.0.1:8080");
        assert_eq!(config.backend_timeout, 120);
        assert_eq!(config.stats_interval, 60);
    }

    #[test]
    fn test_config_from_empty_lookup_uses_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.cache_size, 100);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_SIZE", "42"),
            ("SERVER_PORT", "4100"),
            ("BACKEND_URL", "http://localhost:9000/"),
            ("STATS_INTERVAL", "0"),
        ]))
        .unwrap();

        assert_eq!(config.cache_size, 42);
        assert_eq!(config.server_port, 4100);
        assert_eq!(config.backend_url, "http://localhost:9000");
        assert_eq!(config.stats_interval, 0);
    }

    #[test]
    fn test_negative_cache_size_rejected() {
        let result = Config::from_lookup(lookup_from(&[("CACHE_SIZE", "-5")]));
        assert!(matches!(result, Err(TypifyError::Config(_))));
    }

    #[test]
    fn test_garbage_cache_size_rejected() {
        assert!(matches!(parse_cache_size("lots"), Err(TypifyError::Config(_))));
    }

    #[test]
    fn test_zero_cache_size_accepted() {
        assert_eq!(parse_cache_size("0").unwrap(), 0);
        assert_eq!(parse_cache_size(" 7 ").unwrap(), 7);
    }

    #[test]
    fn test_generation_defaults() {
        let generation = GenerationConfig::default();
        assert_eq!(generation.grammar_min_tokens, 100);
        assert_eq!(generation.summary_max_tokens, 200);
        assert_eq!(generation.tone.top_p, 0.9);
        assert_eq!(generation.stop_tokens.len(), 3);
    }
}
