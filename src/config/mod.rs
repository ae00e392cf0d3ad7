//! Environment-backed configuration.
//!
//! Everything except the routing threshold has a default. Override with
//! `DOCENT_*` environment variables; `DOCENT_CONFIDENCE_THRESHOLD` must be set.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
    DEFAULT_LLM_MAX_TOKENS, DEFAULT_LLM_MODEL, DEFAULT_LLM_TEMPERATURE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RERANK_TOP_K, DEFAULT_SEARCH_K, DEFAULT_WEB_MAX_RESULTS,
};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory of `.txt`/`.md` documents indexed at startup. Default: `./data`.
    pub data_dir: PathBuf,

    /// Directory evaluation records are written to. Default: `./evaluations`.
    pub evaluation_dir: PathBuf,

    /// Document confidence at or above which the web is not consulted. Required.
    pub confidence_threshold: f32,

    /// Response cache time-to-live in seconds. Default: `3600`.
    pub cache_ttl_secs: u64,

    /// Max entries in the response cache. Default: `10_000`.
    pub cache_capacity: u64,

    /// Passages kept after reranking. Default: `3`.
    pub rerank_top_k: usize,

    /// Candidates pulled before reranking. Default: `5`.
    pub search_k: usize,

    /// Web results requested per search. Default: `5`.
    pub web_max_results: usize,

    pub chunk_size: usize,

    pub chunk_overlap: usize,

    /// Model name passed to `genai`.
    pub llm_model: String,

    pub llm_temperature: f64,

    pub llm_max_tokens: u32,

    /// Upper bound on one query run in seconds. Default: `120`.
    pub request_timeout_secs: u64,

    /// Tavily API key; web search degrades to a placeholder without it.
    pub tavily_api_key: Option<String>,

    /// Use deterministic local collaborators instead of real providers.
    pub mock_provider: bool,
}

impl Config {
    const ENV_PORT: &'static str = "DOCENT_PORT";
    const ENV_BIND_ADDR: &'static str = "DOCENT_BIND_ADDR";
    const ENV_DATA_DIR: &'static str = "DOCENT_DATA_DIR";
    const ENV_EVALUATION_DIR: &'static str = "DOCENT_EVALUATION_DIR";
    const ENV_CONFIDENCE_THRESHOLD: &'static str = "DOCENT_CONFIDENCE_THRESHOLD";
    const ENV_CACHE_TTL_SECS: &'static str = "DOCENT_CACHE_TTL_SECS";
    const ENV_CACHE_CAPACITY: &'static str = "DOCENT_CACHE_CAPACITY";
    const ENV_RERANK_TOP_K: &'static str = "DOCENT_RERANK_TOP_K";
    const ENV_SEARCH_K: &'static str = "DOCENT_SEARCH_K";
    const ENV_WEB_MAX_RESULTS: &'static str = "DOCENT_WEB_MAX_RESULTS";
    const ENV_CHUNK_SIZE: &'static str = "DOCENT_CHUNK_SIZE";
    const ENV_CHUNK_OVERLAP: &'static str = "DOCENT_CHUNK_OVERLAP";
    const ENV_LLM_MODEL: &'static str = "DOCENT_LLM_MODEL";
    const ENV_LLM_TEMPERATURE: &'static str = "DOCENT_LLM_TEMPERATURE";
    const ENV_LLM_MAX_TOKENS: &'static str = "DOCENT_LLM_MAX_TOKENS";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "DOCENT_REQUEST_TIMEOUT_SECS";
    const ENV_TAVILY_API_KEY: &'static str = "DOCENT_TAVILY_API_KEY";
    const ENV_TAVILY_API_KEY_FALLBACK: &'static str = "TAVILY_API_KEY";
    const ENV_MOCK_PROVIDER: &'static str = "DOCENT_MOCK_PROVIDER";

    /// Defaults for everything, with the given routing threshold.
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            data_dir: PathBuf::from("./data"),
            evaluation_dir: PathBuf::from("./evaluations"),
            confidence_threshold,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            rerank_top_k: DEFAULT_RERANK_TOP_K,
            search_k: DEFAULT_SEARCH_K,
            web_max_results: DEFAULT_WEB_MAX_RESULTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_temperature: DEFAULT_LLM_TEMPERATURE,
            llm_max_tokens: DEFAULT_LLM_MAX_TOKENS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            tavily_api_key: None,
            mock_provider: false,
        }
    }

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::new(Self::parse_threshold_from_env()?);

        Ok(Self {
            port: Self::parse_port_from_env(defaults.port)?,
            bind_addr: Self::parse_bind_addr_from_env(defaults.bind_addr)?,
            data_dir: Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir),
            evaluation_dir: Self::parse_path_from_env(
                Self::ENV_EVALUATION_DIR,
                defaults.evaluation_dir,
            ),
            confidence_threshold: defaults.confidence_threshold,
            cache_ttl_secs: Self::parse_from_env(Self::ENV_CACHE_TTL_SECS, defaults.cache_ttl_secs)?,
            cache_capacity: Self::parse_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?,
            rerank_top_k: Self::parse_from_env(Self::ENV_RERANK_TOP_K, defaults.rerank_top_k)?,
            search_k: Self::parse_from_env(Self::ENV_SEARCH_K, defaults.search_k)?,
            web_max_results: Self::parse_from_env(
                Self::ENV_WEB_MAX_RESULTS,
                defaults.web_max_results,
            )?,
            chunk_size: Self::parse_from_env(Self::ENV_CHUNK_SIZE, defaults.chunk_size)?,
            chunk_overlap: Self::parse_from_env(Self::ENV_CHUNK_OVERLAP, defaults.chunk_overlap)?,
            llm_model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model),
            llm_temperature: Self::parse_from_env(
                Self::ENV_LLM_TEMPERATURE,
                defaults.llm_temperature,
            )?,
            llm_max_tokens: Self::parse_from_env(Self::ENV_LLM_MAX_TOKENS, defaults.llm_max_tokens)?,
            request_timeout_secs: Self::parse_from_env(
                Self::ENV_REQUEST_TIMEOUT_SECS,
                defaults.request_timeout_secs,
            )?,
            tavily_api_key: Self::parse_optional_string_from_env(Self::ENV_TAVILY_API_KEY)
                .or_else(|| {
                    Self::parse_optional_string_from_env(Self::ENV_TAVILY_API_KEY_FALLBACK)
                }),
            mock_provider: Self::parse_flag_from_env(Self::ENV_MOCK_PROVIDER),
        })
    }

    /// Checks invariants that parsing alone does not (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.confidence_threshold.to_string(),
            });
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::InvalidChunking {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }

        if self.rerank_top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_RERANK_TOP_K,
                value: "0".to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_REQUEST_TIMEOUT_SECS,
                value: "0".to_string(),
            });
        }

        for dir in [&self.data_dir, &self.evaluation_dir] {
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::NotADirectory { path: dir.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn parse_threshold_from_env() -> Result<f32, ConfigError> {
        let value = env::var(Self::ENV_CONFIDENCE_THRESHOLD).map_err(|_| {
            ConfigError::MissingEnvVar {
                name: Self::ENV_CONFIDENCE_THRESHOLD,
            }
        })?;

        match value.trim().parse::<f32>() {
            Ok(threshold) if (0.0..=1.0).contains(&threshold) => Ok(threshold),
            _ => Err(ConfigError::InvalidThreshold { value }),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_from_env<T: FromStr>(var_name: &'static str, default: T) -> Result<T, ConfigError> {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: var_name,
                value,
            }),
            None => Ok(default),
        }
    }

    fn parse_flag_from_env(var_name: &str) -> bool {
        env::var_os(var_name).is_some_and(|v| !v.is_empty() && v != "0" && v != "false")
    }
}
