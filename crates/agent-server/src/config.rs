//! Server Configuration

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Which catalog implementation backs the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogBackend {
    Postgres,
    Memory,
}

impl FromStr for CatalogBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "demo" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub request_timeout: Duration,
    pub static_dir: PathBuf,
    pub catalog_backend: CatalogBackend,
    pub llm_fallback: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            request_timeout: Duration::from_secs(30),
            static_dir: PathBuf::from("static"),
            catalog_backend: CatalogBackend::Postgres,
            llm_fallback: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid { key: "REQUEST_TIMEOUT_SECS", value: raw })?,
            None => defaults.request_timeout,
        };

        let catalog_backend = match get("CATALOG_BACKEND") {
            Some(raw) => raw
                .parse()
                .map_err(|()| ConfigError::Invalid { key: "CATALOG_BACKEND", value: raw })?,
            None => defaults.catalog_backend,
        };

        let llm_fallback = match get("ADVISOR_LLM_FALLBACK") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid { key: "ADVISOR_LLM_FALLBACK", value: raw })?,
            None => defaults.llm_fallback,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            request_timeout,
            static_dir: get("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            catalog_backend,
            llm_fallback,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
