use std::net::SocketAddr;

use dotenvy::dotenv;
use thiserror::Error;

use crate::models::image::MAX_IMAGE_SIZE_BYTES;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PLANTCARE_BIND_ADDR is not a valid socket address: {0}")]
    InvalidBindAddr(String),
    #[error("PLANTCARE_MAX_UPLOAD_BYTES is not a valid byte count: {0}")]
    InvalidUploadLimit(String),
    #[error("PLANTCARE_MAX_UPLOAD_BYTES must exceed the 5 MiB image limit, got {0}")]
    UploadLimitTooSmall(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Loads `.env` if present, then reads the process environment.
    #[tracing::instrument(name = "server_config_load")]
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!(
            bind_addr = %config.bind_addr,
            max_upload_bytes = config.max_upload_bytes,
            "Server configuration loaded"
        );

        Ok(config)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("PLANTCARE_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr.clone()))?;

        let max_upload_bytes = match lookup("PLANTCARE_MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidUploadLimit(raw.clone()))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        // Oversized images must reach the validator instead of the body limit.
        if (max_upload_bytes as u64) <= MAX_IMAGE_SIZE_BYTES {
            return Err(ConfigError::UploadLimitTooSmall(max_upload_bytes));
        }

        Ok(Self {
            bind_addr,
            max_upload_bytes,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
