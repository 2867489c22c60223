use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::connection::ConnectionOptions;
use crate::http::parser::{DEFAULT_BUFFER_SIZE, DEFAULT_MAX_BUFFER_SIZE, ParseOptions};

/// Env var naming an optional YAML config file.
pub const CONFIG_ENV: &str = "RAWHTTP_CONFIG";

/// Env var overriding `listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// `null` disables the deadline
    pub read_timeout_ms: Option<u64>,
    pub write_timeout_ms: Option<u64>,
    pub initial_buffer_size: usize,
    pub max_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            read_timeout_ms: Some(10_000),
            write_timeout_ms: Some(30_000),
            initial_buffer_size: DEFAULT_BUFFER_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Defaults, overlaid with the file named by `RAWHTTP_CONFIG`, then `LISTEN`.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {path}"))?;
                Self::from_yaml(&raw).with_context(|| format!("parsing config file {path}"))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var(LISTEN_ENV) {
            cfg.listen_addr = addr;
        }
        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        if cfg.initial_buffer_size == 0 {
            anyhow::bail!("initial_buffer_size must be positive");
        }
        if cfg.max_buffer_size < cfg.initial_buffer_size {
            anyhow::bail!("max_buffer_size must be at least initial_buffer_size");
        }
        Ok(cfg)
    }

    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            read_timeout: self.read_timeout_ms.map(Duration::from_millis),
            write_timeout: self.write_timeout_ms.map(Duration::from_millis),
            parse: ParseOptions {
                initial_buffer_size: self.initial_buffer_size,
                max_buffer_size: self.max_buffer_size,
            },
        }
    }
}
