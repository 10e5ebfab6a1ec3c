use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::ledger::ThrottleSettings;

pub const CONFIG_FILE: &str = "focus-recover.toml";
const RC_FILE: &str = ".focus-recover-rc";
const ENV_PREFIX: &str = "FOCUS_RECOVER";

/// Main configuration structure for focus-recover.
///
/// Network constants (contract addresses, gas reserve, chain) are compiled in
/// and intentionally absent here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FocusRecoverConfig {
    /// Ledger connection settings
    pub ledger: LedgerConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint of a mainnet node
    pub rpc_url: String,
    /// Per-request timeout
    pub request_timeout_seconds: u64,
    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level filter, overridden by RUST_LOG
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for FocusRecoverConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig {
                rpc_url: "https://starknet-mainnet.public.blastapi.io/rpc/v0_7".to_string(),
                request_timeout_seconds: 30,
                rate_limit: RateLimitConfig {
                    requests_per_second: 5,
                    burst_capacity: 10,
                },
            },
            observability: ObservabilityConfig {
                log_level: "warn".to_string(),
                json_logs: false,
            },
        }
    }
}

impl LedgerConfig {
    pub fn throttle_settings(&self) -> ThrottleSettings {
        ThrottleSettings {
            requests_per_second: self.rate_limit.requests_per_second,
            burst_capacity: self.rate_limit.burst_capacity,
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
        }
    }
}

impl FocusRecoverConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (focus-recover.toml, .focus-recover-rc)
    /// 3. Environment variables (FOCUS_RECOVER_LEDGER__RPC_URL, ...)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`load`](Self::load), looking for files in `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Self::defaults_builder()?;

        for name in [CONFIG_FILE, RC_FILE] {
            let path = dir.join(name);
            if path.exists() {
                builder = builder.add_source(File::from(path).format(config::FileFormat::Toml));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to read configuration sources")?;
        config
            .try_deserialize()
            .context("Configuration has invalid or missing values")
    }

    fn defaults_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = Self::default();
        let builder = Config::builder()
            .set_default("ledger.rpc_url", defaults.ledger.rpc_url)?
            .set_default(
                "ledger.request_timeout_seconds",
                defaults.ledger.request_timeout_seconds as i64,
            )?
            .set_default(
                "ledger.rate_limit.requests_per_second",
                defaults.ledger.rate_limit.requests_per_second as i64,
            )?
            .set_default(
                "ledger.rate_limit.burst_capacity",
                defaults.ledger.rate_limit.burst_capacity as i64,
            )?
            .set_default("observability.log_level", defaults.observability.log_level)?
            .set_default("observability.json_logs", defaults.observability.json_logs)?;
        Ok(builder)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::debug!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<FocusRecoverConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = FocusRecoverConfig::load_env_file();
        FocusRecoverConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static FocusRecoverConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {:#}", e))
}
