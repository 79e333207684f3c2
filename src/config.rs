//! Configuration for the PDP API.
//!
//! Loaded from environment variables with the `HODEI_PDP_` prefix for the
//! domain options spec §6 lists, plus the teacher's ambient server/logging
//! sections.

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub policy: PolicyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

/// spec §6's recognised startup options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// `"file"` (default) or `"db"`; selects the reload coordinator's mode.
    pub policy_backend: String,
    /// Source path for the default tenant in file mode.
    pub default_policy_file: String,
    /// `"memory"` (default) or `"db"`; selects the persistence adapter.
    pub store_backend: String,
    /// DSN for the `db` store backend; empty selects the embedded engine.
    pub store_dsn: String,
    /// Ordered list of context providers to wire into the chain, e.g.
    /// `"time,geoip,risk"`.
    pub context_providers: Vec<String>,
    /// Background reload period in seconds for store-backend mode.
    pub reload_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            policy: PolicyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            policy_backend: "file".to_string(),
            default_policy_file: "configs/policies.yaml".to_string(),
            store_backend: "memory".to_string(),
            store_dsn: String::new(),
            context_providers: vec!["time".to_string(), "geoip".to_string(), "risk".to_string()],
            reload_interval_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset. Variables follow
    /// `HODEI_PDP_<SECTION>_<KEY>`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("HODEI_PDP_SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("HODEI_PDP_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(timeout) = env::var("HODEI_PDP_SERVER_REQUEST_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                config.server.request_timeout_secs = timeout;
            }
        }

        if let Ok(backend) = env::var("HODEI_PDP_POLICY_BACKEND") {
            config.policy.policy_backend = backend;
        }
        if let Ok(path) = env::var("HODEI_PDP_DEFAULT_POLICY_FILE") {
            config.policy.default_policy_file = path;
        }
        if let Ok(backend) = env::var("HODEI_PDP_STORE_BACKEND") {
            config.policy.store_backend = backend;
        }
        if let Ok(dsn) = env::var("HODEI_PDP_STORE_DSN") {
            config.policy.store_dsn = dsn;
        }
        if let Ok(providers) = env::var("HODEI_PDP_CONTEXT_PROVIDERS") {
            config.policy.context_providers =
                providers.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
        if let Ok(interval) = env::var("HODEI_PDP_RELOAD_INTERVAL_SECS") {
            if let Ok(interval) = interval.parse() {
                config.policy.reload_interval_secs = interval;
            }
        }

        if let Ok(level) = env::var("HODEI_PDP_LOGGING_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = env::var("HODEI_PDP_LOGGING_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server port cannot be 0".to_string());
        }
        if self.server.request_timeout_secs == 0 {
            return Err("request timeout cannot be 0".to_string());
        }

        let valid_policy_backends = ["file", "db"];
        if !valid_policy_backends.contains(&self.policy.policy_backend.as_str()) {
            return Err(format!(
                "invalid policyBackend '{}'. Valid values: {}",
                self.policy.policy_backend,
                valid_policy_backends.join(", ")
            ));
        }
        if self.policy.policy_backend == "file" && self.policy.default_policy_file.is_empty() {
            return Err("defaultPolicyFile is required when policyBackend is 'file'".to_string());
        }

        let valid_store_backends = ["memory", "db"];
        if !valid_store_backends.contains(&self.policy.store_backend.as_str()) {
            return Err(format!(
                "invalid storeBackend '{}'. Valid values: {}",
                self.policy.store_backend,
                valid_store_backends.join(", ")
            ));
        }
        if self.policy.reload_interval_secs == 0 {
            return Err("reloadIntervalSecs cannot be 0".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "invalid log level '{}'. Valid values: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(format!(
                "invalid log format '{}'. Valid values: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
