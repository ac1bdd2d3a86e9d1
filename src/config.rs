//! Configuration management for the Unified Intelligence Platform server
//!
//! Separates startup configuration (requires restart) from runtime
//! configuration (shared behind a lock and adjustable while serving).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::hasher::{MAX_COST, MIN_COST};

/// Environment variable prefix, e.g. `UIP__PORT=4000`.
pub const ENV_PREFIX: &str = "UIP";

/// Complete server configuration with startup/runtime separation
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    #[serde(flatten)]
    pub runtime: RuntimeConfig,
}

/// Configuration that requires server restart to take effect
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    /// IP address to bind the control listener
    pub bind_address: String,

    /// Listener port; 0 picks an ephemeral port
    pub port: u16,

    /// Directory holding every data file below
    pub data_dir: String,

    /// Credential store file, relative to `data_dir`
    pub credentials_file: String,

    /// Incident CSV file, relative to `data_dir`
    pub incidents_file: String,

    /// Ticket CSV file, relative to `data_dir`
    pub tickets_file: String,

    /// bcrypt work factor for new registrations
    pub bcrypt_cost: u32,

    /// Input limits
    pub max_command_length: usize,
    pub max_username_length: usize,
    pub max_password_length: usize,
}

/// Configuration that can be updated while the server is running
#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    /// Maximum concurrent sessions
    /// Environment: UIP__MAX_CLIENTS
    pub max_clients: usize,
}

/// Thread-safe runtime configuration wrapper
pub type SharedRuntimeConfig = Arc<RwLock<RuntimeConfig>>;

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 2323,
            data_dir: "data".to_string(),
            credentials_file: "users.txt".to_string(),
            incidents_file: "cyber_incidents.csv".to_string(),
            tickets_file: "it_tickets.csv".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            max_command_length: 512,
            max_username_length: 64,
            max_password_length: 72,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { max_clients: 16 }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides.
    ///
    /// Missing files are tolerated; built-in defaults fill any gaps.
    pub fn load() -> Result<Self, ConfigError> {
        let config_paths = [
            "uip-server/config", // Container layout: /app/uip-server/config.toml
            "config",            // Local development: ./config.toml
        ];

        let mut builder = Self::defaults()?;
        for config_path in &config_paths {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        Self::finish(builder)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?.add_source(File::with_name(path));
        Self::finish(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let startup = StartupConfig::default();
        let runtime = RuntimeConfig::default();

        Config::builder()
            .set_default("bind_address", startup.bind_address)?
            .set_default("port", i64::from(startup.port))?
            .set_default("data_dir", startup.data_dir)?
            .set_default("credentials_file", startup.credentials_file)?
            .set_default("incidents_file", startup.incidents_file)?
            .set_default("tickets_file", startup.tickets_file)?
            .set_default("bcrypt_cost", i64::from(startup.bcrypt_cost))?
            .set_default("max_command_length", startup.max_command_length as i64)?
            .set_default("max_username_length", startup.max_username_length as i64)?
            .set_default("max_password_length", startup.max_password_length as i64)?
            .set_default("max_clients", runtime.max_clients as i64)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Split into startup (immutable) and runtime (mutable) parts
    pub fn split(self) -> (StartupConfig, SharedRuntimeConfig) {
        let runtime = Arc::new(RwLock::new(self.runtime));
        (self.startup, runtime)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.startup.validate()?;

        if self.runtime.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl StartupConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.is_empty() {
            return Err(ConfigError::Message("data_dir cannot be empty".into()));
        }

        for (name, value) in [
            ("credentials_file", &self.credentials_file),
            ("incidents_file", &self.incidents_file),
            ("tickets_file", &self.tickets_file),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Message(format!("{name} cannot be empty")));
            }
        }

        if !(MIN_COST..=MAX_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "bcrypt_cost must be between {MIN_COST} and {MAX_COST}"
            )));
        }

        if self.max_command_length == 0
            || self.max_username_length == 0
            || self.max_password_length == 0
        {
            return Err(ConfigError::Message(
                "input length limits must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a socket address string
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn data_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir_path().join(&self.credentials_file)
    }

    pub fn incidents_path(&self) -> PathBuf {
        self.data_dir_path().join(&self.incidents_file)
    }

    pub fn tickets_path(&self) -> PathBuf {
        self.data_dir_path().join(&self.tickets_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "port = 4100\ndata_dir = \"/srv/uip\"\nbcrypt_cost = 10\nmax_clients = 3\n",
        )
        .unwrap();

        let config = ServerConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.startup.port, 4100);
        assert_eq!(config.startup.bcrypt_cost, 10);
        assert_eq!(config.runtime.max_clients, 3);
        assert_eq!(config.startup.bind_address, "127.0.0.1");
        assert_eq!(
            config.startup.credentials_path(),
            PathBuf::from("/srv/uip/users.txt")
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(ServerConfig::load_from(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn rejects_out_of_range_bcrypt_cost() {
        let config = ServerConfig {
            startup: StartupConfig {
                bcrypt_cost: 3,
                ..StartupConfig::default()
            },
            runtime: RuntimeConfig::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_clients() {
        let config = ServerConfig {
            startup: StartupConfig::default(),
            runtime: RuntimeConfig { max_clients: 0 },
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig {
            startup: StartupConfig::default(),
            runtime: RuntimeConfig::default(),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.startup.control_socket(), "127.0.0.1:2323");
    }

    #[test]
    fn port_zero_means_ephemeral() {
        let config = ServerConfig {
            startup: StartupConfig {
                port: 0,
                ..StartupConfig::default()
            },
            runtime: RuntimeConfig::default(),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.startup.control_socket(), "127.0.0.1:0");
    }
}
