//! Shared application state
//!
//! Built once from startup configuration and handed to every session by
//! reference; there are no process-wide globals.

use crate::analytics::{Assistant, Dashboard};
use crate::auth::{CredentialStore, PasswordHasher};
use crate::config::StartupConfig;

pub struct AppState {
    pub credentials: CredentialStore,
    pub dashboard: Dashboard,
    pub limits: StartupConfig,
}

impl AppState {
    /// Builds state with the offline assistant.
    pub fn from_config(config: StartupConfig) -> Self {
        Self::with_assistant(config, Assistant::offline())
    }

    pub fn with_assistant(config: StartupConfig, assistant: Assistant) -> Self {
        let credentials = CredentialStore::open(
            config.credentials_path(),
            PasswordHasher::new(config.bcrypt_cost),
        );
        let dashboard = Dashboard::new(config.incidents_path(), config.tickets_path(), assistant);

        Self {
            credentials,
            dashboard,
            limits: config,
        }
    }
}
