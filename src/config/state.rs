// Application state module
// Holds the read-only configuration and the shared upstream client

use super::types::Config;
use super::ConfigError;
use crate::petstore::PetstoreClient;

/// Application state, shared across connections behind an `Arc`
pub struct AppState {
    pub config: Config,
    pub petstore: PetstoreClient,
}

impl AppState {
    /// Create `AppState` from a validated configuration
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let petstore = PetstoreClient::from_config(config)?;

        Ok(Self {
            config: config.clone(),
            petstore,
        })
    }
}
