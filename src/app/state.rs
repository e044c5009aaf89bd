//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::RelayHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: RelayHandle,
}

impl AppState {
    /// Build the state and spawn the relay task behind its handle.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let relay = RelayHandle::spawn(config.map_size, config.rng_seed);

        Self { config, relay }
    }
}
