//! Application state for the pagekit API

use crate::config::Config;

/// Requests are stateless; the state only carries configuration
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}
