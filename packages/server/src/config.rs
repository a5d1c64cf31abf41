//! Server configuration.

use fanout_shared::protocol::DEFAULT_PORT;

use crate::usecase::HubConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port bound on all interfaces
    pub port: u16,
    pub hub: HubConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            hub: HubConfig::default(),
        }
    }
}
