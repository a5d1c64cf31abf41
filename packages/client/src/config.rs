use std::time::Duration;

use fanout_shared::protocol::{DEFAULT_HOST, DEFAULT_PORT, hub_url};

/// How long to wait for the hub to acknowledge our close frame.
pub const DEFAULT_CLOSE_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub close_grace: Duration,
}

impl ClientConfig {
    pub fn url(&self) -> String {
        hub_url(&self.host, self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            close_grace: DEFAULT_CLOSE_GRACE,
        }
    }
}
