//! Client error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("failed to send message: {0}")]
    Write(#[source] Box<tungstenite::Error>),

    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}
