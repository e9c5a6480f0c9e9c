use thiserror::Error;

use crate::core::types::Minutes;

#[derive(Error, Debug)]
pub enum ParkError {
    #[error("Peer unavailable at {addr}: {source}")]
    ChannelUnavailable {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Peer handshake failed: {0}")]
    Handshake(String),

    #[error("Peer channel closed")]
    ChannelClosed,

    #[error("Cannot schedule event at T={requested} when current time is T={now}")]
    NonCausalEvent { requested: Minutes, now: Minutes },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ParkError>;
