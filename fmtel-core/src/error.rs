//! Error types shared by the decoder and packet sources

use thiserror::Error;

/// Failure to interpret a datagram as a telemetry packet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    /// Buffer length does not match the fixed wire layout
    #[error("malformed packet: expected {expected} bytes, got {actual}")]
    MalformedPacket { expected: usize, actual: usize },
}

/// Game name that matches no supported layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game '{0}', expected one of fm, fm8, fh5")]
pub struct UnknownGame(pub String);

/// Failure while receiving datagrams from a packet source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not bind its socket. Fatal at startup.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A single receive failed; the next one may succeed
    #[error("receive failed: {0}")]
    Receive(#[from] std::io::Error),

    /// The source has no more datagrams
    #[error("packet source closed")]
    Closed,
}

impl SourceError {
    /// Whether the receive loop should stop after this error
    pub fn is_terminal(&self) -> bool {
        matches!(self, SourceError::Bind { .. } | SourceError::Closed)
    }
}
