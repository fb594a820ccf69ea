//! Packet source trait definition

use crate::error::SourceError;
use std::future::Future;

/// Producer of raw telemetry datagrams
///
/// Each source is responsible for:
/// - Delivering datagrams strictly in arrival order
/// - Reporting transient failures as [`SourceError::Receive`]
/// - Reporting [`SourceError::Closed`] once no more datagrams will arrive
///
/// Decoding is left to the caller so malformed datagrams are handled in one
/// place.
pub trait PacketSource: Send {
    /// Name used in logs (e.g. "udp 0.0.0.0:7777", "demo")
    fn name(&self) -> &str;

    /// Wait for the next datagram
    ///
    /// The returned slice borrows the source's receive buffer and is only
    /// valid until the next call.
    fn recv(&mut self) -> impl Future<Output = Result<&[u8], SourceError>> + Send;
}
