//! UDP listener for the game's "Data Out" stream

use fmtel_core::{PacketSource, SourceError};
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{info, trace};

/// Address the game is usually configured to send to
pub const DEFAULT_UDP_ADDR: &str = "0.0.0.0:7777";

/// Receive buffer size. Anything longer is truncated by the OS and then
/// rejected by the decoder on length.
const MAX_DATAGRAM_SIZE: usize = 1024;

pub struct UdpSource {
    socket: UdpSocket,
    name: String,
    buf: Box<[u8; MAX_DATAGRAM_SIZE]>,
}

impl UdpSource {
    /// Bind the listening socket
    pub async fn bind(addr: &str) -> Result<Self, SourceError> {
        let bind_err = |source: io::Error| SourceError::Bind {
            addr: addr.to_string(),
            source,
        };

        let socket = UdpSocket::bind(addr).await.map_err(bind_err)?;
        let local = socket.local_addr().map_err(bind_err)?;
        info!("Listening for telemetry on udp://{}", local);

        Ok(Self {
            socket,
            name: format!("udp {}", local),
            buf: Box::new([0u8; MAX_DATAGRAM_SIZE]),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl PacketSource for UdpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn recv(&mut self) -> Result<&[u8], SourceError> {
        let (len, peer) = self.socket.recv_from(&mut self.buf[..]).await?;
        trace!(%peer, len, "datagram received");
        Ok(&self.buf[..len])
    }
}
