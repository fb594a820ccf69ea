//! Packet sources for fmtel

pub mod demo;
pub mod scripted;
pub mod udp;

pub use demo::DemoSource;
pub use scripted::ScriptedSource;
pub use udp::{UdpSource, DEFAULT_UDP_ADDR};
