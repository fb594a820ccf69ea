//! fmtel Core Library
//!
//! This crate provides the Forza telemetry wire format, the packet record
//! and its derived dashboard values, the session tracker that filters
//! and de-duplicates incoming packets, and the dyno peaks it keeps.

pub mod cars;
pub mod classify;
pub mod dyno;
pub mod error;
pub mod export;
pub mod game;
pub mod model;
pub mod session;
pub mod source;
pub mod units;
pub mod wire;

pub use cars::{CarList, CarLookup, CarReference};
pub use classify::{CarClass, Drivetrain};
pub use dyno::{DynoStats, TopSpeed};
pub use error::{PacketError, SourceError, UnknownGame};
pub use export::{FieldMask, PacketSummary};
pub use game::Game;
pub use model::{Corners, ForzaPacket, Vector3};
pub use session::{Acceptance, SessionStats, SessionTracker, Snapshot};
pub use source::PacketSource;
pub use units::Temperature;
pub use wire::{decode, decode_for, encode, encode_for, HORIZON_PACKET_SIZE, PACKET_SIZE};
