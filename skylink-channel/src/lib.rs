//! Typed command/report surface of the Skylink drone SDK
//!
//! This crate defines the channel vocabulary shared by the setting engine
//! and transport implementations: camera instance ids, parameter value
//! domains, outbound `Command`s, inbound `Report`s and capability lists
//! with first/last framing, plus the `CommandSender` trait the engine
//! drives and connection lifecycle signals it consumes.
//!
//! Wire encoding, device discovery and transport reliability live outside
//! this crate; a `MockChannel` is provided for tests.

pub mod command;
pub mod id;
pub mod mock;
pub mod report;
pub mod values;

use serde::{Deserialize, Serialize};

// Re-exports - Public API
pub use command::{ChannelError, Command, CommandSender, Result};
pub use id::CameraId;
pub use mock::MockChannel;
pub use report::{
    CapabilityData, Dimension, ListFlags, PhotoCapability, RecordingCapability, Report,
};

/// Transport lifecycle signals consumed by the engine
///
/// The engine never manages the transport; it only reacts to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionEvent {
    /// The command/report channel became usable
    Connected,
    /// The channel dropped; in-flight confirmations will never arrive
    Disconnected,
    /// The device was forgotten; all local state must go
    Forgotten,
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::command::{Command, CommandSender};
    pub use crate::id::CameraId;
    pub use crate::report::{CapabilityData, Dimension, ListFlags, Report};
    pub use crate::ConnectionEvent;
}
