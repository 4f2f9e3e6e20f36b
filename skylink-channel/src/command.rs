//! Outbound commands and the channel surface consumed by the engine
//!
//! The engine never talks to a transport directly: it hands typed commands
//! to a `CommandSender`, addressed to one camera instance. Wire encoding,
//! retries and transport lifecycle are external concerns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::CameraId;
use crate::values::{
    AutoRecord, EvCompensation, ExposureMode, Hdr, IsoSensitivity, PhotoConfig, RecordingConfig,
    ShutterSpeed, Style, Temperature, WhiteBalanceMode, ZoomControlMode,
};

/// A `set` command addressed to one camera instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SetExposureMode(ExposureMode),
    SetShutterSpeed(ShutterSpeed),
    SetIsoSensitivity(IsoSensitivity),
    SetEvCompensation(EvCompensation),
    LockExposure,
    UnlockExposure,
    SetWhiteBalanceMode(WhiteBalanceMode),
    SetWhiteBalanceTemperature(Temperature),
    SetStyle(Style),
    SetHdr(Hdr),
    SetAutoRecord(AutoRecord),
    SetRecording(RecordingConfig),
    SetPhoto(PhotoConfig),
    /// Non-acknowledged continuous control, repeated by the engine
    SetZoomTarget { mode: ZoomControlMode, target: f64 },
}

/// Errors surfaced by a command channel implementation
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel is closed; the device is gone
    #[error("Command channel closed")]
    Closed,

    /// Transport-level failure while emitting a command
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type for channel operations
pub type Result<T> = std::result::Result<T, ChannelError>;

/// Outbound half of the command/report channel
///
/// Implementations encode and emit one command addressed to one camera.
/// Delivery is not guaranteed; confirmation only ever arrives as a report.
pub trait CommandSender: Send + Sync {
    fn send(&self, camera: CameraId, command: Command) -> Result<()>;
}
