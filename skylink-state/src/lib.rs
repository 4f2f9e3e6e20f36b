//! Skylink Setting Synchronization
//!
//! Keeps the camera settings of a drone synchronized with local state,
//! across connections, disconnections and offline edits.
//!
//! # Features
//!
//! - **Optimistic mutation**: a setting change while connected goes
//!   pending until the device confirms it; offline it becomes the local
//!   truth immediately
//! - **Reconciliation**: on reconnect, offline edits are replayed to the
//!   device exactly once per setting
//! - **Multi-camera**: reports carry a camera id and route to independent
//!   per-camera setting graphs over a single channel
//! - **Derived availability**: dependent settings (manual shutter speed,
//!   iso, EV compensation, custom temperature) follow the modes that gate
//!   them
//! - **Batched notification**: one entry point, at most one change event
//!
//! # Architecture
//!
//! ```text
//! Reports ──> SettingEngine ──> CameraSettings (per camera id)
//!                 │                   │
//!                 └── Commands        └── ChangeEvents (1 per transaction)
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use skylink_state::Drone;
//! use skylink_channel::values::ExposureMode;
//! use skylink_channel::{CameraId, ConnectionEvent};
//!
//! let drone = Drone::new(Arc::new(transport));
//! let changes = drone.changes();
//!
//! // Transport thread feeds connection transitions and reports
//! drone.connection_event(ConnectionEvent::Connected);
//!
//! // Application thread mutates and observes
//! drone.set_exposure_mode(CameraId::MAIN, ExposureMode::Manual)?;
//! while let Some(event) = changes.recv() {
//!     println!("settings changed: {:?}", event.instance);
//! }
//! ```

pub mod camera;
pub mod drone;
pub mod engine;
pub mod error;
pub mod logging;
pub mod photo;
pub mod recording;

mod repeater;
mod router;

// ============================================================================
// Re-exports - Public API
// ============================================================================

pub use camera::CameraSettings;
pub use drone::Drone;
pub use engine::SettingEngine;
pub use error::{Result, StateError};
pub use logging::{init_logging, init_logging_from_env, is_initialized, LogVerbosity, LoggingInitError};
pub use photo::PhotoSetting;
pub use recording::RecordingSetting;

// Core vocabulary from the store and channel layers
pub use setting_store::{Assign, ChangeEvent, ChangeIterator, ChangeOrigin, Setting, SyncState};
pub use skylink_channel::{CameraId, ConnectionEvent};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::drone::Drone;
    pub use crate::engine::SettingEngine;
    pub use crate::error::{Result, StateError};
    pub use setting_store::{Assign, ChangeOrigin, SyncState};
    pub use skylink_channel::prelude::*;
}
