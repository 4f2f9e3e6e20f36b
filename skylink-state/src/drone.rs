//! Thread-safe facade over the setting engine
//!
//! The engine itself is single-threaded; the facade wraps it in a mutex
//! so a transport thread can feed reports while an application thread
//! mutates settings and observes changes. Every method locks for the
//! duration of one engine entry point.

use std::sync::Arc;

use parking_lot::Mutex;
use setting_store::ChangeIterator;
use skylink_channel::values::{
    AutoRecord, BracketingValue, BurstValue, EvCompensation, ExposureMode, Framerate, Hdr,
    HyperlapseRatio, IsoSensitivity, PhotoMode, RecordingMode, Resolution, ShutterSpeed, Style,
    Temperature, WhiteBalanceMode, ZoomControlMode,
};
use skylink_channel::{
    CameraId, CapabilityData, CommandSender, ConnectionEvent, ListFlags, Report,
};

use crate::camera::CameraSettings;
use crate::engine::SettingEngine;
use crate::error::Result;

/// Handle to one drone's synchronized camera settings
///
/// Clones share the same engine.
///
/// # Example
///
/// ```rust,ignore
/// use skylink_state::Drone;
/// use skylink_channel::values::ExposureMode;
/// use skylink_channel::CameraId;
///
/// let drone = Drone::new(transport);
/// let changes = drone.changes();
///
/// drone.set_exposure_mode(CameraId::MAIN, ExposureMode::Manual)?;
///
/// while let Some(event) = changes.recv() {
///     if let Some(camera) = event.instance {
///         rerender_camera_panel(&drone, camera);
///     }
/// }
/// ```
#[derive(Clone)]
pub struct Drone {
    engine: Arc<Mutex<SettingEngine>>,
}

impl Drone {
    pub fn new(channel: Arc<dyn CommandSender>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(SettingEngine::new(channel))),
        }
    }

    /// Subscribe to the per-transaction change stream
    pub fn changes(&self) -> ChangeIterator<CameraId> {
        self.engine.lock().changes()
    }

    pub fn is_connected(&self) -> bool {
        self.engine.lock().is_connected()
    }

    /// Ids of all known cameras
    pub fn camera_ids(&self) -> Vec<CameraId> {
        self.engine.lock().camera_ids()
    }

    /// The drone's currently active camera, if reported
    pub fn active_camera(&self) -> Option<CameraId> {
        self.engine.lock().active_camera()
    }

    /// Read one camera's setting graph under the lock
    pub fn with_camera<R>(&self, id: CameraId, f: impl FnOnce(&CameraSettings) -> R) -> Option<R> {
        let engine = self.engine.lock();
        engine.camera(id).map(f)
    }

    // ========================================================================
    // Transport-facing entry points
    // ========================================================================

    pub fn connection_event(&self, event: ConnectionEvent) {
        self.engine.lock().connection_event(event);
    }

    pub fn handle_capability(&self, camera: CameraId, data: CapabilityData, flags: ListFlags) {
        self.engine.lock().handle_capability(camera, data, flags);
    }

    pub fn handle_report(&self, camera: CameraId, report: Report) {
        self.engine.lock().handle_report(camera, report);
    }

    /// One control loop tick: resend outstanding zoom targets
    pub fn tick(&self) {
        self.engine.lock().tick();
    }

    // ========================================================================
    // Setting mutation
    // ========================================================================

    pub fn set_exposure_mode(&self, camera: CameraId, mode: ExposureMode) -> Result<()> {
        self.engine.lock().set_exposure_mode(camera, mode)
    }

    pub fn set_shutter_speed(&self, camera: CameraId, speed: ShutterSpeed) -> Result<()> {
        self.engine.lock().set_shutter_speed(camera, speed)
    }

    pub fn set_iso_sensitivity(&self, camera: CameraId, iso: IsoSensitivity) -> Result<()> {
        self.engine.lock().set_iso_sensitivity(camera, iso)
    }

    pub fn set_ev_compensation(&self, camera: CameraId, ev: EvCompensation) -> Result<()> {
        self.engine.lock().set_ev_compensation(camera, ev)
    }

    pub fn lock_exposure(&self, camera: CameraId) -> Result<()> {
        self.engine.lock().lock_exposure(camera)
    }

    pub fn unlock_exposure(&self, camera: CameraId) -> Result<()> {
        self.engine.lock().unlock_exposure(camera)
    }

    pub fn set_white_balance_mode(&self, camera: CameraId, mode: WhiteBalanceMode) -> Result<()> {
        self.engine.lock().set_white_balance_mode(camera, mode)
    }

    pub fn set_white_balance_temperature(
        &self,
        camera: CameraId,
        temperature: Temperature,
    ) -> Result<()> {
        self.engine
            .lock()
            .set_white_balance_temperature(camera, temperature)
    }

    pub fn set_style(&self, camera: CameraId, style: Style) -> Result<()> {
        self.engine.lock().set_style(camera, style)
    }

    pub fn set_hdr(&self, camera: CameraId, hdr: Hdr) -> Result<()> {
        self.engine.lock().set_hdr(camera, hdr)
    }

    pub fn set_auto_record(&self, camera: CameraId, auto_record: AutoRecord) -> Result<()> {
        self.engine.lock().set_auto_record(camera, auto_record)
    }

    pub fn set_recording_mode(&self, camera: CameraId, mode: RecordingMode) -> Result<()> {
        self.engine.lock().set_recording_mode(camera, mode)
    }

    pub fn set_recording_resolution(&self, camera: CameraId, resolution: Resolution) -> Result<()> {
        self.engine.lock().set_recording_resolution(camera, resolution)
    }

    pub fn set_recording_framerate(&self, camera: CameraId, framerate: Framerate) -> Result<()> {
        self.engine.lock().set_recording_framerate(camera, framerate)
    }

    pub fn set_hyperlapse_ratio(&self, camera: CameraId, ratio: HyperlapseRatio) -> Result<()> {
        self.engine.lock().set_hyperlapse_ratio(camera, ratio)
    }

    pub fn set_photo_mode(&self, camera: CameraId, mode: PhotoMode) -> Result<()> {
        self.engine.lock().set_photo_mode(camera, mode)
    }

    pub fn set_burst_value(&self, camera: CameraId, burst: BurstValue) -> Result<()> {
        self.engine.lock().set_burst_value(camera, burst)
    }

    pub fn set_bracketing_value(&self, camera: CameraId, bracketing: BracketingValue) -> Result<()> {
        self.engine.lock().set_bracketing_value(camera, bracketing)
    }

    /// Take a new zoom target and send it immediately
    pub fn control_zoom(&self, camera: CameraId, mode: ZoomControlMode, target: f64) -> Result<()> {
        self.engine.lock().control_zoom(camera, mode, target)
    }
}
