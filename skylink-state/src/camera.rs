//! The synchronized setting graph of one camera instance
//!
//! Scalar settings are capability-gated `Setting`s; recording and photo
//! are composite settings with per-mode memory; zoom is a repeated
//! non-acknowledged control. Availability of the dependent settings is
//! derived from the exposure and white balance modes and recomputed after
//! every change that could affect it.

use setting_store::Setting;
use skylink_channel::values::{
    AutoRecord, EvCompensation, ExposureLockMode, ExposureMode, Hdr, IsoSensitivity, ShutterSpeed,
    Style, Temperature, WhiteBalanceMode,
};

use crate::photo::PhotoSetting;
use crate::recording::RecordingSetting;
use crate::repeater::ZoomRepeater;

/// All synchronized settings of one camera
#[derive(Debug)]
pub struct CameraSettings {
    pub exposure_mode: Setting<ExposureMode>,
    /// Available only in a mode with manual shutter speed
    pub shutter_speed: Setting<ShutterSpeed>,
    /// Available only in a mode with manual iso sensitivity
    pub iso_sensitivity: Setting<IsoSensitivity>,
    /// Available only in a fully automatic, unlocked exposure mode
    pub ev_compensation: Setting<EvCompensation>,
    /// Connection-only: resets to `Unlocked` on every disconnect
    pub exposure_lock: Setting<ExposureLockMode>,
    pub white_balance_mode: Setting<WhiteBalanceMode>,
    /// Available only in custom white balance mode
    pub white_balance_temperature: Setting<Temperature>,
    pub style: Setting<Style>,
    pub hdr: Setting<Hdr>,
    pub auto_record: Setting<AutoRecord>,
    pub recording: RecordingSetting,
    pub photo: PhotoSetting,
    pub(crate) zoom: ZoomRepeater,
    zoom_level: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraSettings {
    pub fn new() -> Self {
        let mut camera = Self {
            exposure_mode: Setting::new(ExposureMode::Automatic),
            shutter_speed: Setting::new(ShutterSpeed::OneOver30),
            iso_sensitivity: Setting::new(IsoSensitivity::Iso100),
            ev_compensation: Setting::new(EvCompensation::Ev0),
            exposure_lock: Setting::new(ExposureLockMode::Unlocked),
            white_balance_mode: Setting::new(WhiteBalanceMode::Automatic),
            white_balance_temperature: Setting::new(Temperature::K5000),
            style: Setting::new(Style::Standard),
            hdr: Setting::new(Hdr(false)),
            auto_record: Setting::new(AutoRecord(false)),
            recording: RecordingSetting::new(),
            photo: PhotoSetting::new(),
            zoom: ZoomRepeater::default(),
            zoom_level: 1.0,
        };
        camera.refresh_availability();
        camera
    }

    /// Current absolute zoom level, as last reported
    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    pub(crate) fn set_zoom_level(&mut self, level: f64) -> bool {
        if self.zoom_level != level {
            self.zoom_level = level;
            true
        } else {
            false
        }
    }

    /// Recompute derived availability, returning whether anything flipped
    ///
    /// Gating reads the requested value when a confirmation is in flight,
    /// so dependent settings follow a mode change as soon as it is asked
    /// for rather than when the device confirms it.
    pub fn refresh_availability(&mut self) -> bool {
        let mode = self
            .exposure_mode
            .pending()
            .copied()
            .unwrap_or(*self.exposure_mode.value());
        let locked = self
            .exposure_lock
            .pending()
            .copied()
            .unwrap_or(*self.exposure_lock.value())
            .is_locked();
        let white_balance = self
            .white_balance_mode
            .pending()
            .copied()
            .unwrap_or(*self.white_balance_mode.value());

        let mut changed = self
            .shutter_speed
            .set_available(mode.uses_manual_shutter_speed());
        changed |= self.iso_sensitivity.set_available(mode.uses_manual_iso());
        changed |= self
            .ev_compensation
            .set_available(mode.is_automatic() && !locked);
        changed |= self
            .white_balance_temperature
            .set_available(white_balance == WhiteBalanceMode::Custom);
        changed
    }

    /// Arm the replay-once latch on every persisted setting
    ///
    /// The exposure lock is connection-only and never replayed.
    pub(crate) fn begin_reconcile(&mut self) {
        self.exposure_mode.begin_reconcile();
        self.shutter_speed.begin_reconcile();
        self.iso_sensitivity.begin_reconcile();
        self.ev_compensation.begin_reconcile();
        self.white_balance_mode.begin_reconcile();
        self.white_balance_temperature.begin_reconcile();
        self.style.begin_reconcile();
        self.hdr.begin_reconcile();
        self.auto_record.begin_reconcile();
        self.recording.begin_reconcile();
        self.photo.begin_reconcile();
    }

    /// Disconnect rollback: in-flight requests become the local truth,
    /// connection-only state resets, the zoom target is dropped
    pub(crate) fn rollback(&mut self) -> bool {
        let mut changed = self.exposure_mode.commit_pending();
        changed |= self.shutter_speed.commit_pending();
        changed |= self.iso_sensitivity.commit_pending();
        changed |= self.ev_compensation.commit_pending();
        changed |= self.white_balance_mode.commit_pending();
        changed |= self.white_balance_temperature.commit_pending();
        changed |= self.style.commit_pending();
        changed |= self.hdr.commit_pending();
        changed |= self.auto_record.commit_pending();
        changed |= self.recording.commit_pending();
        changed |= self.photo.commit_pending();
        changed |= self.exposure_lock.reset(ExposureLockMode::Unlocked);
        self.zoom.clear();
        changed |= self.refresh_availability();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraSettings {
        let mut cam = CameraSettings::new();
        cam.exposure_mode.apply_capability(vec![
            ExposureMode::Automatic,
            ExposureMode::ManualShutterSpeed,
            ExposureMode::Manual,
        ]);
        cam.shutter_speed
            .apply_capability(vec![ShutterSpeed::OneOver60, ShutterSpeed::OneOver30]);
        cam.ev_compensation.apply_capability(vec![
            EvCompensation::EvMinus1,
            EvCompensation::Ev0,
            EvCompensation::EvPlus1,
        ]);
        cam.exposure_lock
            .apply_capability(vec![ExposureLockMode::Unlocked, ExposureLockMode::Locked]);
        cam.white_balance_mode.apply_capability(vec![
            WhiteBalanceMode::Automatic,
            WhiteBalanceMode::Custom,
        ]);
        cam.white_balance_temperature
            .apply_capability(vec![Temperature::K4000, Temperature::K5000]);
        cam.refresh_availability();
        cam
    }

    #[test]
    fn test_automatic_mode_availability() {
        let cam = camera();
        assert!(!cam.shutter_speed.is_available());
        assert!(!cam.iso_sensitivity.is_available());
        assert!(cam.ev_compensation.is_available());
        assert!(!cam.white_balance_temperature.is_available());
    }

    #[test]
    fn test_manual_mode_flips_availability() {
        let mut cam = camera();
        cam.exposure_mode.apply_report(ExposureMode::ManualShutterSpeed);
        assert!(cam.refresh_availability());
        assert!(cam.shutter_speed.is_available());
        assert!(!cam.iso_sensitivity.is_available());
        assert!(!cam.ev_compensation.is_available());
        assert!(cam.ev_compensation.supported().is_empty());
    }

    #[test]
    fn test_requested_mode_gates_before_confirmation() {
        let mut cam = camera();
        // The request is still pending, but gating follows it already
        cam.exposure_mode.assign(ExposureMode::Manual, true);
        assert!(cam.refresh_availability());
        assert!(cam.shutter_speed.is_available());
        assert!(!cam.ev_compensation.is_available());
    }

    #[test]
    fn test_lock_gates_ev_compensation() {
        let mut cam = camera();
        cam.exposure_lock.apply_report(ExposureLockMode::Locked);
        assert!(cam.refresh_availability());
        assert!(!cam.ev_compensation.is_available());
    }

    #[test]
    fn test_custom_white_balance_enables_temperature() {
        let mut cam = camera();
        cam.white_balance_mode.apply_report(WhiteBalanceMode::Custom);
        assert!(cam.refresh_availability());
        assert!(cam.white_balance_temperature.is_available());
    }

    #[test]
    fn test_rollback_commits_and_resets_lock() {
        let mut cam = camera();
        cam.exposure_mode.apply_report(ExposureMode::Automatic);
        cam.exposure_mode.assign(ExposureMode::Manual, true);
        cam.exposure_lock.apply_report(ExposureLockMode::Locked);
        assert!(cam.rollback());
        assert_eq!(*cam.exposure_mode.value(), ExposureMode::Manual);
        assert!(!cam.exposure_mode.updating());
        assert_eq!(*cam.exposure_lock.value(), ExposureLockMode::Unlocked);
        assert!(cam.exposure_lock.supported().is_empty());
    }
}
