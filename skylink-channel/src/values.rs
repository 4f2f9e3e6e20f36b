//! Parameter value domains for the camera setting families
//!
//! Each type here is one dimension of the synchronized setting graph. The
//! enumerations are deliberately closed: the engine routes reports with
//! exhaustive matches, never reflection.

use serde::{Deserialize, Serialize};
use setting_store::SettingValue;

// ============================================================================
// Exposure
// ============================================================================

/// Camera exposure mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExposureMode {
    /// Shutter speed and iso sensitivity are both device-chosen
    Automatic,
    AutomaticPreferIsoSensitivity,
    AutomaticPreferShutterSpeed,
    /// Iso sensitivity is user-chosen, shutter speed device-chosen
    ManualIsoSensitivity,
    /// Shutter speed is user-chosen, iso sensitivity device-chosen
    ManualShutterSpeed,
    /// Both are user-chosen
    Manual,
}

impl ExposureMode {
    /// Whether the manual shutter speed setting is meaningful in this mode
    pub fn uses_manual_shutter_speed(&self) -> bool {
        matches!(self, ExposureMode::ManualShutterSpeed | ExposureMode::Manual)
    }

    /// Whether the manual iso sensitivity setting is meaningful in this mode
    pub fn uses_manual_iso(&self) -> bool {
        matches!(self, ExposureMode::ManualIsoSensitivity | ExposureMode::Manual)
    }

    /// Whether exposure compensation is meaningful in this mode
    pub fn is_automatic(&self) -> bool {
        matches!(
            self,
            ExposureMode::Automatic
                | ExposureMode::AutomaticPreferIsoSensitivity
                | ExposureMode::AutomaticPreferShutterSpeed
        )
    }
}

impl SettingValue for ExposureMode {
    const KEY: &'static str = "exposure_mode";
}

/// Manual shutter speed, as a fraction of a second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShutterSpeed {
    OneOver10000,
    OneOver4000,
    OneOver2000,
    OneOver1000,
    OneOver500,
    OneOver240,
    OneOver120,
    OneOver60,
    OneOver30,
    One,
}

impl SettingValue for ShutterSpeed {
    const KEY: &'static str = "shutter_speed";
}

/// Manual iso sensitivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsoSensitivity {
    Iso50,
    Iso100,
    Iso200,
    Iso400,
    Iso800,
    Iso1600,
    Iso3200,
}

impl SettingValue for IsoSensitivity {
    const KEY: &'static str = "iso_sensitivity";
}

/// Exposure compensation, in EV steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvCompensation {
    EvMinus3,
    EvMinus2,
    EvMinus1,
    Ev0,
    EvPlus1,
    EvPlus2,
    EvPlus3,
}

impl SettingValue for EvCompensation {
    const KEY: &'static str = "ev_compensation";
}

/// Exposure lock state
///
/// Connection-only: lock state has no offline existence and resets to
/// `Unlocked` whenever the drone disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExposureLockMode {
    Unlocked,
    /// Exposure locked on the current values
    Locked,
}

impl ExposureLockMode {
    pub fn is_locked(&self) -> bool {
        matches!(self, ExposureLockMode::Locked)
    }
}

impl SettingValue for ExposureLockMode {
    const KEY: &'static str = "exposure_lock";
}

// ============================================================================
// White balance
// ============================================================================

/// White balance mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WhiteBalanceMode {
    Automatic,
    Candle,
    Sunset,
    Incandescent,
    Fluorescent,
    Daylight,
    Cloudy,
    /// Temperature is taken from the custom temperature setting
    Custom,
}

impl SettingValue for WhiteBalanceMode {
    const KEY: &'static str = "white_balance_mode";
}

/// Custom white balance color temperature, in kelvin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temperature {
    K2000,
    K3000,
    K4000,
    K5000,
    K6000,
    K7000,
    K8000,
    K9000,
    K10000,
}

impl SettingValue for Temperature {
    const KEY: &'static str = "white_balance_temperature";
}

// ============================================================================
// Image style
// ============================================================================

/// Active image style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Standard,
    Plog,
    Intense,
    Pastel,
}

impl SettingValue for Style {
    const KEY: &'static str = "style";
}

/// High dynamic range toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hdr(pub bool);

impl Hdr {
    pub fn is_active(&self) -> bool {
        self.0
    }
}

impl SettingValue for Hdr {
    const KEY: &'static str = "hdr";
}

/// Automatic recording on takeoff/landing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AutoRecord(pub bool);

impl AutoRecord {
    pub fn is_active(&self) -> bool {
        self.0
    }
}

impl SettingValue for AutoRecord {
    const KEY: &'static str = "auto_record";
}

// ============================================================================
// Recording
// ============================================================================

/// Video recording mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordingMode {
    Standard,
    Hyperlapse,
    SlowMotion,
    HighFramerate,
}

impl SettingValue for RecordingMode {
    const KEY: &'static str = "recording_mode";
}

/// Recording resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    Uhd4k,
    Dci4k,
    Res2_7k,
    Res1080p,
    Res720p,
}

impl SettingValue for Resolution {
    const KEY: &'static str = "resolution";
}

/// Recording framerate
///
/// Ordering follows frame frequency, slowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Framerate {
    Fps24,
    Fps25,
    Fps30,
    Fps48,
    Fps50,
    Fps60,
    Fps120,
}

impl SettingValue for Framerate {
    const KEY: &'static str = "framerate";
}

/// Hyperlapse speedup ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HyperlapseRatio {
    Ratio15,
    Ratio30,
    Ratio60,
    Ratio120,
    Ratio240,
}

impl SettingValue for HyperlapseRatio {
    const KEY: &'static str = "hyperlapse_ratio";
}

/// Full recording configuration, sent and confirmed as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordingConfig {
    pub mode: RecordingMode,
    pub resolution: Resolution,
    pub framerate: Framerate,
    /// Meaningful only in hyperlapse mode; carried as a filler value
    /// otherwise, matching the wire format
    pub hyperlapse: HyperlapseRatio,
}

impl SettingValue for RecordingConfig {
    const KEY: &'static str = "recording";
}

// ============================================================================
// Photo
// ============================================================================

/// Photo capture mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhotoMode {
    Single,
    Burst,
    Bracketing,
    TimeLapse,
    GpsLapse,
}

impl SettingValue for PhotoMode {
    const KEY: &'static str = "photo_mode";
}

/// Burst value: count over duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BurstValue {
    Burst14Over4s,
    Burst14Over2s,
    Burst14Over1s,
    Burst10Over4s,
    Burst10Over2s,
    Burst10Over1s,
}

impl SettingValue for BurstValue {
    const KEY: &'static str = "burst_value";
}

/// Bracketing EV preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BracketingValue {
    Preset1Ev,
    Preset2Ev,
    Preset3Ev,
    Preset1Ev2Ev,
    Preset1Ev2Ev3Ev,
}

impl SettingValue for BracketingValue {
    const KEY: &'static str = "bracketing_value";
}

/// Full photo configuration, sent and confirmed as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoConfig {
    pub mode: PhotoMode,
    /// Meaningful only in burst mode
    pub burst: BurstValue,
    /// Meaningful only in bracketing mode
    pub bracketing: BracketingValue,
}

impl SettingValue for PhotoConfig {
    const KEY: &'static str = "photo";
}

// ============================================================================
// Zoom
// ============================================================================

/// How a zoom target is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoomControlMode {
    /// Target is an absolute zoom level
    Level,
    /// Target is a signed velocity; zero means stop
    Velocity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposure_mode_predicates() {
        assert!(ExposureMode::Automatic.is_automatic());
        assert!(!ExposureMode::Manual.is_automatic());
        assert!(ExposureMode::Manual.uses_manual_shutter_speed());
        assert!(ExposureMode::Manual.uses_manual_iso());
        assert!(ExposureMode::ManualShutterSpeed.uses_manual_shutter_speed());
        assert!(!ExposureMode::ManualShutterSpeed.uses_manual_iso());
    }

    #[test]
    fn test_setting_keys_are_distinct() {
        let keys = [
            ExposureMode::KEY,
            ShutterSpeed::KEY,
            IsoSensitivity::KEY,
            EvCompensation::KEY,
            ExposureLockMode::KEY,
            WhiteBalanceMode::KEY,
            Temperature::KEY,
            Style::KEY,
            Hdr::KEY,
            AutoRecord::KEY,
            RecordingConfig::KEY,
            PhotoConfig::KEY,
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
