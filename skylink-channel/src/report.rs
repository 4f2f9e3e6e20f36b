//! Inbound device reports
//!
//! Reports come in two shapes: current-value reports for one dimension,
//! and capability reports listing the values a dimension accepts.
//! Capability lists can span several events; items are framed by
//! first/last flags and only apply once the last item is seen.

use serde::{Deserialize, Serialize};

use crate::values::{
    AutoRecord, BracketingValue, BurstValue, EvCompensation, ExposureLockMode, ExposureMode,
    Framerate, Hdr, HyperlapseRatio, IsoSensitivity, PhotoConfig, PhotoMode, RecordingConfig,
    RecordingMode, Resolution, ShutterSpeed, Style, Temperature, WhiteBalanceMode,
};

/// A current-value report addressed to one camera instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Report {
    ExposureMode(ExposureMode),
    ShutterSpeed(ShutterSpeed),
    IsoSensitivity(IsoSensitivity),
    EvCompensation(EvCompensation),
    ExposureLock(ExposureLockMode),
    WhiteBalanceMode(WhiteBalanceMode),
    WhiteBalanceTemperature(Temperature),
    Style(Style),
    Hdr(Hdr),
    AutoRecord(AutoRecord),
    Recording(RecordingConfig),
    Photo(PhotoConfig),
    /// Current absolute zoom level
    ZoomLevel(f64),
    /// The addressed camera became the drone's active one
    Active,
}

/// Framing flags of one capability-list event
///
/// Mirrors the generic list-flags convention of the wire protocol: FIRST
/// opens a fresh accumulation, LAST commits it, EMPTY stands for a list
/// with no items at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFlags {
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl ListFlags {
    /// A self-contained single-event list
    pub fn single() -> Self {
        Self {
            first: true,
            last: true,
            empty: false,
        }
    }

    /// Opens a multi-event list
    pub fn opening() -> Self {
        Self {
            first: true,
            last: false,
            empty: false,
        }
    }

    /// Continues a multi-event list
    pub fn middle() -> Self {
        Self {
            first: false,
            last: false,
            empty: false,
        }
    }

    /// Closes a multi-event list
    pub fn closing() -> Self {
        Self {
            first: false,
            last: true,
            empty: false,
        }
    }

    /// An empty list: the dimension supports nothing
    pub fn empty() -> Self {
        Self {
            first: true,
            last: true,
            empty: true,
        }
    }
}

/// Setting dimension addressed by a capability report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    ExposureMode,
    ShutterSpeed,
    IsoSensitivity,
    EvCompensation,
    ExposureLock,
    WhiteBalanceMode,
    WhiteBalanceTemperature,
    Style,
    Hdr,
    AutoRecord,
    Recording,
    Photo,
}

/// Per-recording-mode capability entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingCapability {
    pub mode: RecordingMode,
    /// Supported resolutions for this mode, in device order
    pub resolutions: Vec<Resolution>,
    /// Supported framerates for this mode, in device order
    pub framerates: Vec<Framerate>,
    /// Supported hyperlapse ratios, empty for non-hyperlapse modes
    pub ratios: Vec<HyperlapseRatio>,
}

/// Per-photo-mode capability entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoCapability {
    pub mode: PhotoMode,
    /// Supported burst values, empty for non-burst modes
    pub bursts: Vec<BurstValue>,
    /// Supported bracketing presets, empty for non-bracketing modes
    pub bracketings: Vec<BracketingValue>,
}

/// Payload of one capability-list event
///
/// Multi-event lists carry the same variant in every event; items
/// concatenate in arrival order until the LAST flag is seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CapabilityData {
    ExposureModes(Vec<ExposureMode>),
    ShutterSpeeds(Vec<ShutterSpeed>),
    IsoSensitivities(Vec<IsoSensitivity>),
    EvCompensations(Vec<EvCompensation>),
    ExposureLockModes(Vec<ExposureLockMode>),
    WhiteBalanceModes(Vec<WhiteBalanceMode>),
    Temperatures(Vec<Temperature>),
    Styles(Vec<Style>),
    HdrModes(Vec<Hdr>),
    AutoRecordModes(Vec<AutoRecord>),
    Recording(Vec<RecordingCapability>),
    Photo(Vec<PhotoCapability>),
}

impl CapabilityData {
    /// The dimension this payload belongs to
    pub fn dimension(&self) -> Dimension {
        match self {
            CapabilityData::ExposureModes(_) => Dimension::ExposureMode,
            CapabilityData::ShutterSpeeds(_) => Dimension::ShutterSpeed,
            CapabilityData::IsoSensitivities(_) => Dimension::IsoSensitivity,
            CapabilityData::EvCompensations(_) => Dimension::EvCompensation,
            CapabilityData::ExposureLockModes(_) => Dimension::ExposureLock,
            CapabilityData::WhiteBalanceModes(_) => Dimension::WhiteBalanceMode,
            CapabilityData::Temperatures(_) => Dimension::WhiteBalanceTemperature,
            CapabilityData::Styles(_) => Dimension::Style,
            CapabilityData::HdrModes(_) => Dimension::Hdr,
            CapabilityData::AutoRecordModes(_) => Dimension::AutoRecord,
            CapabilityData::Recording(_) => Dimension::Recording,
            CapabilityData::Photo(_) => Dimension::Photo,
        }
    }

    /// Append another event's items, for multi-event accumulation
    ///
    /// Returns false (and leaves self untouched) if the variants disagree.
    pub fn merge(&mut self, other: CapabilityData) -> bool {
        match (self, other) {
            (CapabilityData::ExposureModes(a), CapabilityData::ExposureModes(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::ShutterSpeeds(a), CapabilityData::ShutterSpeeds(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::IsoSensitivities(a), CapabilityData::IsoSensitivities(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::EvCompensations(a), CapabilityData::EvCompensations(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::ExposureLockModes(a), CapabilityData::ExposureLockModes(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::WhiteBalanceModes(a), CapabilityData::WhiteBalanceModes(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::Temperatures(a), CapabilityData::Temperatures(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::Styles(a), CapabilityData::Styles(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::HdrModes(a), CapabilityData::HdrModes(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::AutoRecordModes(a), CapabilityData::AutoRecordModes(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::Recording(a), CapabilityData::Recording(b)) => {
                a.extend(b);
                true
            }
            (CapabilityData::Photo(a), CapabilityData::Photo(b)) => {
                a.extend(b);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_same_variant() {
        let mut caps = CapabilityData::ExposureModes(vec![ExposureMode::Automatic]);
        assert!(caps.merge(CapabilityData::ExposureModes(vec![ExposureMode::Manual])));
        assert_eq!(
            caps,
            CapabilityData::ExposureModes(vec![ExposureMode::Automatic, ExposureMode::Manual])
        );
    }

    #[test]
    fn test_merge_mismatched_variant() {
        let mut caps = CapabilityData::ExposureModes(vec![ExposureMode::Automatic]);
        assert!(!caps.merge(CapabilityData::Styles(vec![Style::Standard])));
        assert_eq!(
            caps,
            CapabilityData::ExposureModes(vec![ExposureMode::Automatic])
        );
    }

    #[test]
    fn test_dimension_mapping() {
        assert_eq!(
            CapabilityData::Recording(vec![]).dimension(),
            Dimension::Recording
        );
        assert_eq!(
            CapabilityData::Temperatures(vec![]).dimension(),
            Dimension::WhiteBalanceTemperature
        );
    }

    #[test]
    fn test_list_flag_shapes() {
        assert!(ListFlags::single().first && ListFlags::single().last);
        assert!(ListFlags::opening().first && !ListFlags::opening().last);
        assert!(!ListFlags::middle().first && !ListFlags::middle().last);
        assert!(!ListFlags::closing().first && ListFlags::closing().last);
        assert!(ListFlags::empty().empty);
    }
}
