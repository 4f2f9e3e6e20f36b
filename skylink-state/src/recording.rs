//! Video recording configuration as one synchronized unit
//!
//! Mode, resolution, framerate and hyperlapse ratio travel as a single
//! config on the wire, but the API mutates one dimension at a time. The
//! missing dimensions are filled from a per-mode memory of the last
//! confirmed config, so switching modes restores what the user last used
//! in that mode.

use std::collections::HashMap;

use setting_store::{Assign, Setting, SyncState};
use skylink_channel::values::{
    Framerate, HyperlapseRatio, RecordingConfig, RecordingMode, Resolution,
};
use skylink_channel::RecordingCapability;

/// The recording setting of one camera
#[derive(Debug)]
pub struct RecordingSetting {
    inner: Setting<RecordingConfig>,
    capabilities: Vec<RecordingCapability>,
    /// Last confirmed config per mode, consulted when switching back
    memory: HashMap<RecordingMode, RecordingConfig>,
}

impl Default for RecordingSetting {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSetting {
    pub fn new() -> Self {
        // Validation happens against the per-mode capability entries, not
        // the flat capability set of the inner setting.
        Self {
            inner: Setting::unfiltered(RecordingConfig {
                mode: RecordingMode::Standard,
                resolution: Resolution::Res1080p,
                framerate: Framerate::Fps30,
                hyperlapse: HyperlapseRatio::Ratio15,
            }),
            capabilities: Vec::new(),
            memory: HashMap::new(),
        }
    }

    /// The confirmed config
    pub fn value(&self) -> &RecordingConfig {
        self.inner.value()
    }

    /// The pending config awaiting device confirmation, if any
    pub fn pending(&self) -> Option<&RecordingConfig> {
        self.inner.pending()
    }

    /// True while a confirmation is outstanding
    pub fn updating(&self) -> bool {
        self.inner.updating()
    }

    /// Derived synchronization state
    pub fn sync_state(&self) -> SyncState {
        self.inner.sync_state()
    }

    /// Whether any recording mode is currently supported
    pub fn is_available(&self) -> bool {
        !self.capabilities.is_empty()
    }

    /// Supported recording modes, in device order
    pub fn supported_modes(&self) -> Vec<RecordingMode> {
        self.capabilities.iter().map(|entry| entry.mode).collect()
    }

    /// Capability entry of one mode, if supported
    pub fn capability_for(&self, mode: RecordingMode) -> Option<&RecordingCapability> {
        self.capabilities.iter().find(|entry| entry.mode == mode)
    }

    /// Supported resolutions of the confirmed mode
    pub fn supported_resolutions(&self) -> &[Resolution] {
        self.capability_for(self.inner.value().mode)
            .map(|entry| entry.resolutions.as_slice())
            .unwrap_or(&[])
    }

    /// Supported framerates of the confirmed mode
    pub fn supported_framerates(&self) -> &[Framerate] {
        self.capability_for(self.inner.value().mode)
            .map(|entry| entry.framerates.as_slice())
            .unwrap_or(&[])
    }

    /// Supported hyperlapse ratios, empty outside hyperlapse mode
    pub fn supported_ratios(&self) -> &[HyperlapseRatio] {
        self.capability_for(self.inner.value().mode)
            .map(|entry| entry.ratios.as_slice())
            .unwrap_or(&[])
    }

    /// Switch modes, restoring the remembered config of the target mode
    pub fn set_mode(&mut self, mode: RecordingMode, connected: bool) -> Assign<RecordingConfig> {
        if self.capability_for(mode).is_none() {
            return Assign::Rejected;
        }
        let target = self.config_for(mode);
        self.assign(target, connected)
    }

    /// Change the resolution within the confirmed mode
    pub fn set_resolution(
        &mut self,
        resolution: Resolution,
        connected: bool,
    ) -> Assign<RecordingConfig> {
        let mut target = *self.inner.value();
        match self.capability_for(target.mode) {
            Some(entry) if entry.resolutions.contains(&resolution) => {
                target.resolution = resolution;
                self.assign(target, connected)
            }
            _ => Assign::Rejected,
        }
    }

    /// Change the framerate within the confirmed mode
    pub fn set_framerate(
        &mut self,
        framerate: Framerate,
        connected: bool,
    ) -> Assign<RecordingConfig> {
        let mut target = *self.inner.value();
        match self.capability_for(target.mode) {
            Some(entry) if entry.framerates.contains(&framerate) => {
                target.framerate = framerate;
                self.assign(target, connected)
            }
            _ => Assign::Rejected,
        }
    }

    /// Change the hyperlapse ratio; rejected outside hyperlapse mode
    pub fn set_hyperlapse_ratio(
        &mut self,
        ratio: HyperlapseRatio,
        connected: bool,
    ) -> Assign<RecordingConfig> {
        let mut target = *self.inner.value();
        match self.capability_for(target.mode) {
            Some(entry) if entry.ratios.contains(&ratio) => {
                target.hyperlapse = ratio;
                self.assign(target, connected)
            }
            _ => Assign::Rejected,
        }
    }

    /// Replace the per-mode capability entries from a device report
    pub fn apply_capability(&mut self, capabilities: Vec<RecordingCapability>) -> bool {
        let caps_changed = self.capabilities != capabilities;
        self.capabilities = capabilities;
        let constrained = self.constrain(*self.inner.value());
        let value_changed = self.inner.revise(constrained);
        // Withdraw an in-flight request the device can no longer honor,
        // before a disconnect commit could adopt it
        let pending_dropped = match self.inner.pending().copied() {
            Some(requested) if self.constrain(requested) != requested => {
                self.inner.cancel_pending()
            }
            _ => false,
        };
        if value_changed || pending_dropped {
            self.remember();
        }
        caps_changed || value_changed || pending_dropped
    }

    /// Apply a device config report
    pub fn apply_report(&mut self, config: RecordingConfig) -> bool {
        let changed = self.inner.apply_report(config);
        self.remember();
        changed
    }

    /// Arm the replay-once latch at connect time
    pub fn begin_reconcile(&mut self) {
        self.inner.begin_reconcile();
    }

    /// Process the first config report after a reconnect
    pub fn reconcile_report(&mut self, config: RecordingConfig) -> (Option<RecordingConfig>, bool) {
        let outcome = self.inner.reconcile_report(config);
        self.remember();
        outcome
    }

    /// Disconnect rollback: commit any in-flight config as the local truth
    pub fn commit_pending(&mut self) -> bool {
        let changed = self.inner.commit_pending();
        if changed {
            self.remember();
        }
        changed
    }

    fn assign(&mut self, target: RecordingConfig, connected: bool) -> Assign<RecordingConfig> {
        let outcome = self.inner.assign(target, connected);
        if matches!(outcome, Assign::Stored) {
            self.remember();
        }
        outcome
    }

    fn remember(&mut self) {
        if !self.inner.updating() {
            let value = *self.inner.value();
            self.memory.insert(value.mode, value);
        }
    }

    /// The config to request when entering a mode: the remembered one
    /// clamped to the current capabilities, or the mode defaults.
    fn config_for(&self, mode: RecordingMode) -> RecordingConfig {
        let Some(entry) = self.capability_for(mode) else {
            return *self.inner.value();
        };
        match self.memory.get(&mode) {
            Some(remembered) => Self::clamp(*remembered, entry),
            None => self.default_for(entry),
        }
    }

    // Defaults when a mode was never used: first supported resolution,
    // highest supported framerate, first supported hyperlapse ratio.
    fn default_for(&self, entry: &RecordingCapability) -> RecordingConfig {
        let current = *self.inner.value();
        RecordingConfig {
            mode: entry.mode,
            resolution: entry
                .resolutions
                .first()
                .copied()
                .unwrap_or(current.resolution),
            framerate: entry
                .framerates
                .iter()
                .max()
                .copied()
                .unwrap_or(current.framerate),
            hyperlapse: entry.ratios.first().copied().unwrap_or(current.hyperlapse),
        }
    }

    fn clamp(mut config: RecordingConfig, entry: &RecordingCapability) -> RecordingConfig {
        config.mode = entry.mode;
        if !entry.resolutions.contains(&config.resolution) {
            if let Some(first) = entry.resolutions.first() {
                config.resolution = *first;
            }
        }
        if !entry.framerates.contains(&config.framerate) {
            if let Some(highest) = entry.framerates.iter().max() {
                config.framerate = *highest;
            }
        }
        if !entry.ratios.contains(&config.hyperlapse) {
            if let Some(first) = entry.ratios.first() {
                config.hyperlapse = *first;
            }
        }
        config
    }

    fn constrain(&self, config: RecordingConfig) -> RecordingConfig {
        match self.capability_for(config.mode) {
            Some(entry) => Self::clamp(config, entry),
            None => match self.capabilities.first() {
                Some(_) => self.config_for(self.capabilities[0].mode),
                None => config,
            },
        }
    }
}
