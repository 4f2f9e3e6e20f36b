//! Photo capture configuration as one synchronized unit
//!
//! Same shape as the recording setting: mode, burst value and bracketing
//! preset travel as a single config, mutated one dimension at a time with
//! a per-mode memory filling in the rest.

use std::collections::HashMap;

use setting_store::{Assign, Setting, SyncState};
use skylink_channel::values::{BracketingValue, BurstValue, PhotoConfig, PhotoMode};
use skylink_channel::PhotoCapability;

/// The photo setting of one camera
#[derive(Debug)]
pub struct PhotoSetting {
    inner: Setting<PhotoConfig>,
    capabilities: Vec<PhotoCapability>,
    /// Last confirmed config per mode, consulted when switching back
    memory: HashMap<PhotoMode, PhotoConfig>,
}

impl Default for PhotoSetting {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoSetting {
    pub fn new() -> Self {
        Self {
            inner: Setting::unfiltered(PhotoConfig {
                mode: PhotoMode::Single,
                burst: BurstValue::Burst14Over1s,
                bracketing: BracketingValue::Preset1Ev,
            }),
            capabilities: Vec::new(),
            memory: HashMap::new(),
        }
    }

    /// The confirmed config
    pub fn value(&self) -> &PhotoConfig {
        self.inner.value()
    }

    /// The pending config awaiting device confirmation, if any
    pub fn pending(&self) -> Option<&PhotoConfig> {
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

    /// Whether any photo mode is currently supported
    pub fn is_available(&self) -> bool {
        !self.capabilities.is_empty()
    }

    /// Supported photo modes, in device order
    pub fn supported_modes(&self) -> Vec<PhotoMode> {
        self.capabilities.iter().map(|entry| entry.mode).collect()
    }

    /// Capability entry of one mode, if supported
    pub fn capability_for(&self, mode: PhotoMode) -> Option<&PhotoCapability> {
        self.capabilities.iter().find(|entry| entry.mode == mode)
    }

    /// Supported burst values of the confirmed mode
    pub fn supported_bursts(&self) -> &[BurstValue] {
        self.capability_for(self.inner.value().mode)
            .map(|entry| entry.bursts.as_slice())
            .unwrap_or(&[])
    }

    /// Supported bracketing presets of the confirmed mode
    pub fn supported_bracketings(&self) -> &[BracketingValue] {
        self.capability_for(self.inner.value().mode)
            .map(|entry| entry.bracketings.as_slice())
            .unwrap_or(&[])
    }

    /// Switch modes, restoring the remembered config of the target mode
    pub fn set_mode(&mut self, mode: PhotoMode, connected: bool) -> Assign<PhotoConfig> {
        if self.capability_for(mode).is_none() {
            return Assign::Rejected;
        }
        let target = self.config_for(mode);
        self.assign(target, connected)
    }

    /// Change the burst value; rejected outside burst mode
    pub fn set_burst(&mut self, burst: BurstValue, connected: bool) -> Assign<PhotoConfig> {
        let mut target = *self.inner.value();
        match self.capability_for(target.mode) {
            Some(entry) if entry.bursts.contains(&burst) => {
                target.burst = burst;
                self.assign(target, connected)
            }
            _ => Assign::Rejected,
        }
    }

    /// Change the bracketing preset; rejected outside bracketing mode
    pub fn set_bracketing(
        &mut self,
        bracketing: BracketingValue,
        connected: bool,
    ) -> Assign<PhotoConfig> {
        let mut target = *self.inner.value();
        match self.capability_for(target.mode) {
            Some(entry) if entry.bracketings.contains(&bracketing) => {
                target.bracketing = bracketing;
                self.assign(target, connected)
            }
            _ => Assign::Rejected,
        }
    }

    /// Replace the per-mode capability entries from a device report
    pub fn apply_capability(&mut self, capabilities: Vec<PhotoCapability>) -> bool {
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
    pub fn apply_report(&mut self, config: PhotoConfig) -> bool {
        let changed = self.inner.apply_report(config);
        self.remember();
        changed
    }

    /// Arm the replay-once latch at connect time
    pub fn begin_reconcile(&mut self) {
        self.inner.begin_reconcile();
    }

    /// Process the first config report after a reconnect
    pub fn reconcile_report(&mut self, config: PhotoConfig) -> (Option<PhotoConfig>, bool) {
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

    fn assign(&mut self, target: PhotoConfig, connected: bool) -> Assign<PhotoConfig> {
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

    fn config_for(&self, mode: PhotoMode) -> PhotoConfig {
        let Some(entry) = self.capability_for(mode) else {
            return *self.inner.value();
        };
        match self.memory.get(&mode) {
            Some(remembered) => Self::clamp(*remembered, entry),
            None => self.default_for(entry),
        }
    }

    fn default_for(&self, entry: &PhotoCapability) -> PhotoConfig {
        let current = *self.inner.value();
        PhotoConfig {
            mode: entry.mode,
            burst: entry.bursts.first().copied().unwrap_or(current.burst),
            bracketing: entry
                .bracketings
                .first()
                .copied()
                .unwrap_or(current.bracketing),
        }
    }

    fn clamp(mut config: PhotoConfig, entry: &PhotoCapability) -> PhotoConfig {
        config.mode = entry.mode;
        if !entry.bursts.contains(&config.burst) {
            if let Some(first) = entry.bursts.first() {
                config.burst = *first;
            }
        }
        if !entry.bracketings.contains(&config.bracketing) {
            if let Some(first) = entry.bracketings.first() {
                config.bracketing = *first;
            }
        }
        config
    }

    fn constrain(&self, config: PhotoConfig) -> PhotoConfig {
        match self.capability_for(config.mode) {
            Some(entry) => Self::clamp(config, entry),
            None => match self.capabilities.first() {
                Some(_) => self.config_for(self.capabilities[0].mode),
                None => config,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps() -> Vec<PhotoCapability> {
        vec![
            PhotoCapability {
                mode: PhotoMode::Single,
                bursts: vec![],
                bracketings: vec![],
            },
            PhotoCapability {
                mode: PhotoMode::Burst,
                bursts: vec![BurstValue::Burst10Over1s, BurstValue::Burst14Over1s],
                bracketings: vec![],
            },
            PhotoCapability {
                mode: PhotoMode::Bracketing,
                bursts: vec![],
                bracketings: vec![BracketingValue::Preset1Ev, BracketingValue::Preset3Ev],
            },
        ]
    }

    fn setting() -> PhotoSetting {
        let mut s = PhotoSetting::new();
        s.apply_capability(caps());
        s.apply_report(PhotoConfig {
            mode: PhotoMode::Single,
            burst: BurstValue::Burst14Over1s,
            bracketing: BracketingValue::Preset1Ev,
        });
        s
    }

    #[test]
    fn test_mode_switch_defaults_to_first_values() {
        let mut s = setting();
        match s.set_mode(PhotoMode::Burst, true) {
            Assign::Send(config) => {
                assert_eq!(config.mode, PhotoMode::Burst);
                assert_eq!(config.burst, BurstValue::Burst10Over1s);
            }
            other => panic!("expected Send, got {:?}", other),
        }
    }

    #[test]
    fn test_burst_value_rejected_outside_burst_mode() {
        let mut s = setting();
        assert_eq!(
            s.set_burst(BurstValue::Burst10Over1s, true),
            Assign::Rejected
        );
    }

    #[test]
    fn test_burst_value_in_burst_mode() {
        let mut s = setting();
        s.set_mode(PhotoMode::Burst, true);
        s.apply_report(PhotoConfig {
            mode: PhotoMode::Burst,
            burst: BurstValue::Burst10Over1s,
            bracketing: BracketingValue::Preset1Ev,
        });
        match s.set_burst(BurstValue::Burst14Over1s, true) {
            Assign::Send(config) => assert_eq!(config.burst, BurstValue::Burst14Over1s),
            other => panic!("expected Send, got {:?}", other),
        }
    }

    #[test]
    fn test_memory_restored_per_mode() {
        let mut s = setting();
        s.set_mode(PhotoMode::Bracketing, true);
        s.apply_report(PhotoConfig {
            mode: PhotoMode::Bracketing,
            burst: BurstValue::Burst14Over1s,
            bracketing: BracketingValue::Preset1Ev,
        });
        s.set_bracketing(BracketingValue::Preset3Ev, true);
        s.apply_report(PhotoConfig {
            mode: PhotoMode::Bracketing,
            burst: BurstValue::Burst14Over1s,
            bracketing: BracketingValue::Preset3Ev,
        });
        s.set_mode(PhotoMode::Single, true);
        s.apply_report(PhotoConfig {
            mode: PhotoMode::Single,
            burst: BurstValue::Burst14Over1s,
            bracketing: BracketingValue::Preset1Ev,
        });
        match s.set_mode(PhotoMode::Bracketing, true) {
            Assign::Send(config) => assert_eq!(config.bracketing, BracketingValue::Preset3Ev),
            other => panic!("expected Send, got {:?}", other),
        }
    }
}
