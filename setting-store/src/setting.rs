//! The unit of synchronization: a device setting with pending-confirmation
//! tracking
//!
//! A `Setting<T>` holds the last device-confirmed value, an optional
//! user-requested pending value, and the capability set that bounds the
//! value domain. The device is always the source of truth: a pending
//! request only commits when the device reports the requested value back,
//! or when a disconnect forces the rollback protocol.

use crate::capability::CapabilitySet;
use crate::value::SettingValue;

/// Outcome of an `assign` call
#[derive(Debug, Clone, PartialEq)]
pub enum Assign<T> {
    /// Value accepted while connected: send this command and await
    /// confirmation
    Send(T),
    /// Value accepted while disconnected: stored locally, no command
    Stored,
    /// Value equals the confirmed value: nothing to do
    Unchanged,
    /// Value outside the current capability set: silently ignored
    Rejected,
}

/// Synchronization state of a setting, derived from its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Confirmed value matches the last known device value
    Synced,
    /// A user request is awaiting device confirmation
    LocalPending,
    /// The value was changed offline and differs from the last known
    /// device value
    OfflineDirty,
}

/// A single synchronized device setting
///
/// # Example
///
/// ```rust
/// use setting_store::{Assign, Setting, SettingValue};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Mode { Auto, Manual }
/// impl SettingValue for Mode {
///     const KEY: &'static str = "mode";
/// }
///
/// let mut setting = Setting::new(Mode::Auto);
/// setting.apply_capability(vec![Mode::Auto, Mode::Manual]);
///
/// // Connected assignment goes pending until the device confirms
/// assert_eq!(setting.assign(Mode::Manual, true), Assign::Send(Mode::Manual));
/// assert!(setting.updating());
///
/// setting.apply_report(Mode::Manual);
/// assert!(!setting.updating());
/// assert_eq!(*setting.value(), Mode::Manual);
/// ```
#[derive(Debug, Clone)]
pub struct Setting<T: SettingValue> {
    confirmed: T,
    pending: Option<T>,
    capability: CapabilitySet<T>,
    /// Derived availability: when false, `supported()` is empty and
    /// assignment is a no-op, but the device-reported capability list
    /// stays buffered for re-enable.
    available: bool,
    /// Last value the device itself reported, kept for offline-dirty
    /// detection across disconnects.
    device_value: Option<T>,
    /// Replay-once latch for the reconnect protocol.
    reconciled: bool,
    /// An unfiltered setting accepts any value without capability
    /// validation.
    unfiltered: bool,
}

impl<T: SettingValue> Setting<T> {
    /// Create a setting with an initial local value and no capabilities
    ///
    /// Until a capability report arrives, every assignment is rejected.
    pub fn new(initial: T) -> Self {
        Self {
            confirmed: initial,
            pending: None,
            capability: CapabilitySet::empty(),
            available: true,
            device_value: None,
            reconciled: true,
            unfiltered: false,
        }
    }

    /// Create a setting whose value domain is not capability-constrained
    pub fn unfiltered(initial: T) -> Self {
        Self {
            unfiltered: true,
            ..Self::new(initial)
        }
    }

    /// The confirmed value (device truth, or the local truth while offline)
    pub fn value(&self) -> &T {
        &self.confirmed
    }

    /// The pending user-requested value, if a confirmation is outstanding
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// True while a confirmation is outstanding
    pub fn updating(&self) -> bool {
        self.pending.is_some()
    }

    /// Currently supported values, empty while the setting is unavailable
    pub fn supported(&self) -> &[T] {
        if self.available {
            self.capability.as_slice()
        } else {
            &[]
        }
    }

    /// Whether the setting currently accepts assignments
    pub fn is_available(&self) -> bool {
        self.available && (self.unfiltered || !self.capability.is_empty())
    }

    /// Derived synchronization state
    pub fn sync_state(&self) -> SyncState {
        if self.pending.is_some() {
            SyncState::LocalPending
        } else if self.is_dirty() {
            SyncState::OfflineDirty
        } else {
            SyncState::Synced
        }
    }

    fn is_dirty(&self) -> bool {
        self.pending.is_none()
            && self
                .device_value
                .as_ref()
                .is_some_and(|device| *device != self.confirmed)
    }

    /// Request a new value, per the optimistic-mutation contract
    ///
    /// While connected, a valid value different from the confirmed one goes
    /// pending and the returned `Assign::Send` instructs the caller to emit
    /// the matching command. While disconnected the value becomes the new
    /// local truth immediately. Values outside the capability set are
    /// silently rejected with no state change.
    pub fn assign(&mut self, value: T, connected: bool) -> Assign<T> {
        if !self.available {
            return Assign::Rejected;
        }
        if !self.unfiltered && !self.capability.contains(&value) {
            return Assign::Rejected;
        }
        if value == self.confirmed {
            return Assign::Unchanged;
        }
        if connected {
            self.pending = Some(value.clone());
            Assign::Send(value)
        } else {
            // No channel, no confirmation: the assignment is the new local
            // truth and `updating` stays false.
            self.confirmed = value;
            self.pending = None;
            Assign::Stored
        }
    }

    /// Apply a device value report, returning whether observable state
    /// changed
    ///
    /// While updating, only a report matching the pending value commits it;
    /// any other value is treated as a stale in-flight report and leaves
    /// the pending request untouched. While not updating, the device value
    /// applies unconditionally, substituting the capability fallback if the
    /// reported value is outside the known set.
    pub fn apply_report(&mut self, value: T) -> bool {
        if let Some(requested) = &self.pending {
            if *requested == value {
                self.confirmed = value.clone();
                self.device_value = Some(value);
                self.pending = None;
                // `updating` flipped even if the value itself was already
                // held
                true
            } else {
                self.device_value = Some(value);
                false
            }
        } else {
            let value = self.constrain(value);
            self.device_value = Some(value.clone());
            if self.confirmed != value {
                self.confirmed = value;
                true
            } else {
                false
            }
        }
    }

    /// Replace the capability set wholesale from a device report
    ///
    /// If the confirmed value falls outside the new set, it is replaced by
    /// the first element in reported order. A pending request for a value
    /// the new set no longer supports is dropped: the device will never
    /// confirm it, and it must not survive into a disconnect commit.
    pub fn apply_capability(&mut self, values: Vec<T>) -> bool {
        let caps_changed = self.capability.replace(values);
        let mut changed = caps_changed && self.available;
        if self.available {
            changed |= self.revalidate();
        }
        changed
    }

    /// Flip derived availability, returning whether observable state changed
    ///
    /// Disabling empties `supported()` without altering the value; enabling
    /// restores the buffered capability list and re-runs the fallback and
    /// pending checks.
    pub fn set_available(&mut self, available: bool) -> bool {
        if self.available == available {
            return false;
        }
        self.available = available;
        let mut changed = !self.capability.is_empty();
        if available {
            changed |= self.revalidate();
        }
        changed
    }

    /// Re-check confirmed and pending values against the capability set
    fn revalidate(&mut self) -> bool {
        let mut changed = false;
        if let Some(fallback) = self.fallback_for(&self.confirmed) {
            self.confirmed = fallback;
            changed = true;
        }
        if let Some(requested) = &self.pending {
            if !self.unfiltered && !self.capability.is_empty() && !self.capability.contains(requested)
            {
                self.pending = None;
                changed = true;
            }
        }
        changed
    }

    /// Arm the replay-once latch at connect time
    pub fn begin_reconcile(&mut self) {
        self.reconciled = false;
    }

    /// Process the first device value report after a reconnect
    ///
    /// If the setting was mutated offline and the device disagrees, the
    /// local value wins: the returned command replays it and the setting
    /// enters the updating state. Otherwise the report applies normally.
    /// Subsequent reports for the same dimension take the plain
    /// `apply_report` path.
    pub fn reconcile_report(&mut self, value: T) -> (Option<T>, bool) {
        if self.reconciled {
            return (None, self.apply_report(value));
        }
        self.reconciled = true;
        if self.is_dirty() && value != self.confirmed {
            self.device_value = Some(value);
            self.pending = Some(self.confirmed.clone());
            (Some(self.confirmed.clone()), true)
        } else {
            (None, self.apply_report(value))
        }
    }

    /// Disconnect rollback: commit any in-flight request as the new local
    /// truth
    ///
    /// Returns whether observable state changed (`updating` flips false
    /// whenever a request was pending).
    pub fn commit_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(requested) => {
                self.confirmed = requested;
                true
            }
            None => false,
        }
    }

    /// Drop an in-flight request without touching the confirmed value
    ///
    /// For settings whose value domain is validated by the caller rather
    /// than the capability set, this lets a capability change withdraw a
    /// request the device can no longer honor.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Replace the confirmed value without touching pending state
    ///
    /// For settings whose value domain is validated by the caller rather
    /// than the capability set, this lets a capability change rewrite the
    /// local truth directly.
    pub fn revise(&mut self, value: T) -> bool {
        if self.confirmed != value {
            self.confirmed = value;
            true
        } else {
            false
        }
    }

    /// Reset a connection-only setting to its unavailable baseline
    ///
    /// Clears capabilities, pending state and device knowledge; the setting
    /// is recreated fresh from reports on the next connection and never
    /// replayed.
    pub fn reset(&mut self, baseline: T) -> bool {
        let mut changed = self.pending.take().is_some();
        if self.available && !self.capability.is_empty() {
            changed = true;
        }
        self.capability = CapabilitySet::empty();
        if self.confirmed != baseline {
            self.confirmed = baseline;
            changed = true;
        }
        self.device_value = None;
        self.reconciled = true;
        changed
    }

    /// Fallback value per the first-element policy, if the given value is
    /// no longer supported
    fn fallback_for(&self, value: &T) -> Option<T> {
        if !self.unfiltered && !self.capability.is_empty() && !self.capability.contains(value) {
            self.capability.first().cloned()
        } else {
            None
        }
    }

    fn constrain(&self, value: T) -> T {
        if self.available {
            if let Some(fallback) = self.fallback_for(&value) {
                return fallback;
            }
        }
        value
    }
}
