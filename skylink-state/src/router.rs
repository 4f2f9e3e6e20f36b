//! Multi-camera routing over one report channel
//!
//! Every report carries a camera id; the router owns one setting graph
//! per id, created lazily when a capability report first names it. A
//! connected session records which ids the device announced; at the next
//! connect, graphs the previous session never mentioned are dropped.
//!
//! Capability lists can span several events. Accumulation is keyed by
//! camera and dimension, framed by first/last flags, and only the
//! completed list reaches the setting graph.

use std::collections::{HashMap, HashSet};

use skylink_channel::{CameraId, CapabilityData, Dimension, ListFlags};

use crate::camera::CameraSettings;

#[derive(Debug, Default)]
pub(crate) struct CameraRouter {
    cameras: HashMap<CameraId, CameraSettings>,
    /// In-flight capability accumulations, keyed by camera and dimension
    accumulating: HashMap<(CameraId, Dimension), CapabilityData>,
    /// Ids announced during the current connected session
    seen: HashSet<CameraId>,
    /// A previous session completed, so `seen` is a trustworthy roster
    roster_known: bool,
    active: Option<CameraId>,
}

impl CameraRouter {
    pub(crate) fn camera(&self, id: CameraId) -> Option<&CameraSettings> {
        self.cameras.get(&id)
    }

    pub(crate) fn camera_mut(&mut self, id: CameraId) -> Option<&mut CameraSettings> {
        self.cameras.get_mut(&id)
    }

    /// The graph for an id, created on first sight
    ///
    /// Returns the graph and whether it was just created.
    pub(crate) fn ensure(&mut self, id: CameraId) -> (&mut CameraSettings, bool) {
        let created = !self.cameras.contains_key(&id);
        (self.cameras.entry(id).or_default(), created)
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = CameraId> + '_ {
        self.cameras.keys().copied()
    }

    pub(crate) fn cameras_mut(
        &mut self,
    ) -> impl Iterator<Item = (CameraId, &mut CameraSettings)> + '_ {
        self.cameras.iter_mut().map(|(id, cam)| (*id, cam))
    }

    pub(crate) fn active(&self) -> Option<CameraId> {
        self.active
    }

    pub(crate) fn set_active(&mut self, id: CameraId) -> bool {
        if self.active != Some(id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Record that the device announced this id in the current session
    pub(crate) fn mark_seen(&mut self, id: CameraId) {
        self.seen.insert(id);
    }

    /// Open a connected session, dropping graphs absent from the last
    /// completed roster
    pub(crate) fn begin_session(&mut self) -> bool {
        let mut changed = false;
        if self.roster_known {
            let roster = std::mem::take(&mut self.seen);
            let before = self.cameras.len();
            self.cameras.retain(|id, _| roster.contains(id));
            changed = self.cameras.len() != before;
            if let Some(active) = self.active {
                if !self.cameras.contains_key(&active) {
                    self.active = None;
                    changed = true;
                }
            }
        }
        self.seen.clear();
        self.accumulating.clear();
        changed
    }

    /// Close the session at disconnect; `seen` becomes the next roster
    pub(crate) fn end_session(&mut self) {
        self.roster_known = true;
        self.accumulating.clear();
    }

    /// Drop everything, for a forgotten device
    pub(crate) fn forget(&mut self) -> bool {
        let changed = !self.cameras.is_empty() || self.active.is_some();
        self.cameras.clear();
        self.accumulating.clear();
        self.seen.clear();
        self.roster_known = false;
        self.active = None;
        changed
    }

    /// Feed one capability-list event into the accumulator
    ///
    /// Returns the completed list when the last event of the sequence
    /// arrives, `None` while accumulation continues.
    pub(crate) fn accumulate(
        &mut self,
        camera: CameraId,
        data: CapabilityData,
        flags: ListFlags,
    ) -> Option<CapabilityData> {
        let key = (camera, data.dimension());
        if flags.empty {
            // An empty list is always self-contained
            self.accumulating.remove(&key);
            return Some(data);
        }
        if flags.first {
            self.accumulating.insert(key, data);
        } else {
            match self.accumulating.get_mut(&key) {
                Some(acc) => {
                    if !acc.merge(data) {
                        tracing::warn!(camera = %camera, "Capability item variant mismatch, dropped");
                    }
                }
                None => {
                    // Missing FIRST: tolerate by opening a fresh list
                    self.accumulating.insert(key, data);
                }
            }
        }
        if flags.last {
            self.accumulating.remove(&key)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylink_channel::values::Style;

    #[test]
    fn test_multi_event_accumulation() {
        let mut router = CameraRouter::default();
        let cam = CameraId(0);
        assert!(router
            .accumulate(
                cam,
                CapabilityData::Styles(vec![Style::Standard]),
                ListFlags::opening(),
            )
            .is_none());
        assert!(router
            .accumulate(
                cam,
                CapabilityData::Styles(vec![Style::Plog]),
                ListFlags::middle(),
            )
            .is_none());
        let full = router.accumulate(
            cam,
            CapabilityData::Styles(vec![Style::Intense]),
            ListFlags::closing(),
        );
        assert_eq!(
            full,
            Some(CapabilityData::Styles(vec![
                Style::Standard,
                Style::Plog,
                Style::Intense,
            ]))
        );
    }

    #[test]
    fn test_accumulations_are_per_camera() {
        let mut router = CameraRouter::default();
        router.accumulate(
            CameraId(0),
            CapabilityData::Styles(vec![Style::Standard]),
            ListFlags::opening(),
        );
        // A complete list for another camera does not disturb camera 0
        let other = router.accumulate(
            CameraId(1),
            CapabilityData::Styles(vec![Style::Plog]),
            ListFlags::single(),
        );
        assert_eq!(other, Some(CapabilityData::Styles(vec![Style::Plog])));
        let full = router.accumulate(
            CameraId(0),
            CapabilityData::Styles(vec![Style::Intense]),
            ListFlags::closing(),
        );
        assert_eq!(
            full,
            Some(CapabilityData::Styles(vec![Style::Standard, Style::Intense]))
        );
    }

    #[test]
    fn test_empty_list_is_self_contained() {
        let mut router = CameraRouter::default();
        let full = router.accumulate(
            CameraId(0),
            CapabilityData::Styles(vec![]),
            ListFlags::empty(),
        );
        assert_eq!(full, Some(CapabilityData::Styles(vec![])));
    }

    #[test]
    fn test_restart_replaces_partial_accumulation() {
        let mut router = CameraRouter::default();
        let cam = CameraId(0);
        router.accumulate(
            cam,
            CapabilityData::Styles(vec![Style::Standard]),
            ListFlags::opening(),
        );
        // A new FIRST discards the stale partial list
        router.accumulate(
            cam,
            CapabilityData::Styles(vec![Style::Pastel]),
            ListFlags::opening(),
        );
        let full = router.accumulate(
            cam,
            CapabilityData::Styles(vec![Style::Plog]),
            ListFlags::closing(),
        );
        assert_eq!(
            full,
            Some(CapabilityData::Styles(vec![Style::Pastel, Style::Plog]))
        );
    }

    #[test]
    fn test_unseen_cameras_dropped_at_next_connect() {
        let mut router = CameraRouter::default();
        router.ensure(CameraId(0));
        router.ensure(CameraId(1));
        router.mark_seen(CameraId(0));
        router.mark_seen(CameraId(1));
        router.end_session();

        // Next session only announces camera 0
        router.begin_session();
        router.mark_seen(CameraId(0));
        router.end_session();

        assert!(router.begin_session());
        assert!(router.camera(CameraId(0)).is_some());
        assert!(router.camera(CameraId(1)).is_none());
    }

    #[test]
    fn test_first_connect_drops_nothing() {
        let mut router = CameraRouter::default();
        router.ensure(CameraId(0));
        assert!(!router.begin_session());
        assert!(router.camera(CameraId(0)).is_some());
    }

    #[test]
    fn test_forget_clears_everything() {
        let mut router = CameraRouter::default();
        router.ensure(CameraId(0));
        router.set_active(CameraId(0));
        assert!(router.forget());
        assert!(router.camera(CameraId(0)).is_none());
        assert_eq!(router.active(), None);
        assert!(!router.forget());
    }
}
