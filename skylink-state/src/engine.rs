//! The setting synchronization engine
//!
//! Single-threaded core: every entry point (one inbound report, one API
//! call, one connection transition, one control loop tick) runs to
//! completion and opens exactly one notification transaction. Commands go
//! out through the `CommandSender`; send failures are logged and never
//! surfaced, since confirmation only ever arrives as a report anyway.

use std::sync::Arc;

use setting_store::{Assign, ChangeIterator, ChangeNotifier, ChangeOrigin};
use skylink_channel::values::{
    AutoRecord, BracketingValue, BurstValue, EvCompensation, ExposureLockMode, ExposureMode,
    Framerate, Hdr, HyperlapseRatio, IsoSensitivity, PhotoMode, RecordingMode, Resolution,
    ShutterSpeed, Style, Temperature, WhiteBalanceMode, ZoomControlMode,
};
use skylink_channel::{
    CameraId, CapabilityData, Command, CommandSender, ConnectionEvent, ListFlags, Report,
};

use crate::camera::CameraSettings;
use crate::error::{Result, StateError};
use crate::router::CameraRouter;

/// Owns the setting graphs of one drone and drives them from reports,
/// API calls and connection transitions
pub struct SettingEngine {
    router: CameraRouter,
    notifier: ChangeNotifier<CameraId>,
    channel: Arc<dyn CommandSender>,
    connected: bool,
}

impl SettingEngine {
    pub fn new(channel: Arc<dyn CommandSender>) -> Self {
        Self {
            router: CameraRouter::default(),
            notifier: ChangeNotifier::new(),
            channel,
            connected: false,
        }
    }

    /// Subscribe to the per-transaction change stream
    pub fn changes(&self) -> ChangeIterator<CameraId> {
        self.notifier.changes()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The setting graph of one camera, if the device announced it
    pub fn camera(&self, id: CameraId) -> Option<&CameraSettings> {
        self.router.camera(id)
    }

    /// Ids of all known cameras
    pub fn camera_ids(&self) -> Vec<CameraId> {
        self.router.ids().collect()
    }

    /// The drone's currently active camera, if reported
    pub fn active_camera(&self) -> Option<CameraId> {
        self.router.active()
    }

    // ========================================================================
    // Connection lifecycle
    // ========================================================================

    pub fn connection_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => self.on_connect(),
            ConnectionEvent::Disconnected => self.on_disconnect(),
            ConnectionEvent::Forgotten => self.on_forget(),
        }
    }

    fn on_connect(&mut self) {
        tracing::info!("Channel connected, starting reconciliation");
        self.connected = true;
        let mut txn = self.notifier.begin(ChangeOrigin::Connection);
        txn.mark_if(self.router.begin_session());
        for (_, camera) in self.router.cameras_mut() {
            camera.begin_reconcile();
        }
    }

    fn on_disconnect(&mut self) {
        tracing::info!("Channel disconnected, rolling back in-flight requests");
        self.connected = false;
        let mut txn = self.notifier.begin(ChangeOrigin::Connection);
        // The transition itself is observable
        txn.force();
        for (_, camera) in self.router.cameras_mut() {
            txn.mark_if(camera.rollback());
        }
        self.router.end_session();
    }

    fn on_forget(&mut self) {
        tracing::info!("Device forgotten, dropping all local state");
        self.connected = false;
        let mut txn = self.notifier.begin(ChangeOrigin::Connection);
        txn.force();
        txn.mark_if(self.router.forget());
    }

    // ========================================================================
    // Inbound reports
    // ========================================================================

    /// Feed one capability-list event, addressed to one camera
    ///
    /// Incomplete lists only accumulate; the camera's graph is created and
    /// updated when the list completes.
    pub fn handle_capability(&mut self, camera: CameraId, data: CapabilityData, flags: ListFlags) {
        self.router.mark_seen(camera);
        let Some(full) = self.router.accumulate(camera, data, flags) else {
            return;
        };
        let mut txn = self.notifier.begin(ChangeOrigin::Report);
        txn.set_instance(camera);
        let (cam, created) = self.router.ensure(camera);
        if created {
            tracing::debug!(camera = %camera, "New camera instance");
            txn.mark();
        }
        let changed = match full {
            CapabilityData::ExposureModes(values) => cam.exposure_mode.apply_capability(values),
            CapabilityData::ShutterSpeeds(values) => cam.shutter_speed.apply_capability(values),
            CapabilityData::IsoSensitivities(values) => {
                cam.iso_sensitivity.apply_capability(values)
            }
            CapabilityData::EvCompensations(values) => cam.ev_compensation.apply_capability(values),
            CapabilityData::ExposureLockModes(values) => cam.exposure_lock.apply_capability(values),
            CapabilityData::WhiteBalanceModes(values) => {
                cam.white_balance_mode.apply_capability(values)
            }
            CapabilityData::Temperatures(values) => {
                cam.white_balance_temperature.apply_capability(values)
            }
            CapabilityData::Styles(values) => cam.style.apply_capability(values),
            CapabilityData::HdrModes(values) => cam.hdr.apply_capability(values),
            CapabilityData::AutoRecordModes(values) => cam.auto_record.apply_capability(values),
            CapabilityData::Recording(entries) => cam.recording.apply_capability(entries),
            CapabilityData::Photo(entries) => cam.photo.apply_capability(entries),
        };
        txn.mark_if(changed);
        txn.mark_if(cam.refresh_availability());
    }

    /// Feed one current-value report, addressed to one camera
    ///
    /// Reports for cameras the device never announced are dropped. The
    /// first report per dimension after a reconnect goes through the
    /// reconciliation path and may replay an offline edit.
    pub fn handle_report(&mut self, camera: CameraId, report: Report) {
        if let Report::Active = report {
            if self.router.camera(camera).is_none() {
                tracing::debug!(camera = %camera, "Report for unknown camera dropped");
                return;
            }
            let mut txn = self.notifier.begin(ChangeOrigin::Report);
            txn.set_instance(camera);
            txn.mark_if(self.router.set_active(camera));
            return;
        }

        let Some(cam) = self.router.camera_mut(camera) else {
            tracing::debug!(camera = %camera, "Report for unknown camera dropped");
            return;
        };
        let mut txn = self.notifier.begin(ChangeOrigin::Report);
        txn.set_instance(camera);
        let mut replay: Option<Command> = None;
        match report {
            Report::ExposureMode(value) => {
                let (cmd, changed) = cam.exposure_mode.reconcile_report(value);
                replay = cmd.map(Command::SetExposureMode);
                txn.mark_if(changed);
            }
            Report::ShutterSpeed(value) => {
                let (cmd, changed) = cam.shutter_speed.reconcile_report(value);
                replay = cmd.map(Command::SetShutterSpeed);
                txn.mark_if(changed);
            }
            Report::IsoSensitivity(value) => {
                let (cmd, changed) = cam.iso_sensitivity.reconcile_report(value);
                replay = cmd.map(Command::SetIsoSensitivity);
                txn.mark_if(changed);
            }
            Report::EvCompensation(value) => {
                let (cmd, changed) = cam.ev_compensation.reconcile_report(value);
                replay = cmd.map(Command::SetEvCompensation);
                txn.mark_if(changed);
            }
            Report::ExposureLock(value) => {
                // Connection-only, never reconciled
                txn.mark_if(cam.exposure_lock.apply_report(value));
            }
            Report::WhiteBalanceMode(value) => {
                let (cmd, changed) = cam.white_balance_mode.reconcile_report(value);
                replay = cmd.map(Command::SetWhiteBalanceMode);
                txn.mark_if(changed);
            }
            Report::WhiteBalanceTemperature(value) => {
                let (cmd, changed) = cam.white_balance_temperature.reconcile_report(value);
                replay = cmd.map(Command::SetWhiteBalanceTemperature);
                txn.mark_if(changed);
            }
            Report::Style(value) => {
                let (cmd, changed) = cam.style.reconcile_report(value);
                replay = cmd.map(Command::SetStyle);
                txn.mark_if(changed);
            }
            Report::Hdr(value) => {
                let (cmd, changed) = cam.hdr.reconcile_report(value);
                replay = cmd.map(Command::SetHdr);
                txn.mark_if(changed);
            }
            Report::AutoRecord(value) => {
                let (cmd, changed) = cam.auto_record.reconcile_report(value);
                replay = cmd.map(Command::SetAutoRecord);
                txn.mark_if(changed);
            }
            Report::Recording(config) => {
                let (cmd, changed) = cam.recording.reconcile_report(config);
                replay = cmd.map(Command::SetRecording);
                txn.mark_if(changed);
            }
            Report::Photo(config) => {
                let (cmd, changed) = cam.photo.reconcile_report(config);
                replay = cmd.map(Command::SetPhoto);
                txn.mark_if(changed);
            }
            Report::ZoomLevel(level) => {
                cam.zoom.notify_level(level);
                txn.mark_if(cam.set_zoom_level(level));
            }
            Report::Active => unreachable!("handled above"),
        }
        txn.mark_if(cam.refresh_availability());
        drop(txn);
        if let Some(command) = replay {
            tracing::debug!(camera = %camera, "Replaying offline edit");
            dispatch(self.channel.as_ref(), camera, command);
        }
    }

    // ========================================================================
    // Setting mutation
    // ========================================================================

    pub fn set_exposure_mode(&mut self, camera: CameraId, mode: ExposureMode) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.exposure_mode.assign(mode, connected),
                Command::SetExposureMode,
            )
        })
    }

    pub fn set_shutter_speed(&mut self, camera: CameraId, speed: ShutterSpeed) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.shutter_speed.assign(speed, connected),
                Command::SetShutterSpeed,
            )
        })
    }

    pub fn set_iso_sensitivity(&mut self, camera: CameraId, iso: IsoSensitivity) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.iso_sensitivity.assign(iso, connected),
                Command::SetIsoSensitivity,
            )
        })
    }

    pub fn set_ev_compensation(&mut self, camera: CameraId, ev: EvCompensation) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.ev_compensation.assign(ev, connected),
                Command::SetEvCompensation,
            )
        })
    }

    pub fn lock_exposure(&mut self, camera: CameraId) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.exposure_lock.assign(ExposureLockMode::Locked, connected),
                |_| Command::LockExposure,
            )
        })
    }

    pub fn unlock_exposure(&mut self, camera: CameraId) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.exposure_lock
                    .assign(ExposureLockMode::Unlocked, connected),
                |_| Command::UnlockExposure,
            )
        })
    }

    pub fn set_white_balance_mode(&mut self, camera: CameraId, mode: WhiteBalanceMode) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.white_balance_mode.assign(mode, connected),
                Command::SetWhiteBalanceMode,
            )
        })
    }

    pub fn set_white_balance_temperature(
        &mut self,
        camera: CameraId,
        temperature: Temperature,
    ) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.white_balance_temperature.assign(temperature, connected),
                Command::SetWhiteBalanceTemperature,
            )
        })
    }

    pub fn set_style(&mut self, camera: CameraId, style: Style) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(cam.style.assign(style, connected), Command::SetStyle)
        })
    }

    pub fn set_hdr(&mut self, camera: CameraId, hdr: Hdr) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(cam.hdr.assign(hdr, connected), Command::SetHdr)
        })
    }

    pub fn set_auto_record(&mut self, camera: CameraId, auto_record: AutoRecord) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.auto_record.assign(auto_record, connected),
                Command::SetAutoRecord,
            )
        })
    }

    pub fn set_recording_mode(&mut self, camera: CameraId, mode: RecordingMode) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(cam.recording.set_mode(mode, connected), Command::SetRecording)
        })
    }

    pub fn set_recording_resolution(
        &mut self,
        camera: CameraId,
        resolution: Resolution,
    ) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.recording.set_resolution(resolution, connected),
                Command::SetRecording,
            )
        })
    }

    pub fn set_recording_framerate(&mut self, camera: CameraId, framerate: Framerate) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.recording.set_framerate(framerate, connected),
                Command::SetRecording,
            )
        })
    }

    pub fn set_hyperlapse_ratio(&mut self, camera: CameraId, ratio: HyperlapseRatio) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.recording.set_hyperlapse_ratio(ratio, connected),
                Command::SetRecording,
            )
        })
    }

    pub fn set_photo_mode(&mut self, camera: CameraId, mode: PhotoMode) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(cam.photo.set_mode(mode, connected), Command::SetPhoto)
        })
    }

    pub fn set_burst_value(&mut self, camera: CameraId, burst: BurstValue) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(cam.photo.set_burst(burst, connected), Command::SetPhoto)
        })
    }

    pub fn set_bracketing_value(
        &mut self,
        camera: CameraId,
        bracketing: BracketingValue,
    ) -> Result<()> {
        self.mutate(camera, |cam, connected| {
            command_for(
                cam.photo.set_bracketing(bracketing, connected),
                Command::SetPhoto,
            )
        })
    }

    // ========================================================================
    // Zoom control
    // ========================================================================

    /// Take a new zoom target and send it immediately
    ///
    /// Non-acknowledged: nothing goes pending and no change event is
    /// emitted. The target keeps being resent on `tick` until reached,
    /// superseded or capped.
    pub fn control_zoom(
        &mut self,
        camera: CameraId,
        mode: ZoomControlMode,
        target: f64,
    ) -> Result<()> {
        let cam = self
            .router
            .camera_mut(camera)
            .ok_or(StateError::UnknownCamera(camera))?;
        if !self.connected {
            tracing::debug!(camera = %camera, "Zoom control while disconnected, dropped");
            return Ok(());
        }
        let command = cam.zoom.control(mode, target);
        dispatch(self.channel.as_ref(), camera, command);
        Ok(())
    }

    /// One control loop tick: resend outstanding zoom targets
    pub fn tick(&mut self) {
        if !self.connected {
            return;
        }
        for (id, camera) in self.router.cameras_mut() {
            if let Some(command) = camera.zoom.tick() {
                dispatch(self.channel.as_ref(), id, command);
            }
        }
    }

    fn mutate<F>(&mut self, camera: CameraId, f: F) -> Result<()>
    where
        F: FnOnce(&mut CameraSettings, bool) -> (Option<Command>, bool),
    {
        let connected = self.connected;
        let mut txn = self.notifier.begin(ChangeOrigin::Api);
        txn.set_instance(camera);
        let cam = self
            .router
            .camera_mut(camera)
            .ok_or(StateError::UnknownCamera(camera))?;
        let (command, changed) = f(cam, connected);
        txn.mark_if(changed);
        txn.mark_if(cam.refresh_availability());
        drop(txn);
        if let Some(command) = command {
            dispatch(self.channel.as_ref(), camera, command);
        }
        Ok(())
    }
}

/// Map an assignment outcome to the command to send and the dirty flag
fn command_for<T>(
    outcome: Assign<T>,
    make: impl FnOnce(T) -> Command,
) -> (Option<Command>, bool) {
    match outcome {
        Assign::Send(value) => (Some(make(value)), true),
        Assign::Stored => (None, true),
        Assign::Unchanged | Assign::Rejected => (None, false),
    }
}

fn dispatch(channel: &dyn CommandSender, camera: CameraId, command: Command) {
    tracing::debug!(camera = %camera, command = ?command, "Sending command");
    if let Err(err) = channel.send(camera, command) {
        tracing::warn!(camera = %camera, error = %err, "Command send failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylink_channel::MockChannel;

    fn engine() -> (SettingEngine, MockChannel) {
        let channel = MockChannel::default();
        let engine = SettingEngine::new(Arc::new(channel.clone()));
        (engine, channel)
    }

    fn announce_exposure(engine: &mut SettingEngine, camera: CameraId) {
        engine.handle_capability(
            camera,
            CapabilityData::ExposureModes(vec![ExposureMode::Automatic, ExposureMode::Manual]),
            ListFlags::single(),
        );
    }

    #[test]
    fn test_mutation_on_unknown_camera_errors() {
        let (mut engine, _) = engine();
        let err = engine
            .set_exposure_mode(CameraId(5), ExposureMode::Manual)
            .unwrap_err();
        assert!(matches!(err, StateError::UnknownCamera(CameraId(5))));
    }

    #[test]
    fn test_report_for_unknown_camera_is_dropped() {
        let (mut engine, _) = engine();
        engine.handle_report(CameraId(5), Report::Style(Style::Plog));
        assert!(engine.camera(CameraId(5)).is_none());
        assert!(engine.changes().try_recv().is_none());
    }

    #[test]
    fn test_capability_report_creates_instance() {
        let (mut engine, _) = engine();
        announce_exposure(&mut engine, CameraId(0));
        assert!(engine.camera(CameraId(0)).is_some());
        let event = engine.changes().try_recv();
        assert!(event.is_some());
    }

    #[test]
    fn test_connected_mutation_sends_command() {
        let (mut engine, channel) = engine();
        engine.connection_event(ConnectionEvent::Connected);
        announce_exposure(&mut engine, CameraId(0));
        engine
            .set_exposure_mode(CameraId(0), ExposureMode::Manual)
            .unwrap();
        assert_eq!(
            channel.sent_to(CameraId(0)),
            vec![Command::SetExposureMode(ExposureMode::Manual)]
        );
        let cam = engine.camera(CameraId(0)).unwrap();
        assert!(cam.exposure_mode.updating());
    }

    #[test]
    fn test_invalid_mutation_sends_nothing_and_stays_silent() {
        let (mut engine, channel) = engine();
        engine.connection_event(ConnectionEvent::Connected);
        announce_exposure(&mut engine, CameraId(0));
        let changes = engine.changes();
        while changes.try_recv().is_some() {}
        engine
            .set_exposure_mode(CameraId(0), ExposureMode::ManualShutterSpeed)
            .unwrap();
        assert!(channel.sent().is_empty());
        assert!(changes.try_recv().is_none());
    }

    #[test]
    fn test_active_camera_tracking() {
        let (mut engine, _) = engine();
        announce_exposure(&mut engine, CameraId(0));
        announce_exposure(&mut engine, CameraId(1));
        engine.handle_report(CameraId(1), Report::Active);
        assert_eq!(engine.active_camera(), Some(CameraId(1)));
        // The inactive camera still accepts mutations
        engine.connection_event(ConnectionEvent::Connected);
        assert!(engine
            .set_exposure_mode(CameraId(0), ExposureMode::Manual)
            .is_ok());
    }

    #[test]
    fn test_zoom_control_sends_immediately() {
        let (mut engine, channel) = engine();
        engine.connection_event(ConnectionEvent::Connected);
        announce_exposure(&mut engine, CameraId(0));
        engine
            .control_zoom(CameraId(0), ZoomControlMode::Velocity, 0.5)
            .unwrap();
        assert_eq!(
            channel.sent_to(CameraId(0)),
            vec![Command::SetZoomTarget {
                mode: ZoomControlMode::Velocity,
                target: 0.5,
            }]
        );
    }

    #[test]
    fn test_tick_resends_zoom_target() {
        let (mut engine, channel) = engine();
        engine.connection_event(ConnectionEvent::Connected);
        announce_exposure(&mut engine, CameraId(0));
        engine
            .control_zoom(CameraId(0), ZoomControlMode::Level, 2.0)
            .unwrap();
        channel.take_sent();
        engine.tick();
        assert_eq!(channel.sent_to(CameraId(0)).len(), 1);
        // A matching level report stops the resend
        engine.handle_report(CameraId(0), Report::ZoomLevel(2.0));
        channel.take_sent();
        engine.tick();
        assert!(channel.sent().is_empty());
    }
}
