//! Multi-camera routing, notification batching and derived availability

use std::sync::Arc;

use skylink_channel::values::{EvCompensation, ExposureMode, ShutterSpeed, Style};
use skylink_channel::{
    CameraId, CapabilityData, ConnectionEvent, ListFlags, MockChannel, Report,
};
use skylink_state::{ChangeOrigin, SettingEngine};

fn engine() -> (SettingEngine, MockChannel) {
    let channel = MockChannel::new();
    let engine = SettingEngine::new(Arc::new(channel.clone()));
    (engine, channel)
}

fn announce_exposure(engine: &mut SettingEngine, camera: CameraId) {
    engine.handle_capability(
        camera,
        CapabilityData::ExposureModes(vec![
            ExposureMode::Automatic,
            ExposureMode::ManualShutterSpeed,
        ]),
        ListFlags::single(),
    );
    engine.handle_capability(
        camera,
        CapabilityData::ShutterSpeeds(vec![ShutterSpeed::OneOver60, ShutterSpeed::OneOver30]),
        ListFlags::single(),
    );
    engine.handle_capability(
        camera,
        CapabilityData::EvCompensations(vec![
            EvCompensation::EvMinus1,
            EvCompensation::Ev0,
            EvCompensation::EvPlus1,
        ]),
        ListFlags::single(),
    );
}

#[test]
fn test_cameras_are_independent() {
    let (mut engine, _channel) = engine();
    engine.connection_event(ConnectionEvent::Connected);
    announce_exposure(&mut engine, CameraId(0));
    announce_exposure(&mut engine, CameraId(1));
    engine.handle_report(CameraId(0), Report::ExposureMode(ExposureMode::Automatic));
    engine.handle_report(CameraId(1), Report::ExposureMode(ExposureMode::Automatic));

    engine.handle_report(
        CameraId(0),
        Report::ExposureMode(ExposureMode::ManualShutterSpeed),
    );
    assert_eq!(
        *engine.camera(CameraId(0)).unwrap().exposure_mode.value(),
        ExposureMode::ManualShutterSpeed
    );
    assert_eq!(
        *engine.camera(CameraId(1)).unwrap().exposure_mode.value(),
        ExposureMode::Automatic
    );
}

#[test]
fn test_events_carry_the_camera_id() {
    let (mut engine, _channel) = engine();
    announce_exposure(&mut engine, CameraId(0));
    let changes = engine.changes();
    while changes.try_recv().is_some() {}

    engine.handle_report(CameraId(0), Report::ExposureMode(ExposureMode::ManualShutterSpeed));
    let event = changes.try_recv().unwrap();
    assert_eq!(event.instance, Some(CameraId(0)));
    assert_eq!(event.origin, ChangeOrigin::Report);
}

#[test]
fn test_one_report_emits_at_most_one_event() {
    let (mut engine, _channel) = engine();
    announce_exposure(&mut engine, CameraId(0));
    engine.handle_report(CameraId(0), Report::ExposureMode(ExposureMode::Automatic));
    let changes = engine.changes();
    while changes.try_recv().is_some() {}

    // This flips the mode, shutter speed availability and EV availability,
    // still one event
    engine.handle_report(
        CameraId(0),
        Report::ExposureMode(ExposureMode::ManualShutterSpeed),
    );
    assert!(changes.try_recv().is_some());
    assert!(changes.try_recv().is_none());
}

#[test]
fn test_availability_flips_in_the_same_transaction() {
    let (mut engine, _channel) = engine();
    engine.connection_event(ConnectionEvent::Connected);
    announce_exposure(&mut engine, CameraId(0));
    engine.handle_report(CameraId(0), Report::ExposureMode(ExposureMode::Automatic));
    let changes = engine.changes();
    while changes.try_recv().is_some() {}

    engine
        .set_exposure_mode(CameraId(0), ExposureMode::ManualShutterSpeed)
        .unwrap();
    assert!(changes.try_recv().is_some());
    assert!(changes.try_recv().is_none());

    let cam = engine.camera(CameraId(0)).unwrap();
    assert!(cam.shutter_speed.is_available());
    assert!(!cam.ev_compensation.is_available());
    assert!(cam.ev_compensation.supported().is_empty());

    // Confirm, then go back: EV compensation list is restored
    engine.handle_report(
        CameraId(0),
        Report::ExposureMode(ExposureMode::ManualShutterSpeed),
    );
    engine
        .set_exposure_mode(CameraId(0), ExposureMode::Automatic)
        .unwrap();
    let cam = engine.camera(CameraId(0)).unwrap();
    assert_eq!(
        cam.ev_compensation.supported(),
        &[
            EvCompensation::EvMinus1,
            EvCompensation::Ev0,
            EvCompensation::EvPlus1,
        ]
    );
}

#[test]
fn test_noop_mutation_emits_nothing() {
    let (mut engine, channel) = engine();
    engine.connection_event(ConnectionEvent::Connected);
    announce_exposure(&mut engine, CameraId(0));
    engine.handle_report(CameraId(0), Report::ExposureMode(ExposureMode::Automatic));
    channel.take_sent();
    let changes = engine.changes();
    while changes.try_recv().is_some() {}

    engine
        .set_exposure_mode(CameraId(0), ExposureMode::Automatic)
        .unwrap();
    assert!(channel.sent().is_empty());
    assert!(changes.try_recv().is_none());
}

#[test]
fn test_multi_event_capability_list_notifies_once_on_completion() {
    let (mut engine, _channel) = engine();
    let changes = engine.changes();

    engine.handle_capability(
        CameraId(0),
        CapabilityData::Styles(vec![Style::Standard]),
        ListFlags::opening(),
    );
    // Accumulating: no graph yet, no event yet
    assert!(engine.camera(CameraId(0)).is_none());
    assert!(changes.try_recv().is_none());

    engine.handle_capability(
        CameraId(0),
        CapabilityData::Styles(vec![Style::Plog]),
        ListFlags::closing(),
    );
    assert!(changes.try_recv().is_some());
    assert!(changes.try_recv().is_none());
    let cam = engine.camera(CameraId(0)).unwrap();
    assert_eq!(cam.style.supported(), &[Style::Standard, Style::Plog]);
}

#[test]
fn test_unannounced_camera_dropped_at_next_connect() {
    let (mut engine, _channel) = engine();
    engine.connection_event(ConnectionEvent::Connected);
    announce_exposure(&mut engine, CameraId(0));
    announce_exposure(&mut engine, CameraId(1));
    engine.connection_event(ConnectionEvent::Disconnected);

    // Both survive the disconnect
    assert!(engine.camera(CameraId(1)).is_some());

    // The next session only announces camera 0
    engine.connection_event(ConnectionEvent::Connected);
    announce_exposure(&mut engine, CameraId(0));
    engine.connection_event(ConnectionEvent::Disconnected);

    engine.connection_event(ConnectionEvent::Connected);
    assert!(engine.camera(CameraId(0)).is_some());
    assert!(engine.camera(CameraId(1)).is_none());
}

#[test]
fn test_forget_drops_all_cameras() {
    let (mut engine, _channel) = engine();
    announce_exposure(&mut engine, CameraId(0));
    engine.handle_report(CameraId(0), Report::Active);
    engine.connection_event(ConnectionEvent::Forgotten);
    assert!(engine.camera_ids().is_empty());
    assert_eq!(engine.active_camera(), None);
}
