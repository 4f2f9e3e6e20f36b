//! In-memory channel for tests
//!
//! Records every command the engine emits so tests can assert on the exact
//! command traffic, and can be switched to a closed state to exercise
//! channel failure paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::command::{ChannelError, Command, CommandSender, Result};
use crate::id::CameraId;

/// Command channel that records instead of transmitting
///
/// Clones share the same command log.
///
/// # Example
///
/// ```rust
/// use skylink_channel::{CameraId, Command, CommandSender, MockChannel};
/// use skylink_channel::values::ExposureMode;
///
/// let channel = MockChannel::new();
/// channel
///     .send(CameraId::MAIN, Command::SetExposureMode(ExposureMode::Manual))
///     .unwrap();
///
/// assert_eq!(channel.sent().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockChannel {
    sent: Arc<Mutex<Vec<(CameraId, Command)>>>,
    closed: Arc<AtomicBool>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every command sent so far
    pub fn sent(&self) -> Vec<(CameraId, Command)> {
        self.sent.lock().expect("mock channel lock").clone()
    }

    /// Drain the command log
    pub fn take_sent(&self) -> Vec<(CameraId, Command)> {
        std::mem::take(&mut *self.sent.lock().expect("mock channel lock"))
    }

    /// Commands addressed to one camera, in emission order
    pub fn sent_to(&self, camera: CameraId) -> Vec<Command> {
        self.sent
            .lock()
            .expect("mock channel lock")
            .iter()
            .filter(|(id, _)| *id == camera)
            .map(|(_, cmd)| cmd.clone())
            .collect()
    }

    /// Simulate a closed transport; subsequent sends fail
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl CommandSender for MockChannel {
    fn send(&self, camera: CameraId, command: Command) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChannelError::Closed);
        }
        self.sent
            .lock()
            .expect("mock channel lock")
            .push((camera, command));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Style;

    #[test]
    fn test_records_commands_per_camera() {
        let channel = MockChannel::new();
        channel
            .send(CameraId::new(0), Command::SetStyle(Style::Standard))
            .unwrap();
        channel
            .send(CameraId::new(1), Command::SetStyle(Style::Plog))
            .unwrap();

        assert_eq!(channel.sent().len(), 2);
        assert_eq!(
            channel.sent_to(CameraId::new(1)),
            vec![Command::SetStyle(Style::Plog)]
        );
    }

    #[test]
    fn test_closed_channel_fails() {
        let channel = MockChannel::new();
        channel.close();
        assert!(channel
            .send(CameraId::MAIN, Command::SetStyle(Style::Standard))
            .is_err());
    }

    #[test]
    fn test_clones_share_log() {
        let channel = MockChannel::new();
        let clone = channel.clone();
        clone
            .send(CameraId::MAIN, Command::SetStyle(Style::Intense))
            .unwrap();
        assert_eq!(channel.sent().len(), 1);
    }
}
