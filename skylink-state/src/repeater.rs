//! Non-acknowledged zoom control repetition
//!
//! Zoom targets travel on a non-acknowledged channel, so the engine keeps
//! resending the latest target on every control loop tick. Level targets
//! and the velocity stop order are resent a bounded number of times; a
//! nonzero velocity is resent for as long as it stays the latest target.

use skylink_channel::values::ZoomControlMode;
use skylink_channel::Command;

/// Resend cap for level targets and the zero-velocity stop order
const MAX_REPEATED_SENT: u32 = 10;

/// Tolerance when matching a reported level against the requested target
const LEVEL_TOLERANCE: f64 = 1e-6;

/// Repeats the latest zoom target until reached or superseded
#[derive(Debug, Default)]
pub(crate) struct ZoomRepeater {
    current: Option<(ZoomControlMode, f64)>,
    sent_count: u32,
}

impl ZoomRepeater {
    /// Take a new control target, returning the command to send now
    ///
    /// The new target supersedes any previous one and restarts the resend
    /// budget.
    pub(crate) fn control(&mut self, mode: ZoomControlMode, target: f64) -> Command {
        self.current = Some((mode, target));
        self.sent_count = 1;
        Command::SetZoomTarget { mode, target }
    }

    /// One control loop tick: the command to resend, if the budget allows
    pub(crate) fn tick(&mut self) -> Option<Command> {
        let (mode, target) = self.current?;
        if Self::is_bounded(mode, target) {
            if self.sent_count >= MAX_REPEATED_SENT {
                return None;
            }
            self.sent_count += 1;
        }
        Some(Command::SetZoomTarget { mode, target })
    }

    /// Absorb a reported zoom level; a reached level target stops the resend
    pub(crate) fn notify_level(&mut self, level: f64) {
        if let Some((ZoomControlMode::Level, target)) = self.current {
            if (level - target).abs() <= LEVEL_TOLERANCE {
                self.current = None;
            }
        }
    }

    /// Drop the current target, on disconnect
    pub(crate) fn clear(&mut self) {
        self.current = None;
        self.sent_count = 0;
    }

    // A nonzero velocity must keep flowing until the caller orders a stop;
    // only level targets and the stop order itself have a resend cap.
    fn is_bounded(mode: ZoomControlMode, target: f64) -> bool {
        mode == ZoomControlMode::Level || target == 0.0
    }
}
