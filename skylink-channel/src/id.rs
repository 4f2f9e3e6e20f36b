//! Camera instance identifiers
//!
//! A drone can expose several cameras (main, thermal, ...) sharing one
//! command/report channel; every command and report is addressed to one
//! camera id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one camera instance within a drone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CameraId(pub u8);

impl CameraId {
    /// The main camera of most drone models
    pub const MAIN: CameraId = CameraId(0);

    pub fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera-{}", self.0)
    }
}

impl From<u8> for CameraId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CameraId::MAIN.to_string(), "camera-0");
        assert_eq!(CameraId::new(2).to_string(), "camera-2");
    }

    #[test]
    fn test_main_is_zero() {
        assert_eq!(CameraId::MAIN, CameraId::new(0));
    }
}
