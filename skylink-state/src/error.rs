//! Error types for skylink-state

use std::fmt;

use skylink_channel::CameraId;

/// Result type for skylink-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur during setting synchronization
#[derive(Debug)]
pub enum StateError {
    /// No setting graph exists for the addressed camera
    UnknownCamera(CameraId),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::UnknownCamera(id) => write!(f, "Unknown camera: {}", id),
        }
    }
}

impl std::error::Error for StateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_camera() {
        let err = StateError::UnknownCamera(CameraId(3));
        assert_eq!(err.to_string(), "Unknown camera: camera-3");
    }
}
