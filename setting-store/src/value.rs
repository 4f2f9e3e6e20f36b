//! SettingValue trait for typed, synchronizable device parameters
//!
//! The SettingValue trait defines the contract for values that can live
//! inside a `Setting<T>` and be validated against a `CapabilitySet<T>`.
//!
//! # Example
//!
//! ```rust
//! use setting_store::SettingValue;
//!
//! #[derive(Clone, Copy, PartialEq, Debug)]
//! pub enum ExposureMode {
//!     Automatic,
//!     Manual,
//! }
//!
//! impl SettingValue for ExposureMode {
//!     const KEY: &'static str = "exposure_mode";
//! }
//! ```

/// Marker trait for values managed by a `Setting<T>`
///
/// Setting values must be:
/// - Clone: For copying into pending/confirmed slots
/// - Send + Sync: For thread-safe access through shared handles
/// - PartialEq: For change detection and confirmation matching
/// - 'static: So settings can be held behind trait-object facades
///
/// The KEY constant provides a human-readable identifier for logging
/// and change-event attribution.
pub trait SettingValue: Clone + Send + Sync + PartialEq + std::fmt::Debug + 'static {
    /// Unique key identifying this setting dimension
    ///
    /// Should be unique within one device's setting graph.
    ///
    /// # Examples
    ///
    /// - `"exposure_mode"` for the camera exposure mode
    /// - `"white_balance_temperature"` for the custom color temperature
    const KEY: &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum TestMode {
        A,
        B,
    }

    impl SettingValue for TestMode {
        const KEY: &'static str = "test_mode";
    }

    #[test]
    fn test_setting_value_key() {
        assert_eq!(TestMode::KEY, "test_mode");
    }

    #[test]
    fn test_setting_value_equality() {
        assert_eq!(TestMode::A, TestMode::A);
        assert_ne!(TestMode::A, TestMode::B);
    }
}
