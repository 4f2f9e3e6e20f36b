//! Ordered capability sets
//!
//! A `CapabilitySet<T>` holds the values the device currently accepts for
//! one dimension of one instance. The set is replaced wholesale on every
//! capability report, never merged incrementally, and the order reported
//! by the device is preserved: the first element is the deterministic
//! fallback used when a held value stops being supported.

/// The ordered value domain of a single setting dimension
///
/// # Example
///
/// ```rust
/// use setting_store::CapabilitySet;
///
/// let mut caps = CapabilitySet::empty();
/// assert!(!caps.contains(&3));
///
/// caps.replace(vec![3, 1, 2]);
/// assert!(caps.contains(&3));
/// assert_eq!(caps.first(), Some(&3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilitySet<T> {
    values: Vec<T>,
}

impl<T: PartialEq> CapabilitySet<T> {
    /// Create an empty capability set (the setting is unavailable)
    pub fn empty() -> Self {
        Self { values: Vec::new() }
    }

    /// Create a capability set from values in device-reported order
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Replace the whole set, returning whether it changed
    ///
    /// Order matters for equality: the same values in a different order
    /// count as a change, because the fallback element changes.
    pub fn replace(&mut self, values: Vec<T>) -> bool {
        if self.values != values {
            self.values = values;
            true
        } else {
            false
        }
    }

    /// Check whether a value is currently accepted by the device
    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    /// The deterministic fallback value: first element in reported order
    pub fn first(&self) -> Option<&T> {
        self.values.first()
    }

    /// Values in device-reported order
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: PartialEq> Default for CapabilitySet<T> {
    fn default() -> Self {
        Self::empty()
    }
}
