//! Change events emitted once per engine transaction
//!
//! Events carry the instance the transaction touched (when it was scoped
//! to one) and what kind of entry point produced it. They deliberately do
//! not carry values: observers re-read the settings after a notification.

use std::time::Instant;

/// What kind of entry point produced a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// An inbound device report or capability report
    Report,
    /// An outbound API mutation
    Api,
    /// A connect, disconnect or forget transition
    Connection,
}

/// A change event: exactly one per transaction that touched observable state
#[derive(Debug, Clone)]
pub struct ChangeEvent<Id> {
    /// Instance the transaction was scoped to, `None` for whole-device
    /// transitions
    pub instance: Option<Id>,

    /// Entry point that produced the transaction
    pub origin: ChangeOrigin,

    /// When the transaction completed
    pub timestamp: Instant,
}

impl<Id> ChangeEvent<Id> {
    pub fn new(instance: Option<Id>, origin: ChangeOrigin) -> Self {
        Self {
            instance,
            origin,
            timestamp: Instant::now(),
        }
    }
}

impl<Id: PartialEq> PartialEq for ChangeEvent<Id> {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.instance == other.instance && self.origin == other.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_equality_ignores_timestamp() {
        let a = ChangeEvent::new(Some(1u8), ChangeOrigin::Report);
        let b = ChangeEvent::new(Some(1u8), ChangeOrigin::Report);
        let c = ChangeEvent::new(Some(2u8), ChangeOrigin::Report);
        let d = ChangeEvent::new(Some(1u8), ChangeOrigin::Api);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
