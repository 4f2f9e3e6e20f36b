//! Generic Device-Setting Synchronization Library
//!
//! Type-safe primitives for keeping remote-device parameters synchronized
//! over an asynchronous, sometimes-disconnected command/report channel.
//!
//! # Features
//!
//! - **Capability-gated domains**: every setting validates against an
//!   ordered, wholesale-replaced `CapabilitySet`
//! - **Optimistic mutation**: assignments go pending until the device
//!   confirms, or become local truth while disconnected
//! - **Reconnect reconciliation**: offline edits replay exactly once
//! - **Batched notification**: one change event per logical transaction,
//!   consumed via blocking iterators
//!
//! # Quick Start
//!
//! ```rust
//! use setting_store::{Assign, Setting, SettingValue};
//!
//! #[derive(Clone, Copy, PartialEq, Debug)]
//! enum Antiflicker { Off, Hz50, Hz60 }
//!
//! impl SettingValue for Antiflicker {
//!     const KEY: &'static str = "antiflicker";
//! }
//!
//! let mut setting = Setting::new(Antiflicker::Off);
//! setting.apply_capability(vec![Antiflicker::Off, Antiflicker::Hz50]);
//!
//! match setting.assign(Antiflicker::Hz50, true) {
//!     Assign::Send(_value) => { /* emit the set command */ }
//!     _ => unreachable!(),
//! }
//! assert!(setting.updating());
//!
//! // The device report commits the request
//! setting.apply_report(Antiflicker::Hz50);
//! assert!(!setting.updating());
//! ```
//!
//! # Architecture
//!
//! ```text
//! Setting<T>
//!     ├── confirmed: T                (device truth / offline local truth)
//!     ├── pending: Option<T>          (awaiting confirmation)
//!     ├── capability: CapabilitySet<T> (ordered, wholesale-replaced)
//!     └── reconciliation latches      (replay-once, offline-dirty)
//!
//! ChangeNotifier<Id>
//!     └── Transaction ── one ChangeEvent per flush ──> ChangeIterator<Id>
//! ```

// Modules
pub mod capability;
pub mod event;
pub mod iter;
pub mod notify;
pub mod setting;
pub mod value;

// Re-exports - Public API
pub use capability::CapabilitySet;
pub use event::{ChangeEvent, ChangeOrigin};
pub use iter::{ChangeIterator, TimeoutIter, TryIter};
pub use notify::{ChangeNotifier, Transaction};
pub use setting::{Assign, Setting, SyncState};
pub use value::SettingValue;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::capability::CapabilitySet;
    pub use crate::event::{ChangeEvent, ChangeOrigin};
    pub use crate::iter::ChangeIterator;
    pub use crate::notify::{ChangeNotifier, Transaction};
    pub use crate::setting::{Assign, Setting, SyncState};
    pub use crate::value::SettingValue;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Mode {
        A,
        B,
        C,
    }

    impl SettingValue for Mode {
        const KEY: &'static str = "mode";
    }

    #[test]
    fn test_full_lifecycle() {
        let notifier = ChangeNotifier::<u8>::new();
        let mut setting = Setting::new(Mode::A);

        // Capability report
        let mut txn = notifier.begin(ChangeOrigin::Report);
        txn.mark_if(setting.apply_capability(vec![Mode::A, Mode::B]));
        txn.end();
        assert!(notifier.changes().try_recv().is_some());

        // User assignment, device confirmation
        let mut txn = notifier.begin(ChangeOrigin::Api);
        match setting.assign(Mode::B, true) {
            Assign::Send(_) => txn.mark(),
            _ => panic!("expected send"),
        }
        txn.end();
        assert!(setting.updating());

        let mut txn = notifier.begin(ChangeOrigin::Report);
        txn.mark_if(setting.apply_report(Mode::B));
        txn.end();
        assert!(!setting.updating());
        assert_eq!(*setting.value(), Mode::B);

        // Exactly two more events were emitted
        let changes = notifier.changes();
        assert!(changes.try_recv().is_some());
        assert!(changes.try_recv().is_some());
        assert!(changes.try_recv().is_none());
    }

    #[test]
    fn test_rejected_assign_emits_nothing() {
        let notifier = ChangeNotifier::<u8>::new();
        let mut setting = Setting::new(Mode::A);
        setting.apply_capability(vec![Mode::A, Mode::B]);

        let mut txn = notifier.begin(ChangeOrigin::Api);
        assert_eq!(setting.assign(Mode::C, true), Assign::Rejected);
        txn.mark_if(false);
        txn.end();

        assert!(notifier.changes().try_recv().is_none());
    }
}
