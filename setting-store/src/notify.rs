//! Transaction-batched change notification
//!
//! Every engine entry point (one inbound report, one API call, one
//! connection transition) opens a `Transaction`. Field mutations performed
//! while the transaction is open mark it dirty; when the transaction ends,
//! at most one `ChangeEvent` is emitted. An inert transaction (nothing
//! observable changed) emits nothing, unless it was explicitly forced -
//! disconnects are observable even when no value moved.

use std::sync::{mpsc, Arc, Mutex};

use crate::event::{ChangeEvent, ChangeOrigin};
use crate::iter::ChangeIterator;

/// Per-device change notifier with a single subscription stream
///
/// # Example
///
/// ```rust
/// use setting_store::{ChangeNotifier, ChangeOrigin};
///
/// let notifier = ChangeNotifier::<u8>::new();
///
/// let mut txn = notifier.begin(ChangeOrigin::Api);
/// txn.set_instance(0);
/// txn.mark_if(true);
/// txn.mark_if(true); // many field writes, still one event
/// txn.end();
///
/// let changes = notifier.changes();
/// assert!(changes.try_recv().is_some());
/// assert!(changes.try_recv().is_none());
/// ```
pub struct ChangeNotifier<Id> {
    tx: mpsc::Sender<ChangeEvent<Id>>,
    rx: Arc<Mutex<mpsc::Receiver<ChangeEvent<Id>>>>,
}

impl<Id: Clone> ChangeNotifier<Id> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Open a transaction for one entry point
    pub fn begin(&self, origin: ChangeOrigin) -> Transaction<'_, Id> {
        Transaction {
            notifier: self,
            origin,
            instance: None,
            dirty: false,
            forced: false,
        }
    }

    /// Subscribe to the per-transaction change stream
    pub fn changes(&self) -> ChangeIterator<Id> {
        ChangeIterator::new(Arc::clone(&self.rx))
    }

    fn emit(&self, event: ChangeEvent<Id>) {
        // A disconnected observer is not an error
        let _ = self.tx.send(event);
    }
}

impl<Id: Clone> Default for ChangeNotifier<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Clone> Clone for ChangeNotifier<Id> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: Arc::clone(&self.rx),
        }
    }
}

/// An open transaction accumulating mutations from one entry point
///
/// Ends either explicitly through `end()` or implicitly on drop; both
/// flush at most one event.
pub struct Transaction<'a, Id: Clone> {
    notifier: &'a ChangeNotifier<Id>,
    origin: ChangeOrigin,
    instance: Option<Id>,
    dirty: bool,
    forced: bool,
}

impl<'a, Id: Clone> Transaction<'a, Id> {
    /// Scope the eventual notification to one instance
    pub fn set_instance(&mut self, instance: Id) {
        self.instance = Some(instance);
    }

    /// Record that an observable field changed
    pub fn mark(&mut self) {
        self.dirty = true;
    }

    /// Record a mutation outcome; `true` marks the transaction dirty
    pub fn mark_if(&mut self, changed: bool) {
        self.dirty |= changed;
    }

    /// Force a notification even if no observable field changed
    ///
    /// Used for the disconnect transition, which is itself observable.
    pub fn force(&mut self) {
        self.forced = true;
    }

    /// Whether anything observable has happened so far
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.forced
    }

    /// Close the transaction, flushing at most one event
    pub fn end(self) {
        // Flush happens in Drop
    }
}

impl<'a, Id: Clone> Drop for Transaction<'a, Id> {
    fn drop(&mut self) {
        if self.dirty || self.forced {
            self.notifier
                .emit(ChangeEvent::new(self.instance.take(), self.origin));
        }
    }
}
