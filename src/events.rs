//! Selection output channel.
//!
//! The widget reports selection changes to its parent over an unbounded
//! channel. Emission is fire-and-forget: a dropped receiver is logged and
//! otherwise ignored, the widget keeps working.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;

use crate::item::SelectEntry;

/// Event emitted to the parent whenever the selection changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// An entry was picked from the dropdown.
    Selected(SelectEntry),
    /// The selection was explicitly cleared.
    ///
    /// This is a deliberate "nothing selected" signal, distinct from no
    /// event having fired at all.
    Cleared,
}

/// Handle for installing an output sender into a `Select`.
///
/// All clones of a widget share the same slot, so the sender can be installed
/// after construction.
#[derive(Debug, Clone, Default)]
pub(crate) struct OutputHandle {
    inner: Arc<Mutex<Option<UnboundedSender<SelectionEvent>>>>,
}

impl OutputHandle {
    pub(crate) fn install(&self, sender: UnboundedSender<SelectionEvent>) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(sender);
        }
    }

    /// Emit an event if a sender is installed.
    pub(crate) fn send(&self, event: SelectionEvent) {
        if let Ok(guard) = self.inner.lock()
            && let Some(sender) = guard.as_ref()
            && sender.send(event).is_err()
        {
            log::debug!("selection output receiver dropped, event discarded");
        }
    }
}
