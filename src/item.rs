//! SelectItem trait and the SelectEntry value carried through the paging contract.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single selectable row.
///
/// Entries are immutable values produced by the items provider; identity is
/// the `id` field. The widget never mutates an entry after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectEntry {
    /// Stable identity of the entry.
    pub id: Uuid,
    /// Text shown for the entry in the dropdown and in the closed trigger.
    pub name: String,
}

impl SelectEntry {
    /// Create an entry with an explicit id.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Create an entry with a freshly generated id.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Trait for values that can be shown as rows in a `Select` dropdown.
///
/// Providers backed by domain types implement this to hand their rows to
/// [`crate::provider::PageResult::from_items`] without converting by hand.
///
/// # Example
///
/// ```ignore
/// struct Customer {
///     id: Uuid,
///     display_name: String,
/// }
///
/// impl SelectItem for Customer {
///     fn select_id(&self) -> Uuid {
///         self.id
///     }
///
///     fn select_label(&self) -> String {
///         self.display_name.clone()
///     }
/// }
/// ```
pub trait SelectItem {
    /// Unique identifier for this item.
    fn select_id(&self) -> Uuid;

    /// Display text for this item.
    fn select_label(&self) -> String;
}

impl SelectItem for SelectEntry {
    fn select_id(&self) -> Uuid {
        self.id
    }

    fn select_label(&self) -> String {
        self.name.clone()
    }
}

// Plain strings get a deterministic id derived from their content, so the
// same label always maps to the same entry identity.
impl SelectItem for String {
    fn select_id(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.as_bytes())
    }

    fn select_label(&self) -> String {
        self.clone()
    }
}

impl SelectItem for &str {
    fn select_id(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.as_bytes())
    }

    fn select_label(&self) -> String {
        (*self).to_string()
    }
}

// Implement for (id, label) tuples
impl<S> SelectItem for (Uuid, S)
where
    S: AsRef<str>,
{
    fn select_id(&self) -> Uuid {
        self.0
    }

    fn select_label(&self) -> String {
        self.1.as_ref().to_string()
    }
}

impl<I: SelectItem> From<&I> for SelectEntry {
    fn from(item: &I) -> Self {
        Self {
            id: item.select_id(),
            name: item.select_label(),
        }
    }
}
