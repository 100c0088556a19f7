//! lazyselect - a searchable dropdown core with on-demand paged loading.
//!
//! Two halves, one widget:
//!
//! - [`Select`] holds the search and selection state: the current search key,
//!   whether the dropdown is open, the selected entry, and the focus/blur
//!   bookkeeping around them. Selection changes are reported to the parent
//!   over a fire-and-forget channel of [`events::SelectionEvent`]s.
//! - [`source::ItemSource`] adapts a virtualization surface's "rows
//!   [start, start + count)" requests into calls against an embedder-injected
//!   [`provider::ItemsProvider`], attaching the current search key and the
//!   cancellation signal for the active fetch generation.
//!
//! Rendering, scroll-driven windowing, and focus moves are left to the
//! embedding surface; this crate only owns state and the paging contract.

pub mod events;
pub mod item;
pub mod provider;
pub mod source;
pub mod state;

pub use state::{Select, SelectId};

pub mod prelude {
    pub use crate::events::SelectionEvent;
    pub use crate::item::{SelectEntry, SelectItem};
    pub use crate::provider::{
        FnProvider, ItemsProvider, PageRequest, PageResult, ProviderError, WindowRequest,
    };
    pub use crate::source::ItemSource;
    pub use crate::state::{Select, SelectId};
}
