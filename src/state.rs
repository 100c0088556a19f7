//! Select widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::events::{OutputHandle, SelectionEvent};
use crate::item::SelectEntry;
use crate::provider::ItemsProvider;
use crate::source::ItemSource;

/// Unique identifier for a Select widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectId(usize);

impl SelectId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for SelectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__select_{}", self.0)
    }
}

/// Internal state for a Select widget.
#[derive(Debug, Default)]
struct SelectInner {
    /// Currently selected entry (None if nothing selected)
    selected: Option<SelectEntry>,
    /// Display name shown in the closed trigger
    selected_name: Option<String>,
    /// Placeholder text shown when nothing is selected
    placeholder: String,
    /// Element id the embedder attaches to the trigger
    element_id: Option<String>,
    /// Whether multiple entries may be picked
    multiple: bool,
}

/// A searchable dropdown backed by on-demand paged loading.
///
/// `Select` owns the search and selection state; row data is fetched lazily
/// through the [`ItemSource`] handle obtained from [`Select::source`], which
/// forwards windowed requests to the injected [`ItemsProvider`]. Rendering
/// and scroll-driven windowing belong to the embedding surface; this type
/// only holds state and shapes requests.
///
/// The handle is cheap to clone; all clones share the same state.
///
/// # Example
///
/// ```ignore
/// let select = Select::with_placeholder("Search customers...");
/// select.set_provider(CustomerDirectory::new(pool));
/// let mut selections = select.subscribe();
///
/// // surface wiring:
/// select.focus_search_input();
/// select.set_search_key("al");
/// let page = select
///     .source()
///     .fetch_page(WindowRequest::new(0, 25, select.source().active_token()))
///     .await?;
/// ```
#[derive(Debug)]
pub struct Select {
    /// Unique identifier for this select instance
    id: SelectId,
    /// Internal state
    inner: Arc<RwLock<SelectInner>>,
    /// Paged item source shared with the rendering surface
    source: ItemSource,
    /// Output channel to the parent
    output: OutputHandle,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
    /// Whether the dropdown is open
    is_open: Arc<AtomicBool>,
    /// One-shot flag that makes the next control blur a no-op
    blur_suppressed: Arc<AtomicBool>,
    /// Focus request flag (checked by the rendering surface)
    focus_requested: Arc<AtomicBool>,
}

impl Select {
    /// Create a new empty select.
    pub fn new() -> Self {
        Self {
            id: SelectId::new(),
            inner: Arc::new(RwLock::new(SelectInner::default())),
            source: ItemSource::new(),
            output: OutputHandle::default(),
            dirty: Arc::new(AtomicBool::new(false)),
            is_open: Arc::new(AtomicBool::new(false)),
            blur_suppressed: Arc::new(AtomicBool::new(false)),
            focus_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a select with a placeholder.
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        let select = Self::new();
        select.set_placeholder(placeholder);
        select.clear_dirty();
        select
    }

    /// Get the unique ID for this select.
    pub fn id(&self) -> SelectId {
        self.id
    }

    /// Get the ID as a string (for node binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Install the page-fetching backend.
    pub fn set_provider<P: ItemsProvider + 'static>(&self, provider: P) {
        self.source.set_provider(Arc::new(provider));
    }

    /// Get the item source handle for the rendering surface.
    pub fn source(&self) -> ItemSource {
        self.source.clone()
    }

    /// Check whether multiple entries may be picked.
    pub fn multiple(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.multiple)
            .unwrap_or(false)
    }

    /// Allow or disallow picking multiple entries.
    pub fn set_multiple(&self, multiple: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard.multiple != multiple
        {
            guard.multiple = multiple;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Get the element id the embedder attaches to the trigger.
    pub fn element_id(&self) -> Option<String> {
        self.inner
            .read()
            .map(|guard| guard.element_id.clone())
            .unwrap_or(None)
    }

    /// Set the element id.
    pub fn set_element_id(&self, element_id: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.element_id = Some(element_id.into());
        }
    }

    /// Get the placeholder text.
    pub fn placeholder(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.placeholder.clone())
            .unwrap_or_default()
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.placeholder = placeholder.into();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Get the display name shown in the closed trigger.
    pub fn selected_name(&self) -> Option<String> {
        self.inner
            .read()
            .map(|guard| guard.selected_name.clone())
            .unwrap_or(None)
    }

    /// Set the display name shown in the closed trigger.
    ///
    /// Used by embedders to seed the trigger with a name whose entry has not
    /// been loaded yet, e.g. when editing an existing record.
    pub fn set_selected_name(&self, name: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.selected_name = Some(name.into());
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Search key
    // -------------------------------------------------------------------------

    /// Get the current search key (None when unfiltered).
    pub fn search_key(&self) -> Option<String> {
        self.source.search_key()
    }

    /// Set the search key, normalizing the empty string to "no filter".
    ///
    /// Any in-flight page fetches are superseded: the active fetch generation
    /// is cancelled and a new one starts, and the dirty flag is raised so the
    /// surface re-fetches from row 0 under the new key. Stale pages fetched
    /// under the old key are discarded, never merged.
    pub fn set_search_key(&self, value: impl Into<String>) {
        let value = value.into();
        let key = if value.is_empty() { None } else { Some(value) };
        // Typing implies the dropdown is active.
        if key.is_some() {
            self.is_open.store(true, Ordering::SeqCst);
        }
        self.source.set_search_key(key);
        self.source.invalidate();
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Clear the search key without starting a new fetch generation.
    ///
    /// Close paths (blur, select, clear) reset the key as part of shutting
    /// the dropdown; nothing will be fetched until it reopens, so there is no
    /// generation to supersede.
    fn reset_search_key(&self) {
        self.source.set_search_key(None);
    }

    // -------------------------------------------------------------------------
    // Dropdown open/close state
    // -------------------------------------------------------------------------

    /// Check if the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    /// Open the dropdown.
    pub fn open(&self) {
        if !self.is_open.swap(true, Ordering::SeqCst) {
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Close the dropdown.
    pub fn close(&self) {
        if self.is_open.swap(false, Ordering::SeqCst) {
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Toggle the dropdown open/closed.
    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    // -------------------------------------------------------------------------
    // Focus and blur
    // -------------------------------------------------------------------------

    /// Open the dropdown and request focus for the search input.
    ///
    /// The actual focus move is delegated to the rendering surface, which
    /// drains the request via [`Select::take_focus_request`].
    pub fn focus_search_input(&self) {
        self.open();
        self.focus_requested.store(true, Ordering::SeqCst);
    }

    /// Check and clear the focus request (called by the rendering surface).
    pub fn take_focus_request(&self) -> bool {
        self.focus_requested.swap(false, Ordering::SeqCst)
    }

    /// Handle the search input losing focus.
    ///
    /// Closes only when no search key is set: blurring mid-search keeps the
    /// dropdown open so the list stays visible while the user tabs around.
    pub fn blur_search_input(&self) {
        if self.search_key().is_none() {
            self.close();
        }
    }

    /// Handle the selection control losing focus.
    ///
    /// If a blur suppression is pending (pointer-down on a row), consume it
    /// and stay open so the following click can complete the selection.
    /// Otherwise close the dropdown and drop the search key.
    pub fn blur_selection_control(&self) {
        if self.blur_suppressed.swap(false, Ordering::SeqCst) {
            return;
        }
        self.close();
        self.reset_search_key();
    }

    /// Arm the one-shot blur suppression.
    ///
    /// The rendering surface calls this on pointer-down over a candidate row.
    /// Toolkits fire blur before click, so without this the control blur
    /// would close the list before the row click lands.
    pub fn suppress_next_blur(&self) {
        self.blur_suppressed.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Get the currently selected entry.
    pub fn selected(&self) -> Option<SelectEntry> {
        self.inner
            .read()
            .map(|guard| guard.selected.clone())
            .unwrap_or(None)
    }

    /// Select an entry.
    ///
    /// Closes the dropdown, stores the entry, clears the search key and emits
    /// [`SelectionEvent::Selected`] on the output channel.
    pub fn select_item(&self, entry: SelectEntry) {
        self.close();
        if let Ok(mut guard) = self.inner.write() {
            guard.selected_name = Some(entry.name.clone());
            guard.selected = Some(entry.clone());
        }
        self.reset_search_key();
        self.dirty.store(true, Ordering::SeqCst);
        self.output.send(SelectionEvent::Selected(entry));
    }

    /// Clear the selection.
    ///
    /// Emits [`SelectionEvent::Cleared`] so the parent can tell an explicit
    /// clear apart from no change at all.
    pub fn clear(&self) {
        self.close();
        if let Ok(mut guard) = self.inner.write() {
            guard.selected = None;
            guard.selected_name = None;
        }
        self.reset_search_key();
        self.dirty.store(true, Ordering::SeqCst);
        self.output.send(SelectionEvent::Cleared);
    }

    // -------------------------------------------------------------------------
    // Refresh
    // -------------------------------------------------------------------------

    /// Discard in-flight and cached pages and request a re-render.
    ///
    /// The surface reacts by fetching again from row 0 under the current
    /// search key.
    pub fn refresh(&self) {
        self.source.invalidate();
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Output channel
    // -------------------------------------------------------------------------

    /// Install an already-created output sender.
    pub fn install_output(&self, sender: UnboundedSender<SelectionEvent>) {
        self.output.install(sender);
    }

    /// Create an output channel and return its receiving end.
    ///
    /// Replaces any previously installed sender.
    pub fn subscribe(&self) -> UnboundedReceiver<SelectionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.output.install(tx);
        rx
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the select state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for Select {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            source: self.source.clone(),
            output: self.output.clone(),
            dirty: Arc::clone(&self.dirty),
            is_open: Arc::clone(&self.is_open),
            blur_suppressed: Arc::clone(&self.blur_suppressed),
            focus_requested: Arc::clone(&self.focus_requested),
        }
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}
