//! Paged item source adapter.
//!
//! [`ItemSource`] sits between the rendering/virtualization surface and the
//! injected [`ItemsProvider`]. The surface asks for row windows as the user
//! scrolls; the source attaches the search key that is current at call time
//! and forwards the request. It is stateless per call: it keeps no pages, so
//! discarding stale results is the job of whichever layer issues overlapping
//! requests.

use std::sync::{Arc, RwLock};

use tokio_util::sync::CancellationToken;

use crate::provider::{ItemsProvider, PageRequest, PageResult, ProviderError, WindowRequest};

/// Slots shared between a `Select` handle and the `ItemSource` clones handed
/// to the rendering surface.
#[derive(Default)]
pub(crate) struct SourceShared {
    /// Injected page-fetching backend, if any
    provider: RwLock<Option<Arc<dyn ItemsProvider>>>,
    /// Search key attached to every outgoing page request
    search_key: RwLock<Option<String>>,
    /// Cancellation token for the current fetch generation
    active: RwLock<CancellationToken>,
}

/// Adapter between the virtualization surface and the items provider.
///
/// Cheap to clone; all clones share the same provider slot, search key, and
/// fetch generation. Obtain one from [`crate::Select::source`].
#[derive(Clone, Default)]
pub struct ItemSource {
    shared: Arc<SourceShared>,
}

impl ItemSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Install the page-fetching backend.
    pub fn set_provider(&self, provider: Arc<dyn ItemsProvider>) {
        if let Ok(mut guard) = self.shared.provider.write() {
            *guard = Some(provider);
        }
    }

    /// Check whether a provider has been configured.
    pub fn has_provider(&self) -> bool {
        self.shared
            .provider
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Get the search key that will be attached to the next page request.
    pub fn search_key(&self) -> Option<String> {
        self.shared
            .search_key
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    pub(crate) fn set_search_key(&self, key: Option<String>) {
        if let Ok(mut guard) = self.shared.search_key.write() {
            *guard = key;
        }
    }

    /// Token for the current fetch generation.
    ///
    /// The surface should derive per-window tokens from this (via
    /// `child_token`) so that a [`ItemSource::invalidate`] supersedes every
    /// in-flight window at once.
    pub fn active_token(&self) -> CancellationToken {
        self.shared
            .active
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Cancel all in-flight fetches and start a new generation.
    pub(crate) fn invalidate(&self) {
        if let Ok(mut guard) = self.shared.active.write() {
            guard.cancel();
            *guard = CancellationToken::new();
            log::debug!("item source invalidated, new fetch generation started");
        }
    }

    /// Fetch one page of rows for the given window.
    ///
    /// - A request whose cancellation signal already fired resolves to the
    ///   empty page without invoking the provider. Cancellation is not an
    ///   error.
    /// - With no provider configured, every request resolves to the empty
    ///   page.
    /// - Otherwise the provider is invoked exactly once with the window plus
    ///   the current search key; its result or error is returned unchanged.
    pub async fn fetch_page(&self, request: WindowRequest) -> Result<PageResult, ProviderError> {
        if request.cancel.is_cancelled() {
            log::debug!(
                "skipping superseded fetch for rows [{}, {})",
                request.start_index,
                request.start_index + request.count
            );
            return Ok(PageResult::empty());
        }

        let provider = self
            .shared
            .provider
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(None);

        let Some(provider) = provider else {
            return Ok(PageResult::empty());
        };

        let page_request = PageRequest {
            start_index: request.start_index,
            count: request.count,
            search_key: self.search_key(),
            cancel: request.cancel,
        };

        provider.fetch(page_request).await
    }
}

impl std::fmt::Debug for ItemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemSource")
            .field("has_provider", &self.has_provider())
            .field("search_key", &self.search_key())
            .finish()
    }
}
