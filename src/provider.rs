//! The provider contract: request/response shapes and the async fetch trait.
//!
//! A `Select` widget never talks to a backing data source directly. The
//! embedding application injects an [`ItemsProvider`] and the widget's
//! [`crate::source::ItemSource`] forwards row-window requests to it, with the
//! current search key attached. Pagination math (no duplicate or missing rows
//! across pages) is the provider's responsibility; this crate only shapes and
//! forwards requests.

use std::future::Future;
use std::ops::Range;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::item::{SelectEntry, SelectItem};

/// Row window requested by the rendering/virtualization surface.
///
/// Describes the half-open range `[start_index, start_index + count)` of rows
/// the surface wants to display, plus the cancellation signal for this fetch
/// generation. The surface never attaches a search key; the item source does.
#[derive(Debug, Clone)]
pub struct WindowRequest {
    /// First row index requested.
    pub start_index: usize,
    /// Number of rows requested (positive).
    pub count: usize,
    /// Signal raised when a newer request supersedes this one.
    pub cancel: CancellationToken,
}

impl WindowRequest {
    /// Create a window request tied to the given cancellation signal.
    pub fn new(start_index: usize, count: usize, cancel: CancellationToken) -> Self {
        Self {
            start_index,
            count,
            cancel,
        }
    }

    /// Create a window request with its own standalone cancellation signal.
    pub fn detached(start_index: usize, count: usize) -> Self {
        Self::new(start_index, count, CancellationToken::new())
    }
}

/// Request forwarded to the items provider.
///
/// Same row window as the originating [`WindowRequest`], augmented with the
/// search key that was current when the fetch was issued. `search_key: None`
/// means unfiltered.
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// First row index requested.
    pub start_index: usize,
    /// Number of rows requested.
    pub count: usize,
    /// Filter the total row set by this key before slicing, if present.
    pub search_key: Option<String>,
    /// Signal the provider should honor mid-fetch where practical.
    pub cancel: CancellationToken,
}

impl PageRequest {
    /// Half-open row range covered by this request.
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.start_index + self.count
    }
}

/// One page of rows plus the total match count under the current filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    /// Rows for the requested window, at most `count` of them, in order.
    pub items: Vec<SelectEntry>,
    /// Total number of rows matching the current filter.
    pub total_count: usize,
}

impl PageResult {
    /// Create a result from already-built entries.
    pub fn new(items: Vec<SelectEntry>, total_count: usize) -> Self {
        Self { items, total_count }
    }

    /// The empty page: no rows, zero total.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result page from any [`SelectItem`] slice.
    pub fn from_items<I: SelectItem>(items: &[I], total_count: usize) -> Self {
        Self {
            items: items.iter().map(SelectEntry::from).collect(),
            total_count,
        }
    }
}

/// Error raised by an items provider.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Error message
    pub message: String,
}

impl ProviderError {
    /// Create a new provider error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<String> for ProviderError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Asynchronous page-fetching backend for a `Select` widget.
///
/// The provider receives the full request shape, including the search key and
/// the cancellation signal, and returns the matching page. The widget issues
/// each call exactly once: no retry, no backoff, no caching. Cancellation is
/// advisory; a provider that ignores it merely wastes work, its late result
/// is discarded by the caller that superseded the request.
///
/// # Example
///
/// ```ignore
/// struct CustomerDirectory {
///     pool: DbPool,
/// }
///
/// #[async_trait]
/// impl ItemsProvider for CustomerDirectory {
///     async fn fetch(&self, request: PageRequest) -> Result<PageResult, ProviderError> {
///         let rows = self
///             .pool
///             .customers_matching(request.search_key.as_deref(), request.range())
///             .await?;
///         Ok(PageResult::from_items(&rows.items, rows.total))
///     }
/// }
/// ```
#[async_trait]
pub trait ItemsProvider: Send + Sync {
    /// Fetch one page of rows for the given request.
    async fn fetch(&self, request: PageRequest) -> Result<PageResult, ProviderError>;
}

/// Adapter letting a plain async closure serve as an [`ItemsProvider`].
///
/// # Example
///
/// ```ignore
/// let provider = FnProvider::new(|request: PageRequest| async move {
///     Ok(PageResult::from_items(&names_matching(&request), names.len()))
/// });
/// select.set_provider(provider);
/// ```
pub struct FnProvider<F>(F);

impl<F> FnProvider<F> {
    /// Wrap a closure as a provider.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> ItemsProvider for FnProvider<F>
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResult, ProviderError>> + Send,
{
    async fn fetch(&self, request: PageRequest) -> Result<PageResult, ProviderError> {
        (self.0)(request).await
    }
}
