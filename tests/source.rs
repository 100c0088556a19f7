//! Tests for the paged item source adapter.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lazyselect::prelude::*;

/// Provider that records every request it receives and answers with a fixed
/// page.
#[derive(Default)]
struct RecordingProvider {
    calls: Arc<Mutex<Vec<PageRequest>>>,
    page: PageResult,
}

impl RecordingProvider {
    fn with_page(page: PageResult) -> Self {
        Self {
            calls: Arc::default(),
            page,
        }
    }

    fn calls(&self) -> Arc<Mutex<Vec<PageRequest>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ItemsProvider for RecordingProvider {
    async fn fetch(&self, request: PageRequest) -> Result<PageResult, ProviderError> {
        self.calls.lock().unwrap().push(request);
        Ok(self.page.clone())
    }
}

/// Provider that always fails.
struct FailingProvider;

#[async_trait]
impl ItemsProvider for FailingProvider {
    async fn fetch(&self, _request: PageRequest) -> Result<PageResult, ProviderError> {
        Err(ProviderError::new("backing store unavailable"))
    }
}

#[tokio::test]
async fn test_no_provider_returns_empty_page() {
    let select = Select::new();
    let source = select.source();

    let result = source
        .fetch_page(WindowRequest::detached(0, 25))
        .await
        .unwrap();

    assert_eq!(result, PageResult::empty());
    assert_eq!(result.total_count, 0);
}

#[tokio::test]
async fn test_precancelled_request_skips_provider() {
    let select = Select::new();
    let provider = RecordingProvider::with_page(PageResult::from_items(&["Alice"], 1));
    let calls = provider.calls();
    select.set_provider(provider);

    let request = WindowRequest::detached(40, 20);
    request.cancel.cancel();

    let result = select.source().fetch_page(request).await.unwrap();

    assert_eq!(result, PageResult::empty());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_window_forwarded_with_latest_search_key() {
    let select = Select::new();
    let provider = RecordingProvider::default();
    let calls = provider.calls();
    select.set_provider(provider);

    select.set_search_key("a");
    select.set_search_key("al");

    select
        .source()
        .fetch_page(WindowRequest::detached(50, 25))
        .await
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].start_index, 50);
    assert_eq!(calls[0].count, 25);
    assert_eq!(calls[0].range(), 50..75);
    assert_eq!(calls[0].search_key.as_deref(), Some("al"));
}

#[tokio::test]
async fn test_cleared_search_key_forwarded_as_none() {
    let select = Select::new();
    let provider = RecordingProvider::default();
    let calls = provider.calls();
    select.set_provider(provider);

    select.set_search_key("al");
    select.set_search_key("");

    select
        .source()
        .fetch_page(WindowRequest::detached(0, 10))
        .await
        .unwrap();

    assert_eq!(calls.lock().unwrap()[0].search_key, None);
}

#[tokio::test]
async fn test_provider_error_propagates_unchanged() {
    let select = Select::new();
    select.set_provider(FailingProvider);

    let err = select
        .source()
        .fetch_page(WindowRequest::detached(0, 10))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "backing store unavailable");
}

#[tokio::test]
async fn test_refresh_supersedes_in_flight_windows() {
    let select = Select::new();
    let provider = RecordingProvider::with_page(PageResult::from_items(&["Alice"], 1));
    let calls = provider.calls();
    select.set_provider(provider);

    let source = select.source();
    // The surface derives per-window tokens from the active generation.
    let window = WindowRequest::new(0, 25, source.active_token().child_token());
    select.refresh();

    let result = source.fetch_page(window).await.unwrap();

    assert_eq!(result, PageResult::empty());
    assert!(calls.lock().unwrap().is_empty());

    // The new generation fetches normally.
    let window = WindowRequest::new(0, 25, source.active_token().child_token());
    let result = source.fetch_page(window).await.unwrap();
    assert_eq!(result.total_count, 1);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_fn_provider_closure() {
    let select = Select::new();
    select.set_provider(FnProvider::new(|request: PageRequest| async move {
        let everyone = ["Alice", "Bob"];
        let matching: Vec<&str> = everyone
            .iter()
            .filter(|name| {
                request
                    .search_key
                    .as_deref()
                    .is_none_or(|key| name.to_lowercase().contains(&key.to_lowercase()))
            })
            .copied()
            .collect();
        Ok::<_, ProviderError>(PageResult::from_items(&matching, matching.len()))
    }));

    select.set_search_key("bo");
    let result = select
        .source()
        .fetch_page(WindowRequest::detached(0, 10))
        .await
        .unwrap();

    assert_eq!(result.total_count, 1);
    assert_eq!(result.items[0].name, "Bob");
}

#[tokio::test]
async fn test_search_select_scenario() {
    // Scripted end-to-end pass: focus, type, fetch, pick a row.
    let select = Select::new();
    let mut rx = select.subscribe();
    let alice = SelectEntry::named("Alice");
    let provider = RecordingProvider::with_page(PageResult::new(vec![alice.clone()], 1));
    let calls = provider.calls();
    select.set_provider(provider);

    assert!(!select.is_open());
    select.focus_search_input();
    assert!(select.is_open());

    select.set_search_key("al");

    let source = select.source();
    let window = WindowRequest::new(0, 25, source.active_token().child_token());
    let page = source.fetch_page(window).await.unwrap();
    assert_eq!(page.items, vec![alice.clone()]);
    assert_eq!(page.total_count, 1);
    assert_eq!(calls.lock().unwrap()[0].search_key.as_deref(), Some("al"));
    assert_eq!(calls.lock().unwrap()[0].start_index, 0);

    // Pointer-down on the row, then the control blur, then the click.
    select.suppress_next_blur();
    select.blur_selection_control();
    assert!(select.is_open());
    select.select_item(alice.clone());

    assert!(!select.is_open());
    assert_eq!(select.selected(), Some(alice.clone()));
    assert_eq!(select.search_key(), None);
    assert_eq!(rx.try_recv().unwrap(), SelectionEvent::Selected(alice));
}
