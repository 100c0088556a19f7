//! Basic walkthrough of the select widget against an in-memory directory.
//!
//! Simulates the calls a rendering surface would make: focus the search
//! input, type a key, fetch the first visible window, pick a row, and clear.

use std::fs::File;
use std::sync::Arc;

use lazyselect::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

fn directory() -> Arc<Vec<SelectEntry>> {
    let names = [
        "Alice Johnson",
        "Albert Reyes",
        "Alma Fischer",
        "Bob Martin",
        "Carol Nguyen",
        "Dieter Vogel",
        "Elena Petrova",
        "Farid Haddad",
        "Grace Liu",
        "Hana Sato",
    ];
    Arc::new(names.iter().map(SelectEntry::from).collect())
}

#[tokio::main]
async fn main() -> Result<(), ProviderError> {
    let _ = WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create("lazyselect-demo.log")?,
    );

    let entries = directory();
    let select = Select::with_placeholder("Search people...");
    select.set_element_id("person-select");
    select.set_provider(FnProvider::new(move |request: PageRequest| {
        let entries = Arc::clone(&entries);
        async move {
            if request.cancel.is_cancelled() {
                return Ok(PageResult::empty());
            }
            let matching: Vec<SelectEntry> = entries
                .iter()
                .filter(|entry| {
                    request
                        .search_key
                        .as_deref()
                        .is_none_or(|key| entry.name.to_lowercase().contains(&key.to_lowercase()))
                })
                .cloned()
                .collect();
            let total = matching.len();
            let items: Vec<SelectEntry> = matching
                .into_iter()
                .skip(request.start_index)
                .take(request.count)
                .collect();
            Ok::<_, ProviderError>(PageResult::new(items, total))
        }
    }));
    let mut selections = select.subscribe();
    let source = select.source();

    // User clicks into the widget and types "al".
    select.focus_search_input();
    select.set_search_key("al");

    let window = WindowRequest::new(0, 5, source.active_token().child_token());
    let page = source.fetch_page(window).await?;
    println!(
        "{} of {} matches for {:?}:",
        page.items.len(),
        page.total_count,
        select.search_key().unwrap_or_default()
    );
    for entry in &page.items {
        println!("  {}", entry.name);
    }

    // User pointer-downs on the first row; the control blur that follows must
    // not close the list before the click lands.
    let picked = page.items[0].clone();
    select.suppress_next_blur();
    select.blur_selection_control();
    select.select_item(picked);

    // And later clears the field again.
    select.clear();

    while let Ok(event) = selections.try_recv() {
        match event {
            SelectionEvent::Selected(entry) => println!("parent received: {}", entry.name),
            SelectionEvent::Cleared => println!("parent received: selection cleared"),
        }
    }

    Ok(())
}
