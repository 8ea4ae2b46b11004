//! Draining helpers: consume every page a query can yield.

use crate::fetcher::{FeedError, Page, PagedFeed};
use crate::query::Query;
use async_stream::try_stream;
use futures::stream::Stream;
use plv_core::record::Record;
use std::sync::Arc;
use tracing::debug;

/// Stream every page of `query`, following cursors until the feed reports
/// no next page.
pub fn pages<F: PagedFeed>(
    feed: Arc<F>,
    query: Query,
) -> impl Stream<Item = Result<Page, FeedError>> {
    try_stream! {
        let mut cursor: Option<String> = None;
        loop {
            let page = feed.fetch(&query.clone().after(cursor.clone())).await?;
            let next_cursor = page.last_cursor();
            // The cursor cannot advance past an empty page.
            let more = page.has_next_page && !page.records.is_empty();
            yield page;
            if !more {
                break;
            }
            cursor = next_cursor;
        }
    }
}

/// Stream every record of `query`, page boundaries flattened away.
pub fn records<F: PagedFeed>(
    feed: Arc<F>,
    query: Query,
) -> impl Stream<Item = Result<Record, FeedError>> {
    try_stream! {
        let page_stream = pages(feed, query);
        futures::pin_mut!(page_stream);
        while let Some(page) = futures::StreamExt::next(&mut page_stream).await {
            for record in page?.records {
                yield record;
            }
        }
    }
}

/// Collect every record of `query` into memory.
///
/// This follows cursors to exhaustion, so the result is complete with
/// respect to the feed at fetch time; the first feed error aborts the
/// drain.
pub async fn drain<F: PagedFeed>(feed: &Arc<F>, query: Query) -> Result<Vec<Record>, FeedError> {
    let mut all = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = feed.fetch(&query.clone().after(cursor.clone())).await?;
        cursor = page.last_cursor();
        // The cursor cannot advance past an empty page.
        let more = page.has_next_page && !page.records.is_empty();
        all.extend(page.records);
        if !more {
            break;
        }
    }
    debug!(total = all.len(), "query drained");
    Ok(all)
}
