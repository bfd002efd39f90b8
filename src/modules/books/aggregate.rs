//! Page fan-out.
//!
//! A search spanning several pages spawns one task per page onto the
//! runtime and joins them all. The first failure cancels the siblings and
//! fails the whole search; partial results are never returned. Dropping the
//! future aborts any fetch still in flight.

use std::sync::Arc;
use std::time::Duration;

use booklens_google_books::{GoogleBooksError, Volumes};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::models::{has_more_pages, AggregatedResult, SearchMode, SearchOutcome, SearchRequest};
use super::query::build_query;
use super::source::BookSource;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("page fetch at offset {offset} failed: {source}")]
    Fetch {
        offset: u32,
        #[source]
        source: GoogleBooksError,
    },

    #[error("page fetch at offset {offset} timed out after {timeout:?}")]
    Timeout { offset: u32, timeout: Duration },

    #[error("search cancelled")]
    Cancelled,

    #[error("page fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub struct Aggregator {
    source: Arc<dyn BookSource>,
    fetch_timeout: Duration,
}

impl Aggregator {
    pub fn new(source: Arc<dyn BookSource>, fetch_timeout: Duration) -> Self {
        Self {
            source,
            fetch_timeout,
        }
    }

    pub async fn aggregate(
        &self,
        mode: SearchMode,
        base_term: &str,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, SearchError> {
        self.aggregate_until_cancelled(mode, base_term, request, CancellationToken::new())
            .await
    }

    /// Fetches `extra_pages + 1` pages concurrently and merges them.
    ///
    /// `total_items` comes from the page at `start_offset` and pages are
    /// concatenated in offset order, regardless of completion order.
    /// Firing `cancel` fails the search with [`SearchError::Cancelled`].
    pub async fn aggregate_until_cancelled(
        &self,
        mode: SearchMode,
        base_term: &str,
        request: &SearchRequest,
        cancel: CancellationToken,
    ) -> Result<SearchOutcome, SearchError> {
        let pages_to_fetch = request.pages_to_fetch();
        let mut tasks = JoinSet::new();

        for k in 0..pages_to_fetch {
            let page = request.page(k);
            let query = build_query(base_term, &page);
            let offset = page.start_offset;
            let source = Arc::clone(&self.source);
            let cancel = cancel.clone();
            let timeout = self.fetch_timeout;

            tasks.spawn(async move {
                let result = tokio::select! {
                    _ = cancel.cancelled() => Err(SearchError::Cancelled),
                    fetched = tokio::time::timeout(timeout, source.fetch_page(&query)) => {
                        match fetched {
                            Ok(Ok(page)) => Ok(page),
                            Ok(Err(err)) => Err(SearchError::Fetch { offset, source: err }),
                            Err(_) => Err(SearchError::Timeout { offset, timeout }),
                        }
                    }
                };
                (k, result)
            });
        }

        let mut pages: Vec<Option<Volumes>> = vec![None; pages_to_fetch as usize];
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(SearchError::from).and_then(|(k, result)| {
                result.map(|page| (k, page))
            });

            match outcome {
                Ok((k, page)) => {
                    debug!(
                        page = k,
                        offset = request.page_offset(k),
                        items = page.items.len(),
                        "page fetched"
                    );
                    pages[k as usize] = Some(page);
                }
                Err(e) => {
                    warn!(error = %e, "page fetch failed, cancelling remaining pages");
                    cancel.cancel();
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        let mut pages = pages.into_iter().flatten();
        let first = pages.next().unwrap_or_default();
        let total_items = first.total_items;
        let mut items = first.items;
        for page in pages {
            items.extend(page.items);
        }

        let has_more_pages = match mode {
            SearchMode::Author => {
                has_more_pages(total_items, request.page_size, pages_to_fetch)
            }
            SearchMode::Title => false,
        };

        info!(
            mode = ?mode,
            pages = pages_to_fetch,
            total_items,
            merged_items = items.len(),
            has_more_pages,
            "search pages merged"
        );

        if items.is_empty() {
            return Ok(SearchOutcome::NoContent { total_items });
        }

        Ok(SearchOutcome::Found(AggregatedResult {
            total_items,
            items,
            has_more_pages,
        }))
    }
}
