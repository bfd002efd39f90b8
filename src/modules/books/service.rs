use std::sync::Arc;
use std::time::Duration;

use booklens_kernel::settings::UpstreamSettings;
use tracing::instrument;

use super::aggregate::{Aggregator, SearchError};
use super::filter::ResultFilter;
use super::models::{SearchMode, SearchOutcome, SearchRequest};
use super::query::{author_term, restrict_language, title_term};
use super::rank::Ranking;
use super::source::BookSource;

/// Author and title searches: fan out, filter, rank.
pub struct BookSearch {
    aggregator: Aggregator,
    language: Option<String>,
    max_extra_pages: u32,
}

impl BookSearch {
    pub fn new(source: Arc<dyn BookSource>, upstream: &UpstreamSettings) -> Self {
        Self {
            aggregator: Aggregator::new(source, Duration::from_millis(upstream.fetch_timeout_ms)),
            language: upstream.language.clone(),
            max_extra_pages: upstream.max_extra_pages,
        }
    }

    pub fn max_extra_pages(&self) -> u32 {
        self.max_extra_pages
    }

    /// Exact-author matches, newest first.
    #[instrument(skip(self), fields(author = %request.author))]
    pub async fn by_author(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let term = restrict_language(author_term(&request.author), self.language.as_deref());
        let fetched = self
            .aggregator
            .aggregate(SearchMode::Author, &term, request)
            .await;

        let filtered = ResultFilter::by_author(&request.author).apply_result(fetched);
        Ranking::NewestFirst
            .apply_result(filtered)
            .map(SearchOutcome::settle)
    }

    /// Title matches (exact, else close), longest description first.
    #[instrument(skip(self), fields(title = %request.title))]
    pub async fn by_title(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let term = restrict_language(
            title_term(&request.title, &request.author),
            self.language.as_deref(),
        );
        let fetched = self
            .aggregator
            .aggregate(SearchMode::Title, &term, request)
            .await;

        let filtered = ResultFilter::by_title(&request.title).apply_result(fetched);
        Ranking::LongestDescriptionFirst
            .apply_result(filtered)
            .map(SearchOutcome::settle)
    }
}
