use booklens_google_books::{ImageLinks, PanelizationSummary, Volume};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Largest `maxResults` the volumes endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 40;

/// Which search a request drives; decides the filter, the ranking and
/// whether `hasMorePages` is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Author,
    Title,
}

/// One logical search, fixed once validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub title: String,
    pub author: String,
    /// Index of the first result; `0` lets upstream choose.
    pub start_offset: u32,
    /// Results per page; `0` lets upstream choose.
    pub page_size: u32,
    /// Pages fetched in addition to the first.
    pub extra_pages: u32,
}

impl SearchRequest {
    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_page(mut self, start_offset: u32, page_size: u32) -> Self {
        self.start_offset = start_offset;
        self.page_size = page_size;
        self
    }

    pub fn with_extra_pages(mut self, extra_pages: u32) -> Self {
        self.extra_pages = extra_pages;
        self
    }

    pub fn pages_to_fetch(&self) -> u32 {
        self.extra_pages.saturating_add(1)
    }

    /// Start offset of page `k`: `start_offset + k * page_size`.
    pub fn page_offset(&self, k: u32) -> u32 {
        self.start_offset
            .saturating_add(k.saturating_mul(self.page_size))
    }

    /// The same search positioned at page `k`, used to build that page's query.
    pub fn page(&self, k: u32) -> SearchRequest {
        SearchRequest {
            start_offset: self.page_offset(k),
            extra_pages: 0,
            ..self.clone()
        }
    }
}

/// Merged pages of one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedResult {
    /// Upstream total reported by the page at `start_offset`.
    pub total_items: u64,
    pub items: Vec<Volume>,
    pub has_more_pages: bool,
}

/// `ceil(total / page_size) - pages_fetched > 0`; unknowable without a page size.
pub fn has_more_pages(total_items: u64, page_size: u32, pages_fetched: u32) -> bool {
    if page_size == 0 {
        return false;
    }
    total_items.div_ceil(u64::from(page_size)) > u64::from(pages_fetched)
}

/// Successful search result: either items or an explicit empty answer.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(AggregatedResult),
    NoContent { total_items: u64 },
}

impl SearchOutcome {
    /// Rewrites the items of a `Found` outcome; `NoContent` is left alone.
    pub fn map_items(self, f: impl FnOnce(Vec<Volume>) -> Vec<Volume>) -> Self {
        match self {
            SearchOutcome::Found(mut result) => {
                result.items = f(result.items);
                SearchOutcome::Found(result)
            }
            no_content => no_content,
        }
    }

    /// Collapses a `Found` outcome with no items into `NoContent`.
    pub fn settle(self) -> Self {
        match self {
            SearchOutcome::Found(result) if result.items.is_empty() => SearchOutcome::NoContent {
                total_items: result.total_items,
            },
            other => other,
        }
    }

    pub fn items(&self) -> &[Volume] {
        match self {
            SearchOutcome::Found(result) => &result.items,
            SearchOutcome::NoContent { .. } => &[],
        }
    }
}

/// JSON body accepted by both search routes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchBody {
    pub title: String,
    pub author: String,
    pub start_offset: u32,
    pub page_size: u32,
    pub extra_pages: u32,
}

/// A rejected request field, rendered into the validation error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub error: String,
}

impl FieldError {
    fn new(field: &'static str, error: impl Into<String>) -> Self {
        Self {
            field,
            error: error.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({ "field": self.field, "error": self.error })
    }
}

impl SearchBody {
    /// Validates the body for `mode`, bounding the fan-out by `max_extra_pages`.
    pub fn into_request(
        self,
        mode: SearchMode,
        max_extra_pages: u32,
    ) -> Result<SearchRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        match mode {
            SearchMode::Author if self.author.trim().is_empty() => {
                errors.push(FieldError::new("author", "required"));
            }
            SearchMode::Title if self.title.trim().is_empty() => {
                errors.push(FieldError::new("title", "required"));
            }
            _ => {}
        }
        if self.page_size > MAX_PAGE_SIZE {
            errors.push(FieldError::new(
                "pageSize",
                format!("must be at most {MAX_PAGE_SIZE}"),
            ));
        }
        if self.extra_pages > max_extra_pages {
            errors.push(FieldError::new(
                "extraPages",
                format!("must be at most {max_extra_pages}"),
            ));
        }
        if self.extra_pages > 0 && self.page_size == 0 {
            errors.push(FieldError::new(
                "extraPages",
                "requires a pageSize to position the extra pages",
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SearchRequest {
            title: self.title,
            author: self.author,
            start_offset: self.start_offset,
            page_size: self.page_size,
            extra_pages: self.extra_pages,
        })
    }
}

/// Simplified book record returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub title: String,
    pub authors: Vec<String>,
    pub published_date: String,
    pub description: String,
    pub page_count: u32,
    pub categories: Vec<String>,
    pub content_version: String,
    pub panelization_summary: PanelizationSummary,
    pub image_links: ImageLinks,
    pub language: String,
    pub preview_link: String,
    pub info_link: String,
    pub canonical_volume_link: String,
}

impl From<Volume> for BookResponse {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        Self {
            title: info.title,
            authors: info.authors,
            published_date: info.published_date,
            description: info.description,
            page_count: info.page_count,
            categories: info.categories,
            content_version: info.content_version,
            panelization_summary: info.panelization_summary,
            image_links: info.image_links,
            language: info.language,
            preview_link: info.preview_link,
            info_link: info.info_link,
            canonical_volume_link: info.canonical_volume_link,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub author: String,
    pub total_items: u64,
    pub has_more_pages: bool,
    pub books: Vec<BookResponse>,
}

impl AuthorResponse {
    pub fn new(author: impl Into<String>, result: AggregatedResult) -> Self {
        Self {
            author: author.into(),
            total_items: result.total_items,
            has_more_pages: result.has_more_pages,
            books: result.items.into_iter().map(BookResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TitleResponse {
    pub title: String,
    pub total_items: u64,
    pub books: Vec<BookResponse>,
}

impl TitleResponse {
    pub fn new(title: impl Into<String>, result: AggregatedResult) -> Self {
        Self {
            title: title.into(),
            total_items: result.total_items,
            books: result.items.into_iter().map(BookResponse::from).collect(),
        }
    }
}
