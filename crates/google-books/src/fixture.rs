//! Recorded upstream responses served in place of live requests.

use std::path::Path;

use tracing::info;

use crate::error::GoogleBooksError;
use crate::types::Volumes;

pub const AUTHOR_FIXTURE: &str = "google-author-response.json";
pub const TITLE_FIXTURE: &str = "google-title-response.json";

/// One recorded result set per search mode, picked by the query's leading term.
///
/// The recordings start at index 0; `startIndex` and `maxResults` slice them
/// the way the live API pages through a result set.
#[derive(Debug, Clone)]
pub struct FixtureVolumes {
    author: Volumes,
    title: Volumes,
}

impl FixtureVolumes {
    pub fn new(author: Volumes, title: Volumes) -> Self {
        Self { author, title }
    }

    /// Loads `google-author-response.json` and `google-title-response.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, GoogleBooksError> {
        let author = read_fixture(&dir.join(AUTHOR_FIXTURE))?;
        let title = read_fixture(&dir.join(TITLE_FIXTURE))?;
        info!(dir = %dir.display(), "loaded Google Books fixtures");
        Ok(Self { author, title })
    }

    /// Title searches start with `q=intitle:`; everything else gets the author page.
    pub fn volumes(&self, query: &str) -> Volumes {
        let recorded = if query.starts_with("q=intitle") {
            &self.title
        } else {
            &self.author
        };

        let (start, max) = paging(query);
        let items = recorded
            .items
            .iter()
            .skip(start)
            .take(max.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Volumes {
            kind: recorded.kind.clone(),
            total_items: recorded.total_items,
            items,
        }
    }
}

/// `startIndex` and `maxResults` from a query string; absent or malformed values are ignored.
fn paging(query: &str) -> (usize, Option<usize>) {
    let mut start = 0;
    let mut max = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "startIndex" => start = value.parse().unwrap_or(0),
            "maxResults" => max = value.parse().ok().filter(|&n| n > 0),
            _ => {}
        }
    }
    (start, max)
}

fn read_fixture(path: &Path) -> Result<Volumes, GoogleBooksError> {
    let fixture_error = |message: String| GoogleBooksError::Fixture {
        path: path.display().to_string(),
        message,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| fixture_error(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| fixture_error(e.to_string()))
}
