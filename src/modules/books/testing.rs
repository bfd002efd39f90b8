//! Test doubles for the books module.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use booklens_google_books::{GoogleBooksError, Volume, Volumes};
use tokio::sync::Barrier;

use super::source::BookSource;

/// An English volume with a description and thumbnail, so it clears
/// every non-matching predicate.
pub fn volume(title: &str, authors: &[&str]) -> Volume {
    let mut v = Volume::default();
    v.id = title.to_lowercase().replace(' ', "-");
    v.volume_info.title = title.to_string();
    v.volume_info.authors = authors.iter().map(|a| a.to_string()).collect();
    v.volume_info.published_date = "2020-01-01".to_string();
    v.volume_info.description = format!("About {title}.");
    v.volume_info.language = "en".to_string();
    v.volume_info.image_links.thumbnail =
        format!("http://books.google.com/books/content?id={}", v.id);
    v
}

/// A page whose items carry the given titles.
pub fn page_of(total_items: u64, titles: &[&str]) -> Volumes {
    Volumes {
        kind: "books#volumes".to_string(),
        total_items,
        items: titles.iter().map(|t| volume(t, &["a"])).collect(),
    }
}

pub enum Script {
    Page(Volumes),
    Delayed(Duration, Volumes),
    Fail,
    Hang,
}

/// Answers queries from a script; unscripted queries get an empty page.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: HashMap<String, Script>,
    barrier: Option<Arc<Barrier>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, query: &str, script: Script) -> Self {
        self.scripts.insert(query.to_string(), script);
        self
    }

    /// Every fetch waits until `n` fetches are in flight.
    pub fn with_barrier(mut self, n: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(n)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookSource for ScriptedSource {
    async fn fetch_page(&self, query: &str) -> Result<Volumes, GoogleBooksError> {
        self.calls.lock().unwrap().push(query.to_string());

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        match self.scripts.get(query) {
            None => Ok(Volumes::default()),
            Some(Script::Page(page)) => Ok(page.clone()),
            Some(Script::Delayed(delay, page)) => {
                tokio::time::sleep(*delay).await;
                Ok(page.clone())
            }
            Some(Script::Fail) => Err(GoogleBooksError::ApiError {
                status: 500,
                message: format!("scripted failure for {query}"),
            }),
            Some(Script::Hang) => std::future::pending().await,
        }
    }
}
