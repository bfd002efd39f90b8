use std::cmp::Reverse;

use booklens_google_books::Volume;

use super::models::SearchOutcome;

/// Result orderings. Both sorts are stable, so ties keep arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    /// Descending `publishedDate`, compared as plain strings. Only correct
    /// for zero-padded `YYYY-MM-DD` shapes, which is what upstream sends.
    NewestFirst,
    /// Descending description length in bytes.
    LongestDescriptionFirst,
}

impl Ranking {
    pub fn sort(self, items: &mut [Volume]) {
        match self {
            Ranking::NewestFirst => {
                items.sort_by(|a, b| b.published_date().cmp(a.published_date()))
            }
            Ranking::LongestDescriptionFirst => {
                items.sort_by_key(|v| Reverse(v.description().len()))
            }
        }
    }

    pub fn apply(self, mut items: Vec<Volume>) -> Vec<Volume> {
        self.sort(&mut items);
        items
    }

    /// Ranks a successful outcome; failures pass through unsorted.
    pub fn apply_result<E>(self, input: Result<SearchOutcome, E>) -> Result<SearchOutcome, E> {
        input.map(|outcome| outcome.map_items(|items| self.apply(items)))
    }
}
