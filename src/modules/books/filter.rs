//! Result filtering.
//!
//! A filter is a strict pass of named predicates, all of which must hold,
//! plus an optional fallback pass that runs against the unfiltered input
//! when the strict pass keeps nothing. Author searches have no fallback;
//! title searches relax to substring matching and drop the description
//! requirement.

use booklens_google_books::Volume;
use tracing::debug;

use super::models::{SearchMode, SearchOutcome};

/// Only this language code passes `IsEnglish`; no case folding.
pub const ENGLISH: &str = "en";
/// Descriptions must be longer than this many bytes.
pub const MIN_DESCRIPTION_LEN: usize = 1;
/// Thumbnail URLs must be longer than this many bytes.
pub const MIN_THUMBNAIL_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// The author list contains this exact string.
    ExactAuthor(String),
    /// Normalized title equals this normalized target.
    ExactTitle(String),
    /// Normalized title contains this normalized target.
    CloseTitle(String),
    IsEnglish,
    HasDescription,
    HasImage,
}

impl Predicate {
    pub fn exact_author(author: &str) -> Self {
        Predicate::ExactAuthor(author.to_string())
    }

    pub fn exact_title(title: &str) -> Self {
        Predicate::ExactTitle(normalize(title))
    }

    pub fn close_title(title: &str) -> Self {
        Predicate::CloseTitle(normalize(title))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Predicate::ExactAuthor(_) => "exact_author",
            Predicate::ExactTitle(_) => "exact_title",
            Predicate::CloseTitle(_) => "close_title",
            Predicate::IsEnglish => "is_english",
            Predicate::HasDescription => "has_description",
            Predicate::HasImage => "has_image",
        }
    }

    pub fn matches(&self, volume: &Volume) -> bool {
        match self {
            Predicate::ExactAuthor(author) => volume.authors().iter().any(|a| a == author),
            Predicate::ExactTitle(target) => normalize(volume.title()) == *target,
            Predicate::CloseTitle(target) => normalize(volume.title()).contains(target.as_str()),
            Predicate::IsEnglish => volume.language() == ENGLISH,
            Predicate::HasDescription => volume.description().len() > MIN_DESCRIPTION_LEN,
            Predicate::HasImage => volume.thumbnail().len() > MIN_THUMBNAIL_LEN,
        }
    }
}

/// Lower-cases, then drops everything but ASCII letters and digits.
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Conjunction of predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPass {
    predicates: Vec<Predicate>,
}

impl FilterPass {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, volume: &Volume) -> bool {
        self.predicates.iter().all(|p| p.matches(volume))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFilter {
    mode: SearchMode,
    strict: FilterPass,
    fallback: Option<FilterPass>,
}

impl ResultFilter {
    pub fn by_author(author: &str) -> Self {
        Self {
            mode: SearchMode::Author,
            strict: FilterPass::new(vec![
                Predicate::exact_author(author),
                Predicate::IsEnglish,
                Predicate::HasDescription,
                Predicate::HasImage,
            ]),
            fallback: None,
        }
    }

    pub fn by_title(title: &str) -> Self {
        Self {
            mode: SearchMode::Title,
            strict: FilterPass::new(vec![
                Predicate::exact_title(title),
                Predicate::IsEnglish,
                Predicate::HasDescription,
                Predicate::HasImage,
            ]),
            fallback: Some(FilterPass::new(vec![
                Predicate::close_title(title),
                Predicate::IsEnglish,
                Predicate::HasImage,
            ])),
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn strict(&self) -> &FilterPass {
        &self.strict
    }

    pub fn fallback(&self) -> Option<&FilterPass> {
        self.fallback.as_ref()
    }

    pub fn apply(&self, items: Vec<Volume>) -> Vec<Volume> {
        let received = items.len();
        let kept: Vec<Volume> = items
            .iter()
            .filter(|v| self.strict.matches(v))
            .cloned()
            .collect();

        if !kept.is_empty() {
            debug!(mode = ?self.mode, received, kept = kept.len(), "strict filter pass");
            return kept;
        }

        match &self.fallback {
            Some(fallback) => {
                let kept: Vec<Volume> = items.into_iter().filter(|v| fallback.matches(v)).collect();
                debug!(
                    mode = ?self.mode,
                    received,
                    kept = kept.len(),
                    "strict pass emptied the results, fallback pass applied"
                );
                kept
            }
            None => kept,
        }
    }

    /// Filters a successful outcome; failures and empty outcomes pass through untouched.
    pub fn apply_result<E>(&self, input: Result<SearchOutcome, E>) -> Result<SearchOutcome, E> {
        input.map(|outcome| outcome.map_items(|items| self.apply(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::AggregatedResult;
    use crate::modules::books::testing::volume;

    fn titles(items: &[Volume]) -> Vec<&str> {
        items.iter().map(|v| v.title()).collect()
    }

    #[test]
    fn normalize_strips_punctuation_case_and_non_ascii() {
        assert_eq!(normalize("The Hitchhiker's Guide: 2nd Ed."), "thehitchhikersguide2nded");
        assert_eq!(normalize("Café Society"), "cafsociety");
        assert_eq!(normalize("  "), "");
    }

    #[test]
    fn title_exact_pass_keeps_only_the_exact_match() {
        let items = vec![
            volume("Project Hail Mary", &["Andy Weir"]),
            volume("Project Hail Mary: A Novel", &["Andy Weir"]),
        ];
        let kept = ResultFilter::by_title("project hail-mary").apply(items);
        assert_eq!(titles(&kept), vec!["Project Hail Mary"]);
    }

    #[test]
    fn title_fallback_recovers_substring_matches() {
        let mut no_description = volume("Summary of Project Hail Mary", &["Quick Reads"]);
        no_description.volume_info.description.clear();
        let items = vec![
            volume("Project Hail Mary: A Novel", &["Andy Weir"]),
            no_description,
            volume("The Martian", &["Andy Weir"]),
        ];

        let filter = ResultFilter::by_title("Project Hail Mary");
        assert!(items.iter().all(|v| !filter.strict().matches(v)));

        let kept = filter.apply(items);
        assert_eq!(
            titles(&kept),
            vec!["Project Hail Mary: A Novel", "Summary of Project Hail Mary"]
        );
    }

    #[test]
    fn title_fallback_still_requires_english_and_image() {
        let mut german = volume("Project Hail Mary (German Edition)", &["Andy Weir"]);
        german.volume_info.language = "de".to_string();
        let mut imageless = volume("Project Hail Mary Deluxe", &["Andy Weir"]);
        imageless.volume_info.image_links.thumbnail.clear();

        let kept = ResultFilter::by_title("Project Hail Mary").apply(vec![german, imageless]);
        assert!(kept.is_empty());
    }

    #[test]
    fn author_membership_is_exact() {
        let items = vec![
            volume("The Martian", &["Andy Weir"]),
            volume("Co-written", &["Someone Else", "Andy Weir"]),
            volume("Lowercase", &["andy weir"]),
            volume("Other", &["Andrew Weir"]),
        ];
        let kept = ResultFilter::by_author("Andy Weir").apply(items);
        assert_eq!(titles(&kept), vec!["The Martian", "Co-written"]);
    }

    #[test]
    fn author_filter_has_no_fallback() {
        let filter = ResultFilter::by_author("Andy Weir");
        assert!(filter.fallback().is_none());
        assert!(filter.apply(vec![volume("Dune", &["Frank Herbert"])]).is_empty());
    }

    #[test]
    fn each_predicate_rejects_on_its_own() {
        let filter = ResultFilter::by_author("Andy Weir");
        let base = volume("The Martian", &["Andy Weir"]);
        assert_eq!(filter.apply(vec![base.clone()]).len(), 1);

        let mut french = base.clone();
        french.volume_info.language = "fr".to_string();
        let mut upper = base.clone();
        upper.volume_info.language = "EN".to_string();
        let mut short_description = base.clone();
        short_description.volume_info.description = "x".to_string();
        let mut short_thumbnail = base.clone();
        short_thumbnail.volume_info.image_links.thumbnail = "http://x.y".to_string();

        for rejected in [french, upper, short_description, short_thumbnail] {
            assert!(filter.apply(vec![rejected]).is_empty());
        }
    }

    #[test]
    fn title_strict_pass_drops_a_short_description() {
        let filter = ResultFilter::by_title("The Martian");
        let mut terse = volume("The Martian", &["Andy Weir"]);
        terse.id = "terse".to_string();
        terse.volume_info.description = "x".to_string();
        let full = volume("The Martian", &["Andy Weir"]);

        let kept = filter.apply(vec![terse, full]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "the-martian");
    }

    #[test]
    fn thresholds_are_exclusive() {
        let mut v = volume("t", &["a"]);
        v.volume_info.description = "ab".to_string();
        v.volume_info.image_links.thumbnail = "http://x.yz".to_string();
        assert!(Predicate::HasDescription.matches(&v));
        assert!(Predicate::HasImage.matches(&v));
    }

    #[test]
    fn predicate_lists_are_named() {
        let filter = ResultFilter::by_title("Dune");
        let strict: Vec<&str> = filter.strict().predicates().iter().map(Predicate::name).collect();
        assert_eq!(strict, vec!["exact_title", "is_english", "has_description", "has_image"]);
        let fallback: Vec<&str> = filter
            .fallback()
            .unwrap()
            .predicates()
            .iter()
            .map(Predicate::name)
            .collect();
        assert_eq!(fallback, vec!["close_title", "is_english", "has_image"]);
    }

    #[test]
    fn errors_pass_through_untouched() {
        let input: Result<SearchOutcome, &str> = Err("upstream down");
        assert_eq!(
            ResultFilter::by_title("Dune").apply_result(input),
            Err("upstream down")
        );
    }

    #[test]
    fn outcome_items_are_filtered() {
        let input: Result<SearchOutcome, &str> = Ok(SearchOutcome::Found(AggregatedResult {
            total_items: 2,
            items: vec![volume("Dune", &["Frank Herbert"]), volume("Emma", &["Jane Austen"])],
            has_more_pages: false,
        }));
        let filtered = ResultFilter::by_author("Jane Austen").apply_result(input).unwrap();
        assert_eq!(titles(filtered.items()), vec!["Emma"]);
    }
}
