//! Query strings for the volumes search endpoint.
//!
//! Terms use the upstream's field operators (`inauthor:`, `intitle:`,
//! `langRestrict:`) joined with `+`, values form-encoded.

use super::models::SearchRequest;

/// Phrase-quoted author term so upstream matches the full name.
pub fn author_term(author: &str) -> String {
    format!("inauthor:\"{}\"", encode(author))
}

/// Title term, narrowed by author when one is given.
pub fn title_term(title: &str, author: &str) -> String {
    let mut term = format!("intitle:{}", encode(title));
    if !author.is_empty() {
        term.push_str("+inauthor:");
        term.push_str(&encode(author));
    }
    term
}

/// Folds an optional `langRestrict` code into a term.
pub fn restrict_language(term: String, language: Option<&str>) -> String {
    match language {
        Some(code) if !code.is_empty() => format!("{term}+langRestrict:{}", encode(code)),
        _ => term,
    }
}

/// `q=<base_term>`, then `startIndex` and `maxResults` when positive, in that order.
pub fn build_query(base_term: &str, request: &SearchRequest) -> String {
    let mut query = format!("q={base_term}");
    if request.start_offset > 0 {
        query.push_str(&format!("&startIndex={}", request.start_offset));
    }
    if request.page_size > 0 {
        query.push_str(&format!("&maxResults={}", request.page_size));
    }
    query
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
