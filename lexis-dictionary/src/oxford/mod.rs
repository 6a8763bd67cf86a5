//! The Oxford Learner's Dictionaries (oxfordlearnersdictionaries.com).
//!
//! Oxford doesn't have a stable URL per word. A lookup first asks the direct search endpoint,
//! which redirects to the best matching entry, and falls back to the first hit of the regular
//! search page when that doesn't land on an entry.

pub mod audio;
pub mod extract;
pub mod flat;
mod types;

use url::Url;

pub use types::*;

use crate::document::{Document, ElementExt};
use crate::normalize::absolute_url;
use crate::Error;

fn search(base_url: &str, path: &[&str], word: &str) -> Result<Url, Error> {
    let mut url = Url::parse(base_url)?;

    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(path)
        .push("");
    url.query_pairs_mut().append_pair("q", word);

    Ok(url)
}

/// Returns the URL that redirects straight to the best matching entry for `word`.
///
/// # Errors
///
/// Returns an error if `base_url` is not a valid base URL.
pub fn direct_url(base_url: &str, word: &str) -> Result<Url, Error> {
    search(base_url, &["search", "english", "direct"], word)
}

/// Returns the URL of the search results page for `word`.
///
/// # Errors
///
/// Returns an error if `base_url` is not a valid base URL.
pub fn search_url(base_url: &str, word: &str) -> Result<Url, Error> {
    search(base_url, &["search", "english"], word)
}

/// Returns whether `document` is a dictionary entry rather than a search page.
#[must_use]
pub fn is_entry_page(document: &Document) -> bool {
    document.exists(".entry") || document.exists(".webtop")
}

/// Returns the absolute URL of the first hit on a search results page.
#[must_use]
pub fn first_search_result(document: &Document, base_url: &str) -> Option<String> {
    document
        .select_first(".search-results .result a")
        .and_then(|link| link.attribute("href"))
        .map(|href| absolute_url(base_url, &href))
}
