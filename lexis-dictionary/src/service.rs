//! Lookups against a single dictionary source.
//!
//! A [`LookupService`] fetches the page for a word through a [`Fetch`] implementation and hands
//! it to the source's extractors. Lookups never return an error: a page that can't be fetched
//! becomes a response with no entries and the error's message.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::document::Document;
use crate::{Error, LookupResponse, Source, cambridge, merriam_webster, oxford, v1, v2};

/// Retrieves the HTML of a page.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `url` and returns the body of the response.
    async fn fetch(&self, url: &str) -> Result<String, Error>;
}

/// Looks words up in one dictionary source.
#[async_trait]
pub trait LookupService: Send + Sync {
    /// Returns the source this service looks words up in.
    fn source(&self) -> Source;

    /// Looks up `word` and returns the result in the flat schema.
    async fn lookup_v1(&self, word: &str) -> v1::DictionaryResponse;

    /// Looks up `word` and returns the result in the source-specific schema.
    async fn lookup_v2(&self, word: &str) -> v2::DictionaryResponse;
}

/// Returns `base_url` with `path` and `word` appended as percent-encoded path segments.
fn entry_url(base_url: &str, path: &[&str], word: &str) -> Result<Url, Error> {
    let mut url = Url::parse(base_url)?;

    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(path)
        .push(word);

    Ok(url)
}

/// Turns a fetched page into a response, or the fetch error into an error-shaped response.
///
/// The parsed document isn't `Send`, so it must only ever live inside this synchronous call.
fn render<R, F>(source: Source, word: &str, page: Result<String, Error>, parse: F) -> R
where
    R: LookupResponse,
    F: FnOnce(&Document, &str) -> R,
{
    match page {
        Ok(html) => {
            let document = Document::parse(&html);
            let response = parse(&document, word);

            debug!(%source, %word, entries = response.entry_count(), "parsed page");

            response
        }
        Err(err) => {
            warn!(%source, %word, %err, "lookup failed");

            R::failed(source, word, err.to_string())
        }
    }
}

/// The Cambridge Dictionary.
pub struct Cambridge {
    fetcher: Arc<dyn Fetch>,
    base_url: String,
}

impl Cambridge {
    /// Constructs a service that fetches pages from the public site through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetch>) -> Cambridge {
        Cambridge::with_base_url(fetcher, Source::Cambridge.base_url())
    }

    /// Constructs a service that fetches pages from `base_url` instead of the public site.
    #[must_use]
    pub fn with_base_url(fetcher: Arc<dyn Fetch>, base_url: impl Into<String>) -> Cambridge {
        Cambridge {
            fetcher,
            base_url: base_url.into(),
        }
    }

    async fn page(&self, word: &str) -> Result<String, Error> {
        let url = entry_url(&self.base_url, &cambridge::ENTRY_PATH, word)?;

        self.fetcher.fetch(url.as_str()).await
    }
}

#[async_trait]
impl LookupService for Cambridge {
    fn source(&self) -> Source {
        Source::Cambridge
    }

    async fn lookup_v1(&self, word: &str) -> v1::DictionaryResponse {
        let page = self.page(word).await;

        render(Source::Cambridge, word, page, cambridge::flat::parse)
    }

    async fn lookup_v2(&self, word: &str) -> v2::DictionaryResponse {
        let page = self.page(word).await;

        render(Source::Cambridge, word, page, |document, word| {
            cambridge::extract::parse(document, word).into()
        })
    }
}

/// The Oxford Learner's Dictionaries.
pub struct Oxford {
    fetcher: Arc<dyn Fetch>,
    base_url: String,
}

fn is_entry_page(html: &str) -> bool {
    oxford::is_entry_page(&Document::parse(html))
}

/// Reads a search results page, returning either the link to follow or whether the page itself
/// reports that nothing matched.
fn search_outcome(html: &str, base_url: &str) -> Result<String, bool> {
    let document = Document::parse(html);

    oxford::first_search_result(&document, base_url)
        .ok_or_else(|| document.exists(".result-header"))
}

impl Oxford {
    /// Constructs a service that fetches pages from the public site through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetch>) -> Oxford {
        Oxford::with_base_url(fetcher, Source::Oxford.base_url())
    }

    /// Constructs a service that fetches pages from `base_url` instead of the public site.
    #[must_use]
    pub fn with_base_url(fetcher: Arc<dyn Fetch>, base_url: impl Into<String>) -> Oxford {
        Oxford {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Finds the entry page for `word`.
    ///
    /// The direct lookup is tried first. When it fails or doesn't land on an entry, the first
    /// hit of the search page is followed instead. A search page without hits that explains why
    /// is returned as-is so the extractors can report it.
    async fn page(&self, word: &str) -> Result<String, Error> {
        let direct = oxford::direct_url(&self.base_url, word)?;

        match self.fetcher.fetch(direct.as_str()).await {
            Ok(html) if is_entry_page(&html) => return Ok(html),
            Ok(_) => debug!(%word, "direct lookup did not land on an entry"),
            Err(err) => debug!(%word, %err, "direct lookup failed"),
        }

        let search = oxford::search_url(&self.base_url, word)?;

        match self.fetcher.fetch(search.as_str()).await {
            Ok(html) => match search_outcome(&html, &self.base_url) {
                Ok(link) => match self.fetcher.fetch(&link).await {
                    Ok(html) => return Ok(html),
                    Err(err) => debug!(%word, %link, %err, "could not fetch search result"),
                },
                Err(true) => return Ok(html),
                Err(false) => debug!(%word, "search page has no results"),
            },
            Err(err) => debug!(%word, %err, "search failed"),
        }

        Err(Error::NoDocument {
            word: word.to_owned(),
        })
    }
}

#[async_trait]
impl LookupService for Oxford {
    fn source(&self) -> Source {
        Source::Oxford
    }

    async fn lookup_v1(&self, word: &str) -> v1::DictionaryResponse {
        let page = self.page(word).await;

        render(Source::Oxford, word, page, oxford::flat::parse)
    }

    async fn lookup_v2(&self, word: &str) -> v2::DictionaryResponse {
        let page = self.page(word).await;

        render(Source::Oxford, word, page, |document, word| {
            oxford::extract::parse(document, word).into()
        })
    }
}

/// The Merriam-Webster dictionary.
pub struct MerriamWebster {
    fetcher: Arc<dyn Fetch>,
    base_url: String,
}

impl MerriamWebster {
    /// Constructs a service that fetches pages from the public site through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetch>) -> MerriamWebster {
        MerriamWebster::with_base_url(fetcher, Source::MerriamWebster.base_url())
    }

    /// Constructs a service that fetches pages from `base_url` instead of the public site.
    #[must_use]
    pub fn with_base_url(fetcher: Arc<dyn Fetch>, base_url: impl Into<String>) -> MerriamWebster {
        MerriamWebster {
            fetcher,
            base_url: base_url.into(),
        }
    }

    async fn page(&self, word: &str) -> Result<String, Error> {
        let url = entry_url(&self.base_url, &merriam_webster::ENTRY_PATH, word)?;

        self.fetcher.fetch(url.as_str()).await
    }
}

#[async_trait]
impl LookupService for MerriamWebster {
    fn source(&self) -> Source {
        Source::MerriamWebster
    }

    async fn lookup_v1(&self, word: &str) -> v1::DictionaryResponse {
        let page = self.page(word).await;

        render(Source::MerriamWebster, word, page, merriam_webster::flat::parse)
    }

    async fn lookup_v2(&self, word: &str) -> v2::DictionaryResponse {
        let page = self.page(word).await;

        render(Source::MerriamWebster, word, page, |document, word| {
            merriam_webster::extract::parse(document, word).into()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Serves canned pages and records every requested URL.
    #[derive(Default)]
    struct Pages {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl Pages {
        fn with(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_owned(), html.to_owned());
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetch for Pages {
        async fn fetch(&self, url: &str) -> Result<String, Error> {
            self.requested.lock().unwrap().push(url.to_owned());
            self.pages.get(url).cloned().ok_or_else(|| Error::Fetch {
                url: url.to_owned(),
                reason: String::from("404 Not Found"),
            })
        }
    }

    const OXFORD_DIRECT: &str = "https://www.oxfordlearnersdictionaries.com/search/english/direct/?q=do";
    const OXFORD_SEARCH: &str = "https://www.oxfordlearnersdictionaries.com/search/english/?q=do";
    const OXFORD_DO: &str = "https://www.oxfordlearnersdictionaries.com/definition/english/do_1";

    #[test]
    fn test_entry_url_encodes_the_word() {
        let base = Source::Cambridge.base_url();
        let url = entry_url(base, &cambridge::ENTRY_PATH, "ice cream/x").unwrap();

        assert_eq!(
            url.as_str(),
            "https://dictionary.cambridge.org/dictionary/english/ice%20cream%2Fx"
        );
    }

    #[tokio::test]
    async fn test_fetch_error_becomes_error_response() {
        let service = Cambridge::new(Arc::new(Pages::default()));
        let response = service.lookup_v1("run").await;

        assert!(response.entries.is_empty());
        assert_eq!(response.source, Source::Cambridge);
        assert_eq!(
            response.error.as_deref(),
            Some("could not fetch https://dictionary.cambridge.org/dictionary/english/run: 404 Not Found")
        );
    }

    #[tokio::test]
    async fn test_cambridge_lookup() {
        let pages = Pages::default().with(
            "https://dictionary.cambridge.org/dictionary/english/run",
            include_str!("../tests/fixtures/cambridge/run.html"),
        );
        let service = Cambridge::new(Arc::new(pages));
        let response = service.lookup_v2("run").await;

        assert_eq!(response.source(), Source::Cambridge);
        assert_eq!(response.entry_count(), 1);
        assert_eq!(response.error(), None);
    }

    #[tokio::test]
    async fn test_oxford_direct_lookup() {
        let pages = Arc::new(
            Pages::default().with(OXFORD_DIRECT, include_str!("../tests/fixtures/oxford/do.html")),
        );
        let service = Oxford::new(pages.clone());
        let response = service.lookup_v1("do").await;

        assert_eq!(response.entries.len(), 2);
        assert_eq!(pages.requested(), vec![OXFORD_DIRECT]);
    }

    #[tokio::test]
    async fn test_oxford_falls_back_to_search() {
        let pages = Arc::new(
            Pages::default()
                .with(OXFORD_DIRECT, "<html><body><p>Service unavailable</p></body></html>")
                .with(OXFORD_SEARCH, include_str!("../tests/fixtures/oxford/search.html"))
                .with(OXFORD_DO, include_str!("../tests/fixtures/oxford/do.html")),
        );
        let service = Oxford::new(pages.clone());
        let response = service.lookup_v2("do").await;

        assert_eq!(response.entry_count(), 1);
        assert_eq!(pages.requested(), vec![OXFORD_DIRECT, OXFORD_SEARCH, OXFORD_DO]);
    }

    #[tokio::test]
    async fn test_oxford_reports_unmatched_search() {
        let pages = Pages::default().with(
            "https://www.oxfordlearnersdictionaries.com/search/english/?q=asdfgh",
            include_str!("../tests/fixtures/oxford/not-found.html"),
        );
        let service = Oxford::new(Arc::new(pages));
        let response = service.lookup_v2("asdfgh").await;

        assert_eq!(response.error(), Some("No entries found for \"asdfgh\""));
    }

    #[tokio::test]
    async fn test_oxford_without_any_document() {
        let service = Oxford::new(Arc::new(Pages::default()));
        let response = service.lookup_v2("do").await;

        assert_eq!(response.entry_count(), 0);
        assert_eq!(
            response.error(),
            Some("Could not find Oxford definition for \"do\" using any known URL pattern")
        );
    }

    #[tokio::test]
    async fn test_merriam_webster_lookup() {
        let pages = Pages::default().with(
            "https://www.merriam-webster.com/dictionary/flowr",
            include_str!("../tests/fixtures/merriam-webster/flowr.html"),
        );
        let service = MerriamWebster::new(Arc::new(pages));
        let response = service.lookup_v2("flowr").await;

        assert_eq!(response.source(), Source::MerriamWebster);
        assert_eq!(response.error(), Some("Word not found. Did you mean: flower, flow?"));
    }
}
