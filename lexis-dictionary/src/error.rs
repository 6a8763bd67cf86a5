use thiserror::Error;

/// Error.
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(feature = "client")]
    #[error("could not construct http client: {0}")]
    BuildClient(#[source] reqwest::Error),
    #[cfg(feature = "client")]
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    /// A fetcher other than the built-in HTTP client failed to produce a page.
    #[error("could not fetch {url}: {reason}")]
    Fetch {
        /// The URL that was requested.
        url: String,
        /// Why the page couldn't be fetched.
        reason: String,
    },
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unknown dictionary source: {0}")]
    UnknownSource(String),
    /// Neither the direct lookup nor the search page led to a dictionary entry.
    #[error("Could not find Oxford definition for \"{word}\" using any known URL pattern")]
    NoDocument {
        /// The word that was looked up.
        word: String,
    },
}
