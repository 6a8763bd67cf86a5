//! HTTP features

use std::sync::Arc;

use lexis_dictionary::client::builder;
use lexis_dictionary::service::{Cambridge, MerriamWebster, Oxford};
use lexis_dictionary::{Dictionaries, HttpFetcher, Pacing};

use crate::Error;
use crate::config::HttpConfig;

/// Returns an HTTP client for the dictionary sites.
///
/// # Errors
///
/// Returns [`Error::HttpClient`] if the client fails to build.
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, Error> {
    builder(config.timeout)
        .build()
        .map_err(|err| Error::HttpClient(lexis_dictionary::Error::BuildClient(err)))
}

/// Builds the lookup services, sharing one HTTP client between them.
///
/// Each dictionary gets its own fetcher so requests to one site are paced independently of the
/// others.
///
/// # Errors
///
/// Returns [`Error::HttpClient`] if the client fails to build.
pub fn dictionaries(config: &HttpConfig) -> Result<Dictionaries, Error> {
    let client = build_client(config)?;
    let pacing = Pacing::new(config.min_delay, config.max_delay);
    let fetcher = || Arc::new(HttpFetcher::with_client(client.clone()).with_pacing(pacing));

    Ok(Dictionaries::new(
        Arc::new(Cambridge::new(fetcher())),
        Arc::new(Oxford::new(fetcher())),
        Arc::new(MerriamWebster::new(fetcher())),
    ))
}
