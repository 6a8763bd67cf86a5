//! An HTTP implementation of [`Fetch`].
//!
//! The dictionaries are public websites, not APIs, so requests are made to look like they come
//! from a browser: every request carries a randomly chosen user agent and language preference,
//! and consecutive requests through the same fetcher are spaced out by a random delay.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::IndexedRandom;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{ClientBuilder, redirect::Policy};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

use crate::{Error, Fetch};

/// User agents of common desktop and mobile browsers.
const USER_AGENTS: [&str; 8] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36 Edg/110.0.1587.63",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/110.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_3_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; SM-S901B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (iPad; CPU OS 16_3_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Mobile/15E148 Safari/604.1",
];

const ACCEPT_LANGUAGES: [&str; 7] = [
    "en-US,en;q=0.9",
    "en-GB,en;q=0.9",
    "en-CA,en;q=0.9",
    "en-AU,en;q=0.9",
    "en;q=0.9",
    "en-US,en;q=0.8,fr;q=0.5",
    "en-GB,en;q=0.8,de;q=0.5",
];

/// Headers sent with every request.
const STATIC_HEADERS: [(&str, &str); 8] = [
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    ),
    ("dnt", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
    ("cache-control", "max-age=0"),
];

/// The maximum number of redirects to follow. Oxford's direct search answers with a redirect to
/// the entry.
const MAX_REDIRECTS: usize = 10;

/// The bounds of the random delay between two consecutive requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    min_delay: Duration,
    max_delay: Duration,
}

impl Pacing {
    /// Constructs a pacing that waits between `min_delay` and `max_delay`. Bounds given in the
    /// wrong order are swapped.
    #[must_use]
    pub fn new(min_delay: Duration, max_delay: Duration) -> Pacing {
        Pacing {
            min_delay: min_delay.min(max_delay),
            max_delay: max_delay.max(min_delay),
        }
    }

    /// A pacing that never waits.
    #[must_use]
    pub const fn none() -> Pacing {
        Pacing {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Returns how long to wait before the next request, given the time since the previous one.
    fn delay(&self, since_previous: Option<Duration>) -> Duration {
        let Some(elapsed) = since_previous else {
            return Duration::ZERO;
        };

        let target = if self.min_delay == self.max_delay {
            self.min_delay
        } else {
            rand::rng().random_range(self.min_delay..=self.max_delay)
        };

        target.saturating_sub(elapsed)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::new(Duration::from_secs(2), Duration::from_secs(5))
    }
}

/// Fetches pages over HTTP with browser-like headers.
///
/// Requests made through the same fetcher are serialized and spaced out according to its
/// [`Pacing`]. Use one fetcher per source to pace each source independently.
#[derive(Debug)]
pub struct HttpFetcher {
    /// The underlying [`reqwest::Client`] used for making HTTP requests.
    client: reqwest::Client,
    pacing: Pacing,
    /// When the previous request was sent.
    previous: Mutex<Option<Instant>>,
}

impl HttpFetcher {
    /// Attempts to construct a new `HttpFetcher` with default settings.
    ///
    /// The client is configured with gzip support, a 30-second timeout and a limited number of
    /// redirects.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::BuildClient`] if the underlying `reqwest` client fails to build.
    pub fn try_new() -> Result<HttpFetcher, Error> {
        let client = builder(Duration::from_secs(30))
            .build()
            .map_err(Error::BuildClient)?;

        Ok(HttpFetcher::with_client(client))
    }

    /// Constructs an `HttpFetcher` using a pre-configured `reqwest::Client`.
    ///
    /// This is useful for sharing a connection pool between the fetchers of several sources.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> HttpFetcher {
        HttpFetcher {
            client,
            pacing: Pacing::default(),
            previous: Mutex::new(None),
        }
    }

    /// Replaces the pacing of the fetcher.
    #[must_use]
    pub const fn with_pacing(mut self, pacing: Pacing) -> HttpFetcher {
        self.pacing = pacing;
        self
    }

    /// Waits until the next request may be sent.
    ///
    /// The lock is held while waiting, which queues concurrent requests behind each other.
    async fn pace(&self) {
        let mut previous = self.previous.lock().await;
        let delay = self.pacing.delay(previous.map(|instant| instant.elapsed()));

        if !delay.is_zero() {
            trace!(?delay, "pacing request");
            tokio::time::sleep(delay).await;
        }

        *previous = Some(Instant::now());
    }
}

/// Returns a [`ClientBuilder`] configured the way the fetchers expect.
#[must_use]
pub fn builder(timeout: Duration) -> ClientBuilder {
    ClientBuilder::new()
        .gzip(true)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .timeout(timeout)
}

/// Returns the headers of a single request, with a random user agent and language preference.
fn headers() -> HeaderMap {
    let mut rng = rand::rng();
    let mut headers = HeaderMap::with_capacity(STATIC_HEADERS.len() + 2);

    for (name, value) in STATIC_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    if let Some(user_agent) = USER_AGENTS.choose(&mut rng) {
        headers.insert(header::USER_AGENT, HeaderValue::from_static(*user_agent));
    }

    if let Some(language) = ACCEPT_LANGUAGES.choose(&mut rng) {
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(*language));
    }

    headers
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        self.pace().await;

        trace!(%url, "fetching page");

        let request = self.client.get(url).headers(headers());
        let response = request.send().await.map_err(Error::Request)?;

        match response.error_for_status() {
            Ok(response) => response.text().await.map_err(Error::Request),
            Err(err) => Err(Error::Request(err)),
        }
    }
}
