//! Lookups across several sources at once.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::service::{Cambridge, Fetch, LookupService, MerriamWebster, Oxford};
use crate::{LookupResponse, Source, v1, v2};

/// The combined result of looking a word up in several sources.
#[derive(Clone, Debug, Serialize)]
pub struct Aggregate<R> {
    /// The word that was looked up.
    pub word: String,
    /// One response per source, in the order the sources were requested.
    pub results: Vec<R>,
    /// The sources that were queried.
    pub sources: Vec<Source>,
}

/// What to do when a list of requested sources names an unknown source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidSourcePolicy {
    /// Drop the unknown names and query the remaining sources.
    #[default]
    KeepValid,
    /// Query every source as soon as one name is unknown.
    FallbackToAll,
}

/// Parses a comma-separated list of source names.
///
/// Names are trimmed and matched case-insensitively, and duplicates are dropped. A missing list,
/// or one that leaves no known source, selects every source.
///
/// # Examples
///
/// ```
/// use lexis_dictionary::{InvalidSourcePolicy, Source, parse_sources};
///
/// let sources = parse_sources(Some("oxford, bogus"), InvalidSourcePolicy::KeepValid);
/// assert_eq!(sources, vec![Source::Oxford]);
///
/// let sources = parse_sources(Some("oxford, bogus"), InvalidSourcePolicy::FallbackToAll);
/// assert_eq!(sources, Source::ALL);
/// ```
#[must_use]
pub fn parse_sources(param: Option<&str>, policy: InvalidSourcePolicy) -> Vec<Source> {
    let Some(param) = param else {
        return Source::ALL.to_vec();
    };

    let mut sources = Vec::with_capacity(Source::ALL.len());
    let mut unknown = false;

    for name in param.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        match name.parse::<Source>() {
            Ok(source) if !sources.contains(&source) => sources.push(source),
            Ok(_) => {}
            Err(err) => {
                debug!(%err, "ignoring requested source");
                unknown = true;
            }
        }
    }

    if sources.is_empty() || (unknown && policy == InvalidSourcePolicy::FallbackToAll) {
        return Source::ALL.to_vec();
    }

    sources
}

/// The set of lookup services, one per source.
#[derive(Clone)]
pub struct Dictionaries {
    cambridge: Arc<dyn LookupService>,
    oxford: Arc<dyn LookupService>,
    merriam_webster: Arc<dyn LookupService>,
}

impl Dictionaries {
    /// Constructs a set from the given services.
    #[must_use]
    pub fn new(
        cambridge: Arc<dyn LookupService>,
        oxford: Arc<dyn LookupService>,
        merriam_webster: Arc<dyn LookupService>,
    ) -> Dictionaries {
        Dictionaries {
            cambridge,
            oxford,
            merriam_webster,
        }
    }

    /// Constructs a set where every service fetches the public sites through `fetcher`.
    #[must_use]
    pub fn from_fetcher(fetcher: &Arc<dyn Fetch>) -> Dictionaries {
        Dictionaries::new(
            Arc::new(Cambridge::new(fetcher.clone())),
            Arc::new(Oxford::new(fetcher.clone())),
            Arc::new(MerriamWebster::new(fetcher.clone())),
        )
    }

    /// Returns the service for `source`.
    #[must_use]
    pub fn service(&self, source: Source) -> &Arc<dyn LookupService> {
        match source {
            Source::Cambridge => &self.cambridge,
            Source::Oxford => &self.oxford,
            Source::MerriamWebster => &self.merriam_webster,
        }
    }

    /// Looks `word` up in `source` and returns the flat schema.
    pub async fn lookup_v1(&self, source: Source, word: &str) -> v1::DictionaryResponse {
        self.service(source).lookup_v1(word).await
    }

    /// Looks `word` up in `source` and returns the source-specific schema.
    pub async fn lookup_v2(&self, source: Source, word: &str) -> v2::DictionaryResponse {
        self.service(source).lookup_v2(word).await
    }

    /// Looks `word` up in every source in `sources` concurrently, in the flat schema.
    ///
    /// An empty list queries every source.
    pub async fn lookup_multiple_v1(
        &self,
        word: &str,
        sources: &[Source],
    ) -> Aggregate<v1::DictionaryResponse> {
        self.fan_out(word, sources, |service, word| async move {
            service.lookup_v1(&word).await
        })
        .await
    }

    /// Looks `word` up in every source in `sources` concurrently, in the source-specific schema.
    ///
    /// An empty list queries every source.
    pub async fn lookup_multiple_v2(
        &self,
        word: &str,
        sources: &[Source],
    ) -> Aggregate<v2::DictionaryResponse> {
        self.fan_out(word, sources, |service, word| async move {
            service.lookup_v2(&word).await
        })
        .await
    }

    /// Runs `lookup` for each source on its own task and collects the responses in order.
    ///
    /// A task that panics is reported as an error-shaped response for its source.
    async fn fan_out<R, F, Fut>(&self, word: &str, sources: &[Source], lookup: F) -> Aggregate<R>
    where
        R: LookupResponse,
        F: Fn(Arc<dyn LookupService>, String) -> Fut,
        Fut: Future<Output = R> + Send + 'static,
    {
        let sources = if sources.is_empty() {
            Source::ALL.to_vec()
        } else {
            sources.to_vec()
        };

        debug!(%word, ?sources, "looking up word");

        let tasks = sources
            .iter()
            .map(|&source| tokio::spawn(lookup(self.service(source).clone(), word.to_owned())));

        let results = join_all(tasks)
            .await
            .into_iter()
            .zip(&sources)
            .map(|(result, &source)| match result {
                Ok(response) => response,
                Err(err) => {
                    error!(%source, %word, %err, "lookup task failed");

                    R::failed(source, word, format!("lookup task failed: {err}"))
                }
            })
            .collect();

        Aggregate {
            word: word.to_owned(),
            results,
            sources,
        }
    }
}
