//! The source-specific response schema.
//!
//! Every source keeps as much of its own structure as it can: Cambridge groups definitions by
//! part of speech, Oxford nests senses, and Merriam-Webster numbers homonyms and senses. A
//! [`DictionaryResponse`] is one of the three, serialized without a tag so the JSON is exactly the
//! source's own shape.

use serde::Serialize;

use crate::{LookupResponse, Source, cambridge, merriam_webster, oxford};

/// A response in the schema of the source it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DictionaryResponse {
    Cambridge(cambridge::Response),
    Oxford(oxford::Response),
    MerriamWebster(merriam_webster::Response),
}

impl DictionaryResponse {
    /// Returns the source the response came from.
    #[must_use]
    pub const fn source(&self) -> Source {
        match self {
            DictionaryResponse::Cambridge(_) => Source::Cambridge,
            DictionaryResponse::Oxford(_) => Source::Oxford,
            DictionaryResponse::MerriamWebster(_) => Source::MerriamWebster,
        }
    }

    /// Returns the word the response is for.
    #[must_use]
    pub fn word(&self) -> &str {
        match self {
            DictionaryResponse::Cambridge(response) => &response.word,
            DictionaryResponse::Oxford(response) => &response.word,
            DictionaryResponse::MerriamWebster(response) => &response.word,
        }
    }
}

impl LookupResponse for DictionaryResponse {
    fn failed(source: Source, word: &str, message: String) -> Self {
        match source {
            Source::Cambridge => cambridge::Response::failed(word, message).into(),
            Source::Oxford => oxford::Response::failed(word, message).into(),
            Source::MerriamWebster => merriam_webster::Response::failed(word, message).into(),
        }
    }

    fn error(&self) -> Option<&str> {
        match self {
            DictionaryResponse::Cambridge(response) => response.error.as_deref(),
            DictionaryResponse::Oxford(response) => response.error.as_deref(),
            DictionaryResponse::MerriamWebster(response) => response.error.as_deref(),
        }
    }

    fn entry_count(&self) -> usize {
        match self {
            DictionaryResponse::Cambridge(response) => response.entries.len(),
            DictionaryResponse::Oxford(response) => response.entries.len(),
            DictionaryResponse::MerriamWebster(response) => response.entries.len(),
        }
    }
}

impl From<cambridge::Response> for DictionaryResponse {
    fn from(response: cambridge::Response) -> Self {
        DictionaryResponse::Cambridge(response)
    }
}

impl From<oxford::Response> for DictionaryResponse {
    fn from(response: oxford::Response) -> Self {
        DictionaryResponse::Oxford(response)
    }
}

impl From<merriam_webster::Response> for DictionaryResponse {
    fn from(response: merriam_webster::Response) -> Self {
        DictionaryResponse::MerriamWebster(response)
    }
}
