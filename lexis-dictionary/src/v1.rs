//! The flat response schema shared by every source.
//!
//! Each source maps its own page structure onto the same small set of fields, which makes the
//! schema convenient for clients that don't care where a definition came from.

use serde::{Deserialize, Serialize};

use crate::{LookupResponse, Source};

/// The result of looking up a word in a single source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryResponse {
    /// The word that was looked up, or the headword the source resolved it to (Oxford).
    pub word: String,
    /// The extracted entries.
    #[serde(default)]
    pub entries: Vec<Entry>,
    /// The source the response came from.
    pub source: Source,
    /// The first UK and US recordings found anywhere on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioData>,
    /// Why no entries were returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A headword with one part of speech.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    pub definitions: Vec<Definition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioData>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    /// Extra context such as a grammar pattern (Oxford).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// UK and US pronunciation recordings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us: Option<String>,
}

impl AudioData {
    /// Returns `Some` if at least one recording is present.
    #[must_use]
    pub fn new(uk: Option<String>, us: Option<String>) -> Option<AudioData> {
        if uk.is_none() && us.is_none() {
            None
        } else {
            Some(AudioData { uk, us })
        }
    }
}

impl LookupResponse for DictionaryResponse {
    fn failed(source: Source, word: &str, message: String) -> Self {
        DictionaryResponse {
            word: word.to_owned(),
            entries: vec![],
            source,
            audio: None,
            error: Some(message),
        }
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
