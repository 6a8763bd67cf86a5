use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Source;

/// A lookup result from Merriam-Webster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The word that was looked up.
    pub word: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
    /// Always [`Source::MerriamWebster`].
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Spellings offered by Merriam-Webster when the word wasn't found.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Response {
    pub(crate) fn failed(word: &str, message: String) -> Response {
        Response {
            word: word.to_owned(),
            entries: vec![],
            source: Source::MerriamWebster,
            error: Some(message),
            suggestions: vec![],
        }
    }
}

/// A homonym, i.e. one of the numbered same-spelling headwords of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub word: String,
    /// The 1-based position of the homonym on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homonym_number: Option<usize>,
    /// A variety label such as `British`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<Pronunciation>,
    /// A label such as `trademark`, when it differs from the part of speech.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functional_label: Option<String>,
    pub part_of_speech_sections: Vec<PartOfSpeechSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology: Option<Etymology>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_known_use: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_phrases: Vec<RelatedPhrase>,
    /// Inflected forms keyed by their label, e.g. `plural` → `runs`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other_forms: BTreeMap<String, String>,
}

/// The written pronunciation of a homonym and its recordings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pronunciation {
    /// The pronunciation in Merriam-Webster's own respelling, e.g. `ˈrən`.
    pub written: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    /// Recordings of inflected forms, e.g. `did` or `done`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub word_forms: Vec<WordForm>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordForm {
    pub form: String,
    pub audio_url: String,
}

/// The definitions of a homonym for its part of speech.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartOfSpeechSection {
    pub part_of_speech: String,
    /// For verbs, whether the verb is an auxiliary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functional: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inflections: Vec<String>,
    pub definitions: Vec<Definition>,
}

/// A hierarchical sense number such as `1a(2)`.
///
/// Only `full_form` is authoritative; the other parts are best-effort readings of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenseNumber {
    /// The leading number, or the whole label when it doesn't start with one.
    pub main: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_number: Option<String>,
    /// The label exactly as printed.
    pub full_form: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense_number: Option<SenseNumber>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usage_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub text: String,
    /// The author or publication quoted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    /// The tab the example was listed under, e.g. `literary` or `recent`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A subject, register or grammar label of a definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// One of `subject`, `register` or `grammar`.
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Etymology {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// The year of first known use, when the etymology mentions one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_use: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPhrase {
    pub phrase: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
}
