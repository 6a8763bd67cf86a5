use serde::{Deserialize, Serialize};

use crate::Source;

/// A lookup result from the Oxford Learner's Dictionaries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The word that was looked up.
    pub word: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
    /// Always [`Source::Oxford`].
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub(crate) fn failed(word: &str, message: String) -> Response {
        Response {
            word: word.to_owned(),
            entries: vec![],
            source: Source::Oxford,
            error: Some(message),
        }
    }
}

/// A single `.entry` block of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// The headword followed by the 1-based position of the block, e.g. `do-1`.
    pub id: String,
    pub word: String,
    pub lexical_entries: Vec<LexicalEntry>,
    /// Always `en`.
    pub language: String,
}

/// The senses of an entry for one part of speech.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalEntry {
    /// The headword.
    pub text: String,
    pub lexical_category: Tag,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grammatical_features: Vec<GrammaticalFeature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub etymologies: Vec<Etymology>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pronunciations: Vec<Pronunciation>,
    pub senses: Vec<Sense>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variant_forms: Vec<VariantForm>,
    /// Idioms listed with the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phrases: Vec<Phrase>,
}

/// A label together with an identifier derived from it, e.g. `phrasal_verb` for
/// `phrasal verb`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub text: String,
}

/// Grammatical feature such as countability (nouns) or transitivity (verbs).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammaticalFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// The "Word Origin" box of an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Etymology {
    pub text: String,
    /// The language the word was taken from, e.g. `Latin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// The period of the earliest form, e.g. `Old English`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// A phonetic transcription and the recording matched to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pronunciation {
    pub phonetic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// `British English`, `American English` or `Unknown`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A meaning of the headword, possibly refined by subsenses.
///
/// # HTML Source
///
/// Senses are `.sense` elements, and subsenses are `.subsense` (or nested `.sense`) elements
/// inside them. Every field is collected from the sense's own markup only, so a subsense's
/// examples never show up on its parent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub registers: Vec<Register>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_references: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsenses: Vec<Sense>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A register label, e.g. `informal`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// One of `formal`, `informal`, `slang`, `literary`, `humorous`, `technical` or `other`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The label as printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantForm {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}
