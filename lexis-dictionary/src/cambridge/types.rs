use serde::{Deserialize, Serialize};

use crate::Source;

/// A lookup result from the Cambridge Dictionary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The word that was looked up.
    pub word: String,
    /// One entry per distinct headword on the page.
    #[serde(default)]
    pub entries: Vec<Entry>,
    /// Always [`Source::Cambridge`].
    pub source: Source,
    /// Why no entries were returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub(crate) fn failed(word: &str, message: String) -> Response {
        Response {
            word: word.to_owned(),
            entries: vec![],
            source: Source::Cambridge,
            error: Some(message),
        }
    }
}

/// A headword and all of its part-of-speech groups.
///
/// # HTML Source
///
/// Cambridge renders one `.entry-body__el` block per part of speech. Blocks whose headwords are
/// equal (ignoring case) are merged into a single entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// The headword, e.g. `run`.
    pub word: String,
    /// The pronunciation of the first block that had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<Pronunciation>,
    /// Definitions grouped by part of speech.
    pub def_groups: Vec<DefinitionGroup>,
    /// Spelling variants, without duplicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_forms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_phrases: Vec<RelatedPhrase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phrasal_verbs: Vec<RelatedPhrase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub idioms: Vec<RelatedPhrase>,
}

/// UK and US transcriptions and recordings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pronunciation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk_ipa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_ipa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk_audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_audio_url: Option<String>,
}

impl Pronunciation {
    /// Returns whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.uk_ipa.is_none()
            && self.us_ipa.is_none()
            && self.uk_audio_url.is_none()
            && self.us_audio_url.is_none()
    }
}

/// The definitions for one part of speech.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionGroup {
    /// The part of speech, e.g. `noun`.
    pub part_of_speech: String,
    pub definitions: Vec<Definition>,
    /// The CEFR level shown for the block as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_level: Option<Level>,
    /// Grammar codes such as `[ I ]` or `[ T ]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_note: Option<String>,
}

/// A single definition.
///
/// # HTML Source
///
/// Each definition comes from a `.def-block`, with the definition text itself in
/// `.def.ddef_d.db` and its examples in `.examp.dexamp`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// The subject area, e.g. `sport`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// The register, e.g. `informal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<String>,
    /// Usage labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_variation: Option<RegionVariation>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionVariation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us: Option<String>,
}

/// An example sentence and its translation, when the page is bilingual.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

/// A CEFR proficiency level, e.g. `B1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// The level code, `A1` through `C2`.
    pub code: String,
    /// The full text of the label the code was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An idiom, phrasal verb or other phrase listed with an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPhrase {
    pub phrase: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// An absolute link to the phrase's own page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}
