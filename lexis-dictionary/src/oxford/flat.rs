//! The flat schema for Oxford pages.

use scraper::ElementRef;

use crate::document::{Document, ElementExt};
use crate::normalize::{absolute_url, same_word};
use crate::response::NO_DEFINITIONS;
use crate::v1::{AudioData, Definition, DictionaryResponse, Entry};
use crate::Source;

fn audio(element: &ElementRef<'_>) -> Option<AudioData> {
    let recording = |region: &str| {
        element
            .select_first(&format!(".sound.audio_play_button.pron-{region}.icon-audio"))
            .and_then(|audio| audio.attribute("data-src-mp3"))
            .map(|url| absolute_url(Source::Oxford.base_url(), &url))
    };

    AudioData::new(recording("uk"), recording("us"))
}

fn definition(sense: &ElementRef<'_>, with_context: bool) -> Option<Definition> {
    Some(Definition {
        definition: sense.first_text(".def")?,
        examples: sense.texts(".x"),
        context: if with_context {
            sense.first_text(".cf")
        } else {
            None
        },
    })
}

fn synonyms(entry: &ElementRef<'_>) -> Vec<String> {
    let Some(text) = entry.joined_text(".synonyms") else {
        return vec![];
    };

    text.replace("Synonyms:", "")
        .split(',')
        .map(str::trim)
        .filter(|synonym| !synonym.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn idiom_entries(
    element: &ElementRef<'_>,
    headword: &str,
    page_audio: Option<&AudioData>,
) -> Vec<Entry> {
    let mut entries = vec![];

    for idiom in element.select_all(".idioms .idm-g") {
        let Some(phrase) = idiom.first_text(".idm") else {
            continue;
        };
        let definitions: Vec<Definition> = idiom
            .select_all(".sense")
            .iter()
            .filter_map(|sense| definition(sense, false))
            .collect();

        if definitions.is_empty() {
            continue;
        }

        entries.push(Entry {
            word: format!("{headword} ({phrase})"),
            phonetic: None,
            part_of_speech: Some(String::from("idiom")),
            definitions,
            synonyms: vec![],
            antonyms: vec![],
            audio: page_audio.cloned(),
        });
    }

    entries
}

/// Assembles the flat entries of an Oxford page.
///
/// Each `.entry` block contributes one entry per idiom it lists, followed by the block's own
/// entry when it has definitions. The response is named after the page's headword, which can
/// differ from the word that was looked up.
///
/// A page without entries whose headword is a different word is reported as a redirect, under
/// the word that was looked up.
#[must_use]
pub fn parse(document: &Document, word: &str) -> DictionaryResponse {
    let page_audio = audio(&document.root());
    let headword = document
        .first_text(".headword")
        .unwrap_or_else(|| word.to_owned());
    let mut entries = vec![];

    for element in document.select(".entry") {
        entries.extend(idiom_entries(&element, &headword, page_audio.as_ref()));

        let definitions: Vec<Definition> = element
            .select_within(".sense", ".idioms")
            .iter()
            .filter_map(|sense| definition(sense, true))
            .collect();

        if !definitions.is_empty() {
            entries.push(Entry {
                word: headword.clone(),
                phonetic: element.first_text(".phon"),
                part_of_speech: element.first_text(".pos"),
                definitions,
                synonyms: synonyms(&element),
                antonyms: vec![],
                audio: audio(&element).or_else(|| page_audio.clone()),
            });
        }
    }

    if !entries.is_empty() {
        return DictionaryResponse {
            word: headword,
            entries,
            source: Source::Oxford,
            audio: page_audio,
            error: None,
        };
    }

    let shown = document
        .first_text(".headword")
        .or_else(|| document.first_text(".h"));

    match shown {
        Some(shown) if !same_word(&shown, word) => DictionaryResponse {
            word: word.to_owned(),
            entries,
            source: Source::Oxford,
            audio: None,
            error: Some(format!(
                "No exact match found for \"{word}\". Oxford may have redirected to \"{shown}\"."
            )),
        },
        _ => DictionaryResponse {
            word: headword,
            entries,
            source: Source::Oxford,
            audio: page_audio,
            error: Some(NO_DEFINITIONS.to_owned()),
        },
    }
}
