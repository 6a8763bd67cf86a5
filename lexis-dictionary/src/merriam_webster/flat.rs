//! The flat schema for Merriam-Webster pages.

use scraper::ElementRef;

use super::extract::{empty_result_error, pronunciation, suggestions};
use crate::document::{Document, ElementExt};
use crate::v1::{AudioData, Definition, DictionaryResponse, Entry};
use crate::Source;

/// Upper bound on the related-phrase entries added to a response.
const MAX_RELATED_PHRASES: usize = 10;

fn definitions(container: &ElementRef<'_>) -> Vec<Definition> {
    container
        .select_all(".vg-sseq-entry-item")
        .into_iter()
        .filter_map(|item| {
            let text = item.joined_text(".sb-entry")?;
            let definition = match item.joined_text(".vg-sseq-entry-item-label") {
                Some(number) => format!("{number}. {text}"),
                None => text,
            };

            Some(Definition {
                definition,
                examples: item.texts(".in-sentences"),
                context: None,
            })
        })
        .collect()
}

fn related_phrases(document: &Document, word: &str) -> Vec<Entry> {
    document
        .select("#related-phrases .related-phrases-list-item")
        .into_iter()
        .filter_map(|item| item.joined_text("a"))
        .filter(|phrase| phrase.contains(word))
        .take(MAX_RELATED_PHRASES)
        .map(|phrase| Entry {
            word: phrase,
            definitions: vec![Definition {
                definition: format!("Related phrase containing \"{word}\""),
                examples: vec![],
                context: None,
            }],
            ..Entry::default()
        })
        .collect()
}

/// Assembles the flat entries of a Merriam-Webster page.
///
/// Every homonym with a part of speech and definitions becomes an entry, followed by up to ten
/// entries for the related phrases that contain the word.
#[must_use]
pub fn parse(document: &Document, word: &str) -> DictionaryResponse {
    let mut entries = vec![];

    for container in document.select(".entry-word-section-container") {
        let Some(part_of_speech) = container.first_text(".important-blue-link") else {
            continue;
        };

        let definitions = definitions(&container);

        if definitions.is_empty() {
            continue;
        }

        let pronunciation = pronunciation(&container);

        entries.push(Entry {
            word: word.to_owned(),
            phonetic: pronunciation
                .as_ref()
                .and_then(|pronunciation| pronunciation.phonetic.clone()),
            part_of_speech: Some(part_of_speech),
            definitions,
            synonyms: container.texts(".synonyms-antonyms-grid-list li"),
            antonyms: vec![],
            audio: pronunciation
                .and_then(|pronunciation| pronunciation.audio_url)
                .and_then(|us| AudioData::new(None, Some(us))),
        });
    }

    let audio = entries.iter().find_map(|entry| entry.audio.clone());

    entries.extend(related_phrases(document, word));

    let error = if entries.is_empty() {
        Some(empty_result_error(&suggestions(document)))
    } else {
        None
    };

    DictionaryResponse {
        word: word.to_owned(),
        entries,
        source: Source::MerriamWebster,
        audio,
        error,
    }
}
