//! The flat schema for Cambridge pages.

use scraper::ElementRef;

use super::extract::empty_result_error;
use crate::document::{Document, ElementExt};
use crate::normalize::absolute_url;
use crate::v1::{AudioData, Definition, DictionaryResponse, Entry};
use crate::Source;

/// Returns the first UK and US recordings under `element`.
fn audio(element: &ElementRef<'_>) -> Option<AudioData> {
    let recording = |region: &str| {
        element
            .select_first(&format!(r#"source[src*="/{region}_pron/"]"#))
            .and_then(|source| source.attribute("src"))
            .map(|src| absolute_url(Source::Cambridge.base_url(), &src))
    };

    AudioData::new(recording("uk"), recording("us"))
}

fn definitions(block: &ElementRef<'_>) -> Vec<Definition> {
    block
        .select_all(".def-block")
        .into_iter()
        .filter_map(|def_block| {
            Some(Definition {
                definition: def_block.first_text(".def.ddef_d.db")?,
                examples: def_block.texts(".examp.dexamp"),
                context: None,
            })
        })
        .collect()
}

/// Assembles the flat entries of a Cambridge dictionary page.
///
/// Every part-of-speech block with at least one definition becomes an entry. Entries without
/// recordings of their own fall back to the first recordings on the page.
#[must_use]
pub fn parse(document: &Document, word: &str) -> DictionaryResponse {
    let page_audio = audio(&document.root());
    let mut entries = vec![];

    for block in document.select(".entry-body__el") {
        let definitions = definitions(&block);

        if definitions.is_empty() {
            continue;
        }

        entries.push(Entry {
            word: word.to_owned(),
            phonetic: block.first_text(".dpron-i .pron.dpron"),
            part_of_speech: block.first_text(".pos.dpos"),
            definitions,
            synonyms: vec![],
            antonyms: vec![],
            audio: audio(&block).or_else(|| page_audio.clone()),
        });
    }

    let error = if entries.is_empty() {
        Some(empty_result_error(document, word))
    } else {
        None
    };

    DictionaryResponse {
        word: word.to_owned(),
        entries,
        source: Source::Cambridge,
        audio: page_audio,
        error,
    }
}
