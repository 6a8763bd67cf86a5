//! Field extractors and the entry assembler for the source-specific schema.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::trace;

use super::types::{
    Definition, DefinitionGroup, Entry, Example, Level, Pronunciation, RegionVariation,
    RelatedPhrase, Response,
};
use crate::document::{Document, ElementExt};
use crate::normalize::{absolute_url, non_empty, push_unique, same_word};
use crate::response::NO_DEFINITIONS;
use crate::Source;

/// Matches a CEFR level code such as `B2`.
static CEFR_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ABCEFR][12]").expect("invalid regex"));

fn absolute(url: &str) -> String {
    absolute_url(Source::Cambridge.base_url(), url)
}

/// Returns the `src` of the first recording for `region` (`uk` or `us`) under `element`.
fn audio_url(element: &ElementRef<'_>, region: &str) -> Option<String> {
    element
        .select_first(&format!(r#".{region} source[src*="/{region}_pron/"]"#))
        .and_then(|source| source.attribute("src"))
        .map(|src| absolute(&src))
}

/// Extracts the UK and US transcriptions and recordings of a part-of-speech block.
#[must_use]
pub fn pronunciation(element: &ElementRef<'_>) -> Option<Pronunciation> {
    let pronunciation = Pronunciation {
        uk_ipa: element.first_text(".uk .pron.dpron"),
        us_ipa: element.first_text(".us .pron.dpron"),
        uk_audio_url: audio_url(element, "uk"),
        us_audio_url: audio_url(element, "us"),
    };

    if pronunciation.is_empty() {
        None
    } else {
        Some(pronunciation)
    }
}

/// Extracts the CEFR level from the level labels under `element`.
///
/// The labels of every match are concatenated and the first level code found in them wins.
#[must_use]
pub fn level(element: &ElementRef<'_>) -> Option<Level> {
    let text = element.joined_text(".dxref, .dgc")?;
    let code = CEFR_LEVEL.find(&text)?.as_str().to_owned();

    Some(Level {
        code,
        description: Some(text),
    })
}

/// Extracts the example sentences of a definition block, each with the translation that
/// immediately follows it, if any.
#[must_use]
pub fn examples(def_block: &ElementRef<'_>) -> Vec<Example> {
    def_block
        .select_all(".examp.dexamp")
        .into_iter()
        .filter_map(|example| {
            let text = non_empty(example.text_content())?;
            let translation = example
                .next_matching(".trans.dtrans")
                .and_then(|translation| non_empty(translation.text_content()));

            Some(Example { text, translation })
        })
        .collect()
}

/// Extracts the phrases in the blocks matching `selector`.
///
/// A phrase without a title or without a definition is skipped.
#[must_use]
pub fn related_phrases(element: &ElementRef<'_>, selector: &str) -> Vec<RelatedPhrase> {
    element
        .select_all(selector)
        .into_iter()
        .filter_map(|block| {
            let phrase = block.first_text(".phrase-title, .phr")?;
            let definition = block.first_text(".def.ddef_d")?;

            Some(RelatedPhrase {
                phrase,
                definition,
                example: block.first_text(".examp.dexamp"),
                link: block
                    .select_first("a")
                    .and_then(|link| link.attribute("href"))
                    .map(|href| absolute(&href)),
            })
        })
        .collect()
}

/// Extracts a single `.def-block`, or `None` if it has no definition text.
#[must_use]
pub fn definition(def_block: &ElementRef<'_>) -> Option<Definition> {
    let text = def_block.first_text(".def.ddef_d.db")?;
    let uk = def_block.joined_text(".uk .dvar");
    let us = def_block.joined_text(".us .dvar");
    let region_variation = if uk.is_some() || us.is_some() {
        Some(RegionVariation { uk, us })
    } else {
        None
    };

    Some(Definition {
        text,
        examples: examples(def_block),
        level: level(def_block),
        domain: def_block.joined_text(".domain.ddomain"),
        register: def_block.joined_text(".register.dreg"),
        grammar: def_block.joined_text(".gram.dgram"),
        labels: def_block.texts(".usage.dusage"),
        alternates: def_block.texts(".var.dvar"),
        region_variation,
    })
}

/// Extracts every definition block under `element`.
#[must_use]
pub fn definitions(element: &ElementRef<'_>) -> Vec<Definition> {
    element
        .select_all(".def-block")
        .iter()
        .filter_map(definition)
        .collect()
}

/// Builds the error for a page that yielded no entries.
///
/// Cambridge sometimes answers a misspelled word with the page of a different headword; when
/// that happens the error names it.
pub(crate) fn empty_result_error(document: &Document, word: &str) -> String {
    match document.first_text(".hw.dhw") {
        Some(headword) if !same_word(&headword, word) => format!(
            "No exact match found for \"{word}\". Cambridge may have redirected to \"{headword}\"."
        ),
        _ => NO_DEFINITIONS.to_owned(),
    }
}

/// Assembles the entries of a Cambridge dictionary page.
#[must_use]
pub fn parse(document: &Document, word: &str) -> Response {
    let mut entries: Vec<Entry> = Vec::new();

    for block in document.select(".entry-body__el") {
        let headword = block
            .first_text(".hw.dhw")
            .unwrap_or_else(|| word.to_owned());

        let Some(part_of_speech) = block.first_text(".pos.dpos") else {
            trace!(%headword, "skipping block without part of speech");
            continue;
        };

        let definitions = definitions(&block);

        if definitions.is_empty() {
            trace!(%headword, %part_of_speech, "skipping block without definitions");
            continue;
        }

        let group = DefinitionGroup {
            part_of_speech,
            definitions,
            group_level: level(&block),
            grammar_info: block.first_text(".gram.dgram"),
            region_note: block.first_text(".region.dregion"),
        };

        let index = if let Some(index) = entries
            .iter()
            .position(|entry| same_word(&entry.word, &headword))
        {
            index
        } else {
            entries.push(Entry {
                word: headword,
                pronunciation: None,
                def_groups: vec![],
                alternative_forms: vec![],
                related_phrases: vec![],
                phrasal_verbs: vec![],
                idioms: vec![],
            });

            entries.len() - 1
        };

        let entry = &mut entries[index];

        if entry.pronunciation.is_none() {
            entry.pronunciation = pronunciation(&block);
        }

        entry.def_groups.push(group);
        entry
            .idioms
            .extend(related_phrases(&block, ".idiom-block"));
        entry
            .phrasal_verbs
            .extend(related_phrases(&block, ".pv-block, .phrasal_verb-block"));
        entry
            .related_phrases
            .extend(related_phrases(&block, ".phrase-block"));

        for form in block.texts(".var.dvar") {
            push_unique(&mut entry.alternative_forms, form);
        }
    }

    let error = if entries.is_empty() {
        Some(empty_result_error(document, word))
    } else {
        None
    };

    Response {
        word: word.to_owned(),
        entries,
        source: Source::Cambridge,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> Document {
        Document::parse(include_str!("../../tests/fixtures/cambridge/run.html"))
    }

    #[test]
    fn test_merges_blocks_with_the_same_headword() {
        let response = parse(&run(), "run");

        assert_eq!(response.error, None);
        assert_eq!(response.entries.len(), 1);

        let entry = response.entries.first().unwrap();
        let parts: Vec<&str> = entry
            .def_groups
            .iter()
            .map(|group| group.part_of_speech.as_str())
            .collect();

        assert_eq!(entry.word, "run");
        assert_eq!(parts, vec!["verb", "noun"]);
        assert_eq!(entry.alternative_forms, vec!["runs", "run-out"]);
    }

    #[test]
    fn test_pronunciation() {
        let response = parse(&run(), "run");
        let pronunciation = response.entries[0].pronunciation.clone().unwrap();

        assert_eq!(pronunciation.uk_ipa.as_deref(), Some("/rʌn/"));
        assert_eq!(pronunciation.us_ipa.as_deref(), Some("/rʌn/"));
        assert_eq!(
            pronunciation.uk_audio_url.as_deref(),
            Some("https://dictionary.cambridge.org/media/english/uk_pron/u/ukr/ukrum/ukrum__025.mp3")
        );
        assert_eq!(
            pronunciation.us_audio_url.as_deref(),
            Some("https://dictionary.cambridge.org/media/english/us_pron/r/run/run__/run.mp3")
        );
    }

    #[test]
    fn test_definitions() {
        let response = parse(&run(), "run");
        let verb = &response.entries[0].def_groups[0];

        // The block with blank definition text is dropped
        assert_eq!(verb.definitions.len(), 2);
        assert_eq!(verb.grammar_info.as_deref(), Some("[ I ]"));
        assert_eq!(verb.group_level.as_ref().map(|l| l.code.as_str()), Some("A1"));

        let first = &verb.definitions[0];

        assert_eq!(first.level.as_ref().map(|l| l.code.as_str()), Some("A1"));
        assert_eq!(first.grammar.as_deref(), Some("[ I ]"));
        assert_eq!(
            first.examples,
            vec![
                Example {
                    text: String::from("I can run a mile in five minutes."),
                    translation: Some(String::from("Je peux courir un mile en cinq minutes.")),
                },
                Example {
                    text: String::from("She ran for the bus."),
                    translation: None,
                },
            ]
        );

        let second = &verb.definitions[1];

        assert_eq!(second.text, "to be in control of something");
        assert_eq!(second.domain.as_deref(), Some("business"));
        assert_eq!(second.labels, vec!["formal"]);
        assert_eq!(second.level.as_ref().map(|l| l.code.as_str()), Some("B1"));
    }

    #[test]
    fn test_noun_group() {
        let response = parse(&run(), "run");
        let noun = &response.entries[0].def_groups[1];

        assert_eq!(noun.grammar_info.as_deref(), Some("[ C ]"));
        assert_eq!(noun.region_note.as_deref(), Some("mainly UK"));

        let definition = &noun.definitions[0];

        assert_eq!(definition.register.as_deref(), Some("informal"));
        assert_eq!(definition.alternates, vec!["run-out"]);
    }

    #[test]
    fn test_related_phrases() {
        let response = parse(&run(), "run");
        let entry = &response.entries[0];

        assert_eq!(
            entry.phrasal_verbs,
            vec![RelatedPhrase {
                phrase: String::from("run into someone"),
                definition: String::from(
                    "to meet someone you know when you have not planned to meet them"
                ),
                example: Some(String::from("I ran into Joan at the supermarket.")),
                link: Some(String::from(
                    "https://dictionary.cambridge.org/dictionary/english/run-into"
                )),
            }]
        );
        assert_eq!(entry.related_phrases.len(), 1);
        assert_eq!(entry.related_phrases[0].phrase, "in the long run");
        assert_eq!(entry.related_phrases[0].link, None);
        // The idiom block has no definition
        assert!(entry.idioms.is_empty());
    }

    #[test]
    fn test_redirect_hint() {
        let document = Document::parse(include_str!("../../tests/fixtures/cambridge/jogg.html"));
        let response = parse(&document, "jogg");

        assert!(response.entries.is_empty());
        assert_eq!(
            response.error.as_deref(),
            Some("No exact match found for \"jogg\". Cambridge may have redirected to \"jog\".")
        );
    }

    #[test]
    fn test_same_headword_is_not_a_redirect() {
        let document = Document::parse(include_str!("../../tests/fixtures/cambridge/jogg.html"));
        let response = parse(&document, "JOG");

        assert_eq!(response.error.as_deref(), Some(NO_DEFINITIONS));
    }

    #[test]
    fn test_empty_page_reports_no_definitions() {
        let document = Document::parse(include_str!("../../tests/fixtures/cambridge/empty.html"));
        let response = parse(&document, "qwxz");

        assert!(response.entries.is_empty());
        assert_eq!(response.error.as_deref(), Some(NO_DEFINITIONS));
    }

    #[test]
    fn test_level_requires_a_code() {
        let document = Document::parse(r#"<div><span class="dxref">see also</span></div>"#);
        let div = document.select_first("div").unwrap();

        assert_eq!(level(&div), None);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let document = run();

        assert_eq!(parse(&document, "run"), parse(&document, "run"));
    }
}
