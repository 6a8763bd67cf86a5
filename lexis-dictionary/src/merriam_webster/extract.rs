//! Field extractors and the entry assembler for the source-specific schema.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::trace;

use super::sense::definitions;
use super::types::{
    Entry, Etymology, Example, PartOfSpeechSection, Pronunciation, RelatedPhrase, Response,
    WordForm,
};
use super::MEDIA_URL;
use crate::document::{Document, ElementExt};
use crate::normalize::non_empty;
use crate::response::NO_DEFINITIONS;
use crate::Source;

static ONCLICK_MP3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^'"\s]+\.mp3"#).expect("invalid regex"));

static ORIGIN_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+([A-Z][a-z]+)").expect("invalid regex"));

static FIRST_USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)first\s+known\s+use\s+in\s+(\d{4})").expect("invalid regex")
});

/// Returns the recording URL of a `.play-pron-v2` element.
///
/// The URL is read from `data-audio`, built from `data-lang`, `data-dir` and `data-file`, or
/// found in the `onclick` handler, in that order.
#[must_use]
pub fn audio_url(pron: &ElementRef<'_>) -> Option<String> {
    if let Some(url) = pron.attribute("data-audio") {
        return Some(url);
    }

    if let (Some(file), Some(dir)) = (pron.attribute("data-file"), pron.attribute("data-dir")) {
        let lang = pron
            .attribute("data-lang")
            .unwrap_or_else(|| String::from("en_us"))
            .replacen('_', "/", 1);

        return Some(format!("{MEDIA_URL}/{lang}/mp3/{dir}/{file}.mp3"));
    }

    pron.attribute("onclick")
        .and_then(|onclick| ONCLICK_MP3.find(&onclick).map(|url| url.as_str().to_owned()))
}

/// Extracts the pronunciation of a homonym and the recordings of its inflected forms.
#[must_use]
pub fn pronunciation(element: &ElementRef<'_>) -> Option<Pronunciation> {
    let prons = element.select_all(".play-pron-v2");
    let main = prons.first()?;
    let written = non_empty(main.own_text()).or_else(|| element.first_text(".mw, .if"))?;
    let mut recordings: Vec<(String, Option<String>)> = vec![];

    for pron in &prons {
        let Some(url) = audio_url(pron) else {
            continue;
        };
        let form = pron
            .closest(".prt-a")
            .and_then(|prt| prt.previous_matching(".if"))
            .and_then(|form| non_empty(form.text_content()));

        match recordings.iter_mut().find(|(existing, _)| *existing == url) {
            Some((_, existing_form)) => {
                if existing_form.is_none() {
                    *existing_form = form;
                }
            }
            None => recordings.push((url, form)),
        }
    }

    let word_forms = if recordings.len() > 1 {
        recordings
            .iter()
            .filter_map(|(url, form)| {
                Some(WordForm {
                    form: form.clone()?,
                    audio_url: url.clone(),
                })
            })
            .collect()
    } else {
        vec![]
    };

    Some(Pronunciation {
        audio_url: recordings.into_iter().next().map(|(url, _)| url),
        phonetic: element
            .joined_text(".ipa")
            .or_else(|| Some(written.clone())),
        written,
        word_forms,
    })
}

#[must_use]
pub fn etymology(element: &ElementRef<'_>) -> Option<Etymology> {
    let text = element.joined_text(".et")?;
    let capture = |regex: &Regex| {
        regex
            .captures(&text)
            .and_then(|captures| captures.get(1))
            .map(|capture| capture.as_str().to_owned())
    };

    Some(Etymology {
        language: capture(&ORIGIN_LANGUAGE),
        first_use: capture(&FIRST_USE),
        text,
    })
}

/// Extracts the phrases listed in the page's phrases section.
#[must_use]
pub fn related_phrases(document: &Document) -> Vec<RelatedPhrase> {
    document
        .select("#phrases .drp")
        .into_iter()
        .filter_map(|drp| {
            let phrase = non_empty(drp.text_content())?;
            let body = drp.next_matching(".vg")?;
            let definition = body.joined_text(".sb-entry")?;
            let examples = body
                .texts(".in-sentences")
                .into_iter()
                .map(|text| Example {
                    text,
                    attribution: None,
                    kind: None,
                })
                .collect();

            Some(RelatedPhrase {
                phrase,
                definition,
                examples,
            })
        })
        .collect()
}

/// Extracts the inflected forms of a homonym keyed by their label.
#[must_use]
pub fn other_forms(element: &ElementRef<'_>) -> BTreeMap<String, String> {
    element
        .select_all(".inflected-form")
        .into_iter()
        .filter_map(|form| Some((form.joined_text(".if-label")?, form.joined_text(".if")?)))
        .collect()
}

fn inflections(element: &ElementRef<'_>) -> Vec<String> {
    element
        .joined_text(".vg-ins")
        .map(|text| {
            text.split(';')
                .map(str::trim)
                .filter(|inflection| !inflection.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Returns the spellings Merriam-Webster suggests on a not-found page.
pub(crate) fn suggestions(document: &Document) -> Vec<String> {
    document.texts(".spelling-suggestions a")
}

pub(crate) fn empty_result_error(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        NO_DEFINITIONS.to_owned()
    } else {
        format!("Word not found. Did you mean: {}?", suggestions.join(", "))
    }
}

/// Assembles the homonyms of a Merriam-Webster page.
///
/// The phrases section belongs to the page rather than to a homonym, so it's attached to the
/// first entry only.
#[must_use]
pub fn parse(document: &Document, word: &str) -> Response {
    let mut entries = vec![];

    for (index, container) in document
        .select(".entry-word-section-container")
        .into_iter()
        .enumerate()
    {
        let homonym_number = index + 1;
        let Some(part_of_speech) = container.first_text(".important-blue-link") else {
            trace!(homonym_number, "skipping homonym without part of speech");
            continue;
        };

        let definitions = definitions(&container);

        if definitions.is_empty() {
            trace!(homonym_number, %part_of_speech, "skipping homonym without definitions");
            continue;
        }

        let section = PartOfSpeechSection {
            functional: part_of_speech
                .contains("verb")
                .then(|| part_of_speech.contains("auxiliary")),
            inflections: inflections(&container),
            definitions,
            part_of_speech: part_of_speech.clone(),
        };

        entries.push(Entry {
            word: word.to_owned(),
            homonym_number: Some(homonym_number),
            variety: container.joined_text(".language-label"),
            pronunciation: pronunciation(&container),
            functional_label: container
                .joined_text(".function-label")
                .filter(|label| *label != part_of_speech),
            part_of_speech_sections: vec![section],
            etymology: etymology(&container),
            first_known_use: container.joined_text(".first-known-date"),
            related_phrases: vec![],
            other_forms: other_forms(&container),
        });
    }

    if let Some(first) = entries.first_mut() {
        first.related_phrases = related_phrases(document);
    }

    let (error, suggestions) = if entries.is_empty() {
        let suggestions = suggestions(document);

        (Some(empty_result_error(&suggestions)), suggestions)
    } else {
        (None, vec![])
    };

    Response {
        word: word.to_owned(),
        entries,
        source: Source::MerriamWebster,
        error,
        suggestions,
    }
}
