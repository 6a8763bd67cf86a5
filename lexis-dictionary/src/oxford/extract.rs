//! Field extractors and the entry assembler for the source-specific schema.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::trace;

use super::audio;
use super::types::{
    Entry, Etymology, Example, GrammaticalFeature, LexicalEntry, Phrase, Register, Response,
    Sense, Tag, VariantForm,
};
use crate::document::{Document, ElementExt};
use crate::normalize::{non_empty, same_word, slug};
use crate::response::NO_DEFINITIONS;
use crate::Source;

/// Elements that start a nested sense. Fields of a sense are never read from inside these.
const NESTED_SENSE: &str = ".sense, .subsense";

/// Register labels in the order they're checked.
const REGISTERS: [&str; 6] = [
    "informal",
    "formal",
    "slang",
    "literary",
    "humorous",
    "technical",
];

static ORIGIN_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+([A-Z][a-z]+)(?:\s|,|\.|$)").expect("invalid regex"));

static ORIGIN_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Old|Middle|Late|Modern|Ancient)\s+[A-Z][a-z]+").expect("invalid regex")
});

/// Returns the part-of-speech elements of an entry, leaving out those nested in another one.
fn part_of_speech_elements<'a>(entry: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    const POS: &str = "h2.pos-header, span.pos, [hclass='pos']";

    entry.select_within(POS, POS)
}

/// Reads the lexical category of a part-of-speech element.
#[must_use]
pub fn lexical_category(pos: &ElementRef<'_>) -> Option<Tag> {
    let text = pos
        .joined_text(".pos")
        .or_else(|| non_empty(pos.text_content()))?;

    Some(Tag {
        id: slug(&text),
        text,
    })
}

/// Derives countability (nouns) or transitivity (verbs) from the grammar labels of an entry.
#[must_use]
pub fn grammatical_features(category: &str, grammar: Option<&str>) -> Vec<GrammaticalFeature> {
    let Some(grammar) = grammar.map(str::to_lowercase) else {
        return vec![];
    };

    let feature = |kind: &str, value: &str| GrammaticalFeature {
        kind: kind.to_owned(),
        value: value.to_owned(),
    };

    let found = match category.to_lowercase().as_str() {
        "noun" => [
            ("countability", "uncountable"),
            ("countability", "countable"),
            ("number", "singular"),
            ("number", "plural"),
        ]
        .into_iter()
        .find(|(_, value)| grammar.contains(value)),
        "verb" => [
            ("transitivity", "intransitive"),
            ("transitivity", "transitive"),
        ]
        .into_iter()
        .find(|(_, value)| grammar.contains(value)),
        _ => None,
    };

    found
        .map(|(kind, value)| vec![feature(kind, value)])
        .unwrap_or_default()
}

/// Extracts the "Word Origin" box of an entry.
#[must_use]
pub fn etymology(entry: &ElementRef<'_>) -> Option<Etymology> {
    let text = entry.joined_text(r#".unbox[unbox="wordorigin"] .body"#)?;
    let language = ORIGIN_LANGUAGE
        .captures(&text)
        .and_then(|captures| captures.get(1))
        .map(|language| language.as_str().to_owned());
    let period = ORIGIN_PERIOD
        .find(&text)
        .map(|period| period.as_str().to_owned());

    Some(Etymology {
        text,
        language,
        period,
    })
}

/// Extracts the idioms listed with an entry.
#[must_use]
pub fn phrases(entry: &ElementRef<'_>) -> Vec<Phrase> {
    entry
        .select_all(".idioms .idm-g")
        .into_iter()
        .filter_map(|group| {
            Some(Phrase {
                text: group.joined_text(".idm")?,
                explanation: group.joined_text(".def"),
            })
        })
        .collect()
}

#[must_use]
pub fn variant_forms(entry: &ElementRef<'_>) -> Vec<VariantForm> {
    entry
        .select_all(".variants")
        .into_iter()
        .filter_map(|variants| {
            Some(VariantForm {
                text: non_empty(variants.text_content())?,
                notes: variants.texts(".label"),
            })
        })
        .collect()
}

fn examples(sense: &ElementRef<'_>) -> Vec<Example> {
    let examples = sense
        .select_within(".x", NESTED_SENSE)
        .into_iter()
        .filter_map(|example| {
            Some(Example {
                text: non_empty(example.text_content())?,
                source: example.joined_text(".cf"),
                notes: example.joined_text(".label"),
            })
        });
    let extra = sense
        .select_within(".collapse .unx", NESTED_SENSE)
        .into_iter()
        .filter_map(|example| {
            Some(Example {
                text: non_empty(example.text_content())?,
                source: None,
                notes: None,
            })
        });

    examples.chain(extra).collect()
}

fn registers(sense: &ElementRef<'_>) -> Vec<Register> {
    let mut registers = vec![];

    for label in sense
        .select_within(".grammar, .labels", NESTED_SENSE)
        .into_iter()
        .filter_map(|label| non_empty(label.text_content()))
    {
        let lower = label.to_lowercase();

        if let Some(kind) = REGISTERS.iter().find(|kind| lower.contains(*kind)) {
            registers.push(Register {
                kind: (*kind).to_owned(),
                notes: Some(label),
            });
        } else if registers.is_empty() && (lower.contains("used") || lower.contains("style")) {
            registers.push(Register {
                kind: String::from("other"),
                notes: Some(label),
            });
        }
    }

    registers
}

fn tags(sense: &ElementRef<'_>, selector: &str) -> Vec<Tag> {
    sense
        .select_within(selector, NESTED_SENSE)
        .into_iter()
        .filter_map(|element| non_empty(element.text_content()))
        .map(|text| Tag {
            id: slug(&text),
            text,
        })
        .collect()
}

fn texts_within(sense: &ElementRef<'_>, selector: &str) -> Vec<String> {
    sense
        .select_within(selector, NESTED_SENSE)
        .into_iter()
        .filter_map(|element| non_empty(element.text_content()))
        .collect()
}

fn synonyms(sense: &ElementRef<'_>) -> Vec<String> {
    texts_within(sense, r#".unbox[unbox="synonyms"] .body .unbox"#)
        .into_iter()
        .filter(|text| text != "example")
        .flat_map(|text| {
            text.split('▪')
                .map(str::trim)
                .filter(|synonym| !synonym.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Extracts a sense along with its subsenses, or `None` if it has no definition.
#[must_use]
pub fn sense(element: &ElementRef<'_>) -> Option<Sense> {
    let definition = element
        .select_within(".def", NESTED_SENSE)
        .first()
        .and_then(|definition| non_empty(definition.text_content()))?;

    Some(Sense {
        definition,
        examples: examples(element),
        registers: registers(element),
        notes: texts_within(element, ".note"),
        domains: tags(element, ".domain"),
        regions: tags(element, ".region"),
        cross_references: texts_within(element, ".xrefs a"),
        subsenses: element
            .select_within(NESTED_SENSE, NESTED_SENSE)
            .iter()
            .filter_map(sense)
            .collect(),
        synonyms: synonyms(element),
    })
}

/// Extracts the top-level senses under `scope`, skipping those that belong to idioms.
#[must_use]
pub fn senses(scope: &ElementRef<'_>) -> Vec<Sense> {
    scope
        .select_within(".sense", ".sense, .subsense, .idioms")
        .iter()
        .filter_map(sense)
        .collect()
}

/// Builds the error for a page that yielded no entries, naming the suggested word if the page
/// offers one.
pub(crate) fn empty_result_error(document: &Document, word: &str) -> String {
    match document.first_text(".result-header a") {
        Some(suggestion) if !same_word(&suggestion, word) => {
            format!("No exact match found for \"{word}\". Did you mean \"{suggestion}\"?")
        }
        _ => NO_DEFINITIONS.to_owned(),
    }
}

/// Assembles the entries of an Oxford Learner's Dictionaries page.
#[must_use]
pub fn parse(document: &Document, word: &str) -> Response {
    let not_found = document
        .select(".result-header")
        .iter()
        .any(|header| header.text_content().contains("did not match"));

    if not_found {
        return Response::failed(word, format!("No entries found for \"{word}\""));
    }

    let mut entries = vec![];

    for (index, element) in document
        .select(".entry, [hclass='entry']")
        .into_iter()
        .enumerate()
    {
        let headword = element
            .first_text(".webtop .headword, [hclass='headword']")
            .unwrap_or_else(|| word.to_owned());
        let pronunciations = audio::pronunciations(&element);
        let etymologies: Vec<Etymology> = etymology(&element).into_iter().collect();
        let phrases = phrases(&element);
        let variant_forms = variant_forms(&element);
        let grammar = element.joined_text(".grammar");
        let mut lexical_entries = vec![];

        for pos in part_of_speech_elements(&element) {
            let Some(category) = lexical_category(&pos) else {
                continue;
            };

            let scope = pos
                .closest(".top-g")
                .and_then(|top| top.first_sibling())
                .unwrap_or(element);
            let senses = senses(&scope);

            if senses.is_empty() {
                trace!(%headword, category = %category.text, "skipping category without senses");
                continue;
            }

            lexical_entries.push(LexicalEntry {
                text: headword.clone(),
                grammatical_features: grammatical_features(&category.text, grammar.as_deref()),
                lexical_category: category,
                etymologies: etymologies.clone(),
                pronunciations: pronunciations.clone(),
                senses,
                variant_forms: variant_forms.clone(),
                phrases: phrases.clone(),
            });
        }

        if lexical_entries.is_empty() {
            trace!(%headword, "skipping entry without senses");
            continue;
        }

        entries.push(Entry {
            id: format!("{headword}-{}", index + 1),
            word: headword,
            lexical_entries,
            language: String::from("en"),
        });
    }

    let error = if entries.is_empty() {
        Some(empty_result_error(document, word))
    } else {
        None
    };

    Response {
        word: word.to_owned(),
        entries,
        source: Source::Oxford,
        error,
    }
}
