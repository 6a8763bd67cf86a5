use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use lexis_dictionary::{
    Dictionaries, Document, Error, Fetch, InvalidSourcePolicy, LookupResponse, Source, cambridge,
    merriam_webster, normalize, oxford, parse_sources, v2,
};
use serde_json::Value;

const CAMBRIDGE_RUN: &str = "https://dictionary.cambridge.org/dictionary/english/run";
const MERRIAM_WEBSTER_RUN: &str = "https://www.merriam-webster.com/dictionary/run";

/// Serves fixture pages by URL and fails every other request.
struct Fixtures(HashMap<&'static str, &'static str>);

impl Fixtures {
    fn run() -> Arc<dyn Fetch> {
        Arc::new(Fixtures(HashMap::from([
            (CAMBRIDGE_RUN, include_str!("fixtures/cambridge/run.html")),
            (
                MERRIAM_WEBSTER_RUN,
                include_str!("fixtures/merriam-webster/run.html"),
            ),
        ])))
    }
}

#[async_trait]
impl Fetch for Fixtures {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        self.0
            .get(url)
            .map(|html| (*html).to_owned())
            .ok_or_else(|| Error::Fetch {
                url: url.to_owned(),
                reason: String::from("connection refused"),
            })
    }
}

/// Returns the path of the first optional field that's present but empty.
fn find_empty_field(value: &Value, path: &str) -> Option<String> {
    match value {
        Value::Null => Some(path.to_owned()),
        Value::String(text) if text.is_empty() => Some(path.to_owned()),
        Value::Array(items) => {
            if items.is_empty() && !path.ends_with(".entries") {
                return Some(path.to_owned());
            }

            items
                .iter()
                .enumerate()
                .find_map(|(i, item)| find_empty_field(item, &format!("{path}[{i}]")))
        }
        Value::Object(fields) if fields.is_empty() => Some(path.to_owned()),
        Value::Object(fields) => fields
            .iter()
            .find_map(|(key, field)| find_empty_field(field, &format!("{path}.{key}"))),
        _ => None,
    }
}

#[test]
fn test_cambridge_blocks_become_entries() {
    let document = Document::parse(include_str!("fixtures/cambridge/run.html"));
    let response = cambridge::flat::parse(&document, "run");

    assert_eq!(response.entries[0].part_of_speech.as_deref(), Some("verb"));
    assert_eq!(response.entries[1].part_of_speech.as_deref(), Some("noun"));
    assert!(response.entries.iter().all(|entry| !entry.definitions.is_empty()));
}

#[test]
fn test_cambridge_redirect_is_reported() {
    let document = Document::parse(include_str!("fixtures/cambridge/jogg.html"));
    let response = cambridge::flat::parse(&document, "jogg");

    assert!(response.entries.is_empty());
    assert_eq!(
        response.error.as_deref(),
        Some("No exact match found for \"jogg\". Cambridge may have redirected to \"jog\".")
    );
}

#[test]
fn test_merriam_webster_suggestions() {
    let document = Document::parse(include_str!("fixtures/merriam-webster/flowr.html"));
    let response: v2::DictionaryResponse = merriam_webster::extract::parse(&document, "flowr").into();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["entries"], serde_json::json!([]));
    assert_eq!(json["error"], "Word not found. Did you mean: flower, flow?");
    assert_eq!(json["suggestions"], serde_json::json!(["flower", "flow"]));
    assert_eq!(json["source"], "merriam-webster");
}

#[test]
fn test_oxford_subsense_is_nested() {
    let document = Document::parse(include_str!("fixtures/oxford/do.html"));
    let response = oxford::extract::parse(&document, "do");
    let senses = &response.entries[0].lexical_entries[0].senses;
    let with_subsenses: Vec<_> = senses
        .iter()
        .filter(|sense| !sense.subsenses.is_empty())
        .collect();

    assert_eq!(with_subsenses.len(), 1);
    assert_eq!(with_subsenses[0].subsenses.len(), 1);

    let subsense = &with_subsenses[0].subsenses[0];

    assert_eq!(subsense.registers[0].kind, "formal");
    assert!(subsense.subsenses.is_empty());
}

#[test]
fn test_oxford_audio_matches_by_transcription() {
    let document = Document::parse(include_str!("fixtures/oxford/do-forms.html"));
    let response = oxford::extract::parse(&document, "do");
    let pronunciations = &response.entries[0].lexical_entries[0].pronunciations;

    assert_eq!(pronunciations.len(), 1);
    assert_eq!(
        pronunciations[0].audio_url.as_deref(),
        Some(
            "https://www.oxfordlearnersdictionaries.com/media/english/uk_pron/d/don/done_/done__gb_1.mp3"
        )
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let document = Document::parse(include_str!("fixtures/merriam-webster/run.html"));

    assert_eq!(
        merriam_webster::extract::parse(&document, "run"),
        merriam_webster::extract::parse(&document, "run")
    );
    assert_eq!(
        merriam_webster::flat::parse(&document, "run"),
        merriam_webster::flat::parse(&document, "run")
    );
}

#[test]
fn test_flat_responses_have_no_empty_fields() {
    let pages = [
        (include_str!("fixtures/cambridge/run.html"), Source::Cambridge),
        (include_str!("fixtures/oxford/do.html"), Source::Oxford),
        (include_str!("fixtures/merriam-webster/run.html"), Source::MerriamWebster),
    ];

    for (html, source) in pages {
        let document = Document::parse(html);
        let response = match source {
            Source::Cambridge => cambridge::flat::parse(&document, "run"),
            Source::Oxford => oxford::flat::parse(&document, "do"),
            Source::MerriamWebster => merriam_webster::flat::parse(&document, "run"),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(find_empty_field(&json, "$"), None, "{source}");
    }
}

#[test]
fn test_source_responses_have_no_empty_fields() {
    let pages = [
        (include_str!("fixtures/cambridge/run.html"), Source::Cambridge),
        (include_str!("fixtures/oxford/do.html"), Source::Oxford),
        (include_str!("fixtures/merriam-webster/run.html"), Source::MerriamWebster),
    ];

    for (html, source) in pages {
        let document = Document::parse(html);
        let response: v2::DictionaryResponse = match source {
            Source::Cambridge => cambridge::extract::parse(&document, "run").into(),
            Source::Oxford => oxford::extract::parse(&document, "do").into(),
            Source::MerriamWebster => merriam_webster::extract::parse(&document, "run").into(),
        };

        assert!(response.entry_count() > 0, "{source}");

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(find_empty_field(&json, "$"), None, "{source}");
    }
}

#[tokio::test]
async fn test_looked_up_responses_have_no_empty_fields() {
    let dictionaries = Dictionaries::from_fetcher(&Fixtures::run());
    let flat = dictionaries.lookup_multiple_v1("run", &[]).await;
    let by_source = dictionaries.lookup_multiple_v2("run", &[]).await;
    let responses = [
        serde_json::to_value(&flat).unwrap(),
        serde_json::to_value(&by_source).unwrap(),
    ];

    for json in responses {
        for (i, result) in json["results"].as_array().unwrap().iter().enumerate() {
            assert_eq!(find_empty_field(result, &format!("$.results[{i}]")), None);
        }
    }
}

#[test]
fn test_url_normalization() {
    let base = "https://dictionary.cambridge.org";

    assert_eq!(
        normalize::absolute_url(base, "/media/run.mp3"),
        "https://dictionary.cambridge.org/media/run.mp3"
    );
    assert_eq!(
        normalize::absolute_url(base, "https://example.org/run.mp3"),
        "https://example.org/run.mp3"
    );
}

#[tokio::test]
async fn test_unknown_source_keeps_valid_subset() {
    let dictionaries = Dictionaries::from_fetcher(&Fixtures::run());
    let sources = parse_sources(Some("cambridge,bogus"), InvalidSourcePolicy::KeepValid);
    let aggregate = dictionaries.lookup_multiple_v1("run", &sources).await;

    assert_eq!(aggregate.sources, vec![Source::Cambridge]);
    assert_eq!(aggregate.results.len(), 1);
    assert_eq!(aggregate.results[0].error, None);
}

#[tokio::test]
async fn test_unknown_source_falls_back_to_all() {
    let dictionaries = Dictionaries::from_fetcher(&Fixtures::run());
    let sources = parse_sources(Some("cambridge,bogus"), InvalidSourcePolicy::FallbackToAll);
    let aggregate = dictionaries.lookup_multiple_v2("run", &sources).await;
    let returned: Vec<Source> = aggregate.results.iter().map(v2::DictionaryResponse::source).collect();

    assert_eq!(aggregate.sources, Source::ALL);
    assert_eq!(returned, Source::ALL);
}

#[tokio::test]
async fn test_failing_source_is_isolated() {
    let dictionaries = Dictionaries::from_fetcher(&Fixtures::run());
    let aggregate = dictionaries.lookup_multiple_v2("run", &[]).await;
    let [cambridge, oxford, merriam_webster] = aggregate.results.as_slice() else {
        panic!("expected three results");
    };

    assert!(cambridge.error().is_none() && cambridge.entry_count() > 0);
    assert!(merriam_webster.error().is_none() && merriam_webster.entry_count() > 0);
    assert_eq!(oxford.entry_count(), 0);
    assert_eq!(
        oxford.error(),
        Some("Could not find Oxford definition for \"run\" using any known URL pattern")
    );

    let json = serde_json::to_value(&aggregate).unwrap();

    assert_eq!(json["word"], "run");
    assert_eq!(
        json["sources"],
        serde_json::json!(["cambridge", "oxford", "merriam-webster"])
    );
}
