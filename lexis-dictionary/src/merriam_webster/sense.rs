//! Sense numbers and definitions.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::types::{Definition, Example, Label, SenseNumber};
use crate::document::ElementExt;

static MAIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)").expect("invalid regex"));

static SUB_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)([a-z])").expect("invalid regex"));

static SUB_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("invalid regex"));

/// Containers of example sentences, in the order they're read.
const EXAMPLES: [&str; 4] = [
    ".in-sentences",
    ".examples li",
    ".freshness-examples li",
    ".example-sentences .t",
];

fn capture(regex: &Regex, text: &str, group: usize) -> Option<String> {
    regex
        .captures(text)
        .and_then(|captures| captures.get(group))
        .map(|capture| capture.as_str().to_owned())
}

impl SenseNumber {
    /// Decomposes a label such as `1a(2)`, or returns `None` for a blank label.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexis_dictionary::merriam_webster::SenseNumber;
    ///
    /// let number = SenseNumber::parse("1a(2)").unwrap();
    ///
    /// assert_eq!(number.main, "1");
    /// assert_eq!(number.sub_letter.as_deref(), Some("a"));
    /// assert_eq!(number.sub_number.as_deref(), Some("2"));
    /// assert_eq!(number.full_form, "1a(2)");
    /// ```
    #[must_use]
    pub fn parse(label: &str) -> Option<SenseNumber> {
        let label = label.trim();

        if label.is_empty() {
            return None;
        }

        Some(SenseNumber {
            main: capture(&MAIN, label, 1).unwrap_or_else(|| label.to_owned()),
            sub_letter: capture(&SUB_LETTER, label, 2),
            sub_number: capture(&SUB_NUMBER, label, 1),
            full_form: label.to_owned(),
        })
    }
}

/// Extracts the example sentences under `element`.
#[must_use]
pub fn examples(element: &ElementRef<'_>) -> Vec<Example> {
    let mut examples = vec![];

    for selector in EXAMPLES {
        for example in element.select_all(selector) {
            let text = example.text_content();

            if text.is_empty() {
                continue;
            }

            examples.push(Example {
                text,
                attribution: example.joined_text(".quote-author, .freshness-example-cite"),
                kind: example
                    .closest(".freshness-tab")
                    .and_then(|tab| tab.attribute("data-tab")),
            });
        }
    }

    examples
}

fn labels(item: &ElementRef<'_>) -> Vec<Label> {
    [
        ("subject", ".subject-label"),
        ("register", ".usage-label"),
        ("grammar", ".gram-label"),
    ]
    .into_iter()
    .filter_map(|(kind, selector)| {
        Some(Label {
            kind: kind.to_owned(),
            text: item.joined_text(selector)?,
        })
    })
    .collect()
}

/// Extracts a `.vg-sseq-entry-item`, or `None` if it has no definition text.
#[must_use]
pub fn definition(item: &ElementRef<'_>) -> Option<Definition> {
    let text = item.joined_text(".sb-entry")?;

    Some(Definition {
        sense_number: item
            .select_first(".vg-sseq-entry-item-label")
            .and_then(|label| SenseNumber::parse(&label.text_content())),
        text,
        examples: examples(item),
        usage_notes: item.texts(".usage-note"),
        labels: labels(item),
        synonyms: item.texts(".synonyms-list li"),
        antonyms: item.texts(".antonyms-list li"),
    })
}

/// Extracts every definition under `element`.
#[must_use]
pub fn definitions(element: &ElementRef<'_>) -> Vec<Definition> {
    element
        .select_all(".vg-sseq-entry-item")
        .iter()
        .filter_map(definition)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_sense_number_parts() {
        let number = SenseNumber::parse("2b").unwrap();

        assert_eq!(number.main, "2");
        assert_eq!(number.sub_letter.as_deref(), Some("b"));
        assert_eq!(number.sub_number, None);

        let number = SenseNumber::parse(" 10 ").unwrap();

        assert_eq!(number.main, "10");
        assert_eq!(number.full_form, "10");
    }

    #[test]
    fn test_sense_number_without_leading_digits() {
        let number = SenseNumber::parse("b(1)").unwrap();

        assert_eq!(number.main, "b(1)");
        assert_eq!(number.sub_letter, None);
        assert_eq!(number.sub_number.as_deref(), Some("1"));
        assert_eq!(number.full_form, "b(1)");
        assert_eq!(SenseNumber::parse("  "), None);
    }

    #[test]
    fn test_definition() {
        let document = Document::parse(
            r#"<div class="vg-sseq-entry-item">
                 <div class="vg-sseq-entry-item-label">1a</div>
                 <span class="sb-entry"><span class="dtText">: to go faster than a walk</span></span>
                 <span class="usage-label">chiefly British</span>
                 <span class="in-sentences">ran to catch the bus</span>
                 <div class="freshness-tab" data-tab="recent">
                   <ul class="freshness-examples"><li>She runs daily. <span class="freshness-example-cite">The Times</span></li></ul>
                 </div>
                 <ul class="synonyms-list"><li>sprint</li><li>dash</li></ul>
               </div>"#,
        );
        let item = document.select_first(".vg-sseq-entry-item").unwrap();
        let definition = definition(&item).unwrap();

        assert_eq!(definition.text, ": to go faster than a walk");
        assert_eq!(definition.sense_number.unwrap().sub_letter.as_deref(), Some("a"));
        assert_eq!(
            definition.labels,
            vec![Label {
                kind: String::from("register"),
                text: String::from("chiefly British"),
            }]
        );
        assert_eq!(
            definition.examples,
            vec![
                Example {
                    text: String::from("ran to catch the bus"),
                    attribution: None,
                    kind: None,
                },
                Example {
                    text: String::from("She runs daily. The Times"),
                    attribution: Some(String::from("The Times")),
                    kind: Some(String::from("recent")),
                },
            ]
        );
        assert_eq!(definition.synonyms, vec!["sprint", "dash"]);
        assert!(definition.antonyms.is_empty());
    }

    #[test]
    fn test_definition_requires_text() {
        let document = Document::parse(
            r#"<div class="vg-sseq-entry-item"><div class="vg-sseq-entry-item-label">1</div>
               <span class="sb-entry"> </span></div>"#,
        );
        let item = document.select_first(".vg-sseq-entry-item").unwrap();

        assert_eq!(definition(&item), None);
    }
}
