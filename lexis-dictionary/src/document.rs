//! A thin query layer over a parsed HTML document.
//!
//! Extractors never talk to [`scraper`] directly. They go through [`Document`] and [`ElementExt`],
//! which take selectors as plain strings and turn every kind of absence (no match, missing
//! attribute, unparsable selector) into an empty result instead of an error.

use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

use crate::normalize::collapse_whitespace;

/// Parses `selector`, logging and discarding it if it's invalid.
fn selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(err) => {
            warn!(%selector, %err, "ignoring invalid selector");

            None
        }
    }
}

/// A parsed HTML page.
///
/// Parsing is lenient: malformed or truncated markup still produces a document, just with fewer
/// elements to find.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document.
    #[must_use]
    pub fn parse(html: &str) -> Document {
        Document {
            html: Html::parse_document(html),
        }
    }

    /// Returns the root `<html>` element.
    #[must_use]
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Returns every element in the document that matches `selector`, in document order.
    #[must_use]
    pub fn select(&self, selector: &str) -> Vec<ElementRef<'_>> {
        self::selector(selector)
            .map(|selector| self.html.select(&selector).collect())
            .unwrap_or_default()
    }

    /// Returns the first element in the document that matches `selector`.
    #[must_use]
    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = self::selector(selector)?;

        self.html.select(&selector).next()
    }

    /// Returns the text of the first element matching `selector`, if it has any.
    #[must_use]
    pub fn first_text(&self, selector: &str) -> Option<String> {
        self.select_first(selector)
            .map(|element| element.text_content())
            .filter(|text| !text.is_empty())
    }

    /// Returns the concatenated text of every element matching `selector`.
    #[must_use]
    pub fn joined_text(&self, selector: &str) -> Option<String> {
        let text: String = self
            .select(selector)
            .into_iter()
            .map(|element| element.text().collect::<String>())
            .collect();

        Some(collapse_whitespace(&text)).filter(|text| !text.is_empty())
    }

    /// Returns the non-empty text of each element matching `selector`.
    #[must_use]
    pub fn texts(&self, selector: &str) -> Vec<String> {
        self.select(selector)
            .into_iter()
            .map(|element| element.text_content())
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Returns whether at least one element matches `selector`.
    #[must_use]
    pub fn exists(&self, selector: &str) -> bool {
        self.select_first(selector).is_some()
    }
}

/// Query helpers for a single element and its subtree.
pub trait ElementExt<'a> {
    /// Returns all descendants matching `selector`, in document order.
    fn select_all(&self, selector: &str) -> Vec<ElementRef<'a>>;

    /// Returns the first descendant matching `selector`.
    fn select_first(&self, selector: &str) -> Option<ElementRef<'a>>;

    /// Returns descendants matching `selector` that aren't nested inside an element matching
    /// `boundary` (below `self`).
    ///
    /// This is how a sense collects its own examples without picking up the examples of its
    /// subsenses.
    fn select_within(&self, selector: &str, boundary: &str) -> Vec<ElementRef<'a>>;

    /// Returns the full descendant text with whitespace runs collapsed and the ends trimmed.
    fn text_content(&self) -> String;

    /// Returns only the text of direct text children, ignoring nested markup.
    fn own_text(&self) -> String;

    /// Returns the text of the first descendant matching `selector`, if non-empty.
    fn first_text(&self, selector: &str) -> Option<String>;

    /// Returns the concatenated text of every descendant matching `selector`, if non-empty.
    fn joined_text(&self, selector: &str) -> Option<String>;

    /// Returns the non-empty text of each descendant matching `selector`.
    fn texts(&self, selector: &str) -> Vec<String>;

    /// Returns the trimmed value of the attribute `name`, if present and non-empty.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Returns the closest element matching `selector`, starting with `self` and walking up.
    fn closest(&self, selector: &str) -> Option<ElementRef<'a>>;

    /// Returns the next sibling element.
    fn next_element(&self) -> Option<ElementRef<'a>>;

    /// Returns the previous sibling element.
    fn previous_element(&self) -> Option<ElementRef<'a>>;

    /// Returns the next sibling element, but only if it matches `selector`.
    fn next_matching(&self, selector: &str) -> Option<ElementRef<'a>>;

    /// Returns the previous sibling element, but only if it matches `selector`.
    fn previous_matching(&self, selector: &str) -> Option<ElementRef<'a>>;

    /// Returns the first sibling element in document order, excluding `self`.
    fn first_sibling(&self) -> Option<ElementRef<'a>>;

    /// Returns direct children matching `selector`.
    fn children_matching(&self, selector: &str) -> Vec<ElementRef<'a>>;

    /// Returns whether `self` matches `selector`.
    fn matches(&self, selector: &str) -> bool;

    /// Returns whether `self` has the class `class`.
    fn has_class(&self, class: &str) -> bool;

    /// Returns the element serialized back to HTML, including itself.
    fn outer_html(&self) -> String;
}

impl<'a> ElementExt<'a> for ElementRef<'a> {
    fn select_all(&self, selector: &str) -> Vec<ElementRef<'a>> {
        self::selector(selector)
            .map(|selector| self.select(&selector).collect())
            .unwrap_or_default()
    }

    fn select_first(&self, selector: &str) -> Option<ElementRef<'a>> {
        let selector = self::selector(selector)?;

        self.select(&selector).next()
    }

    fn select_within(&self, selector: &str, boundary: &str) -> Vec<ElementRef<'a>> {
        let Some(boundary) = self::selector(boundary) else {
            return self.select_all(selector);
        };
        let scope = self.id();

        self.select_all(selector)
            .into_iter()
            .filter(|element| {
                !element
                    .ancestors()
                    .take_while(|ancestor| ancestor.id() != scope)
                    .filter_map(ElementRef::wrap)
                    .any(|ancestor| boundary.matches(&ancestor))
            })
            .collect()
    }

    fn text_content(&self) -> String {
        collapse_whitespace(&self.text().collect::<String>())
    }

    fn own_text(&self) -> String {
        let text: String = self
            .children()
            .filter_map(|node| match node.value() {
                Node::Text(text) => Some(&**text),
                _ => None,
            })
            .collect();

        collapse_whitespace(&text)
    }

    fn first_text(&self, selector: &str) -> Option<String> {
        self.select_first(selector)
            .map(|element| element.text_content())
            .filter(|text| !text.is_empty())
    }

    fn joined_text(&self, selector: &str) -> Option<String> {
        let text: String = self
            .select_all(selector)
            .into_iter()
            .map(|element| element.text().collect::<String>())
            .collect();

        Some(collapse_whitespace(&text)).filter(|text| !text.is_empty())
    }

    fn texts(&self, selector: &str) -> Vec<String> {
        self.select_all(selector)
            .into_iter()
            .map(|element| element.text_content())
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value()
            .attr(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
    }

    fn closest(&self, selector: &str) -> Option<ElementRef<'a>> {
        let selector = self::selector(selector)?;

        std::iter::once(*self)
            .chain(self.ancestors().filter_map(ElementRef::wrap))
            .find(|element| selector.matches(element))
    }

    fn next_element(&self) -> Option<ElementRef<'a>> {
        self.next_siblings().find_map(ElementRef::wrap)
    }

    fn previous_element(&self) -> Option<ElementRef<'a>> {
        self.prev_siblings().find_map(ElementRef::wrap)
    }

    fn next_matching(&self, selector: &str) -> Option<ElementRef<'a>> {
        self.next_element().filter(|element| element.matches(selector))
    }

    fn previous_matching(&self, selector: &str) -> Option<ElementRef<'a>> {
        self.previous_element()
            .filter(|element| element.matches(selector))
    }

    fn first_sibling(&self) -> Option<ElementRef<'a>> {
        let parent = self.parent()?;
        let id = self.id();

        parent
            .children()
            .filter(|node| node.id() != id)
            .find_map(ElementRef::wrap)
    }

    fn children_matching(&self, selector: &str) -> Vec<ElementRef<'a>> {
        let Some(selector) = self::selector(selector) else {
            return Vec::new();
        };

        self.children()
            .filter_map(ElementRef::wrap)
            .filter(|element| selector.matches(element))
            .collect()
    }

    fn matches(&self, selector: &str) -> bool {
        self::selector(selector).is_some_and(|selector| selector.matches(self))
    }

    fn has_class(&self, class: &str) -> bool {
        self.value().classes().any(|name| name == class)
    }

    fn outer_html(&self) -> String {
        self.html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><body>
          <div class="entry" id="outer">
            <span class="pos">noun</span>
            <span class="def">first   <b>bold</b>
              definition</span>
            <div class="sense">
              <span class="x">outer example</span>
              <div class="subsense"><span class="x">inner example</span></div>
            </div>
            <span class="if">ran</span><span class="prt-a"><a class="play" data-file="run001">play</a></span>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_text_content_collapses_whitespace() {
        let document = Document::parse(HTML);

        assert_eq!(
            document.first_text(".def").as_deref(),
            Some("first bold definition")
        );
    }

    #[test]
    fn test_own_text_skips_nested_markup() {
        let document = Document::parse(HTML);
        let def = document.select_first(".def").unwrap();

        assert_eq!(def.own_text(), "first definition");
    }

    #[test]
    fn test_invalid_selector_yields_nothing() {
        let document = Document::parse(HTML);

        assert!(document.select("div[[").is_empty());
        assert!(document.select_first(":::").is_none());
        assert!(!document.exists("]]"));
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        let document = Document::parse("<div class='entry'><span class='pos'>verb<div");

        assert_eq!(document.first_text(".pos").as_deref(), Some("verb"));
        assert!(document.select(".missing").is_empty());
    }

    #[test]
    fn test_select_within_stops_at_boundary() {
        let document = Document::parse(HTML);
        let sense = document.select_first(".sense").unwrap();
        let own: Vec<String> = sense
            .select_within(".x", ".subsense")
            .iter()
            .map(ElementExt::text_content)
            .collect();

        assert_eq!(own, vec!["outer example"]);
        assert_eq!(sense.select_all(".x").len(), 2);
    }

    #[test]
    fn test_closest_includes_self() {
        let document = Document::parse(HTML);
        let sense = document.select_first(".sense").unwrap();

        assert_eq!(sense.closest(".sense").map(|e| e.id()), Some(sense.id()));
        assert_eq!(
            sense.closest(".entry").and_then(|e| e.attribute("id")),
            Some("outer".to_string())
        );
        assert!(sense.closest(".nowhere").is_none());
    }

    #[test]
    fn test_sibling_navigation() {
        let document = Document::parse(HTML);
        let play = document.select_first(".play").unwrap();
        let wrapper = play.closest(".prt-a").unwrap();

        assert_eq!(
            wrapper
                .previous_matching(".if")
                .map(|e| e.text_content())
                .as_deref(),
            Some("ran")
        );
        assert!(wrapper.previous_matching(".pos").is_none());
        assert!(wrapper.next_element().is_none());
    }

    #[test]
    fn test_attribute_ignores_blank_values() {
        let document = Document::parse(r#"<a class="x" href="  " data-file="f1">x</a>"#);
        let link = document.select_first("a").unwrap();

        assert_eq!(link.attribute("href"), None);
        assert_eq!(link.attribute("data-file").as_deref(), Some("f1"));
        assert_eq!(link.attribute("missing"), None);
        assert!(link.has_class("x"));
    }
}
