//! Small text and URL helpers shared by the extractors.

/// Resolves a URL found in a page against the origin of the page's site.
///
/// Values starting with `http` are returned untouched, values starting with `/` are appended to
/// `base`, and anything else is returned as-is since there's no reliable base path to resolve it
/// against.
///
/// # Examples
///
/// ```
/// use lexis_dictionary::normalize::absolute_url;
///
/// let base = "https://dictionary.cambridge.org";
///
/// assert_eq!(absolute_url(base, "/media/a.mp3"), "https://dictionary.cambridge.org/media/a.mp3");
/// assert_eq!(absolute_url(base, "https://x.org/a.mp3"), "https://x.org/a.mp3");
/// assert_eq!(absolute_url(base, "media/a.mp3"), "media/a.mp3");
/// ```
#[must_use]
pub fn absolute_url(base: &str, url: &str) -> String {
    if url.starts_with("http") || !url.starts_with('/') {
        url.to_owned()
    } else {
        format!("{base}{url}")
    }
}

/// Turns a label into a lowercase identifier where every character outside `[a-z0-9]` is
/// replaced by an underscore.
#[must_use]
pub fn slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Collapses every run of whitespace into a single space and trims both ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns `Some(text)` unless `text` is empty.
pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

/// Compares two words ignoring case.
pub(crate) fn same_word(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Appends `value` to `values` unless it's already present.
pub(crate) fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.oxfordlearnersdictionaries.com";

    #[test]
    fn test_absolute_url_prefixes_root_relative_paths() {
        for path in ["/", "/a", "/media/english/uk_pron/d/do_/do__gb/do__gb_1.mp3"] {
            assert_eq!(absolute_url(BASE, path), format!("{BASE}{path}"));
        }
    }

    #[test]
    fn test_absolute_url_keeps_absolute_urls() {
        for url in [
            "https://media.merriam-webster.com/audio/prons/en/us/mp3/r/run00001.mp3",
            "http://example.com/",
        ] {
            assert_eq!(absolute_url(BASE, url), url);
        }
    }

    #[test]
    fn test_absolute_url_leaves_bare_relative_paths() {
        assert_eq!(absolute_url(BASE, "sound.mp3"), "sound.mp3");
        assert_eq!(absolute_url(BASE, ""), "");
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Phrasal verb"), "phrasal_verb");
        assert_eq!(slug("North American"), "north_american");
        assert_eq!(slug("sport-2"), "sport_2");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_same_word() {
        assert!(same_word("Jog", "jog"));
        assert!(same_word("Éclair", "éclair"));
        assert!(!same_word("jog", "jogg"));
    }

    #[test]
    fn test_push_unique() {
        let mut values = vec![String::from("a")];

        push_unique(&mut values, String::from("a"));
        push_unique(&mut values, String::from("b"));

        assert_eq!(values, vec!["a", "b"]);
    }
}
