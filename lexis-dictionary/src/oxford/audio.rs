//! Pairing of recordings with the phonetic transcriptions they pronounce.
//!
//! An Oxford page lists its recordings and transcriptions separately, and a verb page like `do`
//! carries recordings for several inflected forms. Each transcription is matched against the
//! collected [`Candidates`] by trying a sequence of [`MatchTier`]s in order, stopping at the first
//! one that finds a recording.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::trace;

use super::types::Pronunciation;
use crate::document::ElementExt;
use crate::normalize::{absolute_url, non_empty, push_unique};
use crate::Source;

/// Elements that group a transcription with its recordings and labels.
const CONTAINER: &str = ".pron-g, .phons_br, .phons_n_am";

/// Transcriptions that identify a form of `do` on their own.
const IPA_FORMS: &[(&str, &[&str])] = &[
    ("/duː/", &["do", "does"]),
    ("/dʌz/", &["does"]),
    ("/dɪd/", &["did"]),
    ("/dʌn/", &["done"]),
    ("ˈduːɪŋ", &["doing"]),
];

/// Extracts the form name from a recording path, e.g. `does` from `.../does__gb_2.mp3`.
static FORM_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/([a-z]+)(?:__|\w*?)_(?:gb|us)").expect("invalid regex"));

/// Finds a recording URL in markup when the attribute can't be read directly.
static MP3_IN_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)data-src-mp3=["']?([^"'\s>]+)"#).expect("invalid regex")
});

/// The accent of a recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    British,
    American,
    Unknown,
}

impl Variant {
    /// Returns the label used in responses.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Variant::British => "British English",
            Variant::American => "American English",
            Variant::Unknown => "Unknown",
        }
    }
}

/// A recording found on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub variant: Variant,
    /// The first transcription in the recording's container.
    pub phonetic: Option<String>,
    /// The word form the recording pronounces, if it can be told.
    pub form_hint: Option<String>,
}

/// The recordings of an entry, split by accent.
///
/// Recordings of unknown accent are kept with the British ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Candidates {
    pub uk: Vec<Candidate>,
    pub us: Vec<Candidate>,
}

impl Candidates {
    /// Collects the recordings under `element`.
    #[must_use]
    pub fn collect(element: &ElementRef<'_>) -> Candidates {
        let mut found = vec![];

        for audio in element.select_all(".sound.audio_play_button.icon-audio") {
            let Some(raw) = audio
                .attribute("data-src-mp3")
                .or_else(|| mp3_in_markup(&audio.outer_html()))
            else {
                trace!("skipping recording without a source");
                continue;
            };

            let variant = if audio.has_class("pron-uk") {
                Variant::British
            } else if audio.has_class("pron-us") {
                Variant::American
            } else {
                Variant::Unknown
            };
            let container = audio.closest(CONTAINER);
            let candidate = Candidate {
                url: absolute_url(Source::Oxford.base_url(), &raw),
                variant,
                phonetic: container.and_then(|container| container.first_text(".phon")),
                form_hint: form_in_url(&raw),
            };

            found.push((candidate, container.map(|container| container.text_content())));
        }

        // Recordings whose path names no form borrow one from the text around them, using the
        // forms named by the other recordings as vocabulary
        let mut forms = vec![];

        for form in found.iter().filter_map(|(candidate, _)| candidate.form_hint.clone()) {
            push_unique(&mut forms, form);
        }

        let mut candidates = Candidates::default();

        for (mut candidate, context) in found {
            if candidate.form_hint.is_none() {
                candidate.form_hint = context.and_then(|text| detect_form(&text, &forms));
            }

            match candidate.variant {
                Variant::American => candidates.us.push(candidate),
                Variant::British | Variant::Unknown => candidates.uk.push(candidate),
            }
        }

        candidates
    }

    /// Returns the distinct form hints of all recordings.
    #[must_use]
    pub fn forms(&self) -> Vec<String> {
        let mut forms = vec![];

        for form in self
            .uk
            .iter()
            .chain(&self.us)
            .filter_map(|candidate| candidate.form_hint.clone())
        {
            push_unique(&mut forms, form);
        }

        forms
    }

    /// Returns whether there are no recordings at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uk.is_empty() && self.us.is_empty()
    }
}

/// The accent a transcription is marked with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Uk,
    Us,
    /// Not marked, so recordings of either accent may be used.
    Either,
}

impl Region {
    const fn variant(self) -> Variant {
        match self {
            Region::Uk => Variant::British,
            Region::Us => Variant::American,
            Region::Either => Variant::Unknown,
        }
    }
}

/// A transcription to find a recording for.
#[derive(Clone, Copy, Debug)]
pub struct Transcription<'t> {
    pub phonetic: &'t str,
    /// The position of the transcription among all transcriptions of the entry.
    pub index: usize,
    pub region: Region,
    /// The word form named next to the transcription, if any.
    pub form: Option<&'t str>,
}

/// The heuristic that produced a match, in the order they are tried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchTier {
    /// The form named next to the transcription matches the form of a recording.
    FormHint,
    /// The transcription is a known pronunciation of a form of `do`.
    IpaPattern,
    /// The transcription equals the one next to a recording.
    ExactPhonetic,
    /// The recording at the same position as the transcription, wrapping around.
    Positional,
    /// The first recording of the page.
    FirstAvailable,
}

/// A recording chosen for a transcription.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioMatch {
    pub url: String,
    pub variant: Variant,
    pub tier: MatchTier,
}

impl AudioMatch {
    fn new(candidate: &Candidate, variant: Variant, tier: MatchTier) -> AudioMatch {
        AudioMatch {
            url: candidate.url.clone(),
            variant,
            tier,
        }
    }
}

/// Chooses the recording for `transcription`, or `None` if there are no recordings.
#[must_use]
pub fn resolve(candidates: &Candidates, transcription: &Transcription<'_>) -> Option<AudioMatch> {
    let lists: Vec<&[Candidate]> = match transcription.region {
        Region::Uk => vec![candidates.uk.as_slice()],
        Region::Us => vec![candidates.us.as_slice()],
        Region::Either => vec![candidates.uk.as_slice(), candidates.us.as_slice()],
    };

    if let Some(form) = transcription.form {
        let found = lists
            .iter()
            .flat_map(|list| list.iter())
            .find(|candidate| candidate.form_hint.as_deref() == Some(form));

        if let Some(candidate) = found {
            return Some(AudioMatch::new(candidate, candidate.variant, MatchTier::FormHint));
        }
    }

    let pattern = IPA_FORMS
        .iter()
        .find(|(ipa, _)| transcription.phonetic.contains(ipa));

    if let (Some((_, forms)), Some(list)) = (pattern, lists.first()) {
        let found = list.iter().find(|candidate| {
            candidate
                .form_hint
                .as_deref()
                .is_some_and(|hint| forms.contains(&hint))
        });

        if let Some(candidate) = found {
            return Some(AudioMatch::new(candidate, candidate.variant, MatchTier::IpaPattern));
        }
    }

    let found = lists
        .iter()
        .flat_map(|list| list.iter())
        .find(|candidate| candidate.phonetic.as_deref() == Some(transcription.phonetic));

    if let Some(candidate) = found {
        return Some(AudioMatch::new(candidate, candidate.variant, MatchTier::ExactPhonetic));
    }

    let primary = match transcription.region {
        Region::Uk => &candidates.uk,
        Region::Us => &candidates.us,
        Region::Either if candidates.uk.is_empty() => &candidates.us,
        Region::Either => &candidates.uk,
    };
    let positional = transcription
        .index
        .checked_rem(primary.len())
        .and_then(|index| primary.get(index));

    if let Some(candidate) = positional {
        let variant = match transcription.region {
            Region::Either => candidate.variant,
            region => region.variant(),
        };

        return Some(AudioMatch::new(candidate, variant, MatchTier::Positional));
    }

    if let Some(candidate) = candidates.uk.first() {
        Some(AudioMatch::new(candidate, Variant::British, MatchTier::FirstAvailable))
    } else {
        candidates
            .us
            .first()
            .map(|candidate| AudioMatch::new(candidate, Variant::American, MatchTier::FirstAvailable))
    }
}

/// Extracts every transcription under `element` along with its matched recording.
#[must_use]
pub fn pronunciations(element: &ElementRef<'_>) -> Vec<Pronunciation> {
    let candidates = Candidates::collect(element);
    let forms = candidates.forms();

    element
        .select_all(".phon")
        .into_iter()
        .enumerate()
        .filter_map(|(index, phon)| {
            let phonetic = non_empty(phon.text_content())?;
            let container = phon.closest(CONTAINER);
            let region = region(&phonetic, container.as_ref());
            let form = container
                .as_ref()
                .and_then(|container| detect_form(&container.text_content(), &forms));
            let matched = resolve(
                &candidates,
                &Transcription {
                    phonetic: &phonetic,
                    index,
                    region,
                    form: form.as_deref(),
                },
            );

            if let Some(matched) = &matched {
                trace!(%phonetic, tier = ?matched.tier, url = %matched.url, "matched recording");
            }

            let variant = matched
                .as_ref()
                .map_or(region.variant(), |matched| matched.variant);

            Some(Pronunciation {
                audio_url: matched.map(|matched| matched.url),
                variant: Some(variant.label().to_owned()),
                notes: container.and_then(|container| container.joined_text(".label")),
                phonetic,
            })
        })
        .collect()
}

/// Determines which accent a transcription belongs to from its text and its container.
fn region(phonetic: &str, container: Option<&ElementRef<'_>>) -> Region {
    let marked = |label: &str, recording: &str, class: &str| {
        phonetic.contains(label)
            || container.is_some_and(|container| {
                container.has_class(class) || container.select_first(recording).is_some()
            })
    };

    if marked("BrE", ".pron-uk", "phons_br") {
        Region::Uk
    } else if marked("NAmE", ".pron-us", "phons_n_am") {
        Region::Us
    } else {
        Region::Either
    }
}

fn form_in_url(url: &str) -> Option<String> {
    FORM_IN_URL
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|form| form.as_str().to_lowercase())
}

fn mp3_in_markup(html: &str) -> Option<String> {
    MP3_IN_MARKUP
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|url| url.as_str().to_owned())
}

/// Returns the longest of `forms` that appears in `text` as a whole word.
fn detect_form(text: &str, forms: &[String]) -> Option<String> {
    let text = text.to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    forms
        .iter()
        .filter(|form| words.contains(&form.as_str()))
        .max_by_key(|form| form.len())
        .cloned()
}
