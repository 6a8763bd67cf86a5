use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// One of the supported upstream dictionaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// The Cambridge Dictionary (dictionary.cambridge.org).
    Cambridge,
    /// The Oxford Learner's Dictionaries (oxfordlearnersdictionaries.com).
    Oxford,
    /// The Merriam-Webster dictionary (merriam-webster.com).
    MerriamWebster,
}

impl Source {
    /// Every source, in the default lookup order.
    pub const ALL: [Source; 3] = [Source::Cambridge, Source::Oxford, Source::MerriamWebster];

    /// Returns the key used for the source in URLs and responses.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Source::Cambridge => "cambridge",
            Source::Oxford => "oxford",
            Source::MerriamWebster => "merriam-webster",
        }
    }

    /// Returns the human-readable name of the dictionary.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Source::Cambridge => "Cambridge",
            Source::Oxford => "Oxford",
            Source::MerriamWebster => "Merriam-Webster",
        }
    }

    /// Returns the origin that relative links on the source's pages resolve against.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Source::Cambridge => "https://dictionary.cambridge.org",
            Source::Oxford => "https://www.oxfordlearnersdictionaries.com",
            Source::MerriamWebster => "https://www.merriam-webster.com",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cambridge" => Ok(Source::Cambridge),
            "oxford" => Ok(Source::Oxford),
            "merriam-webster" | "merriamwebster" => Ok(Source::MerriamWebster),
            _ => Err(Error::UnknownSource(s.to_owned())),
        }
    }
}
