//! Merriam-Webster (merriam-webster.com).

pub mod extract;
pub mod flat;
pub mod sense;
mod types;

pub use types::*;

/// The root under which Merriam-Webster serves its recordings.
pub const MEDIA_URL: &str = "https://media.merriam-webster.com/audio/prons";

/// The path under which entries are served.
pub const ENTRY_PATH: [&str; 1] = ["dictionary"];
