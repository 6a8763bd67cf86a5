//! The Cambridge Dictionary (dictionary.cambridge.org).

pub mod extract;
pub mod flat;
mod types;

pub use types::*;

/// The path under which English entries are served.
pub const ENTRY_PATH: [&str; 2] = ["dictionary", "english"];
