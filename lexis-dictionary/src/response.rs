use serde::Serialize;

use crate::Source;

/// Behaviour shared by the response types of both schemas.
///
/// Lookups never fail with an `Err`; a failure is a response with no entries and an error
/// message, built through [`LookupResponse::failed`].
pub trait LookupResponse: Serialize + Send + Sized + 'static {
    /// Builds an error-shaped response for `word` from `source`.
    fn failed(source: Source, word: &str, message: String) -> Self;

    /// Returns the error message, if the lookup failed or found nothing.
    fn error(&self) -> Option<&str>;

    /// Returns the number of entries in the response.
    fn entry_count(&self) -> usize;
}

/// The error every source reports when a page yields no entries and no better explanation.
pub(crate) const NO_DEFINITIONS: &str = "No definitions found";
