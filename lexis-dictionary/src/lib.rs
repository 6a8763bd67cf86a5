//! Scrapers for the Cambridge, Oxford Learner's and Merriam-Webster dictionaries.
//!
//! Each source module turns an already fetched [`Document`] into structured entries, in one of two
//! shapes:
//!
//! - [`v1`]: a flat schema shared by every source.
//! - [`v2`]: a richer, source-specific schema.
//!
//! Extraction is synchronous and pure. Fetching lives behind the [`Fetch`] trait, with an HTTP
//! implementation available through the `client` feature, and the [`Dictionaries`] aggregator
//! fans lookups out to several sources at once.

// Allow repetition of structure name instead of replacing with self as the output from
// rust-analyzer becomes more readable
#![allow(clippy::use_self)]

pub mod aggregate;
pub mod cambridge;
#[cfg(feature = "client")]
pub mod client;
pub mod document;
mod error;
pub mod merriam_webster;
pub mod normalize;
pub mod oxford;
mod response;
pub mod service;
mod source;
pub mod v1;
pub mod v2;

pub use aggregate::{Aggregate, Dictionaries, InvalidSourcePolicy, parse_sources};
#[cfg(feature = "client")]
pub use client::{HttpFetcher, Pacing};
pub use document::{Document, ElementExt};
pub use error::Error;
pub use response::LookupResponse;
pub use service::{Fetch, LookupService};
pub use source::Source;
