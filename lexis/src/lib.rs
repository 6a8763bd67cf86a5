//! An HTTP API over the Cambridge, Oxford Learner's and Merriam-Webster dictionaries.

pub mod config;
pub mod consts;
mod error;
pub mod http;
pub mod server;
pub mod tracing;

pub use config::Config;
pub use error::Error;
