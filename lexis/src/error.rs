//! Error types

use miette::Diagnostic;
use thiserror::Error;

/// Application errors for configuration, HTTP client and server operations.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The configuration couldn't be loaded or didn't have the expected shape.
    #[error("Could not load configuration")]
    #[diagnostic(help("check the configuration file and the LEXIS_* environment variables"))]
    LoadConfig(#[source] Box<figment::Error>),
    /// Failed to create the HTTP client shared by the dictionaries.
    #[error("Could not create HTTP client")]
    HttpClient(#[source] lexis_dictionary::Error),
    /// Binding the listener failed for a reason other than the port being taken.
    #[error("Could not bind to {addr}")]
    Bind {
        /// The address that was tried.
        addr: String,
        /// Why binding failed.
        #[source]
        source: std::io::Error,
    },
    /// Every port in the range was already in use.
    #[error("Ports {first} through {last} are all in use")]
    #[diagnostic(help("free one of the ports or set server.port_attempts higher"))]
    NoFreePort {
        /// The first port that was tried.
        first: u16,
        /// The last port that was tried.
        last: u16,
    },
    /// The server stopped with an I/O error.
    #[error("Server error")]
    Serve(#[source] std::io::Error),
}
