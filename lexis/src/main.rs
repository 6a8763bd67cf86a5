use argh::FromArgs;
use miette::WrapErr;
use tracing::{trace, warn};

use lexis::{Config, consts, http, server};

/// Serves dictionary lookups over HTTP.
#[derive(Debug, FromArgs)]
struct Opts {
    /// path to config file
    #[argh(option, default = "String::from(consts::DEFAULT_CONFIG_PATH)")]
    config: String,
    /// port to listen on, overriding the configuration
    #[argh(option)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Parse command-line arguments
    let opts: Opts = argh::from_env();
    let mut config = Config::load(&opts.config)?;

    if let Some(port) = opts.port {
        config.server.port = port;
    }

    // Initialize logging
    lexis::tracing::try_init(&config.tracing)?;

    trace!(?config, "Loaded config");

    let dictionaries = http::dictionaries(&config.http)?;

    let err = server::serve(&config.server, dictionaries)
        .await
        .wrap_err("Serving the dictionary api");

    warn!("The server stopped");

    err
}
