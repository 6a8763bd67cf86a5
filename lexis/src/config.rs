use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use lexis_dictionary::InvalidSourcePolicy;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Error, consts};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Outgoing HTTP request configuration
    pub http: HttpConfig,
    /// Tracing configuration
    pub tracing: TracingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// The address to listen on
    pub host: String,
    /// The port to listen on
    pub port: u16,
    /// How many consecutive ports to try, starting at `port`, before giving up
    pub port_attempts: u16,
    /// Directory with the browser front end
    pub static_dir: PathBuf,
    /// How unknown names in the `sources` query parameter are treated
    pub invalid_source_policy: InvalidSourcePolicy,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpConfig {
    /// The duration before a request times out
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// The shortest delay between two requests to the same dictionary
    #[serde(with = "humantime_serde")]
    pub min_delay: Duration,
    /// The longest delay between two requests to the same dictionary
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TracingConfig {
    /// Enable tracing
    pub enabled: bool,
    /// The service name reported with exported spans
    pub service_name: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        TracingConfig {
            enabled: false,
            service_name: String::from(consts::SERVICE_NAME),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: String::from(consts::DEFAULT_HOST),
            port: consts::DEFAULT_PORT,
            port_attempts: consts::DEFAULT_PORT_ATTEMPTS,
            static_dir: PathBuf::from(consts::DEFAULT_STATIC_DIR),
            invalid_source_policy: InvalidSourcePolicy::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout: consts::HTTP_TIMEOUT,
            min_delay: consts::DEFAULT_MIN_DELAY,
            max_delay: consts::DEFAULT_MAX_DELAY,
        }
    }
}

impl Config {
    /// Returns the layered configuration sources, in increasing order of precedence: the
    /// defaults, the TOML file at `path` (if it exists), `LEXIS_`-prefixed environment variables
    /// with `__` separating nested keys, and finally a bare `PORT` variable.
    #[must_use]
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(consts::ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
    }

    /// Loads the configuration, with the TOML file at `path` layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoadConfig`] if a source can't be read or a value has the wrong type.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, Error> {
        let path = path.as_ref();

        trace!(?path, "Loading config");

        Config::figment(path)
            .extract()
            .map_err(|err| Error::LoadConfig(Box::new(err)))
    }
}
