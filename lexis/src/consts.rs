use std::time::Duration;

/// The configuration file read when no other is given.
pub const DEFAULT_CONFIG_PATH: &str = "lexis.toml";

/// The prefix of environment variables that override the configuration.
pub const ENV_PREFIX: &str = "LEXIS_";

/// The address the server listens on by default.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// The port the server listens on by default.
pub const DEFAULT_PORT: u16 = 5000;

/// The number of consecutive ports to try when the configured one is taken.
pub const DEFAULT_PORT_ATTEMPTS: u16 = 10;

/// The directory the browser front end is served from.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// The duration before a HTTP request times out.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// The default lower bound of the delay between two requests to the same dictionary.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(2);

/// The default upper bound of the delay between two requests to the same dictionary.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);

/// The service name reported with exported spans unless configured otherwise.
pub const SERVICE_NAME: &str = "lexis";

pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
