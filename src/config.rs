use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

/// The only host packages are ever fetched from. Not configurable: fetched
/// contents get executed by the renderer.
pub const TRUSTED_ORIGIN: &str = "https://www.khanacademy.org";

/// Separator placed between package bodies when they are assembled.
pub const BODY_SEPARATOR: &str = "\n";

/// Body returned by the liveness endpoint.
pub const PING_RESPONSE: &str = "pong!\n";

/// Maximum number of same-origin redirects followed for a single fetch.
pub const MAX_REDIRECTS: usize = 10;

/// Log filter used when neither `--log-filter` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Default port the render server listens on.
pub const DEFAULT_PORT: u16 = 8060;

/// Top-level configuration for the render server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,
    /// Transport-level timeout for each package fetch. `None` means no timeout.
    #[serde(default, with = "opt_secs")]
    pub fetch_timeout: Option<Duration>,
    /// `tracing` filter directives; `None` defers to `RUST_LOG`.
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            fetch_timeout: None,
            log_filter: None,
        }
    }
}

mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.filter(|s| *s > 0).map(Duration::from_secs))
    }
}
