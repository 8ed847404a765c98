/// Runtime configuration for the server and the sync command
///
/// Values come from command line flags (with environment fallbacks, see
/// `main.rs`); this module only holds the resolved settings and defaults.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Public Stripe API root
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1/";

/// Longest accepted request line, in bytes
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Upper bound on a single tool call, gateway round trip included
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP timeout applied by the gateway client
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Settings for the payment gateway client
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Secret API key; the gateway refuses every call without one
    pub secret_key: Option<String>,
    /// API root, always ending in `/` so relative paths join underneath it
    pub api_base: Url,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(
        secret_key: Option<String>,
        api_base: &str,
        request_timeout: Duration,
    ) -> Result<Self, url::ParseError> {
        let secret_key = secret_key.filter(|key| !key.trim().is_empty());

        let mut api_base = api_base.trim().to_string();
        if !api_base.ends_with('/') {
            api_base.push('/');
        }

        Ok(Self {
            secret_key,
            api_base: Url::parse(&api_base)?,
            request_timeout,
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Settings for the stdio tool server loop
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub max_line_bytes: usize,
    pub call_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// Everything the binary needs to start
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub server: ServerConfig,
    /// Local catalogue database used by `sync`
    pub database: Option<PathBuf>,
}

/// Pick a writable default location for the catalogue database
///
/// Tries the home, data and config directories, then the working directory,
/// and finally the system temp directory.
pub fn default_database_path() -> std::io::Result<PathBuf> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".mort")),
        dirs::data_dir().map(|p| p.join("mort")),
        dirs::config_dir().map(|p| p.join("mort")),
        std::env::current_dir().ok().map(|p| p.join(".mort")),
    ];

    for dir in candidates.iter().flatten() {
        if std::fs::create_dir_all(dir).is_ok() {
            let probe = dir.join(".write_test");
            if std::fs::write(&probe, b"ok").is_ok() {
                let _ = std::fs::remove_file(&probe);
                return Ok(dir.join("stripe.db"));
            }
        }
    }

    let fallback = std::env::temp_dir().join("mort");
    std::fs::create_dir_all(&fallback)?;
    tracing::warn!("Using temporary directory for database: {}", fallback.display());
    Ok(fallback.join("stripe.db"))
}
