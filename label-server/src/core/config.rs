/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./data | Working directory for artifacts and logs |
/// | ASSETS_DIR | ./assets | Logo asset directory |
/// | HTTP_PORT | 3000 | HTTP service port |
/// | API_BASE_URL | (warehouse beta API) | Upstream warehouse API base URL |
/// | API_KEY | (empty) | Upstream warehouse API key |
/// | UPSTREAM_TIMEOUT_MS | 20000 | Upstream request timeout (ms) |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | Log verbosity |
/// | LOG_DIR | (unset) | Daily-rolling log file directory |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/labels HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for transient artifacts and logs
    pub work_dir: String,
    /// Logo asset directory
    pub assets_dir: String,
    /// HTTP API service port
    pub http_port: u16,
    /// Upstream warehouse API base URL
    pub api_base_url: String,
    /// Upstream warehouse API key
    pub api_key: String,
    /// Upstream request timeout in milliseconds
    pub upstream_timeout_ms: u64,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Log verbosity
    pub log_level: String,
    /// Daily-rolling log file directory, when set
    pub log_dir: Option<String>,
}

const DEFAULT_API_BASE_URL: &str =
    "https://impressionsvanity.infopluswms.com/infoplus-wms/api/beta";

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            assets_dir: std::env::var("ASSETS_DIR").unwrap_or_else(|_| "./assets".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.into()),
            api_key: std::env::var("API_KEY").unwrap_or_default(),
            upstream_timeout_ms: std::env::var("UPSTREAM_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(20_000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override the paths and port, keeping everything else env-derived.
    /// Used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
