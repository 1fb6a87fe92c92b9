use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::AppError;
use crate::scoreboard::local::DatasetSpec;
use crate::scoreboard::types::ScoreTab;

/// Canonical environment keys. Use these instead of raw string literals.
pub const ENV_API_BASE_URL: &str = "DASHBOARD_API_BASE_URL";
pub const ENV_USE_MOCK: &str = "DASHBOARD_USE_MOCK";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "DASHBOARD_HTTP_TIMEOUT_SECS";
pub const ENV_CONFIG_FILE: &str = "DASHBOARD_CONFIG";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_AUTH_LATENCY_MS: u64 = 200;

// ============================================================================
// Backend selection
// ============================================================================

/// Which implementation every service is built with. Chosen once, up front,
/// and passed explicitly to the service factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// In-process mock services (synthetic scoreboard, in-memory groups).
    Local,
    /// HTTP services rooted at `base_url`.
    Remote { base_url: Url },
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::Remote { .. } => "remote",
        }
    }
}

// ============================================================================
// AppConfig
// ============================================================================

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Option<Url>,
    pub use_mock: bool,
    pub http_timeout: Duration,
    /// Simulated latency of the mock login call.
    pub mock_auth_latency: Duration,
    /// Synthetic dataset per tab for the local scoreboard.
    pub datasets: BTreeMap<ScoreTab, DatasetSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            use_mock: true,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            mock_auth_latency: Duration::from_millis(DEFAULT_AUTH_LATENCY_MS),
            datasets: DatasetSpec::defaults(),
        }
    }
}

/// Optional TOML file layered under the environment.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_base_url: Option<String>,
    use_mock: Option<bool>,
    http_timeout_secs: Option<u64>,
    mock_auth_latency_ms: Option<u64>,
    #[serde(default)]
    datasets: BTreeMap<String, DatasetSpec>,
}

impl AppConfig {
    /// Load `.env` (if any), an optional TOML file named by
    /// `DASHBOARD_CONFIG`, then apply environment overrides.
    pub fn from_env() -> Result<Self, AppError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading keys through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = match lookup(ENV_CONFIG_FILE) {
            Some(path) if !path.trim().is_empty() => Self::from_toml_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };

        if let Some(raw) = lookup(ENV_API_BASE_URL) {
            config.api_base_url = parse_base_url(&raw)?;
        }
        if let Some(raw) = lookup(ENV_USE_MOCK) {
            config.use_mock = raw.trim() == "true";
        }
        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("{ENV_HTTP_TIMEOUT_SECS} must be a number of seconds"))
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let file: FileConfig =
            toml::from_str(text).map_err(|e| AppError::Config(format!("invalid config file: {e}")))?;

        let mut config = Self::default();
        if let Some(raw) = file.api_base_url {
            config.api_base_url = parse_base_url(&raw)?;
        }
        if let Some(use_mock) = file.use_mock {
            config.use_mock = use_mock;
        }
        if let Some(secs) = file.http_timeout_secs {
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = file.mock_auth_latency_ms {
            config.mock_auth_latency = Duration::from_millis(ms);
        }
        for (tab, spec) in file.datasets {
            let tab: ScoreTab = tab.parse()?;
            config.datasets.insert(tab, spec);
        }
        Ok(config)
    }

    /// Mock when asked to, or when there is nowhere to send requests.
    pub fn backend(&self) -> Backend {
        match (&self.api_base_url, self.use_mock) {
            (Some(base_url), false) => Backend::Remote {
                base_url: base_url.clone(),
            },
            _ => Backend::Local,
        }
    }
}

/// Empty means "not configured"; anything else must be an absolute URL.
fn parse_base_url(raw: &str) -> Result<Option<Url>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let url = Url::parse(raw)
        .map_err(|e| AppError::Config(format!("{ENV_API_BASE_URL} '{raw}' is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "{ENV_API_BASE_URL} must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(Some(url))
}
