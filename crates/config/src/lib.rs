use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "propconnect.toml",
    "config/propconnect.toml",
    "crates/config/propconnect.toml",
    "../propconnect.toml",
    "../config/propconnect.toml",
];

/// Shortcut variable that overrides `api.base_url` on its own.
pub const API_URL_ENV: &str = "PROPCONNECT_API_URL";

/// Explicit configuration file path.
pub const CONFIG_PATH_ENV: &str = "PROPCONNECT_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
    pub dashboard: DashboardConfig,
}

/// Backend location and HTTP behaviour.
///
/// ```
/// use propconnect_config::ApiConfig;
///
/// let api = ApiConfig::default();
/// assert_eq!(api.base_url, "http://localhost:5000");
/// assert_eq!(api.request_timeout_seconds, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "ApiConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl ApiConfig {
    fn default_base_url() -> String {
        "http://localhost:5000".to_string()
    }

    const fn default_request_timeout() -> u64 {
        30
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

/// Where the persisted session blob lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub directory: String,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: ".propconnect".to_string(),
            key: "propconnect-storage".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub toast_duration_ms: u64,
    /// Zero disables the cap.
    pub max_toasts: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: 5_000,
            max_toasts: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub refresh_interval_seconds: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: 60,
        }
    }
}

/// Load the client configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use propconnect_config::load;
///
/// std::env::remove_var("PROPCONNECT_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.api.base_url.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url.clone())?
        .set_default(
            "api.request_timeout_seconds",
            i64::try_from(defaults.api.request_timeout_seconds).unwrap_or(i64::MAX),
        )?
        .set_default("storage.directory", defaults.storage.directory.clone())?
        .set_default("storage.key", defaults.storage.key.clone())?
        .set_default(
            "ui.toast_duration_ms",
            i64::try_from(defaults.ui.toast_duration_ms).unwrap_or(i64::MAX),
        )?
        .set_default(
            "ui.max_toasts",
            i64::try_from(defaults.ui.max_toasts).unwrap_or(i64::MAX),
        )?
        .set_default(
            "dashboard.refresh_interval_seconds",
            i64::try_from(defaults.dashboard.refresh_interval_seconds).unwrap_or(i64::MAX),
        )?;

    let environment_overrides = config::Environment::with_prefix("PROPCONNECT").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via PROPCONNECT_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            builder = builder.set_override("api.base_url", url)?;
        }
    }

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();

    debug!(?config, "loaded client configuration");
    Ok(config)
}
