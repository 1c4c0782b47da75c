use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use propconnect_client::ApiClient;
use propconnect_config::AppConfig;
use propconnect_store::{FileStorage, Principal, Store, StoreSettings};
use tokio::task::JoinHandle;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        init_tracing_with_default("info")
    }

    /// `RUST_LOG` wins over `default_filter` when set.
    pub fn init_tracing_with_default(default_filter: &str) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::TRACE)
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Everything a PropConnect front end needs, built once at startup and
/// passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub store: Store,
}

impl AppContext {
    /// Build the client and store, rehydrate from disk and revalidate any
    /// stored session. A rejected session leaves the context signed out.
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api).context("failed to build api client")?;
        let storage = Arc::new(FileStorage::from_config(&config.storage));
        info!(
            base_url = client.base_url(),
            storage = %storage.path().display(),
            "propconnect runtime starting"
        );

        let store = Store::new(client, storage, StoreSettings::from(&config.ui));
        let principal = store.restore_session().await;
        match &principal {
            Principal::Guest => info!("browsing as guest"),
            principal => info!(
                user_type = ?principal.user_type(),
                name = principal.display_name().unwrap_or_default(),
                "session restored"
            ),
        }

        Ok(Self {
            config: config.clone(),
            store,
        })
    }

    pub fn client(&self) -> &ApiClient {
        self.store.client()
    }

    /// Start the periodic dashboard reload. Disabled when the configured
    /// interval is zero.
    pub fn spawn_dashboard_refresh(&self) -> Option<JoinHandle<()>> {
        let seconds = self.config.dashboard.refresh_interval_seconds;
        if seconds == 0 {
            return None;
        }
        Some(self.store.spawn_dashboard_refresh(Duration::from_secs(seconds)))
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
