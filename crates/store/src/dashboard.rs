//! Agent dashboard counters and their background refresh.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use propconnect_client::PrincipalKind;

use crate::error::StoreResult;
use crate::state::DashboardCounters;
use crate::store::Store;

const MIN_REFRESH_PERIOD: Duration = Duration::from_secs(1);

impl Store {
    pub async fn load_dashboard_stats(&self) -> StoreResult<DashboardCounters> {
        let token = self.session_for(PrincipalKind::Agent)?;
        let counters = DashboardCounters::from(self.client().dashboard_stats(&token).await?);
        debug!(unread = counters.unread_inquiry_count, "dashboard stats loaded");

        if self.holds_token(&token) {
            self.update(|state| state.dashboard = counters);
        }
        Ok(counters)
    }

    pub fn increment_unread(&self) {
        self.update(|state| {
            state.dashboard.unread_inquiry_count = state.dashboard.unread_inquiry_count.saturating_add(1)
        });
    }

    /// Never goes below zero.
    pub fn decrement_unread(&self) {
        self.update(|state| {
            state.dashboard.unread_inquiry_count = state.dashboard.unread_inquiry_count.saturating_sub(1)
        });
    }

    pub fn set_unread_count(&self, count: u32) {
        self.update(|state| state.dashboard.unread_inquiry_count = count);
    }

    /// Reload the counters every `period` while an agent is signed in. The
    /// task ends once every handle to the store is dropped.
    pub fn spawn_dashboard_refresh(&self, period: Duration) -> JoinHandle<()> {
        let store = self.downgrade();
        tokio::spawn(async move {
            let mut ticker = interval(period.max(MIN_REFRESH_PERIOD));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    debug!("store dropped, stopping dashboard refresh");
                    break;
                };
                if !store.select(|state| state.auth.is_agent_authenticated()) {
                    continue;
                }
                if let Err(error) = store.load_dashboard_stats().await {
                    warn!(error = %error, "dashboard refresh failed");
                }
            }
        })
    }
}
