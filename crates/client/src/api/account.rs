//! Seeker favorites, notification preferences and agent dashboard counters.

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use crate::client::{route, ApiClient};
use crate::entities::{
    AgentNotificationPreferences, DashboardStats, Favorite, PrincipalKind,
    UserNotificationPreferences,
};
use crate::error::{ApiError, ApiResult};
use crate::types::{AddFavoriteRequest, FavoritesEnvelope, PreferencesEnvelope, StatsEnvelope};

const FAVORITES_ROUTE: &str = "/api/favorites";
const DASHBOARD_STATS_ROUTE: &str = "/api/agents/dashboard/stats";

impl ApiClient {
    pub async fn list_favorites(&self, token: &str) -> ApiResult<Vec<Favorite>> {
        let request = self.request(Method::GET, &route(FAVORITES_ROUTE), Some(token))?;
        let envelope: FavoritesEnvelope = self.fetch_json(request).await?;
        Ok(envelope.favorites)
    }

    /// Returns the authoritative favorites list after the insert.
    pub async fn add_favorite(&self, token: &str, property_id: &str) -> ApiResult<Vec<Favorite>> {
        let request = self
            .request(Method::POST, &route(FAVORITES_ROUTE), Some(token))?
            .json(&AddFavoriteRequest { property_id });
        let envelope: FavoritesEnvelope = self.fetch_json(request).await?;
        Ok(envelope.favorites)
    }

    /// Returns the authoritative favorites list after the delete.
    pub async fn remove_favorite(&self, token: &str, property_id: &str) -> ApiResult<Vec<Favorite>> {
        let request = self.request(Method::DELETE, &["api", "favorites", property_id], Some(token))?;
        let envelope: FavoritesEnvelope = self.fetch_json(request).await?;
        Ok(envelope.favorites)
    }

    pub async fn user_notification_preferences(
        &self,
        token: &str,
    ) -> ApiResult<UserNotificationPreferences> {
        self.get_preferences(PrincipalKind::User, token).await
    }

    pub async fn update_user_notification_preferences(
        &self,
        token: &str,
        preferences: &UserNotificationPreferences,
    ) -> ApiResult<UserNotificationPreferences> {
        self.put_preferences(PrincipalKind::User, token, preferences).await
    }

    pub async fn agent_notification_preferences(
        &self,
        token: &str,
    ) -> ApiResult<AgentNotificationPreferences> {
        self.get_preferences(PrincipalKind::Agent, token).await
    }

    pub async fn update_agent_notification_preferences(
        &self,
        token: &str,
        preferences: &AgentNotificationPreferences,
    ) -> ApiResult<AgentNotificationPreferences> {
        self.put_preferences(PrincipalKind::Agent, token, preferences).await
    }

    pub async fn dashboard_stats(&self, token: &str) -> ApiResult<DashboardStats> {
        let request = self.request(Method::GET, &route(DASHBOARD_STATS_ROUTE), Some(token))?;
        let envelope: StatsEnvelope<DashboardStats> = self.fetch_json(request).await?;
        Ok(envelope.stats)
    }

    async fn get_preferences<T: DeserializeOwned>(&self, kind: PrincipalKind, token: &str) -> ApiResult<T> {
        let path = preferences_route(kind)?;
        let request = self.request(Method::GET, &route(path), Some(token))?;
        let envelope: PreferencesEnvelope<T> = self.fetch_json(request).await?;
        Ok(envelope.preferences)
    }

    async fn put_preferences<T: Serialize + DeserializeOwned>(
        &self,
        kind: PrincipalKind,
        token: &str,
        preferences: &T,
    ) -> ApiResult<T> {
        let path = preferences_route(kind)?;
        let request = self
            .request(Method::PUT, &route(path), Some(token))?
            .json(preferences);
        let envelope: PreferencesEnvelope<T> = self.fetch_json(request).await?;
        Ok(envelope.preferences)
    }
}

fn preferences_route(kind: PrincipalKind) -> ApiResult<&'static str> {
    kind.endpoints()
        .notification_preferences
        .ok_or_else(|| ApiError::InvalidUrl(format!("{kind} has no notification preferences")))
}
