//! Notification preferences for seekers and agents.

use tracing::{debug, info};

use propconnect_client::{AgentNotificationPreferences, PrincipalKind, UserNotificationPreferences};

use crate::error::{StoreError, StoreResult};
use crate::state::{NotificationPreferences, Severity};
use crate::store::Store;

const SAVED_MESSAGE: &str = "Notification preferences saved";

impl Store {
    /// Fetch preferences for whoever is signed in. Admins have none.
    pub async fn load_notification_preferences(&self) -> StoreResult<Option<NotificationPreferences>> {
        let Some((kind, token)) = self.select(|state| state.auth.principal.session()) else {
            return Err(StoreError::NotAuthenticated);
        };

        let preferences = match kind {
            PrincipalKind::User => Some(NotificationPreferences::User(
                self.client().user_notification_preferences(&token).await?,
            )),
            PrincipalKind::Agent => Some(NotificationPreferences::Agent(
                self.client().agent_notification_preferences(&token).await?,
            )),
            PrincipalKind::Admin => None,
        };
        debug!(%kind, loaded = preferences.is_some(), "notification preferences fetched");

        if self.holds_token(&token) {
            let stored = preferences.clone();
            self.update(|state| state.preferences = stored);
            self.persist();
        }
        Ok(preferences)
    }

    pub async fn update_user_notification_preferences(
        &self,
        preferences: UserNotificationPreferences,
    ) -> StoreResult<UserNotificationPreferences> {
        let token = self.session_for(PrincipalKind::User)?;
        let optimistic = NotificationPreferences::User(preferences.clone());

        let result = self
            .reconcile(
                self.preferences_slot(),
                &token,
                |slot| *slot = Some(optimistic),
                async {
                    self.client()
                        .update_user_notification_preferences(&token, &preferences)
                        .await
                        .map(|saved| Some(NotificationPreferences::User(saved)))
                },
            )
            .await;

        match self.finish_preferences_update(result)? {
            Some(NotificationPreferences::User(saved)) => Ok(saved),
            _ => Ok(preferences),
        }
    }

    pub async fn update_agent_notification_preferences(
        &self,
        preferences: AgentNotificationPreferences,
    ) -> StoreResult<AgentNotificationPreferences> {
        let token = self.session_for(PrincipalKind::Agent)?;
        let optimistic = NotificationPreferences::Agent(preferences.clone());

        let result = self
            .reconcile(
                self.preferences_slot(),
                &token,
                |slot| *slot = Some(optimistic),
                async {
                    self.client()
                        .update_agent_notification_preferences(&token, &preferences)
                        .await
                        .map(|saved| Some(NotificationPreferences::Agent(saved)))
                },
            )
            .await;

        match self.finish_preferences_update(result)? {
            Some(NotificationPreferences::Agent(saved)) => Ok(saved),
            _ => Ok(preferences),
        }
    }

    fn finish_preferences_update(
        &self,
        result: StoreResult<Option<NotificationPreferences>>,
    ) -> StoreResult<Option<NotificationPreferences>> {
        match result {
            Ok(saved) => {
                info!("notification preferences updated");
                self.notify(SAVED_MESSAGE, Severity::Success);
                Ok(saved)
            }
            Err(error) => {
                self.notify(
                    format!("Could not save preferences: {}", error.user_message()),
                    Severity::Error,
                );
                Err(error)
            }
        }
    }
}
