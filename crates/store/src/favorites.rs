//! Seeker favorites with optimistic add and remove.

use tracing::{debug, info};

use propconnect_client::{Favorite, PrincipalKind, PropertyId};

use crate::error::StoreResult;
use crate::state::Severity;
use crate::store::Store;

fn favorite_ids(favorites: Vec<Favorite>) -> Vec<PropertyId> {
    favorites.into_iter().map(|favorite| favorite.property_id).collect()
}

impl Store {
    /// Replace the local list with the backend's.
    pub async fn load_favorites(&self) -> StoreResult<Vec<PropertyId>> {
        let token = self.session_for(PrincipalKind::User)?;
        let favorites = favorite_ids(self.client().list_favorites(&token).await?);
        debug!(count = favorites.len(), "favorites loaded");

        if self.holds_token(&token) {
            let stored = favorites.clone();
            self.update(|state| state.favorites = stored);
            self.persist();
        }
        Ok(favorites)
    }

    /// The id shows up locally before the request is sent and is removed
    /// again if the backend refuses.
    pub async fn add_favorite(&self, property_id: &str) -> StoreResult<()> {
        let token = self.session_for(PrincipalKind::User)?;
        let id = property_id.to_string();

        let result = self
            .reconcile(
                self.favorites_slot(),
                &token,
                |favorites| {
                    if !favorites.contains(&id) {
                        favorites.push(id.clone());
                    }
                },
                async {
                    self.client()
                        .add_favorite(&token, property_id)
                        .await
                        .map(favorite_ids)
                },
            )
            .await;

        match result {
            Ok(_) => {
                info!(property_id, "favorite added");
                self.notify("Added to favorites", Severity::Success);
                Ok(())
            }
            Err(error) => {
                self.notify(
                    format!("Could not add to favorites: {}", error.user_message()),
                    Severity::Error,
                );
                Err(error)
            }
        }
    }

    /// Removing an id that is not in the list is a local no-op; the
    /// backend is still asked so both sides agree.
    pub async fn remove_favorite(&self, property_id: &str) -> StoreResult<()> {
        let token = self.session_for(PrincipalKind::User)?;

        let result = self
            .reconcile(
                self.favorites_slot(),
                &token,
                |favorites| favorites.retain(|id| id != property_id),
                async {
                    self.client()
                        .remove_favorite(&token, property_id)
                        .await
                        .map(favorite_ids)
                },
            )
            .await;

        match result {
            Ok(_) => {
                info!(property_id, "favorite removed");
                self.notify("Removed from favorites", Severity::Success);
                Ok(())
            }
            Err(error) => {
                self.notify(
                    format!("Could not remove from favorites: {}", error.user_message()),
                    Severity::Error,
                );
                Err(error)
            }
        }
    }

    /// Returns whether the property is a favorite afterwards.
    pub async fn toggle_favorite(&self, property_id: &str) -> StoreResult<bool> {
        if self.is_favorite(property_id) {
            self.remove_favorite(property_id).await?;
            Ok(false)
        } else {
            self.add_favorite(property_id).await?;
            Ok(true)
        }
    }
}
