//! Listing detail screen.

use tokio::task::JoinHandle;
use tracing::debug;

use propconnect_client::{Property, PropertyPhoto};
use propconnect_store::Store;

use crate::contact::ContactForm;
use crate::error::{ViewError, ViewResult};

#[derive(Debug)]
pub struct PropertyDetailView {
    store: Store,
    property: Property,
    tracking: Option<JoinHandle<()>>,
}

impl PropertyDetailView {
    /// Fetch the listing and count the view in the background.
    pub async fn load(store: &Store, property_id: &str) -> ViewResult<Self> {
        let property = store.client().property(property_id).await?;

        let client = store.client().clone();
        let id = property.id.clone();
        let tracking = tokio::spawn(async move {
            if let Err(error) = client.record_property_view(&id).await {
                debug!(property_id = %id, error = %error, "view tracking failed");
            }
        });

        Ok(Self {
            store: store.clone(),
            property,
            tracking: Some(tracking),
        })
    }

    /// Handle of the background view-count request. Short-lived callers
    /// await it before their runtime shuts down.
    pub fn take_view_tracking(&mut self) -> Option<JoinHandle<()>> {
        self.tracking.take()
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Photos in display order.
    pub fn gallery(&self) -> Vec<&PropertyPhoto> {
        let mut photos: Vec<_> = self.property.photos.iter().collect();
        photos.sort_by_key(|photo| photo.display_order);
        photos
    }

    pub fn is_favorite(&self) -> bool {
        self.store.is_favorite(&self.property.id)
    }

    /// Only seekers keep favorites.
    pub async fn toggle_favorite(&self) -> ViewResult<bool> {
        if self.store.auth().current_user().is_none() {
            return Err(ViewError::NotAuthorized);
        }
        Ok(self.store.toggle_favorite(&self.property.id).await?)
    }

    pub fn contact_form(&self) -> ContactForm {
        ContactForm::for_store(self.property.id.clone(), &self.store)
    }
}
