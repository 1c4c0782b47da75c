//! Agent listing editor: create, edit, geocode and manage photos.

use tracing::info;

use propconnect_client::{
    ListingPayload, ListingType, NewPhoto, PrincipalKind, Property, PropertyId, PropertyPhoto,
    PropertyType,
};
use propconnect_store::{Severity, Store};

use crate::access::token_for;
use crate::error::{FieldErrors, ViewError, ViewResult};
use crate::validation::{require, validate_state, validate_zip};

#[derive(Debug, Clone, PartialEq)]
pub struct ListingForm {
    /// Set when editing an existing listing.
    pub property_id: Option<PropertyId>,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: Option<u32>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for ListingForm {
    fn default() -> Self {
        Self {
            property_id: None,
            title: String::new(),
            description: String::new(),
            price: 0.0,
            property_type: PropertyType::House,
            listing_type: ListingType::Sale,
            bedrooms: 0,
            bathrooms: 0.0,
            square_feet: None,
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            latitude: None,
            longitude: None,
        }
    }
}

impl ListingForm {
    pub fn from_property(property: &Property) -> Self {
        Self {
            property_id: Some(property.id.clone()),
            title: property.title.clone(),
            description: property.description.clone(),
            price: property.price,
            property_type: property.property_type,
            listing_type: property.listing_type,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            square_feet: property.square_feet,
            address: property.address.clone(),
            city: property.city.clone(),
            state: property.state.clone(),
            zip_code: property.zip_code.clone(),
            latitude: property.latitude,
            longitude: property.longitude,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.property_id.is_some()
    }

    pub fn validate(&self) -> ViewResult<ListingPayload> {
        let mut errors = FieldErrors::new();
        errors.check("title", require(&self.title, "Title"));
        errors.check("description", require(&self.description, "Description"));
        if !(self.price.is_finite() && self.price > 0.0) {
            errors.insert("price", "Price must be greater than zero");
        }
        if !(self.bathrooms.is_finite() && self.bathrooms >= 0.0) {
            errors.insert("bathrooms", "Bathrooms cannot be negative");
        }
        errors.check("address", require(&self.address, "Address"));
        errors.check("city", require(&self.city, "City"));
        errors.check("state", validate_state(&self.state));
        errors.check("zip_code", validate_zip(&self.zip_code));
        if self.latitude.is_some() != self.longitude.is_some() {
            errors.insert("latitude", "Latitude and longitude must be set together");
        }
        errors.into_result()?;

        Ok(ListingPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price,
            property_type: self.property_type,
            listing_type: self.listing_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_feet: self.square_feet,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_uppercase(),
            zip_code: self.zip_code.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }

    fn full_address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address.trim(),
            self.city.trim(),
            self.state.trim(),
            self.zip_code.trim()
        )
    }

    /// Resolve the address into coordinates.
    pub async fn geocode(&mut self, store: &Store) -> ViewResult<(f64, f64)> {
        let token = agent_token(store)?;
        let mut errors = FieldErrors::new();
        errors.check("address", require(&self.address, "Address"));
        errors.check("city", require(&self.city, "City"));
        errors.into_result()?;

        let result = store.client().geocode(&token, &self.full_address()).await?;
        self.latitude = Some(result.latitude);
        self.longitude = Some(result.longitude);
        Ok((result.latitude, result.longitude))
    }

    /// Create or update depending on whether the form came from a listing.
    pub async fn submit(&mut self, store: &Store) -> ViewResult<Property> {
        let token = agent_token(store)?;
        let payload = self.validate()?;

        let saved = match &self.property_id {
            Some(id) => store.client().update_property(&token, id, &payload).await,
            None => store.client().create_property(&token, &payload).await,
        };

        match saved {
            Ok(property) => {
                let created = !self.is_edit();
                info!(property_id = %property.id, created, "listing saved");
                self.property_id = Some(property.id.clone());
                let message = if created { "Listing created" } else { "Listing updated" };
                store.notify(message, Severity::Success);
                Ok(property)
            }
            Err(error) => {
                store.notify(
                    format!("Could not save listing: {}", error.user_message()),
                    Severity::Error,
                );
                Err(error.into())
            }
        }
    }

    pub async fn add_photo(
        &self,
        store: &Store,
        url: &str,
        caption: Option<&str>,
        is_primary: bool,
    ) -> ViewResult<PropertyPhoto> {
        let token = agent_token(store)?;
        let property_id = self.saved_id()?;
        if url.trim().is_empty() {
            return Err(ViewError::field("url", "Photo URL is required"));
        }

        let photo = NewPhoto {
            url: url.trim().to_string(),
            caption: caption
                .map(str::trim)
                .filter(|caption| !caption.is_empty())
                .map(str::to_string),
            is_primary,
        };
        Ok(store
            .client()
            .add_property_photo(&token, property_id, &photo)
            .await?)
    }

    pub async fn reorder_photos(&self, store: &Store, photo_ids: &[String]) -> ViewResult<Vec<PropertyPhoto>> {
        let token = agent_token(store)?;
        let property_id = self.saved_id()?;
        if photo_ids.is_empty() {
            return Err(ViewError::field("photos", "At least one photo is required"));
        }
        Ok(store
            .client()
            .reorder_property_photos(&token, property_id, photo_ids)
            .await?)
    }

    pub async fn set_primary_photo(&self, store: &Store, photo_id: &str) -> ViewResult<Vec<PropertyPhoto>> {
        let token = agent_token(store)?;
        let property_id = self.saved_id()?;
        Ok(store
            .client()
            .set_primary_photo(&token, property_id, photo_id)
            .await?)
    }

    fn saved_id(&self) -> ViewResult<&str> {
        self.property_id
            .as_deref()
            .ok_or_else(|| ViewError::field("property_id", "Save the listing before adding photos"))
    }
}

fn agent_token(store: &Store) -> ViewResult<String> {
    token_for(store, PrincipalKind::Agent)
}
