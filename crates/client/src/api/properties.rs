//! Listing search, detail, authoring, photos and geocoding.

use reqwest::Method;

use crate::client::{route, ApiClient};
use crate::entities::{
    GeocodeResult, ListingPayload, NewPhoto, Property, PropertyPage, PropertyPhoto, PropertyQuery,
};
use crate::error::ApiResult;
use crate::types::{GeocodeQuery, OrderedIds, PhotoEnvelope, PhotosEnvelope, PropertyEnvelope};

const PROPERTIES_ROUTE: &str = "/api/properties";
const GEOCODE_ROUTE: &str = "/api/geocode";

impl ApiClient {
    pub async fn search_properties(&self, query: &PropertyQuery) -> ApiResult<PropertyPage> {
        let request = self
            .request(Method::GET, &route(PROPERTIES_ROUTE), None)?
            .query(query);
        self.fetch_json(request).await
    }

    /// Detail including photos and price history.
    pub async fn property(&self, property_id: &str) -> ApiResult<Property> {
        let request = self.request(Method::GET, &["api", "properties", property_id], None)?;
        let envelope: PropertyEnvelope = self.fetch_json(request).await?;
        Ok(envelope.property)
    }

    pub async fn create_property(&self, token: &str, listing: &ListingPayload) -> ApiResult<Property> {
        let request = self
            .request(Method::POST, &route(PROPERTIES_ROUTE), Some(token))?
            .json(listing);
        let envelope: PropertyEnvelope = self.fetch_json(request).await?;
        Ok(envelope.property)
    }

    pub async fn update_property(
        &self,
        token: &str,
        property_id: &str,
        listing: &ListingPayload,
    ) -> ApiResult<Property> {
        let request = self
            .request(Method::PUT, &["api", "properties", property_id], Some(token))?
            .json(listing);
        let envelope: PropertyEnvelope = self.fetch_json(request).await?;
        Ok(envelope.property)
    }

    /// Anonymous view counter bump.
    pub async fn record_property_view(&self, property_id: &str) -> ApiResult<()> {
        let request = self.request(Method::POST, &["api", "properties", property_id, "view"], None)?;
        self.fetch_empty(request).await
    }

    pub async fn add_property_photo(
        &self,
        token: &str,
        property_id: &str,
        photo: &NewPhoto,
    ) -> ApiResult<PropertyPhoto> {
        let request = self
            .request(Method::POST, &["api", "properties", property_id, "photos"], Some(token))?
            .json(photo);
        let envelope: PhotoEnvelope = self.fetch_json(request).await?;
        Ok(envelope.photo)
    }

    pub async fn reorder_property_photos(
        &self,
        token: &str,
        property_id: &str,
        photo_ids: &[String],
    ) -> ApiResult<Vec<PropertyPhoto>> {
        let request = self
            .request(
                Method::PUT,
                &["api", "properties", property_id, "photos", "reorder"],
                Some(token),
            )?
            .json(&OrderedIds { ids: photo_ids });
        let envelope: PhotosEnvelope = self.fetch_json(request).await?;
        Ok(envelope.photos)
    }

    pub async fn set_primary_photo(
        &self,
        token: &str,
        property_id: &str,
        photo_id: &str,
    ) -> ApiResult<Vec<PropertyPhoto>> {
        let request = self.request(
            Method::PUT,
            &["api", "properties", property_id, "photos", photo_id, "primary"],
            Some(token),
        )?;
        let envelope: PhotosEnvelope = self.fetch_json(request).await?;
        Ok(envelope.photos)
    }

    pub async fn geocode(&self, token: &str, address: &str) -> ApiResult<GeocodeResult> {
        let request = self
            .request(Method::GET, &route(GEOCODE_ROUTE), Some(token))?
            .query(&GeocodeQuery { address });
        self.fetch_json(request).await
    }
}
