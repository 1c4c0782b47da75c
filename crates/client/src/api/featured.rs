//! Admin curation of homepage featured listings.

use reqwest::Method;

use crate::client::{route, ApiClient};
use crate::entities::FeaturedListing;
use crate::error::ApiResult;
use crate::types::{AddFeaturedRequest, FeaturedEnvelope, FeaturedListEnvelope, OrderedIds};

const FEATURED_ROUTE: &str = "/api/admin/featured-listings";
const FEATURED_REORDER_ROUTE: &str = "/api/admin/featured-listings/reorder";

impl ApiClient {
    pub async fn featured_listings(&self, token: &str) -> ApiResult<Vec<FeaturedListing>> {
        let request = self.request(Method::GET, &route(FEATURED_ROUTE), Some(token))?;
        let envelope: FeaturedListEnvelope = self.fetch_json(request).await?;
        Ok(envelope.featured_listings)
    }

    pub async fn add_featured_listing(&self, token: &str, property_id: &str) -> ApiResult<FeaturedListing> {
        let request = self
            .request(Method::POST, &route(FEATURED_ROUTE), Some(token))?
            .json(&AddFeaturedRequest { property_id });
        let envelope: FeaturedEnvelope = self.fetch_json(request).await?;
        Ok(envelope.featured_listing)
    }

    pub async fn remove_featured_listing(&self, token: &str, featured_id: &str) -> ApiResult<()> {
        let request = self.request(
            Method::DELETE,
            &["api", "admin", "featured-listings", featured_id],
            Some(token),
        )?;
        self.fetch_empty(request).await
    }

    /// Persist a new ordering; the response carries the stored positions.
    pub async fn reorder_featured_listings(
        &self,
        token: &str,
        featured_ids: &[String],
    ) -> ApiResult<Vec<FeaturedListing>> {
        let request = self
            .request(Method::PUT, &route(FEATURED_REORDER_ROUTE), Some(token))?
            .json(&OrderedIds { ids: featured_ids });
        let envelope: FeaturedListEnvelope = self.fetch_json(request).await?;
        Ok(envelope.featured_listings)
    }
}
