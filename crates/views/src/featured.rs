//! Admin curation of homepage featured listings.

use tokio::sync::watch;
use tracing::info;

use propconnect_client::{FeaturedListing, PrincipalKind};
use propconnect_store::{optimistic, Severity, Store};

use crate::access::token_for;
use crate::error::{ViewError, ViewResult};
use crate::validation::require;

#[derive(Debug)]
pub struct FeaturedListingsAdmin {
    store: Store,
    listings: watch::Sender<Vec<FeaturedListing>>,
}

impl FeaturedListingsAdmin {
    pub fn new(store: &Store) -> ViewResult<Self> {
        token_for(store, PrincipalKind::Admin)?;
        let (listings, _) = watch::channel(Vec::new());
        Ok(Self {
            store: store.clone(),
            listings,
        })
    }

    pub fn listings(&self) -> Vec<FeaturedListing> {
        self.listings.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<FeaturedListing>> {
        self.listings.subscribe()
    }

    pub async fn load(&self) -> ViewResult<Vec<FeaturedListing>> {
        let token = token_for(&self.store, PrincipalKind::Admin)?;
        let listings = in_position_order(self.store.client().featured_listings(&token).await?);
        self.listings.send_replace(listings.clone());
        Ok(listings)
    }

    pub async fn add(&self, property_id: &str) -> ViewResult<FeaturedListing> {
        let token = token_for(&self.store, PrincipalKind::Admin)?;
        if let Err(problem) = require(property_id, "Property") {
            return Err(ViewError::field("property_id", problem));
        }

        let featured = self
            .store
            .client()
            .add_featured_listing(&token, property_id.trim())
            .await?;
        info!(property_id, featured_id = %featured.id, "listing featured");

        let added = featured.clone();
        self.listings.send_modify(|listings| {
            listings.retain(|listing| listing.id != added.id);
            listings.push(added);
            listings.sort_by_key(|listing| listing.position);
        });
        self.store.notify("Listing featured", Severity::Success);
        Ok(featured)
    }

    pub async fn remove(&self, featured_id: &str) -> ViewResult<()> {
        let token = token_for(&self.store, PrincipalKind::Admin)?;
        self.store
            .client()
            .remove_featured_listing(&token, featured_id)
            .await?;

        self.listings.send_modify(|listings| {
            listings.retain(|listing| listing.id != featured_id);
            renumber(listings);
        });
        self.store.notify("Listing removed from featured", Severity::Success);
        Ok(())
    }

    /// Move the item at `from` to `to`, showing the new order at once and
    /// restoring the old one if the backend refuses.
    pub async fn move_item(&self, from: usize, to: usize) -> ViewResult<Vec<FeaturedListing>> {
        let token = token_for(&self.store, PrincipalKind::Admin)?;
        let mut reordered = self.listings();
        if from >= reordered.len() || to >= reordered.len() {
            return Err(ViewError::field(
                "position",
                format!("Position must be between 1 and {}", reordered.len()),
            ));
        }
        if from == to {
            return Ok(reordered);
        }

        move_within(&mut reordered, from, to);
        let ids: Vec<String> = reordered.iter().map(|listing| listing.id.clone()).collect();

        let result = optimistic::run(
            &self.listings,
            |listings| *listings = reordered,
            async {
                self.store
                    .client()
                    .reorder_featured_listings(&token, &ids)
                    .await
                    .map(in_position_order)
            },
        )
        .await;

        match result {
            Ok(listings) => {
                info!(from, to, "featured listings reordered");
                Ok(listings)
            }
            Err(error) => {
                self.store.notify(
                    format!("Could not reorder featured listings: {}", error.user_message()),
                    Severity::Error,
                );
                Err(error.into())
            }
        }
    }
}

fn move_within(listings: &mut Vec<FeaturedListing>, from: usize, to: usize) {
    let item = listings.remove(from);
    listings.insert(to, item);
    renumber(listings);
}

/// Positions are 1-based and contiguous.
fn renumber(listings: &mut [FeaturedListing]) {
    for (index, listing) in listings.iter_mut().enumerate() {
        listing.position = index as u32 + 1;
    }
}

fn in_position_order(mut listings: Vec<FeaturedListing>) -> Vec<FeaturedListing> {
    listings.sort_by_key(|listing| listing.position);
    listings
}
