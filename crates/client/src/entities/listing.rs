use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::property::{PropertyId, PropertySummary};

/// Saved favorite for the current seeker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub property_id: PropertyId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub property: Option<PropertySummary>,
}

/// Admin-curated homepage slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeaturedListing {
    pub id: String,
    pub property_id: PropertyId,
    pub position: u32,
    #[serde(default)]
    pub property: Option<PropertySummary>,
    #[serde(default)]
    pub featured_at: Option<DateTime<Utc>>,
}

/// Counters shown on the agent dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DashboardStats {
    pub unread_inquiry_count: u32,
    pub total_active_listings: u32,
    pub total_views: u64,
    pub total_inquiries: u32,
}
