//! Request bodies and response envelopes shared by the api modules.

use serde::{Deserialize, Serialize};

use crate::entities::{
    AdminProfile, AgentProfile, Favorite, FeaturedListing, Inquiry, InquiryReply, Property,
    PropertyPhoto, UserProfile,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeekerRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub license_number: String,
    pub brokerage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<u32>,
}

/// Agent sign-ups are queued for approval and carry no token.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentRegistrationResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub agent: Option<AgentProfile>,
}

/// Auth and `me` responses wrap the identity under a kind-specific field.
#[derive(Debug, Deserialize)]
pub(crate) struct RawAuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub agent: Option<AgentProfile>,
    #[serde(default)]
    pub admin: Option<AdminProfile>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddFavoriteRequest<'a> {
    pub property_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FavoritesEnvelope {
    pub favorites: Vec<Favorite>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreferencesEnvelope<T> {
    pub preferences: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsEnvelope<T> {
    pub stats: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PropertyEnvelope {
    pub property: Property,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoEnvelope {
    pub photo: PropertyPhoto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotosEnvelope {
    pub photos: Vec<PropertyPhoto>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderedIds<'a> {
    pub ids: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct InquiryEnvelope {
    pub inquiry: Inquiry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InquiriesEnvelope {
    pub inquiries: Vec<Inquiry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReplyRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyEnvelope {
    pub reply: InquiryReply,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeaturedEnvelope {
    pub featured_listing: FeaturedListing,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeaturedListEnvelope {
    pub featured_listings: Vec<FeaturedListing>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddFeaturedRequest<'a> {
    pub property_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct InquiryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeocodeQuery<'a> {
    pub address: &'a str,
}
