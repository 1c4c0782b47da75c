use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PropertyId = String;

/// Property type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Condo,
    Townhouse,
    Apartment,
    MultiFamily,
    Land,
    Commercial,
}

/// Listing type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    Rent,
}

/// Listing status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Active,
    Pending,
    Sold,
    Rented,
    Inactive,
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "house" => Ok(PropertyType::House),
            "condo" => Ok(PropertyType::Condo),
            "townhouse" => Ok(PropertyType::Townhouse),
            "apartment" => Ok(PropertyType::Apartment),
            "multi_family" => Ok(PropertyType::MultiFamily),
            "land" => Ok(PropertyType::Land),
            "commercial" => Ok(PropertyType::Commercial),
            other => Err(format!("unknown property type: {other}")),
        }
    }
}

impl std::str::FromStr for ListingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sale" => Ok(ListingType::Sale),
            "rent" => Ok(ListingType::Rent),
            other => Err(format!("unknown listing type: {other}")),
        }
    }
}

/// A listing as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: f32,
    #[serde(default)]
    pub square_feet: Option<u32>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub photos: Vec<PropertyPhoto>,
    #[serde(default)]
    pub price_history: Vec<PriceChange>,
}

impl Property {
    pub fn primary_photo(&self) -> Option<&PropertyPhoto> {
        self.photos
            .iter()
            .find(|photo| photo.is_primary)
            .or_else(|| self.photos.first())
    }

    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.state, self.zip_code
        )
    }
}

/// Shallow projection embedded in favorites and featured listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertySummary {
    pub id: PropertyId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub primary_photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyPhoto {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub display_order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceChange {
    #[serde(default)]
    pub old_price: Option<f64>,
    pub new_price: f64,
    pub changed_at: DateTime<Utc>,
}

/// Search filters for the public listing index
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PropertyQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<ListingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PropertyPage {
    pub properties: Vec<Property>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// Body for creating or editing a listing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListingPayload {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    pub bedrooms: u32,
    pub bathrooms: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_feet: Option<u32>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPhoto {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub formatted_address: Option<String>,
}
