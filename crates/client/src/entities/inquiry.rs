use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::property::PropertyId;

/// Inquiry status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Read,
    Replied,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Read => "read",
            InquiryStatus::Replied => "replied",
            InquiryStatus::Closed => "closed",
        }
    }
}

impl std::str::FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" | "unread" => Ok(InquiryStatus::New),
            "read" => Ok(InquiryStatus::Read),
            "replied" => Ok(InquiryStatus::Replied),
            "closed" => Ok(InquiryStatus::Closed),
            other => Err(format!("unknown inquiry status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Email,
    Phone,
    Either,
}

/// A prospect's question about a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Inquiry {
    pub id: String,
    pub property_id: PropertyId,
    #[serde(default)]
    pub property_title: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub status: InquiryStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Inquiry {
    pub fn is_unread(&self) -> bool {
        self.status == InquiryStatus::New
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InquiryReply {
    pub id: String,
    pub inquiry_id: String,
    pub message: String,
    #[serde(default)]
    pub sender_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An inquiry with its reply thread
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InquiryThread {
    pub inquiry: Inquiry,
    #[serde(default)]
    pub replies: Vec<InquiryReply>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewInquiry {
    pub property_id: PropertyId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_contact: Option<ContactMethod>,
}
