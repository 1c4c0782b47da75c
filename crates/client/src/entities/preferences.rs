use serde::{Deserialize, Serialize};

/// How often batched notifications are delivered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Instant,
    Daily,
    Weekly,
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instant" => Ok(Frequency::Instant),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(format!("unknown frequency: {other}")),
        }
    }
}

/// Notification toggles for a property seeker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserNotificationPreferences {
    pub email_new_listings: bool,
    pub email_price_changes: bool,
    pub email_saved_search_alerts: bool,
    pub email_inquiry_responses: bool,
    pub email_open_house_reminders: bool,
    pub push_enabled: bool,
    pub frequency: Frequency,
}

impl Default for UserNotificationPreferences {
    fn default() -> Self {
        Self {
            email_new_listings: true,
            email_price_changes: true,
            email_saved_search_alerts: true,
            email_inquiry_responses: true,
            email_open_house_reminders: true,
            push_enabled: false,
            frequency: Frequency::Instant,
        }
    }
}

/// Notification toggles for an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentNotificationPreferences {
    pub email_new_inquiries: bool,
    pub email_inquiry_replies: bool,
    pub email_listing_approved: bool,
    pub email_weekly_summary: bool,
    pub push_enabled: bool,
    pub frequency: Frequency,
}

impl Default for AgentNotificationPreferences {
    fn default() -> Self {
        Self {
            email_new_inquiries: true,
            email_inquiry_replies: true,
            email_listing_approved: true,
            email_weekly_summary: true,
            push_enabled: false,
            frequency: Frequency::Instant,
        }
    }
}
