//! Plain data held by the store.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use propconnect_client::{
    AdminProfile, AgentNotificationPreferences, AgentProfile, DashboardStats, Identity,
    PrincipalKind, PropertyId, UserNotificationPreferences, UserProfile,
};

/// The currently authenticated identity. One variant at a time, so at most
/// one token can ever be held.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Principal {
    #[default]
    Guest,
    PropertySeeker {
        user: UserProfile,
        token: String,
    },
    Agent {
        agent: AgentProfile,
        token: String,
    },
    Admin {
        admin: AdminProfile,
        token: String,
    },
}

impl Principal {
    pub fn from_identity(identity: Identity, token: String) -> Self {
        match identity {
            Identity::User(user) => Principal::PropertySeeker { user, token },
            Identity::Agent(agent) => Principal::Agent { agent, token },
            Identity::Admin(admin) => Principal::Admin { admin, token },
        }
    }

    pub fn kind(&self) -> Option<PrincipalKind> {
        match self {
            Principal::Guest => None,
            Principal::PropertySeeker { .. } => Some(PrincipalKind::User),
            Principal::Agent { .. } => Some(PrincipalKind::Agent),
            Principal::Admin { .. } => Some(PrincipalKind::Admin),
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Principal::Guest => None,
            Principal::PropertySeeker { token, .. }
            | Principal::Agent { token, .. }
            | Principal::Admin { token, .. } => Some(token),
        }
    }

    pub fn user_type(&self) -> UserType {
        match self {
            Principal::Guest => UserType::Guest,
            Principal::PropertySeeker { .. } => UserType::User,
            Principal::Agent { .. } => UserType::Agent,
            Principal::Admin { .. } => UserType::Admin,
        }
    }

    pub fn display_name(&self) -> Option<String> {
        match self {
            Principal::Guest => None,
            Principal::PropertySeeker { user, .. } => Some(user.display_name()),
            Principal::Agent { agent, .. } => Some(agent.display_name()),
            Principal::Admin { admin, .. } => Some(admin.display_name()),
        }
    }

    /// Kind and token of a signed-in principal.
    pub fn session(&self) -> Option<(PrincipalKind, String)> {
        Some((self.kind()?, self.token()?.to_string()))
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Principal::Guest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Guest,
    User,
    Agent,
    Admin,
}

/// Authentication slice. Status flags are derived from `principal`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub principal: Principal,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl AuthState {
    pub fn current_user(&self) -> Option<&UserProfile> {
        match &self.principal {
            Principal::PropertySeeker { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn current_agent(&self) -> Option<&AgentProfile> {
        match &self.principal {
            Principal::Agent { agent, .. } => Some(agent),
            _ => None,
        }
    }

    pub fn current_admin(&self) -> Option<&AdminProfile> {
        match &self.principal {
            Principal::Admin { admin, .. } => Some(admin),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.principal.token()
    }

    pub fn user_type(&self) -> UserType {
        self.principal.user_type()
    }

    pub fn is_authenticated(&self) -> bool {
        !self.principal.is_guest()
    }

    pub fn is_agent_authenticated(&self) -> bool {
        matches!(self.principal, Principal::Agent { .. })
    }

    pub fn is_admin_authenticated(&self) -> bool {
        matches!(self.principal, Principal::Admin { .. })
    }
}

/// Preferences for whichever principal is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "audience", content = "values", rename_all = "lowercase")]
pub enum NotificationPreferences {
    User(UserNotificationPreferences),
    Agent(AgentNotificationPreferences),
}

/// Agent dashboard counters, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardCounters {
    pub unread_inquiry_count: u32,
    pub total_active_listings: u32,
    pub total_views: u64,
    pub total_inquiries: u32,
}

impl From<DashboardStats> for DashboardCounters {
    fn from(stats: DashboardStats) -> Self {
        Self {
            unread_inquiry_count: stats.unread_inquiry_count,
            total_active_listings: stats.total_active_listings,
            total_views: stats.total_views,
            total_inquiries: stats.total_inquiries,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub name: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    pub toasts: Vec<Toast>,
    pub modal: Option<Modal>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreState {
    pub auth: AuthState,
    pub favorites: Vec<PropertyId>,
    pub preferences: Option<NotificationPreferences>,
    pub dashboard: DashboardCounters,
    pub ui: UiState,
}

impl StoreState {
    /// Drop everything tied to the signed-in principal. UI state survives.
    pub(crate) fn reset_session(&mut self) {
        self.auth = AuthState::default();
        self.favorites.clear();
        self.preferences = None;
        self.dashboard = DashboardCounters::default();
    }

    /// Install a freshly authenticated principal with empty per-principal data.
    pub(crate) fn begin_session(&mut self, principal: Principal) {
        self.reset_session();
        self.auth.principal = principal;
    }
}
