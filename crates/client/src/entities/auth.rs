use serde::{Deserialize, Serialize};

/// The three disjoint kinds of account the backend authenticates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Agent,
    Admin,
}

/// Backend routes used by one principal kind.
#[derive(Debug)]
pub struct Endpoints {
    pub login: &'static str,
    pub register: Option<&'static str>,
    pub me: &'static str,
    pub logout: &'static str,
    pub notification_preferences: Option<&'static str>,
}

static USER_ENDPOINTS: Endpoints = Endpoints {
    login: "/api/auth/login",
    register: Some("/api/auth/register"),
    me: "/api/users/me",
    logout: "/api/auth/logout",
    notification_preferences: Some("/api/users/notification-preferences"),
};

static AGENT_ENDPOINTS: Endpoints = Endpoints {
    login: "/api/auth/agent/login",
    register: Some("/api/auth/agent/register"),
    me: "/api/agents/me",
    logout: "/api/auth/agent/logout",
    notification_preferences: Some("/api/agents/notification-preferences"),
};

static ADMIN_ENDPOINTS: Endpoints = Endpoints {
    login: "/api/auth/admin/login",
    register: None,
    me: "/api/admin/me",
    logout: "/api/auth/admin/logout",
    notification_preferences: None,
};

impl PrincipalKind {
    pub fn endpoints(self) -> &'static Endpoints {
        match self {
            PrincipalKind::User => &USER_ENDPOINTS,
            PrincipalKind::Agent => &AGENT_ENDPOINTS,
            PrincipalKind::Admin => &ADMIN_ENDPOINTS,
        }
    }

    /// Field name wrapping the identity record in auth and `me` responses.
    pub fn envelope_field(self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::Agent => "agent",
            PrincipalKind::Admin => "admin",
        }
    }

    pub fn as_str(self) -> &'static str {
        self.envelope_field()
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrincipalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" | "seeker" => Ok(PrincipalKind::User),
            "agent" => Ok(PrincipalKind::Agent),
            "admin" => Ok(PrincipalKind::Admin),
            other => Err(format!("unknown principal kind: {other}")),
        }
    }
}

/// Property seeker account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Agent approval workflow status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl ApprovalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::Suspended => "suspended",
        }
    }
}

/// Listing agent account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub brokerage: Option<String>,
    #[serde(default)]
    pub years_experience: Option<u32>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
}

impl AgentProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn is_approved(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl AdminProfile {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.email.clone())
    }
}

/// Identity record returned by the backend, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    User(UserProfile),
    Agent(AgentProfile),
    Admin(AdminProfile),
}

impl Identity {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Identity::User(_) => PrincipalKind::User,
            Identity::Agent(_) => PrincipalKind::Agent,
            Identity::Admin(_) => PrincipalKind::Admin,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Identity::User(user) => &user.id,
            Identity::Agent(agent) => &agent.id,
            Identity::Admin(admin) => &admin.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Identity::User(user) => &user.email,
            Identity::Agent(agent) => &agent.email,
            Identity::Admin(admin) => &admin.email,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Identity::User(user) => user.display_name(),
            Identity::Agent(agent) => agent.display_name(),
            Identity::Admin(admin) => admin.display_name(),
        }
    }
}

/// Successful login or seeker registration.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub token: Option<String>,
    pub identity: Identity,
}
