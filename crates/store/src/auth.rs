//! Sign-in, registration, session restore and sign-out for every principal kind.

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use propconnect_client::{
    AgentRegistration, AuthResponse, Identity, LoginRequest, PrincipalKind, SeekerRegistration,
};

use crate::error::{StoreError, StoreResult};
use crate::state::{Principal, Severity};
use crate::store::Store;

const CREDENTIALS_REQUIRED: &str = "Email and password are required";
const PENDING_APPROVAL_MESSAGE: &str =
    "Registration submitted. Your agent account is pending approval.";

/// Sign-up details. Admin accounts are provisioned out of band and cannot register.
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    Seeker(SeekerRegistration),
    Agent(AgentRegistration),
}

impl Registration {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Registration::Seeker(_) => PrincipalKind::User,
            Registration::Agent(_) => PrincipalKind::Agent,
        }
    }

    fn credentials(&self) -> (&str, &str) {
        match self {
            Registration::Seeker(form) => (&form.email, &form.password),
            Registration::Agent(form) => (&form.email, &form.password),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    SignedIn(Principal),
    /// Agent accounts wait for an administrator and stay signed out.
    PendingApproval { message: String },
}

impl Store {
    pub async fn login(&self, kind: PrincipalKind, credentials: &LoginRequest) -> StoreResult<Principal> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            let error = StoreError::Validation(CREDENTIALS_REQUIRED.to_string());
            self.fail_auth(&error, true);
            return Err(error);
        }

        self.begin_auth_request();
        let outcome = match self.client().login(kind, credentials).await {
            Ok(response) => self.accept_session(response),
            Err(error) => Err(error.into()),
        };

        match outcome {
            Ok(principal) => {
                info!(%kind, "signed in");
                self.load_principal_data().await;
                Ok(principal)
            }
            Err(error) => {
                warn!(%kind, error = %error, "sign in failed");
                self.fail_auth(&error, true);
                Err(error)
            }
        }
    }

    /// Seekers are signed in immediately. Agents are queued for approval and
    /// never receive a session from this call.
    pub async fn register(&self, registration: &Registration) -> StoreResult<RegistrationOutcome> {
        let (email, password) = registration.credentials();
        if email.trim().is_empty() || password.is_empty() {
            let error = StoreError::Validation(CREDENTIALS_REQUIRED.to_string());
            self.fail_auth(&error, false);
            return Err(error);
        }

        self.begin_auth_request();
        let outcome = match registration {
            Registration::Seeker(form) => self.register_seeker(form).await,
            Registration::Agent(form) => self.register_agent(form).await,
        };

        if let Err(error) = &outcome {
            warn!(kind = %registration.kind(), error = %error, "registration failed");
            self.fail_auth(error, false);
        }
        outcome
    }

    async fn register_seeker(&self, form: &SeekerRegistration) -> StoreResult<RegistrationOutcome> {
        let response = self.client().register_user(form).await?;
        let principal = self.accept_session(response)?;
        info!("seeker account created");

        self.load_principal_data().await;
        let greeting = match principal.display_name() {
            Some(name) if !name.is_empty() => format!("Welcome to PropConnect, {name}!"),
            _ => "Welcome to PropConnect!".to_string(),
        };
        self.notify(greeting, Severity::Success);
        Ok(RegistrationOutcome::SignedIn(principal))
    }

    async fn register_agent(&self, form: &AgentRegistration) -> StoreResult<RegistrationOutcome> {
        let response = self.client().register_agent(form).await?;
        info!(email = %form.email, "agent registration submitted");

        self.update(|state| state.auth.is_loading = false);
        let message = response
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| PENDING_APPROVAL_MESSAGE.to_string());
        self.notify(message.clone(), Severity::Success);
        Ok(RegistrationOutcome::PendingApproval { message })
    }

    /// Validate the persisted session against the backend. Any failure
    /// leaves the store signed out; this never returns an error.
    pub async fn restore_session(&self) -> Principal {
        let Some((kind, token)) = self.select(|state| state.auth.principal.session()) else {
            debug!("no stored session to restore");
            return Principal::Guest;
        };

        self.begin_auth_request();
        let outcome = match self.client().me(kind, &token).await {
            Ok(identity) if identity.kind() == kind => self.refresh_identity(identity, token),
            Ok(identity) => Err(StoreError::InvalidSession(format!(
                "expected a {kind} identity, got {}",
                identity.kind()
            ))),
            Err(error) => Err(error.into()),
        };

        match outcome {
            Ok(principal) => {
                info!(%kind, "session restored");
                self.load_principal_data().await;
                principal
            }
            Err(error) => {
                warn!(%kind, error = %error, "stored session rejected, continuing as guest");
                self.update(|state| state.reset_session());
                self.persist();
                Principal::Guest
            }
        }
    }

    /// Re-fetch the signed-in identity. An unauthorized response signs out.
    pub async fn refresh_profile(&self) -> StoreResult<Principal> {
        let (kind, token) = self
            .select(|state| state.auth.principal.session())
            .ok_or(StoreError::NotAuthenticated)?;

        let outcome = match self.client().me(kind, &token).await {
            Ok(identity) if identity.kind() == kind => self.refresh_identity(identity, token.clone()),
            Ok(_) => Err(StoreError::InvalidSession("identity kind changed".to_string())),
            Err(error) => Err(error.into()),
        };

        let revoked = match &outcome {
            Err(StoreError::Api(error)) => error.is_unauthorized(),
            Err(StoreError::AgentNotApproved(_)) => true,
            _ => false,
        };
        if revoked && self.holds_token(&token) {
            self.logout();
        }
        outcome
    }

    /// Sign out locally at once. The backend is told in the background and
    /// its answer is ignored. The returned handle lets a short-lived caller
    /// wait for that call before its runtime goes away; it is `None` when
    /// nobody was signed in or no runtime is available.
    pub fn logout(&self) -> Option<JoinHandle<()>> {
        let session = self.select(|state| state.auth.principal.session());
        self.update(|state| state.reset_session());
        self.persist();

        let (kind, token) = session?;
        info!(%kind, "signed out");

        let Ok(runtime) = Handle::try_current() else {
            debug!("no async runtime, skipping backend logout");
            return None;
        };
        let client = self.client().clone();
        Some(runtime.spawn(async move {
            if let Err(error) = client.logout(kind, &token).await {
                debug!(%kind, error = %error, "backend logout failed");
            }
        }))
    }

    pub fn clear_error(&self) {
        self.update(|state| state.auth.error_message = None);
    }

    fn begin_auth_request(&self) {
        self.update(|state| {
            state.auth.is_loading = true;
            state.auth.error_message = None;
        });
    }

    fn fail_auth(&self, error: &StoreError, sign_out: bool) {
        let message = error.user_message();
        self.update(|state| {
            if sign_out {
                state.reset_session();
            }
            state.auth.is_loading = false;
            state.auth.error_message = Some(message);
        });
        if sign_out {
            self.persist();
        }
    }

    fn accept_session(&self, response: AuthResponse) -> StoreResult<Principal> {
        let token = response
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| StoreError::InvalidSession("backend returned no token".to_string()))?;
        ensure_approved(&response.identity)?;

        let principal = Principal::from_identity(response.identity, token);
        let installed = principal.clone();
        self.update(|state| state.begin_session(installed));
        self.persist();
        Ok(principal)
    }

    /// Swap in a fresh identity for the same token, keeping cached data.
    fn refresh_identity(&self, identity: Identity, token: String) -> StoreResult<Principal> {
        ensure_approved(&identity)?;

        let principal = Principal::from_identity(identity, token);
        let installed = principal.clone();
        self.update(|state| {
            state.auth.principal = installed;
            state.auth.is_loading = false;
            state.auth.error_message = None;
        });
        self.persist();
        Ok(principal)
    }

    /// Secondary loads after sign-in. Failures are logged and never undo the
    /// sign-in itself.
    async fn load_principal_data(&self) {
        let kind = self.select(|state| state.auth.principal.kind());
        match kind {
            Some(PrincipalKind::User) => {
                let (favorites, preferences) =
                    tokio::join!(self.load_favorites(), self.load_notification_preferences());
                log_secondary("favorites", favorites.err());
                log_secondary("notification preferences", preferences.err());
            }
            Some(PrincipalKind::Agent) => {
                let (preferences, stats) =
                    tokio::join!(self.load_notification_preferences(), self.load_dashboard_stats());
                log_secondary("notification preferences", preferences.err());
                log_secondary("dashboard stats", stats.err());
            }
            Some(PrincipalKind::Admin) | None => {}
        }
    }
}

fn ensure_approved(identity: &Identity) -> StoreResult<()> {
    match identity {
        Identity::Agent(agent) if !agent.is_approved() => {
            Err(StoreError::AgentNotApproved(agent.approval_status))
        }
        _ => Ok(()),
    }
}

fn log_secondary(what: &str, error: Option<StoreError>) {
    if let Some(error) = error {
        warn!(error = %error, "failed to load {what}");
    }
}
