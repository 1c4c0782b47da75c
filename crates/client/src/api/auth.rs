//! Login, registration, session validation and logout for every principal kind.

use reqwest::Method;
use tracing::{debug, info};

use crate::client::{route, ApiClient};
use crate::entities::{AuthResponse, Identity, PrincipalKind};
use crate::error::{ApiError, ApiResult};
use crate::types::{
    AgentRegistration, AgentRegistrationResponse, LoginRequest, RawAuthResponse,
    SeekerRegistration,
};

impl RawAuthResponse {
    fn into_identity(self, kind: PrincipalKind) -> ApiResult<(Option<String>, Identity)> {
        let identity = match kind {
            PrincipalKind::User => self.user.map(Identity::User),
            PrincipalKind::Agent => self.agent.map(Identity::Agent),
            PrincipalKind::Admin => self.admin.map(Identity::Admin),
        };
        let identity = identity.ok_or_else(|| {
            ApiError::Decode(format!("response is missing the {} record", kind.envelope_field()))
        })?;
        Ok((self.token, identity))
    }
}

impl ApiClient {
    pub async fn login(&self, kind: PrincipalKind, credentials: &LoginRequest) -> ApiResult<AuthResponse> {
        let request = self
            .request(Method::POST, &route(kind.endpoints().login), None)?
            .json(credentials);
        let raw: RawAuthResponse = self.fetch_json(request).await?;
        let (token, identity) = raw.into_identity(kind)?;

        info!(%kind, principal_id = identity.id(), "login accepted by backend");
        Ok(AuthResponse { token, identity })
    }

    /// Seeker registration signs the new account in straight away.
    pub async fn register_user(&self, registration: &SeekerRegistration) -> ApiResult<AuthResponse> {
        let path = PrincipalKind::User
            .endpoints()
            .register
            .ok_or_else(|| ApiError::InvalidUrl("user registration route".to_string()))?;
        let request = self
            .request(Method::POST, &route(path), None)?
            .json(registration);
        let raw: RawAuthResponse = self.fetch_json(request).await?;
        let (token, identity) = raw.into_identity(PrincipalKind::User)?;
        if token.is_none() {
            return Err(ApiError::Decode("registration response is missing a token".to_string()));
        }

        Ok(AuthResponse { token, identity })
    }

    pub async fn register_agent(
        &self,
        registration: &AgentRegistration,
    ) -> ApiResult<AgentRegistrationResponse> {
        let path = PrincipalKind::Agent
            .endpoints()
            .register
            .ok_or_else(|| ApiError::InvalidUrl("agent registration route".to_string()))?;
        let request = self
            .request(Method::POST, &route(path), None)?
            .json(registration);
        self.fetch_json(request).await
    }

    /// Validate a stored token by fetching the identity it belongs to.
    pub async fn me(&self, kind: PrincipalKind, token: &str) -> ApiResult<Identity> {
        let request = self.request(Method::GET, &route(kind.endpoints().me), Some(token))?;
        let raw: RawAuthResponse = self.fetch_json(request).await?;
        let (_, identity) = raw.into_identity(kind)?;
        Ok(identity)
    }

    pub async fn logout(&self, kind: PrincipalKind, token: &str) -> ApiResult<()> {
        let request = self.request(Method::POST, &route(kind.endpoints().logout), Some(token))?;
        self.fetch_empty(request).await?;
        debug!(%kind, "backend session closed");
        Ok(())
    }
}
