//! # PropConnect Client
//!
//! Typed adapter over the PropConnect REST backend. Every call attaches JSON
//! headers and an optional bearer token; failures surface as [`ApiError`] with
//! an [`ErrorKind`] inferred once at the boundary.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use propconnect_client::{ApiClient, LoginRequest, PrincipalKind};
//! use propconnect_config::ApiConfig;
//!
//! # async fn run() -> Result<(), propconnect_client::ApiError> {
//! let client = ApiClient::new(&ApiConfig::default())?;
//! let credentials = LoginRequest {
//!     email: "buyer@example.com".to_string(),
//!     password: "hunter22".to_string(),
//! };
//! let session = client.login(PrincipalKind::User, &credentials).await?;
//! println!("signed in as {}", session.identity.display_name());
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
pub mod entities;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use entities::*;
pub use error::{ApiError, ApiResult, ErrorKind, DEFAULT_ERROR_MESSAGE};
pub use types::{AgentRegistration, AgentRegistrationResponse, LoginRequest, SeekerRegistration};
