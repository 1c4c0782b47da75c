use propconnect_client::{ApiError, ApprovalStatus};
use thiserror::Error;

use crate::storage::StorageError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Validation(String),
    #[error("agent account is {}", .0.as_str())]
    AgentNotApproved(ApprovalStatus),
    #[error("sign in required")]
    NotAuthenticated,
    #[error("invalid session: {0}")]
    InvalidSession(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Text suitable for `error_message` and toasts.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Api(error) => error.user_message(),
            StoreError::Validation(message) => message.clone(),
            StoreError::AgentNotApproved(ApprovalStatus::Rejected) => {
                "Your agent application was not approved. Please contact support.".to_string()
            }
            StoreError::AgentNotApproved(ApprovalStatus::Suspended) => {
                "Your agent account has been suspended. Please contact support.".to_string()
            }
            StoreError::AgentNotApproved(_) => {
                "Your agent account is pending approval. You will be able to sign in once an administrator approves it."
                    .to_string()
            }
            StoreError::NotAuthenticated => "Please sign in to continue.".to_string(),
            StoreError::InvalidSession(_) => {
                "Your session could not be established. Please sign in again.".to_string()
            }
            StoreError::Storage(_) => "Unable to save your session on this device.".to_string(),
        }
    }
}
