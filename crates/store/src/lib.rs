//! Client-side application state for PropConnect.
//!
//! [`Store`] owns the signed-in principal, seeker favorites, notification
//! preferences, agent dashboard counters and transient UI state (toasts and
//! the modal slot). State lives in a [`tokio::sync::watch`] channel so any
//! number of views can subscribe. The session subset is written through a
//! [`StateStorage`] backend and rehydrated on start.

mod auth;
mod dashboard;
pub mod error;
mod favorites;
pub mod optimistic;
mod preferences;
pub mod state;
pub mod storage;
mod store;

pub use auth::{Registration, RegistrationOutcome};
pub use error::{StoreError, StoreResult};
pub use optimistic::{OptimisticUpdate, Slot};
pub use state::{
    AuthState, DashboardCounters, Modal, NotificationPreferences, Principal, Severity, StoreState,
    Toast, UiState, UserType,
};
pub use storage::{FileStorage, MemoryStorage, PersistedState, StateStorage, StorageError};
pub use store::{Store, StoreSettings, StoreSlot};
