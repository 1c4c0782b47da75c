//! Serde projections of backend entities exchanged with the client.

pub mod auth;
pub mod inquiry;
pub mod listing;
pub mod preferences;
pub mod property;

pub use auth::*;
pub use inquiry::*;
pub use listing::*;
pub use preferences::*;
pub use property::*;
