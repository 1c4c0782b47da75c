//! Screen-level logic for PropConnect: forms with field validation and the
//! agent and admin work views. Views talk to the backend through the
//! store's client and report through the store's toasts.

mod access;
mod auth_forms;
mod contact;
pub mod error;
mod featured;
mod inquiries;
mod listing_form;
mod property_detail;
pub mod validation;

pub use auth_forms::{LoginForm, RegistrationForm};
pub use contact::ContactForm;
pub use error::{FieldErrors, ViewError, ViewResult};
pub use featured::FeaturedListingsAdmin;
pub use inquiries::InquiriesView;
pub use listing_form::ListingForm;
pub use property_detail::PropertyDetailView;
