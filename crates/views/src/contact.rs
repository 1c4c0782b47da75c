//! Prospect-to-agent inquiry form.

use tracing::info;

use propconnect_client::{ContactMethod, Inquiry, NewInquiry, PropertyId};
use propconnect_store::{Severity, Store};

use crate::error::{FieldErrors, ViewResult};
use crate::validation::{optional, require, validate_email, validate_min_length, validate_phone};

const MIN_MESSAGE_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ContactForm {
    pub property_id: PropertyId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub preferred_contact: Option<ContactMethod>,
}

impl ContactForm {
    pub fn new(property_id: impl Into<PropertyId>) -> Self {
        Self {
            property_id: property_id.into(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            preferred_contact: None,
        }
    }

    /// Pre-fill from whoever is signed in as a seeker.
    pub fn for_store(property_id: impl Into<PropertyId>, store: &Store) -> Self {
        let mut form = Self::new(property_id);
        if let Some(user) = store.auth().current_user() {
            form.name = user.display_name();
            form.email = user.email.clone();
            form.phone = user.phone.clone().unwrap_or_default();
        }
        form
    }

    pub fn validate(&self) -> ViewResult<NewInquiry> {
        let mut errors = FieldErrors::new();
        errors.check("name", require(&self.name, "Name"));
        errors.check("email", validate_email(&self.email));
        errors.check("phone", validate_phone(&self.phone));
        errors.check(
            "message",
            validate_min_length(&self.message, MIN_MESSAGE_LENGTH, "Message"),
        );
        if self.preferred_contact == Some(ContactMethod::Phone) && self.phone.trim().is_empty() {
            errors.insert("phone", "Phone is required when phone contact is preferred");
        }
        errors.into_result()?;

        Ok(NewInquiry {
            property_id: self.property_id.clone(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional(&self.phone),
            message: self.message.trim().to_string(),
            preferred_contact: self.preferred_contact,
        })
    }

    /// Send the inquiry. A signed-in seeker's token links it to their account.
    pub async fn submit(&self, store: &Store) -> ViewResult<Inquiry> {
        let inquiry = self.validate()?;
        let token = store.select(|state| {
            state
                .auth
                .current_user()
                .and(state.auth.token())
                .map(str::to_string)
        });

        match store.client().create_inquiry(token.as_deref(), &inquiry).await {
            Ok(created) => {
                info!(property_id = %inquiry.property_id, "inquiry sent");
                store.notify("Your message has been sent to the agent", Severity::Success);
                Ok(created)
            }
            Err(error) => {
                store.notify(
                    format!("Could not send your message: {}", error.user_message()),
                    Severity::Error,
                );
                Err(error.into())
            }
        }
    }
}
