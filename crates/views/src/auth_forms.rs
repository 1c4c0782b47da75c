//! Sign-up and sign-in forms.

use propconnect_client::{AgentRegistration, LoginRequest, PrincipalKind, SeekerRegistration};
use propconnect_store::{Principal, Registration, RegistrationOutcome, Store};

use crate::error::{FieldErrors, ViewResult};
use crate::validation::{optional, require, validate_email, validate_password, validate_phone};

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationForm {
    pub kind: PrincipalKind,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub license_number: String,
    pub brokerage: String,
    pub years_experience: Option<u32>,
}

impl RegistrationForm {
    pub fn new(kind: PrincipalKind) -> Self {
        Self {
            kind,
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            license_number: String::new(),
            brokerage: String::new(),
            years_experience: None,
        }
    }

    pub fn validate(&self) -> ViewResult<Registration> {
        let mut errors = FieldErrors::new();
        if self.kind == PrincipalKind::Admin {
            errors.insert("kind", "Admin accounts cannot be registered");
        }

        errors.check("email", validate_email(&self.email));
        errors.check("password", validate_password(&self.password));
        if self.confirm_password != self.password {
            errors.insert("confirm_password", "Passwords do not match");
        }
        errors.check("first_name", require(&self.first_name, "First name"));
        errors.check("last_name", require(&self.last_name, "Last name"));
        errors.check("phone", validate_phone(&self.phone));

        if self.kind == PrincipalKind::Agent {
            errors.check("license_number", require(&self.license_number, "License number"));
            errors.check("brokerage", require(&self.brokerage, "Brokerage"));
        }
        errors.into_result()?;

        let email = self.email.trim().to_string();
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let phone = optional(&self.phone);

        Ok(match self.kind {
            PrincipalKind::Agent => Registration::Agent(AgentRegistration {
                email,
                password: self.password.clone(),
                first_name,
                last_name,
                phone,
                license_number: self.license_number.trim().to_string(),
                brokerage: self.brokerage.trim().to_string(),
                years_experience: self.years_experience,
            }),
            _ => Registration::Seeker(SeekerRegistration {
                email,
                password: self.password.clone(),
                first_name,
                last_name,
                phone,
            }),
        })
    }

    pub async fn submit(&self, store: &Store) -> ViewResult<RegistrationOutcome> {
        let registration = self.validate()?;
        Ok(store.register(&registration).await?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginForm {
    pub kind: PrincipalKind,
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(kind: PrincipalKind, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            kind,
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> ViewResult<LoginRequest> {
        let mut errors = FieldErrors::new();
        errors.check("email", require(&self.email, "Email"));
        errors.check("password", require(&self.password, "Password"));
        errors.into_result()?;

        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    pub async fn submit(&self, store: &Store) -> ViewResult<Principal> {
        let credentials = self.validate()?;
        Ok(store.login(self.kind, &credentials).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(kind: PrincipalKind) -> RegistrationForm {
        RegistrationForm {
            email: "agent@example.com".to_string(),
            password: "Secret123".to_string(),
            confirm_password: "Secret123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Agent".to_string(),
            ..RegistrationForm::new(kind)
        }
    }

    #[test]
    fn agent_needs_license_and_brokerage() {
        let error = filled(PrincipalKind::Agent).validate().unwrap_err();
        let fields = error.field_errors().unwrap();
        assert!(fields.contains("license_number"));
        assert!(fields.contains("brokerage"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn seeker_form_builds_registration() {
        let mut form = filled(PrincipalKind::User);
        form.phone = "  ".to_string();
        match form.validate().unwrap() {
            Registration::Seeker(registration) => {
                assert_eq!(registration.email, "agent@example.com");
                assert!(registration.phone.is_none());
            }
            other => panic!("unexpected registration {other:?}"),
        }
    }

    #[test]
    fn mismatched_confirmation_and_admin_kind_are_rejected() {
        let mut form = filled(PrincipalKind::Admin);
        form.confirm_password = "Secret124".to_string();
        let error = form.validate().unwrap_err();
        let fields = error.field_errors().unwrap();
        assert!(fields.contains("kind"));
        assert_eq!(fields.get("confirm_password"), Some("Passwords do not match"));
    }

    #[test]
    fn login_requires_both_fields() {
        let error = LoginForm::new(PrincipalKind::User, "", "").validate().unwrap_err();
        assert_eq!(error.field_errors().map(FieldErrors::len), Some(2));
    }
}
