use std::collections::BTreeMap;
use std::fmt;

use propconnect_client::ApiError;
use propconnect_store::StoreError;
use thiserror::Error;

pub type ViewResult<T> = Result<T, ViewError>;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("not authorized for this action")]
    NotAuthorized,
}

impl ViewError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field, message);
        ViewError::Validation(errors)
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ViewError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ViewError::Validation(errors) => errors.to_string(),
            ViewError::Store(error) => error.user_message(),
            ViewError::Api(error) => error.user_message(),
            ViewError::NotAuthorized => "You are not allowed to do that.".to_string(),
        }
    }
}

/// Per-field messages collected before anything is sent. Only the first
/// message for a field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Record `check`'s message under `field` when it fails.
    pub fn check(&mut self, field: &str, check: Result<(), String>) {
        if let Err(message) = check {
            self.insert(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn into_result(self) -> ViewResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ViewError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}
