//! Input validation utilities.

use regex::Regex;

pub type Check = Result<(), String>;

fn pattern(expression: &str) -> Result<Regex, String> {
    Regex::new(expression).map_err(|_| "Internal validation error".to_string())
}

pub fn require(value: &str, label: &str) -> Check {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Check {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    let email_regex = pattern(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")?;
    if !email_regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    if email.len() > 255 {
        return Err("Email too long".to_string());
    }

    Ok(())
}

/// At least 8 characters with one letter and one digit.
pub fn validate_password(password: &str) -> Check {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be less than 128 characters long".to_string());
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one letter".to_string());
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit".to_string());
    }

    Ok(())
}

/// Optional fields pass when blank.
pub fn validate_phone(phone: &str) -> Check {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(());
    }

    let phone_regex = pattern(r"^\+?[0-9() .-]{7,20}$")?;
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !phone_regex.is_match(phone) || digits < 7 {
        return Err("Invalid phone number".to_string());
    }

    Ok(())
}

/// Five digits with an optional +4 suffix.
pub fn validate_zip(zip: &str) -> Check {
    let zip_regex = pattern(r"^[0-9]{5}(-[0-9]{4})?$")?;
    if !zip_regex.is_match(zip.trim()) {
        return Err("ZIP code must be 5 digits (optionally +4)".to_string());
    }
    Ok(())
}

/// Two-letter state code.
pub fn validate_state(state: &str) -> Check {
    let state_regex = pattern(r"^[A-Za-z]{2}$")?;
    if !state_regex.is_match(state.trim()) {
        return Err("State must be a 2-letter code".to_string());
    }
    Ok(())
}

pub fn validate_min_length(value: &str, min: usize, label: &str) -> Check {
    let length = value.trim().chars().count();
    if length == 0 {
        return Err(format!("{label} is required"));
    }
    if length < min {
        return Err(format!("{label} must be at least {min} characters"));
    }
    Ok(())
}

/// Trim and turn blanks into `None`.
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
