//! Client-side checks run before any credentials leave the machine.

use std::fmt;

use crate::backend::{Credentials, Registration};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is blank. Carries the field label.
    Missing(&'static str),
    /// Registration password shorter than `MIN_PASSWORD_LEN` characters.
    PasswordTooShort { min: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing(field) => write!(f, "{field} is required"),
            ValidationError::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(())
    }
}

pub fn validate_login(credentials: &Credentials) -> Result<(), ValidationError> {
    require(&credentials.email, "Email")?;
    require(&credentials.password, "Password")
}

pub fn validate_registration(registration: &Registration) -> Result<(), ValidationError> {
    require(&registration.name, "Name")?;
    require(&registration.email, "Email")?;
    require(&registration.password, "Password")?;
    if registration.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}
