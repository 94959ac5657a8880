use std::fmt;

use derive_more::{AsRef, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub display_name: Option<String>,
    pub email: Email,
}

impl User {
    /// The name shown to the user, falling back to the email address.
    #[must_use]
    pub fn name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.as_str(),
        }
    }
}

/// Opaque identifier assigned by the authentication provider.
#[derive(AsRef, Debug, Display, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserID(String);

impl UserID {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn new(email: &str) -> Result<Self, EmailError> {
        let email = email.trim();

        if email.is_empty() {
            return Err(EmailError::Empty);
        }

        if email.chars().any(char::is_whitespace) {
            return Err(EmailError::Invalid);
        }

        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Email(email.to_string()))
            }
            _ => Err(EmailError::Invalid),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EmailError {
    #[error("Email must not be empty")]
    Empty,
    #[error("Invalid email address")]
    Invalid,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    pub fn new(password: &str) -> Result<Self, PasswordError> {
        let len = password.chars().count();

        if len < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort(len));
        }

        Ok(Password(password.to_string()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password(***)")
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PasswordError {
    #[error("Password must be at least 6 characters ({0} < 6)")]
    TooShort(usize),
}
