use derive_more::{AsRef, Display};

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn new(username: &str) -> Result<Self, UsernameError> {
        let trimmed_username = username.trim();

        if trimmed_username.is_empty() {
            return Err(UsernameError::Empty);
        }

        let len = trimmed_username.chars().count();

        if len > 32 {
            return Err(UsernameError::TooLong(len));
        }

        // Usernames are used as document IDs.
        if trimmed_username.contains('/') {
            return Err(UsernameError::InvalidCharacter('/'));
        }

        Ok(Username(trimmed_username.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,
    #[error("Username must be 32 characters or fewer ({0} > 32)")]
    TooLong(usize),
    #[error("Username must not contain '{0}'")]
    InvalidCharacter(char),
}
