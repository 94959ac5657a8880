use crate::User;

#[derive(Debug, PartialEq)]
pub enum Access<'a> {
    Granted(&'a User),
    RedirectToLogin,
}

/// Decide whether a protected view may be shown.
#[must_use]
pub fn access(user: Option<&User>) -> Access<'_> {
    match user {
        Some(user) => Access::Granted(user),
        None => Access::RedirectToLogin,
    }
}
