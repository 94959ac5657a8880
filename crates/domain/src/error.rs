#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("This email address is already registered")]
    EmailExists,
    #[error("This username is already taken")]
    UsernameTaken,
    #[error("Password should be at least 6 characters")]
    WeakPassword,
    #[error("Invalid or missing reset link")]
    InvalidCode,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for AuthError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => AuthError::Other("not found".into()),
            ReadError::Storage(storage) => AuthError::Storage(storage),
            ReadError::Other(other) => AuthError::Other(other),
        }
    }
}

impl From<CreateError> for AuthError {
    fn from(value: CreateError) -> Self {
        match value {
            CreateError::Conflict => AuthError::UsernameTaken,
            CreateError::Storage(storage) => AuthError::Storage(storage),
            CreateError::Other(other) => AuthError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error("no session")]
    NoSession,
    #[error("permission denied")]
    PermissionDenied,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("This {0} is already taken")]
    Conflict(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_from_read_error() {
        assert!(matches!(
            AuthError::from(ReadError::Storage(StorageError::NoConnection)),
            AuthError::Storage(StorageError::NoConnection)
        ));
        assert!(matches!(
            AuthError::from(ReadError::Other("foo".into())),
            AuthError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_auth_error_from_create_error() {
        assert!(matches!(
            AuthError::from(CreateError::Conflict),
            AuthError::UsernameTaken
        ));
        assert!(matches!(
            AuthError::from(CreateError::Storage(StorageError::PermissionDenied)),
            AuthError::Storage(StorageError::PermissionDenied)
        ));
        assert!(matches!(
            AuthError::from(CreateError::Other("foo".into())),
            AuthError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::Conflict("username".to_string()).to_string(),
            "This username is already taken"
        );
    }
}
