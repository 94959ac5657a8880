use activeflow_domain as domain;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone, Copy, Default)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RestError {
    #[error("no connection")]
    NoConnection,
    #[error("no session")]
    NoSession,
    #[error("{code} ({status}): {message}")]
    Status {
        status: u16,
        code: String,
        message: String,
    },
    #[error("deserialization failed: {0}")]
    Deserialization(String),
    #[error("invalid request: {0}")]
    Request(String),
    #[error("local storage: {0}")]
    LocalStorage(String),
}

impl RestError {
    fn has_code(&self, codes: &[&str]) -> bool {
        match self {
            RestError::Status { code, .. } => codes.contains(&code.as_str()),
            _ => false,
        }
    }

    fn has_status(&self, expected: u16) -> bool {
        matches!(self, RestError::Status { status, .. } if *status == expected)
    }
}

impl From<url::ParseError> for RestError {
    fn from(value: url::ParseError) -> Self {
        RestError::Request(value.to_string())
    }
}

impl From<gloo_storage::errors::StorageError> for RestError {
    fn from(value: gloo_storage::errors::StorageError) -> Self {
        RestError::LocalStorage(value.to_string())
    }
}

const SESSION_CODES: [&str; 6] = [
    "UNAUTHENTICATED",
    "TOKEN_EXPIRED",
    "INVALID_ID_TOKEN",
    "INVALID_REFRESH_TOKEN",
    "USER_NOT_FOUND",
    "CREDENTIAL_TOO_OLD_LOGIN_AGAIN",
];

impl From<RestError> for domain::StorageError {
    fn from(value: RestError) -> Self {
        match value {
            RestError::NoConnection => domain::StorageError::NoConnection,
            RestError::NoSession => domain::StorageError::NoSession,
            err if err.has_code(&["PERMISSION_DENIED"]) || err.has_status(403) => {
                domain::StorageError::PermissionDenied
            }
            err if err.has_code(&SESSION_CODES) || err.has_status(401) => {
                domain::StorageError::NoSession
            }
            err => domain::StorageError::Other(Box::new(err)),
        }
    }
}

impl From<RestError> for domain::ReadError {
    fn from(value: RestError) -> Self {
        if value.has_code(&["NOT_FOUND"]) || value.has_status(404) {
            return domain::ReadError::NotFound;
        }
        domain::ReadError::Storage(value.into())
    }
}

impl From<RestError> for domain::CreateError {
    fn from(value: RestError) -> Self {
        if value.has_code(&["ALREADY_EXISTS"]) || value.has_status(409) {
            return domain::CreateError::Conflict;
        }
        domain::CreateError::Storage(value.into())
    }
}

impl From<RestError> for domain::DeleteError {
    fn from(value: RestError) -> Self {
        domain::DeleteError::Storage(value.into())
    }
}

impl From<RestError> for domain::AuthError {
    fn from(value: RestError) -> Self {
        if value.has_code(&["EMAIL_EXISTS"]) {
            domain::AuthError::EmailExists
        } else if value.has_code(&[
            "INVALID_LOGIN_CREDENTIALS",
            "EMAIL_NOT_FOUND",
            "INVALID_PASSWORD",
            "INVALID_EMAIL",
            "USER_DISABLED",
        ]) {
            domain::AuthError::InvalidCredentials
        } else if value.has_code(&["WEAK_PASSWORD"]) {
            domain::AuthError::WeakPassword
        } else if value.has_code(&["INVALID_OOB_CODE", "EXPIRED_OOB_CODE"]) {
            domain::AuthError::InvalidCode
        } else {
            domain::AuthError::Storage(value.into())
        }
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Extract the error code of a Firebase error response.
///
/// Identity Toolkit puts the code at the start of the message (`WEAK_PASSWORD : Password should
/// be at least 6 characters`), Firestore uses the status field.
pub(crate) fn parse_error(status: u16, body: &str) -> RestError {
    let Ok(ErrorResponse { error }) = serde_json::from_str::<ErrorResponse>(body) else {
        return RestError::Status {
            status,
            code: String::new(),
            message: body.to_string(),
        };
    };

    let token = error
        .message
        .split([' ', ':'])
        .next()
        .unwrap_or_default();
    let code = if is_error_code(token) {
        token.to_string()
    } else {
        error.status.unwrap_or_default()
    };

    RestError::Status {
        status,
        code,
        message: error.message,
    }
}

fn is_error_code(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

pub(crate) async fn fetch<S, T>(sender: &S, request: Result<Request, gloo_net::Error>) -> Result<T, RestError>
where
    S: SendRequest,
    T: DeserializeOwned,
{
    let request = request.map_err(|err| RestError::Request(err.to_string()))?;
    let response = sender
        .send_request(request)
        .await
        .map_err(|_| RestError::NoConnection)?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(parse_error(status, &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| RestError::Deserialization(err.to_string()))
}

pub(crate) fn get(url: &Url, token: Option<&str>) -> Result<Request, gloo_net::Error> {
    authorize(Request::get(url.as_str()), token).build()
}

pub(crate) fn post<B: Serialize>(
    url: &Url,
    body: &B,
    token: Option<&str>,
) -> Result<Request, gloo_net::Error> {
    authorize(Request::post(url.as_str()), token).json(body)
}

fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}
