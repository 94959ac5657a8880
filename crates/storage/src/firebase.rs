//! Firebase
//!
//! Authentication is done by the Identity Toolkit and Secure Token REST APIs, documents are
//! stored in Cloud Firestore. The session is kept in the local storage of the browser.

use activeflow_domain as domain;
use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use url::Url;

use crate::{
    document::{self, Document, RunQueryResponseItem, USERNAMES, WORKOUTS},
    local_storage::{LocalStorage, Session},
    rest::{self, GlooNetSendRequest, RestError, SendRequest},
};

const IDENTITY_TOOLKIT: &str = "identitytoolkit.googleapis.com";
const SECURE_TOKEN: &str = "securetoken.googleapis.com";
const FIRESTORE: &str = "firestore.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    pub auth_emulator_host: Option<String>,
    pub firestore_emulator_host: Option<String>,
}

impl FirebaseConfig {
    #[must_use]
    pub fn new(api_key: &str, project_id: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            project_id: project_id.to_string(),
            auth_emulator_host: None,
            firestore_emulator_host: None,
        }
    }

    /// Use the local emulators for the hosts that are given and not empty.
    #[must_use]
    pub fn with_emulators(mut self, auth: Option<&str>, firestore: Option<&str>) -> Self {
        let host = |host: Option<&str>| {
            host.map(str::trim)
                .filter(|h| !h.is_empty())
                .map(ToString::to_string)
        };
        self.auth_emulator_host = host(auth);
        self.firestore_emulator_host = host(firestore);
        self
    }

    fn google_api(&self, service: &str) -> String {
        match &self.auth_emulator_host {
            Some(host) => format!("http://{host}/{service}"),
            None => format!("https://{service}"),
        }
    }

    fn with_key(&self, url: &str) -> Result<Url, RestError> {
        let mut url = Url::parse(url)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    pub fn accounts_url(&self, method: &str) -> Result<Url, RestError> {
        self.with_key(&format!(
            "{}/v1/accounts:{method}",
            self.google_api(IDENTITY_TOOLKIT)
        ))
    }

    pub fn token_url(&self) -> Result<Url, RestError> {
        self.with_key(&format!("{}/v1/token", self.google_api(SECURE_TOKEN)))
    }

    fn documents(&self) -> String {
        let host = match &self.firestore_emulator_host {
            Some(host) => format!("http://{host}"),
            None => format!("https://{FIRESTORE}"),
        };
        format!(
            "{host}/v1/projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    pub fn document_url(&self, collection: &str, id: &str) -> Result<Url, RestError> {
        let mut url = Url::parse(&self.documents())?;
        url.path_segments_mut()
            .map_err(|()| RestError::Request(format!("invalid base URL {}", self.documents())))?
            .push(collection)
            .push(id);
        Ok(url)
    }

    /// URL for creating a document. Without ID, an ID is generated by Firestore.
    pub fn collection_url(&self, collection: &str, id: Option<&str>) -> Result<Url, RestError> {
        let mut url = Url::parse(&self.documents())?;
        url.path_segments_mut()
            .map_err(|()| RestError::Request(format!("invalid base URL {}", self.documents())))?
            .push(collection);
        if let Some(id) = id {
            url.query_pairs_mut().append_pair("documentId", id);
        }
        Ok(url)
    }

    pub fn run_query_url(&self) -> Result<Url, RestError> {
        Ok(Url::parse(&format!("{}:runQuery", self.documents()))?)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAuthUriResponse {
    auth_uri: String,
    session_id: String,
}

fn expires_at(now: DateTime<Utc>, expires_in: Option<&str>) -> DateTime<Utc> {
    let seconds = expires_in
        .and_then(|e| e.trim().parse::<i64>().ok())
        .unwrap_or(3600);
    now + TimeDelta::seconds(seconds)
}

#[derive(Clone)]
pub struct Firebase<S: SendRequest> {
    pub config: FirebaseConfig,
    pub sender: S,
    pub local_storage: LocalStorage,
}

impl Firebase<GlooNetSendRequest> {
    #[must_use]
    pub const fn new(config: FirebaseConfig) -> Self {
        Self {
            config,
            sender: GlooNetSendRequest,
            local_storage: LocalStorage,
        }
    }
}

impl<S: SendRequest> Firebase<S> {
    async fn get<T: DeserializeOwned>(
        &self,
        url: &Url,
        token: Option<&str>,
    ) -> Result<T, RestError> {
        rest::fetch(&self.sender, rest::get(url, token)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &Url,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, RestError> {
        rest::fetch(&self.sender, rest::post(url, body, token)).await
    }

    /// Store the tokens of an authentication response. Missing values are taken from the
    /// previous session.
    fn start_session(
        &self,
        response: AuthResponse,
        previous: Option<&Session>,
    ) -> Result<Session, RestError> {
        let session = Session {
            id_token: response
                .id_token
                .or_else(|| previous.map(|s| s.id_token.clone()))
                .ok_or(RestError::NoSession)?,
            refresh_token: response
                .refresh_token
                .or_else(|| previous.map(|s| s.refresh_token.clone()))
                .ok_or(RestError::NoSession)?,
            expires_at: match (&response.expires_in, previous) {
                (None, Some(previous)) => previous.expires_at,
                (expires_in, _) => expires_at(Utc::now(), expires_in.as_deref()),
            },
            user_id: response.local_id,
            email: response
                .email
                .or_else(|| previous.map(|s| s.email.clone()))
                .ok_or_else(|| RestError::Deserialization("missing email".to_string()))?,
            display_name: response
                .display_name
                .filter(|name| !name.trim().is_empty())
                .or_else(|| previous.and_then(|s| s.display_name.clone())),
        };
        self.local_storage.write_session(&session)?;
        Ok(session)
    }

    /// The current session, with an ID token that is valid for at least another minute.
    async fn session(&self) -> Result<Session, RestError> {
        let session = self
            .local_storage
            .read_session()?
            .ok_or(RestError::NoSession)?;

        if !session.expires_soon(Utc::now()) {
            return Ok(session);
        }

        debug!("refreshing ID token");
        let response: Result<TokenResponse, RestError> = self
            .post(
                &self.config.token_url()?,
                &json!({
                    "grant_type": "refresh_token",
                    "refresh_token": session.refresh_token,
                }),
                None,
            )
            .await;

        match response {
            Ok(response) => {
                let session = Session {
                    id_token: response.id_token,
                    refresh_token: response.refresh_token,
                    expires_at: expires_at(Utc::now(), Some(&response.expires_in)),
                    ..session
                };
                self.local_storage.write_session(&session)?;
                Ok(session)
            }
            Err(err) => {
                if matches!(err, RestError::Status { status, .. } if (400..500).contains(&status)) {
                    self.local_storage.delete_session();
                }
                Err(err)
            }
        }
    }

    async fn sign_in_with(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<domain::User, RestError> {
        let response: AuthResponse = self
            .post(&self.config.accounts_url(method)?, body, None)
            .await?;
        self.start_session(response, None)?.user()
    }
}

impl<S: SendRequest> domain::AuthRepository for Firebase<S> {
    async fn read_session(&self) -> Result<domain::User, domain::ReadError> {
        Ok(self.session().await?.user()?)
    }

    async fn sign_in(
        &self,
        email: &domain::Email,
        password: &domain::Password,
    ) -> Result<domain::User, domain::AuthError> {
        Ok(self
            .sign_in_with(
                "signInWithPassword",
                &json!({
                    "email": email.as_str(),
                    "password": password.expose(),
                    "returnSecureToken": true,
                }),
            )
            .await?)
    }

    async fn sign_up(
        &self,
        email: &domain::Email,
        password: &domain::Password,
    ) -> Result<domain::User, domain::AuthError> {
        Ok(self
            .sign_in_with(
                "signUp",
                &json!({
                    "email": email.as_str(),
                    "password": password.expose(),
                    "returnSecureToken": true,
                }),
            )
            .await?)
    }

    async fn set_display_name(
        &self,
        name: &domain::Username,
    ) -> Result<domain::User, domain::AuthError> {
        let session = self.session().await?;
        let response: AuthResponse = self
            .post(
                &self.config.accounts_url("update")?,
                &json!({
                    "idToken": session.id_token,
                    "displayName": name.as_str(),
                    "returnSecureToken": true,
                }),
                None,
            )
            .await?;
        Ok(self.start_session(response, Some(&session))?.user()?)
    }

    async fn create_federated_sign_in(
        &self,
        provider: domain::FederatedProvider,
        redirect_uri: &str,
    ) -> Result<domain::FederatedSignIn, domain::AuthError> {
        let response: CreateAuthUriResponse = self
            .post(
                &self.config.accounts_url("createAuthUri")?,
                &json!({
                    "providerId": provider.provider_id(),
                    "continueUri": redirect_uri,
                }),
                None,
            )
            .await?;
        self.local_storage
            .write_federated_session_id(&response.session_id)?;
        Ok(domain::FederatedSignIn {
            auth_uri: response.auth_uri,
            session_id: response.session_id,
        })
    }

    async fn complete_federated_sign_in(
        &self,
        callback_uri: &str,
    ) -> Result<domain::User, domain::AuthError> {
        let session_id = self
            .local_storage
            .read_federated_session_id()?
            .ok_or(RestError::NoSession)?;
        let user = self
            .sign_in_with(
                "signInWithIdp",
                &json!({
                    "requestUri": callback_uri,
                    "sessionId": session_id,
                    "returnSecureToken": true,
                    "returnIdpCredential": true,
                }),
            )
            .await?;
        self.local_storage.delete_federated_session_id();
        Ok(user)
    }

    async fn send_password_reset_email(
        &self,
        email: &domain::Email,
    ) -> Result<(), domain::AuthError> {
        let _: serde_json::Value = self
            .post(
                &self.config.accounts_url("sendOobCode")?,
                &json!({
                    "requestType": "PASSWORD_RESET",
                    "email": email.as_str(),
                }),
                None,
            )
            .await?;
        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        code: &str,
        password: &domain::Password,
    ) -> Result<(), domain::AuthError> {
        let _: serde_json::Value = self
            .post(
                &self.config.accounts_url("resetPassword")?,
                &json!({
                    "oobCode": code,
                    "newPassword": password.expose(),
                }),
                None,
            )
            .await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), domain::DeleteError> {
        self.local_storage.delete_session();
        Ok(())
    }
}

impl<S: SendRequest> domain::UsernameRepository for Firebase<S> {
    async fn read_username(
        &self,
        username: &domain::Username,
    ) -> Result<Option<domain::UserID>, domain::ReadError> {
        let token = self.session().await.ok().map(|session| session.id_token);
        let result: Result<Document, RestError> = self
            .get(
                &self.config.document_url(USERNAMES, username.as_str())?,
                token.as_deref(),
            )
            .await;
        match result {
            Ok(document) => Ok(Some(
                document::decode_username(&document).map_err(RestError::from)?,
            )),
            Err(err) => match domain::ReadError::from(err) {
                domain::ReadError::NotFound => Ok(None),
                err => Err(err),
            },
        }
    }

    async fn create_username(
        &self,
        username: &domain::Username,
        user: &domain::User,
    ) -> Result<(), domain::CreateError> {
        let session = self.session().await?;
        let _: Document = self
            .post(
                &self
                    .config
                    .collection_url(USERNAMES, Some(username.as_str()))?,
                &document::encode_username(user),
                Some(&session.id_token),
            )
            .await?;
        Ok(())
    }
}

impl<S: SendRequest> domain::WorkoutRepository for Firebase<S> {
    async fn read_workouts(
        &self,
        owner: &domain::UserID,
    ) -> Result<Vec<domain::Workout>, domain::ReadError> {
        let session = self.session().await?;
        let items: Vec<RunQueryResponseItem> = self
            .post(
                &self.config.run_query_url()?,
                &json!({
                    "structuredQuery": {
                        "from": [{ "collectionId": WORKOUTS }],
                        "where": {
                            "fieldFilter": {
                                "field": { "fieldPath": "userId" },
                                "op": "EQUAL",
                                "value": { "stringValue": owner.as_str() },
                            }
                        }
                    }
                }),
                Some(&session.id_token),
            )
            .await?;
        Ok(items
            .iter()
            .filter_map(|item| item.document.as_ref())
            .map(document::decode_workout)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RestError::from)?)
    }

    async fn read_workout(
        &self,
        id: &domain::WorkoutID,
    ) -> Result<domain::Workout, domain::ReadError> {
        let session = self.session().await?;
        let document: Document = self
            .get(
                &self.config.document_url(WORKOUTS, id.as_str())?,
                Some(&session.id_token),
            )
            .await?;
        Ok(document::decode_workout(&document).map_err(RestError::from)?)
    }

    async fn create_workout(
        &self,
        owner: &domain::UserID,
        workout: domain::NewWorkout,
    ) -> Result<domain::Workout, domain::CreateError> {
        let session = self.session().await?;
        let document: Document = self
            .post(
                &self.config.collection_url(WORKOUTS, None)?,
                &document::encode_workout(owner, &workout),
                Some(&session.id_token),
            )
            .await?;
        Ok(document::decode_workout(&document).map_err(RestError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_config_urls() {
        let config = FirebaseConfig::new("KEY", "activeflow");

        assert_eq!(
            config.accounts_url("signUp").unwrap().as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=KEY"
        );
        assert_eq!(
            config.token_url().unwrap().as_str(),
            "https://securetoken.googleapis.com/v1/token?key=KEY"
        );
        assert_eq!(
            config.document_url("usernames", "Alice Example").unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/activeflow/databases/(default)/documents/usernames/Alice%20Example"
        );
        assert_eq!(
            config.collection_url("usernames", Some("alice")).unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/activeflow/databases/(default)/documents/usernames?documentId=alice"
        );
        assert_eq!(
            config.collection_url("workouts", None).unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/activeflow/databases/(default)/documents/workouts"
        );
        assert_eq!(
            config.run_query_url().unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/activeflow/databases/(default)/documents:runQuery"
        );
    }

    #[test]
    fn test_config_emulator_urls() {
        let config = FirebaseConfig::new("KEY", "activeflow")
            .with_emulators(Some("localhost:9099"), Some("localhost:8080"));

        assert_eq!(
            config.accounts_url("signInWithPassword").unwrap().as_str(),
            "http://localhost:9099/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=KEY"
        );
        assert_eq!(
            config.token_url().unwrap().as_str(),
            "http://localhost:9099/securetoken.googleapis.com/v1/token?key=KEY"
        );
        assert_eq!(
            config.run_query_url().unwrap().as_str(),
            "http://localhost:8080/v1/projects/activeflow/databases/(default)/documents:runQuery"
        );
    }

    #[test]
    fn test_config_empty_emulator_host() {
        let config = FirebaseConfig::new("KEY", "activeflow").with_emulators(Some(""), None);

        assert_eq!(config.auth_emulator_host, None);
        assert_eq!(config.firestore_emulator_host, None);
    }

    #[test]
    fn test_expires_at() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        assert_eq!(
            expires_at(now, Some("3600")),
            Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap()
        );
        assert_eq!(
            expires_at(now, Some("invalid")),
            Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap()
        );
        assert_eq!(
            expires_at(now, Some("60")),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 1, 0).unwrap()
        );
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    mod wasm {
        use std::{cell::RefCell, collections::VecDeque};

        use activeflow_domain::{
            AuthRepository, UsernameRepository, WorkoutRepository,
        };
        use pretty_assertions::assert_eq;
        use wasm_bindgen_test::wasm_bindgen_test;

        use super::*;
        use crate::tests::data::{GYM_WORKOUT, RUNNING_WORKOUT, SESSION, USER};

        #[wasm_bindgen_test]
        async fn test_sign_in() {
            LocalStorage.delete_session();
            let firebase = firebase_with_responses(vec![Ok(json_response(
                200,
                &json!({
                    "localId": "uid-alice",
                    "email": "alice@example.com",
                    "displayName": "alice",
                    "idToken": "id-token",
                    "refreshToken": "refresh-token",
                    "expiresIn": "3600",
                    "registered": true
                }),
            ))]);

            let user = firebase
                .sign_in(
                    &domain::Email::new("alice@example.com").unwrap(),
                    &domain::Password::new("secret").unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(user, *USER);
            assert_eq!(
                firebase.sender.urls(),
                vec!["https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=KEY"]
            );
            assert_eq!(firebase.read_session().await.unwrap(), *USER);
        }

        #[wasm_bindgen_test]
        async fn test_sign_in_invalid_credentials() {
            LocalStorage.delete_session();
            let firebase = firebase_with_responses(vec![Ok(json_response(
                400,
                &json!({"error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS", "status": "INVALID_ARGUMENT"}}),
            ))]);

            assert!(matches!(
                firebase
                    .sign_in(
                        &domain::Email::new("alice@example.com").unwrap(),
                        &domain::Password::new("wrong!").unwrap(),
                    )
                    .await,
                Err(domain::AuthError::InvalidCredentials)
            ));
            assert!(matches!(
                firebase.read_session().await,
                Err(domain::ReadError::Storage(domain::StorageError::NoSession))
            ));
        }

        #[wasm_bindgen_test]
        async fn test_sign_in_no_connection() {
            let firebase = firebase_with_responses(vec![]);

            assert!(matches!(
                firebase
                    .sign_in(
                        &domain::Email::new("alice@example.com").unwrap(),
                        &domain::Password::new("secret").unwrap(),
                    )
                    .await,
                Err(domain::AuthError::Storage(domain::StorageError::NoConnection))
            ));
        }

        #[wasm_bindgen_test]
        async fn test_set_display_name() {
            LocalStorage.write_session(&session_valid_for_an_hour()).unwrap();
            let firebase = firebase_with_responses(vec![Ok(json_response(
                200,
                &json!({
                    "localId": "uid-alice",
                    "email": "alice@example.com",
                    "displayName": "alicia"
                }),
            ))]);

            let user = firebase
                .set_display_name(&domain::Username::new("alicia").unwrap())
                .await
                .unwrap();

            assert_eq!(user.display_name.as_deref(), Some("alicia"));
            assert_eq!(
                LocalStorage.read_session().unwrap().unwrap().id_token,
                "valid-id-token"
            );
        }

        #[wasm_bindgen_test]
        async fn test_expired_session_is_refreshed() {
            LocalStorage.write_session(&SESSION).unwrap();
            let firebase = firebase_with_responses(vec![
                Ok(json_response(
                    200,
                    &json!({
                        "id_token": "new-id-token",
                        "refresh_token": "new-refresh-token",
                        "expires_in": "3600",
                        "token_type": "Bearer",
                        "user_id": "uid-alice"
                    }),
                )),
            ]);

            assert_eq!(firebase.read_session().await.unwrap(), *USER);
            assert_eq!(
                LocalStorage.read_session().unwrap().unwrap().id_token,
                "new-id-token"
            );
        }

        #[wasm_bindgen_test]
        async fn test_invalid_refresh_token_ends_session() {
            LocalStorage.write_session(&SESSION).unwrap();
            let firebase = firebase_with_responses(vec![Ok(json_response(
                400,
                &json!({"error": {"code": 400, "message": "INVALID_REFRESH_TOKEN", "status": "INVALID_ARGUMENT"}}),
            ))]);

            assert!(matches!(
                firebase.read_session().await,
                Err(domain::ReadError::Storage(domain::StorageError::NoSession))
            ));
            assert_eq!(LocalStorage.read_session().unwrap(), None);
        }

        #[wasm_bindgen_test]
        async fn test_federated_sign_in() {
            LocalStorage.delete_session();
            LocalStorage.delete_federated_session_id();
            let firebase = firebase_with_responses(vec![
                Ok(json_response(
                    200,
                    &json!({
                        "kind": "identitytoolkit#CreateAuthUriResponse",
                        "authUri": "https://accounts.google.com/o/oauth2/auth?client_id=x",
                        "providerId": "google.com",
                        "sessionId": "session-id"
                    }),
                )),
                Ok(json_response(
                    200,
                    &json!({
                        "localId": "uid-alice",
                        "email": "alice@example.com",
                        "displayName": "alice",
                        "idToken": "id-token",
                        "refreshToken": "refresh-token",
                        "expiresIn": "3600"
                    }),
                )),
            ]);

            let sign_in = firebase
                .create_federated_sign_in(
                    domain::FederatedProvider::Google,
                    "http://localhost/login/callback",
                )
                .await
                .unwrap();
            assert_eq!(sign_in.session_id, "session-id");
            assert_eq!(
                LocalStorage.read_federated_session_id().unwrap(),
                Some("session-id".to_string())
            );

            let user = firebase
                .complete_federated_sign_in("http://localhost/login/callback?code=abc")
                .await
                .unwrap();
            assert_eq!(user, *USER);
            assert_eq!(LocalStorage.read_federated_session_id().unwrap(), None);
        }

        #[wasm_bindgen_test]
        async fn test_complete_federated_sign_in_without_session() {
            LocalStorage.delete_federated_session_id();
            let firebase = firebase_with_responses(vec![]);

            assert!(matches!(
                firebase
                    .complete_federated_sign_in("http://localhost/login/callback?code=abc")
                    .await,
                Err(domain::AuthError::Storage(domain::StorageError::NoSession))
            ));
        }

        #[wasm_bindgen_test]
        async fn test_confirm_password_reset_invalid_code() {
            let firebase = firebase_with_responses(vec![Ok(json_response(
                400,
                &json!({"error": {"code": 400, "message": "INVALID_OOB_CODE", "status": "INVALID_ARGUMENT"}}),
            ))]);

            assert!(matches!(
                firebase
                    .confirm_password_reset("code", &domain::Password::new("secret").unwrap())
                    .await,
                Err(domain::AuthError::InvalidCode)
            ));
        }

        #[wasm_bindgen_test]
        async fn test_read_username() {
            LocalStorage.delete_session();
            let firebase = firebase_with_responses(vec![
                Ok(json_response(
                    200,
                    &json!({
                        "name": "projects/activeflow/databases/(default)/documents/usernames/alice",
                        "fields": {
                            "uid": {"stringValue": "uid-alice"},
                            "email": {"stringValue": "alice@example.com"}
                        }
                    }),
                )),
                Ok(json_response(
                    404,
                    &json!({"error": {"code": 404, "message": "Document not found.", "status": "NOT_FOUND"}}),
                )),
            ]);

            assert_eq!(
                firebase
                    .read_username(&domain::Username::new("alice").unwrap())
                    .await
                    .unwrap(),
                Some(USER.id.clone())
            );
            assert_eq!(
                firebase
                    .read_username(&domain::Username::new("bob").unwrap())
                    .await
                    .unwrap(),
                None
            );
        }

        #[wasm_bindgen_test]
        async fn test_create_username_conflict() {
            LocalStorage.write_session(&session_valid_for_an_hour()).unwrap();
            let firebase = firebase_with_responses(vec![Ok(json_response(
                409,
                &json!({"error": {"code": 409, "message": "Document already exists", "status": "ALREADY_EXISTS"}}),
            ))]);

            assert!(matches!(
                firebase
                    .create_username(&domain::Username::new("alice").unwrap(), &USER)
                    .await,
                Err(domain::CreateError::Conflict)
            ));
        }

        #[wasm_bindgen_test]
        async fn test_read_workouts() {
            LocalStorage.write_session(&session_valid_for_an_hour()).unwrap();
            let firebase = firebase_with_responses(vec![Ok(json_response(
                200,
                &json!([
                    {"document": workout_document("gym", &GYM_WORKOUT), "readTime": "2024-01-05T00:00:00Z"},
                    {"document": workout_document("running", &RUNNING_WORKOUT), "readTime": "2024-01-05T00:00:00Z"}
                ]),
            ))]);

            let workouts = firebase.read_workouts(&USER.id).await.unwrap();

            assert_eq!(workouts, vec![GYM_WORKOUT.clone(), RUNNING_WORKOUT.clone()]);
            assert_eq!(
                firebase.sender.urls(),
                vec!["https://firestore.googleapis.com/v1/projects/activeflow/databases/(default)/documents:runQuery"]
            );
            assert_eq!(
                firebase.sender.authorization(),
                vec![Some("Bearer valid-id-token".to_string())]
            );
        }

        #[wasm_bindgen_test]
        async fn test_read_workouts_empty() {
            LocalStorage.write_session(&session_valid_for_an_hour()).unwrap();
            let firebase = firebase_with_responses(vec![Ok(json_response(
                200,
                &json!([{"readTime": "2024-01-05T00:00:00Z"}]),
            ))]);

            assert_eq!(firebase.read_workouts(&USER.id).await.unwrap(), vec![]);
        }

        #[wasm_bindgen_test]
        async fn test_read_workouts_without_session() {
            LocalStorage.delete_session();
            let firebase = firebase_with_responses(vec![]);

            assert!(matches!(
                firebase.read_workouts(&USER.id).await,
                Err(domain::ReadError::Storage(domain::StorageError::NoSession))
            ));
            assert!(firebase.sender.urls().is_empty());
        }

        #[wasm_bindgen_test]
        async fn test_read_workout_permission_denied() {
            LocalStorage.write_session(&session_valid_for_an_hour()).unwrap();
            let firebase = firebase_with_responses(vec![Ok(json_response(
                403,
                &json!({"error": {"code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED"}}),
            ))]);

            assert!(matches!(
                firebase.read_workout(&GYM_WORKOUT.id).await,
                Err(domain::ReadError::Storage(
                    domain::StorageError::PermissionDenied
                ))
            ));
        }

        #[wasm_bindgen_test]
        async fn test_create_workout() {
            LocalStorage.write_session(&session_valid_for_an_hour()).unwrap();
            let firebase = firebase_with_responses(vec![Ok(json_response(
                200,
                &workout_document("gym", &GYM_WORKOUT),
            ))]);

            let workout = firebase
                .create_workout(
                    &USER.id,
                    domain::NewWorkout {
                        timestamp: GYM_WORKOUT.timestamp,
                        duration: GYM_WORKOUT.duration,
                        details: GYM_WORKOUT.details.clone(),
                        activity: GYM_WORKOUT.activity.clone(),
                    },
                )
                .await
                .unwrap();

            assert_eq!(workout, *GYM_WORKOUT);
            assert_eq!(
                firebase.sender.urls(),
                vec!["https://firestore.googleapis.com/v1/projects/activeflow/databases/(default)/documents/workouts"]
            );
        }

        fn session_valid_for_an_hour() -> Session {
            Session {
                id_token: "valid-id-token".to_string(),
                expires_at: Utc::now() + TimeDelta::hours(1),
                ..SESSION.clone()
            }
        }

        fn workout_document(id: &str, workout: &domain::Workout) -> serde_json::Value {
            let new_workout = domain::NewWorkout {
                timestamp: workout.timestamp,
                duration: workout.duration,
                details: workout.details.clone(),
                activity: workout.activity.clone(),
            };
            let mut document = document::encode_workout(&workout.owner_id, &new_workout);
            document.name =
                format!("projects/activeflow/databases/(default)/documents/workouts/{id}");
            serde_json::to_value(document).unwrap()
        }

        fn json_response(status: u16, body: &serde_json::Value) -> gloo_net::http::Response {
            gloo_net::http::Response::builder()
                .status(status)
                .json(body)
                .unwrap()
        }

        fn firebase_with_responses(
            responses: Vec<Result<gloo_net::http::Response, gloo_net::Error>>,
        ) -> Firebase<MockSendRequest> {
            Firebase {
                config: FirebaseConfig::new("KEY", "activeflow"),
                sender: MockSendRequest {
                    requests: RefCell::new(Vec::new()),
                    responses: RefCell::new(responses.into()),
                },
                local_storage: LocalStorage,
            }
        }

        struct MockSendRequest {
            requests: RefCell<Vec<gloo_net::http::Request>>,
            responses: RefCell<VecDeque<Result<gloo_net::http::Response, gloo_net::Error>>>,
        }

        impl MockSendRequest {
            fn urls(&self) -> Vec<String> {
                self.requests.borrow().iter().map(gloo_net::http::Request::url).collect()
            }

            fn authorization(&self) -> Vec<Option<String>> {
                self.requests
                    .borrow()
                    .iter()
                    .map(|request| request.headers().get("Authorization"))
                    .collect()
            }
        }

        impl SendRequest for MockSendRequest {
            async fn send_request(
                &self,
                request: gloo_net::http::Request,
            ) -> Result<gloo_net::http::Response, gloo_net::Error> {
                self.requests.borrow_mut().push(request);
                self.responses
                    .borrow_mut()
                    .pop_front()
                    .unwrap_or(Err(gloo_net::Error::GlooError("no response".to_string())))
            }
        }
    }
}
