use std::collections::VecDeque;

use activeflow_domain as domain;
use activeflow_web_app::log;
use chrono::{DateTime, TimeDelta, Utc};
use gloo_storage::Storage as GlooStorage;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::rest::RestError;

const KEY_SESSION: &str = "session";
const KEY_FEDERATED_SIGN_IN: &str = "federated sign in";
const KEY_LOG: &str = "log";

/// ID tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: TimeDelta = TimeDelta::seconds(60);

#[derive(Clone, Copy, Default)]
pub struct LocalStorage;

/// Persisted authentication session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl Session {
    pub fn user(&self) -> Result<domain::User, RestError> {
        Ok(domain::User {
            id: self.user_id.as_str().into(),
            display_name: self.display_name.clone(),
            email: domain::Email::new(&self.email)
                .map_err(|err| RestError::Deserialization(err.to_string()))?,
        })
    }

    #[must_use]
    pub fn expires_soon(&self, now: DateTime<Utc>) -> bool {
        now + EXPIRY_MARGIN >= self.expires_at
    }
}

fn get_optional<T: DeserializeOwned>(key: &str) -> Result<Option<T>, RestError> {
    match gloo_storage::LocalStorage::get(key) {
        Ok(value) => Ok(Some(value)),
        Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

impl LocalStorage {
    pub fn read_session(&self) -> Result<Option<Session>, RestError> {
        get_optional(KEY_SESSION)
    }

    pub fn write_session(&self, session: &Session) -> Result<(), RestError> {
        Ok(gloo_storage::LocalStorage::set(KEY_SESSION, session)?)
    }

    pub fn delete_session(&self) {
        gloo_storage::LocalStorage::delete(KEY_SESSION);
    }

    pub fn read_federated_session_id(&self) -> Result<Option<String>, RestError> {
        get_optional(KEY_FEDERATED_SIGN_IN)
    }

    pub fn write_federated_session_id(&self, session_id: &str) -> Result<(), RestError> {
        Ok(gloo_storage::LocalStorage::set(
            KEY_FEDERATED_SIGN_IN,
            session_id,
        )?)
    }

    pub fn delete_federated_session_id(&self) {
        gloo_storage::LocalStorage::delete(KEY_FEDERATED_SIGN_IN);
    }
}

impl log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match gloo_storage::LocalStorage::get(KEY_LOG) {
            Ok(entries) => Ok(entries),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(VecDeque::new()),
                err => Err(err),
            },
        }
        .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(log::MAX_ENTRIES);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
