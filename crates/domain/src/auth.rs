use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use strum::{Display, EnumIter};

use crate::{
    AuthError, CreateError, DeleteError, Email, Password, ReadError, User, UserID, Username,
    ValidationError,
};

#[allow(async_fn_in_trait)]
pub trait AuthService {
    fn auth_state(&self) -> &AuthState;

    async fn restore_session(&self) -> Result<User, ReadError>;
    async fn sign_in(&self, email: &Email, password: &Password) -> Result<User, AuthError>;
    async fn start_federated_sign_in(
        &self,
        provider: FederatedProvider,
        redirect_uri: &str,
    ) -> Result<FederatedSignIn, AuthError>;
    async fn complete_federated_sign_in(&self, callback_uri: &str) -> Result<User, AuthError>;
    async fn register(
        &self,
        username: &Username,
        email: &Email,
        password: &Password,
    ) -> Result<User, AuthError>;
    async fn username_available(&self, username: &Username) -> Result<bool, ReadError>;
    async fn send_password_reset_email(&self, email: &Email) -> Result<(), AuthError>;
    async fn confirm_password_reset(
        &self,
        code: Option<&str>,
        password: &Password,
    ) -> Result<(), AuthError>;
    async fn sign_out(&self) -> Result<(), DeleteError>;

    fn validate_email(&self, email: &str) -> Result<Email, ValidationError> {
        Email::new(email).map_err(|err| ValidationError::Other(err.into()))
    }

    fn validate_password(&self, password: &str) -> Result<Password, ValidationError> {
        Password::new(password).map_err(|err| ValidationError::Other(err.into()))
    }

    async fn validate_username(&self, username: &str) -> Result<Username, ValidationError> {
        match Username::new(username) {
            Ok(username) => match self.username_available(&username).await {
                Ok(true) => Ok(username),
                Ok(false) => Err(ValidationError::Conflict("username".to_string())),
                Err(err) => Err(ValidationError::Other(err.into())),
            },
            Err(err) => Err(ValidationError::Other(err.into())),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait AuthRepository {
    async fn read_session(&self) -> Result<User, ReadError>;
    async fn sign_in(&self, email: &Email, password: &Password) -> Result<User, AuthError>;
    async fn sign_up(&self, email: &Email, password: &Password) -> Result<User, AuthError>;
    async fn set_display_name(&self, name: &Username) -> Result<User, AuthError>;
    async fn create_federated_sign_in(
        &self,
        provider: FederatedProvider,
        redirect_uri: &str,
    ) -> Result<FederatedSignIn, AuthError>;
    async fn complete_federated_sign_in(&self, callback_uri: &str) -> Result<User, AuthError>;
    async fn send_password_reset_email(&self, email: &Email) -> Result<(), AuthError>;
    async fn confirm_password_reset(&self, code: &str, password: &Password)
    -> Result<(), AuthError>;
    async fn sign_out(&self) -> Result<(), DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait UsernameRepository {
    async fn read_username(&self, username: &Username) -> Result<Option<UserID>, ReadError>;
    async fn create_username(&self, username: &Username, user: &User) -> Result<(), CreateError>;
}

#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    Google,
}

impl FederatedProvider {
    #[must_use]
    pub fn provider_id(self) -> &'static str {
        match self {
            FederatedProvider::Google => "google.com",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            FederatedProvider::Google => "google",
        }
    }
}

/// Pending sign-in with an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedSignIn {
    pub auth_uri: String,
    pub session_id: String,
}

type Listener = Rc<dyn Fn(Option<&User>)>;

#[derive(Default)]
struct AuthStateInner {
    user: Option<User>,
    listeners: Vec<(usize, Listener)>,
    next_id: usize,
}

/// The currently authenticated user, observable by subscribers.
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct AuthState {
    inner: Rc<RefCell<AuthStateInner>>,
}

impl AuthState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().user.is_some()
    }

    /// Replace the current user and notify all subscribers if it changed.
    pub fn set_user(&self, user: Option<User>) {
        let listeners = {
            let mut inner = self.inner.borrow_mut();
            if inner.user == user {
                return;
            }
            inner.user = user.clone();
            inner
                .listeners
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect::<Vec<_>>()
        };
        for listener in listeners {
            listener(user.as_ref());
        }
    }

    /// Register a listener for user changes.
    ///
    /// The listener is called immediately with the current user. It stays registered until the
    /// returned subscription is dropped.
    #[must_use]
    pub fn subscribe(&self, listener: impl Fn(Option<&User>) + 'static) -> Subscription {
        let listener: Listener = Rc::new(listener);
        let (id, user) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener.clone()));
            (id, inner.user.clone())
        };
        listener(user.as_ref());
        Subscription {
            id,
            state: Rc::downgrade(&self.inner),
        }
    }

    fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("user", &self.inner.borrow().user)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[must_use = "dropping a subscription unsubscribes the listener"]
pub struct Subscription {
    id: usize,
    state: Weak<RefCell<AuthStateInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}
