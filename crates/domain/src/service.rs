use log::{debug, error, warn};

use crate::{
    AuthError, AuthRepository, AuthService, AuthState, CreateError, DeleteError, Email,
    FederatedProvider, FederatedSignIn, NewWorkout, Password, ReadError, StorageError, User,
    UserID, Username, UsernameRepository, Workout, WorkoutID, WorkoutRepository, WorkoutService,
};

pub struct Service<R> {
    repository: R,
    auth_state: AuthState,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            auth_state: AuthState::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(StorageError::NoConnection | StorageError::NoSession) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R> Service<R>
where
    R: UsernameRepository,
{
    /// Reserve the display name of a federated user as username if it is still free.
    async fn reserve_display_name(&self, user: &User) {
        let Some(username) = user
            .display_name
            .as_deref()
            .and_then(|name| Username::new(name).ok())
        else {
            return;
        };

        match self.repository.read_username(&username).await {
            Ok(None) => {
                if let Err(err) = self.repository.create_username(&username, user).await {
                    warn!("failed to reserve username {username}: {err}");
                }
            }
            Ok(Some(_)) => {
                debug!("username {username} is already taken");
            }
            Err(err) => {
                warn!("failed to check username {username}: {err}");
            }
        }
    }
}

impl<R> AuthService for Service<R>
where
    R: AuthRepository + UsernameRepository,
{
    fn auth_state(&self) -> &AuthState {
        &self.auth_state
    }

    async fn restore_session(&self) -> Result<User, ReadError> {
        let result = log_on_error!(
            self.repository.read_session(),
            ReadError,
            "restore",
            "session"
        );
        match &result {
            Ok(user) => self.auth_state.set_user(Some(user.clone())),
            Err(ReadError::NotFound | ReadError::Storage(StorageError::NoSession)) => {
                self.auth_state.set_user(None);
            }
            Err(_) => {}
        }
        result
    }

    async fn sign_in(&self, email: &Email, password: &Password) -> Result<User, AuthError> {
        let user = log_on_error!(
            self.repository.sign_in(email, password),
            AuthError,
            "sign in",
            "user"
        )?;
        self.auth_state.set_user(Some(user.clone()));
        Ok(user)
    }

    async fn start_federated_sign_in(
        &self,
        provider: FederatedProvider,
        redirect_uri: &str,
    ) -> Result<FederatedSignIn, AuthError> {
        log_on_error!(
            self.repository
                .create_federated_sign_in(provider, redirect_uri),
            AuthError,
            "start",
            "federated sign in"
        )
    }

    async fn complete_federated_sign_in(&self, callback_uri: &str) -> Result<User, AuthError> {
        let user = log_on_error!(
            self.repository.complete_federated_sign_in(callback_uri),
            AuthError,
            "complete",
            "federated sign in"
        )?;
        self.reserve_display_name(&user).await;
        self.auth_state.set_user(Some(user.clone()));
        Ok(user)
    }

    async fn register(
        &self,
        username: &Username,
        email: &Email,
        password: &Password,
    ) -> Result<User, AuthError> {
        if !self.username_available(username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let user = log_on_error!(
            self.repository.sign_up(email, password),
            AuthError,
            "sign up",
            "user"
        )?;
        self.auth_state.set_user(Some(user.clone()));

        log_on_error!(
            self.repository.create_username(username, &user),
            CreateError,
            "reserve",
            "username"
        )?;

        let user = log_on_error!(
            self.repository.set_display_name(username),
            AuthError,
            "set",
            "display name"
        )?;
        self.auth_state.set_user(Some(user.clone()));

        Ok(user)
    }

    async fn username_available(&self, username: &Username) -> Result<bool, ReadError> {
        log_on_error!(
            self.repository.read_username(username),
            ReadError,
            "read",
            "username"
        )
        .map(|uid| uid.is_none())
    }

    async fn send_password_reset_email(&self, email: &Email) -> Result<(), AuthError> {
        log_on_error!(
            self.repository.send_password_reset_email(email),
            AuthError,
            "send",
            "password reset email"
        )
    }

    async fn confirm_password_reset(
        &self,
        code: Option<&str>,
        password: &Password,
    ) -> Result<(), AuthError> {
        let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Err(AuthError::InvalidCode);
        };
        log_on_error!(
            self.repository.confirm_password_reset(code, password),
            AuthError,
            "reset",
            "password"
        )
    }

    async fn sign_out(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.sign_out(),
            DeleteError,
            "sign out",
            "user"
        )?;
        self.auth_state.set_user(None);
        Ok(())
    }
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    async fn get_workouts(&self, owner: &UserID) -> Result<Vec<Workout>, ReadError> {
        let workouts = log_on_error!(
            self.repository.read_workouts(owner),
            ReadError,
            "get",
            "workouts"
        )?;
        Ok(workouts
            .into_iter()
            .filter(|w| w.owner_id == *owner)
            .collect())
    }

    async fn get_workout(&self, owner: &UserID, id: &WorkoutID) -> Result<Workout, ReadError> {
        let workout = log_on_error!(
            self.repository.read_workout(id),
            ReadError,
            "get",
            "workout"
        )?;
        if workout.owner_id != *owner {
            return Err(ReadError::NotFound);
        }
        Ok(workout)
    }

    async fn create_workout(
        &self,
        owner: &UserID,
        workout: NewWorkout,
    ) -> Result<Workout, CreateError> {
        log_on_error!(
            self.repository.create_workout(owner, workout),
            CreateError,
            "create",
            "workout"
        )
    }
}
