#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod access;
pub mod auth;
pub mod error;
pub mod service;
pub mod user;
pub mod username;
pub mod workout;
pub mod workout_form;
pub mod workout_list;

pub use access::{Access, access};
pub use auth::{
    AuthRepository, AuthService, AuthState, FederatedProvider, FederatedSignIn, Subscription,
    UsernameRepository,
};
pub use error::{
    AuthError, CreateError, DeleteError, ReadError, StorageError, ValidationError,
};
pub use service::Service;
pub use user::{Email, EmailError, Password, PasswordError, User, UserID};
pub use username::{Username, UsernameError};
pub use workout::{
    Activity, Minutes, MinutesError, NewWorkout, NumberError, TagList, TimestampError, Workout,
    WorkoutField, WorkoutID, WorkoutRepository, WorkoutService, WorkoutType, canonical_timestamp,
    parse_calories, parse_distance, parse_local_timestamp,
};
pub use workout_form::{FormError, SUCCESS_MESSAGE, SubmitError, SubmitState, WorkoutForm};
pub use workout_list::{
    DATE_FORMAT, DetailLine, NO_CONNECTION_MESSAGE, WorkoutList, sort_by_timestamp_desc,
};
