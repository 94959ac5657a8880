pub mod add_workout;
pub mod forgot_password;
pub mod home;
pub mod login;
pub mod login_callback;
pub mod not_found;
pub mod register;
pub mod reset_password;
pub mod root;
pub mod workout;
pub mod workouts;
