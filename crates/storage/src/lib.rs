#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod document;
pub mod firebase;
#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod rest;

pub use firebase::{Firebase, FirebaseConfig};
