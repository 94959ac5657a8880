#![deny(clippy::pedantic)]

use std::env;

const VARIABLES: [&str; 4] = [
    "ACTIVEFLOW_FIREBASE_API_KEY",
    "ACTIVEFLOW_FIREBASE_PROJECT_ID",
    "ACTIVEFLOW_AUTH_EMULATOR_HOST",
    "ACTIVEFLOW_FIRESTORE_EMULATOR_HOST",
];

fn main() {
    for variable in VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
        let value = env::var(variable).unwrap_or_default();
        println!("cargo:rustc-env={variable}={value}");
    }
}
