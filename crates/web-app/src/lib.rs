#![warn(clippy::pedantic)]

pub mod log;
pub mod service;

pub use service::Service;

/// Origin of the current page, e.g. `https://activeflow.example.com`.
#[must_use]
pub fn origin() -> Option<String> {
    gloo_utils::window().location().origin().ok()
}

/// Redirect the browser to an external page.
pub fn redirect(url: &str) {
    if let Err(err) = gloo_utils::window().location().assign(url) {
        ::log::error!("failed to redirect to {url}: {err:?}");
    }
}
