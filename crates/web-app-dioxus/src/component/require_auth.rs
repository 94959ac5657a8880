use dioxus::prelude::*;

use activeflow_domain::{self as domain, Access};

use crate::{CURRENT_USER, Route, SESSION_RESTORED, component::element::LoadingPage};

/// Render the children only for an authenticated user.
///
/// Until the persisted session has been restored, a loading indicator is shown. Without a user,
/// the current history entry is replaced by the login page and the children are never created.
#[component]
pub fn RequireAuth(children: Element) -> Element {
    let navigator = use_navigator();

    if !SESSION_RESTORED() {
        return rsx! { LoadingPage {} };
    }

    match domain::access(CURRENT_USER.read().as_ref()) {
        Access::Granted(_) => rsx! { {children} },
        Access::RedirectToLogin => {
            navigator.replace(Route::Login {});
            rsx! {}
        }
    }
}
