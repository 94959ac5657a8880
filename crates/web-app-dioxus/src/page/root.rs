use dioxus::prelude::*;

use crate::{CURRENT_USER, Route, SESSION_RESTORED, component::element::LoadingPage};

#[component]
pub fn Root() -> Element {
    let navigator = use_navigator();

    if !SESSION_RESTORED() {
        return rsx! { LoadingPage {} };
    }

    if CURRENT_USER.read().is_some() {
        navigator.push(Route::Home {});
    } else {
        navigator.push(Route::Login {});
    }
    rsx! {}
}
