use dioxus::prelude::*;

use activeflow_domain::AuthService;

use crate::{
    DOMAIN_SERVICE, Route, auth_error_message,
    component::element::{ErrorMessage, LoadingPage},
    federated_redirect_uri,
};

#[component]
pub fn LoginCallback(query: String) -> Element {
    let navigator = use_navigator();
    let result = use_resource(move || {
        let callback_uri = format!("{}?{query}", federated_redirect_uri());
        async move {
            DOMAIN_SERVICE
                .read()
                .complete_federated_sign_in(&callback_uri)
                .await
        }
    });

    match &*result.read() {
        Some(Ok(_)) => {
            navigator.replace(Route::Home {});
            rsx! {}
        }
        Some(Err(err)) => {
            let message = auth_error_message(err);
            rsx! {
                ErrorMessage { message: "Sign-in failed. {message}" }
                div {
                    class: "block has-text-centered",
                    Link { to: Route::Login {}, "Back to login" }
                }
            }
        }
        None => rsx! { LoadingPage {} },
    }
}
