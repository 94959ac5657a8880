use dioxus::prelude::*;
use strum::IntoEnumIterator;

use activeflow_domain::{self as domain, AuthService};
use activeflow_web_app as web_app;

use crate::{
    CURRENT_USER, DOMAIN_SERVICE, Route, auth_error_message,
    component::{
        element::{Color, Icon, Message},
        form::{FieldValue, InputField, SubmitButton},
    },
    federated_redirect_uri,
};

#[component]
pub fn Login() -> Element {
    let navigator = use_navigator();
    let mut email = use_signal(FieldValue::<domain::Email>::default);
    let mut password = use_signal(FieldValue::<domain::Password>::default);
    let mut error = use_signal(|| None::<String>);
    let mut is_loading = use_signal(|| false);

    if CURRENT_USER.read().is_some() {
        navigator.replace(Route::Home {});
    }

    let sign_in = move |event: FormEvent| async move {
        event.prevent_default();
        let (Ok(email), Ok(password)) = (email().validated, password().validated) else {
            *error.write() = Some("Please enter your email and password.".to_string());
            return;
        };
        *is_loading.write() = true;
        *error.write() = None;
        let result = DOMAIN_SERVICE.read().sign_in(&email, &password).await;
        *is_loading.write() = false;
        match result {
            Ok(_) => {
                navigator.push(Route::Home {});
            }
            Err(err) => {
                *error.write() = Some(auth_error_message(&err));
            }
        }
    };

    rsx! {
        div {
            class: "container px-3",
            form {
                onsubmit: sign_in,
                InputField {
                    label: "Email",
                    left_icon: rsx! { Icon { name: "envelope", is_small: true } },
                    r#type: "email",
                    autocomplete: "email",
                    value: email.read().input.clone(),
                    error: email.read().error(),
                    is_required: true,
                    oninput: move |event: FormEvent| {
                        let input = event.value();
                        let validated = DOMAIN_SERVICE.read().validate_email(&input);
                        email.write().update(input, validated);
                    },
                }
                InputField {
                    label: "Password",
                    left_icon: rsx! { Icon { name: "lock", is_small: true } },
                    r#type: "password",
                    autocomplete: "current-password",
                    value: password.read().input.clone(),
                    error: password.read().error(),
                    is_required: true,
                    oninput: move |event: FormEvent| {
                        let input = event.value();
                        let validated = DOMAIN_SERVICE.read().validate_password(&input);
                        password.write().update(input, validated);
                    },
                }
                if let Some(error) = error() {
                    Message { color: Color::Danger, "{error}" }
                }
                SubmitButton {
                    text: "Sign in",
                    is_loading: is_loading(),
                    is_disabled: !FieldValue::<()>::all_valid(&[&*email.read(), &*password.read()]),
                }
            }
            FederatedSignInButtons { text: "Sign in", error }
            div {
                class: "block has-text-centered mt-5",
                p {
                    Link { to: Route::ForgotPassword {}, "Forgot password?" }
                }
                p {
                    "Don't have an account? "
                    Link { to: Route::Register {}, "Register" }
                }
            }
        }
    }
}

/// Buttons that start a sign-in with an identity provider.
///
/// On success the browser leaves the application.
#[component]
pub fn FederatedSignInButtons(text: String, mut error: Signal<Option<String>>) -> Element {
    let mut is_loading = use_signal(|| None::<domain::FederatedProvider>);

    rsx! {
        div {
            class: "field is-grouped is-grouped-centered mt-3",
            for provider in domain::FederatedProvider::iter() {
                div {
                    class: "control",
                    button {
                        class: "button",
                        class: if is_loading() == Some(provider) { "is-loading" },
                        disabled: is_loading().is_some(),
                        onclick: move |_| async move {
                            *is_loading.write() = Some(provider);
                            *error.write() = None;
                            let result = DOMAIN_SERVICE
                                .read()
                                .start_federated_sign_in(provider, &federated_redirect_uri())
                                .await;
                            match result {
                                Ok(sign_in) => web_app::redirect(&sign_in.auth_uri),
                                Err(err) => {
                                    *error.write() = Some(auth_error_message(&err));
                                    *is_loading.write() = None;
                                }
                            }
                        },
                        span { class: "icon", i { class: "fab fa-{provider.icon()}" } }
                        span { "{text} with {provider}" }
                    }
                }
            }
        }
    }
}
