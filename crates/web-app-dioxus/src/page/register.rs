use dioxus::prelude::*;

use activeflow_domain::{self as domain, AuthService};

use crate::{
    DOMAIN_SERVICE, Route, auth_error_message,
    component::{
        element::{Color, Icon, Message},
        form::{FieldValue, InputField, SubmitButton},
    },
    page::login::FederatedSignInButtons,
};

#[component]
pub fn Register() -> Element {
    let navigator = use_navigator();
    let mut username = use_signal(FieldValue::<domain::Username>::default);
    let mut email = use_signal(FieldValue::<domain::Email>::default);
    let mut password = use_signal(FieldValue::<domain::Password>::default);
    let mut error = use_signal(|| None::<String>);
    let mut is_loading = use_signal(|| false);

    let register = move |event: FormEvent| async move {
        event.prevent_default();
        let (Ok(username), Ok(email), Ok(password)) =
            (username().validated, email().validated, password().validated)
        else {
            *error.write() = Some("Please fill in all required fields.".to_string());
            return;
        };
        *is_loading.write() = true;
        *error.write() = None;
        let result = DOMAIN_SERVICE
            .read()
            .register(&username, &email, &password)
            .await;
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
                onsubmit: register,
                InputField {
                    label: "Username",
                    left_icon: rsx! { Icon { name: "user", is_small: true } },
                    autocomplete: "username",
                    value: username.read().input.clone(),
                    error: username.read().error(),
                    is_required: true,
                    oninput: move |event: FormEvent| async move {
                        let input = event.value();
                        username.write().input.clone_from(&input);
                        let validated = DOMAIN_SERVICE.read().validate_username(&input).await;
                        if username.peek().input == input {
                            username.write().update(input, validated);
                        }
                    },
                }
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
                    help: format!("At least {} characters", domain::Password::MIN_LENGTH),
                    left_icon: rsx! { Icon { name: "lock", is_small: true } },
                    r#type: "password",
                    autocomplete: "new-password",
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
                    text: "Register",
                    is_loading: is_loading(),
                    is_disabled: !FieldValue::<()>::all_valid(&[
                        &*username.read(),
                        &*email.read(),
                        &*password.read(),
                    ]),
                }
            }
            FederatedSignInButtons { text: "Sign up", error }
            div {
                class: "block has-text-centered mt-5",
                p {
                    "Already have an account? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
