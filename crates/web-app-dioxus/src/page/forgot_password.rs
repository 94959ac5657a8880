use dioxus::prelude::*;

use activeflow_domain::{self as domain, AuthService};

use crate::{
    DOMAIN_SERVICE, NO_CONNECTION, Route,
    component::{
        element::{Color, Icon, Message},
        form::{FieldValue, FieldValueState, InputField, SubmitButton},
    },
};

#[component]
pub fn ForgotPassword() -> Element {
    let mut email = use_signal(FieldValue::<domain::Email>::default);
    let mut result = use_signal(|| None::<Result<(), String>>);
    let mut is_loading = use_signal(|| false);

    let send = move |event: FormEvent| async move {
        event.prevent_default();
        let Ok(email) = email().validated else {
            return;
        };
        *is_loading.write() = true;
        *result.write() = None;
        let response = DOMAIN_SERVICE.read().send_password_reset_email(&email).await;
        *is_loading.write() = false;
        *result.write() = Some(match response {
            Ok(()) => Ok(()),
            Err(err) => {
                if let domain::AuthError::Storage(domain::StorageError::NoConnection) = err {
                    *NO_CONNECTION.write() = true;
                }
                Err("Failed to send reset email. Please try again.".to_string())
            }
        });
    };

    rsx! {
        div {
            class: "container px-3",
            form {
                onsubmit: send,
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
                match result() {
                    Some(Ok(())) => rsx! {
                        Message {
                            color: Color::Success,
                            "A password reset email has been sent to your email address. Please check your inbox."
                        }
                    },
                    Some(Err(message)) => rsx! { Message { color: Color::Danger, "{message}" } },
                    None => rsx! {},
                }
                SubmitButton {
                    text: "Send reset email",
                    is_loading: is_loading(),
                    is_disabled: !email.read().valid(),
                }
            }
            div {
                class: "block has-text-centered mt-5",
                Link { to: Route::Login {}, "Back to login" }
            }
        }
    }
}
