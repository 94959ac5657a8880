use dioxus::prelude::*;

use activeflow_domain::{self as domain, AuthService};

use crate::{
    DOMAIN_SERVICE, NO_CONNECTION, Route,
    component::{
        element::{Color, Icon, Message},
        form::{FieldValue, InputField, SubmitButton},
    },
};

#[component]
pub fn ResetPassword(query: String) -> Element {
    let code = use_memo(move || reset_code(&query));
    let mut password = use_signal(FieldValue::<domain::Password>::default);
    let mut result = use_signal(|| None::<Result<(), String>>);
    let mut is_loading = use_signal(|| false);

    let reset = move |event: FormEvent| async move {
        event.prevent_default();
        let Ok(password) = password().validated else {
            return;
        };
        *is_loading.write() = true;
        *result.write() = None;
        let response = DOMAIN_SERVICE
            .read()
            .confirm_password_reset(code().as_deref(), &password)
            .await;
        *is_loading.write() = false;
        *result.write() = Some(response.map_err(|err| match err {
            domain::AuthError::InvalidCode => "Invalid or missing reset link.".to_string(),
            domain::AuthError::Storage(domain::StorageError::NoConnection) => {
                *NO_CONNECTION.write() = true;
                "Failed to reset password. Please try again.".to_string()
            }
            _ => "Failed to reset password. Please try again.".to_string(),
        }));
    };

    rsx! {
        div {
            class: "container px-3",
            if code().is_none() {
                Message { color: Color::Danger, "Invalid or missing reset link." }
            }
            form {
                onsubmit: reset,
                InputField {
                    label: "New password",
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
                match result() {
                    Some(Ok(())) => rsx! {
                        Message { color: Color::Success, "Password has been successfully reset." }
                    },
                    Some(Err(message)) => rsx! { Message { color: Color::Danger, "{message}" } },
                    None => rsx! {},
                }
                SubmitButton {
                    text: "Reset password",
                    is_loading: is_loading(),
                    is_disabled: matches!(result(), Some(Ok(()))),
                }
            }
            div {
                class: "block has-text-centered mt-5",
                Link { to: Route::Login {}, "Back to login" }
            }
        }
    }
}

/// The one-time code of a password reset link.
fn reset_code(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "oobCode")
        .map(|(_, value)| value.trim().to_string())
        .filter(|code| !code.is_empty())
}
