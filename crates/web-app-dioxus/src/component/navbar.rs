use dioxus::prelude::*;
use log::Level;

use activeflow_domain::AuthService;
use activeflow_web_app::log::Service as _;

use crate::{
    CURRENT_USER, DOMAIN_SERVICE, NO_CONNECTION, NOTIFICATIONS, Route, SUCCESS_MESSAGE,
    WEB_APP_SERVICE,
    component::element::{
        Color, Dialog, ElementWithDescription, Error, Icon, Message, NoData, NoWrap, Table,
    },
};

#[component]
pub fn Navbar() -> Element {
    let mut menu_visible = use_signal(|| false);
    let mut log_visible = use_signal(|| false);
    let navigator = use_navigator();

    let user = CURRENT_USER.read().clone();
    let route = use_route::<Route>();
    let page_title = match route {
        Route::Root {} | Route::Login {} | Route::LoginCallback { .. } => "ActiveFlow".to_string(),
        Route::Register {} => "Register".to_string(),
        Route::ForgotPassword {} => "Forgot password".to_string(),
        Route::ResetPassword { .. } => "Reset password".to_string(),
        Route::Home {} => {
            if let Some(ref user) = user {
                user.name().to_string()
            } else {
                "Home".to_string()
            }
        }
        Route::Workouts {} => "Workouts".to_string(),
        Route::AddWorkout {} => "Add workout".to_string(),
        Route::Workout { .. } => "Workout".to_string(),
        Route::NotFound { .. } => String::new(),
    };
    let go_up_target = match route {
        Route::Root {} | Route::Login {} | Route::Home {} => None,
        Route::LoginCallback { .. }
        | Route::Register {}
        | Route::ForgotPassword {}
        | Route::ResetPassword { .. } => Some(Route::Login {}),
        Route::Workouts {} | Route::AddWorkout {} | Route::NotFound { .. } => {
            Some(Route::Root {})
        }
        Route::Workout { .. } => Some(Route::Workouts {}),
    };

    rsx! {
        nav {
            class: "navbar is-fixed-top is-primary has-shadow has-text-weight-bold",
            div {
                class: "container",
                div {
                    class: "navbar-brand is-flex-grow-1",
                    a {
                        class: "navbar-item is-size-5",
                        class: if go_up_target.is_none() { "has-text-primary" },
                        Icon {
                            name: "chevron-left",
                            onclick: {
                                let go_up_target = go_up_target.clone();
                                move |_| {
                                    if let Some(go_up_target) = &go_up_target {
                                        navigator.push(go_up_target.clone());
                                    }
                                }
                            },
                        }
                    }
                    div { class: "navbar-item is-size-5", "{page_title}" }
                    div { class: "mx-auto" }
                    if NO_CONNECTION() {
                        a {
                            class: "navbar-item",
                            class: "is-size-5",
                            class: "mx-1",
                            ElementWithDescription {
                                description: "No connection to server",
                                right_aligned: true,
                                Icon { name: "plug-circle-xmark" }
                            }
                        }
                    }
                    a {
                        aria_expanded: menu_visible(),
                        aria_label: "menu",
                        class: "navbar-burger ml-0",
                        class: if menu_visible() { "is-active" },
                        role: "button",
                        onclick: move |_| { *menu_visible.write() = !menu_visible() },
                        span { aria_hidden: "true" }
                        span { aria_hidden: "true" }
                        span { aria_hidden: "true" }
                        span { aria_hidden: "true" }
                    }
                }
                div {
                    class: "navbar-menu is-flex-grow-0",
                    class: if menu_visible() { "is-active" },
                    div {
                        class: "navbar-end",
                        if user.is_some() {
                            a {
                                class: "navbar-item",
                                onclick: move |_| {
                                    *menu_visible.write() = false;
                                    navigator.push(Route::Workouts {});
                                },
                                Icon { name: "list", px: 5 }
                                "Workouts"
                            }
                            a {
                                class: "navbar-item",
                                onclick: move |_| {
                                    *menu_visible.write() = false;
                                    navigator.push(Route::AddWorkout {});
                                },
                                Icon { name: "plus", px: 5 }
                                "Add workout"
                            }
                        }
                        a {
                            class: "navbar-item",
                            onclick: move |_| {
                                *log_visible.write() = true;
                                *menu_visible.write() = false;
                            },
                            Icon { name: "list-check", px: 5 }
                            "Log"
                        }
                        if let Some(user) = user {
                            a {
                                class: "navbar-item",
                                onclick: move |_| {
                                    async move {
                                        let result = DOMAIN_SERVICE.read().sign_out().await;
                                        match result {
                                            Ok(()) => {
                                                *SUCCESS_MESSAGE.write() = None;
                                                navigator.push(Route::Login {});
                                            }
                                            Err(err) => {
                                                NOTIFICATIONS
                                                    .write()
                                                    .push(format!("Failed to sign out: {err}"));
                                            }
                                        }
                                        *menu_visible.write() = false;
                                    }
                                },
                                Icon { name: "sign-out-alt", px: 5 }
                                "Sign out ({user.name()})"
                            }
                        }
                    }
                }
            }
        }

        if *log_visible.read() {
            Log { log_visible }
        }

        if let Some(message) = SUCCESS_MESSAGE() {
            Message {
                color: Color::Success,
                close_event: move |_| { *SUCCESS_MESSAGE.write() = None; },
                "{message}"
            }
        }

        Outlet::<Route> {}
    }
}

#[component]
fn Log(mut log_visible: Signal<bool>) -> Element {
    let entries = WEB_APP_SERVICE.read().get_log_entries();

    rsx! {
        Dialog {
            title: rsx! { "Log" },
            close_event: move |_| { *log_visible.write() = false; },
            match entries {
                Ok(entries) if entries.is_empty() => rsx! { NoData { text: "No log entries".to_string() } },
                Ok(entries) => {
                    let body = entries
                        .into_iter()
                        .map(|entry| {
                            let color = match entry.level {
                                Level::Error => Some(Color::Danger),
                                Level::Warn => Some(Color::Warning),
                                Level::Info | Level::Debug | Level::Trace => None,
                            };
                            vec![
                                rsx! { NoWrap { "{entry.time}" } },
                                rsx! {
                                    span {
                                        class: if let Some(color) = color { "has-text-{color}" },
                                        "{entry.level}"
                                    }
                                },
                                rsx! { "{entry.message}" },
                            ]
                        })
                        .collect::<Vec<_>>();
                    rsx! { Table { body } }
                }
                Err(err) => rsx! { Error { message: "Failed to read log: {err}" } },
            }
        }
    }
}
