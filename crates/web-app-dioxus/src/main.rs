#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

use std::{
    rc::Rc,
    sync::{Arc, Mutex},
};

use dioxus::prelude::*;
use log::error;

use activeflow_domain::{self as domain, AuthService};
use activeflow_storage as storage;
use activeflow_web_app as web_app;

use component::{
    element::{Color, Dialog},
    navbar::Navbar,
};
use page::{
    add_workout::AddWorkout, forgot_password::ForgotPassword, home::Home, login::Login,
    login_callback::LoginCallback, not_found::NotFound, register::Register,
    reset_password::ResetPassword, root::Root, workout::Workout, workouts::Workouts,
};

mod component;
mod page;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Navbar)]
    #[route("/")]
    Root {},
    #[route("/login")]
    Login {},
    #[route("/login_callback?:..query")]
    LoginCallback { query: String },
    #[route("/register")]
    Register {},
    #[route("/forgot_password")]
    ForgotPassword {},
    #[route("/reset_password?:..query")]
    ResetPassword { query: String },
    #[route("/home")]
    Home {},
    #[route("/workouts")]
    Workouts {},
    #[route("/add_workout")]
    AddWorkout {},
    #[route("/workout#:id")]
    Workout { id: domain::WorkoutID },
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

const FAVICON: Asset = asset!("/assets/favicon.svg");
const MAIN_CSS: Asset = asset!("/assets/main.css");
const BULMA_CSS: &str = "https://cdn.jsdelivr.net/npm/bulma@1.0.2/css/bulma.min.css";
const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.6.0/css/all.min.css";

type Storage = storage::Firebase<storage::rest::GlooNetSendRequest>;

static DOMAIN_SERVICE: GlobalSignal<domain::Service<Storage>> =
    Signal::global(|| domain::Service::new(storage::Firebase::new(firebase_config())));
static WEB_APP_SERVICE: GlobalSignal<web_app::Service<storage::local_storage::LocalStorage>> =
    Signal::global(|| web_app::Service::new(storage::local_storage::LocalStorage));
static CURRENT_USER: GlobalSignal<Option<domain::User>> = Signal::global(|| None);
static SESSION_RESTORED: GlobalSignal<bool> = Signal::global(|| false);
static NOTIFICATIONS: GlobalSignal<Vec<String>> = Signal::global(Vec::new);
static SUCCESS_MESSAGE: GlobalSignal<Option<String>> = Signal::global(|| None);
static NO_CONNECTION: GlobalSignal<bool> = Signal::global(|| false);
static DATA_CHANGED: GlobalSignal<usize> = Signal::global(|| 0);

fn main() {
    init_logging();
    dioxus::launch(App);
}

fn init_logging() {
    let _ = web_app::log::init(Arc::new(Mutex::new(storage::local_storage::LocalStorage)));
}

fn firebase_config() -> storage::FirebaseConfig {
    storage::FirebaseConfig::new(
        env!("ACTIVEFLOW_FIREBASE_API_KEY"),
        env!("ACTIVEFLOW_FIREBASE_PROJECT_ID"),
    )
    .with_emulators(
        Some(env!("ACTIVEFLOW_AUTH_EMULATOR_HOST")),
        Some(env!("ACTIVEFLOW_FIRESTORE_EMULATOR_HOST")),
    )
}

#[component]
fn App() -> Element {
    std::panic::set_hook(Box::new(|info| {
        error!("{info}");
        show_fatal_error(&info.to_string());
    }));

    use_hook(|| {
        Rc::new(DOMAIN_SERVICE.read().auth_state().subscribe(|user| {
            if CURRENT_USER.peek().as_ref() != user {
                *CURRENT_USER.write() = user.cloned();
            }
        }))
    });

    use_future(|| async {
        if let Err(domain::ReadError::Storage(domain::StorageError::NoConnection)) =
            DOMAIN_SERVICE.read().restore_session().await
        {
            *NO_CONNECTION.write() = true;
        }
        *SESSION_RESTORED.write() = true;
    });

    rsx! {
        document::Title { "ActiveFlow" }
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: BULMA_CSS }
        document::Link { rel: "stylesheet", href: FONT_AWESOME_CSS }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div {
            class: "container is-max-desktop py-4",
            Router::<Route> {},
            Notification {}
        }
    }
}

#[component]
fn Notification() -> Element {
    let Some(message) = NOTIFICATIONS.read().last().cloned() else {
        return rsx! {};
    };

    rsx! {
        Dialog {
            color: Color::Danger,
            title: rsx! { "Error" },
            close_event: move |_| { NOTIFICATIONS.write().pop(); },
            p { "{message}" }
        }
    }
}

/// Replace the whole page by an error report. The application is unusable after a panic.
fn show_fatal_error(details: &str) {
    let Some(main) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("main"))
    else {
        return;
    };
    main.set_inner_html(&format!(
        r#"<section class="section">
            <article class="message is-danger">
                <div class="message-header"><p>ActiveFlow stopped working</p></div>
                <div class="message-body">
                    <p class="block">An unexpected error occurred. Reloading the page usually helps.</p>
                    <pre class="block">{details}</pre>
                    <button class="button is-danger" onclick="location.reload()">Reload</button>
                </div>
            </article>
        </section>"#
    ));
}

fn signal_changed_data() {
    *DATA_CHANGED.write() += 1;
}

/// User-visible message for a failed authentication request.
fn auth_error_message(err: &domain::AuthError) -> String {
    match err {
        domain::AuthError::Storage(domain::StorageError::NoConnection) => {
            *NO_CONNECTION.write() = true;
            "No connection. Please try again later.".to_string()
        }
        domain::AuthError::Storage(_) | domain::AuthError::Other(_) => {
            "An unknown error occurred. Please try again.".to_string()
        }
        err => format!("{err}."),
    }
}

/// Absolute URL the identity provider redirects to after a federated sign-in.
fn federated_redirect_uri() -> String {
    format!("{}/login_callback", web_app::origin().unwrap_or_default())
}
