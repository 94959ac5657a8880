use chrono::Local;
use dioxus::prelude::*;

use activeflow_domain::{self as domain, WorkoutService};

use crate::{
    CURRENT_USER, DOMAIN_SERVICE, NO_CONNECTION,
    component::{
        element::{ErrorMessage, Icon, LoadingPage, NoConnection, NotFound},
        require_auth::RequireAuth,
    },
    page::workouts::WorkoutDetails,
};

#[component]
pub fn Workout(id: domain::WorkoutID) -> Element {
    rsx! {
        RequireAuth { WorkoutContent { id } }
    }
}

#[component]
fn WorkoutContent(id: domain::WorkoutID) -> Element {
    let workout = use_resource(use_reactive!(|id| async move {
        let Some(user) = CURRENT_USER.read().clone() else {
            return Err(domain::ReadError::Storage(domain::StorageError::NoSession));
        };
        DOMAIN_SERVICE.read().get_workout(&user.id, &id).await
    }));
    if let Some(Err(domain::ReadError::Storage(domain::StorageError::NoConnection))) =
        *workout.read()
    {
        *NO_CONNECTION.write() = true;
    }

    match &*workout.read() {
        Some(Ok(workout)) => rsx! {
            div {
                class: "container px-3",
                div {
                    class: "box px-4 py-3",
                    h1 {
                        class: "title is-5",
                        span { class: "has-text-link", Icon { name: workout.icon() } }
                        span { class: "ml-2", "{workout.summary(&Local)}" }
                    }
                    WorkoutDetails { workout: workout.clone() }
                }
            }
        },
        Some(Err(domain::ReadError::NotFound)) => rsx! { NotFound { element: "Workout" } },
        Some(Err(domain::ReadError::Storage(domain::StorageError::NoConnection))) => rsx! {
            NoConnection {}
        },
        Some(Err(err)) => rsx! { ErrorMessage { message: "Failed to load workout: {err}" } },
        None => rsx! { LoadingPage {} },
    }
}
