use std::collections::HashSet;

use chrono::Local;
use dioxus::prelude::*;

use activeflow_domain as domain;

use crate::{
    CURRENT_USER, DATA_CHANGED, DOMAIN_SERVICE, NO_CONNECTION, Route,
    component::{
        element::{ErrorMessage, FloatingActionButton, Icon, LoadingPage, NoData},
        require_auth::RequireAuth,
    },
};

#[component]
pub fn Workouts() -> Element {
    rsx! {
        RequireAuth { WorkoutsContent {} }
    }
}

#[component]
fn WorkoutsContent() -> Element {
    let navigator = use_navigator();
    let workouts = use_resource(|| async {
        let _ = DATA_CHANGED.read();
        let user = CURRENT_USER.read().clone();
        let list = domain::WorkoutList::load(&*DOMAIN_SERVICE.read(), user.as_ref()).await;
        if list == domain::WorkoutList::Offline {
            *NO_CONNECTION.write() = true;
        }
        list
    });
    let expanded = use_signal(HashSet::<domain::WorkoutID>::new);

    rsx! {
        match &*workouts.read() {
            Some(domain::WorkoutList::Loaded(workouts)) => rsx! {
                div {
                    class: "container px-3",
                    for workout in workouts {
                        WorkoutRow {
                            key: "{workout.id}",
                            workout: workout.clone(),
                            expanded,
                        }
                    }
                }
            },
            Some(domain::WorkoutList::Empty) => rsx! {
                NoData { text: "No workouts logged yet. Add your first workout!".to_string() }
            },
            Some(list @ (domain::WorkoutList::Offline | domain::WorkoutList::Failed(_))) => rsx! {
                ErrorMessage { message: list.error().unwrap_or_default().to_string() }
            },
            Some(domain::WorkoutList::NotAuthenticated) => rsx! {},
            None => rsx! { LoadingPage {} },
        }
        FloatingActionButton {
            icon: "plus",
            onclick: move |_| { navigator.push(Route::AddWorkout {}); },
        }
    }
}

#[component]
fn WorkoutRow(
    workout: domain::Workout,
    mut expanded: Signal<HashSet<domain::WorkoutID>>,
) -> Element {
    let is_expanded = expanded.read().contains(&workout.id);
    let chevron = if is_expanded { "chevron-up" } else { "chevron-down" };
    let id = workout.id.clone();

    rsx! {
        div {
            class: "box px-4 py-3 mb-3",
            div {
                class: "is-flex is-justify-content-space-between is-align-items-center is-clickable",
                onclick: move |_| {
                    let mut expanded = expanded.write();
                    if !expanded.remove(&id) {
                        expanded.insert(id.clone());
                    }
                },
                div {
                    class: "is-flex is-align-items-center",
                    span { class: "has-text-link", Icon { name: workout.icon() } }
                    span { class: "ml-2 has-text-weight-semibold", "{workout.summary(&Local)}" }
                }
                Icon { name: chevron }
            }
            if is_expanded {
                div {
                    class: "mt-3",
                    WorkoutDetails { workout: workout.clone() }
                    div {
                        class: "has-text-right",
                        Link {
                            class: "is-size-7",
                            to: Route::Workout { id: workout.id.clone() },
                            "Open"
                        }
                    }
                }
            }
        }
    }
}

/// Labeled attributes of a workout, absent ones omitted.
#[component]
pub fn WorkoutDetails(workout: domain::Workout) -> Element {
    rsx! {
        for line in workout.detail_lines(&Local) {
            p {
                class: "mb-1",
                strong { "{line.label}: " }
                span { style: "white-space:pre-line", "{line.value}" }
            }
        }
    }
}
