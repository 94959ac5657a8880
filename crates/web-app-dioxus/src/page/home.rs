use chrono::{Local, Utc};
use dioxus::prelude::*;

use activeflow_domain as domain;

use crate::{
    CURRENT_USER, DATA_CHANGED, DOMAIN_SERVICE, NO_CONNECTION, Route,
    component::{
        element::{Error, Loading, Title},
        require_auth::RequireAuth,
    },
};

#[component]
pub fn Home() -> Element {
    rsx! {
        RequireAuth { HomeContent {} }
    }
}

#[component]
fn HomeContent() -> Element {
    let workouts = use_resource(|| async {
        let _ = DATA_CHANGED.read();
        let user = CURRENT_USER.read().clone();
        let list = domain::WorkoutList::load(&*DOMAIN_SERVICE.read(), user.as_ref()).await;
        if list == domain::WorkoutList::Offline {
            *NO_CONNECTION.write() = true;
        }
        list
    });

    let workouts_subtitle = match &*workouts.read() {
        Some(domain::WorkoutList::Loaded(workouts)) => workouts.first().map(|workout| {
            rsx! {
                strong { "{workout.workout_type().name()}" }
                " (last {last(workout)})"
            }
        }),
        Some(domain::WorkoutList::Empty | domain::WorkoutList::NotAuthenticated) => None,
        Some(list @ (domain::WorkoutList::Offline | domain::WorkoutList::Failed(_))) => {
            Some(rsx! { Error { message: list.error().unwrap_or_default().to_string() } })
        }
        None => Some(rsx! { Loading {} }),
    };

    rsx! {
        Title {
            title: "Training".to_string(),
        },
        Tile {
            title: "Workouts",
            target: Route::Workouts {},
            target_add: Some(Route::AddWorkout {}),
            subtitle: workouts_subtitle,
        }
    }
}

#[component]
fn Tile(
    title: String,
    target: Route,
    #[props(!optional)] target_add: Option<Route>,
    #[props(!optional)] subtitle: Option<Element>,
) -> Element {
    let navigator = use_navigator();

    rsx! {
        div {
            class: "grid mx-3 my-3",
            div {
                class: "cell",
                a {
                    class: "box px-4 py-3",
                    onclick: move |_| { navigator.push(target.clone()); },
                    div {
                        class: "is-flex is-justify-content-space-between",
                        div {
                            a { class: "title is-size-5 has-text-link", {title} }
                        }
                        if let Some(target_add) = target_add {
                            div {
                                a {
                                    class: "title is-size-5 has-text-link",
                                    onclick: move |event| { navigator.push(target_add.clone()); event.stop_propagation(); },
                                    span { class: "icon",
                                        i { class: "fas fa-plus-circle" }
                                    }
                                }
                            }
                        }
                    }
                    if let Some(ref subtitle) = subtitle {
                        p { {subtitle} }
                    }
                }
            }
        }
    }
}

fn last(workout: &domain::Workout) -> String {
    let days = workout.days_before(Utc::now(), &Local);

    if days <= 0 {
        return "today".to_string();
    }

    if days == 1 {
        return "yesterday".to_string();
    }

    format!("{days} days ago")
}
