use std::str::FromStr;

use dioxus::prelude::*;
use strum::IntoEnumIterator;

use activeflow_domain::{self as domain, WorkoutService};
use chrono::Local;

use crate::{
    CURRENT_USER, DOMAIN_SERVICE, NO_CONNECTION, Route, SUCCESS_MESSAGE,
    component::{
        element::{Color, Message},
        form::{InputField, SelectField, SelectOption, SubmitButton, TextAreaField},
        require_auth::RequireAuth,
    },
    signal_changed_data,
};

#[component]
pub fn AddWorkout() -> Element {
    rsx! {
        RequireAuth { AddWorkoutContent {} }
    }
}

#[component]
fn AddWorkoutContent() -> Element {
    let navigator = use_navigator();
    let mut form = use_signal(domain::WorkoutForm::new);

    let submit = move |event: FormEvent| async move {
        event.prevent_default();
        let user = CURRENT_USER.read().clone();
        let new_workout = form.write().begin_submit(user.as_ref(), &Local);
        let (Ok(new_workout), Some(user)) = (new_workout, user) else {
            return;
        };
        let result = DOMAIN_SERVICE
            .read()
            .create_workout(&user.id, new_workout)
            .await;
        if let Err(domain::CreateError::Storage(domain::StorageError::NoConnection)) = result {
            *NO_CONNECTION.write() = true;
        }
        let result = form.write().finish_submit(result);
        if result.is_ok() {
            *SUCCESS_MESSAGE.write() = Some(domain::SUCCESS_MESSAGE.to_string());
            signal_changed_data();
            navigator.push(Route::Workouts {});
        }
    };

    let selected_type = form.read().workout_type();
    let type_options = std::iter::once(rsx! {
        SelectOption {
            text: "Select a workout type",
            value: "",
            selected: selected_type.is_none(),
        }
    })
    .chain(domain::WorkoutType::iter().map(|workout_type| {
        rsx! {
            SelectOption {
                text: workout_type.name(),
                value: workout_type.to_string(),
                selected: selected_type == Some(workout_type),
            }
        }
    }))
    .collect::<Vec<_>>();

    let duration_error = input_error(
        form.read().duration(),
        DOMAIN_SERVICE
            .read()
            .validate_workout_duration(form.read().duration()),
    );
    let visible_fields = form.read().visible_fields();

    rsx! {
        div {
            class: "container px-3",
            form {
                onsubmit: submit,
                SelectField {
                    label: "Workout type",
                    options: type_options,
                    is_required: true,
                    onchange: move |event: FormEvent| {
                        form.write().select_type(domain::WorkoutType::from_str(&event.value()).ok());
                    },
                }
                InputField {
                    label: "Date and time",
                    r#type: "datetime-local",
                    value: form.read().timestamp().to_string(),
                    is_required: true,
                    oninput: move |event: FormEvent| form.write().set_timestamp(event.value()),
                }
                InputField {
                    label: "Duration (minutes)",
                    r#type: "number",
                    inputmode: "numeric",
                    min: "1",
                    step: "1",
                    value: form.read().duration().to_string(),
                    error: duration_error,
                    is_required: true,
                    oninput: move |event: FormEvent| form.write().set_duration(event.value()),
                }
                for field in visible_fields.iter().copied() {
                    WorkoutFieldInput { key: "{field.label()}", form, field }
                }
                TextAreaField {
                    label: "Details",
                    placeholder: "Caption in the first line, notes below",
                    value: form.read().details().to_string(),
                    oninput: move |event: FormEvent| form.write().set_details(event.value()),
                }
                if let Some(message) = form.read().message() {
                    Message { color: Color::Danger, "{message}" }
                }
                SubmitButton {
                    text: "Add workout",
                    is_loading: form.read().is_submitting(),
                }
            }
        }
    }
}

#[component]
fn WorkoutFieldInput(mut form: Signal<domain::WorkoutForm>, field: domain::WorkoutField) -> Element {
    let value = field_value(&form.read(), field).to_string();
    let error = match field {
        domain::WorkoutField::Distance => input_error(
            &value,
            DOMAIN_SERVICE.read().validate_workout_distance(&value),
        ),
        domain::WorkoutField::CaloriesBurned => input_error(
            &value,
            DOMAIN_SERVICE.read().validate_workout_calories(&value),
        ),
        _ => None,
    };
    let (input_type, inputmode, step) = match field {
        domain::WorkoutField::Distance => ("number", Some("decimal"), Some("0.01")),
        domain::WorkoutField::CaloriesBurned => ("number", Some("numeric"), Some("1")),
        _ => ("text", None, None),
    };
    let placeholder = match field {
        domain::WorkoutField::MainMuscles => Some("e.g. chest, arms"),
        domain::WorkoutField::Poses => Some("e.g. downward dog, cobra"),
        domain::WorkoutField::EquipmentUsed => Some("e.g. kettlebell, rope"),
        _ => None,
    };
    let label = match field {
        domain::WorkoutField::Distance => format!("{} (km)", field.label()),
        _ => field.label().to_string(),
    };

    rsx! {
        InputField {
            label,
            r#type: input_type.to_string(),
            inputmode: inputmode.map(ToString::to_string),
            step: step.map(ToString::to_string),
            placeholder: placeholder.map(ToString::to_string),
            value,
            error,
            oninput: move |event: FormEvent| set_field_value(&mut form.write(), field, event.value()),
        }
    }
}

fn field_value(form: &domain::WorkoutForm, field: domain::WorkoutField) -> &str {
    match field {
        domain::WorkoutField::Location => form.location(),
        domain::WorkoutField::StartLocation => form.start_location(),
        domain::WorkoutField::EndLocation => form.end_location(),
        domain::WorkoutField::Distance => form.distance(),
        domain::WorkoutField::CaloriesBurned => form.calories_burned(),
        domain::WorkoutField::MainMuscles => form.main_muscles(),
        domain::WorkoutField::Poses => form.poses(),
        domain::WorkoutField::EquipmentUsed => form.equipment_used(),
    }
}

fn set_field_value(form: &mut domain::WorkoutForm, field: domain::WorkoutField, value: String) {
    match field {
        domain::WorkoutField::Location => form.set_location(value),
        domain::WorkoutField::StartLocation => form.set_start_location(value),
        domain::WorkoutField::EndLocation => form.set_end_location(value),
        domain::WorkoutField::Distance => form.set_distance(value),
        domain::WorkoutField::CaloriesBurned => form.set_calories_burned(value),
        domain::WorkoutField::MainMuscles => form.set_main_muscles(value),
        domain::WorkoutField::Poses => form.set_poses(value),
        domain::WorkoutField::EquipmentUsed => form.set_equipment_used(value),
    }
}

/// Validation error of a field, hidden as long as nothing was entered.
fn input_error<T>(input: &str, validated: Result<T, domain::ValidationError>) -> Option<String> {
    match validated {
        Err(err) if !input.trim().is_empty() => Some(err.to_string()),
        _ => None,
    }
}
