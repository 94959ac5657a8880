use dioxus::prelude::*;

#[component]
pub fn InputField(
    label: Option<String>,
    help: Option<String>,
    left_icon: Option<Element>,
    r#type: Option<String>,
    inputmode: Option<String>,
    min: Option<String>,
    step: Option<String>,
    placeholder: Option<String>,
    autocomplete: Option<String>,
    value: String,
    error: Option<String>,
    is_required: Option<bool>,
    oninput: EventHandler<FormEvent>,
) -> Element {
    let error = error.and_then(|error| if error.is_empty() { None } else { Some(error) });
    let has_error = error.is_some();
    rsx! {
        div {
            class: "field",
            if let Some(label) = label {
                label {
                    class: "label",
                    "{label}"
                    if is_required.unwrap_or_default() { span { class: "has-text-danger", " *" } }
                }
            }
            div {
                class: "control",
                class: if left_icon.is_some() { "has-icons-left" },
                input {
                    class: "input",
                    class: if has_error { "is-danger" },
                    required: is_required.unwrap_or_default(),
                    r#type: if let Some(r#type) = r#type { r#type } else { "text" },
                    inputmode: if let Some(inputmode) = inputmode { inputmode },
                    min: if let Some(min) = min { min },
                    step: if let Some(step) = step { step },
                    placeholder: if let Some(placeholder) = placeholder { placeholder },
                    autocomplete: if let Some(autocomplete) = autocomplete { autocomplete },
                    value: "{value}",
                    oninput: move |evt| oninput.call(evt),
                }
                if let Some(ref left_icon) = left_icon {
                    span {
                        class: "icon is-left",
                        {left_icon}
                    }
                }
            }
            if let Some(ref error) = error {
                p { class: "help is-danger", "{error}" }
            } else if let Some(ref help) = help {
                p { class: "help", "{help}" }
            }
        }
    }
}

#[component]
pub fn TextAreaField(
    label: String,
    placeholder: Option<String>,
    value: String,
    oninput: EventHandler<FormEvent>,
) -> Element {
    rsx! {
        div {
            class: "field",
            label { class: "label", "{label}" }
            div {
                class: "control",
                textarea {
                    class: "textarea",
                    rows: 3,
                    placeholder: if let Some(placeholder) = placeholder { placeholder },
                    value: "{value}",
                    oninput: move |evt| oninput.call(evt),
                }
            }
        }
    }
}

#[component]
pub fn SelectField(
    label: String,
    options: Vec<Element>,
    is_required: Option<bool>,
    onchange: EventHandler<FormEvent>,
) -> Element {
    rsx! {
        div {
            class: "field",
            label {
                class: "label",
                "{label}"
                if is_required.unwrap_or_default() { span { class: "has-text-danger", " *" } }
            }
            div {
                class: "control",
                div {
                    class: "select is-fullwidth",
                    select {
                        required: is_required.unwrap_or_default(),
                        onchange,
                        for option in options {
                            {option}
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn SelectOption(text: String, value: String, selected: bool) -> Element {
    rsx! {
        option {
            selected,
            value,
            "{text}"
        }
    }
}

#[component]
pub fn SubmitButton(text: String, is_loading: bool, is_disabled: Option<bool>) -> Element {
    rsx! {
        div {
            class: "field is-grouped is-grouped-centered",
            div {
                class: "control",
                button {
                    class: "button is-link",
                    class: if is_loading { "is-loading" },
                    r#type: "submit",
                    disabled: is_loading || is_disabled.unwrap_or_default(),
                    "{text}"
                }
            }
        }
    }
}

/// Raw input of a form field and the result of its validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue<T> {
    pub input: String,
    pub validated: Result<T, String>,
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        Self {
            input: String::new(),
            validated: Err(String::new()),
        }
    }
}

impl<T> FieldValue<T> {
    pub fn update<E: ToString>(&mut self, input: String, validated: Result<T, E>) {
        self.input = input;
        self.validated = validated.map_err(|err| err.to_string());
    }

    /// Validation error, hidden as long as nothing was entered.
    pub fn error(&self) -> Option<String> {
        match &self.validated {
            Err(err) if !self.input.is_empty() => Some(err.clone()),
            _ => None,
        }
    }
}

impl FieldValue<()> {
    pub fn all_valid(values: &[&dyn FieldValueState]) -> bool {
        values.iter().all(|v| v.valid())
    }
}

pub trait FieldValueState {
    fn valid(&self) -> bool;
}

impl<T> FieldValueState for FieldValue<T> {
    fn valid(&self) -> bool {
        self.validated.is_ok()
    }
}
