use dioxus::prelude::*;
use strum::Display;

/// Bulma color modifiers, rendered as `is-{color}` or `has-text-{color}`.
#[derive(Display, Clone, Copy, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    Primary,
    Success,
    Warning,
    Danger,
}

#[component]
pub fn Loading() -> Element {
    rsx! {
        span { class: "icon has-text-grey-light", i { class: "fas fa-spinner fa-pulse" } }
    }
}

#[component]
pub fn LoadingPage() -> Element {
    rsx! {
        div {
            class: "is-size-2 has-text-centered has-text-grey-light m-6",
            i { class: "fas fa-spinner fa-pulse" }
        }
    }
}

/// Inline notice, optionally dismissible.
#[component]
pub fn Message(
    children: Element,
    color: Color,
    close_event: Option<EventHandler<MouseEvent>>,
) -> Element {
    rsx! {
        div {
            class: "notification is-light is-{color} py-3 px-4 my-3",
            if let Some(close_event) = close_event {
                button {
                    aria_label: "close",
                    class: "delete",
                    onclick: move |evt| close_event.call(evt),
                }
            }
            {children}
        }
    }
}

#[component]
pub fn Error(message: String) -> Element {
    rsx! {
        span {
            class: "icon-text has-text-danger",
            Icon { name: "triangle-exclamation" }
            span { "{message}" }
        }
    }
}

/// Replaces the content of a page that could not be shown.
#[component]
pub fn ErrorMessage(message: String) -> Element {
    rsx! {
        div {
            class: "message is-danger mx-3",
            div {
                class: "message-body",
                p { class: "has-text-danger has-text-weight-semibold is-size-5", "{message}" }
            }
        }
    }
}

#[component]
pub fn NotFound(element: String) -> Element {
    rsx! {
        ErrorMessage { message: "{element} not found" }
    }
}

#[component]
pub fn NoData(text: String) -> Element {
    rsx! {
        p {
            class: "has-text-centered has-text-grey my-6",
            "{text}"
        }
    }
}

#[component]
pub fn NoConnection() -> Element {
    rsx! {
        p {
            class: "has-text-centered has-text-grey my-6",
            span {
                class: "icon-text",
                Icon { name: "plug-circle-xmark" }
                span { "No connection to server" }
            }
        }
    }
}

#[component]
pub fn Icon(
    name: String,
    is_small: Option<bool>,
    px: Option<u8>,
    onclick: Option<EventHandler<MouseEvent>>,
) -> Element {
    rsx! {
        span {
            class: "icon",
            class: if is_small.unwrap_or_default() { "is-small" },
            class: if let Some(px) = px { "px-{px}" },
            onclick: move |evt| {
                if let Some(onclick) = onclick {
                    onclick.call(evt);
                }
            },
            i { class: "fas fa-{name}" }
        }
    }
}

/// Shows the description in a dropdown while hovering the children.
#[component]
pub fn ElementWithDescription(
    children: Element,
    description: String,
    right_aligned: Option<bool>,
) -> Element {
    rsx! {
        div {
            class: "dropdown is-hoverable",
            class: if right_aligned.unwrap_or_default() { "is-right" },
            div { class: "dropdown-trigger is-clickable", {children} }
            div {
                class: "dropdown-menu has-no-min-width",
                div {
                    class: "dropdown-content",
                    div { class: "dropdown-item", "{description}" }
                }
            }
        }
    }
}

#[component]
pub fn FloatingActionButton(icon: String, onclick: EventHandler<MouseEvent>) -> Element {
    rsx! {
        button {
            class: "button is-fab is-medium is-link",
            onclick,
            Icon { name: icon }
        }
    }
}

#[component]
pub fn Dialog(
    children: Element,
    title: Element,
    close_event: EventHandler<MouseEvent>,
    color: Option<Color>,
) -> Element {
    let color = color.unwrap_or(Color::Primary);
    rsx! {
        div {
            class: "modal is-active",
            div { class: "modal-background", onclick: close_event }
            div {
                class: "modal-card mx-3",
                header {
                    class: "modal-card-head py-3",
                    p {
                        class: "modal-card-title has-text-{color} has-text-weight-bold",
                        {title}
                    }
                    button { aria_label: "close", class: "delete", onclick: close_event }
                }
                section { class: "modal-card-body", {children} }
            }
        }
    }
}

#[component]
pub fn Title(title: String) -> Element {
    rsx! {
        h1 { class: "title is-5 has-text-centered my-4", "{title}" }
    }
}

#[component]
pub fn Table(body: Vec<Vec<Element>>) -> Element {
    rsx! {
        div {
            class: "table-container",
            table {
                class: "table is-fullwidth is-narrow is-size-7",
                tbody {
                    for row in body {
                        tr {
                            for cell in row {
                                td { {cell} }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn NoWrap(children: Element) -> Element {
    rsx! {
        span { style: "white-space:nowrap", {children} }
    }
}
