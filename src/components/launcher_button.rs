use dioxus::prelude::*;

#[derive(Copy, Clone, PartialEq)]
pub enum LauncherButtonStyle {
    Safe,
    Warning,
    Disabled,
}

impl LauncherButtonStyle {
    pub fn to_tailwind(&self) -> &'static str {
        match self {
            Self::Safe => "bg-emerald-600 hover:bg-emerald-500 cursor-pointer",
            Self::Warning => "bg-yellow-700 hover:bg-yellow-600 cursor-pointer",
            Self::Disabled => "bg-white/10",
        }
    }
}

#[component]
pub fn LauncherButton(
    text: String,
    style: LauncherButtonStyle,
    disabled: bool,
    onclick: EventHandler<Event<MouseData>>,
) -> Element {
    let real_style = if disabled { LauncherButtonStyle::Disabled } else { style };

    rsx! {
        button {
            class: format!("rounded-lg px-6 py-3 {}", real_style.to_tailwind()),
            onclick: move |e| {
                onclick.call(e)
            },
            disabled: disabled,
            p { "{text}" }
        }
    }
}
