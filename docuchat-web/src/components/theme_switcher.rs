use shared::Theme;
use yew::{Callback, Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct ThemeSwitcherProps {
    pub theme: Theme,
    pub on_toggle: Callback<()>,
}

#[function_component(ThemeSwitcher)]
pub fn theme_switcher(props: &ThemeSwitcherProps) -> Html {
    let on_click = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_: yew::MouseEvent| on_toggle.emit(()))
    };

    html! {
        <button
            type="button"
            class="theme-toggle"
            onclick={on_click}
            aria-label="Toggle theme"
        >
            <span class="icon">{ props.theme.icon() }</span>
            <span class="label">{ props.theme.label() }</span>
        </button>
    }
}
