use shared::Theme;
use yew::{Callback, Html, Properties, function_component, html};

use super::theme_switcher::ThemeSwitcher;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub theme: Theme,
    pub logout_visible: bool,
    pub on_new_chat: Callback<()>,
    pub on_logout: Callback<()>,
    pub on_toggle_theme: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let on_new_chat = {
        let on_new_chat = props.on_new_chat.clone();
        Callback::from(move |_: yew::MouseEvent| on_new_chat.emit(()))
    };
    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: yew::MouseEvent| on_logout.emit(()))
    };

    html! {
        <header class="chat-header">
            <span class="title">{ "DocuChat" }</span>
            <div class="actions">
                <button type="button" class="new-chat" onclick={on_new_chat}>
                    { "New chat" }
                </button>
                <ThemeSwitcher theme={props.theme} on_toggle={props.on_toggle_theme.clone()} />
                if props.logout_visible {
                    <button type="button" class="logout" onclick={on_logout}>
                        { "Log out" }
                    </button>
                }
            </div>
        </header>
    }
}
