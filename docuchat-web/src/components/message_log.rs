use shared::Message;
use web_sys::Element;
use yew::{Html, Properties, classes, function_component, html, use_effect_with, use_node_ref};

use crate::models::widget_state::LogEntry;

#[derive(Properties, PartialEq)]
pub struct MessageBubbleProps {
    pub message: Message,
}

#[function_component(MessageBubble)]
pub fn message_bubble(props: &MessageBubbleProps) -> Html {
    let role = props.message.role;

    html! {
        <div class={classes!("message", role.css_class())}>
            <img class="avatar" src={props.message.avatar()} alt={role.as_str()} />
            <div class="bubble">{ props.message.text.clone() }</div>
        </div>
    }
}

#[function_component(ThinkingBubble)]
fn thinking_bubble() -> Html {
    html! {
        <div class="message aibot loading">
            <img class="avatar" src={shared::MessageRole::Bot.avatar()} alt="bot" />
            <div class="bubble typing">
                <span class="spinner" aria-hidden="true"></span>
                <span>{ "Thinking…" }</span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct MessageLogViewProps {
    pub entries: Vec<LogEntry>,
}

/// Scrolls to the newest entry whenever the log grows.
#[function_component(MessageLogView)]
pub fn message_log_view(props: &MessageLogViewProps) -> Html {
    let container = use_node_ref();

    {
        let container = container.clone();
        use_effect_with(props.entries.len(), move |_| {
            if let Some(element) = container.cast::<Element>() {
                element.set_scroll_top(element.scroll_height());
            }
            || {}
        });
    }

    html! {
        <div class="chat-log" ref={container}>
            { for props.entries.iter().map(|entry| match entry {
                LogEntry::Message(message) => html! { <MessageBubble message={message.clone()} /> },
                LogEntry::Loading(_) => html! { <ThinkingBubble /> },
            }) }
        </div>
    }
}
