use web_sys::HtmlTextAreaElement;
use yew::{
    Callback, Html, Properties, TargetCast, function_component, html, use_effect_with,
    use_node_ref,
};

/// Tallest the textarea grows before it scrolls, in pixels.
const MAX_INPUT_HEIGHT: i32 = 160;

/// Fits the textarea to its content, up to [`MAX_INPUT_HEIGHT`].
fn auto_grow(textarea: &HtmlTextAreaElement) {
    let style = textarea.style();
    if let Err(err) = style.set_property("height", "auto") {
        log::warn!("could not reset composer height: {err:?}");
        return;
    }
    let height = textarea.scroll_height().min(MAX_INPUT_HEIGHT);
    if let Err(err) = style.set_property("height", &format!("{height}px")) {
        log::warn!("could not resize composer: {err:?}");
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ComposerProps {
    pub text: String,
    pub on_text_change: Callback<String>,
    pub on_submit: Callback<()>,
    #[prop_or(false)]
    pub disabled: bool,
    #[prop_or_default]
    pub placeholder: &'static str,
    /// Changing this refocuses the input.
    #[prop_or_default]
    pub focus_token: u32,
}

/// Text input with a send button. Enter sends, Shift+Enter adds a newline.
#[function_component(Composer)]
pub fn composer(props: &ComposerProps) -> Html {
    let input = use_node_ref();

    {
        let input = input.clone();
        use_effect_with(props.text.clone(), move |_| {
            if let Some(textarea) = input.cast::<HtmlTextAreaElement>() {
                auto_grow(&textarea);
            }
            || {}
        });
    }

    {
        let input = input.clone();
        use_effect_with(props.focus_token, move |token| {
            if *token > 0
                && let Some(textarea) = input.cast::<HtmlTextAreaElement>()
                && let Err(err) = textarea.focus()
            {
                log::warn!("could not focus composer: {err:?}");
            }
            || {}
        });
    }

    let submit = {
        let on_submit = props.on_submit.clone();
        let disabled = props.disabled;
        let empty = props.text.trim().is_empty();
        Callback::from(move |()| {
            if !disabled && !empty {
                on_submit.emit(());
            }
        })
    };

    let on_input = {
        let on_text_change = props.on_text_change.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let target: HtmlTextAreaElement = event.target_unchecked_into();
            on_text_change.emit(target.value());
        })
    };

    let on_keydown = {
        let submit = submit.clone();
        Callback::from(move |event: yew::events::KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                submit.emit(());
            }
        })
    };

    // Mobile keyboards cover the bottom of the page; keep the composer in view
    let on_focus = Callback::from(|event: yew::events::FocusEvent| {
        let target: HtmlTextAreaElement = event.target_unchecked_into();
        gloo_timers::callback::Timeout::new(150, move || {
            target.scroll_into_view_with_bool(false);
        })
        .forget();
    });

    let on_form_submit = Callback::from(move |event: yew::events::SubmitEvent| {
        event.prevent_default();
        submit.emit(());
    });

    html! {
        <form class="composer" onsubmit={on_form_submit}>
            <textarea
                ref={input}
                rows="1"
                placeholder={props.placeholder}
                value={props.text.clone()}
                oninput={on_input}
                onkeydown={on_keydown}
                onfocus={on_focus}
                disabled={props.disabled}
            />
            <button type="submit" class="send" disabled={props.disabled}>
                { "Send" }
            </button>
        </form>
    }
}
