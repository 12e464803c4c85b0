use std::rc::Rc;

use shared::{
    AuthEvent, AuthProvider, ChatMode, ChatWidget, HttpTransport, Message, WidgetConfig,
    WidgetPorts,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::{Callback, Html, Properties, function_component, html, use_effect_with, use_memo};
use yewdux::{Dispatch, prelude::use_store};

use crate::auth_bridge::BrowserAuth;
use crate::browser::{self, BrowserStorage, DocumentTheme};
use crate::components::{
    composer::Composer, header::Header, message_log::MessageLogView, pdf_controls::PdfControls,
};
use crate::models::widget_state::{StoreSurface, WidgetState};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: WidgetConfig,
}

fn build_widget(config: &WidgetConfig, dispatch: Dispatch<WidgetState>) -> ChatWidget {
    let base_url = config.absolute_base_url(&browser::page_origin());
    log::info!("DocuChat backend: {base_url}");

    let surface = Rc::new(StoreSurface::new(dispatch));
    let ports = WidgetPorts {
        auth: Rc::new(BrowserAuth),
        transport: Rc::new(HttpTransport::new(&base_url)),
        store: Rc::new(BrowserStorage),
        sink: surface.clone(),
        controls: surface,
        theme_target: Rc::new(DocumentTheme),
    };
    ChatWidget::new(config, ports)
}

/// Copies the widget-owned state the view renders into the store.
fn sync_view(widget: &ChatWidget, dispatch: &Dispatch<WidgetState>) {
    let session = widget.session();
    let theme = widget.theme();
    dispatch.reduce_mut(|state| {
        state.mode = session.mode;
        state.pdf = session.pdf;
        state.theme = theme;
    });
}

/// Runs a widget action off the event handler and re-syncs the view after it.
fn run_action<F, Fut>(widget: &Rc<ChatWidget>, dispatch: &Dispatch<WidgetState>, action: F)
where
    F: FnOnce(Rc<ChatWidget>) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let widget = widget.clone();
    let dispatch = dispatch.clone();
    spawn_local(async move {
        action(widget.clone()).await;
        sync_view(&widget, &dispatch);
    });
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let (state, dispatch) = use_store::<WidgetState>();

    let widget = {
        let dispatch = dispatch.clone();
        use_memo(props.config.clone(), move |config| {
            build_widget(config, dispatch)
        })
    };

    {
        let widget = widget.clone();
        let dispatch = dispatch.clone();
        use_effect_with((), move |()| {
            browser::track_app_height();
            sync_view(&widget, &dispatch);

            {
                let widget = widget.clone();
                let dispatch = dispatch.clone();
                BrowserAuth::subscribe(move |event| {
                    run_action(&widget, &dispatch, move |widget| async move {
                        widget.handle_auth_event(event).await;
                    });
                });
            }

            run_action(&widget, &dispatch, |widget| async move {
                let event = match BrowserAuth.current_session().await {
                    Some(session) => AuthEvent::SessionPresent {
                        user_email: session.user_email,
                    },
                    None => AuthEvent::SessionAbsent,
                };
                widget.handle_auth_event(event).await;
            });
            || {}
        });
    }

    let on_text_change = {
        let dispatch = dispatch.clone();
        Callback::from(move |text: String| {
            dispatch.reduce_mut(|state| state.draft = text);
        })
    };

    let on_submit = {
        let widget = widget.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            let text = dispatch.get().draft.clone();
            dispatch.reduce_mut(|state| state.draft.clear());
            run_action(&widget, &dispatch, move |widget| async move {
                widget.submit(&text).await;
            });
        })
    };

    let on_new_chat = {
        let widget = widget.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            dispatch.reduce_mut(WidgetState::reset_composer);
            run_action(&widget, &dispatch, |widget| async move {
                widget.new_chat().await;
            });
        })
    };

    let on_logout = {
        let widget = widget.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            run_action(&widget, &dispatch, |widget| async move {
                widget.sign_out().await;
            });
        })
    };

    let on_toggle_theme = {
        let widget = widget.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            widget.toggle_theme();
            sync_view(&widget, &dispatch);
        })
    };

    let on_mode_change = {
        let widget = widget.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |mode: ChatMode| {
            widget.set_mode(mode);
            sync_view(&widget, &dispatch);
        })
    };

    let on_upload = {
        let widget = widget.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |input: HtmlInputElement| {
            let append_error = dispatch.clone();
            run_action(&widget, &dispatch, move |widget| async move {
                match browser::read_selected_files(&input).await {
                    Ok(files) => {
                        if widget.upload(files).await.is_ok() {
                            input.set_value("");
                        }
                    }
                    Err(err) => {
                        log::error!("{err}");
                        append_error.reduce_mut(|state| state.push_message(Message::error(err)));
                    }
                }
            });
        })
    };

    let on_summarize = {
        let widget = widget.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            run_action(&widget, &dispatch, |widget| async move {
                widget.summarize().await;
            });
        })
    };

    html! {
        <div class="docuchat">
            <Header
                theme={state.theme}
                logout_visible={state.logout_visible}
                on_new_chat={on_new_chat}
                on_logout={on_logout}
                on_toggle_theme={on_toggle_theme}
            />
            <PdfControls
                mode={state.mode}
                pdf={state.pdf.clone()}
                disabled={!state.input_enabled}
                on_mode_change={on_mode_change}
                on_upload={on_upload}
                on_summarize={on_summarize}
            />
            <MessageLogView entries={state.entries.clone()} />
            <Composer
                text={state.draft.clone()}
                on_text_change={on_text_change}
                placeholder={state.mode.placeholder()}
                disabled={!state.input_enabled}
                focus_token={state.composer_resets}
                on_submit={on_submit}
            />
        </div>
    }
}
