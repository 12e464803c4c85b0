use shared::{ChatMode, PdfIndexState};
use web_sys::HtmlInputElement;
use yew::{Callback, Html, Properties, classes, function_component, html, use_node_ref};

#[derive(Properties, PartialEq)]
pub struct PdfControlsProps {
    pub mode: ChatMode,
    pub pdf: PdfIndexState,
    #[prop_or(false)]
    pub disabled: bool,
    pub on_mode_change: Callback<ChatMode>,
    pub on_upload: Callback<HtmlInputElement>,
    pub on_summarize: Callback<()>,
}

/// Mode switch plus the upload and summarize actions shown in PDF mode.
#[function_component(PdfControls)]
pub fn pdf_controls(props: &PdfControlsProps) -> Html {
    let file_input = use_node_ref();

    let mode_button = |mode: ChatMode, label: &'static str| {
        let on_mode_change = props.on_mode_change.clone();
        let active = props.mode == mode;
        html! {
            <button
                type="button"
                class={classes!("mode", active.then_some("active"))}
                onclick={Callback::from(move |_: yew::MouseEvent| on_mode_change.emit(mode))}
            >
                { label }
            </button>
        }
    };

    let on_upload = {
        let file_input = file_input.clone();
        let on_upload = props.on_upload.clone();
        Callback::from(move |_: yew::MouseEvent| {
            if let Some(input) = file_input.cast::<HtmlInputElement>() {
                on_upload.emit(input);
            }
        })
    };

    let on_summarize = {
        let on_summarize = props.on_summarize.clone();
        Callback::from(move |_: yew::MouseEvent| on_summarize.emit(()))
    };

    html! {
        <div class="pdf-controls">
            <div class="mode-switch">
                { mode_button(ChatMode::Chat, "Chat") }
                { mode_button(ChatMode::Pdf, "Ask PDFs") }
            </div>
            if props.mode.shows_pdf_controls() {
                <div class="pdf-actions">
                    <input ref={file_input} type="file" accept="application/pdf" multiple={true} />
                    <button type="button" onclick={on_upload} disabled={props.disabled}>
                        { "Upload PDFs" }
                    </button>
                    <button
                        type="button"
                        onclick={on_summarize}
                        disabled={props.disabled}
                    >
                        { "Summarize" }
                    </button>
                    if props.pdf.indexed {
                        <span class="pdf-summary">{ props.pdf.summary_details.clone() }</span>
                    }
                </div>
            }
        </div>
    }
}
