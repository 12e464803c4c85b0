mod app;
mod auth_bridge;
mod browser;
mod components;
mod models;

use app::{App, AppProps};
use shared::WidgetConfig;
use yew::{Html, Renderer, function_component, html};
use yewdux::YewduxRoot;

const MOUNT_ID: &str = "app";

fn log_level(config: &WidgetConfig) -> log::Level {
    match config.log_level.to_ascii_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    }
}

#[function_component(WidgetRoot)]
fn widget_root(props: &AppProps) -> Html {
    html! {
        <YewduxRoot>
            <App config={props.config.clone()} />
        </YewduxRoot>
    }
}

fn main() {
    console_error_panic_hook::set_once();

    let Some(root) = browser::element_by_id(MOUNT_ID) else {
        web_sys::console::error_1(&format!("DocuChat: no #{MOUNT_ID} element to mount on").into());
        return;
    };

    let config = match WidgetConfig::load(root.get_attribute("data-config").as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            for error in &errors {
                web_sys::console::warn_1(&format!("DocuChat config: {error}").into());
            }
            WidgetConfig::with_defaults()
        }
    };

    wasm_logger::init(wasm_logger::Config::new(log_level(&config)));
    log::info!("Starting DocuChat widget");

    Renderer::<WidgetRoot>::with_root_and_props(root, AppProps { config }).render();
}
