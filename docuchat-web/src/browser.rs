//! Browser adapters for the widget's storage and theme ports.

use gloo_storage::{LocalStorage, Storage};
use js_sys::Uint8Array;
use shared::{KeyValueStore, Theme, ThemeTarget, UploadFile};
use wasm_bindgen::{JsCast, closure::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, HtmlElement, HtmlInputElement};

const THEME_ATTRIBUTE: &str = "data-theme";
const LIGHT_SCHEME_QUERY: &str = "(prefers-color-scheme: light)";
const APP_HEIGHT_PROPERTY: &str = "--app-height";

pub fn element_by_id(id: &str) -> Option<Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

/// `window.location.origin`, used to make a relative API base absolute.
pub fn page_origin() -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}

fn set_app_height() {
    let Some(window) = web_sys::window() else { return };
    let Some(height) = window.inner_height().ok().and_then(|value| value.as_f64()) else {
        return;
    };
    let Some(root) = window
        .document()
        .and_then(|document| document.document_element())
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    if let Err(err) = root
        .style()
        .set_property(APP_HEIGHT_PROPERTY, &format!("{height}px"))
    {
        log::warn!("could not set {APP_HEIGHT_PROPERTY}: {err:?}");
    }
}

/// Keeps `--app-height` equal to the visible viewport, which shrinks when a
/// mobile keyboard opens.
pub fn track_app_height() {
    set_app_height();
    let Some(window) = web_sys::window() else { return };
    let on_resize = Closure::<dyn FnMut()>::new(set_app_height);
    if let Err(err) =
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
    {
        log::warn!("could not listen for resize: {err:?}");
    }
    on_resize.forget();
}

/// `localStorage`-backed store.
#[derive(Debug, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get::<String>(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = LocalStorage::set(key, value) {
            log::warn!("could not persist {key}: {err}");
        }
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// Applies the theme as a `data-theme` attribute on `<html>`.
#[derive(Debug, Default)]
pub struct DocumentTheme;

impl ThemeTarget for DocumentTheme {
    fn apply(&self, theme: Theme) {
        if let Some(window) = web_sys::window()
            && let Some(document) = window.document()
            && let Some(html_element) = document.document_element()
            && let Err(err) = html_element.set_attribute(THEME_ATTRIBUTE, theme.as_str())
        {
            log::warn!("could not apply theme {}: {err:?}", theme.as_str());
        }
    }

    fn prefers_light(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.match_media(LIGHT_SCHEME_QUERY).ok().flatten())
            .is_some_and(|media_query| media_query.matches())
    }
}

/// Reads every file selected in `input` into memory.
pub async fn read_selected_files(input: &HtmlInputElement) -> Result<Vec<UploadFile>, String> {
    let Some(list) = input.files() else {
        return Ok(Vec::new());
    };

    let mut files = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        let Some(file) = list.item(index) else { continue };
        let buffer = JsFuture::from(file.array_buffer())
            .await
            .map_err(|err| format!("could not read {}: {err:?}", file.name()))?;
        files.push(UploadFile::new(file.name(), Uint8Array::new(&buffer).to_vec()));
    }
    Ok(files)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn root_element() -> HtmlElement {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_document_theme_sets_data_theme() {
        DocumentTheme.apply(Theme::Light);
        assert_eq!(root_element().get_attribute(THEME_ATTRIBUTE).as_deref(), Some("light"));

        DocumentTheme.apply(Theme::Dark);
        assert_eq!(root_element().get_attribute(THEME_ATTRIBUTE).as_deref(), Some("dark"));
    }

    #[wasm_bindgen_test]
    fn test_track_app_height_sets_css_variable() {
        track_app_height();
        let value = root_element()
            .style()
            .get_property_value(APP_HEIGHT_PROPERTY)
            .unwrap();
        assert!(value.ends_with("px"), "unexpected {APP_HEIGHT_PROPERTY}: {value}");
    }
}
