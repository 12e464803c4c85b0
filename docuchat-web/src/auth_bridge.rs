//! Binding to the page-provided `window.docuchatAuth` object.

use async_trait::async_trait;
use js_sys::Reflect;
use shared::{AuthEvent, AuthProvider, AuthSession, WidgetError, WidgetResult};
use wasm_bindgen::{JsCast, JsValue, prelude::*};

const SIGNED_OUT_EVENT: &str = "SIGNED_OUT";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = docuchatAuth, js_name = getSession, catch)]
    async fn get_session() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = docuchatAuth, js_name = signOut, catch)]
    async fn provider_sign_out() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = docuchatAuth, js_name = onAuthStateChange, catch)]
    fn on_auth_state_change(
        callback: &Closure<dyn FnMut(String, JsValue)>,
    ) -> Result<(), JsValue>;
}

fn string_field(value: &JsValue, key: &str) -> Option<String> {
    Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .and_then(|field| field.as_string())
}

fn js_error_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "unknown auth provider error".to_string())
}

/// Reads `{ access_token, user: { email } }` from a provider session object.
fn parse_session(value: &JsValue) -> Option<AuthSession> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let access_token = string_field(value, "access_token").filter(|token| !token.is_empty())?;
    let user_email = Reflect::get(value, &JsValue::from_str("user"))
        .ok()
        .and_then(|user| string_field(&user, "email"))
        .unwrap_or_default();
    Some(AuthSession::new(access_token, user_email))
}

/// Maps a provider `(event, session)` notification to a widget event.
fn to_auth_event(event: &str, session: &JsValue) -> AuthEvent {
    if event == SIGNED_OUT_EVENT {
        return AuthEvent::SignedOut;
    }
    match parse_session(session) {
        Some(session) => AuthEvent::SessionPresent {
            user_email: session.user_email,
        },
        None => AuthEvent::SessionAbsent,
    }
}

#[derive(Debug, Default)]
pub struct BrowserAuth;

impl BrowserAuth {
    /// Forwards every provider notification to `on_event` for the page lifetime.
    ///
    /// A missing or broken bridge is logged; the widget then stays signed out.
    pub fn subscribe(on_event: impl Fn(AuthEvent) + 'static) {
        let callback = Closure::<dyn FnMut(String, JsValue)>::new(
            move |event: String, session: JsValue| {
                log::debug!("auth provider event: {event}");
                on_event(to_auth_event(&event, &session));
            },
        );
        if let Err(err) = on_auth_state_change(&callback) {
            log::error!("could not subscribe to auth changes: {}", js_error_message(&err));
            return;
        }
        callback.forget();
    }
}

#[async_trait(?Send)]
impl AuthProvider for BrowserAuth {
    async fn current_session(&self) -> Option<AuthSession> {
        match get_session().await {
            Ok(value) => parse_session(&value),
            Err(err) => {
                log::warn!("could not read auth session: {}", js_error_message(&err));
                None
            }
        }
    }

    async fn sign_out(&self) -> WidgetResult<()> {
        provider_sign_out()
            .await
            .map(|_| ())
            .map_err(|err| WidgetError::network(js_error_message(&err)))
    }
}
