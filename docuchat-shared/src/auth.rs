//! Auth provider port and the controller reacting to its session events.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::errors::WidgetResult;
use crate::message_log::MessageSink;
use crate::models::Message;
use crate::session::{ConversationSession, NoticeFlags, PdfIndexState, SharedSession};

/// Login hint shown once per sign-out cycle.
pub const LOGIN_HINT: &str = "🔒 Please sign in to start chatting.";

/// Credentials owned by the external auth provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub user_email: String,
}

impl AuthSession {
    pub fn new(access_token: impl Into<String>, user_email: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_email: user_email.into(),
        }
    }
}

// Keep tokens out of logs
impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"<redacted>")
            .field("user_email", &self.user_email)
            .finish()
    }
}

/// The external authentication SDK.
#[async_trait(?Send)]
pub trait AuthProvider {
    /// The live session, fetched fresh on every call.
    async fn current_session(&self) -> Option<AuthSession>;

    /// Ends the session with the provider.
    async fn sign_out(&self) -> WidgetResult<()>;
}

/// Provider holding a session set by the host. Used headless and in tests.
#[derive(Debug, Default)]
pub struct StaticAuth {
    session: RefCell<Option<AuthSession>>,
}

impl StaticAuth {
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_in(session: AuthSession) -> Self {
        Self {
            session: RefCell::new(Some(session)),
        }
    }

    pub fn set_session(&self, session: Option<AuthSession>) {
        *self.session.borrow_mut() = session;
    }
}

#[async_trait(?Send)]
impl AuthProvider for StaticAuth {
    async fn current_session(&self) -> Option<AuthSession> {
        self.session.borrow().clone()
    }

    async fn sign_out(&self) -> WidgetResult<()> {
        self.set_session(None);
        Ok(())
    }
}

/// UI affordances that follow the auth state.
pub trait ControlSurface {
    fn set_input_enabled(&self, enabled: bool);
    fn set_logout_visible(&self, visible: bool);
}

/// In-memory [`ControlSurface`].
#[derive(Debug, Default)]
pub struct ControlState {
    input_enabled: Cell<bool>,
    logout_visible: Cell<bool>,
}

impl ControlState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.input_enabled.get()
    }

    #[must_use]
    pub fn logout_visible(&self) -> bool {
        self.logout_visible.get()
    }
}

impl ControlSurface for ControlState {
    fn set_input_enabled(&self, enabled: bool) {
        self.input_enabled.set(enabled);
    }

    fn set_logout_visible(&self, visible: bool) {
        self.logout_visible.set(visible);
    }
}

/// Session change raised by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SessionPresent { user_email: String },
    SessionAbsent,
    /// Explicit sign-out; also re-arms the one-time notices.
    SignedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthStatus {
    Unknown,
    SignedIn,
    SignedOut,
}

/// Applies auth events to the UI, one at a time.
///
/// Events raised while another is being applied are queued and drained by
/// the call that is already running, so handlers never interleave.
pub struct AuthStateController {
    conversation: Rc<ConversationSession>,
    sink: Rc<dyn MessageSink>,
    controls: Rc<dyn ControlSurface>,
    state: SharedSession,
    queue: RefCell<VecDeque<AuthEvent>>,
    processing: Cell<bool>,
    status: Cell<AuthStatus>,
}

impl AuthStateController {
    pub fn new(
        conversation: Rc<ConversationSession>,
        sink: Rc<dyn MessageSink>,
        controls: Rc<dyn ControlSurface>,
        state: SharedSession,
    ) -> Self {
        Self {
            conversation,
            sink,
            controls,
            state,
            queue: RefCell::new(VecDeque::new()),
            processing: Cell::new(false),
            status: Cell::new(AuthStatus::Unknown),
        }
    }

    /// `true` while an event is being applied.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.status.get() == AuthStatus::SignedIn
    }

    /// Enqueues `event` and, unless a drain is already running, applies
    /// everything queued in arrival order.
    pub async fn handle(&self, event: AuthEvent) {
        self.queue.borrow_mut().push_back(event);
        if self.processing.replace(true) {
            debug!("auth event queued behind a running handler");
            return;
        }

        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else { break };
            self.apply(event).await;
        }
        self.processing.set(false);
    }

    async fn apply(&self, event: AuthEvent) {
        match event {
            AuthEvent::SessionPresent { user_email } => {
                if self.status.replace(AuthStatus::SignedIn) == AuthStatus::SignedIn {
                    debug!("ignoring repeated session-present event");
                    return;
                }
                info!("session present");
                self.on_session_present(&user_email).await;
            }
            AuthEvent::SessionAbsent => {
                if self.status.replace(AuthStatus::SignedOut) == AuthStatus::SignedOut {
                    debug!("ignoring repeated session-absent event");
                    return;
                }
                info!("session absent");
                self.on_session_absent();
            }
            AuthEvent::SignedOut => {
                info!("signed out");
                self.status.set(AuthStatus::SignedOut);
                self.state.borrow_mut().notices = NoticeFlags::default();
                self.on_session_absent();
            }
        }
    }

    async fn on_session_present(&self, user_email: &str) {
        self.controls.set_input_enabled(true);
        self.controls.set_logout_visible(true);

        if let Err(err) = self.conversation.ensure_conversation().await {
            warn!(error = %err, "could not prepare a conversation after sign-in");
            self.sink.append(Message::error(err.to_string()));
        }

        let first_welcome = {
            let mut state = self.state.borrow_mut();
            !std::mem::replace(&mut state.notices.welcome_shown, true)
        };
        if first_welcome {
            self.sink.append(Message::bot(welcome_notice(user_email)));
        }
    }

    fn on_session_absent(&self) {
        self.controls.set_input_enabled(false);
        self.controls.set_logout_visible(false);
        self.conversation.clear();
        self.sink.clear();

        let first_hint = {
            let mut state = self.state.borrow_mut();
            state.pdf = PdfIndexState::default();
            !std::mem::replace(&mut state.notices.login_hint_shown, true)
        };
        if first_hint {
            self.sink.append(Message::bot(LOGIN_HINT));
        }
    }
}

impl std::fmt::Debug for AuthStateController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStateController")
            .field("status", &self.status.get())
            .field("processing", &self.processing.get())
            .field("queued", &self.queue.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Greeting shown once after sign-in.
#[must_use]
pub fn welcome_notice(user_email: &str) -> String {
    let email = user_email.trim();
    if email.is_empty() {
        "👋 Welcome! Ask me anything, or switch to “Ask PDFs” mode to chat with your documents."
            .to_string()
    } else {
        format!(
            "👋 Welcome, {email}! Ask me anything, or switch to “Ask PDFs” mode to chat with your documents."
        )
    }
}
