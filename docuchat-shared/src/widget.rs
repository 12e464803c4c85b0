//! The widget facade the UI layer talks to.

use std::{cell::RefCell, rc::Rc};

use tracing::{info, warn};

use crate::auth::{AuthEvent, AuthProvider, AuthStateController, ControlSurface};
use crate::chat::{ChatOrchestrator, SendState};
use crate::config::WidgetConfig;
use crate::errors::WidgetResult;
use crate::gateway::Gateway;
use crate::message_log::MessageSink;
use crate::models::{ChatMode, Message, Theme};
use crate::pdf::PdfOrchestrator;
use crate::session::{ConversationSession, PdfIndexState, SessionState, SharedSession};
use crate::storage::KeyValueStore;
use crate::theme::{ThemeStore, ThemeTarget};
use crate::transport::{Transport, UploadFile};

/// Host-provided adapters.
#[derive(Clone)]
pub struct WidgetPorts {
    pub auth: Rc<dyn AuthProvider>,
    pub transport: Rc<dyn Transport>,
    pub store: Rc<dyn KeyValueStore>,
    pub sink: Rc<dyn MessageSink>,
    pub controls: Rc<dyn ControlSurface>,
    pub theme_target: Rc<dyn ThemeTarget>,
}

impl std::fmt::Debug for WidgetPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetPorts").finish_non_exhaustive()
    }
}

/// Owns the session state and every orchestrator.
pub struct ChatWidget {
    state: SharedSession,
    auth: Rc<dyn AuthProvider>,
    sink: Rc<dyn MessageSink>,
    theme: ThemeStore,
    chat: ChatOrchestrator,
    pdf: PdfOrchestrator,
    auth_controller: AuthStateController,
}

impl ChatWidget {
    pub fn new(config: &WidgetConfig, ports: WidgetPorts) -> Self {
        let state: SharedSession = Rc::new(RefCell::new(SessionState::default()));
        let gateway = Rc::new(Gateway::new(ports.auth.clone(), ports.transport));
        let conversation = Rc::new(ConversationSession::new(
            gateway.clone(),
            ports.store.clone(),
            state.clone(),
            config.conversation_storage_key.clone(),
        ));

        let theme = ThemeStore::load(
            ports.store,
            ports.theme_target,
            config.theme_storage_key.clone(),
        );
        let chat = ChatOrchestrator::new(
            gateway.clone(),
            conversation.clone(),
            ports.sink.clone(),
            state.clone(),
        );
        let pdf = PdfOrchestrator::new(
            gateway,
            ports.sink.clone(),
            state.clone(),
            config.ask_top_k,
            config.summarize_top_k,
        );
        let auth_controller = AuthStateController::new(
            conversation,
            ports.sink.clone(),
            ports.controls,
            state.clone(),
        );

        Self {
            state,
            auth: ports.auth,
            sink: ports.sink,
            theme,
            chat,
            pdf,
            auth_controller,
        }
    }

    /// Snapshot of the session state.
    #[must_use]
    pub fn session(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn mode(&self) -> ChatMode {
        self.state.borrow().mode
    }

    /// Changes where submitted input goes. In-flight requests are untouched.
    pub fn set_mode(&self, mode: ChatMode) {
        self.state.borrow_mut().mode = mode;
        info!(mode = mode.as_str(), "switched input mode");
    }

    /// Routes submitted text to the orchestrator for the current mode.
    pub async fn submit(&self, text: &str) {
        match self.mode() {
            ChatMode::Chat => {
                self.chat.send_chat_message(text).await;
            }
            ChatMode::Pdf => self.pdf.ask_question(text).await,
        }
    }

    /// Chat-mode send, reporting where the message ended up.
    pub async fn send_chat_message(&self, text: &str) -> SendState {
        self.chat.send_chat_message(text).await
    }

    /// Uploads and indexes PDFs. Failures are already rendered.
    ///
    /// # Errors
    /// Returns the rendered failure for callers that want to react to it.
    pub async fn upload(&self, files: Vec<UploadFile>) -> WidgetResult<PdfIndexState> {
        self.pdf.upload_and_index(files).await
    }

    pub async fn summarize(&self) {
        self.pdf.summarize().await;
    }

    pub async fn new_chat(&self) {
        self.chat.new_chat().await;
    }

    pub async fn handle_auth_event(&self, event: AuthEvent) {
        self.auth_controller.handle(event).await;
    }

    /// Signs out with the provider, then applies the sign-out locally.
    ///
    /// The local reset happens even if the provider call fails; that
    /// failure is rendered after the log has been cleared.
    pub async fn sign_out(&self) {
        let provider_result = self.auth.sign_out().await;
        self.auth_controller.handle(AuthEvent::SignedOut).await;
        if let Err(err) = provider_result {
            warn!(error = %err, "provider sign-out failed");
            self.sink.append(Message::error(err.to_string()));
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn toggle_theme(&self) -> Theme {
        self.theme.toggle()
    }
}

impl std::fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatWidget")
            .field("state", &self.state.borrow())
            .field("theme", &self.theme)
            .field("auth", &self.auth_controller)
            .finish_non_exhaustive()
    }
}
