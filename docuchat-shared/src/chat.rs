//! Chat flow: optimistic user bubble, loading indicator, backend call,
//! reply or error bubble.

use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::{WidgetError, WidgetResult};
use crate::gateway::Gateway;
use crate::message_log::{MessageSink, show_loading_indicator};
use crate::models::{ChatRequest, ChatResponse, Message};
use crate::session::{ConversationSession, PdfIndexState, SharedSession};
use crate::transport::{ApiRequest, ApiResponse, Payload};

const CHAT_PATH: &str = "/chatbot";
const RESET_PATH: &str = "/reset";

/// Where a single chat message ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    /// Nothing was sent (blank input).
    Idle,
    /// Request in flight.
    Sending,
    Rendered,
    Failed,
}

pub struct ChatOrchestrator {
    gateway: Rc<Gateway>,
    conversation: Rc<ConversationSession>,
    sink: Rc<dyn MessageSink>,
    state: SharedSession,
}

impl ChatOrchestrator {
    pub fn new(
        gateway: Rc<Gateway>,
        conversation: Rc<ConversationSession>,
        sink: Rc<dyn MessageSink>,
        state: SharedSession,
    ) -> Self {
        Self {
            gateway,
            conversation,
            sink,
            state,
        }
    }

    /// Sends one chat message and renders its outcome.
    ///
    /// Blank input is ignored. Otherwise the user bubble is rendered
    /// immediately and exactly one bot or error bubble follows, after the
    /// loading indicator has been removed.
    pub async fn send_chat_message(&self, text: &str) -> SendState {
        let prompt = text.trim();
        if prompt.is_empty() {
            return SendState::Idle;
        }

        self.sink.append(Message::user(prompt));
        let loading = show_loading_indicator(&self.sink);
        debug!(state = ?SendState::Sending, "chat message sending");

        let outcome = self.request_reply(prompt).await;
        loading.dismiss();

        match outcome {
            Ok(reply) => {
                self.sink.append(Message::bot(reply));
                SendState::Rendered
            }
            Err(err) => {
                warn!(error = %err, "chat message failed");
                self.sink.append(Message::error(err.to_string()));
                SendState::Failed
            }
        }
    }

    async fn request_reply(&self, prompt: &str) -> WidgetResult<String> {
        let conversation_id = self.conversation.ensure_conversation().await?;
        let request = ApiRequest::json(
            CHAT_PATH,
            &ChatRequest {
                prompt: prompt.to_string(),
                conversation_id: Some(conversation_id),
            },
        )?;
        let response = self.gateway.authorized_fetch(request).await?;
        reply_text(response)
    }

    /// Starts over: asks the backend to drop its history, forgets the
    /// conversation and PDF index, and empties the log.
    ///
    /// The reset call is best effort; its failure never blocks the local
    /// reset.
    pub async fn new_chat(&self) {
        match self.gateway.public_fetch(ApiRequest::post(RESET_PATH)).await {
            Ok(response) if !response.is_ok() => {
                debug!(status = response.status, "reset endpoint refused; continuing");
            }
            Ok(_) => {}
            Err(err) => debug!(error = %err, "reset endpoint unreachable; continuing"),
        }

        self.conversation.clear();
        self.state.borrow_mut().pdf = PdfIndexState::default();
        self.sink.clear();
        info!("started a new chat");
    }
}

impl std::fmt::Debug for ChatOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatOrchestrator")
            .field("conversation", &self.conversation)
            .finish_non_exhaustive()
    }
}

/// Extracts the reply from either `{reply}` JSON or a plain-text body.
fn reply_text(response: ApiResponse) -> WidgetResult<String> {
    match response.ensure_ok()?.payload {
        Payload::Text(text) => Ok(text.trim().to_string()),
        Payload::Json(Value::String(text)) => Ok(text),
        Payload::Json(value @ Value::Object(_)) => serde_json::from_value::<ChatResponse>(value)
            .map(|body| body.reply)
            .map_err(WidgetError::decode),
        Payload::Json(other) => Ok(other.to_string()),
        Payload::Empty => Err(WidgetError::decode("empty reply")),
    }
}
