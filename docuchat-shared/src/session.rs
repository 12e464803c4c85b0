//! Per-page session state and the conversation id lifecycle.

use std::{cell::RefCell, rc::Rc};

use tracing::{debug, info, warn};

use crate::errors::{WidgetError, WidgetResult};
use crate::gateway::Gateway;
use crate::models::{ChatMode, ConversationCreateResponse};
use crate::storage::KeyValueStore;
use crate::transport::ApiRequest;

const CREATE_CONVERSATION_PATH: &str = "/conversations/new";
const STALE_CONVERSATION_REASON: &str = "the session was reset before the conversation was ready";

/// Whether uploaded PDFs are queryable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfIndexState {
    pub indexed: bool,
    pub summary_details: String,
}

/// One-time notices already shown in this sign-in cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoticeFlags {
    pub welcome_shown: bool,
    pub login_hint_shown: bool,
}

/// Everything the orchestrators mutate, in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub conversation_id: Option<String>,
    pub pdf: PdfIndexState,
    pub notices: NoticeFlags,
    pub mode: ChatMode,
    /// Bumped by every conversation reset. A create call that started
    /// under an older epoch must not install its id.
    pub conversation_epoch: u64,
}

/// Shared handle to the page session state.
pub type SharedSession = Rc<RefCell<SessionState>>;

/// Lazily creates and persists the conversation id.
pub struct ConversationSession {
    gateway: Rc<Gateway>,
    store: Rc<dyn KeyValueStore>,
    state: SharedSession,
    storage_key: String,
}

impl ConversationSession {
    /// Creates the session, adopting any id already persisted under
    /// `storage_key`.
    pub fn new(
        gateway: Rc<Gateway>,
        store: Rc<dyn KeyValueStore>,
        state: SharedSession,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        if let Some(id) = store.get(&storage_key).filter(|id| !id.trim().is_empty()) {
            debug!(conversation_id = %id, "restored persisted conversation");
            state.borrow_mut().conversation_id = Some(id);
        }
        Self {
            gateway,
            store,
            state,
            storage_key,
        }
    }

    #[must_use]
    pub fn conversation_id(&self) -> Option<String> {
        self.state.borrow().conversation_id.clone()
    }

    /// Returns the current conversation id, creating one if needed.
    ///
    /// # Errors
    /// Returns [`WidgetError::ConversationCreateFailed`] when the backend
    /// answers with a failure status or without a usable id, and passes
    /// through auth and network failures unchanged. Nothing is retried.
    pub async fn ensure_conversation(&self) -> WidgetResult<String> {
        if let Some(id) = self.conversation_id() {
            return Ok(id);
        }
        let epoch = self.state.borrow().conversation_epoch;

        let response = self
            .gateway
            .authorized_fetch(ApiRequest::post(CREATE_CONVERSATION_PATH))
            .await?;

        let created = response
            .decode::<ConversationCreateResponse>()
            .map_err(|err| {
                let reason = match err {
                    WidgetError::Backend { status, message } => format!("{message} ({status})"),
                    other => other.to_string(),
                };
                WidgetError::ConversationCreateFailed { reason }
            })
            .and_then(|body| {
                body.into_id()
                    .ok_or_else(|| WidgetError::ConversationCreateFailed {
                        reason: "response did not include a conversation_id".to_string(),
                    })
            });
        let id = created.inspect_err(|err| warn!(error = %err, "conversation create failed"))?;

        if self.state.borrow().conversation_epoch != epoch {
            warn!("conversation was reset while being created; discarding new id");
            return Err(WidgetError::ConversationCreateFailed {
                reason: STALE_CONVERSATION_REASON.to_string(),
            });
        }

        // A concurrent caller may have won the race while we were waiting
        if let Some(existing) = self.conversation_id() {
            return Ok(existing);
        }

        info!(conversation_id = %id, "created conversation");
        self.store.set(&self.storage_key, &id);
        self.state.borrow_mut().conversation_id = Some(id.clone());
        Ok(id)
    }

    /// Forgets the conversation id in memory and in storage.
    ///
    /// Any create call still in flight is invalidated.
    pub fn clear(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.conversation_id = None;
            state.conversation_epoch += 1;
        }
        self.store.remove(&self.storage_key);
        debug!("cleared conversation");
    }
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSession")
            .field("storage_key", &self.storage_key)
            .field("conversation_id", &self.conversation_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_defaults() {
        let state = SessionState::default();
        assert_eq!(state.conversation_id, None);
        assert!(!state.pdf.indexed);
        assert!(state.pdf.summary_details.is_empty());
        assert!(!state.notices.welcome_shown);
        assert!(!state.notices.login_hint_shown);
        assert_eq!(state.mode, ChatMode::Chat);
        assert_eq!(state.conversation_epoch, 0);
    }
}
