use std::cell::Cell;

use shared::{
    ChatMode, ControlSurface, LoadingId, Message, MessageSink, PdfIndexState, Theme,
};
use yewdux::{Dispatch, Store};

/// One row of the rendered conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Message(Message),
    Loading(LoadingId),
}

#[derive(Default, Clone, PartialEq, Store)]
pub struct WidgetState {
    pub entries: Vec<LogEntry>,
    pub input_enabled: bool,
    pub logout_visible: bool,
    pub mode: ChatMode,
    pub theme: Theme,
    pub pdf: PdfIndexState,
    /// Unsent composer text.
    pub draft: String,
    /// Bumped whenever the composer should be cleared and refocused.
    pub composer_resets: u32,
}

impl WidgetState {
    pub fn push_message(&mut self, message: Message) {
        self.entries.push(LogEntry::Message(message));
    }

    pub fn push_loading(&mut self, id: LoadingId) {
        self.entries.push(LogEntry::Loading(id));
    }

    pub fn remove_loading(&mut self, id: LoadingId) {
        self.entries
            .retain(|entry| !matches!(entry, LogEntry::Loading(current) if *current == id));
    }

    pub fn clear_log(&mut self) {
        self.entries.clear();
    }

    /// Empties the composer and asks it to take focus again.
    pub fn reset_composer(&mut self) {
        self.draft.clear();
        self.composer_resets = self.composer_resets.wrapping_add(1);
    }

    pub fn is_loading(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, LogEntry::Loading(_)))
    }
}

/// Routes widget output into the yewdux store.
pub struct StoreSurface {
    dispatch: Dispatch<WidgetState>,
    next_loading: Cell<u64>,
}

impl StoreSurface {
    pub fn new(dispatch: Dispatch<WidgetState>) -> Self {
        Self {
            dispatch,
            next_loading: Cell::new(0),
        }
    }
}

impl MessageSink for StoreSurface {
    fn append(&self, message: Message) {
        self.dispatch.reduce_mut(|state| state.push_message(message));
    }

    fn show_loading(&self) -> LoadingId {
        let id = LoadingId(self.next_loading.get());
        self.next_loading.set(id.0 + 1);
        self.dispatch.reduce_mut(|state| state.push_loading(id));
        id
    }

    fn dismiss_loading(&self, id: LoadingId) {
        self.dispatch.reduce_mut(|state| state.remove_loading(id));
    }

    fn clear(&self) {
        self.dispatch.reduce_mut(WidgetState::clear_log);
    }
}

impl ControlSurface for StoreSurface {
    fn set_input_enabled(&self, enabled: bool) {
        self.dispatch
            .reduce_mut(|state| state.input_enabled = enabled);
    }

    fn set_logout_visible(&self, visible: bool) {
        self.dispatch
            .reduce_mut(|state| state.logout_visible = visible);
    }
}
