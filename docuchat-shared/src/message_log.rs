//! Message log port and its in-memory implementation.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::models::Message;

/// Identifies one loading placeholder in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadingId(pub u64);

/// Where rendered messages go.
///
/// The browser implementation appends to the scrollable panel and keeps it
/// scrolled to the bottom; [`MessageLog`] just records.
pub trait MessageSink {
    fn append(&self, message: Message);
    fn show_loading(&self) -> LoadingId;
    /// Removing an id that is not shown is a no-op.
    fn dismiss_loading(&self, id: LoadingId);
    fn clear(&self);
}

/// A visible loading placeholder.
///
/// Dismissed exactly once: either by [`LoadingHandle::dismiss`] or, if the
/// owner bails out early, when the handle is dropped.
pub struct LoadingHandle {
    sink: Rc<dyn MessageSink>,
    id: LoadingId,
    dismissed: bool,
}

impl LoadingHandle {
    #[must_use]
    pub const fn id(&self) -> LoadingId {
        self.id
    }

    pub fn dismiss(mut self) {
        self.dismiss_once();
    }

    fn dismiss_once(&mut self) {
        if !self.dismissed {
            self.dismissed = true;
            self.sink.dismiss_loading(self.id);
        }
    }
}

impl Drop for LoadingHandle {
    fn drop(&mut self) {
        self.dismiss_once();
    }
}

impl std::fmt::Debug for LoadingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingHandle")
            .field("id", &self.id)
            .field("dismissed", &self.dismissed)
            .finish_non_exhaustive()
    }
}

/// Shows a loading placeholder and returns the handle that removes it.
pub fn show_loading_indicator(sink: &Rc<dyn MessageSink>) -> LoadingHandle {
    let id = sink.show_loading();
    LoadingHandle {
        sink: Rc::clone(sink),
        id,
        dismissed: false,
    }
}

/// One call made on a [`MessageSink`], as recorded by [`MessageLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Append(Message),
    ShowLoading(LoadingId),
    DismissLoading(LoadingId),
    Clear,
}

/// In-memory message log.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: RefCell<Vec<Message>>,
    events: RefCell<Vec<SinkEvent>>,
    loading: RefCell<Vec<LoadingId>>,
    next_loading: Cell<u64>,
    dismissals: Cell<usize>,
}

impl MessageLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.messages.borrow().iter().map(|m| m.text.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Placeholders currently shown.
    #[must_use]
    pub fn pending_loading(&self) -> Vec<LoadingId> {
        self.loading.borrow().clone()
    }

    /// Every sink call in the order it happened, including ones a later
    /// `clear` wiped from view.
    #[must_use]
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.borrow().clone()
    }

    /// Total number of placeholders removed so far.
    #[must_use]
    pub fn dismissals(&self) -> usize {
        self.dismissals.get()
    }
}

impl MessageSink for MessageLog {
    fn append(&self, message: Message) {
        self.events.borrow_mut().push(SinkEvent::Append(message.clone()));
        self.messages.borrow_mut().push(message);
    }

    fn show_loading(&self) -> LoadingId {
        let id = LoadingId(self.next_loading.get());
        self.next_loading.set(id.0 + 1);
        self.loading.borrow_mut().push(id);
        self.events.borrow_mut().push(SinkEvent::ShowLoading(id));
        id
    }

    fn dismiss_loading(&self, id: LoadingId) {
        let mut loading = self.loading.borrow_mut();
        if let Some(index) = loading.iter().position(|shown| *shown == id) {
            loading.remove(index);
            self.dismissals.set(self.dismissals.get() + 1);
            self.events.borrow_mut().push(SinkEvent::DismissLoading(id));
        }
    }

    fn clear(&self) {
        self.events.borrow_mut().push(SinkEvent::Clear);
        self.messages.borrow_mut().clear();
        self.loading.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    fn sink() -> (Rc<MessageLog>, Rc<dyn MessageSink>) {
        let log = Rc::new(MessageLog::new());
        let sink: Rc<dyn MessageSink> = log.clone();
        (log, sink)
    }

    #[test]
    fn test_append_keeps_order() {
        let (log, sink) = sink();
        sink.append(Message::user("Hello"));
        sink.append(Message::bot("Hi there"));

        let messages = log.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(log.texts(), vec!["Hello", "Hi there"]);
    }

    #[test]
    fn test_loading_handle_dismisses_once() {
        let (log, sink) = sink();
        let handle = show_loading_indicator(&sink);
        assert_eq!(log.pending_loading(), vec![handle.id()]);

        handle.dismiss();
        assert!(log.pending_loading().is_empty());
        assert_eq!(log.dismissals(), 1);
    }

    #[test]
    fn test_dropped_handle_dismisses() {
        let (log, sink) = sink();
        {
            let _handle = show_loading_indicator(&sink);
            assert_eq!(log.pending_loading().len(), 1);
        }
        assert!(log.pending_loading().is_empty());
        assert_eq!(log.dismissals(), 1);
    }

    #[test]
    fn test_handles_get_distinct_ids() {
        let (log, sink) = sink();
        let first = show_loading_indicator(&sink);
        let second = show_loading_indicator(&sink);
        assert_ne!(first.id(), second.id());

        first.dismiss();
        assert_eq!(log.pending_loading(), vec![second.id()]);
    }

    #[test]
    fn test_clear_empties_messages_and_placeholders() {
        let (log, sink) = sink();
        sink.append(Message::bot("hi"));
        let handle = show_loading_indicator(&sink);
        sink.clear();
        assert!(log.is_empty());
        assert!(log.pending_loading().is_empty());

        // Dismissing after a clear is harmless
        handle.dismiss();
        assert_eq!(log.dismissals(), 0);
    }

    #[test]
    fn test_events_keep_call_order() {
        let (log, sink) = sink();
        sink.append(Message::user("q"));
        let handle = show_loading_indicator(&sink);
        let id = handle.id();
        handle.dismiss();
        sink.append(Message::bot("a"));

        assert_eq!(
            log.events(),
            vec![
                SinkEvent::Append(Message::user("q")),
                SinkEvent::ShowLoading(id),
                SinkEvent::DismissLoading(id),
                SinkEvent::Append(Message::bot("a")),
            ]
        );
    }
}
