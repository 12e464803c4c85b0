//! Shared fakes for the widget integration tests.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use async_trait::async_trait;
use serde_json::Value;
use shared::{
    ApiRequest, ApiResponse, AuthSession, ChatWidget, ControlState, MemoryStore, MessageLog,
    StaticAuth, Theme, ThemeTarget, Transport, WidgetConfig, WidgetError, WidgetPorts,
    WidgetResult,
};

/// Scripted reply for one request.
pub enum Reply {
    Response(ApiResponse),
    NetworkDown,
}

/// Transport that answers from a per-path script and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<HashMap<String, VecDeque<Reply>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, path: &str, status: u16, body: Value) -> &Self {
        self.push(path, Reply::Response(ApiResponse::json(status, body)))
    }

    pub fn reply_text(&self, path: &str, status: u16, body: &str) -> &Self {
        self.push(path, Reply::Response(ApiResponse::from_parts(status, body)))
    }

    pub fn fail(&self, path: &str) -> &Self {
        self.push(path, Reply::NetworkDown)
    }

    fn push(&self, path: &str, reply: Reply) -> &Self {
        self.replies
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.path.clone()).collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.path == path).count()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> WidgetResult<ApiResponse> {
        let path = request.path.clone();
        self.requests.borrow_mut().push(request);
        // Behave like a real network call and give other tasks a turn
        tokio::task::yield_now().await;
        let next = self
            .replies
            .borrow_mut()
            .get_mut(&path)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::NetworkDown) => Err(WidgetError::network("connection refused")),
            None => Ok(ApiResponse::json(404, serde_json::json!({"error": "not scripted"}))),
        }
    }
}

/// Theme target that remembers the last applied theme.
#[derive(Default)]
pub struct FakeDocument {
    pub prefers_light: bool,
    pub applied: Cell<Option<Theme>>,
}

impl ThemeTarget for FakeDocument {
    fn apply(&self, theme: Theme) {
        self.applied.set(Some(theme));
    }

    fn prefers_light(&self) -> bool {
        self.prefers_light
    }
}

/// A widget wired to in-memory adapters, with handles to inspect them.
pub struct Harness {
    pub widget: ChatWidget,
    pub transport: Rc<ScriptedTransport>,
    pub auth: Rc<StaticAuth>,
    pub log: Rc<MessageLog>,
    pub controls: Rc<ControlState>,
    pub store: Rc<MemoryStore>,
    pub document: Rc<FakeDocument>,
}

pub fn session() -> AuthSession {
    AuthSession::new("token-123", "ada@example.com")
}

impl Harness {
    pub fn signed_in() -> Self {
        Self::build(StaticAuth::signed_in(session()), MemoryStore::new())
    }

    pub fn signed_out() -> Self {
        Self::build(StaticAuth::signed_out(), MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self::build(StaticAuth::signed_in(session()), store)
    }

    pub fn build(auth: StaticAuth, store: MemoryStore) -> Self {
        let transport = Rc::new(ScriptedTransport::new());
        let auth = Rc::new(auth);
        let log = Rc::new(MessageLog::new());
        let controls = Rc::new(ControlState::new());
        let store = Rc::new(store);
        let document = Rc::new(FakeDocument::default());

        let ports = WidgetPorts {
            auth: auth.clone(),
            transport: transport.clone(),
            store: store.clone(),
            sink: log.clone(),
            controls: controls.clone(),
            theme_target: document.clone(),
        };
        let widget = ChatWidget::new(&WidgetConfig::with_defaults(), ports);

        Self {
            widget,
            transport,
            auth,
            log,
            controls,
            store,
            document,
        }
    }
}
