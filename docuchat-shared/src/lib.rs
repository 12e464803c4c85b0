#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Core of the DocuChat widget.
//!
//! Everything here is target independent: the browser crate plugs its own
//! storage, auth, theme and view adapters into the ports defined below, and
//! tests plug in the in-memory ones.

pub mod auth;
pub mod chat;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod message_log;
pub mod models;
pub mod pdf;
pub mod session;
pub mod storage;
pub mod theme;
pub mod transport;
pub mod widget;

pub use auth::{
    AuthEvent, AuthProvider, AuthSession, AuthStateController, ControlState, ControlSurface,
    StaticAuth,
};
pub use chat::{ChatOrchestrator, SendState};
pub use config::WidgetConfig;
pub use errors::{WidgetError, WidgetResult};
pub use gateway::Gateway;
pub use message_log::{
    LoadingHandle, LoadingId, MessageLog, MessageSink, SinkEvent, show_loading_indicator,
};
pub use models::{ChatMode, Message, MessageRole, Theme};
pub use pdf::PdfOrchestrator;
pub use session::{ConversationSession, NoticeFlags, PdfIndexState, SessionState, SharedSession};
pub use storage::{KeyValueStore, MemoryStore};
pub use theme::{ThemeStore, ThemeTarget};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Payload, RequestBody, Transport, UploadFile,
};
pub use widget::{ChatWidget, WidgetPorts};
