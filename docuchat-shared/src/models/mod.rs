pub mod api;
pub mod message;
pub mod mode;
pub mod theme;

pub use api::{
    ChatRequest, ChatResponse, ConversationCreateResponse, ErrorBody, PdfAskRequest,
    PdfAskResponse, PdfIndexResponse, PdfSummarizeRequest, PdfSummarizeResponse, SourceRef,
};
pub use message::{Message, MessageRole};
pub use mode::ChatMode;
pub use theme::Theme;
