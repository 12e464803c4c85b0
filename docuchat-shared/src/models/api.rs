//! Request and response bodies exchanged with the chat/PDF backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /chatbot`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub prompt: String,
    pub conversation_id: Option<String>,
}

/// Success body of `POST /chatbot`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub reply: String,
}

/// Success body of `POST /conversations/new`.
///
/// The backend hands out opaque ids; depending on the storage behind it they
/// arrive as JSON strings or integers, so the raw value is kept and
/// normalised by [`ConversationCreateResponse::into_id`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationCreateResponse {
    #[serde(default)]
    pub conversation_id: Option<Value>,
}

impl ConversationCreateResponse {
    /// Returns the id as a non-empty string, or `None` if it is missing or
    /// not a scalar.
    #[must_use]
    pub fn into_id(self) -> Option<String> {
        match self.conversation_id? {
            Value::String(id) => {
                let id = id.trim().to_string();
                (!id.is_empty()).then_some(id)
            }
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Success body of `POST /pdf/index`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PdfIndexResponse {
    pub pdf_count: u32,
    pub chunks: u32,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub pdf_names: Vec<String>,
}

impl PdfIndexResponse {
    /// One-line description kept in `PdfIndexState::summary_details`.
    #[must_use]
    pub fn summary_details(&self) -> String {
        let mut details = format!("{} PDF(s)", self.pdf_count);
        if let Some(pages) = self.pages {
            details.push_str(&format!(" • {pages} pages"));
        }
        details.push_str(&format!(" • {} chunks", self.chunks));
        if !self.pdf_names.is_empty() {
            details.push_str(&format!(" ({})", self.pdf_names.join(", ")));
        }
        details
    }
}

/// Body of `POST /pdf/ask`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PdfAskRequest {
    pub question: String,
    pub k: u32,
}

/// A retrieved chunk the answer was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRef {
    pub source: String,
    pub page: u32,
}

/// Success body of `POST /pdf/ask`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PdfAskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

impl PdfAskResponse {
    /// Answer text with a trailing, de-duplicated "Sources" line.
    #[must_use]
    pub fn render(&self) -> String {
        if self.sources.is_empty() {
            return self.answer.clone();
        }
        let mut seen: Vec<String> = Vec::new();
        for source in &self.sources {
            let label = format!("{} p.{}", source.source, source.page);
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        format!("{}\n\nSources: {}", self.answer, seen.join(", "))
    }
}

/// Body of `POST /pdf/summarize`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PdfSummarizeRequest {
    pub k: u32,
}

/// Success body of `POST /pdf/summarize`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PdfSummarizeResponse {
    pub final_report: String,
}

/// Shape of a non-success body. Either field may be used by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The first non-blank description, preferring `error`.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        [self.error.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}
