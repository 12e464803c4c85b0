//! "Ask PDFs" mode: upload/index, question answering and summaries.
//!
//! Asking and summarizing both need a successful index first; without one
//! they render a warning and never reach the backend.

use std::rc::Rc;

use tracing::{info, warn};

use crate::errors::{WidgetError, WidgetResult};
use crate::gateway::Gateway;
use crate::message_log::{MessageSink, show_loading_indicator};
use crate::models::{
    Message, PdfAskRequest, PdfAskResponse, PdfIndexResponse, PdfSummarizeRequest,
    PdfSummarizeResponse,
};
use crate::session::{PdfIndexState, SharedSession};
use crate::transport::{ApiRequest, UploadFile};

const INDEX_PATH: &str = "/pdf/index";
const ASK_PATH: &str = "/pdf/ask";
const SUMMARIZE_PATH: &str = "/pdf/summarize";

pub const NOT_INDEXED_ASK_WARNING: &str = "⚠️ Click “Upload PDFs” first (Ask PDFs mode).";
pub const NOT_INDEXED_SUMMARIZE_WARNING: &str =
    "⚠️ Upload and index your PDFs before asking for a summary.";
pub const EMPTY_SELECTION_WARNING: &str = "⚠️ Select at least one PDF to upload.";

pub struct PdfOrchestrator {
    gateway: Rc<Gateway>,
    sink: Rc<dyn MessageSink>,
    state: SharedSession,
    ask_top_k: u32,
    summarize_top_k: u32,
}

impl PdfOrchestrator {
    pub fn new(
        gateway: Rc<Gateway>,
        sink: Rc<dyn MessageSink>,
        state: SharedSession,
        ask_top_k: u32,
        summarize_top_k: u32,
    ) -> Self {
        Self {
            gateway,
            sink,
            state,
            ask_top_k,
            summarize_top_k,
        }
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.state.borrow().pdf.indexed
    }

    #[must_use]
    pub fn index_state(&self) -> PdfIndexState {
        self.state.borrow().pdf.clone()
    }

    /// Uploads `files` and indexes them for later questions.
    ///
    /// # Errors
    /// Returns the failure after rendering it: a validation error for an
    /// empty selection, or whatever the upload hit. `indexed` stays `false`
    /// on every failure path.
    pub async fn upload_and_index(&self, files: Vec<UploadFile>) -> WidgetResult<PdfIndexState> {
        if files.is_empty() {
            return Err(self.render_failure(WidgetError::Validation(
                EMPTY_SELECTION_WARNING.to_string(),
            )));
        }

        // A new upload replaces whatever was indexed before
        self.state.borrow_mut().pdf = PdfIndexState::default();

        let count = files.len();
        let loading = show_loading_indicator(&self.sink);
        let outcome = async {
            let response = self
                .gateway
                .authorized_fetch(ApiRequest::files(INDEX_PATH, files))
                .await?;
            response.decode::<PdfIndexResponse>()
        }
        .await;
        loading.dismiss();

        match outcome {
            Ok(indexed) => {
                let state = PdfIndexState {
                    indexed: true,
                    summary_details: indexed.summary_details(),
                };
                info!(files = count, chunks = indexed.chunks, "indexed PDFs");
                self.state.borrow_mut().pdf = state.clone();
                self.sink.append(Message::bot(format!(
                    "✅ Indexed {}. Ask a question or click “Summarize”.",
                    state.summary_details
                )));
                Ok(state)
            }
            Err(err) => Err(self.render_failure(err)),
        }
    }

    /// Answers a question from the indexed PDFs.
    ///
    /// Blank questions are ignored. Without an index only the warning is
    /// rendered.
    pub async fn ask_question(&self, text: &str) {
        let question = text.trim();
        if question.is_empty() {
            return;
        }
        if !self.is_indexed() {
            self.sink.append(Message::error(NOT_INDEXED_ASK_WARNING));
            return;
        }

        self.sink.append(Message::user(question));
        let loading = show_loading_indicator(&self.sink);
        let outcome = async {
            let request = ApiRequest::json(
                ASK_PATH,
                &PdfAskRequest {
                    question: question.to_string(),
                    k: self.ask_top_k,
                },
            )?;
            self.gateway
                .authorized_fetch(request)
                .await?
                .decode::<PdfAskResponse>()
        }
        .await;
        loading.dismiss();

        match outcome {
            Ok(answer) => self.sink.append(Message::bot(answer.render())),
            Err(err) => {
                self.render_failure(err);
            }
        }
    }

    /// Produces a report covering all indexed PDFs.
    pub async fn summarize(&self) {
        if !self.is_indexed() {
            self.sink.append(Message::error(NOT_INDEXED_SUMMARIZE_WARNING));
            return;
        }

        let loading = show_loading_indicator(&self.sink);
        let outcome = async {
            let request = ApiRequest::json(
                SUMMARIZE_PATH,
                &PdfSummarizeRequest {
                    k: self.summarize_top_k,
                },
            )?;
            self.gateway
                .authorized_fetch(request)
                .await?
                .decode::<PdfSummarizeResponse>()
        }
        .await;
        loading.dismiss();

        match outcome {
            Ok(summary) => self.sink.append(Message::bot(summary.final_report)),
            Err(err) => {
                self.render_failure(err);
            }
        }
    }

    fn render_failure(&self, err: WidgetError) -> WidgetError {
        warn!(error = %err, "pdf action failed");
        self.sink.append(Message::error(err.to_string()));
        err
    }
}

impl std::fmt::Debug for PdfOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfOrchestrator")
            .field("indexed", &self.is_indexed())
            .field("ask_top_k", &self.ask_top_k)
            .field("summarize_top_k", &self.summarize_top_k)
            .finish_non_exhaustive()
    }
}
