use serde::{Deserialize, Serialize};

/// Which orchestrator receives submitted input.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    #[default]
    Chat,
    Pdf,
}

impl ChatMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Pdf => "pdf",
        }
    }

    /// Placeholder shown in the composer for this mode.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Chat => "Type your message…",
            Self::Pdf => "Ask a question about your PDFs…",
        }
    }

    /// Whether the upload and summarize controls are visible.
    #[must_use]
    pub const fn shows_pdf_controls(self) -> bool {
        matches!(self, Self::Pdf)
    }
}
