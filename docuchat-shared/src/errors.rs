//! # Widget Error Types
//!
//! Every failure a widget action can hit. Orchestrators recover all of them
//! locally and surface the `Display` text as a single error bubble.

use thiserror::Error;

/// Result type alias for widget operations
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Failure taxonomy for the widget
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// No auth session is present, so no request was issued
    #[error("Please sign in to continue.")]
    Unauthenticated,

    /// The backend refused or garbled the "create conversation" call
    #[error("Could not start a conversation: {reason}")]
    ConversationCreateFailed { reason: String },

    /// The request never produced a response
    #[error("Network/server error: {message}")]
    Network { message: String },

    /// The backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// A success response did not have the expected shape
    #[error("Unexpected server response: {message}")]
    Decode { message: String },

    /// The action was rejected before any request was made
    #[error("{0}")]
    Validation(String),
}

impl WidgetError {
    /// Builds a [`WidgetError::Network`] from any displayable cause.
    pub fn network(cause: impl std::fmt::Display) -> Self {
        Self::Network {
            message: cause.to_string(),
        }
    }

    /// Builds a [`WidgetError::Decode`] from any displayable cause.
    pub fn decode(cause: impl std::fmt::Display) -> Self {
        Self::Decode {
            message: cause.to_string(),
        }
    }

    /// Returns `true` when the failure happened before any network call.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Validation(_))
    }
}
