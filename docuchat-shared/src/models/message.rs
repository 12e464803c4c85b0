use serde::{Deserialize, Serialize};

/// Who a log entry is attributed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Bot,
    Error,
}

impl MessageRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::Error => "error",
        }
    }

    /// CSS class applied to the message wrapper.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "aibot",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn avatar(self) -> &'static str {
        match self {
            Self::User => "/static/user.jpeg",
            Self::Bot => "/static/Bot_logo.png",
            Self::Error => "/static/Error.png",
        }
    }
}

impl TryFrom<&str> for MessageRole {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, &'static str> {
        match value {
            "user" => Ok(Self::User),
            "bot" | "aibot" => Ok(Self::Bot),
            "error" => Ok(Self::Error),
            _ => Err("invalid message role"),
        }
    }
}

/// One entry in the message log. Never mutated once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub role: MessageRole,
}

impl Message {
    pub fn new(text: impl Into<String>, role: MessageRole) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, MessageRole::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, MessageRole::Bot)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, MessageRole::Error)
    }

    #[must_use]
    pub const fn avatar(&self) -> &'static str {
        self.role.avatar()
    }
}
