use crate::payload::Payload;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
    Html,
}

impl ParseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Markdown => "Markdown",
            ParseMode::MarkdownV2 => "MarkdownV2",
            ParseMode::Html => "HTML",
        }
    }
}

impl Display for ParseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown parse mode `{0}`, expected one of Markdown, MarkdownV2, HTML")]
pub struct UnknownParseMode(pub String);

impl FromStr for ParseMode {
    type Err = UnknownParseMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" => Ok(ParseMode::Markdown),
            "markdownv2" => Ok(ParseMode::MarkdownV2),
            "html" => Ok(ParseMode::Html),
            _ => Err(UnknownParseMode(s.to_string())),
        }
    }
}

/// State shared by every message builder.
#[derive(Debug)]
pub struct MessageBase {
    pub(crate) payload: Payload,
    send_when: bool,
}

impl Default for MessageBase {
    fn default() -> Self {
        MessageBase {
            payload: Payload::default(),
            send_when: true,
        }
    }
}

/// Chainable setters common to all Telegram messages.
pub trait TelegramMessage: Sized {
    fn base(&self) -> &MessageBase;

    fn base_mut(&mut self) -> &mut MessageBase;

    /// Recipient chat id or `@channelusername`.
    #[must_use]
    fn to(mut self, chat_id: impl Into<String>) -> Self {
        self.base_mut().payload.set_text("chat_id", chat_id);
        self
    }

    #[must_use]
    fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.base_mut().payload.set_text("parse_mode", mode.as_str());
        self
    }

    /// Sends the text without any formatting.
    #[must_use]
    fn normal(mut self) -> Self {
        self.base_mut().payload.remove("parse_mode");
        self
    }

    /// Additional Bot API fields, e.g. `disable_notification`.
    #[must_use]
    fn options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in options {
            self.base_mut().payload.set_text(key, value);
        }
        self
    }

    #[must_use]
    fn send_when(mut self, condition: bool) -> Self {
        self.base_mut().send_when = condition;
        self
    }

    fn can_send(&self) -> bool {
        self.base().send_when
    }

    fn payload_value(&self, key: &str) -> Option<&str> {
        self.base().payload.text(key)
    }
}
