//! Builders for Telegram file and poll notifications.
//!
//! A message is assembled with chained setters and handed to a [`Sender`],
//! which owns the actual Bot API transport. Files given as a `file_id` or URL
//! travel as plain fields; local files, bytes and streams are uploaded as a
//! multipart request.
//!
//! ```
//! use telegram_notify::{TelegramFile, TelegramMessage};
//!
//! let params = TelegramFile::new("Nightly build")
//!     .to("@builds")
//!     .photo("https://example.com/status.png")
//!     .serialize()
//!     .unwrap();
//!
//! assert_eq!(params.get("photo"), Some("https://example.com/status.png"));
//! ```

mod error;
mod file;
mod message;
mod payload;
mod poll;
mod render;
mod sender;

pub use error::{Error, Result};
pub use file::{FileKind, FileSource, TelegramFile, UnknownFileKind};
pub use message::{MessageBase, ParseMode, TelegramMessage, UnknownParseMode};
pub use payload::{Contents, Fields, Params, Part};
pub use poll::TelegramPoll;
pub use render::{RenderError, Renderer};
pub use sender::{Response, SendFailure, Sender};
