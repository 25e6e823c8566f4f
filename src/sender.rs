use crate::{
    file::FileKind,
    payload::{Fields, Params},
};
use thiserror::Error;

/// Decoded body of a successful Bot API call.
pub type Response = serde_json::Value;

/// Failure reported by a [`Sender`]; passed through to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendFailure {
    #[error("Telegram responded with an error `{code} - {description}`")]
    Api { code: u16, description: String },

    #[error("The communication with Telegram failed: {0}")]
    Communication(String),

    #[error("Telegram bot token was not provided")]
    MissingToken,
}

/// Transport that delivers finished payloads to the Bot API.
///
/// Implementations own authentication, HTTP and retries. Builders only hand
/// over wire-ready parameters.
pub trait Sender {
    /// `multipart` is set whenever `params` carries raw file contents.
    fn send_file(
        &self,
        params: Params,
        kind: FileKind,
        multipart: bool,
    ) -> Result<Response, SendFailure>;

    fn send_poll(&self, params: Fields) -> Result<Response, SendFailure>;
}
