use crate::{render::RenderError, sender::SendFailure};
use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not read attachment `{}`: {source}", .path.display())]
    ReadAttachment { path: PathBuf, source: io::Error },

    #[error("Could not read attachment stream: {0}")]
    ReadStream(#[source] io::Error),

    #[error("Could not render template: {0}")]
    Render(#[source] RenderError),

    #[error(transparent)]
    Send(#[from] SendFailure),
}
