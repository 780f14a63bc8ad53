use thiserror::Error;

use crate::application::index::IndexError;
use crate::infra::content::ContentError;
use crate::infra::error::InfraError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("content loading failed: {0}")]
    Content(#[from] ContentError),
    #[error("index construction failed: {0}")]
    Index(#[from] IndexError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
