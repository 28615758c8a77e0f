//! # HTTP Errors
//!
//! Failures that end a request without rendering the list page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::schema::{SchemaError, SchemaErrorCode};
use crate::store::StoreError;

/// Result type for route handlers
pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Error)]
pub enum HttpError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("ID ausente")]
    MissingId,

    #[error("ID inválido")]
    InvalidId,

    #[error("Registro não encontrado")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Erro ao buscar dados")]
    Fetch(#[source] StoreError),

    #[error("Erro ao deletar registro")]
    Delete(#[source] StoreError),

    #[error("Erro ao buscar registro")]
    Lookup(#[source] StoreError),

    #[error("Erro ao renderizar página")]
    Render(#[from] minijinja::Error),

    #[error("Erro de configuração do schema")]
    Schema(#[source] SchemaError),
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::MissingId | HttpError::InvalidId => StatusCode::BAD_REQUEST,
            HttpError::NotFound => StatusCode::NOT_FOUND,
            HttpError::Fetch(_)
            | HttpError::Delete(_)
            | HttpError::Lookup(_)
            | HttpError::Render(_)
            | HttpError::Schema(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SchemaError> for HttpError {
    fn from(err: SchemaError) -> Self {
        match err.code() {
            SchemaErrorCode::InvalidKey => HttpError::InvalidId,
            _ => HttpError::Schema(err),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            match std::error::Error::source(&self) {
                Some(source) => tracing::error!(error = %source, "{}", self),
                None => tracing::error!("{}", self),
            }
        }
        (status, self.to_string()).into_response()
    }
}
