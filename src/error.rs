use std::{error::Error, fmt::Display};

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;

pub const UNAUTHORIZED_MESSAGE: &str = "No autorizado. Token requerido o inválido.";
pub const TIMEOUT_MESSAGE: &str = "Tiempo de espera agotado";
const INTERNAL_MESSAGE: &str = "Error interno del servidor";

#[derive(Debug, Serialize)]
pub enum AppError {
    /// Entrada inválida del cliente
    Validation(&'static str),
    Unauthorized,
    /// Falla del almacén con el mensaje público del endpoint
    Store(&'static str),
    /// La petición superó `REQUEST_TIMEOUT_SECS`
    Timeout,
    DbError(String),
}

pub type Result<T> = core::result::Result<T, AppError>;
impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg) | AppError::Store(msg) => write!(f, "{msg}"),
            AppError::Unauthorized => write!(f, "{UNAUTHORIZED_MESSAGE}"),
            AppError::Timeout => write!(f, "{TIMEOUT_MESSAGE}"),
            AppError::DbError(e) => write!(f, "database error: {e}"),
        }
    }
}
impl Error for AppError {}
impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        Self::DbError(value.to_string())
    }
}
impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Self::DbError(value.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Store(_) | AppError::Timeout | AppError::DbError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error = match &self {
            AppError::DbError(e) => {
                tracing::error!("Error de base de datos sin contexto: {e}");
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(ErrorBody { error })).into_response()
    }
}
