//! Autorización por token compartido para las rutas de administración.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header::AUTHORIZATION;

use crate::models::AppState;
use crate::AppError;

/// Middleware that requires the admin token in the `Authorization` header:
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// A bare token without the `Bearer ` prefix is accepted as well.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(extract_token);
    let missing = token.map_or(true, str::is_empty);
    let authorized = token.is_some_and(|t| !t.is_empty() && token_matches(t, &state.admin_token));

    if authorized {
        return Ok(next.run(request).await);
    }
    let reason = if missing { "Petición sin token" } else { "Token inválido" };
    tracing::warn!("{reason} en {} {}", request.method(), request.uri().path());
    Err(AppError::Unauthorized)
}

fn extract_token(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header)
}

fn token_matches(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
