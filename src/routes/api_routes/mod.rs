use crate::auth::require_admin;
use crate::models::AppState;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

mod rates;

/// `GET /rates` es público; registrar y consultar el historial requieren token.
pub fn init(state: AppState) -> Router {
    let admin = middleware::from_fn_with_state(state.clone(), require_admin);
    Router::new()
        .route(
            "/rates",
            get(rates::latest_rate).merge(post(rates::create_rate).route_layer(admin.clone())),
        )
        .route(
            "/rates/history",
            get(rates::rate_history).route_layer(admin),
        )
        .with_state(state)
}
