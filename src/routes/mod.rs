use crate::models::AppState;
use crate::AppError;
use axum::error_handling::HandleErrorLayer;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{BoxError, Json, Router};
use bytes::Bytes;
use http::{HeaderMap, Request, Response};
use serde::Serialize;
use std::time::Duration;
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::Any;
use tower_http::trace::TraceLayer;
use tracing::Span;

mod api_routes;

pub fn init(state: AppState, request_timeout: Duration) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<axum::body::Body>| {
            tracing::debug_span!("http-request", method = %request.method(), path = %request.uri().path())
        })
        .on_request(|request: &Request<axum::body::Body>, _span: &Span| {
            tracing::debug!("started {} {}", request.method(), request.uri().path())
        })
        .on_response(|response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            tracing::debug!("response {} generated in {:?}", response.status(), latency)
        })
        .on_body_chunk(|chunk: &Bytes, _latency: Duration, _span: &Span| {
            tracing::debug!("sending {} bytes", chunk.len())
        })
        .on_eos(|_trailers: Option<&HeaderMap>, stream_duration: Duration, _span: &Span| {
            tracing::debug!("stream closed after {:?}", stream_duration)
        })
        .on_failure(|error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
            tracing::error!("something went wrong: {error:?} latency: {latency:?}")
        });
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes::init(state))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(trace)
        .layer(cors)
}

async fn handle_timeout(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        tracing::error!("La petición excedió el tiempo de espera");
        AppError::Timeout
    } else {
        tracing::error!("Error no controlado en la capa de servicio: {err}");
        AppError::DbError(err.to_string())
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> impl IntoResponse {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
