use crate::models::{
    AppState, CreatedRateDTO, HistoryEntryDTO, NewRate, RateDTO, RateInput, INVALID_BODY,
};
use crate::storage::HISTORY_LIMIT;
use crate::AppError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::Value;

pub(super) async fn latest_rate(State(state): State<AppState>) -> impl IntoResponse {
    match state.rate_storage.latest().await {
        Ok(Some(rate)) => (StatusCode::OK, Json(RateDTO::from_record(&rate))).into_response(),
        Ok(None) => (StatusCode::OK, Json(RateDTO::fallback())).into_response(),
        Err(e) => {
            tracing::error!("Error al obtener tasas: {e}");
            AppError::Store("Error al obtener datos").into_response()
        }
    }
}

pub(super) async fn create_rate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreatedRateDTO>, AppError> {
    let Json(body) = payload.map_err(|e| {
        tracing::warn!("Cuerpo inválido en POST /api/rates: {e}");
        AppError::Validation(INVALID_BODY)
    })?;
    let rate = RateInput::try_from(body)
        .and_then(NewRate::try_from)
        .inspect_err(|e| tracing::warn!("Tipo de cambio rechazado: {e}"))?;
    state.rate_storage.insert(rate).await.map_err(|e| {
        tracing::error!("Error al guardar tasa: {e}");
        AppError::Store("Error al guardar datos")
    })?;
    Ok(Json(CreatedRateDTO {
        success: true,
        data: RateDTO::from_new(&rate, chrono::Local::now()),
    }))
}

pub(super) async fn rate_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntryDTO>>, AppError> {
    let history = state.rate_storage.history(HISTORY_LIMIT).await.map_err(|e| {
        tracing::error!("Error al obtener historial: {e}");
        AppError::Store("Error al obtener historial")
    })?;
    Ok(Json(history.iter().map(HistoryEntryDTO::from).collect()))
}
