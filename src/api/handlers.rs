use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::Html,
};
use chrono::Utc;
use serde_json::{Value, json};

use super::AppState;
use crate::catalog::MarketOverview;
use crate::error::ApiError;
use crate::models::{ApiResponse, CurrencyRecord, PredictionRecord, TradeRecord};
use crate::prediction;
use crate::settings::{MaskedSettings, SettingsUpdate};
use crate::trading::{self, TradeRequest};

const TEMPLATE_PATH: &str = "templates/dashboard.html";

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Frontend page. The file on disk wins so the page can be edited
/// without a rebuild.
pub async fn index() -> Html<String> {
    let html = tokio::fs::read_to_string(TEMPLATE_PATH)
        .await
        .unwrap_or_else(|_| include_str!("../../templates/dashboard.html").to_string());
    Html(html)
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "crypto-dashboard",
    }))
}

pub async fn list_cryptocurrencies(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<CurrencyRecord>>> {
    Json(ApiResponse::ok(state.catalog.all().to_vec()))
}

pub async fn get_cryptocurrency(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CurrencyRecord> {
    let currency = state.catalog.find(&id).ok_or_else(|| {
        log::warn!("Unknown currency requested: {}", id);
        ApiError::currency_not_found()
    })?;
    Ok(Json(ApiResponse::ok(currency.clone())))
}

pub async fn get_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PredictionRecord> {
    let currency = state.catalog.find(&id).ok_or_else(|| {
        log::warn!("Prediction requested for unknown currency: {}", id);
        ApiError::currency_not_found()
    })?;
    let prediction = prediction::predict(currency);
    log::debug!(
        "Prediction for {}: 24h={:.4}, 7d={:.4}, confidence={}",
        currency.symbol,
        prediction.forecast_24h,
        prediction.forecast_7d,
        prediction.confidence
    );
    Ok(Json(ApiResponse::ok(prediction)))
}

pub async fn market_overview(State(state): State<AppState>) -> Json<ApiResponse<MarketOverview>> {
    Json(ApiResponse::ok(state.catalog.overview(Utc::now())))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<ApiResponse<MaskedSettings>> {
    Json(ApiResponse::ok(state.settings.read().await))
}

pub async fn update_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> ApiResult<MaskedSettings> {
    let Json(update) = payload.map_err(|e| {
        log::warn!("Malformed settings update: {}", e.body_text());
        ApiError::from(e)
    })?;
    let settings = state.settings.update(&update).await?;
    Ok(Json(ApiResponse::with_message(settings, "Settings updated successfully")))
}

pub async fn execute_trade(
    State(state): State<AppState>,
    payload: Result<Json<TradeRequest>, JsonRejection>,
) -> ApiResult<TradeRecord> {
    let Json(request) = payload.map_err(|e| {
        log::warn!("Malformed trade request: {}", e.body_text());
        ApiError::from(e)
    })?;

    let exchange_key_set = state.settings.exchange_key_set().await;
    let execution = trading::execute(&state.catalog, exchange_key_set, &request).map_err(|e| {
        log::warn!("Trade rejected: {}", e);
        ApiError::from(e)
    })?;

    let trade = &execution.trade;
    log::info!(
        "Simulated {} {} {} @ {} = {} (id {})",
        trade.action,
        trade.amount,
        trade.crypto_symbol,
        trade.price,
        trade.total,
        trade.id
    );
    Ok(Json(ApiResponse::with_message(execution.trade, execution.message)))
}
