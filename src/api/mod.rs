//! REST surface of the dashboard
//! JSON endpoints live under `/api`, the page itself is served at `/`

pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::settings::SettingsStore;

#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub settings: SettingsStore,
}

impl AppState {
    pub fn new(catalog: Catalog, settings: SettingsStore) -> Self {
        Self {
            catalog: Arc::new(catalog),
            settings,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Catalog::mock(), SettingsStore::default())
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/cryptocurrencies", get(handlers::list_cryptocurrencies))
        .route("/cryptocurrencies/:id", get(handlers::get_cryptocurrency))
        .route("/predict/:id", get(handlers::get_prediction))
        .route("/market/overview", get(handlers::market_overview))
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/trade", post(handlers::execute_trade));

    Router::new()
        .route("/", get(handlers::index))
        .nest("/api", api)
        .with_state(state)
}
