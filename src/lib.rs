// Core: mock catalog, settings merge/mask, simulated trades and forecasts
pub mod catalog;
pub mod error;
pub mod models;
pub mod prediction;
pub mod settings;
pub mod trading;

// HTTP server, config and logging backend
#[cfg(feature = "dashboard")]
pub mod api;

#[cfg(feature = "dashboard")]
pub mod utils;

pub use catalog::Catalog;
pub use error::ApiError;
pub use settings::{SettingsRecord, SettingsStore, SettingsUpdate};
