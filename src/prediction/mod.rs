//! Placeholder price forecasts
//! Random scaling of the current price, no model behind it

use crate::models::{CurrencyRecord, PredictionRecord};
use rand::Rng;
use std::ops::RangeInclusive;

pub const FORECAST_24H_FACTOR: RangeInclusive<f64> = 0.95..=1.05;
pub const FORECAST_7D_FACTOR: RangeInclusive<f64> = 0.90..=1.10;
pub const CONFIDENCE_RANGE: RangeInclusive<u32> = 70..=99;

pub fn predict_with<R: Rng + ?Sized>(currency: &CurrencyRecord, rng: &mut R) -> PredictionRecord {
    PredictionRecord {
        current_price: currency.price,
        forecast_24h: currency.price * rng.gen_range(FORECAST_24H_FACTOR),
        forecast_7d: currency.price * rng.gen_range(FORECAST_7D_FACTOR),
        confidence: rng.gen_range(CONFIDENCE_RANGE),
    }
}

/// Fresh random forecast on every call
pub fn predict(currency: &CurrencyRecord) -> PredictionRecord {
    predict_with(currency, &mut rand::thread_rng())
}
