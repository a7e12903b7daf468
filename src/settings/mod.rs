//! Trading settings: partial-update merge with range validation,
//! and the masked view handed out to API callers

pub mod mask;
pub mod store;

pub use mask::{SecretView, mask_api_key};
pub use store::SettingsStore;

use crate::models::Market;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::RangeInclusive;

pub const RISK_PERCENTAGE_RANGE: RangeInclusive<f64> = 0.1..=100.0;
pub const MAX_TRADES_PER_DAY_RANGE: RangeInclusive<i64> = 1..=100;
pub const DEFAULT_LEVERAGE_RANGE: RangeInclusive<f64> = 1.0..=100.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Risk percentage must be between 0.1 and 100")]
    RiskPercentage,
    #[error("Max trades per day must be a whole number between 1 and 100")]
    MaxTradesPerDay,
    #[error("Default leverage must be between 1 and 100")]
    DefaultLeverage,
    #[error("Preferred market must be either SPOT or FUTURES")]
    PreferredMarket,
}

impl SettingsError {
    /// JSON name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            SettingsError::RiskPercentage => "riskPercentage",
            SettingsError::MaxTradesPerDay => "maxTradesPerDay",
            SettingsError::DefaultLeverage => "defaultLeverage",
            SettingsError::PreferredMarket => "preferredMarket",
        }
    }
}

#[derive(Clone, Default, PartialEq)]
pub struct ApiKeys {
    /// Blockchain data provider key
    pub blockchain: String,
    /// Exchange key, required for trading
    pub exchange: String,
}

// Never print raw keys, not even in debug logs
impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("blockchain", &mask_api_key(&self.blockchain))
            .field("exchange", &mask_api_key(&self.exchange))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsRecord {
    pub risk_percentage: f64,
    pub max_trades_per_day: u32,
    pub default_leverage: f64,
    pub preferred_market: Market,
    pub api_keys: ApiKeys,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            risk_percentage: 1.0,
            max_trades_per_day: 5,
            default_leverage: 1.0,
            preferred_market: Market::Spot,
            api_keys: ApiKeys::default(),
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiKeysUpdate {
    pub blockchain: Option<String>,
    pub exchange: Option<String>,
}

impl fmt::Debug for ApiKeysUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeysUpdate")
            .field("blockchain", &self.blockchain.as_deref().map(mask_api_key))
            .field("exchange", &self.exchange.as_deref().map(mask_api_key))
            .finish()
    }
}

/// Partial update as sent by `PUT /api/settings`.
/// Absent fields stay untouched; unknown fields are ignored by serde.
/// The numeric/enum fields are kept as raw JSON so that a wrong type or an
/// explicit `null` is reported by `validate()` against that field, instead
/// of failing the whole body (and dropping the secrets sent with it).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(deserialize_with = "present")]
    pub risk_percentage: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub max_trades_per_day: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub default_leverage: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub preferred_market: Option<Value>,
    pub api_keys: Option<ApiKeysUpdate>,
}

// Only called for keys that appear in the body, so `null` becomes `Some(Null)`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn as_whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Numeric/enum part of an update that passed every range check
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValidatedChanges {
    pub risk_percentage: Option<f64>,
    pub max_trades_per_day: Option<u32>,
    pub default_leverage: Option<f64>,
    pub preferred_market: Option<Market>,
}

impl SettingsUpdate {
    /// Checks all four numeric/enum fields. Nothing is applied here,
    /// so a failure on any field leaves the record untouched.
    /// A present field of the wrong type (including `null`) fails like
    /// an out-of-range value.
    pub fn validate(&self) -> Result<ValidatedChanges, SettingsError> {
        let mut changes = ValidatedChanges::default();

        if let Some(value) = &self.risk_percentage {
            let risk = value
                .as_f64()
                .filter(|v| RISK_PERCENTAGE_RANGE.contains(v))
                .ok_or(SettingsError::RiskPercentage)?;
            changes.risk_percentage = Some(risk);
        }

        if let Some(value) = &self.max_trades_per_day {
            let trades = as_whole_number(value)
                .filter(|v| MAX_TRADES_PER_DAY_RANGE.contains(v))
                .ok_or(SettingsError::MaxTradesPerDay)?;
            changes.max_trades_per_day = Some(trades as u32);
        }

        if let Some(value) = &self.default_leverage {
            let leverage = value
                .as_f64()
                .filter(|v| DEFAULT_LEVERAGE_RANGE.contains(v))
                .ok_or(SettingsError::DefaultLeverage)?;
            changes.default_leverage = Some(leverage);
        }

        if let Some(value) = &self.preferred_market {
            let market = value
                .as_str()
                .and_then(|s| s.parse::<Market>().ok())
                .ok_or(SettingsError::PreferredMarket)?;
            changes.preferred_market = Some(market);
        }

        Ok(changes)
    }

    pub fn touches_secrets(&self) -> bool {
        self.api_keys
            .as_ref()
            .map(|k| {
                k.blockchain.as_deref().is_some_and(|s| !s.is_empty())
                    || k.exchange.as_deref().is_some_and(|s| !s.is_empty())
            })
            .unwrap_or(false)
    }
}

impl ValidatedChanges {
    pub fn apply_to(&self, record: &mut SettingsRecord) {
        if let Some(v) = self.risk_percentage {
            record.risk_percentage = v;
        }
        if let Some(v) = self.max_trades_per_day {
            record.max_trades_per_day = v;
        }
        if let Some(v) = self.default_leverage {
            record.default_leverage = v;
        }
        if let Some(v) = self.preferred_market {
            record.preferred_market = v;
        }
    }
}

impl SettingsRecord {
    /// Defaults with `seed` merged on top. Used for startup configuration.
    pub fn from_seed(seed: &SettingsUpdate) -> Result<Self, SettingsError> {
        let mut record = Self::default();
        record.merge(seed)?;
        Ok(record)
    }

    /// Non-empty secrets are stored as given; empty strings keep the old value.
    pub fn apply_secrets(&mut self, update: &SettingsUpdate) {
        let Some(keys) = &update.api_keys else {
            return;
        };
        if let Some(v) = keys.blockchain.as_deref().filter(|s| !s.is_empty()) {
            self.api_keys.blockchain = v.to_string();
        }
        if let Some(v) = keys.exchange.as_deref().filter(|s| !s.is_empty()) {
            self.api_keys.exchange = v.to_string();
        }
    }

    /// Secrets are applied first and independently of validation.
    /// The numeric/enum fields go in all together or not at all.
    pub fn merge(&mut self, update: &SettingsUpdate) -> Result<(), SettingsError> {
        self.apply_secrets(update);
        let changes = update.validate()?;
        changes.apply_to(self);
        Ok(())
    }

    pub fn exchange_key_set(&self) -> bool {
        !self.api_keys.exchange.is_empty()
    }

    pub fn masked(&self) -> MaskedSettings {
        MaskedSettings {
            risk_percentage: self.risk_percentage,
            max_trades_per_day: self.max_trades_per_day,
            default_leverage: self.default_leverage,
            preferred_market: self.preferred_market,
            api_keys: MaskedApiKeys {
                blockchain: SecretView::of(&self.api_keys.blockchain),
                exchange: SecretView::of(&self.api_keys.exchange),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedApiKeys {
    pub blockchain: SecretView,
    pub exchange: SecretView,
}

/// Settings as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedSettings {
    pub risk_percentage: f64,
    pub max_trades_per_day: u32,
    pub default_leverage: f64,
    pub preferred_market: Market,
    pub api_keys: MaskedApiKeys,
}
