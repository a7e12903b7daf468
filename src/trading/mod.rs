//! Simulated order execution
//! No routing, no balances: a trade is priced off the catalog and returned

use crate::catalog::Catalog;
use crate::models::{Side, TradeRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;

const TRADE_ID_LEN: usize = 12;
const TRADE_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Body of `POST /api/trade`. Everything is optional so that missing
/// fields produce our own 400 instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TradeRequest {
    pub crypto_id: Option<String>,
    pub action: Option<String>,
    /// JSON number or numeric string
    pub amount: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TradeError {
    #[error("Missing required fields: cryptoId, action, amount")]
    MissingFields,
    #[error("Action must be either BUY or SELL")]
    InvalidAction,
    #[error("Amount must be a positive number")]
    InvalidAmount,
    #[error("Cryptocurrency not found")]
    UnknownCurrency(String),
    #[error("Exchange API key is required. Please set it in Settings.")]
    ExchangeKeyMissing,
}

#[derive(Debug, Clone)]
pub struct TradeExecution {
    pub trade: TradeRecord,
    pub message: String,
}

/// Blank-only values count as missing; the value itself is used untrimmed.
fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.trim().is_empty())
}

fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

fn amount_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

pub fn generate_trade_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TRADE_ID_LEN)
        .map(|_| TRADE_ID_ALPHABET[rng.gen_range(0..TRADE_ID_ALPHABET.len())] as char)
        .collect()
}

/// Validation order: missing fields, action, amount, currency, exchange key.
pub fn execute_with<R: Rng + ?Sized>(
    catalog: &Catalog,
    exchange_key_set: bool,
    request: &TradeRequest,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<TradeExecution, TradeError> {
    let crypto_id = non_empty(&request.crypto_id);
    let action = non_empty(&request.action);
    let (Some(crypto_id), Some(action)) = (crypto_id, action) else {
        return Err(TradeError::MissingFields);
    };
    if !amount_present(&request.amount) {
        return Err(TradeError::MissingFields);
    }

    let side: Side = action.parse().map_err(|_| TradeError::InvalidAction)?;

    let amount = request
        .amount
        .as_ref()
        .and_then(parse_amount)
        .ok_or(TradeError::InvalidAmount)?;

    let currency = catalog
        .find(crypto_id)
        .ok_or_else(|| TradeError::UnknownCurrency(crypto_id.to_string()))?;

    if !exchange_key_set {
        return Err(TradeError::ExchangeKeyMissing);
    }

    let trade = TradeRecord {
        id: generate_trade_id(rng),
        crypto_id: currency.id.clone(),
        crypto_symbol: currency.symbol.clone(),
        action: side,
        amount,
        price: currency.price,
        total: currency.price * amount,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    Ok(TradeExecution {
        message: format!("{} order executed successfully", side),
        trade,
    })
}

pub fn execute(
    catalog: &Catalog,
    exchange_key_set: bool,
    request: &TradeRequest,
) -> Result<TradeExecution, TradeError> {
    execute_with(catalog, exchange_key_set, request, &mut rand::thread_rng(), Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn request(v: Value) -> TradeRequest {
        serde_json::from_value(v).unwrap()
    }

    fn run(v: Value, key_set: bool) -> Result<TradeExecution, TradeError> {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        execute_with(&Catalog::mock(), key_set, &request(v), &mut rng, now)
    }

    #[test]
    fn test_successful_trade() {
        let body = json!({"cryptoId": "solana", "action": "buy", "amount": 2.5});
        let exec = run(body, true).unwrap();
        let trade = exec.trade;

        assert_eq!(trade.crypto_id, "solana");
        assert_eq!(trade.crypto_symbol, "SOL");
        assert_eq!(trade.action, Side::Buy);
        assert_eq!(trade.amount, 2.5);
        assert_eq!(trade.price, 98.76);
        assert_eq!(trade.total, 98.76 * 2.5);
        assert_eq!(trade.timestamp, "2024-05-06T07:08:09.000Z");
        assert_eq!(trade.id.len(), 12);
        assert!(trade.id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(exec.message, "BUY order executed successfully");
    }

    #[test]
    fn test_amount_as_numeric_string() {
        let body = json!({"cryptoId": "bitcoin", "action": "SELL", "amount": " 0.5 "});
        let exec = run(body, true).unwrap();
        assert_eq!(exec.trade.amount, 0.5);
        assert_eq!(exec.trade.action, Side::Sell);
        assert_eq!(exec.message, "SELL order executed successfully");
    }

    #[test]
    fn test_missing_fields() {
        for body in [
            json!({}),
            json!({"action": "BUY", "amount": 1}),
            json!({"cryptoId": "bitcoin", "amount": 1}),
            json!({"cryptoId": "bitcoin", "action": "BUY"}),
            json!({"cryptoId": "", "action": "BUY", "amount": 1}),
            json!({"cryptoId": "bitcoin", "action": "BUY", "amount": null}),
        ] {
            let err = run(body.clone(), true).unwrap_err();
            assert_eq!(err, TradeError::MissingFields, "{}", body);
        }
    }

    #[test]
    fn test_invalid_action() {
        let body = json!({"cryptoId": "bitcoin", "action": "HOLD", "amount": 1});
        let err = run(body, true).unwrap_err();
        assert_eq!(err, TradeError::InvalidAction);
    }

    #[test]
    fn test_invalid_amount() {
        for amount in [json!(-5), json!(0), json!("abc"), json!("NaN"), json!("inf"), json!(true)] {
            let body = json!({"cryptoId": "bitcoin", "action": "BUY", "amount": amount});
            let err = run(body, true).unwrap_err();
            assert_eq!(err, TradeError::InvalidAmount, "amount {}", amount);
        }
    }

    #[test]
    fn test_unknown_currency() {
        let body = json!({"cryptoId": "dogecoin", "action": "BUY", "amount": 1});
        let err = run(body, true).unwrap_err();
        assert_eq!(err, TradeError::UnknownCurrency("dogecoin".to_string()));
    }

    #[test]
    fn test_crypto_id_and_action_are_not_trimmed() {
        let body = json!({"cryptoId": " bitcoin ", "action": "BUY", "amount": 1});
        let err = run(body, true).unwrap_err();
        assert_eq!(err, TradeError::UnknownCurrency(" bitcoin ".to_string()));

        let body = json!({"cryptoId": "bitcoin", "action": " BUY", "amount": 1});
        assert_eq!(run(body, true).unwrap_err(), TradeError::InvalidAction);

        let body = json!({"cryptoId": "   ", "action": "BUY", "amount": 1});
        assert_eq!(run(body, true).unwrap_err(), TradeError::MissingFields);
    }

    #[test]
    fn test_exchange_key_required() {
        let body = json!({"cryptoId": "bitcoin", "action": "BUY", "amount": 1});
        let err = run(body, false).unwrap_err();
        assert_eq!(err, TradeError::ExchangeKeyMissing);
    }

    #[test]
    fn test_input_errors_take_precedence_over_missing_key() {
        let body = json!({"cryptoId": "bitcoin", "action": "BUY", "amount": -5});
        let err = run(body, false).unwrap_err();
        assert_eq!(err, TradeError::InvalidAmount);
    }

    #[test]
    fn test_trade_ids_differ() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = generate_trade_id(&mut rng);
        let b = generate_trade_id(&mut rng);
        assert_ne!(a, b);
    }
}
