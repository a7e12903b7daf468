//! HTTP-facing error type
//! Domain errors convert into it; the dashboard feature renders it as
//! `{success: false, message, field?}` with the matching status code

use crate::settings::SettingsError;
use crate::trading::TradeError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Validation { field: &'static str, message: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
}

impl ApiError {
    pub fn currency_not_found() -> Self {
        ApiError::NotFound("Cryptocurrency not found".to_string())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation { .. } => 400,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ApiError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(e: SettingsError) -> Self {
        ApiError::Validation {
            field: e.field(),
            message: e.to_string(),
        }
    }
}

impl From<TradeError> for ApiError {
    fn from(e: TradeError) -> Self {
        match e {
            TradeError::MissingFields | TradeError::InvalidAction | TradeError::InvalidAmount => {
                ApiError::BadRequest(e.to_string())
            }
            TradeError::UnknownCurrency(_) => ApiError::NotFound(e.to_string()),
            TradeError::ExchangeKeyMissing => ApiError::Forbidden(e.to_string()),
        }
    }
}

#[cfg(feature = "dashboard")]
mod response {
    use super::ApiError;
    use axum::{
        Json,
        extract::rejection::JsonRejection,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde_json::json;

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let status =
                StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
            let mut body = json!({
                "success": false,
                "message": self.to_string(),
            });
            if let Some(field) = self.field() {
                body["field"] = json!(field);
            }
            (status, Json(body)).into_response()
        }
    }

    // Bad JSON, wrong content type, wrong field types: all plain 400s
    impl From<JsonRejection> for ApiError {
        fn from(rejection: JsonRejection) -> Self {
            ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_error_status_mapping() {
        assert_eq!(ApiError::from(TradeError::MissingFields).status_code(), 400);
        assert_eq!(ApiError::from(TradeError::InvalidAction).status_code(), 400);
        assert_eq!(ApiError::from(TradeError::InvalidAmount).status_code(), 400);
        assert_eq!(
            ApiError::from(TradeError::UnknownCurrency("x".into())).status_code(),
            404
        );
        assert_eq!(ApiError::from(TradeError::ExchangeKeyMissing).status_code(), 403);
    }

    #[test]
    fn test_settings_error_keeps_field() {
        let e = ApiError::from(SettingsError::RiskPercentage);
        assert_eq!(e.status_code(), 400);
        assert_eq!(e.field(), Some("riskPercentage"));
        assert_eq!(e.to_string(), "Risk percentage must be between 0.1 and 100");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::currency_not_found().to_string(), "Cryptocurrency not found");
    }
}
