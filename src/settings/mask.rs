//! Redaction of credential-like strings for display

use serde::{Deserialize, Serialize};

/// Characters kept visible at each end of a long secret
const VISIBLE_EDGE: usize = 4;
const MASK_CHAR: char = '*';

/// Keeps the first and last four characters and stars the interior.
/// Secrets of eight characters or fewer are starred completely.
pub fn mask_api_key(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let len = chars.len();
    if len <= VISIBLE_EDGE * 2 {
        return MASK_CHAR.to_string().repeat(len);
    }

    let mut masked = String::with_capacity(secret.len());
    masked.extend(&chars[..VISIBLE_EDGE]);
    masked.extend(std::iter::repeat(MASK_CHAR).take(len - VISIBLE_EDGE * 2));
    masked.extend(&chars[len - VISIBLE_EDGE..]);
    masked
}

/// What a caller gets to see of a stored secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretView {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked_value: Option<String>,
}

impl SecretView {
    pub fn of(secret: &str) -> Self {
        if secret.is_empty() {
            Self {
                exists: false,
                masked_value: None,
            }
        } else {
            Self {
                exists: true,
                masked_value: Some(mask_api_key(secret)),
            }
        }
    }
}
