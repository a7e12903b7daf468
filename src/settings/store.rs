//! Process-wide settings holder
//! All access goes through read (masked) and update (merge); the raw
//! record never leaves this module

use super::{MaskedSettings, SettingsError, SettingsRecord, SettingsUpdate};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<SettingsRecord>>,
}

impl SettingsStore {
    pub fn new(record: SettingsRecord) -> Self {
        Self {
            inner: Arc::new(RwLock::new(record)),
        }
    }

    pub async fn read(&self) -> MaskedSettings {
        self.inner.read().await.masked()
    }

    /// Validate-and-apply runs under one write lock, so concurrent
    /// updates are serialized and never observed half-applied.
    pub async fn update(&self, update: &SettingsUpdate) -> Result<MaskedSettings, SettingsError> {
        let mut record = self.inner.write().await;
        let result = record.merge(update);

        if update.touches_secrets() {
            log::info!("API keys updated: {:?}", record.api_keys);
        }

        match result {
            Ok(()) => {
                log::info!(
                    "Settings updated: risk={}%, max_trades={}, leverage={}x, market={}",
                    record.risk_percentage,
                    record.max_trades_per_day,
                    record.default_leverage,
                    record.preferred_market.as_str()
                );
                Ok(record.masked())
            }
            Err(e) => {
                log::warn!("Settings update rejected ({}): {}", e.field(), e);
                Err(e)
            }
        }
    }

    pub async fn exchange_key_set(&self) -> bool {
        self.inner.read().await.exchange_key_set()
    }
}
