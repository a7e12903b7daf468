//! Static currency catalog
//! Read-only list of mock prices, shared across handlers behind an Arc

use crate::models::CurrencyRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<CurrencyRecord>,
}

/// Snapshot of the whole catalog keyed by symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    pub prices: BTreeMap<String, f64>,
    pub change24h: BTreeMap<String, f64>,
    pub timestamp: i64,
}

impl Catalog {
    pub fn new(records: Vec<CurrencyRecord>) -> Self {
        Self { records }
    }

    /// The five mock listings served by the demo backend
    pub fn mock() -> Self {
        Self::new(vec![
            CurrencyRecord::new("bitcoin", "Bitcoin", "BTC", 51234.56, 2.34),
            CurrencyRecord::new("ethereum", "Ethereum", "ETH", 2789.12, -1.45),
            CurrencyRecord::new("cardano", "Cardano", "ADA", 1.23, 5.67),
            CurrencyRecord::new("solana", "Solana", "SOL", 98.76, 3.21),
            CurrencyRecord::new("ripple", "Ripple", "XRP", 0.54, -0.87),
        ])
    }

    pub fn all(&self) -> &[CurrencyRecord] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&CurrencyRecord> {
        self.records.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn overview(&self, now: DateTime<Utc>) -> MarketOverview {
        let mut prices = BTreeMap::new();
        let mut change24h = BTreeMap::new();
        for c in &self.records {
            prices.insert(c.symbol.clone(), c.price);
            change24h.insert(c.symbol.clone(), c.change24h);
        }
        MarketOverview {
            prices,
            change24h,
            timestamp: now.timestamp_millis(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::mock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mock_catalog_has_five_unique_ids() {
        let catalog = Catalog::mock();
        assert_eq!(catalog.len(), 5);
        let mut ids: Vec<_> = catalog.all().iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_find() {
        let catalog = Catalog::mock();
        let btc = catalog.find("bitcoin").unwrap();
        assert_eq!(btc.symbol, "BTC");
        assert!((btc.price - 51234.56).abs() < 1e-9);
        assert!(catalog.find("dogecoin").is_none());
        // ids are case-sensitive
        assert!(catalog.find("Bitcoin").is_none());
    }

    #[test]
    fn test_overview() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let overview = Catalog::mock().overview(now);
        assert_eq!(overview.prices.len(), 5);
        assert_eq!(overview.prices["ETH"], 2789.12);
        assert_eq!(overview.change24h["XRP"], -0.87);
        assert_eq!(overview.timestamp, now.timestamp_millis());
        let symbols: Vec<_> = overview.prices.keys().cloned().collect();
        assert_eq!(symbols, vec!["ADA", "BTC", "ETH", "SOL", "XRP"]);
    }
}
