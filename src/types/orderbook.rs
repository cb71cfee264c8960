//! Order book snapshot

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::iso8601;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datetime: Option<String>,
    /// 매수 호가 (높은 가격 순)
    #[serde(default)]
    pub bids: Vec<OrderBookEntry>,
    /// 매도 호가 (낮은 가격 순)
    #[serde(default)]
    pub asks: Vec<OrderBookEntry>,
    /// Exchange sequence number (`version` / `mrid`)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nonce: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub price: Decimal,
    pub amount: Decimal,
}

impl OrderBookEntry {
    pub fn new(price: Decimal, amount: Decimal) -> Self {
        Self { price, amount }
    }
}

impl OrderBook {
    pub fn new(symbol: String) -> Self {
        Self {
            symbol,
            ..Default::default()
        }
    }

    pub fn with_timestamp(mut self, ts: Option<i64>) -> Self {
        self.timestamp = ts;
        self.datetime = ts.and_then(iso8601);
        self
    }

    /// 양쪽 호가 정렬
    pub fn sort(&mut self) {
        self.bids.sort_by(|a, b| b.price.cmp(&a.price));
        self.asks.sort_by(|a, b| a.price.cmp(&b.price));
    }

    pub fn limit_depth(&mut self, depth: usize) {
        self.bids.truncate(depth);
        self.asks.truncate(depth);
    }

    pub fn best_bid(&self) -> Option<&OrderBookEntry> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&OrderBookEntry> {
        self.asks.first()
    }

    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sort_and_limit() {
        let mut ob = OrderBook::new("BTC/USDT".into());
        ob.bids = vec![
            OrderBookEntry::new(dec!(99), dec!(1)),
            OrderBookEntry::new(dec!(100), dec!(2)),
            OrderBookEntry::new(dec!(98), dec!(3)),
        ];
        ob.asks = vec![
            OrderBookEntry::new(dec!(102), dec!(1)),
            OrderBookEntry::new(dec!(101), dec!(1)),
        ];
        ob.sort();
        assert_eq!(ob.best_bid().map(|e| e.price), Some(dec!(100)));
        assert_eq!(ob.best_ask().map(|e| e.price), Some(dec!(101)));
        assert_eq!(ob.spread(), Some(dec!(1)));

        ob.limit_depth(1);
        assert_eq!(ob.bids.len(), 1);
        assert_eq!(ob.asks.len(), 1);
    }
}
