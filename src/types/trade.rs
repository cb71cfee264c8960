//! Trade - public or private fill

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Fee;
use crate::utils::iso8601;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 체결을 만든 주문 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    pub symbol: String,
    /// Order type of the originating order (`limit`, `market`, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub trade_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taker_or_maker: Option<TakerOrMaker>,
    pub price: Decimal,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,
    #[serde(default)]
    pub info: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TakerOrMaker {
    Taker,
    Maker,
}

impl TakerOrMaker {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "taker" => Some(TakerOrMaker::Taker),
            "maker" => Some(TakerOrMaker::Maker),
            _ => None,
        }
    }
}

impl Trade {
    pub fn new(symbol: String, price: Decimal, amount: Decimal) -> Self {
        Self {
            id: None,
            order: None,
            timestamp: None,
            datetime: None,
            symbol,
            trade_type: None,
            side: None,
            taker_or_maker: None,
            price,
            amount,
            cost: None,
            fee: None,
            info: serde_json::Value::Null,
        }
    }

    pub fn with_timestamp(mut self, ts: Option<i64>) -> Self {
        self.timestamp = ts;
        self.datetime = ts.and_then(iso8601);
        self
    }

    pub fn is_buy(&self) -> bool {
        self.side.as_deref() == Some("buy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade() {
        let trade = Trade {
            side: Some("buy".into()),
            ..Trade::new("BTC/USDT".into(), dec!(30000), dec!(0.1))
        }
        .with_timestamp(Some(1700000000000));

        assert!(trade.is_buy());
        assert!(trade.datetime.is_some());
        assert_eq!(trade.cost, None);
    }

    #[test]
    fn test_taker_or_maker() {
        assert_eq!(TakerOrMaker::parse("Taker"), Some(TakerOrMaker::Taker));
        assert_eq!(TakerOrMaker::parse("maker"), Some(TakerOrMaker::Maker));
        assert_eq!(TakerOrMaker::parse("other"), None);
    }
}
