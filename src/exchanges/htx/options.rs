//! Adapter options and per-call overrides

use serde_json::Value;
use std::collections::HashMap;

use super::dispatch::{OrderKind, Venue};
use crate::types::{MarginMode, MarketType, SubType};

/// Defaults applied when a call names no market
#[derive(Debug, Clone)]
pub struct HtxOptions {
    pub default_type: MarketType,
    pub default_sub_type: SubType,
    /// Margin mode for linear contracts and for `MarketType::Margin` spot calls
    pub default_margin_mode: MarginMode,
    /// Venues loaded by `fetch_markets`
    pub fetch_markets: Vec<Venue>,
    /// Spot market buys are sized in base units and converted to cost with the
    /// order price. When false, the amount of a market buy is the cost.
    pub create_market_buy_order_requires_price: bool,
    /// `lever_rate` of contract orders placed without one
    pub default_leverage: u32,
}

impl Default for HtxOptions {
    fn default() -> Self {
        Self {
            default_type: MarketType::Spot,
            default_sub_type: SubType::Linear,
            default_margin_mode: MarginMode::Cross,
            fetch_markets: Venue::ALL.to_vec(),
            create_market_buy_order_requires_price: true,
            default_leverage: 1,
        }
    }
}

impl HtxOptions {
    pub fn with_default_type(mut self, market_type: MarketType) -> Self {
        self.default_type = market_type;
        self
    }

    pub fn with_default_sub_type(mut self, sub_type: SubType) -> Self {
        self.default_sub_type = sub_type;
        self
    }

    pub fn with_default_margin_mode(mut self, margin_mode: MarginMode) -> Self {
        self.default_margin_mode = margin_mode;
        self
    }

    pub fn with_fetch_markets(mut self, venues: Vec<Venue>) -> Self {
        self.fetch_markets = venues;
        self
    }

    pub fn with_market_buy_requires_price(mut self, required: bool) -> Self {
        self.create_market_buy_order_requires_price = required;
        self
    }

    pub fn with_default_leverage(mut self, leverage: u32) -> Self {
        self.default_leverage = leverage;
        self
    }
}

/// Position effect of a contract order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Open,
    Close,
    /// One-way position mode
    Both,
}

impl Offset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Offset::Open => "open",
            Offset::Close => "close",
            Offset::Both => "both",
        }
    }
}

impl std::str::FromStr for Offset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Offset::Open),
            "close" => Ok(Offset::Close),
            "both" => Ok(Offset::Both),
            other => Err(format!("unknown offset: {other}")),
        }
    }
}

/// Typed per-call overrides. Unset fields fall back to the market, then to
/// [`HtxOptions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtxParams {
    pub market_type: Option<MarketType>,
    pub sub_type: Option<SubType>,
    pub margin_mode: Option<MarginMode>,
    pub kind: Option<OrderKind>,
    pub offset: Option<Offset>,
    pub leverage: Option<u32>,
    /// `gte` / `lte` trigger direction
    pub operator: Option<String>,
    pub client_order_id: Option<String>,
    pub account_id: Option<String>,
}

impl HtxParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn market_type(mut self, market_type: MarketType) -> Self {
        self.market_type = Some(market_type);
        self
    }

    pub fn sub_type(mut self, sub_type: SubType) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    pub fn margin_mode(mut self, margin_mode: MarginMode) -> Self {
        self.margin_mode = Some(margin_mode);
        self
    }

    pub fn kind(mut self, kind: OrderKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn offset(mut self, offset: Offset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn leverage(mut self, leverage: u32) -> Self {
        self.leverage = Some(leverage);
        self
    }

    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    pub fn account_id(mut self, id: impl Into<String>) -> Self {
        self.account_id = Some(id.into());
        self
    }

    /// Reads the overrides from loosely typed extras (e.g. `OrderRequest::params`).
    ///
    /// Unknown keys and unparsable values are ignored.
    pub fn from_extra(extra: &HashMap<String, Value>) -> Self {
        let get = |keys: &[&str]| keys.iter().find_map(|k| extra.get(*k).and_then(as_text));
        let flag = |key: &str| extra.get(key).and_then(Value::as_bool).unwrap_or(false);

        let kind = get(&["orderKind", "order_kind"])
            .and_then(|s| s.parse().ok())
            .or_else(|| {
                if flag("trigger") || flag("stop") {
                    Some(OrderKind::Trigger)
                } else if flag("tpsl") || flag("stopLossTakeProfit") {
                    Some(OrderKind::TpSl)
                } else {
                    None
                }
            });

        Self {
            market_type: get(&["type", "defaultType", "marketType"]).and_then(|s| s.parse().ok()),
            sub_type: get(&["subType", "sub_type", "defaultSubType"]).and_then(|s| s.parse().ok()),
            margin_mode: get(&["marginMode", "margin_mode"]).and_then(|s| s.parse().ok()),
            kind,
            offset: get(&["offset"]).and_then(|s| s.parse().ok()),
            leverage: get(&["leverRate", "lever_rate", "leverage"]).and_then(|s| s.parse().ok()),
            operator: get(&["operator"]),
            client_order_id: get(&["clientOrderId", "client-order-id", "client_order_id"]),
            account_id: get(&["account-id", "accountId", "account_id"]),
        }
    }

    /// Fields set here win over `other`
    pub fn or(self, other: HtxParams) -> Self {
        Self {
            market_type: self.market_type.or(other.market_type),
            sub_type: self.sub_type.or(other.sub_type),
            margin_mode: self.margin_mode.or(other.margin_mode),
            kind: self.kind.or(other.kind),
            offset: self.offset.or(other.offset),
            leverage: self.leverage.or(other.leverage),
            operator: self.operator.or(other.operator),
            client_order_id: self.client_order_id.or(other.client_order_id),
            account_id: self.account_id.or(other.account_id),
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extra(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = HtxOptions::default();
        assert_eq!(options.default_type, MarketType::Spot);
        assert_eq!(options.default_sub_type, SubType::Linear);
        assert_eq!(options.fetch_markets.len(), 4);
        assert!(options.create_market_buy_order_requires_price);
        assert_eq!(options.default_leverage, 1);
    }

    #[test]
    fn test_option_builders() {
        let options = HtxOptions::default()
            .with_default_type(MarketType::Swap)
            .with_default_sub_type(SubType::Inverse)
            .with_default_margin_mode(MarginMode::Isolated)
            .with_fetch_markets(vec![Venue::Spot])
            .with_market_buy_requires_price(false)
            .with_default_leverage(10);
        assert_eq!(options.default_type, MarketType::Swap);
        assert_eq!(options.default_sub_type, SubType::Inverse);
        assert_eq!(options.default_margin_mode, MarginMode::Isolated);
        assert_eq!(options.fetch_markets, vec![Venue::Spot]);
        assert!(!options.create_market_buy_order_requires_price);
        assert_eq!(options.default_leverage, 10);
    }

    #[test]
    fn test_from_extra_fallback_keys() {
        let params = HtxParams::from_extra(&extra(json!({
            "margin_mode": "isolated",
            "lever_rate": 20,
            "offset": "close",
            "client-order-id": "abc",
            "type": "swap",
            "subType": "inverse",
        })));
        assert_eq!(params.margin_mode, Some(MarginMode::Isolated));
        assert_eq!(params.leverage, Some(20));
        assert_eq!(params.offset, Some(Offset::Close));
        assert_eq!(params.client_order_id.as_deref(), Some("abc"));
        assert_eq!(params.market_type, Some(MarketType::Swap));
        assert_eq!(params.sub_type, Some(SubType::Inverse));
        assert_eq!(params.kind, None);
    }

    #[test]
    fn test_from_extra_order_kind() {
        let trigger = HtxParams::from_extra(&extra(json!({"trigger": true, "operator": "lte"})));
        assert_eq!(trigger.kind, Some(OrderKind::Trigger));
        assert_eq!(trigger.operator.as_deref(), Some("lte"));

        let tpsl = HtxParams::from_extra(&extra(json!({"orderKind": "tpsl"})));
        assert_eq!(tpsl.kind, Some(OrderKind::TpSl));

        let ignored = HtxParams::from_extra(&extra(json!({"marginMode": "bogus", "leverage": "x"})));
        assert_eq!(ignored, HtxParams::default());
    }

    #[test]
    fn test_or_prefers_self() {
        let merged = HtxParams::new()
            .margin_mode(MarginMode::Isolated)
            .or(HtxParams::new().margin_mode(MarginMode::Cross).leverage(5));
        assert_eq!(merged.margin_mode, Some(MarginMode::Isolated));
        assert_eq!(merged.leverage, Some(5));
    }
}
