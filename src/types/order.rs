//! Orders and order requests

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Fee, Trade};
use crate::utils::iso8601;

/// 주문 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
    Expired,
    Rejected,
}

/// 주문 측면
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "buy" => Some(OrderSide::Buy),
            "sell" => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

/// 주문 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Limit,
    Market,
    /// 메이커 전용 지정가
    LimitMaker,
    StopLimit,
    StopMarket,
    TakeProfit,
    StopLoss,
}

impl OrderType {
    pub fn is_market(&self) -> bool {
        matches!(self, OrderType::Market | OrderType::StopMarket)
    }
}

/// 주문 유효 기간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    GTC,
    IOC,
    FOK,
    PO,
}

/// 주문 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trade_timestamp: Option<i64>,
    pub status: OrderStatus,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    pub side: OrderSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<Decimal>,
    /// 주문 수량 (현물은 기준 통화, 계약은 계약 수)
    pub amount: Decimal,
    #[serde(default)]
    pub filled: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trades: Vec<Trade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(default)]
    pub info: serde_json::Value,
}

impl Order {
    /// 새 주문 생성
    pub fn new(
        id: String,
        symbol: String,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
    ) -> Self {
        Self {
            id,
            client_order_id: None,
            timestamp: None,
            datetime: None,
            last_trade_timestamp: None,
            status: OrderStatus::Open,
            symbol,
            order_type,
            time_in_force: None,
            side,
            price: None,
            average: None,
            amount,
            filled: Decimal::ZERO,
            remaining: None,
            trigger_price: None,
            take_profit_price: None,
            stop_loss_price: None,
            cost: None,
            trades: Vec::new(),
            fee: None,
            reduce_only: None,
            post_only: None,
            info: serde_json::Value::Null,
        }
    }

    /// 타임스탬프 설정 (datetime 포함)
    pub fn with_timestamp(mut self, ts: Option<i64>) -> Self {
        self.timestamp = ts;
        self.datetime = ts.and_then(iso8601);
        self
    }

    /// amount, filled, cost 로 remaining / average 계산
    pub fn derive_fill_fields(&mut self) {
        if self.remaining.is_none() && !self.amount.is_zero() {
            self.remaining = Some((self.amount - self.filled).max(Decimal::ZERO));
        }
        if self.average.is_none() {
            if let Some(cost) = self.cost {
                if !self.filled.is_zero() && !cost.is_zero() {
                    self.average = Some(cost / self.filled);
                }
            }
        }
    }

    /// 미체결 여부
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }
}

/// 주문 요청
///
/// 주문 하나를 내는 데 필요한 값 전부
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    /// 거래소 전용 파라미터
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,
}

impl OrderRequest {
    pub fn new(symbol: &str, order_type: OrderType, side: OrderSide, amount: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            order_type,
            side,
            amount,
            price: None,
            stop_price: None,
            take_profit_price: None,
            stop_loss_price: None,
            client_order_id: None,
            time_in_force: None,
            reduce_only: None,
            post_only: None,
            params: None,
        }
    }

    /// 지정가 주문 요청
    pub fn limit(symbol: &str, side: OrderSide, amount: Decimal, price: Decimal) -> Self {
        Self::new(symbol, OrderType::Limit, side, amount).with_price(price)
    }

    /// 시장가 주문 요청
    pub fn market(symbol: &str, side: OrderSide, amount: Decimal) -> Self {
        Self::new(symbol, OrderType::Market, side, amount)
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// 트리거가 설정
    pub fn with_stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    /// 이익실현가 설정
    pub fn with_take_profit(mut self, price: Decimal) -> Self {
        self.take_profit_price = Some(price);
        self
    }

    /// 손절가 설정
    pub fn with_stop_loss(mut self, price: Decimal) -> Self {
        self.stop_loss_price = Some(price);
        self
    }

    pub fn with_client_order_id(mut self, id: &str) -> Self {
        self.client_order_id = Some(id.to_string());
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    pub fn with_reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = Some(reduce_only);
        self
    }

    /// 메이커 전용
    pub fn with_post_only(mut self, post_only: bool) -> Self {
        self.post_only = Some(post_only);
        self
    }

    /// 거래소 전용 추가 파라미터
    pub fn with_param(mut self, key: &str, value: serde_json::Value) -> Self {
        self.params
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value);
        self
    }

    pub fn is_post_only(&self) -> bool {
        self.post_only == Some(true)
            || self.time_in_force == Some(TimeInForce::PO)
            || self.order_type == OrderType::LimitMaker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_derive_fill_fields() {
        let mut order = Order::new(
            "1".into(),
            "BTC/USDT".into(),
            OrderType::Limit,
            OrderSide::Buy,
            dec!(2),
        );
        order.filled = dec!(0.5);
        order.cost = Some(dec!(15000));
        order.derive_fill_fields();
        assert_eq!(order.remaining, Some(dec!(1.5)));
        assert_eq!(order.average, Some(dec!(30000)));
    }

    #[test]
    fn test_request_builder() {
        let req = OrderRequest::limit("BTC/USDT:USDT", OrderSide::Sell, dec!(3), dec!(31000))
            .with_reduce_only(true)
            .with_param("marginMode", serde_json::json!("isolated"));
        assert_eq!(req.price, Some(dec!(31000)));
        assert_eq!(req.reduce_only, Some(true));
        assert!(req.params.as_ref().is_some_and(|p| p.contains_key("marginMode")));
        assert!(!req.is_post_only());
        assert!(req.with_time_in_force(TimeInForce::PO).is_post_only());
    }

    #[test]
    fn test_side_parse() {
        assert_eq!(OrderSide::parse("BUY"), Some(OrderSide::Buy));
        assert_eq!(OrderSide::parse("x"), None);
        assert_eq!(OrderSide::Sell.as_str(), "sell");
    }

    #[test]
    fn test_order_type_serde() {
        let json = serde_json::to_string(&OrderType::LimitMaker).unwrap_or_default();
        assert_eq!(json, "\"limit_maker\"");
    }
}
