//! Public liquidation events

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::OrderSide;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liquidation {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contracts: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_value: Option<Decimal>,
    /// Side of the liquidation order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
    #[serde(default)]
    pub info: Value,
}
