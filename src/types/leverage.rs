//! Leverage settings and maintenance-margin brackets

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MarginMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leverage {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_mode: Option<MarginMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_leverage: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_leverage: Option<Decimal>,
    #[serde(default)]
    pub info: Value,
}

/// One maintenance-margin bracket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverageTier {
    pub tier: u32,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_notional: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_notional: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_margin_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_leverage: Option<Decimal>,
    #[serde(default)]
    pub info: Value,
}
