//! Funding rates and funding payments

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRate {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_price: Option<Decimal>,
    /// Settlement time of the current rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_funding_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_funding_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_funding_rate: Option<Decimal>,
    /// e.g. `8h`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default)]
    pub info: Value,
}

/// Past rate of a swap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateHistory {
    pub symbol: String,
    pub funding_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default)]
    pub info: Value,
}

/// Funding fee paid or received by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub symbol: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    /// Positive when received
    pub amount: Decimal,
    #[serde(default)]
    pub info: Value,
}
