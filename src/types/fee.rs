//! Fees: per-trade fee, trading fee schedule, deposit/withdraw fees, exchange status

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fee charged on a trade, order or transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
}

impl Fee {
    pub fn new(cost: Decimal, currency: Option<String>) -> Self {
        Self {
            cost: Some(cost),
            currency,
            rate: None,
        }
    }
}

/// Maker/taker rates of one market
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingFee {
    pub symbol: String,
    pub maker: Decimal,
    pub taker: Decimal,
    #[serde(default)]
    pub percentage: bool,
    #[serde(default)]
    pub tier_based: bool,
    #[serde(default)]
    pub info: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    /// `fee` is a rate instead of an absolute amount
    #[serde(default)]
    pub percentage: bool,
}

impl FeeInfo {
    pub fn fixed(fee: Option<Decimal>) -> Self {
        Self {
            fee,
            percentage: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFee {
    pub network: String,
    #[serde(default)]
    pub deposit: FeeInfo,
    #[serde(default)]
    pub withdraw: FeeInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositWithdrawFee {
    pub currency: String,
    /// Single-network shortcut: set when the currency has exactly one chain
    #[serde(default)]
    pub deposit: FeeInfo,
    #[serde(default)]
    pub withdraw: FeeInfo,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub networks: HashMap<String, NetworkFee>,
    #[serde(default)]
    pub info: serde_json::Value,
}

impl DepositWithdrawFee {
    pub fn withdraw_fee(&self, network: Option<&str>) -> Option<Decimal> {
        match network {
            Some(n) => self.networks.get(n).and_then(|nf| nf.withdraw.fee),
            None => self.withdraw.fee,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeStatus {
    /// `ok` or `maintenance`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub info: serde_json::Value,
}
