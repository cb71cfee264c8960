//! Currency and its deposit/withdraw networks

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::MinMax;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// Exchange id (`usdt`)
    pub id: String,
    /// Unified code (`USDT`)
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub active: bool,
    pub deposit: bool,
    pub withdraw: bool,
    /// Cheapest withdraw fee across networks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
    #[serde(default)]
    pub limits: CurrencyLimits,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub networks: HashMap<String, Network>,
    #[serde(default)]
    pub info: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyLimits {
    #[serde(default)]
    pub withdraw: MinMax,
    #[serde(default)]
    pub deposit: MinMax,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// HTX chain id, e.g. `trc20usdt`
    pub id: String,
    /// Display name, e.g. `TRC20`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub active: bool,
    pub deposit: bool,
    pub withdraw: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
    #[serde(default)]
    pub limits: CurrencyLimits,
    #[serde(default)]
    pub info: serde_json::Value,
}

impl Currency {
    /// Recomputes the aggregate flags and fee from `networks`
    pub fn aggregate_networks(&mut self) {
        if self.networks.is_empty() {
            return;
        }
        self.deposit = self.networks.values().any(|n| n.deposit);
        self.withdraw = self.networks.values().any(|n| n.withdraw);
        self.active = self.active && (self.deposit || self.withdraw);
        self.fee = self.networks.values().filter_map(|n| n.fee).min();
    }
}
