//! Account balances

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::iso8601;

/// 통화별 잔고
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(flatten)]
    pub currencies: HashMap<String, Balance>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub info: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    /// 차입금 + 이자 (마진 계좌)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt: Option<Decimal>,
}

impl Balances {
    pub fn new(timestamp: Option<i64>) -> Self {
        Self {
            timestamp,
            datetime: timestamp.and_then(iso8601),
            ..Default::default()
        }
    }

    /// `code` 항목, 없으면 빈 항목 생성
    pub fn entry(&mut self, code: impl Into<String>) -> &mut Balance {
        self.currencies.entry(code.into()).or_default()
    }

    pub fn add(&mut self, code: impl Into<String>, balance: Balance) {
        self.currencies.insert(code.into(), balance);
    }

    pub fn get(&self, code: &str) -> Option<&Balance> {
        self.currencies.get(code)
    }

    pub fn free(&self, code: &str) -> Option<Decimal> {
        self.get(code).and_then(|b| b.free)
    }

    pub fn used(&self, code: &str) -> Option<Decimal> {
        self.get(code).and_then(|b| b.used)
    }

    pub fn total(&self, code: &str) -> Option<Decimal> {
        self.get(code).and_then(|b| b.total)
    }

    /// free / used / total 중 빠진 값 계산
    pub fn settle_totals(&mut self) {
        for balance in self.currencies.values_mut() {
            balance.settle_total();
        }
    }
}

impl Balance {
    pub fn new(free: Decimal, used: Decimal) -> Self {
        Self {
            free: Some(free),
            used: Some(used),
            total: Some(free + used),
            debt: None,
        }
    }

    pub fn settle_total(&mut self) {
        match (self.free, self.used, self.total) {
            (Some(free), Some(used), None) => self.total = Some(free + used),
            (Some(free), None, Some(total)) => self.used = Some(total - free),
            (None, Some(used), Some(total)) => self.free = Some(total - used),
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_accumulates() {
        let mut balances = Balances::new(None);
        balances.entry("USDT").free = Some(dec!(100));
        balances.entry("USDT").used = Some(dec!(20));
        balances.settle_totals();
        assert_eq!(balances.total("USDT"), Some(dec!(120)));
        assert_eq!(balances.used("USDT"), Some(dec!(20)));
        assert!(balances.get("BTC").is_none());
    }

    #[test]
    fn test_settle_total_fills_used() {
        let mut balance = Balance {
            free: Some(dec!(1.5)),
            total: Some(dec!(2)),
            ..Default::default()
        };
        balance.settle_total();
        assert_eq!(balance.used, Some(dec!(0.5)));
    }
}
