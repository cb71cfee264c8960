//! Deposits and withdrawals

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Fee;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Ok,
    Canceled,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,
    #[serde(default)]
    pub info: serde_json::Value,
}

impl Transaction {
    pub fn new(id: String, tx_type: TransactionType, currency: String, amount: Decimal) -> Self {
        Self {
            id,
            timestamp: None,
            datetime: None,
            updated: None,
            tx_type,
            currency,
            network: None,
            amount,
            status: TransactionStatus::Pending,
            address: None,
            tag: None,
            txid: None,
            fee: None,
            info: serde_json::Value::Null,
        }
    }

    pub fn is_deposit(&self) -> bool {
        self.tx_type == TransactionType::Deposit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_transaction_is_pending() {
        let tx = Transaction::new(
            "101".into(),
            TransactionType::Withdrawal,
            "USDT".into(),
            dec!(25),
        );
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(!tx.is_deposit());
        let json = serde_json::to_value(&tx).unwrap_or_default();
        assert_eq!(json["type"], "withdrawal");
    }
}
