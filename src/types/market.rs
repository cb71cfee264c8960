//! Market - a tradable instrument

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    #[default]
    Spot,
    Margin,
    Swap,
    Future,
}

impl MarketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::Spot => "spot",
            MarketType::Margin => "margin",
            MarketType::Swap => "swap",
            MarketType::Future => "future",
        }
    }

    pub fn is_contract(&self) -> bool {
        matches!(self, MarketType::Swap | MarketType::Future)
    }
}

impl std::str::FromStr for MarketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spot" => Ok(MarketType::Spot),
            "margin" => Ok(MarketType::Margin),
            "swap" => Ok(MarketType::Swap),
            "future" | "futures" => Ok(MarketType::Future),
            other => Err(format!("unknown market type: {other}")),
        }
    }
}

/// Contract settlement flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubType {
    /// Quote-margined (USDT)
    #[default]
    Linear,
    /// Coin-margined
    Inverse,
}

impl SubType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubType::Linear => "linear",
            SubType::Inverse => "inverse",
        }
    }
}

impl std::str::FromStr for SubType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(SubType::Linear),
            "inverse" => Ok(SubType::Inverse),
            other => Err(format!("unknown sub type: {other}")),
        }
    }
}

/// 마켓 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Exchange id, e.g. `btcusdt` or `BTC-USDT`
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowercase_id: Option<String>,
    /// Unified symbol, e.g. `BTC/USDT` or `BTC/USDT:USDT`
    pub symbol: String,
    pub base: String,
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<String>,
    pub base_id: String,
    pub quote_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_id: Option<String>,
    #[serde(rename = "type")]
    pub market_type: MarketType,
    pub spot: bool,
    pub margin: bool,
    pub swap: bool,
    pub future: bool,
    pub active: bool,
    pub contract: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taker: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<Decimal>,
    /// Base (linear) or quote (inverse) value of one contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_datetime: Option<String>,
    pub precision: MarketPrecision,
    pub limits: MarketLimits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_modes: Option<MarginModes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default)]
    pub info: serde_json::Value,
}

/// Number of decimal places
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPrecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<i32>,
    /// Price step when it is not a power of ten (e.g. `0.5`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_tick: Option<Decimal>,
}

/// 주문 한도
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketLimits {
    #[serde(default)]
    pub amount: MinMax,
    #[serde(default)]
    pub price: MinMax,
    #[serde(default)]
    pub cost: MinMax,
    #[serde(default)]
    pub leverage: MinMax,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl MinMax {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }
}

/// 지원 마진 모드
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginModes {
    pub cross: bool,
    pub isolated: bool,
}

impl Market {
    /// 현물 마켓 생성
    ///
    /// 정밀도, 한도, 플래그는 호출자가 채운다
    pub fn spot(id: String, symbol: String, base: String, quote: String) -> Self {
        Self {
            lowercase_id: Some(id.to_lowercase()),
            id,
            symbol,
            base_id: base.to_lowercase(),
            quote_id: quote.to_lowercase(),
            base,
            quote,
            settle: None,
            settle_id: None,
            market_type: MarketType::Spot,
            spot: true,
            margin: false,
            swap: false,
            future: false,
            active: true,
            contract: false,
            linear: None,
            inverse: None,
            taker: None,
            maker: None,
            contract_size: None,
            expiry: None,
            expiry_datetime: None,
            precision: MarketPrecision::default(),
            limits: MarketLimits::default(),
            margin_modes: None,
            created: None,
            info: serde_json::Value::Null,
        }
    }

    /// Bare swap or future market settled in `settle`
    pub fn contract(
        id: String,
        symbol: String,
        base: String,
        quote: String,
        settle: String,
        market_type: MarketType,
        sub_type: SubType,
    ) -> Self {
        let linear = sub_type == SubType::Linear;
        Self {
            lowercase_id: Some(id.to_lowercase()),
            id,
            symbol,
            base_id: base.clone(),
            quote_id: quote.clone(),
            settle_id: Some(settle.clone()),
            base,
            quote,
            settle: Some(settle),
            market_type,
            spot: false,
            margin: false,
            swap: market_type == MarketType::Swap,
            future: market_type == MarketType::Future,
            active: true,
            contract: true,
            linear: Some(linear),
            inverse: Some(!linear),
            taker: None,
            maker: None,
            contract_size: None,
            expiry: None,
            expiry_datetime: None,
            precision: MarketPrecision::default(),
            limits: MarketLimits::default(),
            margin_modes: None,
            created: None,
            info: serde_json::Value::Null,
        }
    }

    /// 선형/역방향 구분 (계약 마켓만)
    pub fn sub_type(&self) -> Option<SubType> {
        match (self.linear, self.inverse) {
            (Some(true), _) => Some(SubType::Linear),
            (_, Some(true)) => Some(SubType::Inverse),
            _ => None,
        }
    }
}
