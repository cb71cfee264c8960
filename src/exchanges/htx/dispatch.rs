//! Routing table: which host, path prefix and endpoint serve a call
//!
//! HTX splits its API over four venues with different hosts, prefixes and
//! id parameters. Contract endpoints are further keyed by margin mode
//! (`_cross` on linear contracts) and order kind (`trigger_`, `tpsl_`).

use crate::errors::{CcxtError, CcxtResult};
use crate::types::{Market, MarketType, MarginMode, SubType};

/// An HTX API family with its own host and path layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Venue {
    /// Spot and spot margin, `api.huobi.pro`
    Spot,
    /// USDT-margined swaps and futures
    Linear,
    /// Coin-margined perpetual swaps
    InverseSwap,
    /// Coin-margined delivery futures
    InverseFuture,
}

impl Venue {
    pub const ALL: [Venue; 4] = [
        Venue::Spot,
        Venue::Linear,
        Venue::InverseSwap,
        Venue::InverseFuture,
    ];

    /// Venue for a market type and settlement flavour.
    ///
    /// Linear futures share the linear swap venue.
    pub fn resolve(market_type: MarketType, sub_type: SubType) -> Venue {
        match (market_type, sub_type) {
            (MarketType::Spot | MarketType::Margin, _) => Venue::Spot,
            (_, SubType::Linear) => Venue::Linear,
            (MarketType::Swap, SubType::Inverse) => Venue::InverseSwap,
            (MarketType::Future, SubType::Inverse) => Venue::InverseFuture,
        }
    }

    pub fn of_market(market: &Market) -> Venue {
        if !market.contract {
            return Venue::Spot;
        }
        Venue::resolve(
            market.market_type,
            market.sub_type().unwrap_or(SubType::Linear),
        )
    }

    pub fn is_contract(&self) -> bool {
        !matches!(self, Venue::Spot)
    }

    /// Key of the base url (`"spot"` or `"contract"`)
    pub fn api(&self) -> &'static str {
        match self {
            Venue::Spot => "spot",
            _ => "contract",
        }
    }

    /// Prefix of the public market data endpoints
    pub fn market_prefix(&self) -> &'static str {
        match self {
            Venue::Spot | Venue::InverseFuture => "/market",
            Venue::Linear => "/linear-swap-ex/market",
            Venue::InverseSwap => "/swap-ex/market",
        }
    }

    /// Prefix of the contract REST endpoints, empty for spot
    pub fn api_prefix(&self) -> &'static str {
        match self {
            Venue::Spot => "",
            Venue::Linear => "/linear-swap-api",
            Venue::InverseSwap => "/swap-api",
            Venue::InverseFuture => "/api",
        }
    }

    /// Query parameter carrying the market id on market data endpoints
    pub fn id_param(&self) -> &'static str {
        match self {
            Venue::Spot | Venue::InverseFuture => "symbol",
            Venue::Linear | Venue::InverseSwap => "contract_code",
        }
    }

    /// Endpoint name stem: `swap_...` or `contract_...`
    pub fn product(&self) -> &'static str {
        match self {
            Venue::InverseFuture => "contract",
            _ => "swap",
        }
    }

    /// Segment used in mark price kline endpoints
    pub fn mark_kline_name(&self) -> &'static str {
        match self {
            Venue::Linear => "linear_swap_mark_price_kline",
            Venue::InverseSwap => "swap_mark_price_kline",
            _ => "mark_price_kline",
        }
    }
}

/// Regular, trigger or take-profit/stop-loss order family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderKind {
    #[default]
    Regular,
    Trigger,
    TpSl,
}

impl OrderKind {
    fn prefix(&self) -> &'static str {
        match self {
            OrderKind::Regular => "",
            OrderKind::Trigger => "trigger_",
            OrderKind::TpSl => "tpsl_",
        }
    }
}

impl std::str::FromStr for OrderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "regular" | "limit" | "market" => Ok(OrderKind::Regular),
            "trigger" | "stop" => Ok(OrderKind::Trigger),
            "tpsl" | "tp_sl" | "stoplosstakeprofit" => Ok(OrderKind::TpSl),
            other => Err(format!("unknown order kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Place,
    Cancel,
    CancelAll,
    Open,
    History,
    Detail,
}

impl OrderAction {
    fn name(&self) -> &'static str {
        match self {
            OrderAction::Place => "order",
            OrderAction::Cancel => "cancel",
            OrderAction::CancelAll => "cancelall",
            OrderAction::Open => "openorders",
            OrderAction::History => "hisorders",
            OrderAction::Detail => "order_info",
        }
    }
}

/// Cross margin exists on linear contracts only
pub fn check_margin_mode(venue: Venue, margin_mode: MarginMode) -> CcxtResult<()> {
    match (venue, margin_mode) {
        (Venue::InverseSwap | Venue::InverseFuture, MarginMode::Cross) => Err(
            CcxtError::not_supported(format!("cross margin on {venue:?} contracts")),
        ),
        _ => Ok(()),
    }
}

/// `{prefix}/{version}/{product}[_cross]_{endpoint}`
pub fn contract_path(
    venue: Venue,
    version: &str,
    margin_mode: MarginMode,
    endpoint: &str,
) -> CcxtResult<String> {
    if !venue.is_contract() {
        return Err(CcxtError::not_supported(format!("{endpoint} on spot markets")));
    }
    check_margin_mode(venue, margin_mode)?;
    let cross = if venue == Venue::Linear && margin_mode == MarginMode::Cross {
        "_cross"
    } else {
        ""
    };
    Ok(format!(
        "{}/{version}/{}{cross}_{endpoint}",
        venue.api_prefix(),
        venue.product()
    ))
}

/// Path of a public contract endpoint that has no cross variant
pub fn contract_public_path(venue: Venue, version: &str, endpoint: &str) -> CcxtResult<String> {
    contract_path(venue, version, MarginMode::Isolated, endpoint)
}

/// Order endpoint for `(venue, margin mode, kind, action)`.
///
/// Regular order history lives under v3, everything else under v1.
pub fn contract_order_path(
    venue: Venue,
    margin_mode: MarginMode,
    kind: OrderKind,
    action: OrderAction,
) -> CcxtResult<String> {
    if action == OrderAction::Detail && kind != OrderKind::Regular {
        return Err(CcxtError::not_supported(format!(
            "fetching a single {kind:?} order"
        )));
    }
    let version = if action == OrderAction::History && kind == OrderKind::Regular {
        "v3"
    } else {
        "v1"
    };
    contract_path(
        venue,
        version,
        margin_mode,
        &format!("{}{}", kind.prefix(), action.name()),
    )
}

/// Spot account family selected by the margin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotAccount {
    pub margin_mode: Option<MarginMode>,
}

impl SpotAccount {
    pub fn new(margin_mode: Option<MarginMode>) -> Self {
        Self { margin_mode }
    }

    /// Value of `type` in `/v1/account/accounts`
    pub fn account_type(&self) -> &'static str {
        match self.margin_mode {
            None => "spot",
            Some(MarginMode::Isolated) => "margin",
            Some(MarginMode::Cross) => "super-margin",
        }
    }

    /// `source` sent with spot orders
    pub fn order_source(&self) -> &'static str {
        match self.margin_mode {
            None => "spot-api",
            Some(MarginMode::Isolated) => "margin-api",
            Some(MarginMode::Cross) => "super-margin-api",
        }
    }

    pub fn balance_path(&self, account_id: &str) -> String {
        match self.margin_mode {
            None => format!("/v1/account/accounts/{account_id}/balance"),
            Some(MarginMode::Isolated) => "/v1/margin/accounts/balance".to_string(),
            Some(MarginMode::Cross) => "/v1/cross-margin/accounts/balance".to_string(),
        }
    }

    /// Loan order endpoints of the margin family
    pub fn loan_prefix(&self) -> CcxtResult<&'static str> {
        match self.margin_mode {
            None => Err(CcxtError::BadRequest {
                message: "spot accounts have no loans".into(),
            }),
            Some(MarginMode::Isolated) => Ok("/v1/margin"),
            Some(MarginMode::Cross) => Ok("/v1/cross-margin"),
        }
    }
}
