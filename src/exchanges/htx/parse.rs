//! Response parsers
//!
//! Every field is read through the `safe_*` helpers with the spot
//! (kebab-case), contract (snake_case) and v2 (camelCase) spellings as
//! fallbacks, so one parser serves all venues.

use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;

use super::dispatch::Venue;
use super::Htx;
use crate::types::{
    Balance, Balances, BorrowInterest, Currency, CurrencyLimits, DepositWithdrawFee, FeeInfo,
    Fee, FundingHistory, FundingRate, FundingRateHistory, LedgerEntry, LeverageTier, Liquidation,
    MarginMode, MarginModes, Market, MarketType, MinMax, Network, NetworkFee, OpenInterest,
    Order, OrderBook, OrderBookEntry, OrderSide, OrderStatus, OrderType, Position, PositionSide,
    Settlement, SubType, TakerOrMaker, Ticker, TimeInForce, Trade, Transaction,
    TransactionStatus, TransactionType, OHLCV,
};
use crate::utils::{
    iso8601, parse_yyyymmdd, precision_from_step, safe_bool, safe_decimal, safe_decimal_n,
    safe_integer, safe_integer_n, safe_list, safe_string, safe_string_lower, safe_string_n,
    safe_string_upper, safe_string_upper_n, safe_value, value_to_decimal,
};

// === Markets ===

pub(super) fn parse_spot_market(v: &Value) -> Option<Market> {
    let id = safe_string(v, "symbol")?;
    let base = safe_string_upper(v, "base-currency")?;
    let quote = safe_string_upper(v, "quote-currency")?;
    let mut market = Market::spot(id, format!("{base}/{quote}"), base, quote);

    let positive = |key: &str| safe_decimal(v, key).filter(|d| *d > Decimal::ZERO);
    let isolated = positive("leverage-ratio");
    let cross = positive("super-margin-leverage-ratio");

    market.active = safe_string(v, "state").as_deref() == Some("online");
    market.margin = isolated.is_some() || cross.is_some();
    market.margin_modes = Some(MarginModes {
        cross: cross.is_some(),
        isolated: isolated.is_some(),
    });
    market.taker = Some(Decimal::new(2, 3));
    market.maker = Some(Decimal::new(2, 3));
    market.precision.amount = safe_integer(v, "amount-precision").map(|p| p as i32);
    market.precision.price = safe_integer(v, "price-precision").map(|p| p as i32);
    market.precision.cost = safe_integer(v, "value-precision").map(|p| p as i32);
    market.limits.amount = MinMax::new(
        safe_decimal_n(v, &["min-order-amt", "limit-order-min-order-amt"]),
        safe_decimal_n(v, &["max-order-amt", "limit-order-max-order-amt"]),
    );
    market.limits.cost = MinMax::new(
        safe_decimal(v, "min-order-value"),
        safe_decimal(v, "max-order-value"),
    );
    if market.margin {
        market.limits.leverage = MinMax::new(Some(Decimal::ONE), isolated.max(cross));
    }
    market.info = v.clone();
    Some(market)
}

pub(super) fn parse_contract_market(v: &Value, venue: Venue) -> Option<Market> {
    let id = safe_string(v, "contract_code")?;
    let base = safe_string_upper(v, "symbol")?;

    let (quote, settle, sub_type) = match venue {
        Venue::Linear => {
            let quote = safe_string_upper(v, "trade_partition").unwrap_or_else(|| "USDT".into());
            (quote.clone(), quote, SubType::Linear)
        }
        _ => ("USD".to_string(), base.clone(), SubType::Inverse),
    };

    let market_type = match venue {
        Venue::InverseSwap => MarketType::Swap,
        Venue::InverseFuture => MarketType::Future,
        _ => {
            let kind = safe_string_n(v, &["business_type", "contract_type"]);
            if kind.as_deref() == Some("swap") || safe_string(v, "delivery_date").is_none() {
                MarketType::Swap
            } else {
                MarketType::Future
            }
        }
    };

    let delivery = safe_string(v, "delivery_date");
    let mut symbol = format!("{base}/{quote}:{settle}");
    if market_type == MarketType::Future {
        let date = delivery.as_deref()?;
        symbol.push('-');
        symbol.push_str(date.get(2..)?);
    }

    let mut market = Market::contract(id, symbol, base, quote, settle, market_type, sub_type);
    market.active = safe_integer(v, "contract_status") == Some(1);
    market.contract_size = safe_decimal(v, "contract_size");
    market.taker = Some(Decimal::new(5, 4));
    market.maker = Some(Decimal::new(2, 4));
    market.precision.amount = Some(0);
    let tick = safe_decimal(v, "price_tick").filter(|t| *t > Decimal::ZERO);
    market.precision.price = tick.and_then(precision_from_step);
    market.precision.price_tick = tick;
    market.limits.amount = MinMax::new(Some(Decimal::ONE), None);
    market.created = safe_string(v, "create_date").as_deref().and_then(parse_yyyymmdd);
    if market_type == MarketType::Future {
        market.expiry = safe_integer(v, "delivery_time")
            .or_else(|| delivery.as_deref().and_then(parse_yyyymmdd));
        market.expiry_datetime = market.expiry.and_then(iso8601);
    }
    market.margin_modes = Some(match venue {
        Venue::Linear => match safe_string(v, "support_margin_mode").as_deref() {
            Some("cross") => MarginModes { cross: true, isolated: false },
            Some("isolated") => MarginModes { cross: false, isolated: true },
            _ => MarginModes { cross: true, isolated: true },
        },
        _ => MarginModes { cross: false, isolated: true },
    });
    market.info = v.clone();
    Some(market)
}

// === Market data ===

/// Best price and size from either `[price, size]` or scalar fields
fn quote_side(v: &Value, key: &str, size_key: &str) -> (Option<Decimal>, Option<Decimal>) {
    match safe_value(v, key) {
        Some(Value::Array(level)) => (
            level.first().and_then(value_to_decimal),
            level.get(1).and_then(value_to_decimal),
        ),
        _ => (safe_decimal(v, key), safe_decimal(v, size_key)),
    }
}

pub(super) fn parse_order_book(tick: &Value, symbol: &str, timestamp: Option<i64>) -> OrderBook {
    let levels = |key: &str| -> Vec<OrderBookEntry> {
        safe_list(tick, key)
            .iter()
            .filter_map(|level| {
                let level = level.as_array()?;
                Some(OrderBookEntry::new(
                    value_to_decimal(level.first()?)?,
                    value_to_decimal(level.get(1)?)?,
                ))
            })
            .collect()
    };

    let mut book = OrderBook::new(symbol.to_string())
        .with_timestamp(safe_integer(tick, "ts").or(timestamp));
    book.bids = levels("bids");
    book.asks = levels("asks");
    book.nonce = safe_integer_n(tick, &["version", "mrid"]);
    book.sort();
    book
}

pub(super) fn parse_ohlcv(v: &Value) -> Option<OHLCV> {
    Some(OHLCV::new(
        safe_integer(v, "id")? * 1000,
        safe_decimal(v, "open")?,
        safe_decimal(v, "high")?,
        safe_decimal(v, "low")?,
        safe_decimal(v, "close")?,
        safe_decimal(v, "amount").unwrap_or_default(),
    ))
}

// === Status maps ===

pub(super) fn spot_order_status(state: &str) -> OrderStatus {
    match state {
        "filled" => OrderStatus::Closed,
        "canceled" | "partial-canceled" => OrderStatus::Canceled,
        _ => OrderStatus::Open,
    }
}

pub(super) fn contract_order_status(status: i64) -> OrderStatus {
    match status {
        6 => OrderStatus::Closed,
        5 | 7 | 11 => OrderStatus::Canceled,
        _ => OrderStatus::Open,
    }
}

pub(super) fn trigger_order_status(status: i64) -> OrderStatus {
    match status {
        4 => OrderStatus::Closed,
        5 => OrderStatus::Rejected,
        6 => OrderStatus::Canceled,
        _ => OrderStatus::Open,
    }
}

pub(super) fn transaction_status(state: &str) -> TransactionStatus {
    match state {
        "confirmed" | "safe" => TransactionStatus::Ok,
        "canceled" => TransactionStatus::Canceled,
        "unknown" | "orphan" | "reject" | "wallet-reject" | "confirm-error" | "repealed"
        | "failed" => TransactionStatus::Failed,
        _ => TransactionStatus::Pending,
    }
}

/// Spot `buy-limit-maker` style type into side, order type and time in force
fn spot_order_type(value: &str) -> (Option<OrderSide>, OrderType, Option<TimeInForce>) {
    let (side, kind) = value.split_once('-').unwrap_or((value, "limit"));
    let (order_type, tif) = match kind {
        "market" => (OrderType::Market, None),
        "limit-maker" => (OrderType::LimitMaker, Some(TimeInForce::PO)),
        "ioc" => (OrderType::Limit, Some(TimeInForce::IOC)),
        "limit-fok" => (OrderType::Limit, Some(TimeInForce::FOK)),
        "stop-limit" => (OrderType::StopLimit, Some(TimeInForce::GTC)),
        "stop-limit-fok" => (OrderType::StopLimit, Some(TimeInForce::FOK)),
        _ => (OrderType::Limit, Some(TimeInForce::GTC)),
    };
    (OrderSide::parse(side), order_type, tif)
}

/// Contract `order_price_type` into order type and time in force
fn contract_order_type(value: &str) -> (OrderType, Option<TimeInForce>) {
    match value {
        "post_only" => (OrderType::LimitMaker, Some(TimeInForce::PO)),
        "ioc" => (OrderType::Limit, Some(TimeInForce::IOC)),
        "fok" => (OrderType::Limit, Some(TimeInForce::FOK)),
        "limit" => (OrderType::Limit, Some(TimeInForce::GTC)),
        v if v == "opponent" || v == "market" || v.starts_with("optimal") || v.starts_with("lightning") => {
            (OrderType::Market, None)
        }
        v if v.ends_with("_ioc") => (OrderType::Market, Some(TimeInForce::IOC)),
        v if v.ends_with("_fok") => (OrderType::Market, Some(TimeInForce::FOK)),
        _ => (OrderType::Limit, None),
    }
}

impl Htx {
    fn resolve_market(&self, id: Option<&str>, market: Option<&Market>) -> Option<Market> {
        market
            .cloned()
            .or_else(|| id.and_then(|id| self.market_by_id(id)))
    }

    fn resolve_symbol(&self, id: Option<&str>, market: Option<&Market>) -> String {
        if let Some(m) = market {
            return m.symbol.clone();
        }
        id.map(|id| self.symbol_for(id)).unwrap_or_default()
    }

    pub(super) fn parse_ticker(&self, v: &Value, market: Option<&Market>) -> Ticker {
        let id = safe_string_n(v, &["contract_code", "symbol"]);
        let market = self.resolve_market(id.as_deref(), market);
        let symbol = self.resolve_symbol(id.as_deref(), market.as_ref());
        let contract = market.as_ref().map_or(false, |m| m.contract);

        let (bid, bid_volume) = quote_side(v, "bid", "bidSize");
        let (ask, ask_volume) = quote_side(v, "ask", "askSize");
        let close = safe_decimal(v, "close");

        let mut ticker = Ticker::new(symbol).with_timestamp(safe_integer(v, "ts"));
        ticker.high = safe_decimal(v, "high");
        ticker.low = safe_decimal(v, "low");
        ticker.bid = bid;
        ticker.bid_volume = bid_volume;
        ticker.ask = ask;
        ticker.ask_volume = ask_volume;
        ticker.open = safe_decimal(v, "open");
        ticker.close = close;
        ticker.last = close;
        ticker.base_volume = safe_decimal(v, "amount");
        ticker.quote_volume = if contract {
            safe_decimal(v, "trade_turnover")
        } else {
            safe_decimal(v, "vol")
        };
        if let (Some(base), Some(quote)) = (ticker.base_volume, ticker.quote_volume) {
            if !base.is_zero() {
                ticker.vwap = Some(quote / base);
            }
        }
        ticker.info = v.clone();
        ticker.with_derived_change()
    }

    /// Public and private trades of every venue
    pub(super) fn parse_trade(&self, v: &Value, market: Option<&Market>) -> Trade {
        let id = safe_string_n(v, &["contract_code", "symbol"]);
        let market = self.resolve_market(id.as_deref(), market);
        let symbol = self.resolve_symbol(id.as_deref(), market.as_ref());

        let price = safe_decimal_n(v, &["price", "trade_price"]).unwrap_or_default();
        let amount =
            safe_decimal_n(v, &["filled-amount", "trade_volume", "amount"]).unwrap_or_default();
        let timestamp = safe_integer_n(v, &["created-at", "created_at", "create_date", "ts"]);

        let mut trade = Trade::new(symbol, price, amount).with_timestamp(timestamp);
        trade.id = safe_string_n(v, &["trade-id", "trade_id", "id", "match-id", "match_id"]);
        trade.order = safe_string_n(v, &["order-id", "order_id_str", "order_id"]);

        let type_field = safe_string(v, "type");
        trade.side = safe_string_lower(v, "direction").or_else(|| {
            type_field
                .as_deref()
                .and_then(|t| t.split('-').next())
                .map(str::to_string)
        });
        trade.trade_type = type_field
            .as_deref()
            .map(|t| spot_order_type(t).1)
            .map(|t| if t.is_market() { "market" } else { "limit" }.to_string())
            .or_else(|| safe_string(v, "order_price_type"));
        trade.taker_or_maker = safe_string(v, "role").as_deref().and_then(TakerOrMaker::parse);

        trade.cost = safe_decimal(v, "trade_turnover").or_else(|| {
            let contract = market.as_ref().map_or(false, |m| m.contract);
            (!contract).then(|| price * amount)
        });

        if let Some(cost) = safe_decimal_n(v, &["filled-fees", "trade_fee"]) {
            let currency = safe_string_upper_n(v, &["fee-currency", "fee_asset"]);
            let points = safe_decimal(v, "filled-points").filter(|p| !p.is_zero());
            trade.fee = Some(match points {
                Some(points) if cost.is_zero() => Fee::new(
                    points,
                    safe_string_upper(v, "fee-deduct-currency").or(currency),
                ),
                _ => Fee::new(cost.abs(), currency),
            });
        }
        trade.info = v.clone();
        trade
    }

    /// Spot, contract, trigger and tp/sl orders
    pub(super) fn parse_order(&self, v: &Value, market: Option<&Market>) -> Order {
        let market_id = safe_string_n(v, &["contract_code", "symbol"]);
        let market = self.resolve_market(market_id.as_deref(), market);
        let symbol = self.resolve_symbol(market_id.as_deref(), market.as_ref());
        let id = safe_string_n(v, &["order_id_str", "id", "order_id", "order-id"]).unwrap_or_default();

        let spot_type = safe_string(v, "type");
        let is_spot = spot_type.is_some() || safe_string(v, "state").is_some();
        let is_trigger = safe_value(v, "trigger_type").is_some() || safe_value(v, "tpsl_order_type").is_some();

        let (side, mut order_type, time_in_force) = if is_spot {
            spot_order_type(spot_type.as_deref().unwrap_or("buy-limit"))
        } else {
            let (order_type, tif) = contract_order_type(
                safe_string(v, "order_price_type").as_deref().unwrap_or("limit"),
            );
            (
                safe_string(v, "direction").as_deref().and_then(OrderSide::parse),
                order_type,
                tif,
            )
        };

        let status = if let Some(state) = safe_string(v, "state") {
            spot_order_status(&state)
        } else if is_trigger {
            safe_integer(v, "status").map_or(OrderStatus::Open, trigger_order_status)
        } else {
            safe_integer(v, "status").map_or(OrderStatus::Open, contract_order_status)
        };

        let trigger_price = safe_decimal_n(v, &["stop-price", "trigger_price"]);
        if is_trigger && !is_spot {
            order_type = if order_type.is_market() {
                OrderType::StopMarket
            } else {
                OrderType::StopLimit
            };
        }

        let amount = safe_decimal_n(v, &["amount", "volume"]).unwrap_or_default();
        let filled =
            safe_decimal_n(v, &["field-amount", "filled-amount", "trade_volume"]).unwrap_or_default();
        let timestamp = safe_integer_n(v, &["created-at", "created_at", "create_date", "ts"]);

        let mut order = Order::new(
            id,
            symbol,
            order_type,
            side.unwrap_or(OrderSide::Buy),
            amount,
        )
        .with_timestamp(timestamp);
        order.status = status;
        order.time_in_force = time_in_force;
        order.client_order_id = safe_string_n(v, &["client-order-id", "client_order_id"]);
        order.price = safe_decimal_n(v, &["price", "order_price"]).filter(|p| !p.is_zero());
        order.trigger_price = trigger_price.filter(|p| !p.is_zero());
        order.filled = filled;
        order.cost = safe_decimal_n(
            v,
            &["field-cash-amount", "filled-cash-amount", "trade_turnover"],
        );
        order.average = safe_decimal(v, "trade_avg_price").filter(|p| !p.is_zero());
        order.last_trade_timestamp = safe_integer_n(v, &["finished-at", "update_time"])
            .filter(|ts| *ts > 0);
        order.post_only = Some(time_in_force == Some(TimeInForce::PO));
        if !is_spot {
            order.reduce_only = safe_string(v, "offset").map(|o| o == "close");
        }

        // spot market buys are sized in quote currency
        if is_spot && order.order_type == OrderType::Market && order.side == OrderSide::Buy {
            order.cost = order.cost.or(Some(amount));
            order.amount = filled;
            order.remaining = None;
        }

        if let Some(fee) = safe_decimal_n(v, &["field-fees", "filled-fees", "fee"]) {
            let currency = safe_string_upper_n(v, &["fee-currency", "fee_asset"]);
            order.fee = Some(Fee::new(fee.abs(), currency));
        }
        order.derive_fill_fields();
        order.info = v.clone();
        order
    }

    pub(super) fn parse_position(
        &self,
        v: &Value,
        market: Option<&Market>,
        margin_mode: MarginMode,
    ) -> Position {
        let id = safe_string(v, "contract_code");
        let market = self.resolve_market(id.as_deref(), market);
        let symbol = self.resolve_symbol(id.as_deref(), market.as_ref());

        let contracts = safe_decimal(v, "volume");
        let contract_size = market.as_ref().and_then(|m| m.contract_size);
        let mark_price = safe_decimal(v, "last_price");
        let linear = market.as_ref().and_then(|m| m.linear).unwrap_or(true);
        let notional = match (contracts, contract_size) {
            (Some(c), Some(size)) if linear => mark_price.map(|p| c * size * p),
            (Some(c), Some(size)) => Some(c * size),
            _ => None,
        };

        Position {
            symbol,
            id: None,
            timestamp: None,
            datetime: None,
            contracts,
            contract_size,
            side: safe_string(v, "direction").as_deref().and_then(PositionSide::parse),
            notional,
            leverage: safe_decimal(v, "lever_rate"),
            unrealized_pnl: safe_decimal(v, "profit_unreal"),
            realized_pnl: safe_decimal(v, "profit"),
            collateral: safe_decimal(v, "position_margin"),
            entry_price: safe_decimal_n(v, &["cost_hold", "cost_open"]),
            mark_price,
            liquidation_price: safe_decimal(v, "liquidation_price"),
            margin_mode: safe_string(v, "margin_mode")
                .and_then(|m| m.parse().ok())
                .or(Some(margin_mode)),
            hedged: safe_string(v, "position_mode").map(|m| m == "dual_side"),
            maintenance_margin: None,
            maintenance_margin_percentage: None,
            initial_margin: safe_decimal(v, "position_margin"),
            initial_margin_percentage: safe_decimal(v, "lever_rate")
                .filter(|l| !l.is_zero())
                .map(|l| Decimal::ONE / l),
            margin_ratio: safe_decimal(v, "risk_rate"),
            percentage: safe_decimal(v, "profit_rate").map(|r| r * Decimal::ONE_HUNDRED),
            info: v.clone(),
        }
    }

    pub(super) fn parse_funding_rate(&self, v: &Value, market: Option<&Market>) -> FundingRate {
        let id = safe_string(v, "contract_code");
        let symbol = self.resolve_symbol(id.as_deref(), market);
        let funding_timestamp = safe_integer(v, "funding_time");
        let next_funding_timestamp = safe_integer(v, "next_funding_time");

        FundingRate {
            symbol,
            funding_rate: safe_decimal(v, "funding_rate"),
            next_funding_rate: safe_decimal(v, "estimated_rate"),
            funding_timestamp,
            funding_datetime: funding_timestamp.and_then(iso8601),
            next_funding_timestamp,
            next_funding_datetime: next_funding_timestamp.and_then(iso8601),
            interval: Some("8h".to_string()),
            info: v.clone(),
            ..Default::default()
        }
    }

    pub(super) fn parse_funding_rate_history(
        &self,
        v: &Value,
        market: Option<&Market>,
    ) -> Option<FundingRateHistory> {
        let id = safe_string(v, "contract_code");
        let timestamp = safe_integer(v, "funding_time");
        Some(FundingRateHistory {
            symbol: self.resolve_symbol(id.as_deref(), market),
            funding_rate: safe_decimal_n(v, &["funding_rate", "realized_rate"])?,
            timestamp,
            datetime: timestamp.and_then(iso8601),
            info: v.clone(),
        })
    }

    pub(super) fn parse_funding_history(
        &self,
        v: &Value,
        market: Option<&Market>,
    ) -> Option<FundingHistory> {
        let id = safe_string_n(v, &["contract", "contract_code"]);
        let timestamp = safe_integer_n(v, &["ts", "created_at"]);
        Some(FundingHistory {
            id: safe_string(v, "id"),
            symbol: self.resolve_symbol(id.as_deref(), market),
            code: safe_string_upper_n(v, &["asset", "margin_account", "symbol"]).unwrap_or_default(),
            timestamp,
            datetime: timestamp.and_then(iso8601),
            amount: safe_decimal(v, "amount")?,
            info: v.clone(),
        })
    }

    pub(super) fn parse_open_interest(&self, v: &Value, market: Option<&Market>) -> OpenInterest {
        let id = safe_string(v, "contract_code");
        let timestamp = safe_integer(v, "ts");
        OpenInterest {
            symbol: self.resolve_symbol(id.as_deref(), market),
            open_interest_amount: safe_decimal(v, "volume"),
            open_interest_value: safe_decimal(v, "value"),
            base_volume: safe_decimal(v, "amount"),
            quote_volume: safe_decimal(v, "value"),
            timestamp,
            datetime: timestamp.and_then(iso8601),
            info: v.clone(),
        }
    }

    pub(super) fn parse_liquidation(&self, v: &Value, market: Option<&Market>) -> Option<Liquidation> {
        let id = safe_string(v, "contract_code");
        let market = self.resolve_market(id.as_deref(), market);
        let timestamp = safe_integer(v, "created_at");
        Some(Liquidation {
            symbol: self.resolve_symbol(id.as_deref(), market.as_ref()),
            timestamp,
            datetime: timestamp.and_then(iso8601),
            price: safe_decimal(v, "price")?,
            contracts: safe_decimal(v, "volume"),
            contract_size: market.as_ref().and_then(|m| m.contract_size),
            base_value: safe_decimal(v, "amount"),
            quote_value: safe_decimal(v, "trade_turnover"),
            side: safe_string(v, "direction").as_deref().and_then(OrderSide::parse),
            info: v.clone(),
        })
    }

    pub(super) fn parse_settlement(&self, v: &Value, market: Option<&Market>) -> Settlement {
        let id = safe_string(v, "contract_code");
        let timestamp = safe_integer(v, "settlement_time");
        Settlement {
            symbol: self.resolve_symbol(id.as_deref(), market),
            price: safe_decimal(v, "settlement_price"),
            timestamp,
            datetime: timestamp.and_then(iso8601),
            info: v.clone(),
        }
    }

    /// One tier per ladder of every leverage bracket
    pub(super) fn parse_leverage_tiers(&self, v: &Value, market: Option<&Market>) -> Vec<LeverageTier> {
        let id = safe_string(v, "contract_code");
        let market = self.resolve_market(id.as_deref(), market);
        let symbol = self.resolve_symbol(id.as_deref(), market.as_ref());
        let currency = market.as_ref().and_then(|m| m.settle.clone());

        let mut tiers = Vec::new();
        for bracket in safe_list(v, "list") {
            let max_leverage = safe_decimal(bracket, "lever_rate");
            for ladder in safe_list(bracket, "ladders") {
                tiers.push(LeverageTier {
                    tier: safe_integer(ladder, "ladder").map_or(tiers.len() as u32, |l| l as u32) + 1,
                    symbol: symbol.clone(),
                    currency: currency.clone(),
                    min_notional: safe_decimal_n(ladder, &["min_size", "min_volume"]),
                    max_notional: safe_decimal_n(ladder, &["max_size", "max_volume"]),
                    maintenance_margin_rate: safe_decimal(ladder, "adjust_factor"),
                    max_leverage,
                    info: ladder.clone(),
                });
            }
        }
        tiers
    }

    pub(super) fn parse_borrow_interest(&self, v: &Value, margin_mode: MarginMode) -> BorrowInterest {
        let symbol = safe_string(v, "symbol").map(|id| self.symbol_for(&id));
        let timestamp = safe_integer_n(v, &["accrued-at", "created-at"]);
        BorrowInterest {
            symbol,
            currency: safe_string_upper(v, "currency"),
            interest: safe_decimal(v, "interest-amount"),
            interest_rate: safe_decimal(v, "interest-rate"),
            amount_borrowed: safe_decimal(v, "loan-amount"),
            margin_mode: Some(margin_mode),
            timestamp,
            datetime: timestamp.and_then(iso8601),
            info: v.clone(),
        }
    }
}

// === Account ===

/// Spot and margin `list` entries: `trade` is free, `frozen` is used,
/// `loan` and `interest` add up to the debt.
pub(super) fn add_spot_balances(balances: &mut Balances, list: &[Value]) {
    for item in list {
        let (Some(code), Some(kind), Some(amount)) = (
            safe_string_upper(item, "currency"),
            safe_string(item, "type"),
            safe_decimal(item, "balance"),
        ) else {
            continue;
        };
        let entry = balances.entry(code);
        let add = |slot: &mut Option<Decimal>, value: Decimal| {
            *slot = Some(slot.unwrap_or_default() + value);
        };
        match kind.as_str() {
            "trade" => add(&mut entry.free, amount),
            "frozen" => add(&mut entry.used, amount),
            "loan" | "interest" => add(&mut entry.debt, amount.abs()),
            _ => {}
        }
    }
}

pub(super) fn parse_spot_balance(data: &Value) -> Balances {
    let mut balances = Balances::new(None);
    match data {
        // isolated margin answers one account per symbol
        Value::Array(accounts) => {
            for account in accounts {
                add_spot_balances(&mut balances, safe_list(account, "list"));
            }
        }
        _ => add_spot_balances(&mut balances, safe_list(data, "list")),
    }
    for balance in balances.currencies.values_mut() {
        balance.free.get_or_insert(Decimal::ZERO);
        balance.used.get_or_insert(Decimal::ZERO);
        balance.settle_total();
    }
    balances.info = data.clone();
    balances
}

/// Contract margin accounts; isolated accounts of the same asset are summed
pub(super) fn parse_contract_balance(data: &Value, timestamp: Option<i64>) -> Balances {
    let mut balances = Balances::new(timestamp);
    let accounts = data.as_array().map(Vec::as_slice).unwrap_or(&[]);
    for account in accounts {
        let Some(code) = safe_string_upper_n(account, &["margin_asset", "margin_account", "symbol"]) else {
            continue;
        };
        let free = safe_decimal_n(account, &["withdraw_available", "margin_available"]);
        let used = safe_decimal(account, "margin_frozen");
        let total = safe_decimal(account, "margin_balance");

        let entry: &mut Balance = balances.entry(code);
        for (slot, value) in [(&mut entry.free, free), (&mut entry.used, used), (&mut entry.total, total)] {
            if let Some(value) = value {
                *slot = Some(slot.unwrap_or_default() + value);
            }
        }
    }
    balances.settle_totals();
    balances.info = data.clone();
    balances
}

pub(super) fn parse_ledger_entry(v: &Value) -> LedgerEntry {
    let timestamp = safe_integer(v, "transactTime");
    let currency = safe_string_upper(v, "currency");
    let entry = LedgerEntry {
        id: safe_string(v, "transactId"),
        timestamp,
        datetime: timestamp.and_then(iso8601),
        account: safe_string(v, "accountId"),
        reference_id: safe_string(v, "transactId"),
        reference_account: safe_string_n(v, &["transferer", "transferee"]),
        entry_type: safe_string(v, "transactType").map(|t| ledger_entry_type(&t).to_string()),
        currency,
        status: Some("ok".to_string()),
        info: v.clone(),
        ..Default::default()
    };
    match safe_decimal(v, "transactAmt") {
        Some(amount) => entry.with_signed_amount(amount),
        None => entry,
    }
}

fn ledger_entry_type(kind: &str) -> &str {
    match kind {
        "trade" => "trade",
        "etf" => "trade",
        "transact-fee" | "fee-deduction" => "fee",
        "transfer" => "transfer",
        "credit" | "liquidation" | "interest" => "credit",
        "deposit" => "deposit",
        "withdraw" => "withdrawal",
        "rebate" => "rebate",
        "distribution" => "airdrop",
        other => other,
    }
}

pub(super) fn parse_transaction(v: &Value) -> Transaction {
    let tx_type = match safe_string(v, "type").as_deref() {
        Some("withdraw") => TransactionType::Withdrawal,
        _ => TransactionType::Deposit,
    };
    let currency = safe_string_upper(v, "currency").unwrap_or_default();
    let timestamp = safe_integer(v, "created-at");

    let mut tx = Transaction::new(
        safe_string(v, "id").unwrap_or_default(),
        tx_type,
        currency.clone(),
        safe_decimal(v, "amount").unwrap_or_default(),
    );
    tx.timestamp = timestamp;
    tx.datetime = timestamp.and_then(iso8601);
    tx.updated = safe_integer(v, "updated-at");
    tx.network = safe_string(v, "chain");
    tx.status = safe_string(v, "state").as_deref().map_or(TransactionStatus::Pending, transaction_status);
    tx.address = safe_string(v, "address");
    tx.tag = safe_string(v, "address-tag");
    tx.txid = safe_string(v, "tx-hash");
    tx.fee = safe_decimal(v, "fee").map(|cost| Fee::new(cost, Some(currency)));
    tx.info = v.clone();
    tx
}

pub(super) fn parse_currency(v: &Value) -> Option<Currency> {
    let id = safe_string(v, "currency")?;
    let mut networks = HashMap::new();

    for chain in safe_list(v, "chains") {
        let Some(chain_id) = safe_string(chain, "chain") else {
            continue;
        };
        let deposit = safe_bool(chain, "depositStatus").unwrap_or(false);
        let withdraw = safe_bool(chain, "withdrawStatus").unwrap_or(false);
        networks.insert(
            chain_id.clone(),
            Network {
                id: chain_id,
                network: safe_string_n(chain, &["displayName", "baseChain"]),
                active: deposit || withdraw,
                deposit,
                withdraw,
                fee: safe_decimal_n(chain, &["transactFeeWithdraw", "minTransactFeeWithdraw"]),
                precision: safe_integer(chain, "withdrawPrecision").map(|p| p as i32),
                limits: CurrencyLimits {
                    withdraw: MinMax::new(
                        safe_decimal(chain, "minWithdrawAmt"),
                        safe_decimal(chain, "maxWithdrawAmt"),
                    ),
                    deposit: MinMax::new(safe_decimal(chain, "minDepositAmt"), None),
                },
                info: chain.clone(),
            },
        );
    }

    let mut currency = Currency {
        code: id.to_uppercase(),
        id,
        name: None,
        active: safe_string(v, "instStatus").as_deref() == Some("normal"),
        deposit: false,
        withdraw: false,
        fee: None,
        precision: None,
        limits: CurrencyLimits::default(),
        networks,
        info: v.clone(),
    };
    currency.aggregate_networks();
    Some(currency)
}

pub(super) fn parse_deposit_withdraw_fee(v: &Value) -> Option<DepositWithdrawFee> {
    let code = safe_string_upper(v, "currency")?;
    let mut networks = HashMap::new();
    for chain in safe_list(v, "chains") {
        let Some(chain_id) = safe_string(chain, "chain") else {
            continue;
        };
        let withdraw = match safe_decimal(chain, "transactFeeWithdraw") {
            Some(fee) => FeeInfo::fixed(Some(fee)),
            None => FeeInfo {
                fee: safe_decimal(chain, "transactFeeRateWithdraw"),
                percentage: true,
            },
        };
        networks.insert(
            chain_id.clone(),
            NetworkFee {
                network: chain_id,
                deposit: FeeInfo::fixed(None),
                withdraw,
            },
        );
    }

    let withdraw = if networks.len() == 1 {
        networks.values().next().map(|n| n.withdraw.clone()).unwrap_or_default()
    } else {
        FeeInfo::default()
    };

    Some(DepositWithdrawFee {
        currency: code,
        deposit: FeeInfo::fixed(None),
        withdraw,
        networks,
        info: v.clone(),
    })
}
