//! HTX (Huobi) exchange
//!
//! One adapter for four API families: spot (with isolated and cross margin)
//! on `api.huobi.pro`, plus USDT-margined contracts, coin-margined swaps and
//! coin-margined futures on `api.hbdm.com`. Every call is routed through the
//! [`dispatch`] table; per-call knobs travel in [`HtxParams`].

mod dispatch;
mod options;
mod parse;
mod response;
mod signer;

pub use dispatch::{OrderKind, Venue};
pub use options::{HtxOptions, HtxParams, Offset};
pub use signer::{encode_query, signing_host, Signer};

use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::try_join_all;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::client::{ExchangeConfig, HttpClient, RateLimiter};
use crate::errors::{CcxtError, CcxtResult};
use crate::types::{
    Account, Balances, BorrowInterest, CrossBorrowRate, Currency, DepositAddress,
    DepositWithdrawFee, Exchange, ExchangeFeatures, ExchangeId, ExchangeStatus, ExchangeUrls,
    FundingHistory, FundingRate, FundingRateHistory, IsolatedBorrowRate, LedgerEntry, Leverage,
    LeverageTier, Liquidation, MarginLoan, MarginMode, Market, MarketType, OpenInterest, Order,
    OrderBook, OrderRequest, OrderSide, OrderStatus, OrderType, Position, Settlement,
    SignedRequest, Ticker, TimeInForce, Timeframe, Trade, TradingFee, Transaction,
    TransactionType, TransferEntry, OHLCV,
};
use crate::utils::time::signature_timestamp;
use crate::utils::{
    amount_to_precision, iso8601, now_ms, number_to_string, price_to_precision, price_to_tick,
    safe_decimal,
    safe_decimal_n, safe_integer, safe_list, safe_list_n, safe_string, safe_string_n,
    safe_string_upper,
};
use dispatch::{contract_order_path, contract_path, contract_public_path, OrderAction, SpotAccount};
use response::{check_envelope, data, data_list, tick};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn query<const N: usize>(pairs: [(&str, String); N]) -> HashMap<String, String> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Keeps items at or after `since`, oldest first, capped at `limit`
fn filter_by_since_limit<T>(
    mut items: Vec<T>,
    since: Option<i64>,
    limit: Option<u32>,
    timestamp: impl Fn(&T) -> Option<i64>,
) -> Vec<T> {
    items.sort_by_key(|item| timestamp(item).unwrap_or_default());
    if let Some(since) = since {
        items.retain(|item| timestamp(item).map_or(true, |ts| ts >= since));
    }
    if let Some(limit) = limit.map(|l| l as usize) {
        if items.len() > limit {
            if since.is_some() {
                items.truncate(limit);
            } else {
                items.drain(..items.len() - limit);
            }
        }
    }
    items
}

/// Market id field of contract order, cancel and leverage endpoints
fn contract_id_field(venue: Venue, market: &Market) -> (&'static str, String) {
    match venue {
        Venue::InverseFuture => ("symbol", market.base.clone()),
        _ => ("contract_code", market.id.clone()),
    }
}

/// Market id field of the v3 history endpoints
fn v3_contract_field(venue: Venue, market: &Market) -> (&'static str, String) {
    match venue {
        Venue::InverseFuture => ("symbol", market.base.clone()),
        _ => ("contract", market.id.clone()),
    }
}

/// `ge` / `le` from an explicit operator, else from the order side
fn trigger_type(operator: Option<&str>, side: OrderSide) -> &'static str {
    match operator {
        Some("gte" | "ge") => "ge",
        Some("lte" | "le") => "le",
        _ => match side {
            OrderSide::Buy => "ge",
            OrderSide::Sell => "le",
        },
    }
}

/// Side of a transfer as HTX routes it
#[derive(Debug, Clone, PartialEq, Eq)]
enum TransferAccount {
    /// Account named on `/v2/account/transfer` (`spot`, `futures`, `swap`, `linear-swap`)
    Named(&'static str),
    CrossMargin,
    /// Isolated margin account of one spot market id
    IsolatedMargin(String),
}

/// Unified account name to the HTX transfer account.
///
/// Isolated margin accounts are named by their market symbol, see [`Htx::transfer`].
fn transfer_account(name: &str) -> CcxtResult<TransferAccount> {
    match name.to_ascii_lowercase().as_str() {
        "spot" | "pro" | "exchange" => Ok(TransferAccount::Named("spot")),
        "future" | "futures" => Ok(TransferAccount::Named("futures")),
        "swap" | "inverse" => Ok(TransferAccount::Named("swap")),
        "linear-swap" | "linear" => Ok(TransferAccount::Named("linear-swap")),
        "cross" | "super-margin" => Ok(TransferAccount::CrossMargin),
        "margin" | "isolated" => Err(CcxtError::arguments_required(
            "isolated margin transfers name the account by its market symbol, e.g. BTC/USDT",
        )),
        other => Err(CcxtError::BadRequest {
            message: format!("unknown account {other}"),
        }),
    }
}

/// Order price text, on the tick grid when the market has one
fn format_price(market: &Market, price: Decimal) -> String {
    match market.precision.price_tick {
        Some(tick) => price_to_tick(price, tick),
        None => price_to_precision(price, market.precision.price),
    }
}

fn client_order_id_value(id: &str) -> Value {
    id.parse::<i64>().map_or_else(|_| json!(id), Value::from)
}

/// Order returned by cancel calls: only id, symbol and status are known
fn canceled_order(id: &str, symbol: &str, info: Value) -> Order {
    let mut order = Order::new(
        id.to_string(),
        symbol.to_string(),
        OrderType::Limit,
        OrderSide::Buy,
        Decimal::ZERO,
    );
    order.status = OrderStatus::Canceled;
    order.info = info;
    order
}

/// Contract cancel replies list failures under `errors` and the
/// comma-separated cancelled ids under `successes`.
fn contract_cancel_successes(data: &Value) -> CcxtResult<Vec<String>> {
    let successes: Vec<String> = safe_string(data, "successes")
        .map(|s| s.split(',').filter(|id| !id.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();
    if successes.is_empty() {
        if let Some(error) = safe_list(data, "errors").first() {
            let code = safe_string(error, "err_code").unwrap_or_default();
            let message = safe_string(error, "err_msg").unwrap_or_default();
            return Err(response::classify(&code, &message));
        }
    }
    Ok(successes)
}

/// HTX (Huobi) exchange
pub struct Htx {
    config: ExchangeConfig,
    client: HttpClient,
    rate_limiter: RateLimiter,
    options: HtxOptions,
    markets: RwLock<HashMap<String, Market>>,
    markets_by_id: RwLock<HashMap<String, String>>,
    /// Spot account ids keyed by (type, subtype)
    account_ids: RwLock<HashMap<(String, String), String>>,
    features: ExchangeFeatures,
    urls: ExchangeUrls,
    timeframes: HashMap<Timeframe, String>,
}

impl Htx {
    const SPOT_HOST: &'static str = "api.huobi.pro";
    const CONTRACT_URL: &'static str = "https://api.hbdm.com";

    pub fn new(config: ExchangeConfig) -> CcxtResult<Self> {
        Self::with_options(config, HtxOptions::default())
    }

    pub fn with_options(config: ExchangeConfig, options: HtxOptions) -> CcxtResult<Self> {
        let client = HttpClient::new(&config)?;
        let rate_limiter = RateLimiter::new(config.rate_limit_ms());

        let features = ExchangeFeatures {
            spot: true,
            margin: true,
            swap: true,
            future: true,
            fetch_markets: true,
            fetch_currencies: true,
            fetch_ticker: true,
            fetch_tickers: true,
            fetch_order_book: true,
            fetch_trades: true,
            fetch_ohlcv: true,
            fetch_mark_ohlcv: true,
            fetch_index_ohlcv: true,
            fetch_status: true,
            fetch_time: true,
            fetch_balance: true,
            create_order: true,
            create_orders: true,
            create_stop_order: true,
            create_take_profit_order: true,
            create_stop_loss_order: true,
            cancel_order: true,
            cancel_orders: true,
            cancel_all_orders: true,
            fetch_order: true,
            fetch_orders: true,
            fetch_open_orders: true,
            fetch_closed_orders: true,
            fetch_my_trades: true,
            fetch_order_trades: true,
            fetch_trading_fee: true,
            fetch_trading_fees: true,
            fetch_accounts: true,
            fetch_ledger: true,
            fetch_deposits: true,
            fetch_withdrawals: true,
            fetch_deposit_address: true,
            fetch_deposit_addresses_by_network: true,
            fetch_deposit_withdraw_fees: true,
            withdraw: true,
            transfer: true,
            fetch_positions: true,
            fetch_position: true,
            set_leverage: true,
            fetch_leverage_tiers: true,
            fetch_funding_rate: true,
            fetch_funding_rates: true,
            fetch_funding_rate_history: true,
            fetch_funding_history: true,
            fetch_open_interest: true,
            fetch_open_interest_history: true,
            fetch_settlement_history: true,
            fetch_liquidations: true,
            borrow_cross_margin: true,
            borrow_isolated_margin: true,
            repay_cross_margin: true,
            repay_isolated_margin: true,
            fetch_cross_borrow_rate: true,
            fetch_isolated_borrow_rate: true,
            fetch_borrow_interest: true,
        };

        let spot_url = config.api_url("spot").map(str::to_string).unwrap_or_else(|| {
            format!("https://{}", config.hostname().unwrap_or(Self::SPOT_HOST))
        });
        let contract_url = config
            .api_url("contract")
            .unwrap_or(Self::CONTRACT_URL)
            .to_string();

        let mut api_urls = HashMap::new();
        api_urls.insert("spot".into(), spot_url.trim_end_matches('/').to_string());
        api_urls.insert("contract".into(), contract_url.trim_end_matches('/').to_string());

        let urls = ExchangeUrls {
            logo: Some("https://user-images.githubusercontent.com/1294454/76137448-22748a80-6034-11ea-8ea6-e02dc4dbadc2.jpg".into()),
            api: api_urls,
            www: Some("https://www.htx.com".into()),
            doc: vec![
                "https://huobiapi.github.io/docs/spot/v1/en/".into(),
                "https://huobiapi.github.io/docs/usdt_swap/v1/en/".into(),
                "https://huobiapi.github.io/docs/coin_margined_swap/v1/en/".into(),
                "https://huobiapi.github.io/docs/dm/v1/en/".into(),
            ],
            fees: Some("https://www.htx.com/fee/".into()),
        };

        let mut timeframes = HashMap::new();
        timeframes.insert(Timeframe::Minute1, "1min".into());
        timeframes.insert(Timeframe::Minute5, "5min".into());
        timeframes.insert(Timeframe::Minute15, "15min".into());
        timeframes.insert(Timeframe::Minute30, "30min".into());
        timeframes.insert(Timeframe::Hour1, "60min".into());
        timeframes.insert(Timeframe::Hour4, "4hour".into());
        timeframes.insert(Timeframe::Day1, "1day".into());
        timeframes.insert(Timeframe::Week1, "1week".into());
        timeframes.insert(Timeframe::Month1, "1mon".into());

        Ok(Self {
            config,
            client,
            rate_limiter,
            options,
            markets: RwLock::new(HashMap::new()),
            markets_by_id: RwLock::new(HashMap::new()),
            account_ids: RwLock::new(HashMap::new()),
            features,
            urls,
            timeframes,
        })
    }

    pub fn options(&self) -> &HtxOptions {
        &self.options
    }

    fn base_url(&self, api: &str) -> CcxtResult<&str> {
        self.urls
            .api
            .get(api)
            .map(String::as_str)
            .ok_or_else(|| CcxtError::BadRequest {
                message: format!("unknown api {api}"),
            })
    }

    // === Requests ===

    async fn request(
        &self,
        api: &str,
        method: &str,
        path: &str,
        params: &HashMap<String, String>,
        body: Option<&Value>,
    ) -> CcxtResult<Value> {
        self.rate_limiter.throttle(1.0).await;
        let body = body.map(serde_json::to_string).transpose()?;
        let request = self.sign(path, api, method, params, None, body.as_deref())?;
        let response = self.client.fetch(&request).await?;
        check_envelope(&response, path)?;
        Ok(response)
    }

    async fn public_get(
        &self,
        api: &str,
        path: &str,
        params: HashMap<String, String>,
    ) -> CcxtResult<Value> {
        self.request(&format!("{api}.public"), "GET", path, &params, None)
            .await
    }

    async fn private_get(
        &self,
        api: &str,
        path: &str,
        params: HashMap<String, String>,
    ) -> CcxtResult<Value> {
        self.request(&format!("{api}.private"), "GET", path, &params, None)
            .await
    }

    async fn private_post(&self, api: &str, path: &str, body: Value) -> CcxtResult<Value> {
        self.request(&format!("{api}.private"), "POST", path, &HashMap::new(), Some(&body))
            .await
    }

    // === Markets ===

    fn market_by_id(&self, id: &str) -> Option<Market> {
        let symbol = read(&self.markets_by_id).get(id).cloned()?;
        read(&self.markets).get(&symbol).cloned()
    }

    /// Unified symbol of a market id, the id itself when unknown
    fn symbol_for(&self, id: &str) -> String {
        read(&self.markets_by_id)
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    async fn market(&self, symbol: &str) -> CcxtResult<Market> {
        self.load_markets(false).await?;
        read(&self.markets)
            .get(symbol)
            .cloned()
            .ok_or_else(|| CcxtError::BadSymbol {
                symbol: symbol.to_string(),
            })
    }

    async fn contract_market(&self, symbol: &str) -> CcxtResult<Market> {
        let market = self.market(symbol).await?;
        if !market.contract {
            return Err(CcxtError::BadSymbol {
                symbol: format!("{symbol} is not a contract market"),
            });
        }
        Ok(market)
    }

    async fn swap_market(&self, symbol: &str) -> CcxtResult<Market> {
        let market = self.contract_market(symbol).await?;
        if !market.swap {
            return Err(CcxtError::not_supported(format!(
                "funding on {symbol}, only perpetual swaps pay funding"
            )));
        }
        Ok(market)
    }

    async fn fetch_venue_markets(&self, venue: Venue) -> CcxtResult<Vec<Market>> {
        let markets: Vec<Market> = match venue {
            Venue::Spot => {
                let body = self
                    .public_get(venue.api(), "/v1/common/symbols", HashMap::new())
                    .await?;
                data_list(&body)
                    .iter()
                    .filter_map(parse::parse_spot_market)
                    .collect()
            }
            _ => {
                let path = contract_public_path(venue, "v1", "contract_info")?;
                let mut params = HashMap::new();
                if venue == Venue::Linear {
                    params.insert("business_type".to_string(), "all".to_string());
                }
                let body = self.public_get(venue.api(), &path, params).await?;
                data_list(&body)
                    .iter()
                    .filter_map(|m| parse::parse_contract_market(m, venue))
                    .collect()
            }
        };
        debug!(venue = ?venue, count = markets.len(), "loaded markets");
        Ok(markets)
    }

    // === Routing ===

    /// Venue of the market, else of the params, else of the options
    fn venue_for(&self, market: Option<&Market>, params: &HtxParams) -> Venue {
        if let Some(market) = market {
            return Venue::of_market(market);
        }
        Venue::resolve(
            params.market_type.unwrap_or(self.options.default_type),
            params.sub_type.unwrap_or(self.options.default_sub_type),
        )
    }

    /// Contract venue for calls without a symbol; spot defaults fall back to swaps
    fn contract_venue_for(&self, market: Option<&Market>, params: &HtxParams) -> Venue {
        match self.venue_for(market, params) {
            Venue::Spot => Venue::resolve(
                MarketType::Swap,
                params.sub_type.unwrap_or(self.options.default_sub_type),
            ),
            venue => venue,
        }
    }

    /// `None` is the plain spot account
    fn spot_margin_mode(&self, params: &HtxParams) -> Option<MarginMode> {
        params.margin_mode.or_else(|| {
            let market_type = params.market_type.unwrap_or(self.options.default_type);
            (market_type == MarketType::Margin).then_some(self.options.default_margin_mode)
        })
    }

    /// Inverse contracts are isolated only; asking for cross there fails
    fn contract_margin_mode(&self, venue: Venue, params: &HtxParams) -> CcxtResult<MarginMode> {
        match venue {
            Venue::Linear => Ok(params.margin_mode.unwrap_or(self.options.default_margin_mode)),
            _ => {
                let mode = params.margin_mode.unwrap_or(MarginMode::Isolated);
                dispatch::check_margin_mode(venue, mode)?;
                Ok(mode)
            }
        }
    }

    // === Accounts ===

    /// Account id for the spot account family, fetched once per (type, subtype)
    async fn account_id(
        &self,
        account: SpotAccount,
        market: Option<&Market>,
        params: &HtxParams,
    ) -> CcxtResult<String> {
        if let Some(id) = &params.account_id {
            return Ok(id.clone());
        }
        let subtype = match account.margin_mode {
            Some(MarginMode::Isolated) => market.map(|m| m.id.clone()).ok_or_else(|| {
                CcxtError::arguments_required("isolated margin account needs a symbol")
            })?,
            _ => String::new(),
        };
        let key = (account.account_type().to_string(), subtype);

        let cached = read(&self.account_ids).get(&key).cloned();
        if let Some(id) = cached {
            return Ok(id);
        }
        self.fetch_accounts().await?;
        let fetched = read(&self.account_ids).get(&key).cloned();
        fetched.ok_or_else(|| CcxtError::AccountNotEnabled {
            message: format!("no {} account {}", key.0, key.1).trim_end().to_string(),
        })
    }

    // === Market data ===

    /// Tickers of one venue; `params` picks the venue when no symbol is given
    pub async fn fetch_tickers_with(
        &self,
        symbols: Option<&[&str]>,
        params: &HtxParams,
    ) -> CcxtResult<HashMap<String, Ticker>> {
        self.load_markets(false).await?;
        let first = match symbols.and_then(|s| s.first()) {
            Some(symbol) => Some(self.market(symbol).await?),
            None => None,
        };
        let venue = self.venue_for(first.as_ref(), params);

        let body = if venue.is_contract() {
            let path = format!("{}/detail/batch_merged", venue.market_prefix());
            self.public_get(venue.api(), &path, HashMap::new()).await?
        } else {
            self.public_get(venue.api(), "/market/tickers", HashMap::new())
                .await?
        };
        let timestamp = safe_integer(&body, "ts");

        let known = read(&self.markets).clone();
        let mut tickers = HashMap::new();
        for item in safe_list_n(&body, &["data", "ticks"]) {
            let mut ticker = self.parse_ticker(item, None);
            if ticker.timestamp.is_none() {
                ticker = ticker.with_timestamp(timestamp);
            }
            let wanted = match symbols {
                Some(symbols) => symbols.contains(&ticker.symbol.as_str()),
                None => known.contains_key(&ticker.symbol),
            };
            if wanted {
                tickers.insert(ticker.symbol.clone(), ticker);
            }
        }
        Ok(tickers)
    }

    async fn fetch_kline(
        &self,
        market: &Market,
        path: &str,
        mut params: HashMap<String, String>,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OHLCV>> {
        let period = self
            .timeframes
            .get(&timeframe)
            .cloned()
            .ok_or_else(|| CcxtError::BadRequest {
                message: format!("unsupported timeframe {timeframe}"),
            })?;
        params.insert("period".into(), period);

        match (market.contract, since) {
            (true, Some(since)) => {
                let count = i64::from(limit.unwrap_or(2000).clamp(1, 2000));
                let to = (since + timeframe.to_millis() * (count - 1)).min(now_ms());
                params.insert("from".into(), (since / 1000).to_string());
                params.insert("to".into(), (to.max(since) / 1000).to_string());
            }
            (false, Some(_)) => {
                params.insert("size".into(), "2000".into());
            }
            (_, None) => {
                params.insert("size".into(), limit.unwrap_or(150).min(2000).to_string());
            }
        }

        let api = Venue::of_market(market).api();
        let body = self.public_get(api, path, params).await?;
        let candles = data_list(&body)
            .iter()
            .filter_map(parse::parse_ohlcv)
            .collect();
        Ok(filter_by_since_limit(candles, since, limit, |c: &OHLCV| {
            Some(c.timestamp)
        }))
    }

    // === Account ===

    /// Balance of the account family selected by `params`
    pub async fn fetch_balance_with(&self, params: &HtxParams) -> CcxtResult<Balances> {
        let venue = self.venue_for(None, params);
        if venue == Venue::Spot {
            let account = SpotAccount::new(self.spot_margin_mode(params));
            let path = match account.margin_mode {
                None => account.balance_path(&self.account_id(account, None, params).await?),
                Some(_) => account.balance_path(""),
            };
            let body = self.private_get(venue.api(), &path, HashMap::new()).await?;
            return Ok(parse::parse_spot_balance(data(&body, "balance")?));
        }

        let margin_mode = self.contract_margin_mode(venue, params)?;
        let path = contract_path(venue, "v1", margin_mode, "account_info")?;
        let body = self.private_post(venue.api(), &path, json!({})).await?;
        Ok(parse::parse_contract_balance(
            data(&body, "balance")?,
            safe_integer(&body, "ts"),
        ))
    }

    async fn fetch_transactions(
        &self,
        tx_type: TransactionType,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        let kind = match tx_type {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdraw",
        };
        let mut params = query([("type", kind.to_string())]);
        if let Some(code) = code {
            params.insert("currency".into(), code.to_lowercase());
        }
        params.insert("size".into(), limit.unwrap_or(100).min(500).to_string());

        let body = self
            .private_get("spot", "/v1/query/deposit-withdraw", params)
            .await?;
        let transactions = data_list(&body)
            .iter()
            .map(parse::parse_transaction)
            .collect();
        Ok(filter_by_since_limit(transactions, since, limit, |t: &Transaction| {
            t.timestamp
        }))
    }

    // === Trading ===

    /// Places one order. `params` wins over the knobs in `request.params`.
    pub async fn create_order_with(
        &self,
        request: &OrderRequest,
        params: &HtxParams,
    ) -> CcxtResult<Order> {
        let market = self.market(&request.symbol).await?;
        let extra = request
            .params
            .as_ref()
            .map(HtxParams::from_extra)
            .unwrap_or_default();
        let params = params.clone().or(extra);

        if market.contract {
            self.create_contract_order(&market, request, &params).await
        } else {
            self.create_spot_order(&market, request, &params).await
        }
    }

    async fn create_order_request(&self, request: &OrderRequest) -> CcxtResult<Order> {
        self.create_order_with(request, &HtxParams::default()).await
    }

    async fn create_spot_order(
        &self,
        market: &Market,
        request: &OrderRequest,
        params: &HtxParams,
    ) -> CcxtResult<Order> {
        if request.take_profit_price.is_some() || request.stop_loss_price.is_some() {
            return Err(CcxtError::not_supported(
                "take profit and stop loss orders on spot markets",
            ));
        }
        let account = SpotAccount::new(self.spot_margin_mode(params));
        let account_id = self.account_id(account, Some(market), params).await?;
        let is_market = request.order_type.is_market();

        let kind = if request.stop_price.is_some() {
            if is_market {
                return Err(CcxtError::InvalidOrder {
                    message: "spot stop orders need a limit price".into(),
                });
            }
            "stop-limit"
        } else if is_market {
            "market"
        } else if request.is_post_only() {
            "limit-maker"
        } else {
            match request.time_in_force {
                Some(TimeInForce::IOC) => "ioc",
                Some(TimeInForce::FOK) => "limit-fok",
                _ => "limit",
            }
        };

        let mut body = Map::new();
        body.insert("account-id".into(), json!(account_id));
        body.insert("symbol".into(), json!(market.id));
        body.insert("type".into(), json!(format!("{}-{kind}", request.side.as_str())));
        body.insert("source".into(), json!(account.order_source()));

        let amount = if is_market && request.side == OrderSide::Buy {
            let cost = if self.options.create_market_buy_order_requires_price {
                let price = request.price.ok_or_else(|| CcxtError::InvalidOrder {
                    message: "market buy orders need a price to compute the cost; pass the \
                              price or disable create_market_buy_order_requires_price and \
                              pass the cost as amount"
                        .into(),
                })?;
                request.amount * price
            } else {
                request.amount
            };
            amount_to_precision(cost, market.precision.cost)
        } else {
            amount_to_precision(request.amount, market.precision.amount)
        };
        body.insert("amount".into(), json!(amount));

        if !is_market {
            let price = request.price.ok_or_else(|| CcxtError::InvalidOrder {
                message: format!("{kind} orders need a price"),
            })?;
            body.insert(
                "price".into(),
                json!(format_price(market, price)),
            );
        }
        if let Some(stop) = request.stop_price {
            body.insert(
                "stop-price".into(),
                json!(format_price(market, stop)),
            );
            let operator = params.operator.clone().unwrap_or_else(|| {
                match request.side {
                    OrderSide::Buy => "gte",
                    OrderSide::Sell => "lte",
                }
                .to_string()
            });
            body.insert("operator".into(), json!(operator));
        }
        if let Some(id) = request.client_order_id.as_ref().or(params.client_order_id.as_ref()) {
            body.insert("client-order-id".into(), json!(id));
        }

        let response = self
            .private_post("spot", "/v1/order/orders/place", Value::Object(body))
            .await?;
        let id = safe_string(&response, "data").ok_or_else(|| CcxtError::BadResponse {
            message: "order placement returned no id".into(),
        })?;
        Ok(Self::placed_order(id, market, request, params, response))
    }

    async fn create_contract_order(
        &self,
        market: &Market,
        request: &OrderRequest,
        params: &HtxParams,
    ) -> CcxtResult<Order> {
        let venue = Venue::of_market(market);
        let margin_mode = self.contract_margin_mode(venue, params)?;
        let kind = params.kind.unwrap_or(
            if request.stop_price.is_some() {
                OrderKind::Trigger
            } else if request.take_profit_price.is_some() || request.stop_loss_price.is_some() {
                OrderKind::TpSl
            } else {
                OrderKind::Regular
            },
        );
        let path = contract_order_path(venue, margin_mode, kind, OrderAction::Place)?;

        let volume = request
            .amount
            .trunc()
            .to_i64()
            .filter(|v| *v > 0 && request.amount.fract().is_zero())
            .ok_or_else(|| CcxtError::InvalidOrder {
                message: format!(
                    "contract orders are sized in whole contracts, got {}",
                    number_to_string(request.amount)
                ),
            })?;
        let price = |value: Decimal| json!(format_price(market, value));
        let is_market = request.order_type.is_market();
        let offset = params.offset.unwrap_or(if request.reduce_only == Some(true) {
            Offset::Close
        } else {
            Offset::Open
        });
        let lever_rate = params.leverage.unwrap_or(self.options.default_leverage);

        let mut body = Map::new();
        body.insert("contract_code".into(), json!(market.id));
        body.insert("volume".into(), json!(volume));
        body.insert("direction".into(), json!(request.side.as_str()));

        match kind {
            OrderKind::Regular => {
                let order_price_type = if request.is_post_only() {
                    "post_only"
                } else if is_market {
                    "opponent"
                } else {
                    match request.time_in_force {
                        Some(TimeInForce::IOC) => "ioc",
                        Some(TimeInForce::FOK) => "fok",
                        _ => "limit",
                    }
                };
                if order_price_type != "opponent" {
                    let limit = request.price.ok_or_else(|| CcxtError::InvalidOrder {
                        message: format!("{order_price_type} orders need a price"),
                    })?;
                    body.insert("price".into(), price(limit));
                }
                body.insert("offset".into(), json!(offset.as_str()));
                body.insert("lever_rate".into(), json!(lever_rate));
                body.insert("order_price_type".into(), json!(order_price_type));
                if let Some(id) = request.client_order_id.as_ref().or(params.client_order_id.as_ref()) {
                    body.insert("client_order_id".into(), client_order_id_value(id));
                }
            }
            OrderKind::Trigger => {
                let trigger = request.stop_price.ok_or_else(|| {
                    CcxtError::arguments_required("trigger orders need a trigger price")
                })?;
                body.insert(
                    "trigger_type".into(),
                    json!(trigger_type(params.operator.as_deref(), request.side)),
                );
                body.insert("trigger_price".into(), price(trigger));
                match (is_market, request.price) {
                    (false, Some(limit)) => {
                        body.insert("order_price".into(), price(limit));
                        body.insert("order_price_type".into(), json!("limit"));
                    }
                    (false, None) => {
                        return Err(CcxtError::InvalidOrder {
                            message: "limit trigger orders need a price".into(),
                        })
                    }
                    (true, _) => {
                        body.insert("order_price_type".into(), json!("optimal_5"));
                    }
                }
                body.insert("offset".into(), json!(offset.as_str()));
                body.insert("lever_rate".into(), json!(lever_rate));
            }
            OrderKind::TpSl => {
                if request.take_profit_price.is_none() && request.stop_loss_price.is_none() {
                    return Err(CcxtError::arguments_required(
                        "take profit / stop loss orders need a take profit or stop loss price",
                    ));
                }
                let leg_price = if is_market { None } else { request.price };
                for (prefix, trigger) in [
                    ("tp", request.take_profit_price),
                    ("sl", request.stop_loss_price),
                ] {
                    let Some(trigger) = trigger else {
                        continue;
                    };
                    body.insert(format!("{prefix}_trigger_price"), price(trigger));
                    match leg_price {
                        Some(limit) => {
                            body.insert(format!("{prefix}_order_price"), price(limit));
                            body.insert(format!("{prefix}_order_price_type"), json!("limit"));
                        }
                        None => {
                            body.insert(format!("{prefix}_order_price_type"), json!("optimal_5"));
                        }
                    }
                }
            }
        }

        let response = self
            .private_post(venue.api(), &path, Value::Object(body))
            .await?;
        let data = data(&response, "order")?;
        let id = match kind {
            OrderKind::TpSl => ["tp_order", "sl_order"]
                .iter()
                .filter_map(|leg| data.get(*leg))
                .find_map(|leg| safe_string_n(leg, &["order_id_str", "order_id"])),
            _ => safe_string_n(data, &["order_id_str", "order_id"]),
        }
        .ok_or_else(|| CcxtError::BadResponse {
            message: "order placement returned no id".into(),
        })?;
        let mut order = Self::placed_order(id, market, request, params, response.clone());
        order.reduce_only = Some(offset == Offset::Close);
        Ok(order)
    }

    /// The placement reply only carries ids; the rest echoes the request
    fn placed_order(
        id: String,
        market: &Market,
        request: &OrderRequest,
        params: &HtxParams,
        info: Value,
    ) -> Order {
        let mut order = Order::new(
            id,
            market.symbol.clone(),
            request.order_type,
            request.side,
            request.amount,
        );
        order.price = request.price;
        order.trigger_price = request.stop_price;
        order.take_profit_price = request.take_profit_price;
        order.stop_loss_price = request.stop_loss_price;
        order.client_order_id = request
            .client_order_id
            .clone()
            .or_else(|| params.client_order_id.clone());
        order.time_in_force = request.time_in_force;
        order.reduce_only = request.reduce_only;
        order.post_only = Some(request.is_post_only());
        order.info = info;
        order
    }

    pub async fn cancel_order_with(
        &self,
        id: &str,
        symbol: &str,
        params: &HtxParams,
    ) -> CcxtResult<Order> {
        let market = self.market(symbol).await?;
        if !market.contract {
            let path = format!("/v1/order/orders/{id}/submitcancel");
            let response = self.private_post("spot", &path, json!({})).await?;
            return Ok(canceled_order(id, &market.symbol, response));
        }

        let venue = Venue::of_market(&market);
        let margin_mode = self.contract_margin_mode(venue, params)?;
        let kind = params.kind.unwrap_or_default();
        let path = contract_order_path(venue, margin_mode, kind, OrderAction::Cancel)?;
        let (field, value) = contract_id_field(venue, &market);
        let body = json!({ "order_id": id, field: value });

        let response = self.private_post(venue.api(), &path, body).await?;
        contract_cancel_successes(data(&response, "cancel")?)?;
        Ok(canceled_order(id, &market.symbol, response))
    }

    pub async fn cancel_orders_with(
        &self,
        ids: &[&str],
        symbol: &str,
        params: &HtxParams,
    ) -> CcxtResult<Vec<Order>> {
        let market = self.market(symbol).await?;
        if !market.contract {
            let response = self
                .private_post(
                    "spot",
                    "/v1/order/orders/batchcancel",
                    json!({ "order-ids": ids }),
                )
                .await?;
            let data = data(&response, "cancel")?;
            let canceled = safe_list(data, "success")
                .iter()
                .filter_map(|id| match id {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .map(|id| canceled_order(&id, &market.symbol, data.clone()))
                .collect();
            return Ok(canceled);
        }

        let venue = Venue::of_market(&market);
        let margin_mode = self.contract_margin_mode(venue, params)?;
        let kind = params.kind.unwrap_or_default();
        let path = contract_order_path(venue, margin_mode, kind, OrderAction::Cancel)?;
        let (field, value) = contract_id_field(venue, &market);
        let body = json!({ "order_id": ids.join(","), field: value });

        let response = self.private_post(venue.api(), &path, body).await?;
        let data = data(&response, "cancel")?;
        Ok(contract_cancel_successes(data)?
            .iter()
            .map(|id| canceled_order(id, &market.symbol, data.clone()))
            .collect())
    }

    /// Spot cancel-all answers counts only, so it returns no orders
    pub async fn cancel_all_orders_with(
        &self,
        symbol: Option<&str>,
        params: &HtxParams,
    ) -> CcxtResult<Vec<Order>> {
        let market = match symbol {
            Some(symbol) => Some(self.market(symbol).await?),
            None => None,
        };
        let venue = self.venue_for(market.as_ref(), params);

        if venue == Venue::Spot {
            let account = SpotAccount::new(self.spot_margin_mode(params));
            let account_id = self.account_id(account, market.as_ref(), params).await?;
            let mut body = json!({ "account-id": account_id });
            if let Some(market) = &market {
                body["symbol"] = json!(market.id);
            }
            self.private_post("spot", "/v1/order/orders/batchCancelOpenOrders", body)
                .await?;
            return Ok(Vec::new());
        }

        let market = market.ok_or_else(|| {
            CcxtError::arguments_required("cancel_all_orders needs a symbol on contract markets")
        })?;
        let margin_mode = self.contract_margin_mode(venue, params)?;
        let kind = params.kind.unwrap_or_default();
        let path = contract_order_path(venue, margin_mode, kind, OrderAction::CancelAll)?;
        let (field, value) = contract_id_field(venue, &market);

        let response = self
            .private_post(venue.api(), &path, json!({ field: value }))
            .await?;
        let data = data(&response, "cancel")?;
        Ok(contract_cancel_successes(data)?
            .iter()
            .map(|id| canceled_order(id, &market.symbol, data.clone()))
            .collect())
    }

    pub async fn fetch_order_with(
        &self,
        id: &str,
        symbol: &str,
        params: &HtxParams,
    ) -> CcxtResult<Order> {
        let market = self.market(symbol).await?;
        if !market.contract {
            let path = format!("/v1/order/orders/{id}");
            let body = self.private_get("spot", &path, HashMap::new()).await?;
            return Ok(self.parse_order(data(&body, "order")?, Some(&market)));
        }

        let venue = Venue::of_market(&market);
        let margin_mode = self.contract_margin_mode(venue, params)?;
        let kind = params.kind.unwrap_or_default();
        let path = contract_order_path(venue, margin_mode, kind, OrderAction::Detail)?;
        let (field, value) = contract_id_field(venue, &market);

        let body = self
            .private_post(venue.api(), &path, json!({ "order_id": id, field: value }))
            .await?;
        data_list(&body)
            .first()
            .map(|order| self.parse_order(order, Some(&market)))
            .ok_or_else(|| CcxtError::OrderNotFound {
                order_id: id.to_string(),
            })
    }

    pub async fn fetch_open_orders_with(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &HtxParams,
    ) -> CcxtResult<Vec<Order>> {
        let market = match symbol {
            Some(symbol) => Some(self.market(symbol).await?),
            None => None,
        };
        let venue = self.venue_for(market.as_ref(), params);

        let orders = if venue == Venue::Spot {
            let mut query = HashMap::new();
            if let Some(market) = &market {
                query.insert("symbol".to_string(), market.id.clone());
            }
            if let Some(limit) = limit {
                query.insert("size".to_string(), limit.min(500).to_string());
            }
            let body = self.private_get("spot", "/v1/order/openOrders", query).await?;
            data_list(&body)
                .iter()
                .map(|o| self.parse_order(o, market.as_ref()))
                .collect()
        } else {
            let market = market.ok_or_else(|| {
                CcxtError::arguments_required("fetch_open_orders needs a symbol on contract markets")
            })?;
            let margin_mode = self.contract_margin_mode(venue, params)?;
            let kind = params.kind.unwrap_or_default();
            let path = contract_order_path(venue, margin_mode, kind, OrderAction::Open)?;
            let (field, value) = contract_id_field(venue, &market);
            let body = json!({
                field: value,
                "page_size": limit.unwrap_or(50).min(50),
            });
            let body = self.private_post(venue.api(), &path, body).await?;
            data_list(&body)
                .iter()
                .map(|o| self.parse_order(o, Some(&market)))
                .collect()
        };
        Ok(filter_by_since_limit(orders, since, limit, |o: &Order| o.timestamp))
    }

    pub async fn fetch_closed_orders_with(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &HtxParams,
    ) -> CcxtResult<Vec<Order>> {
        self.fetch_order_history(symbol, since, limit, params, true)
            .await
    }

    pub async fn fetch_orders_with(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &HtxParams,
    ) -> CcxtResult<Vec<Order>> {
        self.fetch_order_history(symbol, since, limit, params, false)
            .await
    }

    async fn fetch_order_history(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &HtxParams,
        closed_only: bool,
    ) -> CcxtResult<Vec<Order>> {
        let symbol = symbol.ok_or_else(|| {
            CcxtError::arguments_required("order history needs a symbol")
        })?;
        let market = self.market(symbol).await?;

        let orders: Vec<Order> = if !market.contract {
            let states = if closed_only {
                "filled,partial-canceled,canceled"
            } else {
                "pre-submitted,submitted,partial-filled,filled,partial-canceled,canceled"
            };
            let mut query = query([
                ("symbol", market.id.clone()),
                ("states", states.to_string()),
            ]);
            if let Some(since) = since {
                query.insert("start-time".into(), since.to_string());
            }
            if let Some(limit) = limit {
                query.insert("size".into(), limit.min(100).to_string());
            }
            let body = self.private_get("spot", "/v1/order/orders", query).await?;
            data_list(&body)
                .iter()
                .map(|o| self.parse_order(o, Some(&market)))
                .collect()
        } else {
            let venue = Venue::of_market(&market);
            let margin_mode = self.contract_margin_mode(venue, params)?;
            let kind = params.kind.unwrap_or_default();
            let path = contract_order_path(venue, margin_mode, kind, OrderAction::History)?;

            let mut body = Map::new();
            body.insert("trade_type".into(), json!(0));
            if kind == OrderKind::Regular {
                let (field, value) = v3_contract_field(venue, &market);
                body.insert(field.into(), json!(value));
                body.insert("type".into(), json!(if closed_only { 2 } else { 1 }));
                body.insert(
                    "status".into(),
                    json!(if closed_only { "5,6,7" } else { "0" }),
                );
                if let Some(since) = since {
                    body.insert("start_time".into(), json!(since));
                }
            } else {
                let (field, value) = contract_id_field(venue, &market);
                body.insert(field.into(), json!(value));
                body.insert(
                    "status".into(),
                    json!(if closed_only { "4,5,6" } else { "0" }),
                );
                body.insert("create_date".into(), json!(90));
                body.insert("page_size".into(), json!(limit.unwrap_or(50).min(50)));
            }
            let response = self
                .private_post(venue.api(), &path, Value::Object(body))
                .await?;
            data_list(&response)
                .iter()
                .map(|o| self.parse_order(o, Some(&market)))
                .collect()
        };
        Ok(filter_by_since_limit(orders, since, limit, |o: &Order| o.timestamp))
    }

    pub async fn fetch_my_trades_with(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &HtxParams,
    ) -> CcxtResult<Vec<Trade>> {
        let symbol = symbol.ok_or_else(|| {
            CcxtError::arguments_required("fetch_my_trades needs a symbol")
        })?;
        let market = self.market(symbol).await?;

        let trades = if !market.contract {
            let mut query = query([("symbol", market.id.clone())]);
            if let Some(since) = since {
                query.insert("start-time".into(), since.to_string());
            }
            if let Some(limit) = limit {
                query.insert("size".into(), limit.min(500).to_string());
            }
            let body = self
                .private_get("spot", "/v1/order/matchresults", query)
                .await?;
            data_list(&body)
                .iter()
                .map(|t| self.parse_trade(t, Some(&market)))
                .collect()
        } else {
            let venue = Venue::of_market(&market);
            let margin_mode = self.contract_margin_mode(venue, params)?;
            let path = contract_path(venue, "v3", margin_mode, "matchresults")?;
            let (field, value) = v3_contract_field(venue, &market);
            let mut body = json!({ field: value, "trade_type": 0 });
            if let Some(since) = since {
                body["start_time"] = json!(since);
            }
            let response = self.private_post(venue.api(), &path, body).await?;
            data_list(&response)
                .iter()
                .map(|t| self.parse_trade(t, Some(&market)))
                .collect()
        };
        Ok(filter_by_since_limit(trades, since, limit, |t: &Trade| t.timestamp))
    }

    pub async fn fetch_positions_with(
        &self,
        symbols: Option<&[&str]>,
        params: &HtxParams,
    ) -> CcxtResult<Vec<Position>> {
        let first = match symbols.and_then(|s| s.first()) {
            Some(symbol) => Some(self.contract_market(symbol).await?),
            None => {
                self.load_markets(false).await?;
                None
            }
        };
        let venue = self.contract_venue_for(first.as_ref(), params);
        let margin_mode = self.contract_margin_mode(venue, params)?;
        let path = contract_path(venue, "v1", margin_mode, "position_info")?;

        let body = match (symbols.map(<[&str]>::len), &first) {
            (Some(1), Some(market)) => {
                let (field, value) = contract_id_field(venue, market);
                json!({ field: value })
            }
            _ => json!({}),
        };
        let response = self.private_post(venue.api(), &path, body).await?;
        Ok(data_list(&response)
            .iter()
            .map(|p| self.parse_position(p, None, margin_mode))
            .filter(|p| symbols.map_or(true, |s| s.contains(&p.symbol.as_str())))
            .collect())
    }

    pub async fn set_leverage_with(
        &self,
        leverage: Decimal,
        symbol: &str,
        params: &HtxParams,
    ) -> CcxtResult<Leverage> {
        let market = self.contract_market(symbol).await?;
        let lever_rate = leverage
            .to_u32()
            .filter(|l| *l > 0 && leverage.fract().is_zero())
            .ok_or_else(|| CcxtError::BadRequest {
                message: format!("leverage must be a positive integer, got {leverage}"),
            })?;
        let venue = Venue::of_market(&market);
        let margin_mode = self.contract_margin_mode(venue, params)?;
        let path = contract_path(venue, "v1", margin_mode, "switch_lever_rate")?;
        let (field, value) = contract_id_field(venue, &market);

        let response = self
            .private_post(venue.api(), &path, json!({ field: value, "lever_rate": lever_rate }))
            .await?;
        let data = data(&response, "leverage")?;
        let applied = safe_decimal(data, "lever_rate").unwrap_or(leverage);
        Ok(Leverage {
            symbol: market.symbol,
            margin_mode: Some(margin_mode),
            long_leverage: Some(applied),
            short_leverage: Some(applied),
            info: data.clone(),
        })
    }

    pub async fn fetch_leverage_tiers_with(
        &self,
        symbols: Option<&[&str]>,
        params: &HtxParams,
    ) -> CcxtResult<HashMap<String, Vec<LeverageTier>>> {
        let first = match symbols.and_then(|s| s.first()) {
            Some(symbol) => Some(self.contract_market(symbol).await?),
            None => {
                self.load_markets(false).await?;
                None
            }
        };
        let venue = self.contract_venue_for(first.as_ref(), params);
        let margin_mode = self.contract_margin_mode(venue, params)?;
        let path = contract_path(venue, "v1", margin_mode, "adjustfactor")?;

        let mut query = HashMap::new();
        if let (Some(1), Some(market)) = (symbols.map(<[&str]>::len), &first) {
            let (field, id) = contract_id_field(venue, market);
            query.insert(field.to_string(), id);
        }
        let body = self.public_get(venue.api(), &path, query).await?;

        let mut tiers = HashMap::new();
        for item in data_list(&body) {
            // delivery futures share one ladder per base currency
            if venue == Venue::InverseFuture {
                let Some(base) = safe_string_upper(item, "symbol") else {
                    continue;
                };
                let markets: Vec<Market> = read(&self.markets)
                    .values()
                    .filter(|m| m.base == base && Venue::of_market(m) == Venue::InverseFuture)
                    .filter(|m| symbols.map_or(true, |s| s.contains(&m.symbol.as_str())))
                    .cloned()
                    .collect();
                for market in markets {
                    tiers.insert(market.symbol.clone(), self.parse_leverage_tiers(item, Some(&market)));
                }
                continue;
            }
            let parsed = self.parse_leverage_tiers(item, None);
            let Some(symbol) = parsed.first().map(|t| t.symbol.clone()) else {
                continue;
            };
            if symbols.map_or(true, |s| s.contains(&symbol.as_str())) {
                tiers.insert(symbol, parsed);
            }
        }
        Ok(tiers)
    }

    /// Account names containing `/` are isolated margin accounts of that spot market
    async fn transfer_target(&self, name: &str) -> CcxtResult<TransferAccount> {
        if !name.contains('/') {
            return transfer_account(name);
        }
        let market = self.market(name).await?;
        if market.contract {
            return Err(CcxtError::BadSymbol {
                symbol: format!("{name} is not a spot market"),
            });
        }
        Ok(TransferAccount::IsolatedMargin(market.id))
    }

    async fn lending_account(&self, margin_mode: MarginMode, symbol: Option<&str>) -> CcxtResult<(SpotAccount, Option<Market>)> {
        let market = match symbol {
            Some(symbol) => {
                let market = self.market(symbol).await?;
                if market.contract {
                    return Err(CcxtError::BadSymbol {
                        symbol: format!("{symbol} is not a spot market"),
                    });
                }
                Some(market)
            }
            None => None,
        };
        Ok((SpotAccount::new(Some(margin_mode)), market))
    }

    async fn borrow(
        &self,
        margin_mode: MarginMode,
        symbol: Option<&str>,
        code: &str,
        amount: Decimal,
    ) -> CcxtResult<MarginLoan> {
        let (account, market) = self.lending_account(margin_mode, symbol).await?;
        let path = format!("{}/orders", account.loan_prefix()?);
        let mut body = json!({
            "currency": code.to_lowercase(),
            "amount": number_to_string(amount),
        });
        if let Some(market) = &market {
            body["symbol"] = json!(market.id);
        }
        let response = self.private_post("spot", &path, body).await?;
        let timestamp = now_ms();
        Ok(MarginLoan {
            id: safe_string(&response, "data"),
            currency: Some(code.to_uppercase()),
            amount: Some(amount),
            symbol: market.map(|m| m.symbol),
            timestamp: Some(timestamp),
            datetime: iso8601(timestamp),
            info: response,
        })
    }

    async fn repay(
        &self,
        margin_mode: MarginMode,
        symbol: Option<&str>,
        code: &str,
        amount: Decimal,
    ) -> CcxtResult<MarginLoan> {
        let (account, market) = self.lending_account(margin_mode, symbol).await?;
        let account_id = self
            .account_id(account, market.as_ref(), &HtxParams::default())
            .await?;
        let body = json!({
            "accountid": account_id,
            "currency": code.to_lowercase(),
            "amount": number_to_string(amount),
        });
        let response = self
            .private_post("spot", "/v2/account/repayment", body)
            .await?;
        let receipt = data_list(&response).first().cloned().unwrap_or(Value::Null);
        let timestamp = safe_integer(&receipt, "repayTime");
        Ok(MarginLoan {
            id: safe_string(&receipt, "repayId"),
            currency: Some(code.to_uppercase()),
            amount: Some(amount),
            symbol: market.map(|m| m.symbol),
            timestamp,
            datetime: timestamp.and_then(iso8601),
            info: response,
        })
    }
}

#[async_trait]
impl Exchange for Htx {
    fn id(&self) -> ExchangeId {
        ExchangeId::Htx
    }

    fn name(&self) -> &str {
        "HTX"
    }

    fn countries(&self) -> &[&str] {
        &["CN"]
    }

    fn rate_limit(&self) -> u64 {
        self.rate_limiter.rate_limit_ms()
    }

    fn has(&self) -> &ExchangeFeatures {
        &self.features
    }

    fn urls(&self) -> &ExchangeUrls {
        &self.urls
    }

    fn timeframes(&self) -> &HashMap<Timeframe, String> {
        &self.timeframes
    }

    // === Public API ===

    async fn load_markets(&self, reload: bool) -> CcxtResult<HashMap<String, Market>> {
        if !reload {
            let cached = read(&self.markets).clone();
            if !cached.is_empty() {
                return Ok(cached);
            }
        }

        let markets = self.fetch_markets().await?;
        let mut by_symbol = HashMap::with_capacity(markets.len());
        let mut by_id = HashMap::with_capacity(markets.len());
        for market in markets {
            by_id.insert(market.id.clone(), market.symbol.clone());
            by_symbol.insert(market.symbol.clone(), market);
        }
        *write(&self.markets) = by_symbol.clone();
        *write(&self.markets_by_id) = by_id;
        Ok(by_symbol)
    }

    async fn fetch_markets(&self) -> CcxtResult<Vec<Market>> {
        let batches = try_join_all(
            self.options
                .fetch_markets
                .iter()
                .map(|venue| self.fetch_venue_markets(*venue)),
        )
        .await?;
        Ok(batches.into_iter().flatten().collect())
    }

    async fn fetch_currencies(&self) -> CcxtResult<HashMap<String, Currency>> {
        let body = self
            .public_get("spot", "/v2/reference/currencies", HashMap::new())
            .await?;
        Ok(data_list(&body)
            .iter()
            .filter_map(parse::parse_currency)
            .map(|c| (c.code.clone(), c))
            .collect())
    }

    async fn fetch_ticker(&self, symbol: &str) -> CcxtResult<Ticker> {
        let market = self.market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = format!("{}/detail/merged", venue.market_prefix());
        let params = query([(venue.id_param(), market.id.clone())]);

        let body = self.public_get(venue.api(), &path, params).await?;
        let ticker = self.parse_ticker(tick(&body, "ticker")?, Some(&market));
        Ok(match ticker.timestamp {
            Some(_) => ticker,
            None => ticker.with_timestamp(safe_integer(&body, "ts")),
        })
    }

    async fn fetch_tickers(&self, symbols: Option<&[&str]>) -> CcxtResult<HashMap<String, Ticker>> {
        self.fetch_tickers_with(symbols, &HtxParams::default()).await
    }

    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> CcxtResult<OrderBook> {
        let market = self.market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = format!("{}/depth", venue.market_prefix());
        let mut params = query([
            (venue.id_param(), market.id.clone()),
            ("type", "step0".to_string()),
        ]);
        if !market.contract {
            if let Some(depth) = limit.and_then(|l| [5, 10, 20].into_iter().find(|d| *d >= l)) {
                params.insert("depth".into(), depth.to_string());
            }
        }

        let body = self.public_get(venue.api(), &path, params).await?;
        let mut book =
            parse::parse_order_book(tick(&body, "order book")?, &market.symbol, safe_integer(&body, "ts"));
        if let Some(limit) = limit {
            book.limit_depth(limit as usize);
        }
        Ok(book)
    }

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>> {
        let market = self.market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = format!("{}/history/trade", venue.market_prefix());
        let params = query([
            (venue.id_param(), market.id.clone()),
            ("size", limit.unwrap_or(100).clamp(1, 2000).to_string()),
        ]);

        let body = self.public_get(venue.api(), &path, params).await?;
        let trades = data_list(&body)
            .iter()
            .flat_map(|batch| safe_list(batch, "data"))
            .map(|t| self.parse_trade(t, Some(&market)))
            .collect();
        Ok(filter_by_since_limit(trades, since, limit, |t: &Trade| t.timestamp))
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OHLCV>> {
        let market = self.market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = format!("{}/history/kline", venue.market_prefix());
        let params = query([(venue.id_param(), market.id.clone())]);
        self.fetch_kline(&market, &path, params, timeframe, since, limit)
            .await
    }

    async fn fetch_mark_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OHLCV>> {
        let market = self.contract_market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = format!("/index/market/history/{}", venue.mark_kline_name());
        let params = query([(venue.id_param(), market.id.clone())]);
        self.fetch_kline(&market, &path, params, timeframe, since, limit)
            .await
    }

    async fn fetch_index_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OHLCV>> {
        let market = self.contract_market(symbol).await?;
        let params = query([("symbol", format!("{}-{}", market.base, market.quote))]);
        self.fetch_kline(
            &market,
            "/index/market/history/index",
            params,
            timeframe,
            since,
            limit,
        )
        .await
    }

    async fn fetch_time(&self) -> CcxtResult<i64> {
        let body = self
            .public_get("spot", "/v1/common/timestamp", HashMap::new())
            .await?;
        safe_integer(&body, "data").ok_or_else(|| CcxtError::BadResponse {
            message: "server time missing".into(),
        })
    }

    async fn fetch_status(&self) -> CcxtResult<ExchangeStatus> {
        let body = self
            .public_get("spot", "/v2/market-status", HashMap::new())
            .await?;
        let data = data(&body, "status")?;
        let status = match safe_integer(data, "marketStatus") {
            Some(1) => "ok",
            _ => "maintenance",
        };
        Ok(ExchangeStatus {
            status: status.to_string(),
            updated: Some(now_ms()),
            eta: safe_integer(data, "haltEndTime"),
            url: None,
            info: body.clone(),
        })
    }

    // === Private API ===

    async fn fetch_balance(&self) -> CcxtResult<Balances> {
        self.fetch_balance_with(&HtxParams::default()).await
    }

    async fn create_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> CcxtResult<Order> {
        let mut request = OrderRequest::new(symbol, order_type, side, amount);
        request.price = price;
        self.create_order_request(&request).await
    }

    async fn create_orders(&self, orders: Vec<OrderRequest>) -> CcxtResult<Vec<Order>> {
        let mut placed = Vec::with_capacity(orders.len());
        for request in &orders {
            placed.push(self.create_order_request(request).await?);
        }
        Ok(placed)
    }

    async fn create_stop_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
        stop_price: Decimal,
    ) -> CcxtResult<Order> {
        let mut request = OrderRequest::new(symbol, order_type, side, amount).with_stop_price(stop_price);
        request.price = price;
        self.create_order_request(&request).await
    }

    async fn create_take_profit_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
        take_profit_price: Decimal,
    ) -> CcxtResult<Order> {
        let mut request =
            OrderRequest::new(symbol, order_type, side, amount).with_take_profit(take_profit_price);
        request.price = price;
        self.create_order_request(&request).await
    }

    async fn create_stop_loss_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
        stop_loss_price: Decimal,
    ) -> CcxtResult<Order> {
        let mut request =
            OrderRequest::new(symbol, order_type, side, amount).with_stop_loss(stop_loss_price);
        request.price = price;
        self.create_order_request(&request).await
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> CcxtResult<Order> {
        self.cancel_order_with(id, symbol, &HtxParams::default()).await
    }

    async fn cancel_orders(&self, ids: &[&str], symbol: &str) -> CcxtResult<Vec<Order>> {
        self.cancel_orders_with(ids, symbol, &HtxParams::default())
            .await
    }

    async fn cancel_all_orders(&self, symbol: Option<&str>) -> CcxtResult<Vec<Order>> {
        self.cancel_all_orders_with(symbol, &HtxParams::default())
            .await
    }

    async fn fetch_order(&self, id: &str, symbol: &str) -> CcxtResult<Order> {
        self.fetch_order_with(id, symbol, &HtxParams::default()).await
    }

    async fn fetch_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        self.fetch_orders_with(symbol, since, limit, &HtxParams::default())
            .await
    }

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        self.fetch_open_orders_with(symbol, since, limit, &HtxParams::default())
            .await
    }

    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        self.fetch_closed_orders_with(symbol, since, limit, &HtxParams::default())
            .await
    }

    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>> {
        self.fetch_my_trades_with(symbol, since, limit, &HtxParams::default())
            .await
    }

    async fn fetch_order_trades(
        &self,
        id: &str,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>> {
        let market = self.market(symbol).await?;
        let body = if !market.contract {
            let path = format!("/v1/order/orders/{id}/matchresults");
            self.private_get("spot", &path, HashMap::new()).await?
        } else {
            let venue = Venue::of_market(&market);
            let margin_mode = self.contract_margin_mode(venue, &HtxParams::default())?;
            let path = contract_path(venue, "v1", margin_mode, "order_detail")?;
            let (field, value) = contract_id_field(venue, &market);
            self.private_post(venue.api(), &path, json!({ "order_id": id, field: value }))
                .await?
        };
        let trades = data_list(&body)
            .iter()
            .map(|t| {
                let mut trade = self.parse_trade(t, Some(&market));
                trade.order.get_or_insert_with(|| id.to_string());
                trade
            })
            .collect();
        Ok(filter_by_since_limit(trades, since, limit, |t: &Trade| t.timestamp))
    }

    async fn fetch_trading_fee(&self, symbol: &str) -> CcxtResult<TradingFee> {
        let market = self.market(symbol).await?;
        if market.contract {
            let venue = Venue::of_market(&market);
            let path = contract_public_path(venue, "v1", "fee")?;
            let (field, value) = contract_id_field(venue, &market);
            let body = self.private_post(venue.api(), &path, json!({ field: value })).await?;
            let item = data_list(&body).first().cloned().unwrap_or(Value::Null);
            return Ok(TradingFee {
                symbol: market.symbol,
                maker: safe_decimal_n(&item, &["open_maker_fee", "close_maker_fee"])
                    .or(market.maker)
                    .unwrap_or_default(),
                taker: safe_decimal_n(&item, &["open_taker_fee", "close_taker_fee"])
                    .or(market.taker)
                    .unwrap_or_default(),
                percentage: true,
                tier_based: false,
                info: item,
            });
        }

        let mut fees = self.fetch_spot_trading_fees(&[market]).await?;
        fees.remove(symbol).ok_or_else(|| CcxtError::BadResponse {
            message: format!("no trading fee returned for {symbol}"),
        })
    }

    async fn fetch_trading_fees(&self) -> CcxtResult<HashMap<String, TradingFee>> {
        let markets: Vec<Market> = self
            .load_markets(false)
            .await?
            .into_values()
            .filter(|m| m.spot && m.active)
            .collect();
        self.fetch_spot_trading_fees(&markets).await
    }

    // === Account / wallet ===

    async fn fetch_accounts(&self) -> CcxtResult<Vec<Account>> {
        let body = self
            .private_get("spot", "/v1/account/accounts", HashMap::new())
            .await?;
        let accounts: Vec<Account> = data_list(&body)
            .iter()
            .map(|a| Account {
                id: safe_string(a, "id"),
                account_type: safe_string(a, "type"),
                code: safe_string(a, "subtype"),
                state: safe_string(a, "state"),
                info: a.clone(),
            })
            .collect();

        let mut cache = write(&self.account_ids);
        for account in &accounts {
            if let (Some(id), Some(kind)) = (&account.id, &account.account_type) {
                let subtype = account.code.clone().unwrap_or_default();
                cache.insert((kind.clone(), subtype), id.clone());
            }
        }
        Ok(accounts)
    }

    async fn fetch_ledger(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<LedgerEntry>> {
        let account_id = self
            .account_id(SpotAccount::new(None), None, &HtxParams::default())
            .await?;
        let mut params = query([("accountId", account_id)]);
        if let Some(code) = code {
            params.insert("currency".into(), code.to_lowercase());
        }
        if let Some(since) = since {
            params.insert("startTime".into(), since.to_string());
        }
        if let Some(limit) = limit {
            params.insert("limit".into(), limit.min(500).to_string());
        }

        let body = self
            .private_get("spot", "/v2/account/ledger", params)
            .await?;
        let entries = data_list(&body).iter().map(parse::parse_ledger_entry).collect();
        Ok(filter_by_since_limit(entries, since, limit, |e: &LedgerEntry| e.timestamp))
    }

    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        self.fetch_transactions(TransactionType::Deposit, code, since, limit)
            .await
    }

    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        self.fetch_transactions(TransactionType::Withdrawal, code, since, limit)
            .await
    }

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
        network: Option<&str>,
    ) -> CcxtResult<Transaction> {
        let mut body = json!({
            "address": address,
            "amount": number_to_string(amount),
            "currency": code.to_lowercase(),
        });
        if let Some(tag) = tag {
            body["addr-tag"] = json!(tag);
        }
        if let Some(network) = network {
            body["chain"] = json!(network.to_lowercase());
        }

        let response = self
            .private_post("spot", "/v1/dw/withdraw/api/create", body)
            .await?;
        let id = safe_string(&response, "data").unwrap_or_default();
        let mut tx = Transaction::new(id, TransactionType::Withdrawal, code.to_uppercase(), amount);
        tx.address = Some(address.to_string());
        tx.tag = tag.map(str::to_string);
        tx.network = network.map(str::to_lowercase);
        tx.info = response;
        Ok(tx)
    }

    async fn fetch_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> CcxtResult<DepositAddress> {
        let mut addresses = self.fetch_deposit_addresses_by_network(code).await?;
        let found = match network {
            Some(network) => addresses.remove(&network.to_lowercase()),
            None => {
                let mut chains: Vec<_> = addresses.into_iter().collect();
                chains.sort_by(|a, b| a.0.cmp(&b.0));
                chains.into_iter().next().map(|(_, address)| address)
            }
        };
        found.ok_or_else(|| CcxtError::InvalidAddress {
            address: format!(
                "no deposit address for {code}{}",
                network.map(|n| format!(" on {n}")).unwrap_or_default()
            ),
        })
    }

    async fn fetch_deposit_addresses_by_network(
        &self,
        code: &str,
    ) -> CcxtResult<HashMap<String, DepositAddress>> {
        let params = query([("currency", code.to_lowercase())]);
        let body = self
            .private_get("spot", "/v2/account/deposit/address", params)
            .await?;
        Ok(data_list(&body)
            .iter()
            .filter_map(|item| {
                let chain = safe_string(item, "chain")?;
                let address = DepositAddress {
                    currency: safe_string_upper(item, "currency").unwrap_or_else(|| code.to_uppercase()),
                    network: Some(chain.clone()),
                    address: safe_string(item, "address")?,
                    tag: safe_string(item, "addressTag"),
                    info: item.clone(),
                };
                Some((chain, address))
            })
            .collect())
    }

    async fn fetch_deposit_withdraw_fees(
        &self,
        codes: Option<&[&str]>,
    ) -> CcxtResult<HashMap<String, DepositWithdrawFee>> {
        let mut params = HashMap::new();
        if let Some([code]) = codes {
            params.insert("currency".to_string(), code.to_lowercase());
        }
        let body = self
            .public_get("spot", "/v2/reference/currencies", params)
            .await?;
        Ok(data_list(&body)
            .iter()
            .filter_map(parse::parse_deposit_withdraw_fee)
            .filter(|fee| codes.map_or(true, |c| c.iter().any(|code| code.eq_ignore_ascii_case(&fee.currency))))
            .map(|fee| (fee.currency.clone(), fee))
            .collect())
    }

    /// `cross` is the cross margin account; an isolated margin account is named by
    /// its market symbol (`BTC/USDT`)
    async fn transfer(
        &self,
        code: &str,
        amount: Decimal,
        from_account: &str,
        to_account: &str,
    ) -> CcxtResult<TransferEntry> {
        let from = self.transfer_target(from_account).await?;
        let to = self.transfer_target(to_account).await?;
        let currency = code.to_lowercase();
        let amount_text = number_to_string(amount);
        let spot = TransferAccount::Named("spot");

        let response = match (&from, &to) {
            (TransferAccount::Named("spot"), TransferAccount::Named("futures"))
            | (TransferAccount::Named("futures"), TransferAccount::Named("spot")) => {
                let kind = if from == spot {
                    "pro-to-futures"
                } else {
                    "futures-to-pro"
                };
                let body = json!({ "currency": currency, "amount": amount_text, "type": kind });
                self.private_post("spot", "/v1/futures/transfer", body).await?
            }
            (TransferAccount::Named("spot"), TransferAccount::CrossMargin)
            | (TransferAccount::CrossMargin, TransferAccount::Named("spot")) => {
                let path = if from == spot {
                    "/v1/cross-margin/transfer-in"
                } else {
                    "/v1/cross-margin/transfer-out"
                };
                let body = json!({ "currency": currency, "amount": amount_text });
                self.private_post("spot", path, body).await?
            }
            (TransferAccount::Named("spot"), TransferAccount::IsolatedMargin(id))
            | (TransferAccount::IsolatedMargin(id), TransferAccount::Named("spot")) => {
                let path = if from == spot {
                    "/v1/dw/transfer-in/margin"
                } else {
                    "/v1/dw/transfer-out/margin"
                };
                let body = json!({ "symbol": id, "currency": currency, "amount": amount_text });
                self.private_post("spot", path, body).await?
            }
            (TransferAccount::Named(from_name), TransferAccount::Named(to_name)) => {
                let margin_account = if *from_name == "swap" || *to_name == "swap" {
                    format!("{}-USD", code.to_uppercase())
                } else {
                    code.to_uppercase()
                };
                let body = json!({
                    "from": from_name,
                    "to": to_name,
                    "currency": currency,
                    "amount": amount_text,
                    "margin-account": margin_account,
                });
                self.private_post("spot", "/v2/account/transfer", body).await?
            }
            _ => {
                return Err(CcxtError::BadRequest {
                    message: format!(
                        "margin accounts only transfer to and from spot, got {from_account} -> {to_account}"
                    ),
                })
            }
        };

        let timestamp = now_ms();
        Ok(TransferEntry {
            id: safe_string(&response, "data"),
            timestamp: Some(timestamp),
            datetime: iso8601(timestamp),
            currency: Some(code.to_uppercase()),
            amount: Some(amount),
            from_account: Some(from_account.to_string()),
            to_account: Some(to_account.to_string()),
            status: Some("ok".to_string()),
            info: response,
        })
    }

    // === Derivatives ===

    async fn fetch_positions(&self, symbols: Option<&[&str]>) -> CcxtResult<Vec<Position>> {
        self.fetch_positions_with(symbols, &HtxParams::default())
            .await
    }

    /// A flat position is returned when nothing is open
    async fn fetch_position(&self, symbol: &str) -> CcxtResult<Position> {
        let market = self.contract_market(symbol).await?;
        let positions = self.fetch_positions(Some(&[symbol])).await?;
        let open = positions
            .into_iter()
            .find(|p| p.symbol == market.symbol);
        Ok(open.unwrap_or_else(|| {
            let venue = Venue::of_market(&market);
            Position {
                symbol: market.symbol.clone(),
                contracts: Some(Decimal::ZERO),
                contract_size: market.contract_size,
                margin_mode: self.contract_margin_mode(venue, &HtxParams::default()).ok(),
                ..Default::default()
            }
        }))
    }

    async fn set_leverage(&self, leverage: Decimal, symbol: &str) -> CcxtResult<Leverage> {
        self.set_leverage_with(leverage, symbol, &HtxParams::default())
            .await
    }

    async fn fetch_leverage_tiers(
        &self,
        symbols: Option<&[&str]>,
    ) -> CcxtResult<HashMap<String, Vec<LeverageTier>>> {
        self.fetch_leverage_tiers_with(symbols, &HtxParams::default())
            .await
    }

    async fn fetch_funding_rate(&self, symbol: &str) -> CcxtResult<FundingRate> {
        let market = self.swap_market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = contract_public_path(venue, "v1", "funding_rate")?;
        let body = self
            .public_get(venue.api(), &path, query([("contract_code", market.id.clone())]))
            .await?;
        let mut rate = self.parse_funding_rate(data(&body, "funding rate")?, Some(&market));
        rate.timestamp = safe_integer(&body, "ts");
        rate.datetime = rate.timestamp.and_then(iso8601);
        Ok(rate)
    }

    async fn fetch_funding_rates(
        &self,
        symbols: Option<&[&str]>,
    ) -> CcxtResult<HashMap<String, FundingRate>> {
        let first = match symbols.and_then(|s| s.first()) {
            Some(symbol) => Some(self.swap_market(symbol).await?),
            None => {
                self.load_markets(false).await?;
                None
            }
        };
        let venue = self.contract_venue_for(first.as_ref(), &HtxParams::default());
        let path = contract_public_path(venue, "v1", "batch_funding_rate")?;
        let body = self.public_get(venue.api(), &path, HashMap::new()).await?;

        let known = read(&self.markets).clone();
        Ok(data_list(&body)
            .iter()
            .map(|item| self.parse_funding_rate(item, None))
            .filter(|rate| match symbols {
                Some(symbols) => symbols.contains(&rate.symbol.as_str()),
                None => known.get(&rate.symbol).map_or(false, |m| m.swap),
            })
            .map(|rate| (rate.symbol.clone(), rate))
            .collect())
    }

    async fn fetch_funding_rate_history(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<FundingRateHistory>> {
        let market = self.swap_market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = contract_public_path(venue, "v1", "historical_funding_rate")?;
        let params = query([
            ("contract_code", market.id.clone()),
            ("page_size", limit.unwrap_or(50).min(50).to_string()),
        ]);
        let body = self.public_get(venue.api(), &path, params).await?;
        let rates = data_list(&body)
            .iter()
            .filter_map(|item| self.parse_funding_rate_history(item, Some(&market)))
            .collect();
        Ok(filter_by_since_limit(rates, since, limit, |r: &FundingRateHistory| {
            r.timestamp
        }))
    }

    async fn fetch_funding_history(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<FundingHistory>> {
        let symbol = symbol.ok_or_else(|| {
            CcxtError::arguments_required("fetch_funding_history needs a symbol")
        })?;
        let market = self.swap_market(symbol).await?;
        let venue = Venue::of_market(&market);
        let margin_mode = self.contract_margin_mode(venue, &HtxParams::default())?;
        let path = contract_public_path(venue, "v3", "financial_record")?;

        let mut body = json!({
            "contract": market.id,
            "type": "30,31",
        });
        // coin-margined records are keyed by contract alone
        if venue == Venue::Linear {
            body["mar_acct"] = match margin_mode {
                MarginMode::Cross => json!(market.settle.clone().unwrap_or_default()),
                MarginMode::Isolated => json!(market.id),
            };
        }
        if let Some(since) = since {
            body["start_time"] = json!(since);
        }

        let response = self.private_post(venue.api(), &path, body).await?;
        let payments = data_list(&response)
            .iter()
            .filter_map(|item| self.parse_funding_history(item, Some(&market)))
            .collect();
        Ok(filter_by_since_limit(payments, since, limit, |p: &FundingHistory| {
            p.timestamp
        }))
    }

    async fn fetch_open_interest(&self, symbol: &str) -> CcxtResult<OpenInterest> {
        let market = self.contract_market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = contract_public_path(venue, "v1", "open_interest")?;
        let body = self
            .public_get(venue.api(), &path, query([("contract_code", market.id.clone())]))
            .await?;
        let item = data_list(&body).first().ok_or_else(|| CcxtError::BadResponse {
            message: format!("no open interest returned for {symbol}"),
        })?;
        let mut interest = self.parse_open_interest(item, Some(&market));
        if interest.timestamp.is_none() {
            interest.timestamp = safe_integer(&body, "ts");
            interest.datetime = interest.timestamp.and_then(iso8601);
        }
        Ok(interest)
    }

    async fn fetch_open_interest_history(
        &self,
        symbol: &str,
        timeframe: Option<Timeframe>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OpenInterest>> {
        let market = self.contract_market(symbol).await?;
        let period = match timeframe.unwrap_or(Timeframe::Hour1) {
            Timeframe::Hour1 => "60min",
            Timeframe::Hour4 => "4hour",
            Timeframe::Hour12 => "12hour",
            Timeframe::Day1 => "1day",
            other => {
                return Err(CcxtError::BadRequest {
                    message: format!("unsupported open interest timeframe {other}"),
                })
            }
        };
        let venue = Venue::of_market(&market);
        let path = contract_public_path(venue, "v1", "his_open_interest")?;
        let mut params = query([
            ("period", period.to_string()),
            ("amount_type", "1".to_string()),
            ("size", limit.unwrap_or(48).min(200).to_string()),
        ]);
        match venue {
            Venue::InverseFuture => {
                params.insert("symbol".into(), market.base.clone());
                if let Some(contract_type) = safe_string(&market.info, "contract_type") {
                    params.insert("contract_type".into(), contract_type);
                }
            }
            _ => {
                params.insert("contract_code".into(), market.id.clone());
            }
        }

        let body = self.public_get(venue.api(), &path, params).await?;
        let ticks = safe_list(data(&body, "open interest")?, "tick");
        let history = ticks
            .iter()
            .map(|item| self.parse_open_interest(item, Some(&market)))
            .collect();
        Ok(filter_by_since_limit(history, since, limit, |i: &OpenInterest| {
            i.timestamp
        }))
    }

    async fn fetch_settlement_history(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Settlement>> {
        let market = self.contract_market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = contract_public_path(venue, "v1", "settlement_records")?;
        let (field, value) = contract_id_field(venue, &market);
        let mut params = query([
            (field, value),
            ("page_size", limit.unwrap_or(50).min(50).to_string()),
        ]);
        if let Some(since) = since {
            params.insert("start_time".into(), since.to_string());
        }

        let body = self.public_get(venue.api(), &path, params).await?;
        let records = data_list(&body)
            .iter()
            .map(|item| self.parse_settlement(item, Some(&market)))
            .collect();
        Ok(filter_by_since_limit(records, since, limit, |s: &Settlement| {
            s.timestamp
        }))
    }

    async fn fetch_liquidations(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Liquidation>> {
        let market = self.contract_market(symbol).await?;
        let venue = Venue::of_market(&market);
        let path = contract_public_path(venue, "v3", "liquidation_orders")?;
        let (field, value) = v3_contract_field(venue, &market);
        let mut params = query([(field, value), ("trade_type", "0".to_string())]);
        if let Some(since) = since {
            params.insert("start_time".into(), since.to_string());
        }

        let body = self.public_get(venue.api(), &path, params).await?;
        let liquidations = data_list(&body)
            .iter()
            .filter_map(|item| self.parse_liquidation(item, Some(&market)))
            .collect();
        Ok(filter_by_since_limit(liquidations, since, limit, |l: &Liquidation| {
            l.timestamp
        }))
    }

    // === Margin lending ===

    async fn borrow_cross_margin(&self, code: &str, amount: Decimal) -> CcxtResult<MarginLoan> {
        self.borrow(MarginMode::Cross, None, code, amount).await
    }

    async fn borrow_isolated_margin(
        &self,
        symbol: &str,
        code: &str,
        amount: Decimal,
    ) -> CcxtResult<MarginLoan> {
        self.borrow(MarginMode::Isolated, Some(symbol), code, amount)
            .await
    }

    async fn repay_cross_margin(&self, code: &str, amount: Decimal) -> CcxtResult<MarginLoan> {
        self.repay(MarginMode::Cross, None, code, amount).await
    }

    async fn repay_isolated_margin(
        &self,
        symbol: &str,
        code: &str,
        amount: Decimal,
    ) -> CcxtResult<MarginLoan> {
        self.repay(MarginMode::Isolated, Some(symbol), code, amount)
            .await
    }

    async fn fetch_cross_borrow_rate(&self, code: &str) -> CcxtResult<CrossBorrowRate> {
        let body = self
            .private_get("spot", "/v1/cross-margin/loan-info", HashMap::new())
            .await?;
        let item = data_list(&body)
            .iter()
            .find(|item| {
                safe_string(item, "currency").map_or(false, |c| c.eq_ignore_ascii_case(code))
            })
            .ok_or_else(|| CcxtError::BadRequest {
                message: format!("{code} cannot be borrowed on cross margin"),
            })?;
        let timestamp = now_ms();
        Ok(CrossBorrowRate {
            currency: code.to_uppercase(),
            rate: safe_decimal_n(item, &["actual-rate", "interest-rate"]).unwrap_or_default(),
            period: Some(86_400_000),
            timestamp: Some(timestamp),
            datetime: iso8601(timestamp),
            info: item.clone(),
        })
    }

    async fn fetch_isolated_borrow_rate(&self, symbol: &str) -> CcxtResult<IsolatedBorrowRate> {
        let market = self.market(symbol).await?;
        let params = query([("symbols", market.id.clone())]);
        let body = self
            .private_get("spot", "/v1/margin/loan-info", params)
            .await?;
        let item = data_list(&body)
            .iter()
            .find(|item| safe_string(item, "symbol").as_deref() == Some(market.id.as_str()))
            .ok_or_else(|| CcxtError::BadSymbol {
                symbol: format!("{symbol} has no isolated margin"),
            })?;

        let rate_of = |currency: &str| {
            safe_list(item, "currencies")
                .iter()
                .find(|c| safe_string(c, "currency").map_or(false, |id| id.eq_ignore_ascii_case(currency)))
                .and_then(|c| safe_decimal_n(c, &["actual-rate", "interest-rate"]))
                .unwrap_or_default()
        };
        let timestamp = now_ms();
        Ok(IsolatedBorrowRate {
            symbol: market.symbol.clone(),
            base_rate: rate_of(&market.base),
            base: market.base.clone(),
            quote_rate: rate_of(&market.quote),
            quote: market.quote.clone(),
            period: Some(86_400_000),
            timestamp: Some(timestamp),
            datetime: iso8601(timestamp),
            info: item.clone(),
        })
    }

    /// Cross margin loans without a symbol, isolated loans of `symbol` otherwise
    async fn fetch_borrow_interest(
        &self,
        code: Option<&str>,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<BorrowInterest>> {
        let margin_mode = if symbol.is_some() {
            MarginMode::Isolated
        } else {
            MarginMode::Cross
        };
        let (account, market) = self.lending_account(margin_mode, symbol).await?;
        let path = format!("{}/loan-orders", account.loan_prefix()?);

        let mut params = HashMap::new();
        if let Some(market) = &market {
            params.insert("symbol".to_string(), market.id.clone());
        }
        if let Some(code) = code {
            params.insert("currency".to_string(), code.to_lowercase());
        }
        if let Some(limit) = limit {
            params.insert("size".to_string(), limit.min(100).to_string());
        }

        let body = self.private_get("spot", &path, params).await?;
        let interest = data_list(&body)
            .iter()
            .map(|item| self.parse_borrow_interest(item, margin_mode))
            .collect();
        Ok(filter_by_since_limit(interest, since, limit, |i: &BorrowInterest| {
            i.timestamp
        }))
    }

    // === Utilities ===

    fn market_id(&self, symbol: &str) -> Option<String> {
        read(&self.markets).get(symbol).map(|m| m.id.clone())
    }

    fn symbol(&self, market_id: &str) -> Option<String> {
        read(&self.markets_by_id).get(market_id).cloned()
    }

    /// `api` is `"{spot|contract}.{public|private}"`
    fn sign(
        &self,
        path: &str,
        api: &str,
        method: &str,
        params: &HashMap<String, String>,
        headers: Option<HashMap<String, String>>,
        body: Option<&str>,
    ) -> CcxtResult<SignedRequest> {
        let (family, access) = api.split_once('.').unwrap_or((api, "public"));
        let base = self.base_url(family)?;
        let method = method.to_ascii_uppercase();
        let is_get = method == "GET";

        let url = if access == "private" {
            let (Some(api_key), Some(secret)) = (self.config.api_key(), self.config.secret()) else {
                return Err(CcxtError::AuthenticationError {
                    message: "apiKey and secret are required for private endpoints".into(),
                });
            };
            let host = signing_host(base)?;
            let signed_params = if is_get { params.clone() } else { HashMap::new() };
            let timestamp = signature_timestamp(Utc::now());
            let query = Signer::new(api_key, secret).signed_query(
                &method,
                &host,
                path,
                &signed_params,
                &timestamp,
            )?;
            format!("{base}{path}?{query}")
        } else if params.is_empty() || !is_get {
            format!("{base}{path}")
        } else {
            let sorted: BTreeMap<&String, &String> = params.iter().collect();
            format!("{base}{path}?{}", encode_query(&sorted))
        };

        let mut headers = headers.unwrap_or_default();
        let content_type = if is_get {
            "application/x-www-form-urlencoded"
        } else {
            "application/json"
        };
        headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| content_type.to_string());

        let body = match body {
            Some(body) => Some(body.to_string()),
            None if !is_get && !params.is_empty() => Some(serde_json::to_string(params)?),
            None if !is_get => Some("{}".to_string()),
            None => None,
        };

        Ok(SignedRequest {
            url,
            method,
            headers,
            body,
        })
    }
}

impl Htx {
    async fn fetch_spot_trading_fees(
        &self,
        markets: &[Market],
    ) -> CcxtResult<HashMap<String, TradingFee>> {
        let mut fees = HashMap::new();
        for chunk in markets.chunks(10) {
            let ids: Vec<&str> = chunk.iter().map(|m| m.id.as_str()).collect();
            let params = query([("symbols", ids.join(","))]);
            let body = self
                .private_get("spot", "/v2/reference/transact-fee-rate", params)
                .await?;
            for item in data_list(&body) {
                let Some(id) = safe_string(item, "symbol") else {
                    continue;
                };
                let symbol = self.symbol_for(&id);
                let fee = TradingFee {
                    maker: safe_decimal_n(item, &["actualMakerRate", "makerFeeRate"])
                        .unwrap_or_default(),
                    taker: safe_decimal_n(item, &["actualTakerRate", "takerFeeRate"])
                        .unwrap_or_default(),
                    symbol: symbol.clone(),
                    percentage: true,
                    tier_based: false,
                    info: item.clone(),
                };
                fees.insert(symbol, fee);
            }
        }
        Ok(fees)
    }
}
