//! Exchange trait - unified exchange interface
//!
//! Rust rendition of the ccxt `Exchange` base class. Methods without a
//! default body are required; the rest answer `NotSupported` unless the
//! exchange overrides them.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{
    Account, Balances, BorrowInterest, CrossBorrowRate, Currency, DepositAddress,
    DepositWithdrawFee, ExchangeStatus, FundingHistory, FundingRate, FundingRateHistory,
    IsolatedBorrowRate, LedgerEntry, Leverage, LeverageTier, Liquidation, MarginLoan, Market,
    OpenInterest, Order, OrderBook, OrderRequest, OrderSide, OrderType, Position, Settlement,
    Ticker, Trade, TradingFee, Transaction, TransferEntry, OHLCV,
};
use crate::errors::{CcxtError, CcxtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Htx,
}

impl ExchangeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Htx => "htx",
        }
    }
}

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExchangeId {
    type Err = CcxtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "htx" | "huobi" | "huobipro" => Ok(ExchangeId::Htx),
            other => Err(CcxtError::not_supported(format!("exchange {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "3m")]
    Minute3,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "2h")]
    Hour2,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
    #[serde(rename = "1M")]
    Month1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute3 => "3m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour2 => "2h",
            Timeframe::Hour4 => "4h",
            Timeframe::Hour12 => "12h",
            Timeframe::Day1 => "1d",
            Timeframe::Week1 => "1w",
            Timeframe::Month1 => "1M",
        }
    }

    /// Duration in milliseconds (a month counts 30 days)
    pub fn to_millis(&self) -> i64 {
        const MINUTE: i64 = 60 * 1000;
        match self {
            Timeframe::Minute1 => MINUTE,
            Timeframe::Minute3 => 3 * MINUTE,
            Timeframe::Minute5 => 5 * MINUTE,
            Timeframe::Minute15 => 15 * MINUTE,
            Timeframe::Minute30 => 30 * MINUTE,
            Timeframe::Hour1 => 60 * MINUTE,
            Timeframe::Hour2 => 120 * MINUTE,
            Timeframe::Hour4 => 240 * MINUTE,
            Timeframe::Hour12 => 720 * MINUTE,
            Timeframe::Day1 => 1440 * MINUTE,
            Timeframe::Week1 => 7 * 1440 * MINUTE,
            Timeframe::Month1 => 30 * 1440 * MINUTE,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capability flags, mirrors ccxt `has`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeFeatures {
    // === Market types ===
    pub spot: bool,
    pub margin: bool,
    pub swap: bool,
    pub future: bool,

    // === Public ===
    pub fetch_markets: bool,
    pub fetch_currencies: bool,
    pub fetch_ticker: bool,
    pub fetch_tickers: bool,
    pub fetch_order_book: bool,
    pub fetch_trades: bool,
    pub fetch_ohlcv: bool,
    pub fetch_mark_ohlcv: bool,
    pub fetch_index_ohlcv: bool,
    pub fetch_status: bool,
    pub fetch_time: bool,

    // === Trading ===
    pub fetch_balance: bool,
    pub create_order: bool,
    pub create_orders: bool,
    pub create_stop_order: bool,
    pub create_take_profit_order: bool,
    pub create_stop_loss_order: bool,
    pub cancel_order: bool,
    pub cancel_orders: bool,
    pub cancel_all_orders: bool,
    pub fetch_order: bool,
    pub fetch_orders: bool,
    pub fetch_open_orders: bool,
    pub fetch_closed_orders: bool,
    pub fetch_my_trades: bool,
    pub fetch_order_trades: bool,
    pub fetch_trading_fee: bool,
    pub fetch_trading_fees: bool,

    // === Account / wallet ===
    pub fetch_accounts: bool,
    pub fetch_ledger: bool,
    pub fetch_deposits: bool,
    pub fetch_withdrawals: bool,
    pub fetch_deposit_address: bool,
    pub fetch_deposit_addresses_by_network: bool,
    pub fetch_deposit_withdraw_fees: bool,
    pub withdraw: bool,
    pub transfer: bool,

    // === Derivatives ===
    pub fetch_positions: bool,
    pub fetch_position: bool,
    pub set_leverage: bool,
    pub fetch_leverage_tiers: bool,
    pub fetch_funding_rate: bool,
    pub fetch_funding_rates: bool,
    pub fetch_funding_rate_history: bool,
    pub fetch_funding_history: bool,
    pub fetch_open_interest: bool,
    pub fetch_open_interest_history: bool,
    pub fetch_settlement_history: bool,
    pub fetch_liquidations: bool,

    // === Margin lending ===
    pub borrow_cross_margin: bool,
    pub borrow_isolated_margin: bool,
    pub repay_cross_margin: bool,
    pub repay_isolated_margin: bool,
    pub fetch_cross_borrow_rate: bool,
    pub fetch_isolated_borrow_rate: bool,
    pub fetch_borrow_interest: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExchangeUrls {
    pub logo: Option<String>,
    /// API family -> base url
    pub api: HashMap<String, String>,
    pub www: Option<String>,
    pub doc: Vec<String>,
    pub fees: Option<String>,
}

/// A fully prepared HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    pub url: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

#[async_trait]
pub trait Exchange: Send + Sync {
    // === Metadata ===

    fn id(&self) -> ExchangeId;

    fn name(&self) -> &str;

    fn version(&self) -> &str {
        "v1"
    }

    fn countries(&self) -> &[&str] {
        &[]
    }

    /// Milliseconds between requests
    fn rate_limit(&self) -> u64 {
        1000
    }

    fn has(&self) -> &ExchangeFeatures;

    /// Looks up a capability by its ccxt camelCase name
    fn has_feature(&self, feature: &str) -> bool {
        let f = self.has();
        match feature {
            "spot" => f.spot,
            "margin" => f.margin,
            "swap" => f.swap,
            "future" => f.future,
            "fetchMarkets" => f.fetch_markets,
            "fetchCurrencies" => f.fetch_currencies,
            "fetchTicker" => f.fetch_ticker,
            "fetchTickers" => f.fetch_tickers,
            "fetchOrderBook" => f.fetch_order_book,
            "fetchTrades" => f.fetch_trades,
            "fetchOHLCV" => f.fetch_ohlcv,
            "fetchMarkOHLCV" => f.fetch_mark_ohlcv,
            "fetchIndexOHLCV" => f.fetch_index_ohlcv,
            "fetchStatus" => f.fetch_status,
            "fetchTime" => f.fetch_time,
            "fetchBalance" => f.fetch_balance,
            "createOrder" => f.create_order,
            "createOrders" => f.create_orders,
            "createStopOrder" => f.create_stop_order,
            "createTakeProfitOrder" => f.create_take_profit_order,
            "createStopLossOrder" => f.create_stop_loss_order,
            "cancelOrder" => f.cancel_order,
            "cancelOrders" => f.cancel_orders,
            "cancelAllOrders" => f.cancel_all_orders,
            "fetchOrder" => f.fetch_order,
            "fetchOrders" => f.fetch_orders,
            "fetchOpenOrders" => f.fetch_open_orders,
            "fetchClosedOrders" => f.fetch_closed_orders,
            "fetchMyTrades" => f.fetch_my_trades,
            "fetchOrderTrades" => f.fetch_order_trades,
            "fetchTradingFee" => f.fetch_trading_fee,
            "fetchTradingFees" => f.fetch_trading_fees,
            "fetchAccounts" => f.fetch_accounts,
            "fetchLedger" => f.fetch_ledger,
            "fetchDeposits" => f.fetch_deposits,
            "fetchWithdrawals" => f.fetch_withdrawals,
            "fetchDepositAddress" => f.fetch_deposit_address,
            "fetchDepositAddressesByNetwork" => f.fetch_deposit_addresses_by_network,
            "fetchDepositWithdrawFees" => f.fetch_deposit_withdraw_fees,
            "withdraw" => f.withdraw,
            "transfer" => f.transfer,
            "fetchPositions" => f.fetch_positions,
            "fetchPosition" => f.fetch_position,
            "setLeverage" => f.set_leverage,
            "fetchLeverageTiers" => f.fetch_leverage_tiers,
            "fetchFundingRate" => f.fetch_funding_rate,
            "fetchFundingRates" => f.fetch_funding_rates,
            "fetchFundingRateHistory" => f.fetch_funding_rate_history,
            "fetchFundingHistory" => f.fetch_funding_history,
            "fetchOpenInterest" => f.fetch_open_interest,
            "fetchOpenInterestHistory" => f.fetch_open_interest_history,
            "fetchSettlementHistory" => f.fetch_settlement_history,
            "fetchLiquidations" => f.fetch_liquidations,
            "borrowCrossMargin" => f.borrow_cross_margin,
            "borrowIsolatedMargin" => f.borrow_isolated_margin,
            "repayCrossMargin" => f.repay_cross_margin,
            "repayIsolatedMargin" => f.repay_isolated_margin,
            "fetchCrossBorrowRate" => f.fetch_cross_borrow_rate,
            "fetchIsolatedBorrowRate" => f.fetch_isolated_borrow_rate,
            "fetchBorrowInterest" => f.fetch_borrow_interest,
            _ => false,
        }
    }

    fn urls(&self) -> &ExchangeUrls;

    /// Unified timeframe -> exchange period string
    fn timeframes(&self) -> &HashMap<Timeframe, String>;

    // === Public API ===

    /// Returns the cached markets, fetching them on first use or when `reload` is set
    async fn load_markets(&self, reload: bool) -> CcxtResult<HashMap<String, Market>>;

    async fn fetch_markets(&self) -> CcxtResult<Vec<Market>>;

    async fn fetch_currencies(&self) -> CcxtResult<HashMap<String, Currency>> {
        Err(CcxtError::not_supported("fetchCurrencies"))
    }

    async fn fetch_ticker(&self, symbol: &str) -> CcxtResult<Ticker>;

    async fn fetch_tickers(&self, symbols: Option<&[&str]>) -> CcxtResult<HashMap<String, Ticker>> {
        let _ = symbols;
        Err(CcxtError::not_supported("fetchTickers"))
    }

    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> CcxtResult<OrderBook>;

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>>;

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OHLCV>>;

    async fn fetch_mark_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OHLCV>> {
        let _ = (symbol, timeframe, since, limit);
        Err(CcxtError::not_supported("fetchMarkOHLCV"))
    }

    async fn fetch_index_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OHLCV>> {
        let _ = (symbol, timeframe, since, limit);
        Err(CcxtError::not_supported("fetchIndexOHLCV"))
    }

    /// Server time in milliseconds
    async fn fetch_time(&self) -> CcxtResult<i64> {
        Err(CcxtError::not_supported("fetchTime"))
    }

    async fn fetch_status(&self) -> CcxtResult<ExchangeStatus> {
        Err(CcxtError::not_supported("fetchStatus"))
    }

    // === Private API ===

    async fn fetch_balance(&self) -> CcxtResult<Balances>;

    async fn create_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> CcxtResult<Order>;

    async fn create_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
    ) -> CcxtResult<Order> {
        self.create_order(symbol, OrderType::Limit, side, amount, Some(price))
            .await
    }

    async fn create_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: Decimal,
    ) -> CcxtResult<Order> {
        self.create_order(symbol, OrderType::Market, side, amount, None)
            .await
    }

    async fn create_orders(&self, orders: Vec<OrderRequest>) -> CcxtResult<Vec<Order>> {
        let _ = orders;
        Err(CcxtError::not_supported("createOrders"))
    }

    /// Conditional order that triggers at `stop_price`
    async fn create_stop_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
        stop_price: Decimal,
    ) -> CcxtResult<Order> {
        let _ = (symbol, order_type, side, amount, price, stop_price);
        Err(CcxtError::not_supported("createStopOrder"))
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
        let _ = (symbol, order_type, side, amount, price, take_profit_price);
        Err(CcxtError::not_supported("createTakeProfitOrder"))
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
        let _ = (symbol, order_type, side, amount, price, stop_loss_price);
        Err(CcxtError::not_supported("createStopLossOrder"))
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> CcxtResult<Order>;

    async fn cancel_orders(&self, ids: &[&str], symbol: &str) -> CcxtResult<Vec<Order>> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            results.push(self.cancel_order(id, symbol).await?);
        }
        Ok(results)
    }

    async fn cancel_all_orders(&self, symbol: Option<&str>) -> CcxtResult<Vec<Order>> {
        let _ = symbol;
        Err(CcxtError::not_supported("cancelAllOrders"))
    }

    async fn fetch_order(&self, id: &str, symbol: &str) -> CcxtResult<Order>;

    async fn fetch_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::not_supported("fetchOrders"))
    }

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>>;

    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::not_supported("fetchClosedOrders"))
    }

    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::not_supported("fetchMyTrades"))
    }

    async fn fetch_order_trades(
        &self,
        id: &str,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>> {
        let _ = (id, symbol, since, limit);
        Err(CcxtError::not_supported("fetchOrderTrades"))
    }

    async fn fetch_trading_fee(&self, symbol: &str) -> CcxtResult<TradingFee> {
        let _ = symbol;
        Err(CcxtError::not_supported("fetchTradingFee"))
    }

    async fn fetch_trading_fees(&self) -> CcxtResult<HashMap<String, TradingFee>> {
        Err(CcxtError::not_supported("fetchTradingFees"))
    }

    // === Account / wallet ===

    async fn fetch_accounts(&self) -> CcxtResult<Vec<Account>> {
        Err(CcxtError::not_supported("fetchAccounts"))
    }

    async fn fetch_ledger(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<LedgerEntry>> {
        let _ = (code, since, limit);
        Err(CcxtError::not_supported("fetchLedger"))
    }

    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        let _ = (code, since, limit);
        Err(CcxtError::not_supported("fetchDeposits"))
    }

    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        let _ = (code, since, limit);
        Err(CcxtError::not_supported("fetchWithdrawals"))
    }

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
        network: Option<&str>,
    ) -> CcxtResult<Transaction> {
        let _ = (code, amount, address, tag, network);
        Err(CcxtError::not_supported("withdraw"))
    }

    async fn fetch_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> CcxtResult<DepositAddress> {
        let _ = (code, network);
        Err(CcxtError::not_supported("fetchDepositAddress"))
    }

    async fn fetch_deposit_addresses_by_network(
        &self,
        code: &str,
    ) -> CcxtResult<HashMap<String, DepositAddress>> {
        let _ = code;
        Err(CcxtError::not_supported("fetchDepositAddressesByNetwork"))
    }

    async fn fetch_deposit_withdraw_fees(
        &self,
        codes: Option<&[&str]>,
    ) -> CcxtResult<HashMap<String, DepositWithdrawFee>> {
        let _ = codes;
        Err(CcxtError::not_supported("fetchDepositWithdrawFees"))
    }

    /// Moves funds between two accounts of the user (`spot`, `margin`, `future`, `swap`, ...)
    async fn transfer(
        &self,
        code: &str,
        amount: Decimal,
        from_account: &str,
        to_account: &str,
    ) -> CcxtResult<TransferEntry> {
        let _ = (code, amount, from_account, to_account);
        Err(CcxtError::not_supported("transfer"))
    }

    // === Derivatives ===

    async fn fetch_positions(&self, symbols: Option<&[&str]>) -> CcxtResult<Vec<Position>> {
        let _ = symbols;
        Err(CcxtError::not_supported("fetchPositions"))
    }

    async fn fetch_position(&self, symbol: &str) -> CcxtResult<Position> {
        let _ = symbol;
        Err(CcxtError::not_supported("fetchPosition"))
    }

    async fn set_leverage(&self, leverage: Decimal, symbol: &str) -> CcxtResult<Leverage> {
        let _ = (leverage, symbol);
        Err(CcxtError::not_supported("setLeverage"))
    }

    async fn fetch_leverage_tiers(
        &self,
        symbols: Option<&[&str]>,
    ) -> CcxtResult<HashMap<String, Vec<LeverageTier>>> {
        let _ = symbols;
        Err(CcxtError::not_supported("fetchLeverageTiers"))
    }

    async fn fetch_funding_rate(&self, symbol: &str) -> CcxtResult<FundingRate> {
        let _ = symbol;
        Err(CcxtError::not_supported("fetchFundingRate"))
    }

    async fn fetch_funding_rates(
        &self,
        symbols: Option<&[&str]>,
    ) -> CcxtResult<HashMap<String, FundingRate>> {
        let _ = symbols;
        Err(CcxtError::not_supported("fetchFundingRates"))
    }

    async fn fetch_funding_rate_history(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<FundingRateHistory>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::not_supported("fetchFundingRateHistory"))
    }

    /// Funding fees paid or received by the user
    async fn fetch_funding_history(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<FundingHistory>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::not_supported("fetchFundingHistory"))
    }

    async fn fetch_open_interest(&self, symbol: &str) -> CcxtResult<OpenInterest> {
        let _ = symbol;
        Err(CcxtError::not_supported("fetchOpenInterest"))
    }

    async fn fetch_open_interest_history(
        &self,
        symbol: &str,
        timeframe: Option<Timeframe>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OpenInterest>> {
        let _ = (symbol, timeframe, since, limit);
        Err(CcxtError::not_supported("fetchOpenInterestHistory"))
    }

    async fn fetch_settlement_history(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Settlement>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::not_supported("fetchSettlementHistory"))
    }

    async fn fetch_liquidations(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Liquidation>> {
        let _ = (symbol, since, limit);
        Err(CcxtError::not_supported("fetchLiquidations"))
    }

    // === Margin lending ===

    async fn borrow_cross_margin(&self, code: &str, amount: Decimal) -> CcxtResult<MarginLoan> {
        let _ = (code, amount);
        Err(CcxtError::not_supported("borrowCrossMargin"))
    }

    async fn borrow_isolated_margin(
        &self,
        symbol: &str,
        code: &str,
        amount: Decimal,
    ) -> CcxtResult<MarginLoan> {
        let _ = (symbol, code, amount);
        Err(CcxtError::not_supported("borrowIsolatedMargin"))
    }

    async fn repay_cross_margin(&self, code: &str, amount: Decimal) -> CcxtResult<MarginLoan> {
        let _ = (code, amount);
        Err(CcxtError::not_supported("repayCrossMargin"))
    }

    async fn repay_isolated_margin(
        &self,
        symbol: &str,
        code: &str,
        amount: Decimal,
    ) -> CcxtResult<MarginLoan> {
        let _ = (symbol, code, amount);
        Err(CcxtError::not_supported("repayIsolatedMargin"))
    }

    async fn fetch_cross_borrow_rate(&self, code: &str) -> CcxtResult<CrossBorrowRate> {
        let _ = code;
        Err(CcxtError::not_supported("fetchCrossBorrowRate"))
    }

    async fn fetch_isolated_borrow_rate(&self, symbol: &str) -> CcxtResult<IsolatedBorrowRate> {
        let _ = symbol;
        Err(CcxtError::not_supported("fetchIsolatedBorrowRate"))
    }

    async fn fetch_borrow_interest(
        &self,
        code: Option<&str>,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<BorrowInterest>> {
        let _ = (code, symbol, since, limit);
        Err(CcxtError::not_supported("fetchBorrowInterest"))
    }

    // === Utilities ===

    /// Unified symbol -> exchange market id, from the loaded markets
    fn market_id(&self, symbol: &str) -> Option<String>;

    /// Exchange market id -> unified symbol, from the loaded markets
    fn symbol(&self, market_id: &str) -> Option<String>;

    /// Builds the signed request for `path` on the `api` family
    fn sign(
        &self,
        path: &str,
        api: &str,
        method: &str,
        params: &HashMap<String, String>,
        headers: Option<HashMap<String, String>>,
        body: Option<&str>,
    ) -> CcxtResult<SignedRequest>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe() {
        assert_eq!(Timeframe::Minute1.as_str(), "1m");
        assert_eq!(Timeframe::Hour1.to_millis(), 3_600_000);
        assert_eq!(Timeframe::Day1.to_millis(), 86_400_000);
        assert_eq!(Timeframe::Month1.to_string(), "1M");
    }

    #[test]
    fn test_exchange_id() {
        assert_eq!(ExchangeId::Htx.as_str(), "htx");
        assert_eq!(format!("{}", ExchangeId::Htx), "htx");
        assert_eq!("Huobi".parse::<ExchangeId>().ok(), Some(ExchangeId::Htx));
        assert!("binance".parse::<ExchangeId>().is_err());
    }
}
