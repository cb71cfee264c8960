//! Unified data model shared by every exchange

mod account;
mod balance;
mod currency;
mod exchange;
mod fee;
mod funding;
mod leverage;
mod liquidation;
mod margin;
mod market;
mod ohlcv;
mod open_interest;
mod order;
mod orderbook;
mod position;
mod settlement;
mod ticker;
mod trade;
mod transaction;

pub use account::{Account, DepositAddress, LedgerDirection, LedgerEntry, TransferEntry};
pub use balance::{Balance, Balances};
pub use currency::{Currency, CurrencyLimits, Network};
pub use exchange::{
    Exchange, ExchangeFeatures, ExchangeId, ExchangeUrls, SignedRequest, Timeframe,
};
pub use fee::{DepositWithdrawFee, ExchangeStatus, Fee, FeeInfo, NetworkFee, TradingFee};
pub use funding::{FundingHistory, FundingRate, FundingRateHistory};
pub use leverage::{Leverage, LeverageTier};
pub use liquidation::Liquidation;
pub use margin::{BorrowInterest, CrossBorrowRate, IsolatedBorrowRate, MarginLoan};
pub use market::{MarginModes, Market, MarketLimits, MarketPrecision, MarketType, MinMax, SubType};
pub use ohlcv::OHLCV;
pub use open_interest::OpenInterest;
pub use order::{Order, OrderRequest, OrderSide, OrderStatus, OrderType, TimeInForce};
pub use orderbook::{OrderBook, OrderBookEntry};
pub use position::{MarginMode, Position, PositionSide};
pub use settlement::Settlement;
pub use ticker::Ticker;
pub use trade::{TakerOrMaker, Trade};
pub use transaction::{Transaction, TransactionStatus, TransactionType};
