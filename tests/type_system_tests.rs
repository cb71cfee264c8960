//! Integration tests for the unified type system
//!
//! Market, Order, OrderRequest, OrderBook, Balance, Ledger and Timeframe

use ccxt_htx::types::*;
use rust_decimal_macros::dec;
use serde_json::json;

// === Market ===

#[test]
fn test_market_spot_creation() {
    let market = Market::spot(
        "btcusdt".into(),
        "BTC/USDT".into(),
        "BTC".into(),
        "USDT".into(),
    );

    assert_eq!(market.symbol, "BTC/USDT");
    assert_eq!(market.base, "BTC");
    assert_eq!(market.quote, "USDT");
    assert!(market.spot);
    assert!(!market.contract);
    assert!(market.active);
    assert_eq!(market.market_type, MarketType::Spot);
    assert_eq!(market.sub_type(), None);
}

#[test]
fn test_market_contract_creation() {
    let linear = Market::contract(
        "BTC-USDT".into(),
        "BTC/USDT:USDT".into(),
        "BTC".into(),
        "USDT".into(),
        "USDT".into(),
        MarketType::Swap,
        SubType::Linear,
    );
    assert!(linear.swap);
    assert!(!linear.future);
    assert_eq!(linear.sub_type(), Some(SubType::Linear));
    assert_eq!(linear.settle.as_deref(), Some("USDT"));

    let inverse = Market::contract(
        "BTC230929".into(),
        "BTC/USD:BTC-230929".into(),
        "BTC".into(),
        "USD".into(),
        "BTC".into(),
        MarketType::Future,
        SubType::Inverse,
    );
    assert!(inverse.future);
    assert_eq!(inverse.inverse, Some(true));
    assert_eq!(inverse.sub_type(), Some(SubType::Inverse));
}

#[test]
fn test_market_type_parsing() {
    assert_eq!("swap".parse::<MarketType>().ok(), Some(MarketType::Swap));
    assert_eq!("future".parse::<MarketType>().ok(), Some(MarketType::Future));
    assert_eq!("inverse".parse::<SubType>().ok(), Some(SubType::Inverse));
    assert!(MarketType::Swap.is_contract());
    assert!(!MarketType::Margin.is_contract());
}

#[test]
fn test_market_limits() {
    let limits = MarketLimits {
        price: MinMax::new(Some(dec!(0.01)), Some(dec!(1000000))),
        amount: MinMax::new(Some(dec!(0.0001)), Some(dec!(1000))),
        cost: MinMax::new(Some(dec!(5)), None),
        leverage: MinMax::default(),
    };

    assert_eq!(limits.price.min, Some(dec!(0.01)));
    assert_eq!(limits.amount.min, Some(dec!(0.0001)));
    assert_eq!(limits.cost.max, None);
}

// === Orders ===

#[test]
fn test_order_fill_fields() {
    let mut order = Order::new(
        "1".into(),
        "BTC/USDT".into(),
        OrderType::Limit,
        OrderSide::Buy,
        dec!(2),
    );
    order.filled = dec!(0.5);
    order.cost = Some(dec!(15000));
    order.derive_fill_fields();

    assert_eq!(order.remaining, Some(dec!(1.5)));
    assert_eq!(order.average, Some(dec!(30000)));
    assert!(order.is_open());
}

#[test]
fn test_order_with_timestamp_sets_datetime() {
    let order = Order::new(
        "1".into(),
        "BTC/USDT".into(),
        OrderType::Market,
        OrderSide::Sell,
        dec!(1),
    )
    .with_timestamp(Some(1_700_000_000_000));
    assert_eq!(order.datetime.as_deref(), Some("2023-11-14T22:13:20.000Z"));
}

#[test]
fn test_order_request_builders() {
    let request = OrderRequest::limit("BTC/USDT:USDT", OrderSide::Buy, dec!(3), dec!(35000))
        .with_take_profit(dec!(40000))
        .with_stop_loss(dec!(30000))
        .with_client_order_id("77")
        .with_param("marginMode", json!("isolated"));

    assert_eq!(request.price, Some(dec!(35000)));
    assert_eq!(request.take_profit_price, Some(dec!(40000)));
    assert_eq!(request.stop_loss_price, Some(dec!(30000)));
    assert_eq!(request.client_order_id.as_deref(), Some("77"));
    assert_eq!(
        request.params.as_ref().and_then(|p| p.get("marginMode")),
        Some(&json!("isolated"))
    );

    let maker = OrderRequest::limit("BTC/USDT", OrderSide::Sell, dec!(1), dec!(1))
        .with_time_in_force(TimeInForce::PO);
    assert!(maker.is_post_only());
}

#[test]
fn test_order_request_post_only_flag() {
    let request = OrderRequest::limit("BTC/USDT", OrderSide::Buy, dec!(1), dec!(1)).with_post_only(true);
    assert!(request.is_post_only());
}

#[test]
fn test_order_type_helpers() {
    assert!(OrderType::Market.is_market());
    assert!(OrderType::StopMarket.is_market());
    assert!(!OrderType::StopLimit.is_market());
    assert_eq!(OrderSide::parse("SELL"), Some(OrderSide::Sell));
    assert_eq!(OrderSide::Buy.as_str(), "buy");
}

// === Order book ===

#[test]
fn test_order_book_sort_and_limit() {
    let mut book = OrderBook::new("BTC/USDT".into());
    book.bids = vec![
        OrderBookEntry::new(dec!(99), dec!(1)),
        OrderBookEntry::new(dec!(100), dec!(2)),
    ];
    book.asks = vec![
        OrderBookEntry::new(dec!(102), dec!(1)),
        OrderBookEntry::new(dec!(101), dec!(3)),
    ];
    book.sort();
    assert_eq!(book.best_bid().map(|b| b.price), Some(dec!(100)));
    assert_eq!(book.best_ask().map(|a| a.price), Some(dec!(101)));
    assert_eq!(book.spread(), Some(dec!(1)));

    book.limit_depth(1);
    assert_eq!(book.bids.len(), 1);
    assert_eq!(book.asks.len(), 1);
}

// === Balances ===

#[test]
fn test_balance_totals() {
    let mut balances = Balances::new(None);
    balances.add("BTC", Balance::new(dec!(1), dec!(0.5)));
    balances.entry("USDT").total = Some(dec!(120));
    balances.entry("USDT").free = Some(dec!(100));
    balances.settle_totals();

    assert_eq!(balances.total("BTC"), Some(dec!(1.5)));
    assert_eq!(balances.used("USDT"), Some(dec!(20)));
    assert_eq!(balances.free("ETH"), None);
}

// === Ledger / positions ===

#[test]
fn test_ledger_signed_amount() {
    let entry = LedgerEntry::default().with_signed_amount(dec!(-2.5));
    assert_eq!(entry.direction, Some(LedgerDirection::Out));
    assert_eq!(entry.amount, Some(dec!(2.5)));
}

#[test]
fn test_position_side_and_margin_mode() {
    assert_eq!(PositionSide::parse("buy"), Some(PositionSide::Long));
    assert_eq!(PositionSide::parse("short"), Some(PositionSide::Short));
    assert_eq!("cross".parse::<MarginMode>().ok(), Some(MarginMode::Cross));
    assert_eq!(MarginMode::Isolated.as_str(), "isolated");
}

// === Timeframes ===

#[test]
fn test_timeframe_millis() {
    assert_eq!(Timeframe::Minute1.to_millis(), 60_000);
    assert_eq!(Timeframe::Hour4.to_millis(), 4 * 3_600_000);
    assert_eq!(Timeframe::Day1.to_millis(), 86_400_000);
    assert_eq!(Timeframe::Hour1.to_string(), "1h");
}
