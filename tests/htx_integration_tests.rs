//! Integration tests for the HTX adapter against a mock HTTP server
//!
//! Both API families (spot and contract) are pointed at one wiremock server.

use ccxt_htx::exchanges::htx::{OrderKind, Venue};
use ccxt_htx::types::{
    LedgerDirection, MarginMode, MarketType, OrderRequest, OrderSide, OrderStatus, OrderType,
    PositionSide, SubType, Timeframe,
};
use ccxt_htx::{CcxtError, Exchange, ExchangeConfig, Htx, HtxOptions, HtxParams};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn body_lacks(key: &'static str) -> impl Fn(&Request) -> bool {
    move |req: &Request| {
        serde_json::from_slice::<serde_json::Value>(&req.body)
            .map_or(false, |body| body.get(key).is_none())
    }
}

fn is_signed(req: &Request) -> bool {
    let keys: Vec<String> = req.url.query_pairs().map(|(k, _)| k.into_owned()).collect();
    ["AccessKeyId", "SignatureMethod", "SignatureVersion", "Timestamp", "Signature"]
        .iter()
        .all(|k| keys.iter().any(|key| key == k))
}

async fn setup(credentials: bool) -> (MockServer, Htx) {
    setup_with(credentials, vec![Venue::Spot, Venue::Linear]).await
}

async fn setup_with(credentials: bool, venues: Vec<Venue>) -> (MockServer, Htx) {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/common/symbols"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": [{
                "symbol": "btcusdt",
                "base-currency": "btc",
                "quote-currency": "usdt",
                "state": "online",
                "amount-precision": 6,
                "price-precision": 2,
                "value-precision": 8,
                "min-order-amt": "0.0001",
                "min-order-value": 5,
                "leverage-ratio": 5,
                "super-margin-leverage-ratio": 3
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/linear-swap-api/v1/swap_contract_info"))
        .and(query_param("business_type", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "ts": 1_700_000_000_000_i64,
            "data": [{
                "symbol": "BTC",
                "contract_code": "BTC-USDT",
                "contract_size": 0.001,
                "price_tick": 0.1,
                "contract_status": 1,
                "business_type": "swap",
                "support_margin_mode": "all",
                "trade_partition": "USDT",
                "delivery_date": ""
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/swap-api/v1/swap_contract_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": [{
                "symbol": "BTC",
                "contract_code": "BTC-USD",
                "contract_size": 100,
                "price_tick": 0.5,
                "contract_status": 1,
                "delivery_date": ""
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/contract_contract_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": [{
                "symbol": "BTC",
                "contract_code": "BTC230929",
                "contract_type": "quarter",
                "contract_size": 100,
                "price_tick": 0.01,
                "delivery_date": "20230929",
                "contract_status": 1
            }]
        })))
        .mount(&server)
        .await;

    let mut config = ExchangeConfig::new()
        .with_rate_limit_ms(1)
        .with_api_url("spot", server.uri())
        .with_api_url("contract", server.uri());
    if credentials {
        config = config.with_api_key("test-key").with_api_secret("test-secret");
    }
    let options = HtxOptions::default().with_fetch_markets(venues);
    let exchange = Htx::with_options(config, options).unwrap();
    (server, exchange)
}

async fn mount_accounts(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/account/accounts"))
        .and(query_param("AccessKeyId", "test-key"))
        .and(is_signed)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": [
                {"id": 100, "type": "spot", "subtype": "", "state": "working"},
                {"id": 200, "type": "super-margin", "subtype": "", "state": "working"}
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_load_markets_across_venues() {
    let (_server, exchange) = setup(false).await;
    let markets = exchange.load_markets(false).await.unwrap();

    let spot = &markets["BTC/USDT"];
    assert_eq!(spot.id, "btcusdt");
    assert!(spot.spot);
    assert!(spot.margin);
    assert_eq!(spot.precision.price, Some(2));

    let swap = &markets["BTC/USDT:USDT"];
    assert_eq!(swap.id, "BTC-USDT");
    assert!(swap.swap);
    assert_eq!(swap.linear, Some(true));
    assert_eq!(swap.contract_size, Some(dec!(0.001)));
    assert_eq!(swap.precision.price, Some(1));

    assert_eq!(exchange.market_id("BTC/USDT:USDT").as_deref(), Some("BTC-USDT"));
    assert_eq!(exchange.symbol("btcusdt").as_deref(), Some("BTC/USDT"));
}

#[tokio::test]
async fn test_unknown_symbol_is_bad_symbol() {
    let (_server, exchange) = setup(false).await;
    let err = exchange.fetch_ticker("DOGE/BTC").await.unwrap_err();
    assert!(matches!(err, CcxtError::BadSymbol { .. }));
}

#[tokio::test]
async fn test_fetch_ticker_falls_back_to_envelope_timestamp() {
    let (server, exchange) = setup(false).await;
    Mock::given(method("GET"))
        .and(path("/market/detail/merged"))
        .and(query_param("symbol", "btcusdt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "ts": 1_700_000_000_000_i64,
            "tick": {
                "open": 34000, "close": 35000, "high": 36000, "low": 33000,
                "amount": 100, "vol": 3500000,
                "bid": [34999, 1.5], "ask": [35001, 2]
            }
        })))
        .mount(&server)
        .await;

    let ticker = exchange.fetch_ticker("BTC/USDT").await.unwrap();
    assert_eq!(ticker.symbol, "BTC/USDT");
    assert_eq!(ticker.timestamp, Some(1_700_000_000_000));
    assert_eq!(ticker.last, Some(dec!(35000)));
    assert_eq!(ticker.bid, Some(dec!(34999)));
    assert_eq!(ticker.bid_volume, Some(dec!(1.5)));
    assert_eq!(ticker.ask, Some(dec!(35001)));
    assert_eq!(ticker.quote_volume, Some(dec!(3500000)));
}

#[tokio::test]
async fn test_fetch_order_book_uses_step0_and_depth() {
    let (server, exchange) = setup(false).await;
    Mock::given(method("GET"))
        .and(path("/market/depth"))
        .and(query_param("symbol", "btcusdt"))
        .and(query_param("type", "step0"))
        .and(query_param("depth", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "ts": 1_700_000_000_000_i64,
            "tick": {
                "bids": [[100, 1], [99, 2], [98, 3], [97, 4], [96, 5]],
                "asks": [[101, 1], [102, 2], [103, 3], [104, 4], [105, 5]]
            }
        })))
        .mount(&server)
        .await;

    let book = exchange.fetch_order_book("BTC/USDT", Some(3)).await.unwrap();
    assert_eq!(book.bids.len(), 3);
    assert_eq!(book.asks.len(), 3);
    assert_eq!(book.bids[0].price, dec!(100));
    assert_eq!(book.asks[0].price, dec!(101));
    assert_eq!(book.timestamp, Some(1_700_000_000_000));
}

#[tokio::test]
async fn test_private_call_without_credentials() {
    let (_server, exchange) = setup(false).await;
    let err = exchange.fetch_balance().await.unwrap_err();
    assert!(matches!(err, CcxtError::AuthenticationError { .. }));
}

#[tokio::test]
async fn test_spot_balance_is_signed_and_account_cached() {
    let (server, exchange) = setup(true).await;
    mount_accounts(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/account/accounts/100/balance"))
        .and(is_signed)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {
                "id": 100,
                "type": "spot",
                "list": [
                    {"currency": "btc", "type": "trade", "balance": "1.5"},
                    {"currency": "btc", "type": "frozen", "balance": "0.5"},
                    {"currency": "usdt", "type": "trade", "balance": "100"}
                ]
            }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let balances = exchange.fetch_balance().await.unwrap();
    assert_eq!(balances.free("BTC"), Some(dec!(1.5)));
    assert_eq!(balances.used("BTC"), Some(dec!(0.5)));
    assert_eq!(balances.total("BTC"), Some(dec!(2.0)));
    assert_eq!(balances.total("USDT"), Some(dec!(100)));

    // account id comes from the cache the second time
    exchange.fetch_balance().await.unwrap();
}

#[tokio::test]
async fn test_contract_balance_posts_to_cross_account_info() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v1/swap_cross_account_info"))
        .and(is_signed)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "ts": 1_700_000_000_000_i64,
            "data": [{
                "margin_asset": "USDT",
                "margin_balance": 120,
                "margin_frozen": 20,
                "withdraw_available": 100
            }]
        })))
        .mount(&server)
        .await;

    let params = HtxParams::new().market_type(MarketType::Swap);
    let balances = exchange.fetch_balance_with(&params).await.unwrap();
    assert_eq!(balances.free("USDT"), Some(dec!(100)));
    assert_eq!(balances.used("USDT"), Some(dec!(20)));
    assert_eq!(balances.total("USDT"), Some(dec!(120)));
}

#[tokio::test]
async fn test_inverse_cross_margin_is_rejected_before_any_request() {
    let (_server, exchange) = setup(true).await;
    let params = HtxParams::new()
        .market_type(MarketType::Swap)
        .sub_type(SubType::Inverse)
        .margin_mode(MarginMode::Cross);
    let err = exchange.fetch_balance_with(&params).await.unwrap_err();
    assert!(matches!(err, CcxtError::NotSupported { .. }));
}

#[tokio::test]
async fn test_create_spot_limit_order() {
    let (server, exchange) = setup(true).await;
    mount_accounts(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/order/orders/place"))
        .and(is_signed)
        .and(body_partial_json(json!({
            "account-id": "100",
            "symbol": "btcusdt",
            "type": "buy-limit",
            "amount": "0.5",
            "price": "30000",
            "source": "spot-api"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": "356501383558845"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = exchange
        .create_order("BTC/USDT", OrderType::Limit, OrderSide::Buy, dec!(0.5), Some(dec!(30000)))
        .await
        .unwrap();
    assert_eq!(order.id, "356501383558845");
    assert_eq!(order.symbol, "BTC/USDT");
    assert_eq!(order.price, Some(dec!(30000)));
}

#[tokio::test]
async fn test_spot_market_buy_needs_price() {
    let (server, exchange) = setup(true).await;
    mount_accounts(&server).await;
    let err = exchange
        .create_order("BTC/USDT", OrderType::Market, OrderSide::Buy, dec!(0.5), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CcxtError::InvalidOrder { .. }));
}

#[tokio::test]
async fn test_spot_market_buy_sends_cost() {
    let (server, exchange) = setup(true).await;
    mount_accounts(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/order/orders/place"))
        .and(body_partial_json(json!({"type": "buy-market", "amount": "15000"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "data": "1"})))
        .expect(1)
        .mount(&server)
        .await;

    exchange
        .create_order("BTC/USDT", OrderType::Market, OrderSide::Buy, dec!(0.5), Some(dec!(30000)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_contract_market_order() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v1/swap_cross_order"))
        .and(is_signed)
        .and(body_partial_json(json!({
            "contract_code": "BTC-USDT",
            "volume": 2,
            "direction": "sell",
            "offset": "open",
            "lever_rate": 1,
            "order_price_type": "opponent"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "ts": 1_700_000_000_000_i64,
            "data": {"order_id": 784017187857760256_i64, "order_id_str": "784017187857760256"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = exchange
        .create_order("BTC/USDT:USDT", OrderType::Market, OrderSide::Sell, dec!(2), None)
        .await
        .unwrap();
    assert_eq!(order.id, "784017187857760256");
    assert_eq!(order.reduce_only, Some(false));
}

#[tokio::test]
async fn test_create_contract_trigger_order() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v1/swap_cross_trigger_order"))
        .and(body_partial_json(json!({
            "contract_code": "BTC-USDT",
            "trigger_type": "ge",
            "trigger_price": "36000",
            "order_price": "36100",
            "order_price_type": "limit",
            "offset": "open"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"order_id": 1, "order_id_str": "1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = exchange
        .create_stop_order(
            "BTC/USDT:USDT",
            OrderType::StopLimit,
            OrderSide::Buy,
            dec!(1),
            Some(dec!(36100)),
            dec!(36000),
        )
        .await
        .unwrap();
    assert_eq!(order.trigger_price, Some(dec!(36000)));
}

#[tokio::test]
async fn test_fractional_contract_amount_is_invalid() {
    let (_server, exchange) = setup(true).await;
    let err = exchange
        .create_order("BTC/USDT:USDT", OrderType::Limit, OrderSide::Buy, dec!(1.5), Some(dec!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, CcxtError::InvalidOrder { .. }));
}

#[tokio::test]
async fn test_contract_cancel_error_envelope() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v1/swap_cross_cancel"))
        .and(body_partial_json(json!({"order_id": "42", "contract_code": "BTC-USDT"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "err_code": 1061,
            "err_msg": "This order doesnt exist.",
            "ts": 1_700_000_000_000_i64
        })))
        .mount(&server)
        .await;

    let err = exchange.cancel_order("42", "BTC/USDT:USDT").await.unwrap_err();
    assert!(matches!(err, CcxtError::OrderNotFound { .. }));
}

#[tokio::test]
async fn test_spot_error_envelope_maps_to_insufficient_funds() {
    let (server, exchange) = setup(true).await;
    mount_accounts(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/order/orders/place"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "err-code": "account-frozen-balance-insufficient-error",
            "err-msg": "trade account balance is not enough",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = exchange
        .create_order("BTC/USDT", OrderType::Limit, OrderSide::Sell, dec!(1), Some(dec!(40000)))
        .await
        .unwrap_err();
    assert!(matches!(err, CcxtError::InsufficientFunds { .. }));
}

#[tokio::test]
async fn test_fetch_positions_defaults_to_linear_swaps() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v1/swap_cross_position_info"))
        .and(is_signed)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "ts": 1_700_000_000_000_i64,
            "data": [{
                "contract_code": "BTC-USDT",
                "volume": 3,
                "direction": "buy",
                "lever_rate": 10,
                "last_price": 35000,
                "cost_hold": 34000,
                "profit_unreal": 3,
                "position_margin": 10.5,
                "margin_mode": "cross"
            }]
        })))
        .mount(&server)
        .await;

    let positions = exchange.fetch_positions(None).await.unwrap();
    assert_eq!(positions.len(), 1);
    let position = &positions[0];
    assert_eq!(position.symbol, "BTC/USDT:USDT");
    assert_eq!(position.contracts, Some(dec!(3)));
    assert_eq!(position.side, Some(PositionSide::Long));
    assert_eq!(position.notional, Some(dec!(105)));
    assert_eq!(position.margin_mode, Some(MarginMode::Cross));
    assert_eq!(position.entry_price, Some(dec!(34000)));
}

#[tokio::test]
async fn test_funding_rate_on_spot_is_bad_symbol() {
    let (_server, exchange) = setup(false).await;
    let err = exchange.fetch_funding_rate("BTC/USDT").await.unwrap_err();
    assert!(matches!(err, CcxtError::BadSymbol { .. }));
}

#[tokio::test]
async fn test_fetch_open_orders_on_contracts_needs_symbol() {
    let (_server, exchange) = setup(true).await;
    let params = HtxParams::new().market_type(MarketType::Swap);
    let err = exchange
        .fetch_open_orders_with(None, None, None, &params)
        .await
        .unwrap_err();
    assert!(matches!(err, CcxtError::ArgumentsRequired { .. }));
}

#[tokio::test]
async fn test_server_error_without_envelope() {
    let (server, exchange) = setup(false).await;
    Mock::given(method("GET"))
        .and(path("/v1/common/timestamp"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = exchange.fetch_time().await.unwrap_err();
    assert!(matches!(err, CcxtError::ExchangeNotAvailable { .. }));
    assert!(err.is_retryable());
}

// === Transfers ===

#[tokio::test]
async fn test_transfer_spot_to_cross_margin() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/v1/cross-margin/transfer-in"))
        .and(is_signed)
        .and(body_partial_json(json!({"currency": "usdt", "amount": "10"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "data": 1001})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/cross-margin/transfer-out"))
        .and(body_partial_json(json!({"currency": "usdt", "amount": "4"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "data": 1002})))
        .expect(1)
        .mount(&server)
        .await;

    let entry = exchange.transfer("USDT", dec!(10), "spot", "cross").await.unwrap();
    assert_eq!(entry.id.as_deref(), Some("1001"));
    assert_eq!(entry.to_account.as_deref(), Some("cross"));

    let back = exchange.transfer("USDT", dec!(4), "cross", "spot").await.unwrap();
    assert_eq!(back.id.as_deref(), Some("1002"));
}

#[tokio::test]
async fn test_transfer_to_isolated_margin_names_the_market() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/v1/dw/transfer-in/margin"))
        .and(body_partial_json(json!({"symbol": "btcusdt", "currency": "usdt", "amount": "25"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "data": 2001})))
        .expect(1)
        .mount(&server)
        .await;

    let entry = exchange
        .transfer("USDT", dec!(25), "spot", "BTC/USDT")
        .await
        .unwrap();
    assert_eq!(entry.id.as_deref(), Some("2001"));

    let err = exchange.transfer("USDT", dec!(25), "spot", "margin").await.unwrap_err();
    assert!(matches!(err, CcxtError::ArgumentsRequired { .. }));

    let err = exchange.transfer("USDT", dec!(25), "cross", "swap").await.unwrap_err();
    assert!(matches!(err, CcxtError::BadRequest { .. }));
}

#[tokio::test]
async fn test_transfer_spot_to_linear_swap() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/v2/account/transfer"))
        .and(body_partial_json(json!({
            "from": "spot",
            "to": "linear-swap",
            "currency": "usdt",
            "amount": "10",
            "margin-account": "USDT"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200, "success": true, "data": 176104252
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entry = exchange.transfer("USDT", dec!(10), "spot", "linear").await.unwrap();
    assert_eq!(entry.id.as_deref(), Some("176104252"));
}

// === Funding ===

#[tokio::test]
async fn test_withdraw_sends_chain_and_tag() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/v1/dw/withdraw/api/create"))
        .and(is_signed)
        .and(body_partial_json(json!({
            "address": "TXyz",
            "amount": "50",
            "currency": "usdt",
            "addr-tag": "memo",
            "chain": "trc20usdt"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "data": 700})))
        .expect(1)
        .mount(&server)
        .await;

    let tx = exchange
        .withdraw("USDT", dec!(50), "TXyz", Some("memo"), Some("TRC20USDT"))
        .await
        .unwrap();
    assert_eq!(tx.id, "700");
    assert_eq!(tx.network.as_deref(), Some("trc20usdt"));
    assert_eq!(tx.tag.as_deref(), Some("memo"));
}

#[tokio::test]
async fn test_fetch_ledger_signs_amount_direction() {
    let (server, exchange) = setup(true).await;
    mount_accounts(&server).await;
    Mock::given(method("GET"))
        .and(path("/v2/account/ledger"))
        .and(query_param("accountId", "100"))
        .and(query_param("currency", "usdt"))
        .and(is_signed)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "success",
            "data": [{
                "accountId": 100,
                "currency": "usdt",
                "transactAmt": -5,
                "transactType": "transfer",
                "transferer": 100,
                "transferee": 200,
                "transactId": 9,
                "transactTime": 1_700_000_000_000_i64
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entries = exchange.fetch_ledger(Some("USDT"), None, None).await.unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.direction, Some(LedgerDirection::Out));
    assert_eq!(entry.amount, Some(dec!(5)));
    assert_eq!(entry.currency.as_deref(), Some("USDT"));
    assert_eq!(entry.entry_type.as_deref(), Some("transfer"));
}

// === Order history and cancellation ===

#[tokio::test]
async fn test_contract_order_history_uses_v3_hisorders() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v3/swap_cross_hisorders"))
        .and(body_partial_json(json!({
            "contract": "BTC-USDT",
            "trade_type": 0,
            "type": 2,
            "status": "5,6,7"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": [{
                "order_id_str": "11",
                "contract_code": "BTC-USDT",
                "direction": "buy",
                "volume": 2,
                "trade_volume": 2,
                "price": 35000,
                "order_price_type": "limit",
                "status": 6,
                "create_date": 1_700_000_000_000_i64
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v3/swap_cross_hisorders"))
        .and(body_partial_json(json!({"contract": "BTC-USDT", "type": 1, "status": "0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let closed = exchange
        .fetch_closed_orders(Some("BTC/USDT:USDT"), None, None)
        .await
        .unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].id, "11");
    assert_eq!(closed[0].status, OrderStatus::Closed);
    assert_eq!(closed[0].filled, dec!(2));

    let all = exchange.fetch_orders(Some("BTC/USDT:USDT"), None, None).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_cancel_all_orders_per_venue() {
    let (server, exchange) = setup(true).await;
    mount_accounts(&server).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v1/swap_cross_cancelall"))
        .and(body_partial_json(json!({"contract_code": "BTC-USDT"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"errors": [], "successes": "21,22"},
            "ts": 1_700_000_000_000_i64
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/order/orders/batchCancelOpenOrders"))
        .and(body_partial_json(json!({"account-id": "100", "symbol": "btcusdt"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"success-count": 2, "failed-count": 0, "next-id": -1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let canceled = exchange.cancel_all_orders(Some("BTC/USDT:USDT")).await.unwrap();
    let ids: Vec<&str> = canceled.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["21", "22"]);
    assert!(canceled.iter().all(|o| o.status == OrderStatus::Canceled));

    let spot = exchange.cancel_all_orders(Some("BTC/USDT")).await.unwrap();
    assert!(spot.is_empty());
}

// === Conditional orders ===

#[tokio::test]
async fn test_take_profit_order_sends_tp_fields() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v1/swap_cross_tpsl_order"))
        .and(body_partial_json(json!({
            "contract_code": "BTC-USDT",
            "volume": 1,
            "direction": "sell",
            "tp_trigger_price": "39900",
            "tp_order_price": "40000",
            "tp_order_price_type": "limit"
        })))
        .and(body_lacks("sl_trigger_price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"tp_order": {"order_id": 31, "order_id_str": "31"}, "sl_order": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = exchange
        .create_take_profit_order(
            "BTC/USDT:USDT",
            OrderType::Limit,
            OrderSide::Sell,
            dec!(1),
            Some(dec!(40000)),
            dec!(39900),
        )
        .await
        .unwrap();
    assert_eq!(order.id, "31");
}

#[tokio::test]
async fn test_stop_loss_market_leg_uses_optimal_5() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v1/swap_cross_tpsl_order"))
        .and(body_partial_json(json!({
            "sl_trigger_price": "30000",
            "sl_order_price_type": "optimal_5"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"tp_order": null, "sl_order": {"order_id": 32, "order_id_str": "32"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = exchange
        .create_stop_loss_order(
            "BTC/USDT:USDT",
            OrderType::Market,
            OrderSide::Sell,
            dec!(1),
            None,
            dec!(30000),
        )
        .await
        .unwrap();
    assert_eq!(order.id, "32");
}

#[tokio::test]
async fn test_conditional_orders_need_their_prices() {
    let (_server, exchange) = setup(true).await;
    let request = OrderRequest::limit("BTC/USDT:USDT", OrderSide::Buy, dec!(1), dec!(30000));

    let trigger = HtxParams::new().kind(OrderKind::Trigger);
    let err = exchange.create_order_with(&request, &trigger).await.unwrap_err();
    assert!(matches!(err, CcxtError::ArgumentsRequired { .. }));

    let tpsl = HtxParams::new().kind(OrderKind::TpSl);
    let err = exchange.create_order_with(&request, &tpsl).await.unwrap_err();
    assert!(matches!(err, CcxtError::ArgumentsRequired { .. }));
}

#[tokio::test]
async fn test_contract_prices_snap_to_tick() {
    let (server, exchange) = setup_with(true, vec![Venue::InverseSwap]).await;
    Mock::given(method("POST"))
        .and(path("/swap-api/v1/swap_order"))
        .and(body_partial_json(json!({
            "contract_code": "BTC-USD",
            "price": "30000.5",
            "order_price_type": "limit"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"order_id": 41, "order_id_str": "41"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    exchange
        .create_order("BTC/USD:BTC", OrderType::Limit, OrderSide::Buy, dec!(1), Some(dec!(30000.3)))
        .await
        .unwrap();
}

// === Market data ===

#[tokio::test]
async fn test_contract_ohlcv_since_sends_from_and_to() {
    let (server, exchange) = setup(false).await;
    Mock::given(method("GET"))
        .and(path("/linear-swap-ex/market/history/kline"))
        .and(query_param("contract_code", "BTC-USDT"))
        .and(query_param("period", "60min"))
        .and(query_param("from", "1700000000"))
        .and(query_param("to", "1700007200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "ch": "market.BTC-USDT.kline.60min",
            "data": [
                {"id": 1_700_003_600_i64, "open": 2, "close": 3, "high": 4, "low": 1, "amount": 5},
                {"id": 1_700_000_000_i64, "open": 1, "close": 2, "high": 3, "low": 0.5, "amount": 10}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let candles = exchange
        .fetch_ohlcv("BTC/USDT:USDT", Timeframe::Hour1, Some(1_700_000_000_000), Some(3))
        .await
        .unwrap();
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].timestamp, 1_700_000_000_000);
    assert_eq!(candles[1].timestamp, 1_700_003_600_000);
}

// === Derivatives ===

#[tokio::test]
async fn test_funding_history_margin_account_per_venue() {
    let (server, exchange) =
        setup_with(true, vec![Venue::Spot, Venue::Linear, Venue::InverseSwap]).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v3/swap_financial_record"))
        .and(body_partial_json(json!({"mar_acct": "USDT", "contract": "BTC-USDT", "type": "30,31"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": [{
                "id": 51,
                "ts": 1_700_000_000_000_i64,
                "asset": "USDT",
                "contract": "BTC-USDT",
                "amount": -0.25
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/swap-api/v3/swap_financial_record"))
        .and(body_partial_json(json!({"contract": "BTC-USD", "type": "30,31"})))
        .and(body_lacks("mar_acct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let linear = exchange
        .fetch_funding_history(Some("BTC/USDT:USDT"), None, None)
        .await
        .unwrap();
    assert_eq!(linear.len(), 1);
    assert_eq!(linear[0].amount, dec!(-0.25));
    assert_eq!(linear[0].code, "USDT");

    let inverse = exchange
        .fetch_funding_history(Some("BTC/USD:BTC"), None, None)
        .await
        .unwrap();
    assert!(inverse.is_empty());
}

#[tokio::test]
async fn test_open_interest_history_periods() {
    let (server, exchange) = setup(false).await;
    Mock::given(method("GET"))
        .and(path("/linear-swap-api/v1/swap_his_open_interest"))
        .and(query_param("contract_code", "BTC-USDT"))
        .and(query_param("period", "4hour"))
        .and(query_param("amount_type", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {
                "symbol": "BTC",
                "contract_code": "BTC-USDT",
                "tick": [{"volume": 1000, "amount_type": 1, "value": 35000, "ts": 1_700_000_000_000_i64}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = exchange
        .fetch_open_interest_history("BTC/USDT:USDT", Some(Timeframe::Hour4), None, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].open_interest_amount, Some(dec!(1000)));

    let err = exchange
        .fetch_open_interest_history("BTC/USDT:USDT", Some(Timeframe::Minute5), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CcxtError::BadRequest { .. }));
}

#[tokio::test]
async fn test_fetch_settlement_history() {
    let (server, exchange) = setup(false).await;
    Mock::given(method("GET"))
        .and(path("/linear-swap-api/v1/swap_settlement_records"))
        .and(query_param("contract_code", "BTC-USDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {
                "settlement_record": [{
                    "contract_code": "BTC-USDT",
                    "settlement_time": 1_700_000_000_000_i64,
                    "settlement_price": 35000.5
                }],
                "total_page": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = exchange
        .fetch_settlement_history("BTC/USDT:USDT", None, None)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].symbol, "BTC/USDT:USDT");
    assert_eq!(records[0].price, Some(dec!(35000.5)));
}

#[tokio::test]
async fn test_fetch_liquidations() {
    let (server, exchange) = setup(false).await;
    Mock::given(method("GET"))
        .and(path("/linear-swap-api/v3/swap_liquidation_orders"))
        .and(query_param("contract", "BTC-USDT"))
        .and(query_param("trade_type", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "msg": "",
            "data": [{
                "contract_code": "BTC-USDT",
                "created_at": 1_700_000_000_000_i64,
                "direction": "sell",
                "volume": 10,
                "amount": 0.01,
                "price": 35000,
                "trade_turnover": 350
            }],
            "ts": 1_700_000_000_000_i64
        })))
        .expect(1)
        .mount(&server)
        .await;

    let liquidations = exchange
        .fetch_liquidations("BTC/USDT:USDT", None, None)
        .await
        .unwrap();
    assert_eq!(liquidations.len(), 1);
    assert_eq!(liquidations[0].price, dec!(35000));
    assert_eq!(liquidations[0].side, Some(OrderSide::Sell));
}

#[tokio::test]
async fn test_set_leverage() {
    let (server, exchange) = setup(true).await;
    Mock::given(method("POST"))
        .and(path("/linear-swap-api/v1/swap_cross_switch_lever_rate"))
        .and(body_partial_json(json!({"contract_code": "BTC-USDT", "lever_rate": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"contract_code": "BTC-USDT", "lever_rate": 5, "margin_mode": "cross"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let leverage = exchange.set_leverage(dec!(5), "BTC/USDT:USDT").await.unwrap();
    assert_eq!(leverage.long_leverage, Some(dec!(5)));
    assert_eq!(leverage.margin_mode, Some(MarginMode::Cross));

    let err = exchange.set_leverage(dec!(2.5), "BTC/USDT:USDT").await.unwrap_err();
    assert!(matches!(err, CcxtError::BadRequest { .. }));
}

#[tokio::test]
async fn test_inverse_future_leverage_tiers_resolve_by_base() {
    let (server, exchange) = setup_with(false, vec![Venue::InverseFuture]).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/contract_adjustfactor"))
        .and(query_param("symbol", "BTC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": [{
                "symbol": "BTC",
                "list": [{
                    "lever_rate": 20,
                    "ladders": [
                        {"ladder": 0, "min_size": 0, "max_size": 100, "adjust_factor": 0.1},
                        {"ladder": 1, "min_size": 101, "max_size": null, "adjust_factor": 0.2}
                    ]
                }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let symbol = "BTC/USD:BTC-230929";
    let tiers = exchange.fetch_leverage_tiers(Some(&[symbol][..])).await.unwrap();
    let ladder = &tiers[symbol];
    assert_eq!(ladder.len(), 2);
    assert_eq!(ladder[0].tier, 1);
    assert_eq!(ladder[0].symbol, symbol);
    assert_eq!(ladder[0].max_leverage, Some(dec!(20)));
    assert_eq!(ladder[1].maintenance_margin_rate, Some(dec!(0.2)));
    assert_eq!(ladder[0].currency.as_deref(), Some("BTC"));
}

// === Margin lending ===

#[tokio::test]
async fn test_cross_margin_borrow_and_repay() {
    let (server, exchange) = setup(true).await;
    mount_accounts(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/cross-margin/orders"))
        .and(is_signed)
        .and(body_partial_json(json!({"currency": "usdt", "amount": "100"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "data": 6001})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/account/repayment"))
        .and(body_partial_json(json!({"accountid": "200", "currency": "usdt", "amount": "100"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": [{"repayId": 7001, "repayTime": 1_700_000_000_000_i64}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let loan = exchange.borrow_cross_margin("USDT", dec!(100)).await.unwrap();
    assert_eq!(loan.id.as_deref(), Some("6001"));
    assert_eq!(loan.currency.as_deref(), Some("USDT"));

    let repaid = exchange.repay_cross_margin("USDT", dec!(100)).await.unwrap();
    assert_eq!(repaid.id.as_deref(), Some("7001"));
    assert_eq!(repaid.timestamp, Some(1_700_000_000_000));
}
