//! Signing Benchmarks
//!
//! Request signing and query encoding on the private request path

use std::collections::{BTreeMap, HashMap};

use ccxt_htx::exchanges::htx::{encode_query, signing_host, Signer};
use ccxt_htx::utils::{amount_to_precision, safe_decimal_n, safe_string_n};
use ccxt_htx::{Exchange, ExchangeConfig, Htx};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal_macros::dec;
use serde_json::json;

fn params(n: usize) -> HashMap<String, String> {
    (0..n)
        .map(|i| (format!("param-{i:02}"), format!("value {i}/{}", i * 7)))
        .collect()
}

fn bench_signer(c: &mut Criterion) {
    let mut group = c.benchmark_group("signer");
    let signer = Signer::new("e2xxxxxx-99xxxxxx-84xxxxxx-7xxxx", "b0xxxxxx-c6xxxxxx-94xxxxxx-dxxxx");

    for n in [0usize, 4, 16] {
        let query = params(n);
        group.bench_with_input(BenchmarkId::new("signed_query", n), &query, |b, query| {
            b.iter(|| {
                black_box(signer.signed_query(
                    "GET",
                    "api.huobi.pro",
                    "/v1/order/orders",
                    query,
                    "2017-05-11T15:19:30",
                ))
            })
        });
    }

    let sorted: BTreeMap<String, String> = params(16).into_iter().collect();
    group.bench_function("encode_query_16", |b| b.iter(|| black_box(encode_query(&sorted))));
    group.bench_function("signing_host", |b| {
        b.iter(|| black_box(signing_host("https://api.hbdm.com")))
    });

    group.finish();
}

fn bench_sign_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign_request");
    let htx = Htx::new(ExchangeConfig::new().with_api_key("key").with_api_secret("secret")).unwrap();
    let query = params(4);
    let body = json!({"contract_code": "BTC-USDT", "volume": 1, "direction": "buy"}).to_string();

    group.bench_function("private_get", |b| {
        b.iter(|| black_box(htx.sign("/v1/order/openOrders", "spot.private", "GET", &query, None, None)))
    });
    group.bench_function("private_post", |b| {
        b.iter(|| {
            black_box(htx.sign(
                "/linear-swap-api/v1/swap_cross_order",
                "contract.private",
                "POST",
                &HashMap::new(),
                None,
                Some(&body),
            ))
        })
    });
    group.bench_function("public_get", |b| {
        b.iter(|| black_box(htx.sign("/market/depth", "spot.public", "GET", &query, None, None)))
    });

    group.finish();
}

fn bench_field_fallbacks(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_fallbacks");
    let contract_order = json!({
        "order_id": 784017187857760256_i64,
        "order_id_str": "784017187857760256",
        "contract_code": "BTC-USDT",
        "volume": 1,
        "trade_volume": 1,
        "trade_turnover": "35.1"
    });

    group.bench_function("safe_string_n_hit_last", |b| {
        b.iter(|| black_box(safe_string_n(&contract_order, &["id", "order-id", "order_id_str"])))
    });
    group.bench_function("safe_decimal_n", |b| {
        b.iter(|| {
            black_box(safe_decimal_n(
                &contract_order,
                &["field-cash-amount", "filled-cash-amount", "trade_turnover"],
            ))
        })
    });
    group.bench_function("amount_to_precision", |b| {
        b.iter(|| black_box(amount_to_precision(dec!(0.123456789), Some(6))))
    });

    group.finish();
}

criterion_group!(benches, bench_signer, bench_sign_request, bench_field_fallbacks);
criterion_main!(benches);
