//! Safe helpers for extracting values from loosely typed JSON
//!
//! Exchanges encode the same field as a string on one endpoint and as a
//! number on the next, and rename it between API versions. Every helper
//! accepts both encodings; the `_n` forms take a list of candidate keys and
//! return the first one present.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// 안전한 값 추출 (null 은 없음으로 취급)
pub fn safe_value<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// 안전한 문자열 추출
///
/// 문자열, 숫자, bool 은 문자열로 반환하고 빈 문자열은 없음으로 취급
pub fn safe_string(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// N개 키 중 하나에서 문자열 추출
pub fn safe_string_n(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| safe_string(obj, k))
}

/// 소문자 문자열 추출
pub fn safe_string_lower(obj: &Value, key: &str) -> Option<String> {
    safe_string(obj, key).map(|s| s.to_lowercase())
}

/// 대문자 문자열 추출
pub fn safe_string_upper(obj: &Value, key: &str) -> Option<String> {
    safe_string(obj, key).map(|s| s.to_uppercase())
}

pub fn safe_string_upper_n(obj: &Value, keys: &[&str]) -> Option<String> {
    safe_string_n(obj, keys).map(|s| s.to_uppercase())
}

/// 안전한 정수 추출
pub fn safe_integer(obj: &Value, key: &str) -> Option<i64> {
    obj.get(key).and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    })
}

/// N개 키 중 하나에서 정수 추출
pub fn safe_integer_n(obj: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| safe_integer(obj, k))
}

/// 안전한 Decimal 추출
pub fn safe_decimal(obj: &Value, key: &str) -> Option<Decimal> {
    obj.get(key).and_then(value_to_decimal)
}

/// N개 키 중 하나에서 Decimal 추출
pub fn safe_decimal_n(obj: &Value, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|k| safe_decimal(obj, k))
}

/// JSON 값 자체에서 Decimal 추출 (배열 원소 등)
pub fn value_to_decimal(v: &Value) -> Option<Decimal> {
    match v {
        Value::String(s) if !s.is_empty() => parse_decimal(s),
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// 안전한 타임스탬프 추출 (밀리초)
///
/// 정수 필드 또는 RFC 3339 문자열
pub fn safe_timestamp(obj: &Value, key: &str) -> Option<i64> {
    safe_integer(obj, key).or_else(|| {
        obj.get(key)
            .and_then(Value::as_str)
            .and_then(super::time::parse8601)
    })
}

pub fn safe_bool(obj: &Value, key: &str) -> Option<bool> {
    obj.get(key).and_then(|v| match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "allowed" => Some(true),
            "false" | "0" | "no" | "prohibited" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    })
}

/// 배열 필드 추출, 없거나 배열이 아니면 빈 슬라이스
pub fn safe_list<'a>(obj: &'a Value, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn safe_list_n<'a>(obj: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
