//! Response envelopes and error classification
//!
//! Three envelope shapes are in use:
//!
//! - spot v1: `{"status": "ok"|"error", "data"|"tick", "err-code", "err-msg"}`
//! - spot v2: `{"code": 200, "data", "message"}`
//! - contract: `{"status": "ok"|"error", "data", "err_code", "err_msg", "ts"}`

use serde_json::Value;
use tracing::warn;

use crate::errors::{CcxtError, CcxtResult};
use crate::utils::{safe_integer, safe_string, safe_string_n};

/// Fails when the body reports an exchange error
pub fn check_envelope(body: &Value, url: &str) -> CcxtResult<()> {
    let failed_status = safe_string(body, "status").as_deref() == Some("error");
    let failed_code = match body.get("code") {
        Some(Value::Number(_)) => safe_integer(body, "code").map_or(false, |c| c != 200),
        _ => false,
    };
    if !failed_status && !failed_code {
        return Ok(());
    }

    let code = safe_string_n(body, &["err-code", "err_code", "code"]).unwrap_or_default();
    let message = safe_string_n(body, &["err-msg", "err_msg", "message", "msg"]).unwrap_or_default();
    warn!(url, code = %code, message = %message, "exchange reported an error");

    Err(classify(&code, &message))
}

/// Maps an HTX error code and message onto the unified error tree.
///
/// Only broad families are recognised; anything else stays an
/// `ExchangeError` carrying `"{code}: {message}"`.
pub fn classify(code: &str, message: &str) -> CcxtError {
    let text = format!("{code}: {message}");
    let code_lc = code.to_ascii_lowercase();
    let msg_lc = message.to_ascii_lowercase();

    match code_lc.as_str() {
        "1013" | "1014" | "1066" => return CcxtError::BadSymbol { symbol: text },
        "1017" | "1061" | "1071" => return CcxtError::OrderNotFound { order_id: text },
        "1047" | "1048" => return CcxtError::InsufficientFunds { message: text },
        "1032" => return CcxtError::RateLimitExceeded { message: text, retry_after_ms: None },
        "1034" | "1036" | "1039" | "1041" | "1051" | "1067" | "1094" | "1461" => {
            return CcxtError::InvalidOrder { message: text }
        }
        "1030" | "1303" | "4007" => return CcxtError::BadRequest { message: text },
        "1004" | "1080" => return CcxtError::ExchangeNotAvailable { message: text },
        "1220" => return CcxtError::AccountNotEnabled { message: text },
        "order-orderstate-error" | "order-queryorder-invalid" | "base-record-invalid" => {
            return CcxtError::OrderNotFound { order_id: text }
        }
        _ => {}
    }

    let has = |needle: &str| code_lc.contains(needle) || msg_lc.contains(needle);

    if has("signature") || has("api-key") || has("login-required") || has("accesskey") {
        CcxtError::AuthenticationError { message: text }
    } else if has("forbidden") || has("permission") {
        CcxtError::PermissionDenied { message: text }
    } else if has("insufficient") {
        CcxtError::InsufficientFunds { message: text }
    } else if has("maintenance") {
        CcxtError::OnMaintenance { message: text }
    } else if has("frequency") || has("too many") || has("too-many") {
        CcxtError::RateLimitExceeded {
            message: text,
            retry_after_ms: None,
        }
    } else if has("gateway") || has("system-busy") || has("system busy") {
        CcxtError::ExchangeNotAvailable { message: text }
    } else if code_lc.contains("symbol") || msg_lc.contains("invalid symbol") {
        CcxtError::BadSymbol { symbol: text }
    } else if code_lc.starts_with("order-") || code_lc.starts_with("invalid-amount") || code_lc.starts_with("invalid-price") {
        CcxtError::InvalidOrder { message: text }
    } else if code_lc.starts_with("validation")
        || code_lc.starts_with("invalid-parameter")
        || code_lc.starts_with("bad-request")
        || code_lc.starts_with("base-argument")
    {
        CcxtError::BadRequest { message: text }
    } else if code_lc.contains("address") {
        CcxtError::InvalidAddress { address: text }
    } else {
        CcxtError::ExchangeError { message: text }
    }
}

/// `data`, or an error naming `what` when the body carries none
pub fn data<'a>(body: &'a Value, what: &str) -> CcxtResult<&'a Value> {
    match body.get("data") {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(CcxtError::BadResponse {
            message: format!("{what}: response carries no data"),
        }),
    }
}

/// `tick`, or an error naming `what`
pub fn tick<'a>(body: &'a Value, what: &str) -> CcxtResult<&'a Value> {
    match body.get("tick") {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(CcxtError::BadResponse {
            message: format!("{what}: response carries no tick"),
        }),
    }
}

/// Array under `data`, `data.orders`, `data.data` or `data.trades`; empty when absent
pub fn data_list(body: &Value) -> &[Value] {
    match body.get("data") {
        Some(Value::Array(items)) => items,
        Some(obj @ Value::Object(_)) => {
            crate::utils::safe_list_n(obj, &["orders", "data", "trades", "settlement_record"])
        }
        _ => &[],
    }
}
