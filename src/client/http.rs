//! HTTP client for API requests

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

use super::ExchangeConfig;
use crate::errors::{CcxtError, CcxtResult};
use crate::types::SignedRequest;

const DEFAULT_USER_AGENT: &str = concat!("ccxt-htx/", env!("CARGO_PKG_VERSION"));

/// Thin reqwest wrapper that executes already-signed requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &ExchangeConfig) -> CcxtResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms()))
            .user_agent(config.user_agent().unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .map_err(|e| CcxtError::NetworkError {
                url: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Sends the request and returns the decoded JSON body.
    ///
    /// Exchange error envelopes are returned as `Ok` even with a 4xx/5xx status
    /// so the caller can classify them.
    pub async fn fetch(&self, request: &SignedRequest) -> CcxtResult<Value> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
            CcxtError::BadRequest {
                message: format!("unsupported HTTP method {}", request.method),
            }
        })?;

        debug!(method = %method, url = %request.url, "sending request");

        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let text = response.text().await?;

        trace!(status = status.as_u16(), body = %text, "received response");

        let parsed = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Value>(&text).ok()
        };

        if status.is_success() {
            return match parsed {
                Some(json) => Ok(json),
                None if text.trim().is_empty() => Err(CcxtError::NullResponse {
                    url: request.url.clone(),
                }),
                None => Err(CcxtError::BadResponse {
                    message: format!("non-JSON response from {}: {}", request.url, truncate(&text)),
                }),
            };
        }

        if let Some(json) = parsed {
            if carries_error_envelope(&json) {
                return Ok(json);
            }
        }

        Err(status_error(status, &request.url, &text, retry_after))
    }
}

/// Whether the body looks like an exchange error reply rather than a gateway page
fn carries_error_envelope(json: &Value) -> bool {
    let Some(obj) = json.as_object() else {
        return false;
    };
    ["err-code", "err_code", "err-msg", "err_msg"]
        .iter()
        .any(|k| obj.contains_key(*k))
        || obj.get("status").and_then(Value::as_str) == Some("error")
        || (obj.contains_key("code") && obj.contains_key("message"))
}

fn status_error(status: StatusCode, url: &str, body: &str, retry_after: Option<u64>) -> CcxtError {
    let message = format!("HTTP {} {}: {}", status.as_u16(), url, truncate(body));
    match status {
        StatusCode::TOO_MANY_REQUESTS => CcxtError::RateLimitExceeded {
            message,
            retry_after_ms: retry_after.map(|secs| secs * 1000),
        },
        StatusCode::UNAUTHORIZED => CcxtError::AuthenticationError { message },
        StatusCode::FORBIDDEN => CcxtError::PermissionDenied { message },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => CcxtError::RequestTimeout {
            url: url.to_string(),
        },
        s if s.is_server_error() => CcxtError::ExchangeNotAvailable { message },
        _ => CcxtError::ExchangeError { message },
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope_detection() {
        assert!(carries_error_envelope(&json!({
            "status": "error", "err-code": "invalid-parameter", "err-msg": "bad"
        })));
        assert!(carries_error_envelope(&json!({
            "status": "error", "err_code": 1014, "err_msg": "contract not exist"
        })));
        assert!(carries_error_envelope(&json!({"code": 2002, "message": "invalid field"})));
        assert!(!carries_error_envelope(&json!({"error": "bad gateway"})));
        assert!(!carries_error_envelope(&json!([1, 2, 3])));
    }

    #[test]
    fn test_status_mapping() {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "u", "", Some(2));
        assert_eq!(err.suggested_retry_after(), Some(2000));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "u", "", None),
            CcxtError::AuthenticationError { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "u", "", None),
            CcxtError::PermissionDenied { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "u", "", None),
            CcxtError::ExchangeNotAvailable { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "u", "", None),
            CcxtError::ExchangeError { .. }
        ));
    }

    #[test]
    fn test_truncate() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long).len(), 200);
        assert_eq!(truncate("short"), "short");
    }
}
