//! Unified error hierarchy
//!
//! Follows the ccxt error tree:
//! - ExchangeError
//!   - AuthenticationError
//!     - PermissionDenied
//!       - AccountNotEnabled
//!     - AccountSuspended
//!   - ArgumentsRequired
//!   - BadRequest
//!     - BadSymbol
//!   - OperationRejected
//!   - InsufficientFunds
//!   - InvalidAddress
//!   - InvalidOrder
//!     - OrderNotFound
//!     - DuplicateOrderId
//!   - NotSupported
//! - OperationFailed
//!   - NetworkError
//!     - DDoSProtection
//!     - RateLimitExceeded
//!     - ExchangeNotAvailable
//!       - OnMaintenance
//!     - InvalidNonce
//!     - RequestTimeout
//!   - BadResponse
//!     - NullResponse

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CcxtError {
    // === ExchangeError family ===
    /// Exchange reported an error that fits no narrower variant
    #[error("Exchange error: {message}")]
    ExchangeError { message: String },

    /// Invalid API key, signature or timestamp
    #[error("Authentication error: {message}")]
    AuthenticationError { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// Account feature not activated (margin, contracts, ...)
    #[error("Account not enabled: {message}")]
    AccountNotEnabled { message: String },

    #[error("Account suspended: {message}")]
    AccountSuspended { message: String },

    #[error("Arguments required: {message}")]
    ArgumentsRequired { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Bad symbol: {symbol}")]
    BadSymbol { symbol: String },

    #[error("Operation rejected: {message}")]
    OperationRejected { message: String },

    #[error("Insufficient funds: {message}")]
    InsufficientFunds { message: String },

    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("Invalid order: {message}")]
    InvalidOrder { message: String },

    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: String },

    #[error("Duplicate order ID: {order_id}")]
    DuplicateOrderId { order_id: String },

    /// Unified method has no implementation for this exchange or market type
    #[error("Not supported: {feature}")]
    NotSupported { feature: String },

    // === OperationFailed / NetworkError family ===
    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Network error: {url} - {message}")]
    NetworkError { url: String, message: String },

    #[error("DDoS protection triggered: {message}")]
    DDoSProtection { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded {
        message: String,
        /// Suggested retry delay in milliseconds, when the exchange sends one
        retry_after_ms: Option<u64>,
    },

    #[error("Exchange not available: {message}")]
    ExchangeNotAvailable { message: String },

    #[error("Request timeout: {url}")]
    RequestTimeout { url: String },

    #[error("On maintenance: {message}")]
    OnMaintenance { message: String },

    /// Request timestamp outside the exchange's accepted window
    #[error("Invalid nonce: {message}")]
    InvalidNonce { message: String },

    #[error("Bad response: {message}")]
    BadResponse { message: String },

    #[error("Null response from: {url}")]
    NullResponse { url: String },

    // === Parsing ===
    #[error("Parse error: {data_type} - {message}")]
    ParseError { data_type: String, message: String },

    #[error("JSON error: {message}")]
    JsonError { message: String },
}

impl CcxtError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            CcxtError::ExchangeError { .. } => "EXCHANGE_ERROR",
            CcxtError::AuthenticationError { .. } => "AUTHENTICATION_ERROR",
            CcxtError::PermissionDenied { .. } => "PERMISSION_DENIED",
            CcxtError::AccountNotEnabled { .. } => "ACCOUNT_NOT_ENABLED",
            CcxtError::AccountSuspended { .. } => "ACCOUNT_SUSPENDED",
            CcxtError::ArgumentsRequired { .. } => "ARGUMENTS_REQUIRED",
            CcxtError::BadRequest { .. } => "BAD_REQUEST",
            CcxtError::BadSymbol { .. } => "BAD_SYMBOL",
            CcxtError::OperationRejected { .. } => "OPERATION_REJECTED",
            CcxtError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            CcxtError::InvalidAddress { .. } => "INVALID_ADDRESS",
            CcxtError::InvalidOrder { .. } => "INVALID_ORDER",
            CcxtError::OrderNotFound { .. } => "ORDER_NOT_FOUND",
            CcxtError::DuplicateOrderId { .. } => "DUPLICATE_ORDER_ID",
            CcxtError::NotSupported { .. } => "NOT_SUPPORTED",
            CcxtError::OperationFailed { .. } => "OPERATION_FAILED",
            CcxtError::NetworkError { .. } => "NETWORK_ERROR",
            CcxtError::DDoSProtection { .. } => "DDOS_PROTECTION",
            CcxtError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            CcxtError::ExchangeNotAvailable { .. } => "EXCHANGE_NOT_AVAILABLE",
            CcxtError::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            CcxtError::OnMaintenance { .. } => "ON_MAINTENANCE",
            CcxtError::InvalidNonce { .. } => "INVALID_NONCE",
            CcxtError::BadResponse { .. } => "BAD_RESPONSE",
            CcxtError::NullResponse { .. } => "NULL_RESPONSE",
            CcxtError::ParseError { .. } => "PARSE_ERROR",
            CcxtError::JsonError { .. } => "JSON_ERROR",
        }
    }

    /// Temporary failure; the same request may succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CcxtError::OperationFailed { .. }
                | CcxtError::NetworkError { .. }
                | CcxtError::RequestTimeout { .. }
                | CcxtError::RateLimitExceeded { .. }
                | CcxtError::ExchangeNotAvailable { .. }
                | CcxtError::OnMaintenance { .. }
                | CcxtError::InvalidNonce { .. }
        )
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            CcxtError::AuthenticationError { .. }
                | CcxtError::PermissionDenied { .. }
                | CcxtError::AccountNotEnabled { .. }
                | CcxtError::AccountSuspended { .. }
        )
    }

    pub fn is_order_error(&self) -> bool {
        matches!(
            self,
            CcxtError::InvalidOrder { .. }
                | CcxtError::OrderNotFound { .. }
                | CcxtError::DuplicateOrderId { .. }
        )
    }

    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            CcxtError::OperationFailed { .. }
                | CcxtError::NetworkError { .. }
                | CcxtError::DDoSProtection { .. }
                | CcxtError::RateLimitExceeded { .. }
                | CcxtError::ExchangeNotAvailable { .. }
                | CcxtError::RequestTimeout { .. }
                | CcxtError::OnMaintenance { .. }
                | CcxtError::InvalidNonce { .. }
        )
    }

    /// Suggested retry delay in milliseconds, `None` for permanent errors
    pub fn suggested_retry_after(&self) -> Option<u64> {
        match self {
            CcxtError::RateLimitExceeded { retry_after_ms, .. } => retry_after_ms.or(Some(1000)),
            CcxtError::RequestTimeout { .. } => Some(5000),
            CcxtError::ExchangeNotAvailable { .. } => Some(30000),
            CcxtError::OnMaintenance { .. } => Some(60000),
            CcxtError::NetworkError { .. } | CcxtError::OperationFailed { .. } => Some(1000),
            CcxtError::InvalidNonce { .. } => Some(100),
            CcxtError::DDoSProtection { .. } => Some(60000),
            _ => None,
        }
    }

    pub fn rate_limit_with_retry(message: impl Into<String>, retry_after_ms: u64) -> Self {
        CcxtError::RateLimitExceeded {
            message: message.into(),
            retry_after_ms: Some(retry_after_ms),
        }
    }

    pub(crate) fn not_supported(feature: impl Into<String>) -> Self {
        CcxtError::NotSupported {
            feature: feature.into(),
        }
    }

    pub(crate) fn arguments_required(message: impl Into<String>) -> Self {
        CcxtError::ArgumentsRequired {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CcxtError {
    fn from(err: serde_json::Error) -> Self {
        CcxtError::JsonError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for CcxtError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            CcxtError::RequestTimeout { url }
        } else if err.is_connect() {
            CcxtError::NetworkError {
                url,
                message: "Connection failed".into(),
            }
        } else {
            CcxtError::NetworkError {
                url,
                message: err.to_string(),
            }
        }
    }
}

pub type CcxtResult<T> = Result<T, CcxtError>;
