//! Utility functions

pub mod crypto;
pub mod precision;
pub mod safe;
pub mod time;

pub use precision::*;
pub use safe::*;
pub use time::{iso8601, now_ms, parse8601, parse_yyyymmdd};
