//! Exchange implementations

pub mod htx;

pub use htx::{Htx, HtxOptions, HtxParams, Offset, OrderKind, Venue};
