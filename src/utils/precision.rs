//! Precision helpers for request formatting and market metadata

use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Half away from zero
    Round,
    /// Towards zero
    Truncate,
}

/// Formats `value` with at most `places` decimals and no trailing zeros
pub fn decimal_to_precision(value: Decimal, places: i32, mode: RoundingMode) -> String {
    let places = places.max(0) as u32;
    let strategy = match mode {
        RoundingMode::Round => RoundingStrategy::MidpointAwayFromZero,
        RoundingMode::Truncate => RoundingStrategy::ToZero,
    };
    number_to_string(value.round_dp_with_strategy(places, strategy))
}

/// Amounts are truncated so an order never exceeds the requested size
pub fn amount_to_precision(amount: Decimal, places: Option<i32>) -> String {
    match places {
        Some(p) => decimal_to_precision(amount, p, RoundingMode::Truncate),
        None => number_to_string(amount),
    }
}

pub fn price_to_precision(price: Decimal, places: Option<i32>) -> String {
    match places {
        Some(p) => decimal_to_precision(price, p, RoundingMode::Round),
        None => number_to_string(price),
    }
}

/// Rounds `price` half away from zero to a multiple of `tick`
pub fn price_to_tick(price: Decimal, tick: Decimal) -> String {
    if tick <= Decimal::ZERO {
        return number_to_string(price);
    }
    let steps = (price / tick).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    number_to_string(steps * tick)
}

/// Plain decimal text without exponent or trailing zeros
pub fn number_to_string(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Decimal places of a tick size: `0.001` -> 3, `5` -> 0
pub fn precision_from_step(step: Decimal) -> Option<i32> {
    if step <= Decimal::ZERO {
        return None;
    }
    Some(step.normalize().scale() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_to_precision() {
        assert_eq!(
            decimal_to_precision(dec!(1.23456789), 4, RoundingMode::Round),
            "1.2346"
        );
        assert_eq!(
            decimal_to_precision(dec!(1.23456789), 4, RoundingMode::Truncate),
            "1.2345"
        );
        assert_eq!(decimal_to_precision(dec!(2.50), 1, RoundingMode::Round), "2.5");
    }

    #[test]
    fn test_amount_and_price() {
        assert_eq!(amount_to_precision(dec!(0.123456), Some(4)), "0.1234");
        assert_eq!(amount_to_precision(dec!(3.000), None), "3");
        assert_eq!(price_to_precision(dec!(30000.126), Some(2)), "30000.13");
    }

    #[test]
    fn test_price_to_tick() {
        assert_eq!(price_to_tick(dec!(100.25), dec!(0.5)), "100.5");
        assert_eq!(price_to_tick(dec!(100.2), dec!(0.5)), "100");
        assert_eq!(price_to_tick(dec!(1234), dec!(5)), "1235");
        assert_eq!(price_to_tick(dec!(30000.12), dec!(0.1)), "30000.1");
        assert_eq!(price_to_tick(dec!(7.77), Decimal::ZERO), "7.77");
    }

    #[test]
    fn test_precision_from_step() {
        assert_eq!(precision_from_step(dec!(0.001)), Some(3));
        assert_eq!(precision_from_step(dec!(0.10)), Some(1));
        assert_eq!(precision_from_step(dec!(5)), Some(0));
        assert_eq!(precision_from_step(Decimal::ZERO), None);
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(dec!(100.500)), "100.5");
        assert_eq!(number_to_string(dec!(0.00001)), "0.00001");
    }
}
