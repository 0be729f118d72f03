use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

pub const CURRENCY_DECIMALS: u32 = 2;

/// Largest accepted price, 999.999.999,99.
// Decimal::new is not const; from_parts encodes the same value (99_999_999_999 scale 2).
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_215_752_191, 23, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("invalid price '{0}'")]
    Invalid(String),
    #[error("price must not be negative")]
    Negative,
    #[error("price exceeds {}", MAX_PRICE)]
    TooLarge,
}

/// Parses a non-negative price up to [`MAX_PRICE`]. Whitespace anywhere is
/// ignored, both `,` and `.` work as decimal separator. Exponent notation is
/// not accepted.
pub fn parse_price(input: &str) -> Result<Decimal, PriceError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() || compact.contains(['e', 'E']) {
        return Err(PriceError::Invalid(input.to_string()));
    }

    let normalized = compact.replace(',', ".");
    let value = Decimal::from_str(&normalized).map_err(|_| PriceError::Invalid(input.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(PriceError::Negative);
    }
    if value > MAX_PRICE {
        return Err(PriceError::TooLarge);
    }
    Ok(value.abs())
}

/// Rounds half up to two decimal places (prices are never negative).
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// `1234.5` -> `1234,50`. No thousands separator.
pub fn format_currency(value: Decimal) -> String {
    let mut rounded = round_price(value);
    rounded.rescale(CURRENCY_DECIMALS);
    rounded.to_string().replace('.', ",")
}
