//! Currency amounts backed by `rust_decimal`.
//!
//! Amounts keep the precision they were parsed with; conversion to whole
//! cents happens once, in [`Money::to_cents`], so rounding is applied in a
//! single place for both detail and trailer records.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// A decimal currency amount.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use giro_encoder::Money;
///
/// let amount = Money::from_str("1,250.505").unwrap();
/// assert_eq!(amount.to_cents(), 125051);
/// assert_eq!(amount.to_string(), "1250.51");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// Number of minor units shown and encoded.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Builds an amount from a whole number of cents.
    pub fn from_cents(cents: u64) -> Self {
        Money(Decimal::from_i128_with_scale(i128::from(cents), Self::SCALE))
    }

    /// Returns the amount in cents, rounded half away from zero.
    pub fn to_cents(&self) -> i128 {
        let mut rounded = self
            .0
            .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        rounded.mantissa()
    }

    /// Returns `true` if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    /// Parses a decimal amount, ignoring surrounding whitespace and `,`
    /// thousands separators.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        let decimal = Decimal::from_str(&cleaned)?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{:.2}", rounded)
    }
}
