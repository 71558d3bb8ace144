//! # Money
//!
//! Every currency column in Flock is fixed-point with **10 total digits and
//! 2 decimal places**, so the largest representable amount is
//! `99_999_999.99`. [`Money`] is the only way an amount enters a record:
//! construction rejects negative values and anything that would not fit the
//! column, and the stored value is always rescaled to exactly two places.
//!
//! Aggregates (donation totals, percentages) are plain [`Decimal`]s because
//! they are never stored and may legitimately exceed the column width.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Total number of significant digits a currency column can hold.
pub const MAX_DIGITS: u32 = 10;

/// Number of digits after the decimal point.
pub const DECIMAL_PLACES: u32 = 2;

/// Exclusive upper bound on the whole part: `10^(MAX_DIGITS - DECIMAL_PLACES)`.
const WHOLE_LIMIT: i64 = 100_000_000;

/// A non-negative currency amount with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, DECIMAL_PLACES));

    /// Validate `amount` and rescale it to two decimal places.
    pub fn new(amount: Decimal) -> Result<Self, ModelError> {
        if amount < Decimal::ZERO {
            return Err(ModelError::NegativeAmount(amount));
        }

        let mut value = amount.normalize();
        if value.scale() > DECIMAL_PLACES || value >= Decimal::from(WHOLE_LIMIT) {
            return Err(ModelError::PrecisionExceeded(amount));
        }

        value.rescale(DECIMAL_PLACES);
        Ok(Money(value))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The amount as an integer count of cents.
    ///
    /// The value is always held at scale 2, so the mantissa is exactly the
    /// number of minor units and always fits an `i64`.
    pub fn minor_units(&self) -> i64 {
        self.0.mantissa() as i64
    }
}

/// Scale `amount` by 100 and truncate toward zero.
///
/// `12.34` becomes `1234` and `0.005` becomes `0`; nothing is rounded.
/// Returns `None` when the scaled value overflows `Decimal` or does not fit
/// an `i64`.
pub fn minor_units(amount: Decimal) -> Option<i64> {
    amount.checked_mul(Decimal::ONE_HUNDRED)?.trunc().to_i64()
}

impl TryFrom<Decimal> for Money {
    type Error = ModelError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Money::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|e| ModelError::InvalidAmount(format!("{s}: {e}")))?;
        Money::new(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
