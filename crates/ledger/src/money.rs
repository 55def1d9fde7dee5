use std::{fmt, iter::Sum, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Signed money amount represented as **integer cents**.
///
/// Record amounts are always positive magnitudes (the sign is implied by the
/// record kind); aggregates such as a balance may be negative.
///
/// # Examples
///
/// ```rust
/// use ledger::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!(Money::new(-12_34).with_symbol("$"), "$12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use ledger::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    #[must_use]
    pub const fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    #[must_use]
    pub const fn saturating_sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }

    /// Formats the absolute value prefixed by a currency symbol, e.g. `$12.30`.
    pub fn with_symbol(self, symbol: &str) -> String {
        format!("{symbol}{}", self.abs())
    }

    /// Mean of `total` over `count` items, rounded half away from zero to the
    /// nearest cent. Zero when `count` is zero.
    pub(crate) fn mean(total: Money, count: usize) -> Money {
        let Ok(count) = i64::try_from(count) else {
            return Money::ZERO;
        };
        if count == 0 {
            return Money::ZERO;
        }
        let quotient = total.0 / count;
        let remainder = total.0 % count;
        let round = if remainder.abs() * 2 >= count {
            total.0.signum()
        } else {
            0
        };
        Money(quotient + round)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl TryFrom<f64> for Money {
    type Error = LedgerError;

    /// Converts a decimal amount in major units, rounding to the nearest cent.
    ///
    /// Rejects NaN, infinities and values outside the `i64` cents range.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(LedgerError::InvalidAmount(format!(
                "{value} is not a finite number"
            )));
        }
        let cents = (value * 100.0).round();
        if cents >= i64::MAX as f64 || cents <= i64::MIN as f64 {
            return Err(LedgerError::InvalidAmount("amount too large".to_string()));
        }
        Ok(Self(cents as i64))
    }
}

/// Saturates at the `i64` bounds instead of overflowing.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator, at most two decimals and an
    /// optional leading `+`/`-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |reason: &str| LedgerError::InvalidAmount(format!("\"{input}\": {reason}"));

        let (sign, digits) = match input.as_bytes().first() {
            Some(b'-') => (-1, &input[1..]),
            Some(b'+') => (1, &input[1..]),
            Some(_) => (1, input),
            None => return Err(LedgerError::InvalidAmount("empty amount".to_string())),
        };
        let (units, fraction) = digits.split_once(['.', ',']).unwrap_or((digits, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid("not a number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("too many decimals"));
        }

        // "5" -> 50 cents, "05" -> 5 cents.
        let fraction = format!("{fraction:0<2}");
        format!("{units}{fraction}")
            .parse::<i64>()
            .map(|cents| Money(sign * cents))
            .map_err(|_| invalid("amount too large"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn with_symbol_uses_absolute_value() {
        assert_eq!(Money::new(-4000).with_symbol("$"), "$40.00");
        assert_eq!(Money::new(5).with_symbol("€"), "€0.05");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().cents(), -1);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("NaN".parse::<Money>().is_err());
    }

    #[test]
    fn from_f64_rejects_non_finite() {
        assert_eq!(Money::try_from(19.99).unwrap().cents(), 1999);
        assert!(Money::try_from(f64::NAN).is_err());
        assert!(Money::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn parse_rejects_out_of_range() {
        assert_eq!(
            "92233720368547758".parse::<Money>().unwrap().cents(),
            9_223_372_036_854_775_800
        );
        assert!("92233720368547759".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
    }

    #[test]
    fn sum_saturates_instead_of_overflowing() {
        let huge = Money::new(i64::MAX - 1);
        assert_eq!(
            [huge, huge, Money::new(1)].into_iter().sum::<Money>(),
            Money::new(i64::MAX)
        );
        assert_eq!(Money::ZERO.saturating_sub(huge), Money::new(-(i64::MAX - 1)));
    }

    #[test]
    fn mean_rounds_to_nearest_cent() {
        assert_eq!(Money::mean(Money::new(100), 3), Money::new(33));
        assert_eq!(Money::mean(Money::new(200), 3), Money::new(67));
        assert_eq!(Money::mean(Money::new(500), 0), Money::ZERO);
    }
}
