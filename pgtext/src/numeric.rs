use bigdecimal::BigDecimal;
use std::{fmt, str::FromStr};

use crate::error::Error;

/// Postgres `numeric`: an arbitrary precision decimal with a `NaN` state.
///
/// [`BigDecimal`] has no representation for `NaN`, while postgres `numeric`
/// columns can hold one, so the two states are kept apart here. There is no
/// `±Infinity`, `numeric` has none.
///
/// `NotANumber` compares equal to nothing, itself included. Use
/// [`is_nan`][Numeric::is_nan] to test for it.
#[derive(Debug, Clone)]
pub enum Numeric {
    NotANumber,
    Number(BigDecimal),
}

impl Numeric {
    /// Return `true` if self is the `NaN` state.
    pub const fn is_nan(&self) -> bool {
        matches!(self, Numeric::NotANumber)
    }

    /// Borrow the inner decimal.
    ///
    /// Returns [`None`] for `NaN`.
    pub const fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Numeric::NotANumber => None,
            Numeric::Number(d) => Some(d),
        }
    }
}

impl FromStr for Numeric {
    type Err = Error;

    /// Parse from the postgres text form.
    ///
    /// The digits are kept exactly as supplied, `"1.20"` stays at scale 2.
    fn from_str(s: &str) -> Result<Self, Error> {
        if s == "NaN" {
            return Ok(Numeric::NotANumber);
        }
        match BigDecimal::from_str(s) {
            Ok(d) => Ok(Numeric::Number(d)),
            Err(_) => Err(Error::malformed(s, "numeric")),
        }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Numeric::Number(a), Numeric::Number(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::NotANumber => f.write_str("NaN"),
            Numeric::Number(d) => fmt::Display::fmt(d, f),
        }
    }
}

impl From<BigDecimal> for Numeric {
    fn from(value: BigDecimal) -> Self {
        Numeric::Number(value)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Number(BigDecimal::from(value))
    }
}
