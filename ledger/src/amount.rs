//! # Arbitrary-Precision Amounts
//!
//! Balances and capacities are unbounded non-negative integers. On disk they
//! are decimal strings so that a wallet of `9007199254740993` survives a
//! round-trip through any JSON tooling that would otherwise squash it into
//! an `f64`.
//!
//! Everything entering the ledger from outside (stored JSON, CLI arguments)
//! passes through [`to_non_negative_int`], which never fails: garbage in
//! becomes zero out.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A non-negative integer of arbitrary size.
///
/// Wraps [`BigUint`] so that subtraction can only happen through
/// [`Amount::checked_sub`]. There is no way to construct a negative amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    /// The zero amount.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Returns `true` for zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtracts `other`, or returns `None` if the result would go negative.
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        if self.0 < other.0 {
            None
        } else {
            Some(Amount(&self.0 - &other.0))
        }
    }

    /// Lossless when the value fits, `u64::MAX` otherwise.
    pub fn to_u64_saturating(&self) -> u64 {
        self.0.to_u64().unwrap_or(u64::MAX)
    }

    /// Nearest `f64`. Large values lose precision.
    pub fn to_f64_lossy(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::MAX)
    }

    /// Truncates toward zero. Negative, NaN and infinite inputs give zero.
    pub fn from_f64_truncated(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self::zero();
        }
        BigUint::from_f64(value.trunc())
            .map(Self)
            .unwrap_or_default()
    }

    /// Lenient string parse, same rules as stored values. See
    /// [`to_non_negative_int`].
    pub fn parse_lossy(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::zero();
        }

        let (negative, digits) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if negative {
                return Self::zero();
            }
            return BigUint::parse_bytes(digits.as_bytes(), 10)
                .map(Self)
                .unwrap_or_default();
        }

        // Decimal or scientific notation, e.g. "1.0000201963098084e+23".
        match trimmed.parse::<f64>() {
            Ok(value) => Self::from_f64_truncated(value),
            Err(_) => Self::zero(),
        }
    }
}

/// Coerces any JSON value to a non-negative integer.
///
/// - integers pass through, negatives become zero
/// - floats are truncated toward zero
/// - strings may hold integers of any length, decimals, or scientific
///   notation
/// - everything else (`null`, booleans, arrays, objects, unparseable text)
///   becomes zero
pub fn to_non_negative_int(value: &Value) -> Amount {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Amount::from(u)
            } else if n.as_i64().is_some() {
                // Only reachable for negative integers.
                Amount::zero()
            } else {
                n.as_f64()
                    .map(Amount::from_f64_truncated)
                    .unwrap_or_default()
            }
        }
        Value::String(s) => Amount::parse_lossy(s),
        _ => Amount::zero(),
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Amount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lossy(s))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a> Add<&'a Amount> for &'a Amount {
    type Output = Amount;

    fn add(self, rhs: &'a Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_str_radix(10))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(to_non_negative_int(&value))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
