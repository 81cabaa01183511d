//! Exact decimal number model.
//!
//! All valuation math runs on [`DecimalNumber`], an arbitrary-precision
//! decimal. Floating point is never used internally: price-per-share chains
//! multiply through several layers of nesting and float rounding would
//! compound. The only form that crosses an external boundary is
//! [`SerializedDecimalNumber`], the value rendered to a string with at most
//! [`MAX_SERIALIZED_DECIMALS`] fractional digits.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

use alloy_primitives::U256;
use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, FromPrimitive, ParseBigDecimalError, RoundingMode, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum number of fractional digits in the serialized form.
pub const MAX_SERIALIZED_DECIMALS: i64 = 20;

/// Arbitrary-precision decimal used for all internal arithmetic.
#[derive(Debug, Clone, PartialEq, PartialOrd, Default)]
pub struct DecimalNumber(BigDecimal);

/// A [`DecimalNumber`] rendered to its canonical wire form: a plain decimal
/// string truncated (rounded toward zero) at 20 fractional digits, trailing
/// zeros stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedDecimalNumber(String);

impl SerializedDecimalNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerializedDecimalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl DecimalNumber {
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Convert a raw on-chain integer amount to its decimal value,
    /// `amount × 10^-decimals`. Lossless for any `U256`.
    pub fn from_raw(amount: U256, decimals: u8) -> Self {
        let digits = BigInt::from_bytes_be(Sign::Plus, &amount.to_be_bytes::<32>());
        Self(BigDecimal::new(digits, i64::from(decimals)))
    }

    /// Convert a float to an exact decimal. Only intended for external
    /// boundaries that hand us JSON numbers; internal math never touches f64.
    pub fn from_f64(value: f64) -> Option<Self> {
        BigDecimal::from_f64(value).map(Self)
    }

    /// Render to the canonical wire form, truncating toward zero at
    /// [`MAX_SERIALIZED_DECIMALS`] fractional digits.
    pub fn to_serialized(&self) -> SerializedDecimalNumber {
        let capped = if self.0.fractional_digit_count() > MAX_SERIALIZED_DECIMALS {
            self.0.with_scale_round(MAX_SERIALIZED_DECIMALS, RoundingMode::Down)
        } else {
            self.0.clone()
        };
        SerializedDecimalNumber(capped.normalized().to_plain_string())
    }
}

impl fmt::Display for DecimalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_plain_string())
    }
}

impl FromStr for DecimalNumber {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s).map(Self)
    }
}

impl From<u64> for DecimalNumber {
    fn from(value: u64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl From<i64> for DecimalNumber {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl Add for DecimalNumber {
    type Output = DecimalNumber;

    fn add(self, rhs: DecimalNumber) -> DecimalNumber {
        DecimalNumber(self.0 + rhs.0)
    }
}

impl AddAssign for DecimalNumber {
    fn add_assign(&mut self, rhs: DecimalNumber) {
        self.0 += rhs.0;
    }
}

impl AddAssign<&DecimalNumber> for DecimalNumber {
    fn add_assign(&mut self, rhs: &DecimalNumber) {
        self.0 += &rhs.0;
    }
}

impl Mul for DecimalNumber {
    type Output = DecimalNumber;

    fn mul(self, rhs: DecimalNumber) -> DecimalNumber {
        DecimalNumber(self.0 * rhs.0)
    }
}

impl Mul<&DecimalNumber> for &DecimalNumber {
    type Output = DecimalNumber;

    fn mul(self, rhs: &DecimalNumber) -> DecimalNumber {
        DecimalNumber(&self.0 * &rhs.0)
    }
}

impl Sum for DecimalNumber {
    fn sum<I: Iterator<Item = DecimalNumber>>(iter: I) -> DecimalNumber {
        iter.fold(DecimalNumber::zero(), |acc, x| acc + x)
    }
}

impl Serialize for DecimalNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_serialized().as_str())
    }
}

struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = DecimalNumber;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal string or number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        DecimalNumber::from_str(value).map_err(de::Error::custom)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        DecimalNumber::from_f64(value)
            .ok_or_else(|| de::Error::custom(format!("invalid decimal number: {value}")))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(DecimalNumber::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(DecimalNumber::from(value))
    }
}

impl<'de> Deserialize<'de> for DecimalNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> DecimalNumber {
        DecimalNumber::from_str(s).unwrap()
    }

    #[test]
    fn test_from_raw_small_amount() {
        let d = DecimalNumber::from_raw(U256::from(1_500_000u64), 6);
        assert_eq!(d, dec("1.5"));
        assert_eq!(d.to_serialized().as_str(), "1.5");
    }

    #[test]
    fn test_from_raw_is_lossless_for_large_amounts() {
        // A raw amount that overflows u128, let alone f64.
        let raw = U256::from_str_radix("123456789012345678901234567890123456789", 10).unwrap();
        let d = DecimalNumber::from_raw(raw, 18);
        assert_eq!(
            d.to_string(),
            "123456789012345678901.234567890123456789"
        );
    }

    #[test]
    fn test_serialized_never_exceeds_twenty_fractional_digits() {
        let d = dec("0.123456789012345678901234567");
        let s = d.to_serialized();
        let frac = s.as_str().split('.').nth(1).unwrap();
        assert!(frac.len() <= 20);
        // Truncated at the 20th digit (a zero here), not rounded, then
        // trailing zeros stripped.
        assert_eq!(s.as_str(), "0.1234567890123456789");
    }

    #[test]
    fn test_serialized_preserves_integer_part() {
        let d = dec("987654321098765432109.999999999999999999999");
        let s = d.to_serialized();
        assert!(s.as_str().starts_with("987654321098765432109."));
    }

    #[test]
    fn test_serialized_strips_trailing_zeros() {
        assert_eq!(dec("3.5000").to_serialized().as_str(), "3.5");
        assert_eq!(dec("42.000").to_serialized().as_str(), "42");
    }

    #[test]
    fn test_serialized_zero() {
        assert_eq!(DecimalNumber::zero().to_serialized().as_str(), "0");
    }

    #[test]
    fn test_multiplicative_chain_is_exact() {
        // 0.1 * 0.2 has no exact binary representation; the decimal model
        // must produce exactly 0.02.
        let product = &dec("0.1") * &dec("0.2");
        assert_eq!(product, dec("0.02"));
    }

    #[test]
    fn test_serde_string_roundtrip() {
        let d = dec("123.456");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"123.456\"");
        let back: DecimalNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let d: DecimalNumber = serde_json::from_str("1.25").unwrap();
        assert_eq!(d, dec("1.25"));
        let d: DecimalNumber = serde_json::from_str("3").unwrap();
        assert_eq!(d, dec("3"));
    }
}
