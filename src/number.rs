use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Largest integer that an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A JSON number as it appears in the window.
///
/// Values compare by exact numeric equality, so `4` and `4.0` are the same
/// number. Whole values are written back out as JSON integers, which keeps
/// responses looking like `[1,2,3]` rather than `[1.0,2.0,3.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Number(f64);

impl Number {
    pub fn new(value: f64) -> Self {
        Number(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Round to two decimal places by the exact decimal value of the double,
    /// with exact ties going away from zero.
    pub fn round2(self) -> Self {
        // Only multiples of 1/8 can sit exactly halfway between two cents, and
        // those scale by 100 without error.
        if (self.0 * 8.0).fract() == 0.0 {
            return Number((self.0 * 100.0).round() / 100.0);
        }
        Number(format!("{:.2}", self.0).parse().unwrap_or(self.0))
    }

    fn is_whole(self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() <= MAX_SAFE_INTEGER
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number(value as f64)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_serialize_as_integers() {
        let numbers = vec![Number::from(1), Number::from(-20), Number::new(3.0)];
        assert_eq!(serde_json::to_string(&numbers).unwrap(), "[1,-20,3]");
    }

    #[test]
    fn fractions_serialize_as_floats() {
        assert_eq!(serde_json::to_string(&Number::new(4.25)).unwrap(), "4.25");
    }

    #[test]
    fn integers_and_floats_deserialize_to_the_same_number() {
        let a: Number = serde_json::from_str("4").unwrap();
        let b: Number = serde_json::from_str("4.0").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strings_are_not_numbers() {
        assert!(serde_json::from_str::<Number>("\"4\"").is_err());
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(Number::new(14.666_666).round2(), Number::new(14.67));
        assert_eq!(Number::new(2.0).round2(), Number::new(2.0));
        assert_eq!(Number::new(-1.005_1).round2(), Number::new(-1.01));
    }

    #[test]
    fn round2_uses_the_stored_value_not_the_literal() {
        // 1.115 and 2.675 are stored slightly below the literal.
        assert_eq!(Number::new(1.115).round2(), Number::new(1.11));
        assert_eq!(Number::new(2.675).round2(), Number::new(2.67));
        assert_eq!(Number::new(-1.115).round2(), Number::new(-1.11));
    }

    #[test]
    fn round2_sends_exact_ties_away_from_zero() {
        assert_eq!(Number::new(0.125).round2(), Number::new(0.13));
        assert_eq!(Number::new(4.375).round2(), Number::new(4.38));
        assert_eq!(Number::new(-0.125).round2(), Number::new(-0.13));
    }

    #[test]
    fn display_matches_the_wire_format() {
        assert_eq!(Number::from(7).to_string(), "7");
        assert_eq!(Number::new(7.5).to_string(), "7.5");
    }
}
