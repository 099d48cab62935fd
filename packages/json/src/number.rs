//! Numeric representation with bounds-checked coercion.

use std::fmt;

/// A JSON number.
///
/// # Design Notes
///
/// - `Int` holds every integer that fits in `i64`.
/// - `UInt` only holds integers above `i64::MAX`; constructors normalize
///   smaller unsigned values into `Int`, so each integer has one
///   representation.
/// - `Float` may carry NaN or an infinity. Such values are kept as given but
///   are "not a number" for every coercion below and serialize as `null`.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    /// True for integers and finite floats.
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Int(_) | Number::UInt(_) => true,
            Number::Float(f) => f.is_finite(),
        }
    }

    /// True when the number is stored as an integer (never for floats, even
    /// `1.0`).
    pub fn is_integral(&self) -> bool {
        matches!(self, Number::Int(_) | Number::UInt(_))
    }

    /// Coerce to a 32-bit signed integer.
    ///
    /// Returns `None` for floats and for integers outside the `i32` range.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Number::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Coerce to a 64-bit signed integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Coerce to a 64-bit unsigned integer. Negative values fail.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Int(i) => u64::try_from(*i).ok(),
            Number::UInt(u) => Some(*u),
            Number::Float(_) => None,
        }
    }

    /// Coerce to a double. Integers always convert (possibly rounding);
    /// NaN and infinities fail.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Int(i) => Some(*i as f64),
            Number::UInt(u) => Some(*u as f64),
            Number::Float(f) if f.is_finite() => Some(*f),
            Number::Float(_) => None,
        }
    }

    /// The number as written in strict mode: integers outside the `i32`
    /// range become doubles.
    pub fn strict(&self) -> Number {
        match self {
            Number::Int(i) if i32::try_from(*i).is_ok() => *self,
            Number::Int(i) => Number::Float(*i as f64),
            Number::UInt(u) => Number::Float(*u as f64),
            Number::Float(_) => *self,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::UInt(a), Number::UInt(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::UInt(u) => write!(f, "{}", u),
            Number::Float(v) => match serde_json::Number::from_f64(*v) {
                Some(n) => write!(f, "{}", n),
                None => f.write_str("null"),
            },
        }
    }
}

macro_rules! number_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(v: $t) -> Self {
                    Number::Int(i64::from(v))
                }
            }
        )*
    };
}

number_from_signed!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Number::Int(i),
            Err(_) => Number::UInt(v),
        }
    }
}

impl From<usize> for Number {
    fn from(v: usize) -> Self {
        Number::from(v as u64)
    }
}

impl From<f32> for Number {
    fn from(v: f32) -> Self {
        Number::Float(f64::from(v))
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_outside_int_range_is_not_an_integer() {
        let n = Number::from(i64::from(i32::MAX) + 1);
        assert_eq!(n.as_i32(), None);
        assert_eq!(n.as_i64(), Some(2_147_483_648));

        let n = Number::from(i64::from(i32::MIN) - 1);
        assert_eq!(n.as_i32(), None);
    }

    #[test]
    fn int_range_edges_are_integers() {
        assert_eq!(Number::from(i32::MAX).as_i32(), Some(i32::MAX));
        assert_eq!(Number::from(i32::MIN).as_i32(), Some(i32::MIN));
    }

    #[test]
    fn non_finite_floats_are_not_numbers() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let n = Number::from(v);
            assert!(!n.is_finite());
            assert_eq!(n.as_f64(), None);
        }
    }

    #[test]
    fn floats_never_coerce_to_integers() {
        let n = Number::from(3.0);
        assert_eq!(n.as_i32(), None);
        assert_eq!(n.as_i64(), None);
        assert_eq!(n.as_f64(), Some(3.0));
    }

    #[test]
    fn unsigned_is_normalized() {
        assert!(matches!(Number::from(5u64), Number::Int(5)));
        assert!(matches!(Number::from(u64::MAX), Number::UInt(u64::MAX)));
        assert_eq!(Number::from(u64::MAX).as_i64(), None);
        assert_eq!(Number::from(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Number::from(-1).as_u64(), None);
    }

    #[test]
    fn strict_widens_large_integers_to_doubles() {
        assert_eq!(Number::from(7).strict(), Number::Int(7));
        assert_eq!(
            Number::from(10_000_000_000i64).strict(),
            Number::Float(1e10)
        );
        assert!(matches!(Number::from(u64::MAX).strict(), Number::Float(_)));
    }

    #[test]
    fn display() {
        assert_eq!(Number::from(42).to_string(), "42");
        assert_eq!(Number::from(1.5).to_string(), "1.5");
        assert_eq!(Number::from(f64::NAN).to_string(), "null");
    }
}
