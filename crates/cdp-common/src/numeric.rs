//! Numeric coercion of raw text cells.
//!
//! Unlike free-text cleaning this does not strip thousands separators: a
//! value such as `"1,5"` is not a number and forces its column to text.

/// A successfully parsed numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// Parsed directly as a signed integer.
    Integer(i64),
    /// Parsed as a finite float (may still be integral, e.g. `"2.0"`).
    Float(f64),
}

impl Numeric {
    /// Returns the value as a float.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Returns the value as an integer when it has no fractional part.
    pub fn as_integral(self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(v),
            Self::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Some(v as i64),
            Self::Float(_) => None,
        }
    }
}

/// Parse a string value as a number.
///
/// Handles:
/// - Integers: `"123"`, `"-45"`
/// - Decimals and scientific notation: `"59.33"`, `"1.5e3"`
/// - Surrounding whitespace: `"  7  "`
///
/// Empty strings, NaN and infinities are not numbers.
pub fn parse_numeric(value: &str) -> Option<Numeric> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(Numeric::Integer(v));
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(Numeric::Float(v)),
        _ => None,
    }
}
