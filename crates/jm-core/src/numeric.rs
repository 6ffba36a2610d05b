use std::fmt;
use std::ops::Add;

/// Significant digits kept when a float total is rendered back into an attribute.
const FLOAT_PRECISION: usize = 14;

/// A numeric attribute value as found on `testsuite`/`testcase` elements.
///
/// Counters such as `tests` stay integers while they only meet integers;
/// `time` and friends turn the sum into a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn parse(raw: &str) -> Option<Self> {
        let source = raw.trim();
        if !is_numeric_literal(source) {
            return None;
        }

        if let Ok(value) = source.parse::<i64>() {
            return Some(Self::Int(value));
        }

        source
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Self::Float)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl Add for Numeric {
    type Output = Numeric;

    fn add(self, other: Self) -> Self::Output {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => left
                .checked_add(right)
                .map(Self::Int)
                .unwrap_or(Self::Float(left as f64 + right as f64)),
            (left, right) => Self::Float(left.as_f64() + right.as_f64()),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{}", value),
            Self::Float(value) => f.write_str(&format_float(*value)),
        }
    }
}

fn format_float(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    // Round through scientific notation to drop binary noise such as 0.30000000000000004.
    let rounded = format!("{:.*e}", FLOAT_PRECISION - 1, value)
        .parse::<f64>()
        .unwrap_or(value);
    format!("{}", rounded)
}

// sign? digits [. digits] [e sign? digits], with at least one mantissa digit
fn is_numeric_literal(source: &str) -> bool {
    let bytes = source.as_bytes();
    let mut index = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        index += 1;
    }

    let mut mantissa_digits = 0;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
        mantissa_digits += 1;
    }
    if index < bytes.len() && bytes[index] == b'.' {
        index += 1;
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }

    if index < bytes.len() && matches!(bytes[index], b'e' | b'E') {
        index += 1;
        if index < bytes.len() && matches!(bytes[index], b'+' | b'-') {
            index += 1;
        }
        let exponent_start = index;
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
        }
        if index == exponent_start {
            return false;
        }
    }

    index == bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_integer_and_float_literals() {
        assert_eq!(Numeric::parse("3"), Some(Numeric::Int(3)));
        assert_eq!(Numeric::parse("-2"), Some(Numeric::Int(-2)));
        assert_eq!(Numeric::parse(" 7 "), Some(Numeric::Int(7)));
        assert_eq!(Numeric::parse("0.25"), Some(Numeric::Float(0.25)));
        assert_eq!(Numeric::parse(".5"), Some(Numeric::Float(0.5)));
        assert_eq!(Numeric::parse("1e3"), Some(Numeric::Float(1000.0)));
    }

    #[test]
    fn parse_rejects_non_numeric_values() {
        for raw in ["", " ", "abc", "1a", "inf", "NaN", "1e", ".", "-", "Tests\\Unit"] {
            assert_eq!(Numeric::parse(raw), None, "{raw:?} should not be numeric");
        }
    }

    #[test]
    fn addition_keeps_integers_and_promotes_floats() {
        assert_eq!(Numeric::Int(1) + Numeric::Int(2), Numeric::Int(3));
        assert_eq!(
            Numeric::Int(1) + Numeric::Float(0.5),
            Numeric::Float(1.5)
        );
        assert_eq!(
            Numeric::Int(i64::MAX) + Numeric::Int(1),
            Numeric::Float(i64::MAX as f64 + 1.0)
        );
    }

    #[test]
    fn display_rounds_float_noise() {
        let total = Numeric::Float(0.1) + Numeric::Float(0.2);
        assert_eq!(total.to_string(), "0.3");
        assert_eq!(Numeric::Float(3.0).to_string(), "3");
        assert_eq!(Numeric::Float(0.151037).to_string(), "0.151037");
        assert_eq!(Numeric::Float(-0.0).to_string(), "0");
        assert_eq!(Numeric::Int(42).to_string(), "42");
    }
}
