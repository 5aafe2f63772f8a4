use std::fmt;

use crate::config::ColumnsConfig;
use crate::operators::render::format_ratio;

/// Region name used when a line has no field at the region position.
pub const MISSING_FIELD: &str = "undefined";

/// An integer read from a CSV field, or the not-a-number sentinel when the
/// field holds no leading digits. Digit runs too long for `i64` are kept as
/// the nearest `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
    NaN,
}

impl Number {
    /// Parse like a base-10 `parseInt`: skip leading whitespace (BOM
    /// included), accept an optional sign, then take the longest run of ASCII
    /// digits. Anything after the digits is ignored.
    pub fn parse(field: &str) -> Self {
        let s = field.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return Number::NaN;
        }

        let mut value: i64 = 0;
        for b in digits[..end].bytes() {
            let digit = i64::from(b - b'0');
            value = match value.checked_mul(10).and_then(|v| {
                if negative {
                    v.checked_sub(digit)
                } else {
                    v.checked_add(digit)
                }
            }) {
                Some(v) => v,
                None => return Self::parse_float(negative, &digits[..end]),
            };
        }
        Number::Int(value)
    }

    fn parse_float(negative: bool, digits: &str) -> Self {
        match digits.parse::<f64>() {
            Ok(v) if negative => Number::Float(-v),
            Ok(v) => Number::Float(v),
            Err(_) => Number::NaN,
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
            Number::NaN => f64::NAN,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => f.write_str(&format_ratio(*v)),
            Number::NaN => f.write_str("NaN"),
        }
    }
}

/// The fields of interest from one input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub year: Number,
    pub region: String,
    pub population: Number,
}

impl Row {
    /// Split a line on `,` and pick the year, region and population fields.
    /// Never fails: missing or non-numeric fields become sentinels.
    pub fn parse(line: &str, columns: &ColumnsConfig) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split(',').collect();
        let field = |idx: usize| fields.get(idx).copied();

        Row {
            year: field(columns.year).map_or(Number::NaN, Number::parse),
            region: field(columns.region).unwrap_or(MISSING_FIELD).to_string(),
            population: field(columns.population).map_or(Number::NaN, Number::parse),
        }
    }
}
