use std::fmt;

/// A number that drops its trailing `.0` when displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trimmed {
    Integer(i64),
    Real(f64),
}

pub fn trim_trailing_zero(n: f64) -> Trimmed {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Trimmed::Integer(n as i64);
    }
    return Trimmed::Real(n);
}

/// Rounds half away from zero to `digits` decimal places.
pub fn round_to(n: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    return (n * factor).round() / factor;
}

/// `used / total` as a percentage with one decimal, 0 when `total` is 0.
pub fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    return round_to(used as f64 / total as f64 * 100.0, 1);
}

impl fmt::Display for Trimmed {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        return match self {
            Trimmed::Integer(n) => fmt::Display::fmt(n, formatter),
            Trimmed::Real(n) => fmt::Display::fmt(n, formatter),
        };
    }
}
