// Parsing and formatting helpers.
//
// CSV cells arrive as optional text; these helpers turn them into typed
// values so the loaders can stay short.
use num_format::{Locale, ToFormattedString};

/// Parse a decimal number, tolerating surrounding whitespace.
///
/// - Accepts `Option<&str>` so callers can pass optional fields through.
/// - Rejects values containing alphabetic characters.
/// - Returns `None` for empty or unparsable input.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Parse an integer count. Signs are kept: a negative count is reported by
/// the aggregator, not dropped here.
pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}

/// Trimmed owned copy of an optional cell, empty when missing.
pub fn cell(s: Option<String>) -> String {
    s.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators, e.g. `1,234.50`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Money cell for the travel report: `1,234.50€`, or `fallback` when the
/// trip carries no cost.
pub fn format_cost(cost: Option<f64>, fallback: &str) -> String {
    match cost {
        Some(c) => format!("{}€", format_number(c, 2)),
        None => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_counts() {
        assert_eq!(parse_i64_safe(Some(" 12 ")), Some(12));
        assert_eq!(parse_i64_safe(Some("-3")), Some(-3));
        assert_eq!(parse_i64_safe(Some("")), None);
        assert_eq!(parse_i64_safe(Some("abc")), None);
        assert_eq!(parse_i64_safe(None), None);
    }

    #[test]
    fn parses_coordinates() {
        assert_eq!(parse_f64_safe(Some("48.86")), Some(48.86));
        assert_eq!(parse_f64_safe(Some(" -0.37")), Some(-0.37));
        assert_eq!(parse_f64_safe(Some("N48")), None);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(218.39999, 2), 218.4);
        assert_eq!(round_to(9.245, 1), 9.2);
        assert_eq!(round_to(32.6, 0), 33.0);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_number(1234.5, 2), "1,234.50");
        assert_eq!(format_number(-0.0, 1), "0.0");
        assert_eq!(format_number(32.6, 1), "32.6");
        assert_eq!(format_int(9855usize), "9,855");
        assert_eq!(format_cost(Some(10.5), "-"), "10.50€");
        assert_eq!(format_cost(None, "-"), "-");
    }
}
