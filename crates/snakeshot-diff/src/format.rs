//! Percentage formatting.
//!
//! Percentages are written with three significant digits, the way
//! JavaScript's `Number.prototype.toPrecision(3)` prints them: fixed notation
//! for exponents in `-6..3`, exponential otherwise, and exact halves rounded
//! away from zero.

/// Significant digits in formatted percentages.
const PRECISION: usize = 3;

/// Extra digits used to detect an exact half at the rounding position.
const TIE_PROBE_DIGITS: usize = 30;

/// Format `differing / total` as a percentage string such as `"12.3%"`.
pub fn percentage(differing: u64, total: u64) -> String {
    let ratio = if total == 0 {
        0.0
    } else {
        differing as f64 / total as f64 * 100.0
    };
    format!("{}%", to_precision3(ratio))
}

/// Three-significant-digit rendering of `value`.
pub fn to_precision3(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", PRECISION - 1, 0.0);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let x = value.abs();

    let scientific = round_half_up(x, |v| format!("{:.*e}", PRECISION - 1, v), |v| {
        let wide = format!("{:.*e}", PRECISION - 1 + TIE_PROBE_DIGITS, v);
        let mantissa = wide.split('e').next().unwrap_or_default();
        mantissa.chars().skip(PRECISION + 1).collect()
    });
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -6 || exponent >= PRECISION as i32 {
        let plus = if exponent >= 0 { "+" } else { "" };
        return format!("{}{}e{}{}", sign, mantissa, plus, exponent);
    }

    let decimals = (PRECISION as i32 - 1 - exponent).max(0) as usize;
    let fixed = round_half_up(x, |v| format!("{:.*}", decimals, v), |v| {
        let wide = format!("{:.*}", decimals + TIE_PROBE_DIGITS, v);
        wide[wide.len() - TIE_PROBE_DIGITS..].to_string()
    });
    format!("{}{}", sign, fixed)
}

/// Format `x` with `format`, rounding exact halves up.
///
/// Rust's formatter rounds halves to even; `probe` returns the digits just
/// past the rounding position so an exact half can be detected and nudged
/// to the next representable value above.
fn round_half_up(x: f64, format: impl Fn(f64) -> String, probe: impl Fn(f64) -> String) -> String {
    let tail = probe(x);
    let is_half = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if is_half {
        format(next_up(x))
    } else {
        format(x)
    }
}

/// Smallest double greater than a positive finite `x`.
fn next_up(x: f64) -> f64 {
    f64::from_bits(x.to_bits() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(to_precision3(0.0), "0.00");
        assert_eq!(percentage(0, 100), "0.00%");
    }

    #[test]
    fn test_whole_hundred() {
        assert_eq!(to_precision3(100.0), "100");
        assert_eq!(percentage(20, 20), "100%");
    }

    #[test]
    fn test_fixed_notation() {
        assert_eq!(to_precision3(12.345), "12.3");
        assert_eq!(to_precision3(1.0), "1.00");
        assert_eq!(to_precision3(0.5), "0.500");
        assert_eq!(to_precision3(0.001234), "0.00123");
        assert_eq!(to_precision3(5.5555), "5.56");
    }

    #[test]
    fn test_rounding_carries_into_next_digit() {
        assert_eq!(to_precision3(9.999), "10.0");
        assert_eq!(to_precision3(99.95), "100");
    }

    #[test]
    fn test_exact_half_rounds_up() {
        assert_eq!(to_precision3(12.25), "12.3");
        assert_eq!(to_precision3(0.125), "0.125");
        assert_eq!(to_precision3(1.125), "1.13");
        assert_eq!(to_precision3(2.5), "2.50");
    }

    #[test]
    fn test_exponential_notation() {
        assert_eq!(to_precision3(1.0e-7), "1.00e-7");
        assert_eq!(to_precision3(0.000001), "0.00000100");
        assert_eq!(to_precision3(1234.0), "1.23e+3");
    }

    #[test]
    fn test_negative() {
        assert_eq!(to_precision3(-12.345), "-12.3");
    }

    #[test]
    fn test_percentage_of_small_fraction() {
        // One pixel out of 800,000.
        assert_eq!(percentage(1, 800_000), "0.000125%");
        assert_eq!(percentage(0, 0), "0.00%");
    }
}
