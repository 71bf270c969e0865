/// Placeholder shown for a missing value.
pub const MISSING: &str = "—";

/// Formats an optional f64 to 2 decimal places, or "—" if None.
///
/// Non-finite values are spelled out (`inf`, `-inf`, `NaN`) rather than
/// hidden: an average over zero dismissals is a real answer.
pub fn fmt_float(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.2}"),
        Some(x) if x.is_nan() => "NaN".to_owned(),
        Some(x) if x.is_sign_negative() => "-inf".to_owned(),
        Some(_) => "inf".to_owned(),
        None => MISSING.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_float() {
        assert_eq!(fmt_float(Some(0.456)), "0.46");
        assert_eq!(fmt_float(Some(12.0)), "12.00");
        assert_eq!(fmt_float(Some(f64::INFINITY)), "inf");
        assert_eq!(fmt_float(Some(f64::NEG_INFINITY)), "-inf");
        assert_eq!(fmt_float(Some(f64::NAN)), "NaN");
        assert_eq!(fmt_float(None), "—");
    }
}
