/// The dwitter `R` helper: builds a CSS `rgba()` string.
///
/// Color channels are truncated toward zero and anything non-finite becomes
/// `0`. Alpha defaults to `1`, is passed through unclamped, and also becomes
/// `0` when non-finite.
pub fn rgba(r: f64, g: f64, b: f64, a: Option<f64>) -> String {
    let alpha = match a {
        None => 1.0,
        Some(a) if a.is_finite() => a,
        Some(_) => 0.0,
    };
    format!(
        "rgba({},{},{},{})",
        channel(r),
        channel(g),
        channel(b),
        alpha
    )
}

fn channel(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_and_zeroes_non_finite() {
        assert_eq!(rgba(f64::NAN, 10.0, -5.7, Some(0.5)), "rgba(0,10,-5,0.5)");
        assert_eq!(
            rgba(f64::INFINITY, f64::NEG_INFINITY, 254.9, None),
            "rgba(0,0,254,1)"
        );
    }

    #[test]
    fn alpha_is_not_clamped() {
        assert_eq!(rgba(1.0, 2.0, 3.0, Some(2.5)), "rgba(1,2,3,2.5)");
        assert_eq!(rgba(1.0, 2.0, 3.0, Some(f64::NAN)), "rgba(1,2,3,0)");
        assert_eq!(rgba(-0.4, 0.0, 0.0, Some(-1.0)), "rgba(0,0,0,-1)");
    }
}
