use std::f64::consts::LN_2;

/// Switching arguments at or beyond this magnitude are saturated: their slope is zero.
pub const SWITCH_SATURATION: f64 = 250.0;

const SINHC_ASYMPTOTIC: f64 = 20.0;

/// `1 + tanh(x)` written as `2 / (1 + e^{-2x})`, exact even where `tanh(x) -> -1`.
#[inline]
pub fn one_plus_tanh(x: f64) -> f64 {
    2.0 / (1.0 + (-2.0 * x).exp())
}

#[inline]
pub fn sech_squared(x: f64) -> f64 {
    let c = x.cosh();
    1.0 / (c * c)
}

/// Derivative of a tanh switch `1 + tanh(-s * x)` with respect to `x`, or `None` when the
/// argument is saturated.
#[inline]
pub fn saturating_switch_slope(s: f64, x: f64) -> Option<f64> {
    let arg = s * x;
    if arg.abs() < SWITCH_SATURATION {
        Some(-s * sech_squared(-arg))
    } else {
        None
    }
}

/// `ln(sinh(h) / h)` for `h != 0`.
pub fn ln_sinhc(h: f64) -> f64 {
    let a = h.abs();
    if a < SINHC_ASYMPTOTIC {
        (h.sinh() / h).ln()
    } else {
        a - LN_2 + (-(-2.0 * a).exp()).ln_1p() - a.ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn one_plus_tanh_matches_naive_form_in_safe_range() {
        for &x in &[-3.0, -0.1, 0.0, 0.7, 4.0] {
            assert!(f64_approx_equal(one_plus_tanh(x), 1.0 + f64::tanh(x)));
        }
    }

    #[test]
    fn one_plus_tanh_keeps_relative_precision_in_the_lower_tail() {
        let expected = 2.0 * f64::exp(-60.0);
        assert!((one_plus_tanh(-30.0) - expected).abs() < 1e-12 * expected);
        assert_eq!(one_plus_tanh(-1000.0), 0.0);
        assert_eq!(one_plus_tanh(1000.0), 2.0);
    }

    #[test]
    fn switch_slope_is_none_when_saturated() {
        assert!(saturating_switch_slope(1.0, 250.0).is_none());
        assert!(saturating_switch_slope(-10.0, 30.0).is_none());
        let slope = saturating_switch_slope(2.0, 0.0).unwrap();
        assert!(f64_approx_equal(slope, -2.0));
    }

    #[test]
    fn ln_sinhc_is_even_and_continuous_across_asymptotic_switch() {
        assert!(f64_approx_equal(ln_sinhc(1.3), ln_sinhc(-1.3)));
        let below = ln_sinhc(SINHC_ASYMPTOTIC - 1e-9);
        let above = ln_sinhc(SINHC_ASYMPTOTIC + 1e-9);
        assert!((below - above).abs() < 1e-8);
    }

    #[test]
    fn ln_sinhc_handles_small_and_huge_arguments() {
        assert!(ln_sinhc(1e-8).abs() < 1e-15);
        let h = 5000.0;
        assert!(f64_approx_equal(ln_sinhc(h), h - LN_2 - f64::ln(h)));
    }
}
