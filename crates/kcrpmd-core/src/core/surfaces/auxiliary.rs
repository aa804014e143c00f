use super::functions::one_plus_tanh;

/// Region of the auxiliary coordinate `y` that each free-energy surface is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basin {
    /// Diabat 0, centred at `y = -1`.
    Reactant,
    /// Kinked pair, centred at `y = 0`.
    KinkedPair,
    /// Diabat 1, centred at `y = +1`.
    Product,
}

impl Basin {
    pub const ALL: [Basin; 3] = [Basin::Reactant, Basin::KinkedPair, Basin::Product];

    #[inline]
    pub fn center(self) -> f64 {
        match self {
            Basin::Reactant => -1.0,
            Basin::KinkedPair => 0.0,
            Basin::Product => 1.0,
        }
    }

    pub fn penalty(self, y: f64, b: f64, beta: f64) -> f64 {
        soft_gate_penalty(y - self.center(), b, beta)
    }

    pub fn force(self, y: f64, b: f64, beta: f64) -> f64 {
        soft_gate_force(y - self.center(), b, beta)
    }
}

/// Soft wall `ln(1 + e^{b(2|x| - 1)}) / beta` around a basin centre, `x = y - center`.
///
/// Close to zero for `|x| < 1/2` and rising linearly as `b(2|x| - 1)/beta` outside; `b`
/// sets how sharp the transition at `|x| = 1/2` is.
pub fn soft_gate_penalty(x: f64, b: f64, beta: f64) -> f64 {
    let z = b * (2.0 * x.abs() - 1.0);
    if x.abs() < 0.5 {
        z.exp().ln_1p() / beta
    } else {
        (z + (-z).exp().ln_1p()) / beta
    }
}

/// `-d/dy` of [`soft_gate_penalty`]: `-sign(x) b (1 + tanh(b(|x| - 1/2))) / beta`.
///
/// At `x = 0` exactly the wall pushes towards positive `y`.
pub fn soft_gate_force(x: f64, b: f64, beta: f64) -> f64 {
    let magnitude = b * one_plus_tanh(b * (x.abs() - 0.5)) / beta;
    if x > 0.0 { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basin_centres_are_ordered_reactant_kink_product() {
        assert_eq!(Basin::Reactant.center(), -1.0);
        assert_eq!(Basin::KinkedPair.center(), 0.0);
        assert_eq!(Basin::Product.center(), 1.0);
    }

    #[test]
    fn penalty_is_finite_and_small_at_basin_centre() {
        for basin in Basin::ALL {
            let penalty = basin.penalty(basin.center(), 50.0, 1.0);
            assert!(penalty.is_finite());
            assert!(penalty < 1e-20);
        }
    }

    #[test]
    fn both_branches_agree_at_the_wall() {
        let (b, beta) = (7.0, 3.0);
        let inside = soft_gate_penalty(0.5 - 1e-12, b, beta);
        let outside = soft_gate_penalty(0.5, b, beta);
        assert!((inside - outside).abs() < 1e-10);
        assert!((outside - std::f64::consts::LN_2 / beta).abs() < 1e-14);
    }

    #[test]
    fn penalty_equals_naive_softplus_in_safe_range() {
        for &x in &[-1.3, -0.7, -0.2, 0.0, 0.3, 0.6, 2.0] {
            let z = 4.0 * (2.0 * f64::abs(x) - 1.0);
            let expected = (1.0 + z.exp()).ln() / 2.0;
            assert!((soft_gate_penalty(x, 4.0, 2.0) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn sharp_gate_converges_to_hard_wall() {
        let (b, beta) = (1e4, 2.0);
        assert!(soft_gate_penalty(0.3, b, beta) < 1e-300);
        let outside = soft_gate_penalty(0.8, b, beta);
        let wall = b * (2.0 * 0.8 - 1.0) / beta;
        assert!((outside - wall).abs() < 1e-9 * wall);
    }

    #[test]
    fn sharp_gate_does_not_overflow() {
        let penalty = soft_gate_penalty(5.0, 1e6, 1.0);
        assert!(penalty.is_finite());
        assert!(soft_gate_force(5.0, 1e6, 1.0).is_finite());
    }

    #[test]
    fn force_points_back_towards_basin_centre() {
        assert!(Basin::Product.force(1.8, 5.0, 1.0) < 0.0);
        assert!(Basin::Product.force(0.2, 5.0, 1.0) > 0.0);
        assert!(Basin::Reactant.force(-0.4, 5.0, 1.0) < 0.0);
        assert!(soft_gate_force(0.0, 5.0, 1.0) > 0.0);
    }

    #[test]
    fn force_matches_finite_difference_of_penalty() {
        let (b, beta) = (6.0, 2.5);
        for basin in Basin::ALL {
            for &y in &[-1.7, -0.9, -0.45, 0.1, 0.55, 1.2] {
                let h = 1e-6;
                let numeric = -(basin.penalty(y + h, b, beta) - basin.penalty(y - h, b, beta))
                    / (2.0 * h);
                let analytic = basin.force(y, b, beta);
                assert!(
                    (numeric - analytic).abs() < 1e-6 * analytic.abs().max(1.0),
                    "{basin:?} at y = {y}: numeric {numeric} vs analytic {analytic}"
                );
            }
        }
    }
}
