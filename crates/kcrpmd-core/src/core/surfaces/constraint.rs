use super::functions::{one_plus_tanh, saturating_switch_slope};
use super::params::KcRpmdParams;
use crate::core::hamiltonian::{DiabaticForces, DiabaticSnapshot};
use nalgebra::DVector;
use std::f64::consts::PI;

/// Kinetic-constraint term added to the kinked-pair free energy.
///
/// With `w = (V0 - V1) / K` and `x = beta * K - 1`:
///
/// - `A = a/2 * (1 + tanh(-c x))` sharpens the kinked pair around `w = 0`
/// - `C = 1 + 1/2 * (eta * sqrt(A / pi) - 1) * (1 + tanh(-d x))` restores the free energy of
///   kinked-pair formation
///
/// and the term itself is `(A w^2 - ln C) / beta`. Both switches are centred at
/// `beta * K = 1`. `K`, `A` and `C` must be positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KineticConstraint {
    beta: f64,
    eta: f64,
    a: f64,
    c: f64,
    d: f64,
    k: f64,
    asymmetry: f64,
    excess: f64,
    sharpness: f64,
    normalization: f64,
}

impl KineticConstraint {
    pub fn new(params: &KcRpmdParams, snapshot: &DiabaticSnapshot) -> Self {
        let KcRpmdParams {
            beta, eta, a, c, d, ..
        } = *params;
        let k = snapshot.k();
        let excess = beta * k - 1.0;
        let sharpness = 0.5 * a * one_plus_tanh(-c * excess);
        let normalization =
            1.0 + 0.5 * ((sharpness / PI).sqrt() * eta - 1.0) * one_plus_tanh(-d * excess);
        Self {
            beta,
            eta,
            a,
            c,
            d,
            k,
            asymmetry: (snapshot.v0() - snapshot.v1()) / k,
            excess,
            sharpness,
            normalization,
        }
    }

    /// `w = (V0 - V1) / K`.
    #[inline]
    pub fn asymmetry(&self) -> f64 {
        self.asymmetry
    }

    /// `A`.
    #[inline]
    pub fn sharpness(&self) -> f64 {
        self.sharpness
    }

    /// `C`.
    #[inline]
    pub fn normalization(&self) -> f64 {
        self.normalization
    }

    pub fn energy(&self) -> f64 {
        (self.sharpness * self.asymmetry.powi(2) - self.normalization.ln()) / self.beta
    }

    /// `-d/dq` of [`Self::energy`].
    pub fn force(&self, f: &DiabaticForces) -> DVector<f64> {
        let w = self.asymmetry;
        let ndof = f.fk.len();

        let fw = (&f.f0 - &f.f1 - &f.fk * w) / self.k;

        let fa = match saturating_switch_slope(self.c, self.excess) {
            Some(slope) => &f.fk * (0.5 * self.a * self.beta * slope),
            None => DVector::zeros(ndof),
        };

        let mut fc = DVector::zeros(ndof);
        if self.sharpness > 0.0 {
            let gate = one_plus_tanh(-self.d * self.excess);
            fc += &fa * (self.eta * gate / (4.0 * (PI * self.sharpness).sqrt()));
        }
        if let Some(slope) = saturating_switch_slope(self.d, self.excess) {
            let amplitude = (self.sharpness / PI).sqrt() * self.eta - 1.0;
            fc += &f.fk * (0.5 * self.beta * amplitude * slope);
        }

        (fa * w.powi(2) + fw * (2.0 * self.sharpness * w) - fc / self.normalization) / self.beta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(beta: f64, eta: f64, a: f64, c: f64, d: f64) -> KcRpmdParams {
        KcRpmdParams {
            beta,
            eta,
            a,
            b: 1.0,
            c,
            d,
        }
    }

    #[test]
    fn switches_take_their_midpoint_values_at_unit_beta_k() {
        let p = params(2.0, 1.5, 0.8, 3.0, 4.0);
        let constraint = KineticConstraint::new(&p, &DiabaticSnapshot::new(0.1, 0.0, 0.5));

        assert!((constraint.sharpness() - 0.4).abs() < 1e-14);
        let expected_c = 1.0 + 0.5 * ((0.4 / PI).sqrt() * 1.5 - 1.0);
        assert!((constraint.normalization() - expected_c).abs() < 1e-14);
        assert!((constraint.asymmetry() - 0.2).abs() < 1e-14);
    }

    #[test]
    fn constraint_switches_off_at_large_coupling() {
        let p = params(1000.0, 1.0, 1.0, 1.0, 1.0);
        let constraint = KineticConstraint::new(&p, &DiabaticSnapshot::new(0.0, 0.0, 0.01));
        assert!(constraint.sharpness() < 1e-7);
        assert!(constraint.energy().abs() < 1e-6);
    }

    #[test]
    fn degenerate_diabats_only_pay_the_normalization_term() {
        let p = params(1.0, 2.0, 0.5, 1.0, 1.0);
        let constraint = KineticConstraint::new(&p, &DiabaticSnapshot::new(0.3, 0.3, 0.2));
        assert_eq!(constraint.asymmetry(), 0.0);
        assert!((constraint.energy() + constraint.normalization().ln()).abs() < 1e-14);
    }

    #[test]
    fn force_matches_finite_difference() {
        // V0 = 0.1 + q, V1 = -0.2 q, K = 0.3 + 0.1 q
        let p = params(4.0, 1.7, 0.6, 0.8, 1.3);
        let energy = |q: f64| {
            KineticConstraint::new(&p, &DiabaticSnapshot::new(0.1 + q, -0.2 * q, 0.3 + 0.1 * q))
                .energy()
        };
        let forces = DiabaticForces {
            f0: DVector::from_element(1, -1.0),
            f1: DVector::from_element(1, 0.2),
            fk: DVector::from_element(1, -0.1),
        };
        for &q in &[-0.5, 0.0, 0.4] {
            let h = 1e-6;
            let numeric = -(energy(q + h) - energy(q - h)) / (2.0 * h);
            let analytic = KineticConstraint::new(
                &p,
                &DiabaticSnapshot::new(0.1 + q, -0.2 * q, 0.3 + 0.1 * q),
            )
            .force(&forces)[0];
            assert!(
                (numeric - analytic).abs() < 1e-6 * analytic.abs().max(1.0),
                "q = {q}: numeric {numeric} vs analytic {analytic}"
            );
        }
    }

    #[test]
    fn saturated_switches_contribute_no_force() {
        let p = params(1.0, 1.0, 1.0, 1000.0, 1000.0);
        let constraint = KineticConstraint::new(&p, &DiabaticSnapshot::new(0.0, 0.0, 2.0));
        let forces = DiabaticForces {
            f0: DVector::zeros(2),
            f1: DVector::zeros(2),
            fk: DVector::from_vec(vec![1.0, -1.0]),
        };
        assert_eq!(constraint.force(&forces), DVector::zeros(2));
    }
}
