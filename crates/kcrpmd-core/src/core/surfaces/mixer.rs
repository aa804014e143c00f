use super::auxiliary::Basin;
use nalgebra::DVector;
use std::ops::{Add, AddAssign};
use tracing::warn;

/// The three competing free-energy surfaces of one bead, in basin order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceEnergies {
    pub v0: f64,
    pub vkp: f64,
    pub v1: f64,
}

impl SurfaceEnergies {
    pub fn new(v0: f64, vkp: f64, v1: f64) -> Self {
        Self { v0, vkp, v1 }
    }

    /// Soft-gate penalties of every surface at auxiliary coordinate `y`.
    pub fn gate_penalties(y: f64, b: f64, beta: f64) -> Self {
        let [v0, vkp, v1] = Basin::ALL.map(|basin| basin.penalty(y, b, beta));
        Self { v0, vkp, v1 }
    }

    /// Forces on `y` from the soft-gate penalty of every surface.
    pub fn gate_forces(y: f64, b: f64, beta: f64) -> Self {
        let [v0, vkp, v1] = Basin::ALL.map(|basin| basin.force(y, b, beta));
        Self { v0, vkp, v1 }
    }

    #[inline]
    pub fn as_array(&self) -> [f64; 3] {
        [self.v0, self.vkp, self.v1]
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.v0.min(self.vkp).min(self.v1)
    }
}

impl Add for SurfaceEnergies {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            v0: self.v0 + rhs.v0,
            vkp: self.vkp + rhs.vkp,
            v1: self.v1 + rhs.v1,
        }
    }
}

impl AddAssign for SurfaceEnergies {
    fn add_assign(&mut self, rhs: Self) {
        self.v0 += rhs.v0;
        self.vkp += rhs.vkp;
        self.v1 += rhs.v1;
    }
}

/// Log-sum-exp blend of [`SurfaceEnergies`] at inverse temperature `beta`.
///
/// Weights are formed relative to the lowest surface so that at least one of them is
/// exactly one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoltzmannMixer {
    beta: f64,
    shift: f64,
    weights: [f64; 3],
    partition: f64,
}

impl BoltzmannMixer {
    pub fn new(energies: &SurfaceEnergies, beta: f64) -> Self {
        let shift = energies.min();
        let weights = energies.as_array().map(|v| (-beta * (v - shift)).exp());
        let partition: f64 = weights.iter().sum();
        if !(partition.is_finite() && partition >= 1.0) {
            warn!(
                ?energies,
                partition, "Degenerate Boltzmann sum while mixing KC-RPMD surfaces."
            );
        }
        Self {
            beta,
            shift,
            weights,
            partition,
        }
    }

    #[inline]
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// `Vshift - ln(sum_i e^{-beta (V_i - Vshift)}) / beta`.
    pub fn free_energy(&self) -> f64 {
        self.shift - self.partition.ln() / self.beta
    }

    /// Normalized Boltzmann populations of `[V0, VKP, V1]`.
    pub fn populations(&self) -> [f64; 3] {
        self.weights.map(|w| w / self.partition)
    }

    pub fn mix_scalar(&self, values: &SurfaceEnergies) -> f64 {
        let [p0, pkp, p1] = self.populations();
        p0 * values.v0 + pkp * values.vkp + p1 * values.v1
    }

    pub fn mix_vectors(
        &self,
        f0: &DVector<f64>,
        fkp: &DVector<f64>,
        f1: &DVector<f64>,
    ) -> DVector<f64> {
        let [w0, wkp, w1] = self.weights;
        (f0 * w0 + fkp * wkp + f1 * w1) / self.partition
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
    fn free_energy_matches_unshifted_log_sum_exp() {
        let energies = SurfaceEnergies::new(0.3, 0.1, -0.2);
        let beta = 3.0;
        let sum: f64 = energies.as_array().iter().map(|v| (-beta * v).exp()).sum();
        let naive = -sum.ln() / beta;
        let mixer = BoltzmannMixer::new(&energies, beta);
        assert!(f64_approx_equal(mixer.free_energy(), naive));
        assert_eq!(mixer.shift(), -0.2);
    }

    #[test]
    fn free_energy_survives_huge_energies() {
        let energies = SurfaceEnergies::new(1e6, 1e6 + 1.0, 1e6 + 2.0);
        let mixer = BoltzmannMixer::new(&energies, 1000.0);
        assert!(f64_approx_equal(mixer.free_energy(), 1e6));
    }

    #[test]
    fn equal_surfaces_lower_free_energy_by_ln_three() {
        let energies = SurfaceEnergies::new(0.0, 0.0, 0.0);
        let mixer = BoltzmannMixer::new(&energies, 2.0);
        assert!(f64_approx_equal(mixer.free_energy(), -3.0f64.ln() / 2.0));
    }

    #[test]
    fn populations_sum_to_one_and_favor_lowest_surface() {
        let mixer = BoltzmannMixer::new(&SurfaceEnergies::new(1.0, 0.0, 2.0), 1.5);
        let [p0, pkp, p1] = mixer.populations();
        assert!(f64_approx_equal(p0 + pkp + p1, 1.0));
        assert!(pkp > p0 && p0 > p1);
    }

    #[test]
    fn mixed_scalar_and_vector_agree() {
        let mixer = BoltzmannMixer::new(&SurfaceEnergies::new(0.2, -0.1, 0.4), 4.0);
        let forces = SurfaceEnergies::new(1.0, -2.0, 3.0);
        let scalar = mixer.mix_scalar(&forces);
        let vector = mixer.mix_vectors(
            &DVector::from_element(1, 1.0),
            &DVector::from_element(1, -2.0),
            &DVector::from_element(1, 3.0),
        );
        assert!(f64_approx_equal(scalar, vector[0]));
    }

    #[test]
    fn gate_penalties_follow_basin_order() {
        let penalties = SurfaceEnergies::gate_penalties(-1.0, 20.0, 1.0);
        assert!(penalties.v0 < penalties.vkp);
        assert!(penalties.vkp < penalties.v1);
    }

    #[test]
    fn add_assign_accumulates_each_surface() {
        let mut total = SurfaceEnergies::new(1.0, 2.0, 3.0);
        total += SurfaceEnergies::new(0.5, -1.0, 0.0);
        assert_eq!(total, SurfaceEnergies::new(1.5, 1.0, 3.0));
        assert_eq!(total + SurfaceEnergies::default(), total);
    }
}
