use super::functions::ln_sinhc;
use crate::core::hamiltonian::{DiabaticForces, DiabaticSnapshot};
use nalgebra::DVector;
use tracing::trace;

/// Above this value of `beta * K` the adiabatic closed form is numerically safe.
pub const COUPLING_THRESHOLD: f64 = 1e-3;
/// Above this value of `beta * |V0 - V1|` the `sinh(x)/x` factor is resolved.
pub const SPLITTING_THRESHOLD: f64 = 1e-7;

/// Closed form used for the kinked-pair free energy.
///
/// Energy and force must always be evaluated in the same regime for the same input,
/// so both go through [`KinkedPairRegime::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KinkedPairRegime {
    /// `beta * K > 1e-3`: exact expression in terms of the adiabatic energies.
    Adiabatic,
    /// Small coupling, resolved diabatic splitting: second order in `K`.
    WeakCoupling,
    /// Small coupling and degenerate diabats.
    Degenerate,
}

/// Ground and excited adiabatic energies of the 2x2 diabatic Hamiltonian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdiabaticPair {
    pub ground: f64,
    pub excited: f64,
    /// `sqrt((V0 - V1)^2 + (2K)^2)`, the adiabatic gap.
    pub gap: f64,
}

impl AdiabaticPair {
    pub fn new(v0: f64, v1: f64, k: f64) -> Self {
        let mean = 0.5 * (v0 + v1);
        let gap = ((v0 - v1).powi(2) + (2.0 * k).powi(2)).sqrt();
        Self {
            ground: mean - 0.5 * gap,
            excited: mean + 0.5 * gap,
            gap,
        }
    }

    /// Forces on the ground and excited states, `(Fg, Fe)`.
    pub fn forces(&self, v0: f64, v1: f64, k: f64, f: &DiabaticForces) -> (DVector<f64>, DVector<f64>) {
        let mean = (&f.f0 + &f.f1) * 0.5;
        let gap_force = ((&f.f0 - &f.f1) * (v0 - v1) + &f.fk * (4.0 * k)) / (2.0 * self.gap);
        (&mean - &gap_force, mean + gap_force)
    }
}

impl KinkedPairRegime {
    pub fn select(beta: f64, v0: f64, v1: f64, k: f64) -> Self {
        if beta * k > COUPLING_THRESHOLD {
            Self::Adiabatic
        } else if beta * (v0 - v1).abs() > SPLITTING_THRESHOLD {
            Self::WeakCoupling
        } else {
            Self::Degenerate
        }
    }

    pub fn energy(self, beta: f64, v0: f64, v1: f64, k: f64) -> f64 {
        match self {
            Self::Adiabatic => {
                let pair = AdiabaticPair::new(v0, v1, k);
                let (e_excited, e0, e1) = adiabatic_boltzmann_factors(beta, v0, v1, &pair);
                pair.ground - (1.0 + e_excited - e0 - e1).ln() / beta
            }
            Self::WeakCoupling => {
                let half_splitting = 0.5 * beta * (v0 - v1);
                0.5 * (v0 + v1) - ((beta * k).powi(2).ln() + ln_sinhc(half_splitting)) / beta
            }
            Self::Degenerate => 0.5 * (v0 + v1) - (beta * k).powi(2).ln() / beta,
        }
    }

    pub fn force(self, beta: f64, v0: f64, v1: f64, k: f64, f: &DiabaticForces) -> DVector<f64> {
        let mean = (&f.f0 + &f.f1) * 0.5;
        match self {
            Self::Adiabatic => {
                let pair = AdiabaticPair::new(v0, v1, k);
                let (fg, fe) = pair.forces(v0, v1, k, f);
                let (e_excited, e0, e1) = adiabatic_boltzmann_factors(beta, v0, v1, &pair);
                let partition = 1.0 + e_excited - e0 - e1;
                (fg + fe * e_excited - &f.f0 * e0 - &f.f1 * e1) / partition
            }
            Self::WeakCoupling => {
                let splitting = v0 - v1;
                let half_splitting = 0.5 * beta * splitting;
                let slope = 1.0 / (beta * splitting) - 0.5 / half_splitting.tanh();
                mean + (&f.f0 - &f.f1) * slope - &f.fk * (2.0 / (beta * k))
            }
            Self::Degenerate => mean - &f.fk * (2.0 / (beta * k)),
        }
    }
}

// e^{-beta (Ve - Vg)}, e^{-beta (V0 - Vg)}, e^{-beta (V1 - Vg)}
fn adiabatic_boltzmann_factors(beta: f64, v0: f64, v1: f64, pair: &AdiabaticPair) -> (f64, f64, f64) {
    let splitting = v0 - v1;
    (
        (-beta * pair.gap).exp(),
        (-0.5 * beta * (pair.gap + splitting)).exp(),
        (-0.5 * beta * (pair.gap - splitting)).exp(),
    )
}

/// Bare kinked-pair free energy `VKP(V0, V1, K)`, before the kinetic constraint.
///
/// Diverges to `+inf` as `K -> 0`; `K = 0` is a singular input.
pub fn kinked_pair_energy(snapshot: &DiabaticSnapshot, beta: f64) -> f64 {
    let (v0, v1, k) = (snapshot.v0(), snapshot.v1(), snapshot.k());
    let regime = KinkedPairRegime::select(beta, v0, v1, k);
    trace!(?regime, beta_k = beta * k, "Selected kinked-pair regime.");
    regime.energy(beta, v0, v1, k)
}

/// Force on the bare kinked-pair surface, `-dVKP/dq`.
pub fn kinked_pair_force(
    snapshot: &DiabaticSnapshot,
    forces: &DiabaticForces,
    beta: f64,
) -> DVector<f64> {
    let (v0, v1, k) = (snapshot.v0(), snapshot.v1(), snapshot.k());
    let regime = KinkedPairRegime::select(beta, v0, v1, k);
    trace!(?regime, beta_k = beta * k, "Selected kinked-pair regime.");
    regime.force(beta, v0, v1, k, forces)
}
