use super::snapshot::{DiabaticHamiltonian, DiabaticSnapshot, HamiltonianError};
use nalgebra::Matrix2;
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Boltzmann-weighted transfer matrix of one bead at the per-bead inverse temperature.
///
/// `[[e^{-bV0}, -bK e^{-bV0}], [-bK e^{-bV1}, e^{-bV1}]]` with `b = beta / P`.
pub fn bead_m_matrix(snapshot: &DiabaticSnapshot, bead_beta: f64) -> Matrix2<f64> {
    let w0 = (-bead_beta * snapshot.v0()).exp();
    let w1 = (-bead_beta * snapshot.v1()).exp();
    let hop = -bead_beta * snapshot.k();
    Matrix2::new(w0, hop * w0, hop * w1, w1)
}

/// One M matrix per bead, for a ring polymer of `beads.len()` beads at inverse
/// temperature `beta`.
///
/// A single bead is the classical-nuclei case and uses `beta` unscaled.
#[instrument(level = "trace", skip_all, fields(beta = beta, beads = beads.len()))]
pub fn generate_m_matrices(
    beads: &[DiabaticHamiltonian],
    beta: f64,
) -> Result<Vec<Matrix2<f64>>, HamiltonianError> {
    if beads.is_empty() {
        return Err(HamiltonianError::NotAllocated);
    }
    let bead_beta = beta / beads.len() as f64;

    #[cfg(not(feature = "parallel"))]
    let iterator = beads.iter();

    #[cfg(feature = "parallel")]
    let iterator = beads.par_iter();

    iterator
        .map(|bead| {
            DiabaticSnapshot::from_hamiltonian_without_gradients(bead)
                .map(|snapshot| bead_m_matrix(&snapshot, bead_beta))
        })
        .collect()
}
