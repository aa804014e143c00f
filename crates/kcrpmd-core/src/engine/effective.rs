use super::error::KcRpmdError;
use super::ring_polymer::{ClassicalNuclei, RingPolymerInternal};
use crate::core::hamiltonian::{
    DiabaticForces, DiabaticHamiltonian, DiabaticSnapshot, HamiltonianError, generate_m_matrices,
};
use crate::core::surfaces::constraint::KineticConstraint;
use crate::core::surfaces::kinked_pair::{kinked_pair_energy, kinked_pair_force};
use crate::core::surfaces::mixer::{BoltzmannMixer, SurfaceEnergies};
use crate::core::surfaces::params::KcRpmdParams;
use nalgebra::{DMatrix, DVector, Matrix2};
use tracing::{instrument, trace};

const POTENTIAL_ROUTINE: &str = "kcrpmd_effective_potential";
const FORCE_ROUTINE: &str = "kcrpmd_effective_force";
const AUXILIARY_FORCE_ROUTINE: &str = "kcrpmd_effective_auxiliary_force";
const M_MATRICES_ROUTINE: &str = "generate_m_matrices";

/// KC-RPMD evaluator for one set of parameters.
///
/// Each public operation takes the bead Hamiltonians (one per ring-polymer bead, owned by
/// the host), the auxiliary coordinate `y` and, for nuclear quantities, the `ndof x ntraj`
/// coordinates and `ndof x 1` inverse masses. Only the classical-nuclei case (one bead,
/// one trajectory column) is implemented; the quantum-nuclei case is reported as
/// [`KcRpmdError::QuantumNucleiUnsupported`].
#[derive(Debug, Clone)]
pub struct KcRpmd<R = ClassicalNuclei> {
    params: KcRpmdParams,
    internal: R,
}

impl KcRpmd<ClassicalNuclei> {
    pub fn new(params: KcRpmdParams) -> Self {
        Self::with_internal(params, ClassicalNuclei)
    }
}

impl<R: RingPolymerInternal> KcRpmd<R> {
    pub fn with_internal(params: KcRpmdParams, internal: R) -> Self {
        Self { params, internal }
    }

    pub fn params(&self) -> &KcRpmdParams {
        &self.params
    }

    /// Effective potential: ring-polymer internal potential plus the Boltzmann-blended
    /// free energy of the gated `V0`, `VKP` and `V1` surfaces.
    #[instrument(
        level = "trace",
        skip_all,
        err(level = "debug"),
        fields(beta = self.params.beta, beads = beads.len())
    )]
    pub fn effective_potential(
        &self,
        beads: &[DiabaticHamiltonian],
        y_aux: &[f64],
        q: &DMatrix<f64>,
        inv_m: &DMatrix<f64>,
    ) -> Result<f64, KcRpmdError> {
        let routine = POTENTIAL_ROUTINE;
        let y = auxiliary_coordinate(routine, y_aux)?;
        check_inverse_masses(routine, q, inv_m)?;
        let snapshot = classical_bead(routine, beads, q.ncols(), false)?;

        let electronic = self.electronic_potential(&snapshot, y);
        Ok(self.internal.potential(q, inv_m, self.params.beta) + electronic)
    }

    /// Effective nuclear force, shaped like `q`.
    #[instrument(
        level = "trace",
        skip_all,
        err(level = "debug"),
        fields(beta = self.params.beta, beads = beads.len())
    )]
    pub fn effective_force(
        &self,
        beads: &[DiabaticHamiltonian],
        y_aux: &[f64],
        q: &DMatrix<f64>,
        inv_m: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>, KcRpmdError> {
        let routine = FORCE_ROUTINE;
        let y = auxiliary_coordinate(routine, y_aux)?;
        check_inverse_masses(routine, q, inv_m)?;
        let snapshot = classical_bead(routine, beads, q.ncols(), true)?;
        let forces = snapshot
            .forces()
            .ok_or(KcRpmdError::MissingDerivatives { routine })?;
        if forces.f0.len() != q.nrows() {
            return Err(KcRpmdError::DofMismatch {
                routine,
                ndof: q.nrows(),
                nderiv: forces.f0.len(),
            });
        }

        let electronic = self.electronic_force(&snapshot, &forces, y);
        let mut result = self.internal.force(q, inv_m, self.params.beta);
        if result.shape() != q.shape() {
            return Err(KcRpmdError::InternalForceShape {
                routine,
                rows: result.nrows(),
                cols: result.ncols(),
                ndof: q.nrows(),
                ntraj: q.ncols(),
            });
        }
        let mut column = result.column_mut(0);
        column += &electronic;
        Ok(result)
    }

    /// Force conjugate to the auxiliary coordinate, one entry per kink coordinate.
    #[instrument(
        level = "trace",
        skip_all,
        err(level = "debug"),
        fields(beta = self.params.beta, beads = beads.len())
    )]
    pub fn effective_auxiliary_force(
        &self,
        beads: &[DiabaticHamiltonian],
        y_aux: &[f64],
    ) -> Result<Vec<f64>, KcRpmdError> {
        let routine = AUXILIARY_FORCE_ROUTINE;
        let y = auxiliary_coordinate(routine, y_aux)?;
        let snapshot = classical_bead(routine, beads, beads.len(), false)?;
        Ok(vec![self.auxiliary_force(&snapshot, y)])
    }

    /// Per-bead transfer matrices at this evaluator's inverse temperature.
    pub fn m_matrices(
        &self,
        beads: &[DiabaticHamiltonian],
    ) -> Result<Vec<Matrix2<f64>>, KcRpmdError> {
        generate_m_matrices(beads, self.params.beta).map_err(|source| KcRpmdError::Hamiltonian {
            routine: M_MATRICES_ROUTINE,
            source,
        })
    }

    /// `V0`, `VKP` (with the kinetic constraint) and `V1` before the auxiliary soft gates.
    pub fn constrained_surfaces(&self, snapshot: &DiabaticSnapshot) -> SurfaceEnergies {
        let beta = self.params.beta;
        let constraint = KineticConstraint::new(&self.params, snapshot);
        SurfaceEnergies::new(
            snapshot.v0(),
            kinked_pair_energy(snapshot, beta) + constraint.energy(),
            snapshot.v1(),
        )
    }

    /// [`Self::constrained_surfaces`] with the soft gate of each surface at `y` added.
    pub fn gated_surfaces(&self, snapshot: &DiabaticSnapshot, y: f64) -> SurfaceEnergies {
        let KcRpmdParams { beta, b, .. } = self.params;
        self.constrained_surfaces(snapshot) + SurfaceEnergies::gate_penalties(y, b, beta)
    }

    /// Electronic part of the effective potential for one bead.
    pub fn electronic_potential(&self, snapshot: &DiabaticSnapshot, y: f64) -> f64 {
        let surfaces = self.gated_surfaces(snapshot, y);
        let potential = BoltzmannMixer::new(&surfaces, self.params.beta).free_energy();
        trace!(?surfaces, potential, "Blended KC-RPMD surfaces.");
        potential
    }

    /// Electronic part of the effective nuclear force for one bead, one entry per dof.
    pub fn electronic_force(
        &self,
        snapshot: &DiabaticSnapshot,
        forces: &DiabaticForces,
        y: f64,
    ) -> DVector<f64> {
        let beta = self.params.beta;
        let constraint = KineticConstraint::new(&self.params, snapshot);
        let fkp = kinked_pair_force(snapshot, forces, beta) + constraint.force(forces);

        let surfaces = self.gated_surfaces(snapshot, y);
        BoltzmannMixer::new(&surfaces, beta).mix_vectors(&forces.f0, &fkp, &forces.f1)
    }

    /// `-d/dy` of [`Self::electronic_potential`].
    pub fn auxiliary_force(&self, snapshot: &DiabaticSnapshot, y: f64) -> f64 {
        let KcRpmdParams { beta, b, .. } = self.params;
        let surfaces = self.gated_surfaces(snapshot, y);
        let gate_forces = SurfaceEnergies::gate_forces(y, b, beta);
        BoltzmannMixer::new(&surfaces, beta).mix_scalar(&gate_forces)
    }
}

fn auxiliary_coordinate(routine: &'static str, y_aux: &[f64]) -> Result<f64, KcRpmdError> {
    y_aux
        .first()
        .copied()
        .ok_or(KcRpmdError::MissingAuxiliaryCoordinate { routine })
}

fn check_inverse_masses(
    routine: &'static str,
    q: &DMatrix<f64>,
    inv_m: &DMatrix<f64>,
) -> Result<(), KcRpmdError> {
    if inv_m.shape() != (q.nrows(), 1) {
        return Err(KcRpmdError::InverseMassShape {
            routine,
            rows: inv_m.nrows(),
            cols: inv_m.ncols(),
            ndof: q.nrows(),
        });
    }
    Ok(())
}

/// Validates the bead set for the classical-nuclei path and reduces it to one snapshot.
fn classical_bead(
    routine: &'static str,
    beads: &[DiabaticHamiltonian],
    ntraj: usize,
    with_gradients: bool,
) -> Result<DiabaticSnapshot, KcRpmdError> {
    let hamiltonian_error = |source| KcRpmdError::Hamiltonian { routine, source };

    if beads.is_empty() {
        return Err(hamiltonian_error(HamiltonianError::NotAllocated));
    }
    for bead in beads {
        if !bead.is_allocated() {
            return Err(hamiltonian_error(HamiltonianError::NotAllocated));
        }
        if bead.nstates() != 2 {
            return Err(hamiltonian_error(HamiltonianError::UnsupportedStateCount(
                bead.nstates(),
            )));
        }
    }

    match (beads.len(), ntraj) {
        (1, 1) => {}
        (nbeads, ntraj) if nbeads == ntraj => {
            return Err(KcRpmdError::QuantumNucleiUnsupported {
                routine,
                beads: nbeads,
            });
        }
        (nbeads, ntraj) => {
            return Err(KcRpmdError::BeadCountMismatch {
                routine,
                beads: nbeads,
                ntraj,
            });
        }
    }

    let bead = &beads[0];
    let snapshot = if with_gradients {
        DiabaticSnapshot::from_hamiltonian(bead)
    } else {
        DiabaticSnapshot::from_hamiltonian_without_gradients(bead)
    }
    .map_err(hamiltonian_error)?;

    let k = snapshot.k();
    if !(k.is_finite() && k > 0.0) {
        return Err(KcRpmdError::SingularCoupling { routine, k });
    }
    Ok(snapshot)
}
