use nalgebra::{Complex, DMatrix, DVector};
use thiserror::Error;

pub type ComplexMatrix = DMatrix<Complex<f64>>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HamiltonianError {
    #[error("the diabatic Hamiltonian matrix is not allocated but it is needed for the calculations")]
    NotAllocated,
    #[error("implementation only for 2 diabatic states, got {0}")]
    UnsupportedStateCount(usize),
    #[error("the diabatic Hamiltonian matrix has shape {rows}x{cols}, expected a square matrix")]
    NotSquare { rows: usize, cols: usize },
    #[error("derivative of the diabatic Hamiltonian along dof {dof} has shape {rows}x{cols}, expected 2x2")]
    DerivativeShape { dof: usize, rows: usize, cols: usize },
    #[error("gradient vectors disagree in length (dV0: {dv0}, dV1: {dv1}, dK: {dk})")]
    GradientLengthMismatch { dv0: usize, dv1: usize, dk: usize },
}

/// Per-bead diabatic Hamiltonian as stored by the host simulation.
///
/// The store is "not allocated" until a matrix is supplied; every consumer checks that
/// first. Derivatives are optional and indexed by nuclear degree of freedom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiabaticHamiltonian {
    ham_dia: Option<ComplexMatrix>,
    d1ham_dia: Vec<ComplexMatrix>,
}

impl DiabaticHamiltonian {
    pub fn new(ham_dia: ComplexMatrix) -> Self {
        Self {
            ham_dia: Some(ham_dia),
            d1ham_dia: Vec::new(),
        }
    }

    pub fn unallocated() -> Self {
        Self::default()
    }

    /// Builds a real-valued two-state Hamiltonian `[[v0, coupling], [coupling, v1]]`.
    pub fn two_state(v0: f64, v1: f64, coupling: f64) -> Self {
        Self::new(real_two_state_matrix(v0, v1, coupling))
    }

    pub fn with_derivatives(mut self, d1ham_dia: Vec<ComplexMatrix>) -> Self {
        self.d1ham_dia = d1ham_dia;
        self
    }

    /// Attaches real-valued derivatives, one `(dV0, dV1, dH01)` triple per dof.
    pub fn with_two_state_derivatives(self, derivatives: &[(f64, f64, f64)]) -> Self {
        let d1 = derivatives
            .iter()
            .map(|&(dv0, dv1, dh01)| real_two_state_matrix(dv0, dv1, dh01))
            .collect();
        self.with_derivatives(d1)
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.ham_dia.is_some()
    }

    pub fn nstates(&self) -> usize {
        self.ham_dia.as_ref().map_or(0, |h| h.nrows())
    }

    pub fn ndof(&self) -> usize {
        self.d1ham_dia.len()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<Complex<f64>> {
        self.ham_dia.as_ref().and_then(|h| h.get((i, j)).copied())
    }

    /// Derivative matrices `dH/dq`, indexed by dof.
    pub fn derivatives(&self) -> &[ComplexMatrix] {
        &self.d1ham_dia
    }
}

fn real_two_state_matrix(h00: f64, h11: f64, h01: f64) -> ComplexMatrix {
    DMatrix::from_row_slice(
        2,
        2,
        &[
            Complex::new(h00, 0.0),
            Complex::new(h01, 0.0),
            Complex::new(h01, 0.0),
            Complex::new(h11, 0.0),
        ],
    )
}

/// Coordinate derivatives `dV0/dq`, `dV1/dq`, `dK/dq`, one entry per dof.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotGradients {
    dv0: DVector<f64>,
    dv1: DVector<f64>,
    dk: DVector<f64>,
}

impl SnapshotGradients {
    pub fn new(
        dv0: DVector<f64>,
        dv1: DVector<f64>,
        dk: DVector<f64>,
    ) -> Result<Self, HamiltonianError> {
        if dv0.len() != dv1.len() || dv0.len() != dk.len() {
            return Err(HamiltonianError::GradientLengthMismatch {
                dv0: dv0.len(),
                dv1: dv1.len(),
                dk: dk.len(),
            });
        }
        Ok(Self { dv0, dv1, dk })
    }

    #[inline]
    pub fn ndof(&self) -> usize {
        self.dv0.len()
    }

    pub fn dv0(&self) -> &DVector<f64> {
        &self.dv0
    }

    pub fn dv1(&self) -> &DVector<f64> {
        &self.dv1
    }

    pub fn dk(&self) -> &DVector<f64> {
        &self.dk
    }
}

/// Forces (negative gradients) on the nuclei from each diabatic quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct DiabaticForces {
    pub f0: DVector<f64>,
    pub f1: DVector<f64>,
    pub fk: DVector<f64>,
}

/// Immutable two-state view of one bead: diabatic energies, coupling magnitude and,
/// optionally, their coordinate derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct DiabaticSnapshot {
    v0: f64,
    v1: f64,
    k: f64,
    gradients: Option<SnapshotGradients>,
}

impl DiabaticSnapshot {
    /// `k` is the coupling magnitude; its sign is discarded.
    pub fn new(v0: f64, v1: f64, k: f64) -> Self {
        Self {
            v0,
            v1,
            k: k.abs(),
            gradients: None,
        }
    }

    pub fn with_gradients(mut self, gradients: SnapshotGradients) -> Self {
        self.gradients = Some(gradients);
        self
    }

    /// Reads `V0 = Re H00`, `V1 = Re H11`, `K = |H01|` and, if the store carries them, the
    /// derivatives of those quantities along every dof.
    pub fn from_hamiltonian(ham: &DiabaticHamiltonian) -> Result<Self, HamiltonianError> {
        let (snapshot, h01) = Self::read_energies(ham)?;
        if ham.ndof() == 0 {
            return Ok(snapshot);
        }

        let ndof = ham.ndof();
        let mut dv0 = DVector::zeros(ndof);
        let mut dv1 = DVector::zeros(ndof);
        let mut dk = DVector::zeros(ndof);
        for (dof, d1) in ham.derivatives().iter().enumerate() {
            if d1.shape() != (2, 2) {
                return Err(HamiltonianError::DerivativeShape {
                    dof,
                    rows: d1.nrows(),
                    cols: d1.ncols(),
                });
            }
            dv0[dof] = d1[(0, 0)].re;
            dv1[dof] = d1[(1, 1)].re;
            dk[dof] = modulus_derivative(h01, d1[(0, 1)]);
        }

        let gradients = SnapshotGradients::new(dv0, dv1, dk)?;
        Ok(snapshot.with_gradients(gradients))
    }

    /// Like [`Self::from_hamiltonian`] but never touches the derivative storage.
    pub fn from_hamiltonian_without_gradients(
        ham: &DiabaticHamiltonian,
    ) -> Result<Self, HamiltonianError> {
        Self::read_energies(ham).map(|(snapshot, _)| snapshot)
    }

    fn read_energies(
        ham: &DiabaticHamiltonian,
    ) -> Result<(Self, Complex<f64>), HamiltonianError> {
        let matrix = ham.ham_dia.as_ref().ok_or(HamiltonianError::NotAllocated)?;
        let (rows, cols) = matrix.shape();
        if rows != cols {
            return Err(HamiltonianError::NotSquare { rows, cols });
        }
        if rows != 2 {
            return Err(HamiltonianError::UnsupportedStateCount(rows));
        }
        let h01 = matrix[(0, 1)];
        let snapshot = Self::new(matrix[(0, 0)].re, matrix[(1, 1)].re, h01.norm());
        Ok((snapshot, h01))
    }

    #[inline]
    pub fn v0(&self) -> f64 {
        self.v0
    }

    #[inline]
    pub fn v1(&self) -> f64 {
        self.v1
    }

    #[inline]
    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn gradients(&self) -> Option<&SnapshotGradients> {
        self.gradients.as_ref()
    }

    pub fn ndof(&self) -> Option<usize> {
        self.gradients.as_ref().map(SnapshotGradients::ndof)
    }

    /// Negated gradients, `None` if the snapshot was built without derivatives.
    pub fn forces(&self) -> Option<DiabaticForces> {
        self.gradients.as_ref().map(|g| DiabaticForces {
            f0: -&g.dv0,
            f1: -&g.dv1,
            fk: -&g.dk,
        })
    }
}

// d|z|/dq = Re(conj(z) dz/dq) / |z|; undefined at z = 0, where the real part is used.
fn modulus_derivative(z: Complex<f64>, dz: Complex<f64>) -> f64 {
    let modulus = z.norm();
    if modulus > 0.0 {
        (z.conj() * dz).re / modulus
    } else {
        dz.re
    }
}
