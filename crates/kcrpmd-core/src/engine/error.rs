use crate::core::hamiltonian::HamiltonianError;
use thiserror::Error;

/// A violated precondition of a KC-RPMD operation.
///
/// These are contract violations by the caller (or requests for the unimplemented
/// quantum-nuclei path), never transient conditions: retrying with the same input fails
/// the same way. Hosts that want the abort-on-misuse contract terminate on `Err`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KcRpmdError {
    #[error("Error in {routine}(): {source}")]
    Hamiltonian {
        routine: &'static str,
        source: HamiltonianError,
    },

    #[error("Error in {routine}(): not implemented for quantum nuclei ({beads} beads)")]
    QuantumNucleiUnsupported { routine: &'static str, beads: usize },

    #[error(
        "Error in {routine}(): the size of the input ({ntraj} trajectories) is different from the number of beads ({beads})"
    )]
    BeadCountMismatch {
        routine: &'static str,
        beads: usize,
        ntraj: usize,
    },

    #[error("Error in {routine}(): nuclear forces need the coordinate derivatives of the diabatic Hamiltonian")]
    MissingDerivatives { routine: &'static str },

    #[error(
        "Error in {routine}(): coordinates have {ndof} degrees of freedom but the Hamiltonian provides derivatives for {nderiv}"
    )]
    DofMismatch {
        routine: &'static str,
        ndof: usize,
        nderiv: usize,
    },

    #[error("Error in {routine}(): inverse masses have shape {rows}x{cols}, expected {ndof}x1")]
    InverseMassShape {
        routine: &'static str,
        rows: usize,
        cols: usize,
        ndof: usize,
    },

    #[error(
        "Error in {routine}(): ring-polymer internal force has shape {rows}x{cols}, expected {ndof}x{ntraj}"
    )]
    InternalForceShape {
        routine: &'static str,
        rows: usize,
        cols: usize,
        ndof: usize,
        ntraj: usize,
    },

    #[error("Error in {routine}(): the auxiliary coordinate vector is empty")]
    MissingAuxiliaryCoordinate { routine: &'static str },

    #[error("Error in {routine}(): diabatic coupling |K| = {k} is singular, K must be finite and positive")]
    SingularCoupling { routine: &'static str, k: f64 },
}

impl KcRpmdError {
    pub fn routine(&self) -> &'static str {
        match self {
            Self::Hamiltonian { routine, .. }
            | Self::QuantumNucleiUnsupported { routine, .. }
            | Self::BeadCountMismatch { routine, .. }
            | Self::MissingDerivatives { routine }
            | Self::DofMismatch { routine, .. }
            | Self::InverseMassShape { routine, .. }
            | Self::InternalForceShape { routine, .. }
            | Self::MissingAuxiliaryCoordinate { routine }
            | Self::SingularCoupling { routine, .. } => routine,
        }
    }
}
