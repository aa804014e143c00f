//! # Hamiltonian Module
//!
//! Electronic-structure input consumed by the KC-RPMD kernels.
//!
//! The host simulation owns one [`DiabaticHamiltonian`] per ring-polymer bead. The kernels
//! never read that store directly: they first reduce it to an immutable two-state
//! [`DiabaticSnapshot`] holding `V0`, `V1`, `K = |H01|` and, when nuclear forces are
//! requested, the coordinate derivatives of those three quantities.
//!
//! - [`snapshot`] - The bead store, the two-state snapshot and their conversion rules
//! - [`transfer`] - Boltzmann-weighted 2x2 transfer matrices per bead

pub mod snapshot;
pub mod transfer;

pub use snapshot::{
    DiabaticForces, DiabaticHamiltonian, DiabaticSnapshot, HamiltonianError, SnapshotGradients,
};
pub use transfer::generate_m_matrices;
