//! # KC-RPMD Kernel Library
//!
//! Effective potential energy, nuclear force and auxiliary-coordinate force for
//! Kinetically-Constrained Ring-Polymer Molecular Dynamics (KC-RPMD) of a two-state
//! (diabatic) electronic system coupled to classical nuclei.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict two-layer architecture, keeping the numerically delicate
//! closed forms separate from the code that validates inputs and drives the evaluation.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`DiabaticHamiltonian`,
//!   `DiabaticSnapshot`) and the pure numerical kernels for every free-energy surface:
//!   the kinked-pair evaluator, the kinetic-constraint modifier, the auxiliary soft gates
//!   and the Boltzmann mixer.
//!
//! - **[`engine`]: The Driver.** Parameters, error types, the ring-polymer internal
//!   collaborator seam and the [`engine::effective::KcRpmd`] evaluator, which checks every
//!   precondition and runs the kernels in order for a single evaluation call.
//!
//! Trajectory propagation, ensemble management and the general ring-polymer spring terms
//! belong to the host simulation; this crate only consumes a diabatic Hamiltonian and its
//! coordinate derivatives.

pub mod core;
pub mod engine;
