//! # Core Module
//!
//! Stateless building blocks of the KC-RPMD kernel.
//!
//! ## Architecture
//!
//! - **Electronic Structure Input** ([`hamiltonian`]) - The host-facing diabatic Hamiltonian
//!   store, the immutable two-state snapshot consumed by the kernels, and the per-bead
//!   Boltzmann transfer matrices.
//! - **Free-Energy Surfaces** ([`surfaces`]) - Closed-form kinked-pair free energy, the
//!   kinetic constraint, the auxiliary-coordinate soft gates and the Boltzmann mixer,
//!   each with its analytic derivative.
//!
//! Nothing in this module validates call-level preconditions (bead counts, matrix shapes);
//! that is the job of [`crate::engine`].

pub mod hamiltonian;
pub mod surfaces;
