//! # Engine Module
//!
//! Drives a single KC-RPMD evaluation: validates the call, reduces the bead Hamiltonians to
//! snapshots and runs the surface kernels of [`crate::core::surfaces`] in order.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Builder for [`crate::core::surfaces::params::KcRpmdParams`]
//! - **Error Handling** ([`error`]) - Precondition failures of every public operation
//! - **Ring-Polymer Seam** ([`ring_polymer`]) - Internal spring potential and force supplied
//!   by the host
//! - **Evaluator** ([`effective`]) - Effective potential, nuclear force, auxiliary force and
//!   transfer matrices
//!
//! Every operation is a pure function of its inputs. Beads are independent, so callers may
//! evaluate separate trajectories concurrently without synchronization.

pub mod config;
pub mod effective;
pub mod error;
pub mod ring_polymer;
