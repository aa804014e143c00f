//! # Surfaces Module
//!
//! Closed-form free-energy surfaces of two-state KC-RPMD and their analytic forces.
//!
//! ## Overview
//!
//! For one bead, three surfaces compete: the two diabatic wells `V0` and `V1` and the
//! kinked-pair surface `VKP`, which stands for ring-polymer configurations that change
//! electronic state along imaginary time. They are evaluated in a fixed order:
//!
//! 1. [`kinked_pair`] - `VKP` from `V0`, `V1` and `K`, through one of three regimes
//!    selected to avoid cancellation and division by zero
//! 2. [`constraint`] - the kinetic-constraint term added to `VKP`
//! 3. [`auxiliary`] - soft walls that tie each surface to its own region of the
//!    auxiliary coordinate `y`
//! 4. [`mixer`] - Boltzmann blending of the three gated surfaces into one effective
//!    potential, or of their forces into one effective force
//!
//! [`functions`] holds the overflow-safe scalar helpers the stages share, and [`params`]
//! the per-call physical and switching parameters.

pub mod auxiliary;
pub mod constraint;
pub(crate) mod functions;
pub mod kinked_pair;
pub mod mixer;
pub mod params;
