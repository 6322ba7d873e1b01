//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for frequency-domain circuit
//! analysis.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations `A x = z` where:
//! - `x` contains node voltages and branch currents
//! - `A` is the complex coefficient matrix at a given frequency
//! - `z` is the source vector
//!
//! Response analysis solves `A x = b`; noise analysis solves `Aᵀ y = e_sink`
//! (see [`mna::MnaMatrix::transposed`]). Both share the same assembler.

mod mna;
mod sweep;

pub use mna::{stamp_components, MnaMatrix};
pub use sweep::{run_sweep, validate_frequencies, SweepOptions};
