//! # linsim_core
//!
//! Small-signal linear AC circuit simulation in the frequency domain.
//!
//! Given a netlist of passive components, ideal op-amps, and named nodes,
//! together with a single input port and a set of requested sinks, this
//! crate computes either:
//! - complex-valued frequency responses (transfer functions from the input
//!   to any node voltage or component branch current), or
//! - power spectral densities of noise contributed by each intrinsic noise
//!   source, projected to a chosen sink.
//!
//! ## Architecture
//!
//! - [`quantity`] - SI-prefixed numeric parsing/formatting
//! - [`config`] - physical constants and analysis defaults
//! - [`circuit`] - circuit graph representation and the builder that produces it
//! - [`components`] - component models (resistors, capacitors, inductors, op-amps)
//! - [`solver`] - complex MNA matrix assembly, factorisation, and the sweep driver
//! - [`analysis`] - response and noise analyses built on the solver
//! - [`solution`] - transfer functions, noise spectra, and their container
//!
//! ## Circuit simulation method
//!
//! Every component owns both a branch-current row/column and a contribution
//! to the KCL row of each node it touches (see [`solver::mna`] for the exact
//! stamping conventions). For each frequency in a sweep:
//!
//! 1. Assemble the complex system matrix `A` (and, for response analysis,
//!    the excitation vector `b`).
//! 2. Factor `A` and solve `A x = b` (response) or `Aᵀ y = e_sink` (noise).
//! 3. Extract the requested sinks' values, or project noise sources through
//!    `y`, into a [`solution::Solution`].

pub mod analysis;
pub mod circuit;
pub mod components;
pub mod config;
pub mod error;
pub mod quantity;
pub mod solution;
pub mod solver;

pub use analysis::{AcNoiseAnalysis, AcResponseAnalysis};
pub use circuit::{Circuit, CircuitBuilder};
pub use config::Config;
pub use error::{LinsimError, Result};
pub use quantity::Quantity;
pub use solution::Solution;
