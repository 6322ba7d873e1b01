//! Response and noise analyses over a frozen [`Circuit`].
//!
//! Both analyses share the same three-state lifecycle and the same element
//! resolution helpers; the numerics they drive (`Ax = b` vs `Aᵀy = e_sink`)
//! live in [`crate::solver`].

mod noise;
mod response;

pub use noise::AcNoiseAnalysis;
pub use response::AcResponseAnalysis;

use crate::circuit::{Circuit, Sink};
use crate::error::{LinsimError, Result};
use crate::solution::Endpoint;

/// Lifecycle state of an analysis instance.
///
/// `Configured -> Running -> Completed` is one-way; `Running -> Configured`
/// only happens on cancellation, discarding whatever solution was in
/// progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Configured,
    Running,
    Completed,
}

/// Resolve a sink name to either a node or a component, in that order.
pub(crate) fn resolve_sink(circuit: &Circuit, name: &str) -> Result<Sink> {
    if let Some(node) = circuit.find_node(name) {
        return Ok(Sink::Node(node));
    }
    if let Some(id) = circuit.find_component(name) {
        return Ok(Sink::Component(id));
    }
    Err(LinsimError::unknown_element(name))
}

pub(crate) fn sink_endpoint(circuit: &Circuit, sink: Sink) -> Endpoint {
    match sink {
        Sink::Node(n) => Endpoint::Node(circuit.node_name(n).to_string()),
        Sink::Component(c) => Endpoint::Component(circuit.components[c.0].name().to_string()),
    }
}

/// The endpoint identifying the circuit's input port: the input node for a
/// voltage input, the input component for a current input.
pub(crate) fn input_endpoint(circuit: &Circuit) -> Endpoint {
    use crate::components::InputKind;
    let input = circuit.input();
    match input.kind {
        InputKind::Voltage => Endpoint::Node(circuit.node_name(input.positive()).to_string()),
        InputKind::Current => Endpoint::Component(input.name.clone()),
    }
}
