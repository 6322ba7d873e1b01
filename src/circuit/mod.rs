//! Circuit graph representation.
//!
//! [`Circuit`] holds all components and their node incidence in the form
//! the MNA assembler needs: stable insertion order for components, a
//! deterministic first-seen order for nodes.

mod graph;
mod types;

pub use graph::{Circuit, CircuitBuilder, Sink};
pub use types::{ComponentId, NodeId};
