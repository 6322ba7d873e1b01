//! Circuit graph structure and builder.

use std::collections::{HashMap, HashSet};

use super::types::{ComponentId, NodeId};
use crate::components::{Capacitor, Component, InputComponent, InputKind, Inductor, OpAmp, OpAmpParams, Resistor};
use crate::config::Config;
use crate::error::{LinsimError, Result};

/// An endpoint a response or noise contribution can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    Node(NodeId),
    Component(ComponentId),
}

/// A circuit frozen for analysis.
///
/// Built once via [`CircuitBuilder`]; an analysis pass never mutates it.
/// Matrix layout: the first `components.len()` indices are branch-current
/// rows in component-insertion order; the remaining indices are non-ground
/// node-voltage rows in first-seen order, computed once at freeze time.
#[derive(Debug, Clone)]
pub struct Circuit {
    pub components: Vec<Component>,
    node_names: HashMap<NodeId, String>,
    name_to_node: HashMap<String, NodeId>,
    node_order: Vec<NodeId>,
    node_index: HashMap<NodeId, usize>,
    pub input_id: ComponentId,
    pub noise_sink: Option<Sink>,
    pub config: Config,
}

impl Circuit {
    /// Total MNA matrix dimension: `n_components + (n_nodes - 1)`.
    pub fn matrix_size(&self) -> usize {
        self.components.len() + self.node_order.len()
    }

    /// Matrix row/column for a component's branch current.
    pub fn component_index(&self, id: ComponentId) -> usize {
        id.0
    }

    /// Matrix row/column for a node's voltage, `None` for ground.
    pub fn node_matrix_index(&self, node: NodeId) -> Option<usize> {
        if node.is_ground() {
            return None;
        }
        self.node_index.get(&node).map(|&i| self.components.len() + i)
    }

    /// Matrix index of a `Sink`.
    pub fn sink_index(&self, sink: Sink) -> Option<usize> {
        match sink {
            Sink::Node(n) => self.node_matrix_index(n),
            Sink::Component(c) => Some(self.component_index(c)),
        }
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.name_to_node.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn find_component(&self, name: &str) -> Option<ComponentId> {
        self.components.iter().find(|c| c.name() == name).map(|c| c.id())
    }

    pub fn node_name(&self, node: NodeId) -> &str {
        self.node_names.get(&node).map(|s| s.as_str()).unwrap_or("gnd")
    }

    pub fn input(&self) -> &InputComponent {
        match &self.components[self.input_id.0] {
            Component::Input(input) => input,
            _ => unreachable!("input_id must reference the Input component"),
        }
    }
}

/// Builds a [`Circuit`] up from named components and an input port.
///
/// Names are unique within the circuit; ground is recognised by the
/// reserved name "gnd" (case-insensitive).
pub struct CircuitBuilder {
    config: Config,
    name_to_node: HashMap<String, NodeId>,
    node_names: HashMap<NodeId, String>,
    next_node_id: usize,
    components: Vec<Component>,
    used_names: HashSet<String>,
    input: Option<(NodeId, NodeId, InputKind, f64)>,
    noise_sink: Option<Sink>,
}

impl CircuitBuilder {
    pub fn new(config: Config) -> Self {
        let mut name_to_node = HashMap::new();
        let mut node_names = HashMap::new();
        name_to_node.insert("gnd".to_string(), NodeId::GROUND);
        node_names.insert(NodeId::GROUND, "gnd".to_string());
        Self {
            config,
            name_to_node,
            node_names,
            next_node_id: 1,
            components: Vec::new(),
            used_names: HashSet::new(),
            input: None,
            noise_sink: None,
        }
    }

    fn resolve_node(&mut self, name: &str) -> NodeId {
        let key = name.to_ascii_lowercase();
        if key == "gnd" {
            return NodeId::GROUND;
        }
        if let Some(&id) = self.name_to_node.get(&key) {
            return id;
        }
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.name_to_node.insert(key, id);
        self.node_names.insert(id, name.to_string());
        id
    }

    fn claim_name(&mut self, name: &str) -> Result<()> {
        if !self.used_names.insert(name.to_string()) {
            return Err(LinsimError::duplicate_name(name));
        }
        Ok(())
    }

    pub fn add_resistor(&mut self, name: &str, n1: &str, n2: &str, resistance: f64) -> Result<ComponentId> {
        if !(resistance > 0.0) {
            return Err(LinsimError::invalid_parameter(name, "resistance must be positive"));
        }
        self.claim_name(name)?;
        let id = ComponentId(self.components.len());
        let nodes = [self.resolve_node(n1), self.resolve_node(n2)];
        self.components
            .push(Component::Resistor(Resistor::new(id, name.to_string(), nodes, resistance)));
        Ok(id)
    }

    pub fn add_capacitor(&mut self, name: &str, n1: &str, n2: &str, capacitance: f64) -> Result<ComponentId> {
        if !(capacitance > 0.0) {
            return Err(LinsimError::invalid_parameter(name, "capacitance must be positive"));
        }
        self.claim_name(name)?;
        let id = ComponentId(self.components.len());
        let nodes = [self.resolve_node(n1), self.resolve_node(n2)];
        self.components
            .push(Component::Capacitor(Capacitor::new(id, name.to_string(), nodes, capacitance)));
        Ok(id)
    }

    pub fn add_inductor(&mut self, name: &str, n1: &str, n2: &str, inductance: f64) -> Result<ComponentId> {
        if !(inductance > 0.0) {
            return Err(LinsimError::invalid_parameter(name, "inductance must be positive"));
        }
        self.claim_name(name)?;
        let id = ComponentId(self.components.len());
        let nodes = [self.resolve_node(n1), self.resolve_node(n2)];
        self.components
            .push(Component::Inductor(Inductor::new(id, name.to_string(), nodes, inductance)));
        Ok(id)
    }

    pub fn add_opamp(
        &mut self,
        name: &str,
        non_inverting: &str,
        inverting: &str,
        output: &str,
        params: OpAmpParams,
    ) -> Result<ComponentId> {
        self.claim_name(name)?;
        let id = ComponentId(self.components.len());
        let nodes = [
            self.resolve_node(non_inverting),
            self.resolve_node(inverting),
            self.resolve_node(output),
        ];
        self.components
            .push(Component::OpAmp(OpAmp::new(id, name.to_string(), nodes, params)));
        Ok(id)
    }

    /// Set the circuit's single input port. `impedance = None` defaults to
    /// `config.analysis.default_input_impedance`.
    pub fn set_input(&mut self, positive: &str, negative: &str, kind: InputKind, impedance: Option<f64>) {
        let pos = self.resolve_node(positive);
        let neg = self.resolve_node(negative);
        let z = impedance.unwrap_or(self.config.analysis.default_input_impedance);
        self.input = Some((pos, neg, kind, z));
    }

    pub fn set_noise_sink_node(&mut self, name: &str) {
        let node = self.resolve_node(name);
        self.noise_sink = Some(Sink::Node(node));
    }

    pub fn set_noise_sink_component(&mut self, id: ComponentId) {
        self.noise_sink = Some(Sink::Component(id));
    }

    /// Freeze the builder into an immutable [`Circuit`], appending the input
    /// component and computing the deterministic node ordering.
    pub fn freeze(mut self) -> Result<Circuit> {
        let (pos, neg, kind, impedance) = self
            .input
            .ok_or_else(|| LinsimError::invalid_parameter("circuit", "no input port configured"))?;

        let input_id = ComponentId(self.components.len());
        self.components.push(Component::Input(InputComponent::new(
            input_id,
            "IN".to_string(),
            [pos, neg],
            kind,
            impedance,
        )));

        let mut node_order = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(NodeId::GROUND);
        for component in &self.components {
            for &node in component.nodes() {
                if seen.insert(node) {
                    node_order.push(node);
                }
            }
        }
        let node_index = node_order.iter().enumerate().map(|(i, &n)| (n, i)).collect();

        Ok(Circuit {
            components: self.components,
            node_names: self.node_names,
            name_to_node: self.name_to_node,
            node_order,
            node_index,
            input_id,
            noise_sink: self.noise_sink,
            config: self.config,
        })
    }
}
