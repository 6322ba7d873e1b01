//! Component models for circuit simulation.
//!
//! Each variant knows its own incident nodes, its complex impedance or gain
//! at a given frequency, and the noise sources it contributes. Stamping
//! those facts into the MNA matrix is the solver's job (`solver::mna`); this
//! module only describes the physics.

mod input;
mod linear;
mod opamp;

pub use input::{InputComponent, InputKind};
pub use linear::{Capacitor, Inductor, Resistor};
pub use opamp::{OpAmp, OpAmpParams};

use num_complex::Complex64;

use crate::circuit::{ComponentId, NodeId};
use crate::config::Constants;

/// A circuit component.
#[derive(Debug, Clone)]
pub enum Component {
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
    OpAmp(OpAmp),
    Input(InputComponent),
}

/// A single intrinsic noise source belonging to a component or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    /// The source perturbs a component's own branch-current row (e.g.
    /// Johnson noise, op-amp input-referred voltage noise).
    Component(ComponentId),
    /// The source injects current at a node (op-amp input bias current
    /// noise).
    Node(NodeId),
}

/// A named noise source with a spectral-density function of frequency.
#[derive(Clone)]
pub struct NoiseSource {
    pub owner_name: String,
    pub kind: NoiseKind,
    density: std::sync::Arc<dyn Fn(f64) -> f64 + Send + Sync>,
}

impl std::fmt::Debug for NoiseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseSource")
            .field("owner_name", &self.owner_name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl NoiseSource {
    pub fn new(
        owner_name: impl Into<String>,
        kind: NoiseKind,
        density: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            owner_name: owner_name.into(),
            kind,
            density: std::sync::Arc::new(density),
        }
    }

    /// Spectral density at frequency `f`, in V/sqrt(Hz) or A/sqrt(Hz)
    /// depending on `kind`.
    pub fn spectral_density(&self, f: f64) -> f64 {
        (self.density)(f)
    }
}

impl Component {
    pub fn id(&self) -> ComponentId {
        match self {
            Component::Resistor(r) => r.id,
            Component::Capacitor(c) => c.id,
            Component::Inductor(l) => l.id,
            Component::OpAmp(o) => o.id,
            Component::Input(i) => i.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Component::Resistor(r) => &r.name,
            Component::Capacitor(c) => &c.name,
            Component::Inductor(l) => &l.name,
            Component::OpAmp(o) => &o.name,
            Component::Input(i) => &i.name,
        }
    }

    /// The nodes this component is incident to, in the order required by
    /// its matrix-stamping convention.
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Component::Resistor(r) => &r.nodes,
            Component::Capacitor(c) => &c.nodes,
            Component::Inductor(l) => &l.nodes,
            Component::OpAmp(o) => &o.nodes,
            Component::Input(i) => &i.nodes,
        }
    }

    /// Complex impedance at frequency `f`. Only meaningful for passives;
    /// op-amps and the input component do not have an impedance and return
    /// `None`.
    pub fn impedance(&self, f: f64) -> Option<Complex64> {
        match self {
            Component::Resistor(r) => Some(r.impedance(f)),
            Component::Capacitor(c) => Some(c.impedance(f)),
            Component::Inductor(l) => Some(l.impedance(f)),
            Component::OpAmp(_) | Component::Input(_) => None,
        }
    }

    /// Intrinsic noise sources owned by this component, using `constants`
    /// for any temperature-dependent density.
    pub fn noise_sources(&self, id: ComponentId, constants: Constants) -> Vec<NoiseSource> {
        match self {
            Component::Resistor(r) => vec![r.johnson_noise(id, constants)],
            Component::OpAmp(o) => o.noise_sources(id),
            Component::Capacitor(_) | Component::Inductor(_) | Component::Input(_) => Vec::new(),
        }
    }
}
