//! Operational amplifier frequency-domain model.
//!
//! The op-amp is ideal at DC and rolls off as a single dominant pole set by
//! its gain-bandwidth product, with optional extra poles/zeros and a
//! transport delay layered on top.

use num_complex::Complex64;

use super::{NoiseKind, NoiseSource};
use crate::circuit::{ComponentId, NodeId};

/// Parameters for an op-amp's frequency response and noise model.
#[derive(Debug, Clone)]
pub struct OpAmpParams {
    /// Open-loop DC gain.
    pub a0: f64,
    /// Gain-bandwidth product, Hz.
    pub gbw: f64,
    /// Transport delay, seconds.
    pub delay: f64,
    /// Additional zero frequencies, Hz.
    pub extra_zeros: Vec<f64>,
    /// Additional pole frequencies, Hz.
    pub extra_poles: Vec<f64>,
    /// Input-referred voltage noise density, V/sqrt(Hz).
    pub v_noise: f64,
    /// Input-referred current noise density (per input), A/sqrt(Hz).
    pub i_noise: f64,
    /// Voltage noise corner frequency, Hz.
    pub v_corner: f64,
    /// Current noise corner frequency, Hz.
    pub i_corner: f64,
}

impl Default for OpAmpParams {
    fn default() -> Self {
        Self::ideal()
    }
}

impl OpAmpParams {
    /// A noiseless op-amp with very high, essentially flat gain.
    pub fn ideal() -> Self {
        Self {
            a0: 1e12,
            gbw: 1e12,
            delay: 0.0,
            extra_zeros: Vec::new(),
            extra_poles: Vec::new(),
            v_noise: 0.0,
            i_noise: 0.0,
            v_corner: 0.0,
            i_corner: 0.0,
        }
    }

    /// OP27-like reference defaults for a non-ideal op-amp.
    pub fn op27_like() -> Self {
        Self {
            a0: 1.5e6,
            gbw: 8e6,
            delay: 0.0,
            extra_zeros: Vec::new(),
            extra_poles: Vec::new(),
            v_noise: 3.2e-9,
            i_noise: 0.4e-12,
            v_corner: 2.7,
            i_corner: 140.0,
        }
    }
}

/// An ideal operational amplifier component.
#[derive(Debug, Clone)]
pub struct OpAmp {
    pub id: ComponentId,
    pub name: String,
    /// `[non-inverting (+), inverting (-), output]`.
    pub nodes: [NodeId; 3],
    pub params: OpAmpParams,
}

impl OpAmp {
    pub fn new(id: ComponentId, name: String, nodes: [NodeId; 3], params: OpAmpParams) -> Self {
        Self {
            id,
            name,
            nodes,
            params,
        }
    }

    pub fn input_pos(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn input_neg(&self) -> NodeId {
        self.nodes[1]
    }

    pub fn output(&self) -> NodeId {
        self.nodes[2]
    }

    /// Open-loop gain at frequency `f`:
    /// `A0 / (1 + A0 j f / GBW) * exp(-j 2 pi delay f) * prod(1 + jf/z) / prod(1 + jf/p)`.
    pub fn gain(&self, f: f64) -> Complex64 {
        let p = &self.params;
        let one = Complex64::new(1.0, 0.0);
        let jf = Complex64::new(0.0, f);

        let dominant_pole = p.a0 / (one + jf * (p.a0 / p.gbw));

        let delay = if p.delay != 0.0 {
            Complex64::from_polar(1.0, -2.0 * std::f64::consts::PI * p.delay * f)
        } else {
            one
        };

        let zeros: Complex64 = p
            .extra_zeros
            .iter()
            .map(|z| one + jf / z)
            .fold(one, |acc, term| acc * term);

        let poles: Complex64 = p
            .extra_poles
            .iter()
            .map(|pole| one + jf / pole)
            .fold(one, |acc, term| acc * term);

        dominant_pole * delay * zeros / poles
    }

    /// Voltage and current noise sources: one input-referred voltage source
    /// on the op-amp's own branch, and one current source per input node.
    pub fn noise_sources(&self, id: ComponentId) -> Vec<NoiseSource> {
        let mut sources = Vec::new();
        let p = self.params.clone();

        if p.v_noise > 0.0 {
            let v_noise = p.v_noise;
            let v_corner = p.v_corner;
            sources.push(NoiseSource::new(
                format!("{} v_noise", self.name),
                NoiseKind::Component(id),
                move |f| v_noise * (1.0 + v_corner / f).sqrt(),
            ));
        }

        if p.i_noise > 0.0 {
            let i_noise = p.i_noise;
            let i_corner = p.i_corner;
            for (label, node) in [("i_noise+", self.input_pos()), ("i_noise-", self.input_neg())] {
                sources.push(NoiseSource::new(
                    format!("{} {}", self.name, label),
                    NoiseKind::Node(node),
                    move |f| i_noise * (1.0 + i_corner / f).sqrt(),
                ));
            }
        }

        sources
    }
}
