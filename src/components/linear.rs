//! Linear passive components: Resistor, Capacitor, Inductor.

use num_complex::Complex64;

use super::{NoiseKind, NoiseSource};
use crate::circuit::{ComponentId, NodeId};
use crate::config::Constants;

/// A resistor: two nodes, real positive resistance.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2],
    pub resistance: f64,
}

impl Resistor {
    pub fn new(id: ComponentId, name: String, nodes: [NodeId; 2], resistance: f64) -> Self {
        Self {
            id,
            name,
            nodes,
            resistance,
        }
    }

    /// Impedance is purely real and frequency-independent.
    pub fn impedance(&self, _f: f64) -> Complex64 {
        Complex64::new(self.resistance, 0.0)
    }

    /// Johnson (thermal) noise voltage density, `sqrt(4 kB T R)` V/sqrt(Hz).
    pub fn johnson_noise(&self, id: ComponentId, constants: Constants) -> NoiseSource {
        let density = (4.0 * constants.k_b * constants.t * self.resistance).sqrt();
        NoiseSource::new(self.name.clone(), NoiseKind::Component(id), move |_f| density)
    }
}

/// A capacitor: two nodes, impedance `1 / (j 2 pi f C)`.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2],
    pub capacitance: f64,
}

impl Capacitor {
    pub fn new(id: ComponentId, name: String, nodes: [NodeId; 2], capacitance: f64) -> Self {
        Self {
            id,
            name,
            nodes,
            capacitance,
        }
    }

    pub fn impedance(&self, f: f64) -> Complex64 {
        let omega = 2.0 * std::f64::consts::PI * f;
        Complex64::new(0.0, -1.0 / (omega * self.capacitance))
    }
}

/// An inductor: two nodes, impedance `j 2 pi f L`.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2],
    pub inductance: f64,
}

impl Inductor {
    pub fn new(id: ComponentId, name: String, nodes: [NodeId; 2], inductance: f64) -> Self {
        Self {
            id,
            name,
            nodes,
            inductance,
        }
    }

    pub fn impedance(&self, f: f64) -> Complex64 {
        let omega = 2.0 * std::f64::consts::PI * f;
        Complex64::new(0.0, omega * self.inductance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cid() -> ComponentId {
        ComponentId(0)
    }

    #[test]
    fn resistor_impedance_is_real_and_constant() {
        let r = Resistor::new(cid(), "R1".into(), [NodeId(1), NodeId(2)], 1000.0);
        assert_relative_eq!(r.impedance(1.0).re, 1000.0);
        assert_relative_eq!(r.impedance(1.0).im, 0.0);
        assert_relative_eq!(r.impedance(1e6).re, 1000.0);
    }

    #[test]
    fn resistor_johnson_noise_matches_reference() {
        let r = Resistor::new(cid(), "R1".into(), [NodeId(1), NodeId(2)], 1000.0);
        let constants = Constants::default();
        let noise = r.johnson_noise(cid(), constants);
        let expected = (4.0 * constants.k_b * constants.t * 1000.0).sqrt();
        assert_relative_eq!(noise.spectral_density(1000.0), expected);
    }

    #[test]
    fn capacitor_impedance_rolls_off() {
        let c = Capacitor::new(cid(), "C1".into(), [NodeId(1), NodeId(0)], 159.155e-9);
        let z = c.impedance(1000.0);
        assert_relative_eq!(z.re, 0.0, epsilon = 1e-12);
        assert!(z.im < 0.0);
    }

    #[test]
    fn inductor_impedance_rises() {
        let l = Inductor::new(cid(), "L1".into(), [NodeId(1), NodeId(0)], 1e-3);
        let z = l.impedance(1000.0);
        assert_relative_eq!(z.re, 0.0, epsilon = 1e-12);
        assert!(z.im > 0.0);
    }
}
