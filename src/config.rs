//! Simulation configuration.
//!
//! The original tool this crate is grounded on reads these values from a
//! process-wide singleton config file. Here `Config` is a plain immutable
//! record passed explicitly into analysis constructors; there is no global
//! state to initialise or reset between runs.

/// Physical constants used by noise calculations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constants {
    /// Boltzmann constant, J/K.
    pub k_b: f64,
    /// Circuit temperature, K.
    pub t: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            k_b: 1.380_649e-23,
            t: 298.15,
        }
    }
}

/// Options governing how an analysis runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Default series impedance (ohms) assumed for an input port when none
    /// is given explicitly.
    pub default_input_impedance: f64,
    /// Whether a sweep should report progress via its callback.
    pub print_progress: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            default_input_impedance: 50.0,
            print_progress: true,
        }
    }
}

/// Top-level configuration record threaded through circuit construction and
/// analysis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Config {
    pub constants: Constants,
    pub analysis: AnalysisOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let cfg = Config::default();
        assert!((cfg.constants.k_b - 1.380_649e-23).abs() < 1e-30);
        assert!((cfg.constants.t - 298.15).abs() < 1e-9);
        assert!((cfg.analysis.default_input_impedance - 50.0).abs() < 1e-9);
        assert!(cfg.analysis.print_progress);
    }
}
