//! Noise analysis: solves `Aᵀ y = e_sink` and projects each intrinsic noise
//! source through the resulting response vector.

use std::sync::atomic::AtomicBool;

use num_complex::Complex64;

use super::{input_endpoint, resolve_sink, sink_endpoint, AcResponseAnalysis, AnalysisState};
use crate::circuit::Circuit;
use crate::error::Result;
use crate::solution::{Endpoint, NoiseDensity, Series, Solution};
use crate::solver::{run_sweep, stamp_components, MnaMatrix, SweepOptions};

/// Computes per-source noise spectral densities at a chosen sink, with
/// optional input-referral.
pub struct AcNoiseAnalysis {
    circuit: Circuit,
    state: AnalysisState,
    solution: Option<Solution>,
}

impl AcNoiseAnalysis {
    pub fn new(circuit: Circuit) -> Self {
        Self {
            circuit,
            state: AnalysisState::Configured,
            solution: None,
        }
    }

    pub fn state(&self) -> AnalysisState {
        self.state
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// `impedance`, if given, overrides the input port's series impedance
    /// for this call only; the analysis works on an internal copy of the
    /// circuit and never mutates the one it was built with.
    pub fn calculate(
        &mut self,
        sink: &str,
        frequencies: &[f64],
        input_refer: bool,
        impedance: Option<f64>,
        cancel: &AtomicBool,
        options: SweepOptions,
        mut progress: impl FnMut(f64) + Send,
    ) -> Result<&Solution> {
        self.state = AnalysisState::Running;

        let mut run = || -> Result<Solution> {
            let mut circuit = self.circuit.clone();
            if let Some(z) = impedance {
                circuit.override_input_impedance(z);
            }
            let sink_ref = resolve_sink(&circuit, sink)?;
            let sink_endpoint = sink_endpoint(&circuit, sink_ref);
            let size = circuit.matrix_size();

            let noise_sources: Vec<_> = circuit
                .components
                .iter()
                .flat_map(|c| c.noise_sources(c.id(), circuit.config.constants))
                .collect();

            let sink_idx = circuit.sink_index(sink_ref);

            let ys = run_sweep(frequencies, cancel, &mut progress, &options, |f| {
                let mut matrix = MnaMatrix::new(size);
                stamp_components(&circuit, &mut matrix, f);
                let transposed = matrix.transposed();
                let mut system = transposed;
                if let Some(idx) = sink_idx {
                    system.add_source(idx, Complex64::new(1.0, 0.0));
                }
                system.factor(f)?;
                system.solve(f)?;
                Ok(system.x)
            })?;

            let mut solution = Solution::new(frequencies.to_vec());

            for source in &noise_sources {
                let densities: Vec<f64> = frequencies.iter().map(|&f| source.spectral_density(f)).collect();
                if densities.iter().all(|&d| d == 0.0) {
                    continue;
                }
                let idx = match source.kind {
                    crate::components::NoiseKind::Component(id) => Some(circuit.component_index(id)),
                    crate::components::NoiseKind::Node(n) => circuit.node_matrix_index(n),
                };
                let contribution: Vec<f64> = match idx {
                    Some(i) => ys
                        .iter()
                        .zip(densities.iter())
                        .map(|(y, &density)| y[i].norm() * density)
                        .collect(),
                    None => vec![0.0; frequencies.len()],
                };
                solution.add_noise(NoiseDensity {
                    source: source.owner_name.clone(),
                    sink: sink_endpoint.clone(),
                    series: Series::new(frequencies.to_vec(), contribution),
                })?;
            }

            if input_refer {
                refer_to_input(&circuit, &mut solution, sink, frequencies, cancel, options)?;
            }

            Ok(solution)
        };

        match run() {
            Ok(solution) => {
                self.solution = Some(solution);
                self.state = AnalysisState::Completed;
                Ok(self.solution.as_ref().unwrap())
            }
            Err(e) => {
                self.state = AnalysisState::Configured;
                Err(e)
            }
        }
    }
}

/// Divide every noise series (and the incoherent total) by the magnitude of
/// the input-to-sink transfer function, expressing output-referred noise as
/// equivalent input-referred noise.
fn refer_to_input(
    circuit: &Circuit,
    solution: &mut Solution,
    sink: &str,
    frequencies: &[f64],
    cancel: &AtomicBool,
    options: SweepOptions,
) -> Result<()> {
    let mut response = AcResponseAnalysis::new(circuit.clone());
    let response_solution = response.calculate(&[sink], frequencies, cancel, options, |_| {})?;
    let sink_ref = resolve_sink(circuit, sink)?;
    let endpoint = sink_endpoint(circuit, sink_ref);
    let source = input_endpoint(circuit);
    let gain: Vec<f64> = response_solution
        .responses(Some(&source), Some(&endpoint))
        .first()
        .expect("response analysis produced the requested sink")
        .series
        .values
        .iter()
        .map(|v| v.norm())
        .collect();

    *solution = divide_all(solution, &gain);
    Ok(())
}

fn divide_all(solution: &Solution, gain: &[f64]) -> Solution {
    let mut out = Solution::new(solution.frequencies.clone());
    for density in solution.noise(None, None) {
        let values: Vec<f64> = density
            .series
            .values
            .iter()
            .zip(gain.iter())
            .map(|(&v, &g)| if g != 0.0 { v / g } else { 0.0 })
            .collect();
        out.add_noise(NoiseDensity {
            source: density.source.clone(),
            sink: density.sink.clone(),
            series: Series::new(density.series.frequencies.clone(), values),
        })
        .expect("source is already known unique");
    }
    out
}

impl Circuit {
    /// Override the frozen circuit's input-port impedance on this in-memory
    /// copy only. Used by noise analysis's `impedance` override parameter.
    pub(crate) fn override_input_impedance(&mut self, impedance: f64) {
        let input_id = self.input_id;
        if let crate::components::Component::Input(input) = &mut self.components[input_id.0] {
            input.impedance = impedance;
        }
    }
}
