//! Transfer-function (response) analysis: solves `A x = b`.

use std::sync::atomic::AtomicBool;

use num_complex::Complex64;

use super::{input_endpoint, resolve_sink, sink_endpoint, AnalysisState};
use crate::circuit::Circuit;
use crate::error::Result;
use crate::solution::{Series, Solution, TransferFunction};
use crate::solver::{run_sweep, stamp_components, MnaMatrix, SweepOptions};

/// Computes `TransferFunction`s from the circuit's input port to a set of
/// requested sinks, across a frequency sweep.
pub struct AcResponseAnalysis {
    circuit: Circuit,
    state: AnalysisState,
    solution: Option<Solution>,
}

impl AcResponseAnalysis {
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

    /// Run the sweep and populate the solution. Leaves the analysis
    /// `Completed` on success, `Configured` (with no solution) on any error
    /// including cancellation.
    pub fn calculate(
        &mut self,
        sinks: &[&str],
        frequencies: &[f64],
        cancel: &AtomicBool,
        options: SweepOptions,
        mut progress: impl FnMut(f64) + Send,
    ) -> Result<&Solution> {
        self.state = AnalysisState::Running;

        let mut run = || -> Result<Solution> {
            let resolved = sinks
                .iter()
                .map(|&name| resolve_sink(&self.circuit, name).map(|sink| (name, sink)))
                .collect::<Result<Vec<_>>>()?;

            let circuit = &self.circuit;
            let input_row = circuit.component_index(circuit.input_id);
            let size = circuit.matrix_size();

            let xs = run_sweep(frequencies, cancel, &mut progress, &options, |f| {
                let mut matrix = MnaMatrix::new(size);
                stamp_components(circuit, &mut matrix, f);
                matrix.add_source(input_row, Complex64::new(1.0, 0.0));
                matrix.factor(f)?;
                matrix.solve(f)?;
                Ok(matrix.x)
            })?;

            let mut solution = Solution::new(frequencies.to_vec());
            let source = input_endpoint(circuit);
            for (_, sink) in &resolved {
                let values: Vec<Complex64> = match circuit.sink_index(*sink) {
                    Some(idx) => xs.iter().map(|x| x[idx]).collect(),
                    None => vec![Complex64::new(0.0, 0.0); frequencies.len()],
                };
                solution.add_response(TransferFunction {
                    source: source.clone(),
                    sink: sink_endpoint(circuit, *sink),
                    series: Series::new(frequencies.to_vec(), values),
                })?;
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
