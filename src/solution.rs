//! Analysis results: transfer functions, noise spectra, and their container.

use num_complex::Complex64;

use crate::error::{LinsimError, Result};

/// A named endpoint a response or noise contribution is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Node(String),
    Component(String),
}

/// A pair of aligned frequency/value arrays.
#[derive(Debug, Clone)]
pub struct Series<Y> {
    pub frequencies: Vec<f64>,
    pub values: Vec<Y>,
}

impl<Y> Series<Y> {
    pub fn new(frequencies: Vec<f64>, values: Vec<Y>) -> Self {
        Self { frequencies, values }
    }
}

/// Complex-valued transfer function from the input port to a sink.
#[derive(Debug, Clone)]
pub struct TransferFunction {
    pub source: Endpoint,
    pub sink: Endpoint,
    pub series: Series<Complex64>,
}

/// Non-negative real noise spectral density contributed by one source.
#[derive(Debug, Clone)]
pub struct NoiseDensity {
    pub source: String,
    pub sink: Endpoint,
    pub series: Series<f64>,
}

/// A keyed collection of transfer functions and noise spectra produced by
/// an analysis pass. Append-only during the pass, immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    pub frequencies: Vec<f64>,
    responses: Vec<TransferFunction>,
    noise: Vec<NoiseDensity>,
}

impl Solution {
    pub fn new(frequencies: Vec<f64>) -> Self {
        Self {
            frequencies,
            responses: Vec::new(),
            noise: Vec::new(),
        }
    }

    pub fn add_response(&mut self, tf: TransferFunction) -> Result<()> {
        if self
            .responses
            .iter()
            .any(|existing| existing.source == tf.source && existing.sink == tf.sink)
        {
            return Err(LinsimError::duplicate_name(format!(
                "response {:?} -> {:?}",
                tf.source, tf.sink
            )));
        }
        self.responses.push(tf);
        Ok(())
    }

    pub fn add_noise(&mut self, density: NoiseDensity) -> Result<()> {
        if self
            .noise
            .iter()
            .any(|existing| existing.source == density.source && existing.sink == density.sink)
        {
            return Err(LinsimError::duplicate_name(format!(
                "noise source {} -> {:?}",
                density.source, density.sink
            )));
        }
        self.noise.push(density);
        Ok(())
    }

    /// Transfer functions, optionally filtered by source and/or sink.
    pub fn responses(&self, source: Option<&Endpoint>, sink: Option<&Endpoint>) -> Vec<&TransferFunction> {
        self.responses
            .iter()
            .filter(|tf| source.map_or(true, |s| &tf.source == s))
            .filter(|tf| sink.map_or(true, |s| &tf.sink == s))
            .collect()
    }

    /// Noise densities, optionally filtered by source name and/or sink.
    pub fn noise(&self, source: Option<&str>, sink: Option<&Endpoint>) -> Vec<&NoiseDensity> {
        self.noise
            .iter()
            .filter(|n| source.map_or(true, |s| n.source == s))
            .filter(|n| sink.map_or(true, |s| &n.sink == s))
            .collect()
    }

    /// Incoherent sum `sqrt(sum y_i(f)^2)` across every noise source sharing `sink`.
    pub fn noise_sum(&self, sink: &Endpoint) -> NoiseDensity {
        let contributors: Vec<&NoiseDensity> = self.noise(None, Some(sink));
        let values = self
            .frequencies
            .iter()
            .enumerate()
            .map(|(i, _)| {
                contributors
                    .iter()
                    .map(|n| n.series.values[i] * n.series.values[i])
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();
        NoiseDensity {
            source: "total".to_string(),
            sink: sink.clone(),
            series: Series::new(self.frequencies.clone(), values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> Endpoint {
        Endpoint::Node("mid".to_string())
    }

    #[test]
    fn noise_sum_is_sqrt_of_sum_of_squares() {
        let mut solution = Solution::new(vec![1.0, 10.0]);
        solution
            .add_noise(NoiseDensity {
                source: "R1".into(),
                sink: sink(),
                series: Series::new(vec![1.0, 10.0], vec![3.0, 3.0]),
            })
            .unwrap();
        solution
            .add_noise(NoiseDensity {
                source: "R2".into(),
                sink: sink(),
                series: Series::new(vec![1.0, 10.0], vec![4.0, 4.0]),
            })
            .unwrap();

        let total = solution.noise_sum(&sink());
        assert!((total.series.values[0] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_response_is_rejected() {
        let mut solution = Solution::new(vec![1.0]);
        let tf = TransferFunction {
            source: Endpoint::Node("in".into()),
            sink: sink(),
            series: Series::new(vec![1.0], vec![Complex64::new(1.0, 0.0)]),
        };
        solution.add_response(tf.clone()).unwrap();
        assert!(solution.add_response(tf).is_err());
    }
}
