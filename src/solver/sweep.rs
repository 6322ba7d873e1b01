//! Frequency sweep driver.
//!
//! Iterates a sorted, strictly-positive frequency vector, invoking a
//! per-frequency solve closure that is a pure function of `(circuit, f)`.
//! Sequential by default; `SweepOptions::parallel` fans the sweep out across
//! `rayon`'s thread pool since each point is independent.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use rayon::prelude::*;

use crate::error::{LinsimError, Result};

/// Options governing how a sweep executes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    pub parallel: bool,
}

/// Reject an empty, non-positive, or non-strictly-increasing frequency vector.
pub fn validate_frequencies(frequencies: &[f64]) -> Result<()> {
    if frequencies.is_empty() {
        return Err(LinsimError::dimension_mismatch("frequency vector is empty"));
    }
    if frequencies.iter().any(|&f| !(f > 0.0)) {
        return Err(LinsimError::dimension_mismatch(
            "frequencies must be strictly positive",
        ));
    }
    if !frequencies.windows(2).all(|w| w[0] < w[1]) {
        return Err(LinsimError::dimension_mismatch(
            "frequency vector must be strictly increasing",
        ));
    }
    Ok(())
}

/// Run `solve_at` once per frequency, in sweep order, reporting progress at
/// >=1% granularity and honouring cooperative cancellation via `cancel`.
///
/// On cancellation the sweep stops at the next frequency boundary and
/// returns [`LinsimError::Cancelled`]; no partial results are returned.
pub fn run_sweep<T, F>(
    frequencies: &[f64],
    cancel: &AtomicBool,
    mut progress: impl FnMut(f64) + Send,
    options: &SweepOptions,
    solve_at: F,
) -> Result<Vec<T>>
where
    F: Fn(f64) -> Result<T> + Sync,
    T: Send,
{
    validate_frequencies(frequencies)?;
    let n = frequencies.len();
    let step = (n / 100).max(1);

    if options.parallel {
        let completed = AtomicUsize::new(0);
        let progress_cell = Mutex::new(&mut progress);
        let results: Vec<Result<T>> = frequencies
            .par_iter()
            .map(|&f| {
                if cancel.load(Ordering::SeqCst) {
                    return Err(LinsimError::Cancelled);
                }
                let result = solve_at(f);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if done % step == 0 || done == n {
                    if let Ok(mut cb) = progress_cell.lock() {
                        cb(done as f64 / n as f64);
                    }
                }
                result
            })
            .collect();

        if cancel.load(Ordering::SeqCst) {
            return Err(LinsimError::Cancelled);
        }
        results.into_iter().collect()
    } else {
        let mut out = Vec::with_capacity(n);
        for (i, &f) in frequencies.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                return Err(LinsimError::Cancelled);
            }
            out.push(solve_at(f)?);
            if (i + 1) % step == 0 || i + 1 == n {
                progress((i + 1) as f64 / n as f64);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_sweep() {
        let cancel = AtomicBool::new(false);
        let result: Result<Vec<f64>> = run_sweep(&[], &cancel, |_| {}, &SweepOptions::default(), |f| Ok(f));
        assert!(matches!(result, Err(LinsimError::DimensionMismatch { .. })));
    }

    #[test]
    fn rejects_non_monotonic_sweep() {
        let cancel = AtomicBool::new(false);
        let result: Result<Vec<f64>> =
            run_sweep(&[10.0, 5.0], &cancel, |_| {}, &SweepOptions::default(), |f| Ok(f));
        assert!(matches!(result, Err(LinsimError::DimensionMismatch { .. })));
    }

    #[test]
    fn sequential_sweep_preserves_order() {
        let cancel = AtomicBool::new(false);
        let freqs = vec![1.0, 10.0, 100.0];
        let result = run_sweep(&freqs, &cancel, |_| {}, &SweepOptions::default(), |f| Ok(f * 2.0)).unwrap();
        assert_eq!(result, vec![2.0, 20.0, 200.0]);
    }

    #[test]
    fn cancelling_before_start_returns_no_results() {
        let cancel = AtomicBool::new(true);
        let freqs = vec![1.0, 10.0, 100.0];
        let result: Result<Vec<f64>> =
            run_sweep(&freqs, &cancel, |_| {}, &SweepOptions::default(), |f| Ok(f));
        assert!(matches!(result, Err(LinsimError::Cancelled)));
    }
}
