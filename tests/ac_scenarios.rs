//! End-to-end scenarios against the public response/noise analysis surface.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};

use approx::assert_relative_eq;
use linsim_core::analysis::{AcNoiseAnalysis, AcResponseAnalysis};
use linsim_core::circuit::CircuitBuilder;
use linsim_core::components::{InputKind, OpAmpParams};
use linsim_core::config::Config;
use linsim_core::solution::Endpoint;
use linsim_core::solver::SweepOptions;

fn log_sweep(start: f64, stop: f64, points: usize) -> Vec<f64> {
    let log_start = start.ln();
    let log_stop = stop.ln();
    (0..points)
        .map(|i| (log_start + (log_stop - log_start) * i as f64 / (points - 1) as f64).exp())
        .collect()
}

#[test]
fn voltage_divider_response_is_flat_one_half() {
    let mut b = CircuitBuilder::new(Config::default());
    b.add_resistor("R1", "in", "mid", 1000.0).unwrap();
    b.add_resistor("R2", "mid", "gnd", 1000.0).unwrap();
    b.set_input("in", "gnd", InputKind::Voltage, Some(50.0));
    let circuit = b.freeze().unwrap();

    let frequencies = log_sweep(1.0, 1_000_000.0, 50);
    let mut analysis = AcResponseAnalysis::new(circuit);
    let cancel = AtomicBool::new(false);
    let solution = analysis
        .calculate(&["mid"], &frequencies, &cancel, SweepOptions::default(), |_| {})
        .unwrap();

    let mid = Endpoint::Node("mid".to_string());
    let tf = &solution.responses(None, Some(&mid))[0];
    for value in &tf.series.values {
        assert_relative_eq!(value.norm(), 0.5, epsilon = 1e-9);
    }
}

#[test]
fn rc_low_pass_corner_is_minus_three_db() {
    let mut b = CircuitBuilder::new(Config::default());
    b.add_resistor("R1", "in", "out", 1000.0).unwrap();
    b.add_capacitor("C1", "out", "gnd", 159.155e-9).unwrap();
    b.set_input("in", "gnd", InputKind::Voltage, Some(50.0));
    let circuit = b.freeze().unwrap();

    let fc = 1.0 / (2.0 * PI * 1000.0 * 159.155e-9);
    let mut analysis = AcResponseAnalysis::new(circuit);
    let cancel = AtomicBool::new(false);
    let solution = analysis
        .calculate(&["out"], &[fc], &cancel, SweepOptions::default(), |_| {})
        .unwrap();

    let out = Endpoint::Node("out".to_string());
    let tf = &solution.responses(None, Some(&out))[0];
    assert_relative_eq!(tf.series.values[0].norm(), 1.0 / 2f64.sqrt(), epsilon = 1e-6);
}

#[test]
fn inverting_opamp_gain_is_minus_ten() {
    let mut b = CircuitBuilder::new(Config::default());
    b.add_resistor("Rin", "in", "n1", 1000.0).unwrap();
    b.add_resistor("Rf", "n1", "out", 10_000.0).unwrap();
    b.add_opamp("U1", "gnd", "n1", "out", OpAmpParams::ideal()).unwrap();
    b.set_input("in", "gnd", InputKind::Voltage, Some(50.0));
    let circuit = b.freeze().unwrap();

    let mut analysis = AcResponseAnalysis::new(circuit);
    let cancel = AtomicBool::new(false);
    let solution = analysis
        .calculate(&["out"], &[10.0], &cancel, SweepOptions::default(), |_| {})
        .unwrap();

    let out = Endpoint::Node("out".to_string());
    let tf = &solution.responses(None, Some(&out))[0];
    assert_relative_eq!(tf.series.values[0].re, -10.0, epsilon = 1e-3);
}

#[test]
fn johnson_noise_at_divider_midpoint() {
    let mut b = CircuitBuilder::new(Config::default());
    b.add_resistor("R1", "in", "mid", 1000.0).unwrap();
    b.add_resistor("R2", "mid", "gnd", 1000.0).unwrap();
    b.set_input("in", "gnd", InputKind::Voltage, Some(50.0));
    let circuit = b.freeze().unwrap();
    let config = Config::default();

    let mut analysis = AcNoiseAnalysis::new(circuit);
    let cancel = AtomicBool::new(false);
    let solution = analysis
        .calculate("mid", &[1000.0], false, None, &cancel, SweepOptions::default(), |_| {})
        .unwrap();

    let sink = Endpoint::Node("mid".to_string());
    let total = solution.noise_sum(&sink).series.values[0];
    let expected = (4.0 * config.constants.k_b * config.constants.t * 500.0).sqrt();
    assert_relative_eq!(total, expected, epsilon = expected * 1e-6);
    assert_relative_eq!(total, 2.87e-9, epsilon = 0.05e-9);
}

#[test]
fn input_referred_noise_scales_by_inverse_gain() {
    let mut b = CircuitBuilder::new(Config::default());
    b.add_resistor("R1", "in", "mid", 1000.0).unwrap();
    b.add_resistor("R2", "mid", "gnd", 1000.0).unwrap();
    b.set_input("in", "gnd", InputKind::Voltage, Some(50.0));
    let circuit = b.freeze().unwrap();

    let cancel = AtomicBool::new(false);

    let mut output_analysis = AcNoiseAnalysis::new(circuit.clone());
    let output_total = output_analysis
        .calculate("mid", &[1000.0], false, None, &cancel, SweepOptions::default(), |_| {})
        .unwrap()
        .noise_sum(&Endpoint::Node("mid".to_string()))
        .series
        .values[0];

    let mut input_analysis = AcNoiseAnalysis::new(circuit);
    let input_total = input_analysis
        .calculate("mid", &[1000.0], true, None, &cancel, SweepOptions::default(), |_| {})
        .unwrap()
        .noise_sum(&Endpoint::Node("mid".to_string()))
        .series
        .values[0];

    assert_relative_eq!(input_total, output_total * 2.0, epsilon = 1e-9);
}

#[test]
fn cancelling_mid_sweep_discards_the_solution() {
    let mut b = CircuitBuilder::new(Config::default());
    b.add_resistor("R1", "in", "mid", 1000.0).unwrap();
    b.add_resistor("R2", "mid", "gnd", 1000.0).unwrap();
    b.set_input("in", "gnd", InputKind::Voltage, Some(50.0));
    let circuit = b.freeze().unwrap();

    let frequencies: Vec<f64> = (1..=1000).map(|i| i as f64).collect();
    let mut analysis = AcResponseAnalysis::new(circuit);
    let cancel = AtomicBool::new(false);
    let mut progress_calls = 0;
    let result = analysis.calculate(&["mid"], &frequencies, &cancel, SweepOptions::default(), |_| {
        progress_calls += 1;
        if progress_calls == 1 {
            cancel.store(true, Ordering::SeqCst);
        }
    });

    assert!(result.is_err());
    assert!(analysis.solution().is_none());
}
