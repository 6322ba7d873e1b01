//! Complex-valued MNA matrix assembly and solving.
//!
//! ## Modified Nodal Analysis, uniform tableau
//!
//! Every component — passive, op-amp, or the input port — owns both a
//! branch-current row/column and contributes to the KCL row of each node it
//! touches:
//!
//! ```text
//! row k   (component k's branch relation): coefficients on column k and on
//!         its incident node columns
//! row n   (node n's KCL):                  +-1 entries in the branch
//!         columns of every component incident to n
//! ```
//!
//! The matrix dimension is `n_components + (n_nodes - 1)`; ground is never
//! given an index.

use num_complex::Complex64;

use crate::circuit::{Circuit, NodeId};
use crate::components::{Component, InputKind};
use crate::error::{LinsimError, Result};

/// A complex-valued MNA system `A x = z`.
#[derive(Debug, Clone)]
pub struct MnaMatrix {
    /// System matrix `A`, row-major.
    pub a: Vec<Complex64>,
    /// Source vector `z`.
    pub z: Vec<Complex64>,
    /// Solution vector `x`, valid after [`MnaMatrix::solve`].
    pub x: Vec<Complex64>,
    pub size: usize,
    lu: Vec<Complex64>,
    pivots: Vec<usize>,
}

const SINGULAR_THRESHOLD: f64 = 1e-15;

impl MnaMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![Complex64::new(0.0, 0.0); size * size],
            z: vec![Complex64::new(0.0, 0.0); size],
            x: vec![Complex64::new(0.0, 0.0); size],
            size,
            lu: vec![Complex64::new(0.0, 0.0); size * size],
            pivots: vec![0; size],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.a[row * self.size + col]
    }

    pub fn add(&mut self, row: usize, col: usize, value: Complex64) {
        self.a[row * self.size + col] += value;
    }

    pub fn add_source(&mut self, row: usize, value: Complex64) {
        self.z[row] += value;
    }

    /// Transpose of this system's `A` matrix, for noise-analysis's `Aᵀ y = e_sink`.
    pub fn transposed(&self) -> Self {
        let n = self.size;
        let mut t = Self::new(n);
        for i in 0..n {
            for j in 0..n {
                t.a[j * n + i] = self.a[i * n + j];
            }
        }
        t
    }

    /// LU decomposition with partial pivoting by magnitude.
    pub fn factor(&mut self, frequency: f64) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);
        for i in 0..n {
            self.pivots[i] = i;
        }

        for k in 0..n {
            let mut max_val = self.lu[k * n + k].norm();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = self.lu[i * n + k].norm();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < SINGULAR_THRESHOLD {
                return Err(LinsimError::Singular { frequency });
            }

            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    let kj = self.lu[k * n + j];
                    self.lu[i * n + j] -= factor * kj;
                }
            }
        }

        Ok(())
    }

    /// Solve using the pre-computed LU decomposition.
    pub fn solve(&mut self, frequency: f64) -> Result<()> {
        let n = self.size;
        let b = self.z.clone();
        for i in 0..n {
            self.x[i] = b[self.pivots[i]];
        }

        for i in 0..n {
            for j in 0..i {
                let xj = self.x[j];
                self.x[i] -= self.lu[i * n + j] * xj;
            }
        }

        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let xj = self.x[j];
                self.x[i] -= self.lu[i * n + j] * xj;
            }
            let diag = self.lu[i * n + i];
            if diag.norm() < SINGULAR_THRESHOLD {
                return Err(LinsimError::Singular { frequency });
            }
            self.x[i] /= diag;
        }

        Ok(())
    }
}

fn node_col(circuit: &Circuit, node: NodeId) -> Option<usize> {
    circuit.node_matrix_index(node)
}

/// Stamp every component's branch-relation row and contribution to node KCL
/// rows into `matrix`, at frequency `f`.
pub fn stamp_components(circuit: &Circuit, matrix: &mut MnaMatrix, f: f64) {
    for component in &circuit.components {
        let k = circuit.component_index(component.id());
        match component {
            Component::Resistor(_) | Component::Capacitor(_) | Component::Inductor(_) => {
                let z = component.impedance(f).expect("passive component has impedance");
                stamp_branch_element(matrix, k, circuit, component.nodes(), z);
            }
            Component::OpAmp(op) => {
                let one = Complex64::new(1.0, 0.0);
                if let Some(p) = node_col(circuit, op.input_pos()) {
                    matrix.add(k, p, -one);
                }
                if let Some(n) = node_col(circuit, op.input_neg()) {
                    matrix.add(k, n, one);
                }
                let gain = op.gain(f);
                if let Some(o) = node_col(circuit, op.output()) {
                    matrix.add(k, o, one / gain);
                    matrix.add(o, k, one);
                }
            }
            Component::Input(input) => match input.kind {
                InputKind::Voltage => {
                    stamp_voltage_source(matrix, k, circuit, component.nodes());
                }
                InputKind::Current => {
                    matrix.add(k, k, Complex64::new(1.0, 0.0));
                    stamp_node_incidence(matrix, k, circuit, component.nodes());
                }
            },
        }
    }
}

/// `Z * I_k - V_n1 + V_n2 = 0` plus the `+1/-1` node-KCL entries in column `k`.
fn stamp_branch_element(matrix: &mut MnaMatrix, k: usize, circuit: &Circuit, nodes: &[NodeId], z: Complex64) {
    let one = Complex64::new(1.0, 0.0);
    matrix.add(k, k, z);
    if let Some(n1) = node_col(circuit, nodes[0]) {
        matrix.add(k, n1, -one);
    }
    if let Some(n2) = node_col(circuit, nodes[1]) {
        matrix.add(k, n2, one);
    }
    stamp_node_incidence(matrix, k, circuit, nodes);
}

/// An ideal voltage source: `V_pos - V_neg = 1` in its own branch row (no
/// impedance term, no self-column entry), plus the usual node-KCL
/// contribution of its branch current. The source is undivided by any
/// load — `impedance` is metadata only, never stamped here.
fn stamp_voltage_source(matrix: &mut MnaMatrix, k: usize, circuit: &Circuit, nodes: &[NodeId]) {
    let one = Complex64::new(1.0, 0.0);
    if let Some(n1) = node_col(circuit, nodes[0]) {
        matrix.add(k, n1, one);
    }
    if let Some(n2) = node_col(circuit, nodes[1]) {
        matrix.add(k, n2, -one);
    }
    stamp_node_incidence(matrix, k, circuit, nodes);
}

/// Node-KCL entries for a two-terminal component's branch column: `+1` at
/// the sink node (`nodes[0]`), `-1` at the source node (`nodes[1]`).
fn stamp_node_incidence(matrix: &mut MnaMatrix, k: usize, circuit: &Circuit, nodes: &[NodeId]) {
    let one = Complex64::new(1.0, 0.0);
    if let Some(n1) = node_col(circuit, nodes[0]) {
        matrix.add(n1, k, one);
    }
    if let Some(n2) = node_col(circuit, nodes[1]) {
        matrix.add(n2, k, -one);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use crate::components::InputKind;
    use crate::config::Config;
    use approx::assert_relative_eq;

    fn voltage_divider() -> Circuit {
        let mut b = CircuitBuilder::new(Config::default());
        b.add_resistor("R1", "in", "mid", 1000.0).unwrap();
        b.add_resistor("R2", "mid", "gnd", 1000.0).unwrap();
        b.set_input("in", "gnd", InputKind::Voltage, Some(50.0));
        b.freeze().unwrap()
    }

    #[test]
    fn voltage_divider_response_is_one_half() {
        let circuit = voltage_divider();
        let mut matrix = MnaMatrix::new(circuit.matrix_size());
        stamp_components(&circuit, &mut matrix, 1000.0);

        let input_row = circuit.component_index(circuit.input_id);
        matrix.add_source(input_row, Complex64::new(1.0, 0.0));

        matrix.factor(1000.0).unwrap();
        matrix.solve(1000.0).unwrap();

        let mid = circuit.find_node("mid").unwrap();
        let mid_idx = circuit.node_matrix_index(mid).unwrap();
        assert_relative_eq!(matrix.x[mid_idx].norm(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn singular_matrix_reports_frequency() {
        // A lone resistor whose both nodes float relative to the input is
        // fine; force a singular system instead with an op-amp whose
        // output node is never otherwise constrained and a zero gain.
        let mut matrix = MnaMatrix::new(2);
        // Leave the matrix entirely zero: row 0 has no pivot candidate.
        let err = matrix.factor(42.0).unwrap_err();
        match err {
            LinsimError::Singular { frequency } => assert_relative_eq!(frequency, 42.0),
            other => panic!("expected Singular, got {other:?}"),
        }
    }
}
