//! The evaluator-facing side of a garbled `Circuit`.
//!
//! This mirrors `Circuit` but keeps only what EVALUATION needs: the wiring and the
//! garbled rows. The truth tables are NOT part of it; neither are any labels.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::circuit::{Circuit, GateType, WireRef};
use crate::constant::{NB_ROWS_BINARY, NB_ROWS_UNARY};

/// Essentially `enum GateType`, but the `truth_table` fields are removed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GarbledGateInputs {
    Binary { input_a: WireRef, input_b: WireRef },
    Unary { input_a: WireRef },
}

impl From<&GateType> for GarbledGateInputs {
    fn from(gate_type: &GateType) -> Self {
        match gate_type {
            GateType::Binary {
                input_a, input_b, ..
            } => GarbledGateInputs::Binary {
                input_a: input_a.clone(),
                input_b: input_b.clone(),
            },
            GateType::Unary { input_a, .. } => GarbledGateInputs::Unary {
                input_a: input_a.clone(),
            },
        }
    }
}

impl GarbledGateInputs {
    /// Number of rows a well-formed garbled table has for these inputs
    pub fn expected_nb_rows(&self) -> usize {
        match self {
            GarbledGateInputs::Binary { .. } => NB_ROWS_BINARY,
            GarbledGateInputs::Unary { .. } => NB_ROWS_UNARY,
        }
    }

    pub fn input_a(&self) -> &WireRef {
        match self {
            GarbledGateInputs::Binary { input_a, .. } | GarbledGateInputs::Unary { input_a } => {
                input_a
            }
        }
    }

    pub fn input_b(&self) -> Option<&WireRef> {
        match self {
            GarbledGateInputs::Binary { input_b, .. } => Some(input_b),
            GarbledGateInputs::Unary { .. } => None,
        }
    }
}

/// A garbled table: `rows[r]` is the ciphertext at PERMUTED index `r`
///
/// Row `r` hides the output label for the semantic inputs whose labels have
/// point bits `r = (point_a << 1) | point_b` (Binary) or `r = point_a` (Unary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledGate {
    pub(crate) inputs: GarbledGateInputs,
    pub(crate) output: WireRef,
    pub(crate) rows: Vec<Block>,
}

impl GarbledGate {
    pub(crate) fn new(inputs: GarbledGateInputs, output: WireRef, rows: Vec<Block>) -> Self {
        Self {
            inputs,
            output,
            rows,
        }
    }

    pub fn get_inputs(&self) -> &GarbledGateInputs {
        &self.inputs
    }

    /// The Gate's ID: its output wire id; it is also the tweak's gate part
    pub fn get_id(&self) -> usize {
        self.output.id
    }

    pub fn get_output(&self) -> &WireRef {
        &self.output
    }

    pub fn get_rows(&self) -> &[Block] {
        &self.rows
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.rows.len() == self.inputs.expected_nb_rows()
    }
}

/// The permuted row selected by the point bits of the input labels
pub(crate) fn row_index(point_a: bool, point_b: Option<bool>) -> usize {
    match point_b {
        Some(point_b) => (usize::from(point_a) << 1) | usize::from(point_b),
        None => usize::from(point_a),
    }
}

/// The full ordered sequence of `GarbledGate`, the wire count and the input/output wires.
///
/// Safe to disclose fully to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledCircuit {
    nb_wires: usize,
    inputs: Vec<WireRef>,
    outputs: Vec<WireRef>,
    gates: Vec<GarbledGate>,
}

impl GarbledCircuit {
    /// `gates` MUST be in the same order as `circuit.get_gates()`
    pub(crate) fn new(circuit: &Circuit, gates: Vec<GarbledGate>) -> Self {
        Self {
            nb_wires: circuit.get_nb_wires(),
            inputs: circuit.get_inputs().to_vec(),
            outputs: circuit.get_outputs().to_vec(),
            gates,
        }
    }

    pub fn get_nb_wires(&self) -> usize {
        self.nb_wires
    }

    pub fn get_nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn get_nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn get_inputs(&self) -> &[WireRef] {
        &self.inputs
    }

    pub fn get_outputs(&self) -> &[WireRef] {
        &self.outputs
    }

    pub fn get_gates(&self) -> &[GarbledGate] {
        &self.gates
    }

    pub(crate) fn get_gates_mut(&mut self) -> &mut [GarbledGate] {
        &mut self.gates
    }
}
