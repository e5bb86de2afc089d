mod gate;

use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashSet;
use snafu::prelude::*;

pub use gate::{Gate, GateType, GateTypeBinary, GateTypeUnary, TruthTable, WireRef};

use crate::wire_value::WireValue;

/// Errors emitted when building(ie validating) a `Circuit`, or evaluating it in the clear.
///
/// A malformed circuit is rejected HERE, before any garbling starts.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum CircuitError {
    /// A wire id is `>= nb_wires`
    WireOutOfRange { wire: WireRef, nb_wires: usize },
    DuplicatedInput { wire: WireRef },
    DuplicatedOutput { wire: WireRef },
    /// The Gates MUST be given in topological order: a Gate can only read a circuit input,
    /// or the output of a PREVIOUS Gate
    NotTopological { gate_id: usize, wire: WireRef },
    /// Every wire is written exactly once: either it is a circuit input, or a Gate's output
    WireWrittenTwice { wire: WireRef },
    /// A Binary Gate reads the same wire twice; both of its pads would cancel out
    SameGateInputs { gate_id: usize, wire: WireRef },
    /// A circuit output is neither an input nor written by any Gate
    OutputNotProduced { wire: WireRef },
    /// `eval_plain`: wrong number of inputs
    InputShapeMismatch { expected: usize, got: usize },
}

/// Represents the raw(ie **UN**garbled) Boolean circuit
///
/// Gates are stored in topological order; this is checked by `Circuit::new`.
/// Each Gate's output wire id is also used as the Gate's ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    nb_wires: usize,
    inputs: Vec<WireRef>,
    outputs: Vec<WireRef>,
    gates: Vec<Gate>,
    /// Gate indexes(in `gates`) grouped by dependency depth:
    /// every Gate in `layers[i]` only reads circuit inputs or outputs of Gates in `layers[..i]`
    layers: Vec<Vec<usize>>,
}

impl Circuit {
    /// Build a new `Circuit` and check it is well formed.
    ///
    /// # Errors
    ///
    /// See `CircuitError`; in particular the Gates MUST be in topological order.
    pub fn new(
        nb_wires: usize,
        inputs: Vec<WireRef>,
        outputs: Vec<WireRef>,
        gates: Vec<Gate>,
    ) -> Result<Self, CircuitError> {
        let check_range = |wire: &WireRef| -> Result<(), CircuitError> {
            ensure!(
                wire.id < nb_wires,
                WireOutOfRangeSnafu {
                    wire: wire.clone(),
                    nb_wires
                }
            );
            Ok(())
        };

        // depth of each wire once it is written; inputs are at depth 0
        let mut depths: Vec<Option<usize>> = vec![None; nb_wires];

        for input in &inputs {
            check_range(input)?;
            ensure!(
                depths[input.id].is_none(),
                DuplicatedInputSnafu {
                    wire: input.clone()
                }
            );
            depths[input.id] = Some(0);
        }

        let mut layers: Vec<Vec<usize>> = Vec::new();
        for (idx, gate) in gates.iter().enumerate() {
            let (input_a, input_b) = gate.get_inputs();
            ensure!(
                input_b != Some(input_a),
                SameGateInputsSnafu {
                    gate_id: gate.get_id(),
                    wire: input_a.clone()
                }
            );

            let mut depth = 0;
            for input in core::iter::once(input_a).chain(input_b) {
                check_range(input)?;
                let input_depth = depths[input.id].ok_or_else(|| CircuitError::NotTopological {
                    gate_id: gate.get_id(),
                    wire: input.clone(),
                })?;
                depth = depth.max(input_depth);
            }

            let output = gate.get_output();
            check_range(output)?;
            ensure!(
                depths[output.id].is_none(),
                WireWrittenTwiceSnafu {
                    wire: output.clone()
                }
            );
            depths[output.id] = Some(depth + 1);

            if layers.len() <= depth {
                layers.resize_with(depth + 1, Vec::new);
            }
            layers[depth].push(idx);
        }

        let mut outputs_set = HashSet::with_capacity(outputs.len());
        for output in &outputs {
            check_range(output)?;
            ensure!(
                outputs_set.insert(output.id),
                DuplicatedOutputSnafu {
                    wire: output.clone()
                }
            );
            ensure!(
                depths[output.id].is_some(),
                OutputNotProducedSnafu {
                    wire: output.clone()
                }
            );
        }

        Ok(Self {
            nb_wires,
            inputs,
            outputs,
            gates,
            layers,
        })
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

    pub fn get_gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Gate indexes grouped by dependency depth; Gates in the same layer are independent
    pub fn get_layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    /// Evaluate (clear text version == UNGARBLED)
    ///
    /// `inputs` are given in the same order as `get_inputs`; the outputs are
    /// returned in the order of `get_outputs`.
    ///
    /// # Errors
    ///
    /// `InputShapeMismatch` if `inputs.len()` is not the number of circuit inputs
    pub fn eval_plain(&self, inputs: &[WireValue]) -> Result<Vec<WireValue>, CircuitError> {
        ensure!(
            inputs.len() == self.inputs.len(),
            InputShapeMismatchSnafu {
                expected: self.inputs.len(),
                got: inputs.len()
            }
        );

        let mut values: Vec<Option<bool>> = vec![None; self.nb_wires];
        for (input_wire, input_value) in self.inputs.iter().zip(inputs) {
            values[input_wire.id] = Some(input_value.value);
        }

        for gate in &self.gates {
            let (input_a, input_b) = gate.get_inputs();
            let read = |wire: &WireRef| {
                values[wire.id].ok_or_else(|| CircuitError::NotTopological {
                    gate_id: gate.get_id(),
                    wire: wire.clone(),
                })
            };
            let a = read(input_a)?;
            let b = input_b.map(read).transpose()?;
            values[gate.get_id()] = gate.eval(a, b);
        }

        self.outputs
            .iter()
            .map(|output| {
                values[output.id]
                    .map(WireValue::from)
                    .ok_or_else(|| CircuitError::OutputNotProduced {
                        wire: output.clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wires(ids: &[usize]) -> Vec<WireRef> {
        ids.iter().map(|id| WireRef { id: *id }).collect()
    }

    /// (a AND b) XOR c
    fn new_and_xor_circuit() -> Circuit {
        Circuit::new(
            5,
            wires(&[0, 1, 2]),
            wires(&[4]),
            vec![
                Gate::new_binary(GateTypeBinary::AND, 0.into(), 1.into(), 3.into()),
                Gate::new_binary(GateTypeBinary::XOR, 3.into(), 2.into(), 4.into()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_eval_plain_and_xor() {
        let circ = new_and_xor_circuit();

        for x in 0u8..8 {
            let a = x & 1 == 1;
            let b = x & 2 == 2;
            let c = x & 4 == 4;
            let outputs = circ
                .eval_plain(&[a.into(), b.into(), c.into()])
                .unwrap();
            assert_eq!(outputs, vec![WireValue::from((a && b) ^ c)]);
        }
    }

    #[test]
    fn test_layers() {
        let circ = Circuit::new(
            6,
            wires(&[0, 1]),
            wires(&[5]),
            vec![
                Gate::new_binary(GateTypeBinary::AND, 0.into(), 1.into(), 2.into()),
                Gate::new_unary(GateTypeUnary::INV, 0.into(), 3.into()),
                Gate::new_binary(GateTypeBinary::OR, 2.into(), 3.into(), 4.into()),
                Gate::new_unary(GateTypeUnary::BUF, 4.into(), 5.into()),
            ],
        )
        .unwrap();

        assert_eq!(circ.get_layers(), &[vec![0, 1], vec![2], vec![3]]);
    }

    #[test]
    fn test_not_topological() {
        let res = Circuit::new(
            4,
            wires(&[0, 1]),
            wires(&[3]),
            vec![
                Gate::new_binary(GateTypeBinary::AND, 0.into(), 2.into(), 3.into()),
                Gate::new_binary(GateTypeBinary::AND, 0.into(), 1.into(), 2.into()),
            ],
        );

        assert_eq!(
            res,
            Err(CircuitError::NotTopological {
                gate_id: 3,
                wire: WireRef { id: 2 }
            })
        );
    }

    #[test]
    fn test_wire_written_twice() {
        let res = Circuit::new(
            3,
            wires(&[0, 1]),
            wires(&[1]),
            vec![Gate::new_binary(
                GateTypeBinary::AND,
                0.into(),
                1.into(),
                1.into(),
            )],
        );

        assert_eq!(
            res,
            Err(CircuitError::WireWrittenTwice {
                wire: WireRef { id: 1 }
            })
        );
    }

    #[test]
    fn test_same_gate_inputs() {
        let res = Circuit::new(
            2,
            wires(&[0]),
            wires(&[1]),
            vec![Gate::new_binary(
                GateTypeBinary::XOR,
                0.into(),
                0.into(),
                1.into(),
            )],
        );

        assert_eq!(
            res,
            Err(CircuitError::SameGateInputs {
                gate_id: 1,
                wire: WireRef { id: 0 }
            })
        );
    }

    #[test]
    fn test_out_of_range_and_duplicates() {
        assert_eq!(
            Circuit::new(2, wires(&[0, 2]), wires(&[0]), vec![]),
            Err(CircuitError::WireOutOfRange {
                wire: WireRef { id: 2 },
                nb_wires: 2
            })
        );
        assert_eq!(
            Circuit::new(2, wires(&[0, 0]), wires(&[0]), vec![]),
            Err(CircuitError::DuplicatedInput {
                wire: WireRef { id: 0 }
            })
        );
        assert_eq!(
            Circuit::new(2, wires(&[0, 1]), wires(&[0, 0]), vec![]),
            Err(CircuitError::DuplicatedOutput {
                wire: WireRef { id: 0 }
            })
        );
        assert_eq!(
            Circuit::new(3, wires(&[0, 1]), wires(&[2]), vec![]),
            Err(CircuitError::OutputNotProduced {
                wire: WireRef { id: 2 }
            })
        );
    }

    #[test]
    fn test_eval_plain_wrong_nb_inputs() {
        let circ = new_and_xor_circuit();

        assert_eq!(
            circ.eval_plain(&[true.into()]),
            Err(CircuitError::InputShapeMismatch {
                expected: 3,
                got: 1
            })
        );
    }
}
