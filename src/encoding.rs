//! Input encoding: turning semantic input bits into the ONE label per input wire
//! the evaluator is allowed to see.
//!
//! Two distinct types on purpose:
//! - `AllInputWireValues`: garbler-side; BOTH labels of every input wire
//! - `EncodedInputs`: evaluator-side; ONE opaque label per input wire
//!
//! `evaluate` only accepts `EncodedInputs`, so handing the garbler's secret to the
//! evaluation code path is a compile error. The only way from one to the other is
//! `AllInputWireValues::encode`, which selects a single label per wire.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::circuit::WireRef;
use crate::garble::GarblerError;
use crate::wire::{Wire, WireLabel};
use crate::wire_value::WireValue;

/// Input wire -> (label0, label1)
///
/// Populated by `garble` into a map supplied by the caller; this is the ONLY channel
/// through which the garbler keeps both-value knowledge of the inputs.
/// NEVER send it to the evaluator of a circuit that will be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllInputWireValues {
    values: HashMap<WireRef, Wire>,
}

impl AllInputWireValues {
    /// An empty map, to be passed to `garble`
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, wire: WireRef, value: Wire) {
        self.values.insert(wire, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, wire: &WireRef) -> Option<&Wire> {
        self.values.get(wire)
    }

    /// Encoding: for each `wires[i]` select the label encoding `values[i]`
    ///
    /// It can be called several times on disjoint subsets of the inputs:
    /// - "server-side": for the garbler's own inputs
    /// - for the evaluator's inputs, this is conceptually what the OT delivers
    ///
    /// and the results combined with `EncodedInputs::merge`.
    ///
    /// # Errors
    ///
    /// - `InputShapeMismatch` if the lengths differ
    /// - `NotAnInputWire` if a wire is not an input wire
    pub fn encode(
        &self,
        wires: &[WireRef],
        values: &[WireValue],
    ) -> Result<EncodedInputs, GarblerError> {
        if wires.len() != values.len() {
            return Err(GarblerError::InputShapeMismatch {
                expected: wires.len(),
                got: values.len(),
            });
        }

        let mut encoded_inputs = EncodedInputs {
            x: HashMap::with_capacity(wires.len()),
        };
        for (wire_ref, value) in wires.iter().zip(values) {
            let wire = self
                .values
                .get(wire_ref)
                .ok_or_else(|| GarblerError::NotAnInputWire {
                    wire: wire_ref.clone(),
                })?;
            encoded_inputs.x.insert(wire_ref.clone(), *wire.label(*value));
        }

        Ok(encoded_inputs)
    }
}

/// Noted `X`: one label per input wire, either `label0` OR `label1`
///
/// This is what the evaluator gets; it says nothing about the semantic values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodedInputs {
    x: HashMap<WireRef, WireLabel>,
}

impl EncodedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn get(&self, wire: &WireRef) -> Option<&WireLabel> {
        self.x.get(wire)
    }

    /// Add a single label, typically one received through oblivious transfer
    pub fn insert(&mut self, wire: WireRef, label: WireLabel) {
        self.x.insert(wire, label);
    }

    /// Combine eg the garbler-encoded inputs with the evaluator's ones
    pub fn merge(&mut self, other: EncodedInputs) {
        self.x.extend(other.x);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    use super::*;
    use crate::circuit::{Circuit, Gate, GateTypeBinary};
    use crate::encryption::Aes128Cipher;
    use crate::wire_values::WireValues;

    fn new_and_circuit_wire_values() -> (Circuit, AllInputWireValues) {
        let circ = Circuit::new(
            3,
            vec![0.into(), 1.into()],
            vec![2.into()],
            vec![Gate::new_binary(
                GateTypeBinary::AND,
                0.into(),
                1.into(),
                2.into(),
            )],
        )
        .unwrap();
        let mut rng = ChaChaRng::seed_from_u64(5);
        let wire_values = WireValues::assign::<Aes128Cipher, _>(3, &mut rng).unwrap();
        let all_input_wire_values = wire_values.input_wire_values(&circ).unwrap();

        (circ, all_input_wire_values)
    }

    #[test]
    fn test_only_inputs_are_kept() {
        let (_circ, all_input_wire_values) = new_and_circuit_wire_values();

        assert_eq!(all_input_wire_values.len(), 2);
        assert!(all_input_wire_values.get(&WireRef { id: 2 }).is_none());
    }

    #[test]
    fn test_encode_selects_one_label() {
        let (circ, all_input_wire_values) = new_and_circuit_wire_values();

        let encoded = all_input_wire_values
            .encode(circ.get_inputs(), &[true.into(), false.into()])
            .unwrap();

        let wire0 = all_input_wire_values.get(&WireRef { id: 0 }).unwrap();
        let wire1 = all_input_wire_values.get(&WireRef { id: 1 }).unwrap();
        assert_eq!(encoded.get(&WireRef { id: 0 }).unwrap().get_block(), wire0.value1());
        assert_eq!(encoded.get(&WireRef { id: 1 }).unwrap().get_block(), wire1.value0());
    }

    #[test]
    fn test_encode_in_two_parts_then_merge() {
        let (circ, all_input_wire_values) = new_and_circuit_wire_values();
        let inputs = circ.get_inputs();

        let mut garbler_part = all_input_wire_values
            .encode(&inputs[..1], &[true.into()])
            .unwrap();
        let evaluator_part = all_input_wire_values
            .encode(&inputs[1..], &[true.into()])
            .unwrap();
        garbler_part.merge(evaluator_part);

        let full = all_input_wire_values
            .encode(inputs, &[true.into(), true.into()])
            .unwrap();
        assert_eq!(garbler_part, full);
    }

    #[test]
    fn test_encode_wrong_shape() {
        let (circ, all_input_wire_values) = new_and_circuit_wire_values();

        assert_eq!(
            all_input_wire_values.encode(circ.get_inputs(), &[true.into()]),
            Err(GarblerError::InputShapeMismatch {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            all_input_wire_values.encode(&[WireRef { id: 2 }], &[true.into()]),
            Err(GarblerError::NotAnInputWire {
                wire: WireRef { id: 2 }
            })
        );
    }
}
