use alloc::vec::Vec;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, WireRef};
use crate::evaluate::{EvaluatorError, OutputLabels};
use crate::garble::GarblerError;
use crate::wire::WireLabel;
use crate::wire_value::WireValue;
use crate::wire_values::WireValues;

/// Output wire -> its signal bit
///
/// Owned by the garbler; it can be given in full to the evaluator to decode every output,
/// or only partially cf `restrict`.
/// It says nothing about the labels of the other(non-observed) value of a wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslationTable {
    signal_bits: HashMap<WireRef, bool>,
}

impl TranslationTable {
    pub(crate) fn new(circuit: &Circuit, wire_values: &WireValues) -> Result<Self, GarblerError> {
        let signal_bits = circuit
            .get_outputs()
            .iter()
            .map(|output| {
                wire_values
                    .signal_bit(output)
                    .map(|signal_bit| (output.clone(), signal_bit))
                    .ok_or_else(|| GarblerError::GarbleMissingWire {
                        wire: output.clone(),
                    })
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self { signal_bits })
    }

    pub fn len(&self) -> usize {
        self.signal_bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal_bits.is_empty()
    }

    pub fn signal_bit(&self, wire: &WireRef) -> Option<bool> {
        self.signal_bits.get(wire).copied()
    }

    /// `decode(wire, label) = point_bit(label) XOR signal_bit(wire)`
    ///
    /// # Errors
    ///
    /// `UnknownOutputWire` if `wire` is not part of this table
    pub fn decode(&self, wire: &WireRef, label: &WireLabel) -> Result<WireValue, EvaluatorError> {
        let signal_bit = self
            .signal_bit(wire)
            .ok_or_else(|| EvaluatorError::UnknownOutputWire { wire: wire.clone() })?;

        Ok((label.point_bit() ^ signal_bit).into())
    }

    /// Decode every output label, in the order of `output_labels`
    ///
    /// # Errors
    ///
    /// `UnknownOutputWire` if one of the outputs is not part of this table
    pub fn decode_outputs(
        &self,
        output_labels: &OutputLabels,
    ) -> Result<Vec<WireValue>, EvaluatorError> {
        output_labels
            .iter()
            .map(|(wire, label)| self.decode(wire, label))
            .collect()
    }

    /// Partial disclosure: only keep the entries for `wires`
    ///
    /// The wires which are not part of the table are ignored.
    #[must_use]
    pub fn restrict(&self, wires: &[WireRef]) -> Self {
        Self {
            signal_bits: wires
                .iter()
                .filter_map(|wire| {
                    self.signal_bits
                        .get(wire)
                        .map(|signal_bit| (wire.clone(), *signal_bit))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    use super::*;
    use crate::circuit::{Gate, GateTypeBinary};
    use crate::encryption::Aes128Cipher;

    fn new_circuit_and_wire_values() -> (Circuit, WireValues) {
        let circ = Circuit::new(
            4,
            vec![0.into(), 1.into()],
            vec![2.into(), 3.into()],
            vec![
                Gate::new_binary(GateTypeBinary::AND, 0.into(), 1.into(), 2.into()),
                Gate::new_binary(GateTypeBinary::XOR, 0.into(), 1.into(), 3.into()),
            ],
        )
        .unwrap();
        let wire_values =
            WireValues::assign::<Aes128Cipher, _>(4, &mut ChaChaRng::seed_from_u64(41)).unwrap();

        (circ, wire_values)
    }

    #[test]
    fn test_only_outputs() {
        let (circ, wire_values) = new_circuit_and_wire_values();
        let translation_table = TranslationTable::new(&circ, &wire_values).unwrap();

        assert_eq!(translation_table.len(), 2);
        assert_eq!(
            translation_table.signal_bit(&2.into()),
            wire_values.signal_bit(&2.into())
        );
        assert_eq!(translation_table.signal_bit(&0.into()), None);
    }

    #[test]
    fn test_decode_both_labels() {
        let (circ, wire_values) = new_circuit_and_wire_values();
        let translation_table = TranslationTable::new(&circ, &wire_values).unwrap();

        for output in circ.get_outputs() {
            let wire = wire_values.get(output).unwrap();
            assert_eq!(
                translation_table.decode(output, wire.label(false.into())),
                Ok(false.into())
            );
            assert_eq!(
                translation_table.decode(output, wire.label(true.into())),
                Ok(true.into())
            );
        }
    }

    #[test]
    fn test_restrict() {
        let (circ, wire_values) = new_circuit_and_wire_values();
        let translation_table = TranslationTable::new(&circ, &wire_values).unwrap();

        let restricted = translation_table.restrict(&[3.into(), 0.into()]);

        assert_eq!(restricted.len(), 1);
        let label = wire_values.get(&2.into()).unwrap().label(true.into());
        assert_eq!(
            restricted.decode(&2.into(), label),
            Err(EvaluatorError::UnknownOutputWire { wire: 2.into() })
        );
    }
}
