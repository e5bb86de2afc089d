use alloc::vec::Vec;

use crate::block::Block;
use crate::circuit::Circuit;
use crate::config::GarbleConfig;
use crate::encoding::AllInputWireValues;
use crate::garble::GarbledCircuit;
use crate::translation_table::TranslationTable;
use crate::wire_value::WireValue;
use crate::{evaluate_circuit, garble_circuit};

/// Everything the garbler holds after garbling ONE circuit
pub struct Garbled {
    pub garbled: GarbledCircuit,
    pub translation_table: TranslationTable,
    pub all_input_wire_values: AllInputWireValues,
}

#[allow(clippy::unwrap_used, clippy::must_use_candidate)]
pub fn garble_helper(circuit: &Circuit, config: &GarbleConfig) -> Garbled {
    let mut all_input_wire_values = AllInputWireValues::new();
    let (garbled, translation_table) =
        garble_circuit(circuit, config, &mut all_input_wire_values).unwrap();

    Garbled {
        garbled,
        translation_table,
        all_input_wire_values,
    }
}

/// Client use-case, or as close as possible: encode all the inputs, evaluate, decode
#[allow(clippy::unwrap_used, clippy::must_use_candidate)]
pub fn eval_helper(garbled: &Garbled, inputs: &[bool]) -> Vec<bool> {
    let values: Vec<WireValue> = inputs.iter().map(|input| WireValue::from(*input)).collect();
    let encoded = garbled
        .all_input_wire_values
        .encode(garbled.garbled.get_inputs(), &values)
        .unwrap();

    evaluate_circuit(&garbled.garbled, &encoded, &garbled.translation_table)
        .unwrap()
        .into_iter()
        .map(bool::from)
        .collect()
}

/// Clear text version of `eval_helper`
#[allow(clippy::unwrap_used, clippy::must_use_candidate)]
pub fn eval_plain_helper(circuit: &Circuit, inputs: &[bool]) -> Vec<bool> {
    let values: Vec<WireValue> = inputs.iter().map(|input| WireValue::from(*input)).collect();

    circuit
        .eval_plain(&values)
        .unwrap()
        .into_iter()
        .map(bool::from)
        .collect()
}

/// Simulate a malicious garbler: flip one bit of one row
pub fn tamper_row(garbled: &mut GarbledCircuit, gate_idx: usize, row: usize) {
    let mut mask = [0u8; 16];
    mask[0] = 0x80;
    garbled.get_gates_mut()[gate_idx].rows[row] ^= Block::new_with(mask);
}
