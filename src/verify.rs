//! Cut-and-choose support: audit a garbled circuit "opened" by the garbler.
//!
//! Two ways to open a circuit:
//! - `verify`: the garbler discloses the FULL wire assignment (eg re-derived from the
//!   rng seed); every Gate is re-garbled with `StandardGateGarbler` and compared row by row
//! - `verify_from_input_wire_values`: the garbler only discloses `AllInputWireValues`;
//!   the labels of every other wire are rebuilt by decrypting the candidate's rows
//!   under both labels of their inputs, in topological order
//!
//! Neither uses the key schedule optimization: verification is infrequent, only
//! garbling gets it.

use alloc::vec;
use alloc::vec::Vec;
use snafu::prelude::*;

use crate::block::Block;
use crate::circuit::{Circuit, Gate, GateType, WireRef};
use crate::encoding::AllInputWireValues;
use crate::encryption::{tweak, BlockCipher, EncryptionError, MultiKeyEncryption};
use crate::garble::{
    row_index, GarbledCircuit, GarbledGate, GarbledGateInputs, GarblerError, GateGarbler,
    StandardGateGarbler,
};
use crate::translation_table::TranslationTable;
use crate::wire_values::WireValues;

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum VerificationError {
    /// The disclosed `WireValues`(or `AllInputWireValues`) do not cover exactly the
    /// circuit's wires(or inputs)
    InputShapeMismatch { expected: usize, got: usize },
    /// This circuit input is not part of the disclosed `AllInputWireValues`
    MissingInputWire { wire: WireRef },
    /// A disclosed wire breaks point-and-permute, or its signal bit is inconsistent
    SignalBitInvariant { wire: WireRef },
    /// Wire count, inputs, outputs or number of Gates differ from the plaintext circuit
    CircuitShapeMismatch,
    /// The Gate at this position is not wired like the plaintext one
    WiringMismatch { gate_id: usize },
    MalformedGarbledGate {
        gate_id: usize,
        expected_rows: usize,
        got_rows: usize,
    },
    /// The candidate's row differs from the re-garbled one
    VerificationMismatch { gate_id: usize, row: usize },
    /// The `TranslationTable` does not match the disclosed signal bits of the outputs
    TranslationTableMismatch { wire: WireRef },
    /// Re-garbling failed
    RegarbleFailure { source: GarblerError },
    /// Decrypting a row of Gate `gate_id` failed
    DecryptionFailure {
        gate_id: usize,
        source: EncryptionError,
    },
    /// The wire assignment could not be re-derived from the disclosed seed
    KeyGenerationFailure { source: GarblerError },
}

fn check_wire_values(circuit: &Circuit, wire_values: &WireValues) -> Result<(), VerificationError> {
    ensure!(
        wire_values.len() == circuit.get_nb_wires(),
        InputShapeMismatchSnafu {
            expected: circuit.get_nb_wires(),
            got: wire_values.len()
        }
    );

    for (wire_ref, wire, signal_bit) in wire_values.iter() {
        ensure!(
            wire.satisfies_point_and_permute() && signal_bit == Some(wire.signal_bit()),
            SignalBitInvariantSnafu { wire: wire_ref }
        );
    }

    Ok(())
}

fn check_shape(circuit: &Circuit, candidate: &GarbledCircuit) -> Result<(), VerificationError> {
    ensure!(
        candidate.get_nb_wires() == circuit.get_nb_wires()
            && candidate.get_inputs() == circuit.get_inputs()
            && candidate.get_outputs() == circuit.get_outputs()
            && candidate.get_gates().len() == circuit.get_gates().len(),
        CircuitShapeMismatchSnafu
    );

    for (gate, candidate_gate) in circuit.get_gates().iter().zip(candidate.get_gates()) {
        let gate_id = gate.get_id();
        let expected_inputs: GarbledGateInputs = gate.get_type().into();
        ensure!(
            candidate_gate.get_output() == gate.get_output()
                && candidate_gate.get_inputs() == &expected_inputs,
            WiringMismatchSnafu { gate_id }
        );
        ensure!(
            candidate_gate.is_well_formed(),
            MalformedGarbledGateSnafu {
                gate_id,
                expected_rows: expected_inputs.expected_nb_rows(),
                got_rows: candidate_gate.get_rows().len()
            }
        );
    }

    Ok(())
}

/// `signal_bit` gives the disclosed(or rebuilt) signal bit of an output wire
fn check_translation_table<F>(
    circuit: &Circuit,
    signal_bit: F,
    translation_table: &TranslationTable,
) -> Result<(), VerificationError>
where
    F: Fn(&WireRef) -> Option<bool>,
{
    for output in circuit.get_outputs() {
        ensure!(
            translation_table.signal_bit(output).is_some()
                && translation_table.signal_bit(output) == signal_bit(output),
            TranslationTableMismatchSnafu {
                wire: output.clone()
            }
        );
    }
    // it MUST NOT contain anything but the outputs
    ensure!(
        translation_table.len() == circuit.get_nb_outputs(),
        CircuitShapeMismatchSnafu
    );

    Ok(())
}

/// Verify that `candidate` (and its `translation_table`) is the honest garbling of
/// `circuit` under the disclosed `wire_values`.
///
/// A failure means the candidate MUST be treated as malicious; it is NOT a transient
/// error and retrying with the same inputs gives the same result.
///
/// # Errors
///
/// See `VerificationError`; in particular `VerificationMismatch` on the first differing row
pub fn verify<C: BlockCipher + Default>(
    circuit: &Circuit,
    wire_values: &WireValues,
    candidate: &GarbledCircuit,
    translation_table: &TranslationTable,
) -> Result<(), VerificationError> {
    log::debug!(
        "verify: start: {} wires, {} gates",
        circuit.get_nb_wires(),
        circuit.get_gates().len()
    );

    log_result(verify_internal::<C>(
        circuit,
        wire_values,
        candidate,
        translation_table,
    ))
}

fn log_result(res: Result<(), VerificationError>) -> Result<(), VerificationError> {
    match &res {
        Ok(()) => log::debug!("verify: ok"),
        Err(err) => log::warn!("verify: garbled circuit REJECTED: {:?}", err),
    }

    res
}

fn verify_internal<C: BlockCipher + Default>(
    circuit: &Circuit,
    wire_values: &WireValues,
    candidate: &GarbledCircuit,
    translation_table: &TranslationTable,
) -> Result<(), VerificationError> {
    check_wire_values(circuit, wire_values)?;
    check_shape(circuit, candidate)?;

    let mut gate_garbler = StandardGateGarbler::new(C::default());
    for (gate, candidate_gate) in circuit.get_gates().iter().zip(candidate.get_gates()) {
        let expected = gate_garbler
            .garble_gate(gate, wire_values)
            .map_err(|source| VerificationError::RegarbleFailure { source })?;

        if let Some(row) = expected
            .get_rows()
            .iter()
            .zip(candidate_gate.get_rows())
            .position(|(expected_row, candidate_row)| expected_row != candidate_row)
        {
            return Err(VerificationError::VerificationMismatch {
                gate_id: gate.get_id(),
                row,
            });
        }
    }

    check_translation_table(
        circuit,
        |output| wire_values.signal_bit(output),
        translation_table,
    )
}

/// The labels of one wire as rebuilt by the verifier, indexed by semantic value.
///
/// A label stays `None` when no row the verifier can decrypt outputs that value, eg the
/// `1` of a constant-0 Gate; such a label can never reach the evaluator either.
type RebuiltLabels = [Option<Block>; 2];

fn rebuilt_labels(
    rebuilt: &[RebuiltLabels],
    wire: &WireRef,
) -> Result<RebuiltLabels, VerificationError> {
    rebuilt
        .get(wire.id)
        .copied()
        .ok_or(VerificationError::CircuitShapeMismatch)
}

fn init_rebuilt_labels(
    circuit: &Circuit,
    all_input_wire_values: &AllInputWireValues,
) -> Result<Vec<RebuiltLabels>, VerificationError> {
    ensure!(
        all_input_wire_values.len() == circuit.get_nb_inputs(),
        InputShapeMismatchSnafu {
            expected: circuit.get_nb_inputs(),
            got: all_input_wire_values.len()
        }
    );

    let mut rebuilt: Vec<RebuiltLabels> = vec![[None, None]; circuit.get_nb_wires()];
    for input in circuit.get_inputs() {
        let wire = all_input_wire_values
            .get(input)
            .ok_or_else(|| VerificationError::MissingInputWire {
                wire: input.clone(),
            })?;
        ensure!(
            wire.satisfies_point_and_permute(),
            SignalBitInvariantSnafu {
                wire: input.clone()
            }
        );
        let labels = rebuilt
            .get_mut(input.id)
            .ok_or(VerificationError::CircuitShapeMismatch)?;
        *labels = [Some(*wire.value0()), Some(*wire.value1())];
    }

    Ok(rebuilt)
}

/// Decrypt every row of `candidate_gate` reachable from the rebuilt input labels.
///
/// All the rows whose truth table gives the same output value MUST decrypt to the same
/// label, and the two output labels MUST satisfy point-and-permute.
fn rebuild_gate<C: BlockCipher>(
    gate: &Gate,
    candidate_gate: &GarbledGate,
    rebuilt: &[RebuiltLabels],
    decryption: &mut MultiKeyEncryption<C>,
) -> Result<RebuiltLabels, VerificationError> {
    let gate_id = gate.get_id();
    let (input_a, input_b) = gate.get_inputs();
    let labels_a = rebuilt_labels(rebuilt, input_a)?;
    let labels_b = input_b
        .map(|input_b| rebuilt_labels(rebuilt, input_b))
        .transpose()?;

    // (a, b, truth_table(a, b)) for every semantic row
    let semantic_rows: Vec<(bool, Option<bool>, bool)> = match gate.get_type() {
        GateType::Binary { truth_table, .. } => {
            [(false, false), (false, true), (true, false), (true, true)]
                .into_iter()
                .map(|(a, b)| (a, Some(b), truth_table.eval_binary(a, b)))
                .collect()
        }
        GateType::Unary { truth_table, .. } => [false, true]
            .into_iter()
            .map(|a| (a, None, truth_table.eval_unary(a)))
            .collect(),
    };

    let mut output: RebuiltLabels = [None, None];
    for (a, b, c) in semantic_rows {
        let key_a = match labels_a[usize::from(a)] {
            Some(key_a) => key_a,
            None => continue,
        };
        let key_b = match (labels_b, b) {
            (Some(labels_b), Some(b)) => match labels_b[usize::from(b)] {
                Some(key_b) => Some(key_b),
                None => continue,
            },
            _ => None,
        };

        let row = row_index(key_a.lsb(), key_b.map(|key_b| key_b.lsb()));
        match key_b {
            Some(key_b) => decryption.set_keys(&[key_a, key_b]),
            None => decryption.set_keys(&[key_a]),
        }
        decryption.set_tweak(tweak(gate_id, row));
        let label = decryption
            .decrypt(&candidate_gate.get_rows()[row])
            .map_err(|source| VerificationError::DecryptionFailure { gate_id, source })?;

        match output[usize::from(c)] {
            Some(expected) => {
                ensure!(expected == label, VerificationMismatchSnafu { gate_id, row });
            }
            None => output[usize::from(c)] = Some(label),
        }
    }

    if let [Some(label0), Some(label1)] = output {
        ensure!(
            label0.lsb() != label1.lsb(),
            SignalBitInvariantSnafu {
                wire: gate.get_output().clone()
            }
        );
    }

    Ok(output)
}

/// Verify `candidate` from the disclosed `AllInputWireValues` alone, ie without the
/// labels of the internal wires nor the rng seed.
///
/// Every row the evaluator could ever select is checked; see `RebuiltLabels` for the
/// ones which are not. The signal bits of the outputs are rebuilt the same way and
/// checked against `translation_table`.
///
/// # Errors
///
/// See `VerificationError`; in particular `VerificationMismatch` when two rows which MUST
/// hide the same label do not
pub fn verify_from_input_wire_values<C: BlockCipher + Default>(
    circuit: &Circuit,
    all_input_wire_values: &AllInputWireValues,
    candidate: &GarbledCircuit,
    translation_table: &TranslationTable,
) -> Result<(), VerificationError> {
    log::debug!(
        "verify_from_input_wire_values: start: {} inputs, {} gates",
        circuit.get_nb_inputs(),
        circuit.get_gates().len()
    );

    log_result(verify_from_input_wire_values_internal::<C>(
        circuit,
        all_input_wire_values,
        candidate,
        translation_table,
    ))
}

fn verify_from_input_wire_values_internal<C: BlockCipher + Default>(
    circuit: &Circuit,
    all_input_wire_values: &AllInputWireValues,
    candidate: &GarbledCircuit,
    translation_table: &TranslationTable,
) -> Result<(), VerificationError> {
    check_shape(circuit, candidate)?;
    let mut rebuilt = init_rebuilt_labels(circuit, all_input_wire_values)?;

    // `Circuit::new` guarantees the Gates are in topological order
    let mut decryption = MultiKeyEncryption::new(C::default());
    for (gate, candidate_gate) in circuit.get_gates().iter().zip(candidate.get_gates()) {
        let output = rebuild_gate(gate, candidate_gate, &rebuilt, &mut decryption)?;
        let labels = rebuilt
            .get_mut(gate.get_output().id)
            .ok_or(VerificationError::CircuitShapeMismatch)?;
        *labels = output;
    }

    check_translation_table(
        circuit,
        |output| match rebuilt.get(output.id) {
            Some([Some(label0), _]) => Some(label0.lsb()),
            Some([None, Some(label1)]) => Some(!label1.lsb()),
            _ => None,
        },
        translation_table,
    )
}
