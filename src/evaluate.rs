//! Evaluation: walk a `GarbledCircuit` with ONE label per input wire.
//!
//! For each Gate, the point bits of the visible input labels select the row; decrypting
//! it under those labels gives the ONE visible label of the output wire.
//! The evaluator never learns which semantic value any of its labels encodes.

use alloc::vec;
use alloc::vec::Vec;
use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

#[cfg(feature = "std")]
use rayon::prelude::*;

use crate::circuit::WireRef;
use crate::encoding::EncodedInputs;
use crate::encryption::{tweak, BlockCipher, EncryptionError, MultiKeyEncryption};
use crate::garble::{row_index, GarbledCircuit, GarbledGate};
use crate::wire::WireLabel;

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum EvaluatorError {
    /// Not exactly one label per circuit input
    InputShapeMismatch { expected: usize, got: usize },
    /// No label given for this circuit input
    MissingInput { wire: WireRef },
    /// Wrong row count: the garbled circuit is corrupted
    MalformedGarbledGate {
        gate_id: usize,
        expected_rows: usize,
        got_rows: usize,
    },
    /// A Gate reads a wire which has no label yet(or an output is never written)
    MissingWire { wire: WireRef },
    WireOutOfRange { wire: WireRef, nb_wires: usize },
    /// Two Gates write the same wire, or a Gate overwrites a circuit input
    WireWrittenTwice { wire: WireRef },
    EncryptionFailure {
        gate_id: usize,
        source: EncryptionError,
    },
    /// `TranslationTable::decode` on a wire which is not part of the table
    UnknownOutputWire { wire: WireRef },
}

/// Noted `Y`: one label per circuit output, in the order of `GarbledCircuit::get_outputs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLabels {
    y: Vec<(WireRef, WireLabel)>,
}

impl OutputLabels {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn get(&self, wire: &WireRef) -> Option<&WireLabel> {
        self.y
            .iter()
            .find(|(output, _)| output == wire)
            .map(|(_, label)| label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WireRef, &WireLabel)> + '_ {
        self.y.iter().map(|(wire, label)| (wire, label))
    }
}

/// The "active" label of each wire, indexed by `WireRef.id`
type ActiveLabels = Vec<Option<WireLabel>>;

fn check_range(wire: &WireRef, nb_wires: usize) -> Result<(), EvaluatorError> {
    ensure!(
        wire.id < nb_wires,
        WireOutOfRangeSnafu {
            wire: wire.clone(),
            nb_wires
        }
    );
    Ok(())
}

/// Every wire is written at most ONCE: either as a circuit input, or by a single Gate.
///
/// The garbled circuit comes from the garbler; without this a rewritten wire would make
/// the result depend on the evaluation order.
fn check_wiring(garbled: &GarbledCircuit) -> Result<(), EvaluatorError> {
    let nb_wires = garbled.get_nb_wires();
    let mut written: BitVec = BitVec::repeat(false, nb_wires);

    let gate_outputs = garbled.get_gates().iter().map(GarbledGate::get_output);
    for wire in garbled.get_inputs().iter().chain(gate_outputs) {
        check_range(wire, nb_wires)?;
        ensure!(
            !written[wire.id],
            WireWrittenTwiceSnafu { wire: wire.clone() }
        );
        written.set(wire.id, true);
    }

    Ok(())
}

/// Place the encoded inputs; checks there is exactly one label per circuit input
fn init_active_labels(
    garbled: &GarbledCircuit,
    encoded_inputs: &EncodedInputs,
) -> Result<ActiveLabels, EvaluatorError> {
    ensure!(
        encoded_inputs.len() == garbled.get_nb_inputs(),
        InputShapeMismatchSnafu {
            expected: garbled.get_nb_inputs(),
            got: encoded_inputs.len()
        }
    );

    let mut active_labels: ActiveLabels = vec![None; garbled.get_nb_wires()];
    for input in garbled.get_inputs() {
        check_range(input, garbled.get_nb_wires())?;
        let label = encoded_inputs
            .get(input)
            .ok_or_else(|| EvaluatorError::MissingInput {
                wire: input.clone(),
            })?;
        active_labels[input.id] = Some(*label);
    }

    Ok(active_labels)
}

fn read_label(active_labels: &[Option<WireLabel>], wire: &WireRef) -> Result<WireLabel, EvaluatorError> {
    check_range(wire, active_labels.len())?;
    active_labels[wire.id].ok_or_else(|| EvaluatorError::MissingWire { wire: wire.clone() })
}

/// Decrypt the ONE row selected by the point bits of the input labels
fn evaluate_gate<C: BlockCipher>(
    gate: &GarbledGate,
    active_labels: &[Option<WireLabel>],
    decryption: &mut MultiKeyEncryption<C>,
) -> Result<WireLabel, EvaluatorError> {
    let gate_id = gate.get_id();
    ensure!(
        gate.is_well_formed(),
        MalformedGarbledGateSnafu {
            gate_id,
            expected_rows: gate.get_inputs().expected_nb_rows(),
            got_rows: gate.get_rows().len()
        }
    );
    check_range(gate.get_output(), active_labels.len())?;

    let label_a = read_label(active_labels, gate.get_inputs().input_a())?;
    let label_b = gate
        .get_inputs()
        .input_b()
        .map(|input_b| read_label(active_labels, input_b))
        .transpose()?;

    let row = row_index(label_a.point_bit(), label_b.map(|label| label.point_bit()));
    match label_b {
        Some(label_b) => decryption.set_keys(&[*label_a.get_block(), *label_b.get_block()]),
        None => decryption.set_keys(&[*label_a.get_block()]),
    }
    decryption.set_tweak(tweak(gate_id, row));

    let output = decryption
        .decrypt(&gate.get_rows()[row])
        .map_err(|source| EvaluatorError::EncryptionFailure { gate_id, source })?;

    Ok(WireLabel::new(output))
}

fn collect_outputs(
    garbled: &GarbledCircuit,
    active_labels: &[Option<WireLabel>],
) -> Result<OutputLabels, EvaluatorError> {
    let y = garbled
        .get_outputs()
        .iter()
        .map(|output| read_label(active_labels, output).map(|label| (output.clone(), label)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OutputLabels { y })
}

/// Evaluate `garbled` sequentially, Gate by Gate.
///
/// # Errors
///
/// - `InputShapeMismatch`/`MissingInput` if `encoded_inputs` does not match the circuit's inputs
/// - `MalformedGarbledGate`/`MissingWire`/`WireOutOfRange`/`WireWrittenTwice` if the garbled
///   circuit is corrupted
/// - `EncryptionFailure` from the encryption capability
pub fn evaluate<C: BlockCipher>(
    garbled: &GarbledCircuit,
    encoded_inputs: &EncodedInputs,
    cipher: C,
) -> Result<OutputLabels, EvaluatorError> {
    log::debug!(
        "evaluate: start: {} wires, {} gates",
        garbled.get_nb_wires(),
        garbled.get_gates().len()
    );

    check_wiring(garbled)?;
    let mut active_labels = init_active_labels(garbled, encoded_inputs)?;
    let mut decryption = MultiKeyEncryption::new(cipher);

    for gate in garbled.get_gates() {
        let label = evaluate_gate(gate, &active_labels, &mut decryption)?;
        active_labels[gate.get_output().id] = Some(label);
    }

    let output_labels = collect_outputs(garbled, &active_labels)?;
    log::debug!("evaluate: done: {} outputs", output_labels.len());

    Ok(output_labels)
}

/// Group the Gates(by index) by dependency depth, from the garbled wiring alone
///
/// `check_wiring` MUST have passed: each wire has a single writer.
#[cfg(feature = "std")]
fn compute_layers(garbled: &GarbledCircuit) -> Result<Vec<Vec<usize>>, EvaluatorError> {
    let nb_wires = garbled.get_nb_wires();
    let mut depths: Vec<Option<usize>> = vec![None; nb_wires];
    for input in garbled.get_inputs() {
        check_range(input, nb_wires)?;
        depths[input.id] = Some(0);
    }

    let mut layers: Vec<Vec<usize>> = Vec::new();
    for (idx, gate) in garbled.get_gates().iter().enumerate() {
        let inputs = gate.get_inputs();
        let mut depth = 0;
        for input in core::iter::once(inputs.input_a()).chain(inputs.input_b()) {
            check_range(input, nb_wires)?;
            let input_depth = depths[input.id]
                .ok_or_else(|| EvaluatorError::MissingWire { wire: input.clone() })?;
            depth = depth.max(input_depth);
        }
        check_range(gate.get_output(), nb_wires)?;
        depths[gate.get_output().id] = Some(depth + 1);

        if layers.len() <= depth {
            layers.resize_with(depth + 1, Vec::new);
        }
        layers[depth].push(idx);
    }

    Ok(layers)
}

/// Same as `evaluate`, but the Gates of each dependency layer are evaluated concurrently.
///
/// Each rayon worker has its own cipher(`C::default()`); labels are only written
/// once a whole layer is done.
///
/// # Errors
///
/// Same as `evaluate`
#[cfg(feature = "std")]
pub fn evaluate_parallel<C: BlockCipher + Default + Send>(
    garbled: &GarbledCircuit,
    encoded_inputs: &EncodedInputs,
) -> Result<OutputLabels, EvaluatorError> {
    check_wiring(garbled)?;
    let layers = compute_layers(garbled)?;
    log::debug!(
        "evaluate_parallel: start: {} gates in {} layers",
        garbled.get_gates().len(),
        layers.len()
    );

    let mut active_labels = init_active_labels(garbled, encoded_inputs)?;
    let gates = garbled.get_gates();

    for layer in &layers {
        let layer_labels = layer
            .par_iter()
            .map_init(
                || MultiKeyEncryption::new(C::default()),
                |decryption, idx| {
                    let gate = &gates[*idx];
                    evaluate_gate(gate, &active_labels, decryption)
                        .map(|label| (gate.get_output().id, label))
                },
            )
            .collect::<Result<Vec<_>, _>>()?;

        for (wire_id, label) in layer_labels {
            active_labels[wire_id] = Some(label);
        }
    }

    collect_outputs(garbled, &active_labels)
}
