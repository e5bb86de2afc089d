//! Garbling: from a plaintext `Circuit` to a `GarbledCircuit` + `TranslationTable`.
//!
//! The sequence is:
//! (1) `WireValues::assign`: (label0, label1, signal bit) for EVERY wire, once
//! (2) one `GateGarbler::garble_gate` per Gate, reading (1) only
//! (3) the `TranslationTable` from the signal bits of the outputs
//!
//! Because (1) is done upfront and is read-only afterwards, every Gate can be garbled
//! independently of the others, cf `garble_parallel`.

mod garbled_circuit;
mod minimize_set_key;
mod standard;

use alloc::vec::Vec;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

#[cfg(feature = "std")]
use rayon::prelude::*;

use crate::block::Block;
use crate::circuit::{Circuit, Gate, GateType, WireRef};
use crate::encoding::AllInputWireValues;
use crate::encryption::{BlockCipher, EncryptionError};
use crate::translation_table::TranslationTable;
use crate::wire::Wire;
use crate::wire_values::WireValues;

pub(crate) use garbled_circuit::row_index;
pub use garbled_circuit::{GarbledCircuit, GarbledGate, GarbledGateInputs};
pub use minimize_set_key::MinimizeSetKeyGateGarbler;
pub use standard::StandardGateGarbler;

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum GarblerError {
    /// The key generation (or the signal bit draw) failed while assigning `wire`
    KeyGenerationFailure {
        wire: WireRef,
        source: EncryptionError,
    },
    /// Encrypting one of the rows of Gate `gate_id` failed
    EncryptionFailure {
        gate_id: usize,
        source: EncryptionError,
    },
    /// - `garble`: the externally supplied `AllInputWireValues` was not empty
    /// - `encode`: not the same number of wires and values
    InputShapeMismatch { expected: usize, got: usize },
    /// `encode`: the wire is not one of the circuit's inputs
    NotAnInputWire { wire: WireRef },
    /// error during `garble_gate`: the wire is NOT present in the `WireValues`
    GarbleMissingWire { wire: WireRef },
    /// No `rng_seed` in the `GarbleConfig`, and no entropy source(ie `no_std`)
    MissingRngSeed,
}

/// Which `GateGarbler` to use; both produce byte-identical garbled tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GarblingStrategy {
    /// One key schedule per (row, key): 8 per Binary Gate
    Standard,
    /// One key schedule per distinct key: 4 per Binary Gate
    #[default]
    MinimizeSetKey,
}

/// Garble ONE Gate given the full `WireValues`
///
/// Implementations own their cipher state; use one instance per worker.
pub trait GateGarbler {
    type Cipher: BlockCipher;

    /// # Errors
    ///
    /// - `GarbleMissingWire` if one of the Gate's wires is not in `wire_values`
    /// - `EncryptionFailure` if the encryption capability fails
    fn garble_gate(
        &mut self,
        gate: &Gate,
        wire_values: &WireValues,
    ) -> Result<GarbledGate, GarblerError>;

    /// Number of key schedules run so far by this garbler
    fn key_schedule_count(&self) -> u64;
}

/// One row of a Gate's truth table, before encryption
pub(crate) struct PlainRow {
    /// PERMUTED index of the row
    pub(crate) row: usize,
    /// semantic input a
    pub(crate) a: bool,
    /// semantic input b; None for Unary Gates
    pub(crate) b: Option<bool>,
    /// the label to hide: `label(output, truth_table(a, b))`
    pub(crate) output_label: Block,
}

/// The wires of a Gate resolved against the `WireValues`, and its plaintext rows.
pub(crate) struct GateToGarble<'a> {
    pub(crate) gate_id: usize,
    pub(crate) wire_a: &'a Wire,
    pub(crate) wire_b: Option<&'a Wire>,
    pub(crate) rows: Vec<PlainRow>,
}

impl<'a> GateToGarble<'a> {
    pub(crate) fn new(gate: &Gate, wire_values: &'a WireValues) -> Result<Self, GarblerError> {
        let (input_a, input_b) = gate.get_inputs();
        let wire_a = get_wire(wire_values, input_a)?;
        let wire_b = input_b
            .map(|input_b| get_wire(wire_values, input_b))
            .transpose()?;
        let wire_output = get_wire(wire_values, gate.get_output())?;

        let rows = match gate.get_type() {
            GateType::Binary { truth_table, .. } => {
                let wire_b = wire_b.ok_or_else(|| GarblerError::GarbleMissingWire {
                    wire: gate.get_output().clone(),
                })?;
                let mut rows = Vec::with_capacity(4);
                for a in [false, true] {
                    for b in [false, true] {
                        let c = truth_table.eval_binary(a, b);
                        rows.push(PlainRow {
                            row: row_index(
                                wire_a.label(a.into()).point_bit(),
                                Some(wire_b.label(b.into()).point_bit()),
                            ),
                            a,
                            b: Some(b),
                            output_label: *wire_output.label(c.into()).get_block(),
                        });
                    }
                }
                rows
            }
            GateType::Unary { truth_table, .. } => [false, true]
                .into_iter()
                .map(|a| PlainRow {
                    row: row_index(wire_a.label(a.into()).point_bit(), None),
                    a,
                    b: None,
                    output_label: *wire_output.label(truth_table.eval_unary(a).into()).get_block(),
                })
                .collect(),
        };

        Ok(Self {
            gate_id: gate.get_id(),
            wire_a,
            wire_b,
            rows,
        })
    }

    /// The (semantic) labels of the inputs selecting `row`
    pub(crate) fn keys(&self, row: &PlainRow) -> ([Block; 2], usize) {
        let key_a = *self.wire_a.label(row.a.into()).get_block();
        match (self.wire_b, row.b) {
            (Some(wire_b), Some(b)) => ([key_a, *wire_b.label(b.into()).get_block()], 2),
            _ => ([key_a, Block::ZERO], 1),
        }
    }

    pub(crate) fn into_garbled_gate(self, gate: &Gate, table: Vec<Block>) -> GarbledGate {
        GarbledGate::new(
            gate.get_type().into(),
            gate.get_output().clone(),
            table,
        )
    }
}

fn get_wire<'a>(wire_values: &'a WireValues, wire: &WireRef) -> Result<&'a Wire, GarblerError> {
    wire_values
        .get(wire)
        .ok_or_else(|| GarblerError::GarbleMissingWire { wire: wire.clone() })
}

/// The externally supplied input map MUST be empty: it is only written once garbling succeeded
fn check_all_input_wire_values(
    all_input_wire_values: &AllInputWireValues,
) -> Result<(), GarblerError> {
    ensure!(
        all_input_wire_values.is_empty(),
        InputShapeMismatchSnafu {
            expected: 0usize,
            got: all_input_wire_values.len()
        }
    );
    Ok(())
}

/// Assemble the results once EVERY Gate was garbled; nothing is exposed before that
fn finalize(
    circuit: &Circuit,
    wire_values: &WireValues,
    garbled_gates: Vec<GarbledGate>,
    all_input_wire_values: &mut AllInputWireValues,
) -> Result<(GarbledCircuit, TranslationTable), GarblerError> {
    let translation_table = TranslationTable::new(circuit, wire_values)?;
    *all_input_wire_values = wire_values.input_wire_values(circuit)?;

    log::debug!(
        "garble: done: {} gates, {} inputs, {} outputs",
        garbled_gates.len(),
        circuit.get_nb_inputs(),
        circuit.get_nb_outputs()
    );

    Ok((
        GarbledCircuit::new(circuit, garbled_gates),
        translation_table,
    ))
}

/// Garble `circuit` sequentially, Gate by Gate in topological order.
///
/// `all_input_wire_values` MUST be empty; it is filled with the (label0, label1) pairs
/// of the circuit's inputs, and is the ONLY way the garbler keeps them.
/// It is left untouched on error.
///
/// # Errors
///
/// - `InputShapeMismatch` if `all_input_wire_values` is not empty
/// - `KeyGenerationFailure`/`EncryptionFailure` from the encryption capability
pub fn garble<G: GateGarbler, R: RngCore + CryptoRng>(
    circuit: &Circuit,
    gate_garbler: &mut G,
    all_input_wire_values: &mut AllInputWireValues,
    rng: &mut R,
) -> Result<(GarbledCircuit, TranslationTable), GarblerError> {
    check_all_input_wire_values(all_input_wire_values)?;
    log::debug!(
        "garble: start: {} wires, {} gates",
        circuit.get_nb_wires(),
        circuit.get_gates().len()
    );

    let wire_values = WireValues::assign::<G::Cipher, R>(circuit.get_nb_wires(), rng)?;

    let garbled_gates = circuit
        .get_gates()
        .iter()
        .map(|gate| gate_garbler.garble_gate(gate, &wire_values))
        .collect::<Result<Vec<_>, _>>()?;

    finalize(circuit, &wire_values, garbled_gates, all_input_wire_values)
}

/// Same as `garble`, but the Gates are garbled concurrently.
///
/// Each rayon worker gets its own `G` (and so its own cipher state) through `map_init`;
/// the `WireValues` are shared read-only.
/// The result is identical to `garble` with the same `rng`.
///
/// # Errors
///
/// Same as `garble`
#[cfg(feature = "std")]
pub fn garble_parallel<G, R>(
    circuit: &Circuit,
    all_input_wire_values: &mut AllInputWireValues,
    rng: &mut R,
) -> Result<(GarbledCircuit, TranslationTable), GarblerError>
where
    G: GateGarbler + Default + Send,
    R: RngCore + CryptoRng,
{
    check_all_input_wire_values(all_input_wire_values)?;
    log::debug!(
        "garble_parallel: start: {} wires, {} gates",
        circuit.get_nb_wires(),
        circuit.get_gates().len()
    );

    let wire_values = WireValues::assign::<G::Cipher, R>(circuit.get_nb_wires(), rng)?;

    let garbled_gates = circuit
        .get_gates()
        .par_iter()
        .map_init(G::default, |gate_garbler, gate| {
            gate_garbler.garble_gate(gate, &wire_values)
        })
        .collect::<Result<Vec<_>, _>>()?;

    finalize(circuit, &wire_values, garbled_gates, all_input_wire_values)
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    use super::*;
    use crate::circuit::{GateTypeBinary, GateTypeUnary};
    use crate::encryption::Aes128Cipher;

    /// A randomness source which is always out of entropy
    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::from(
                core::num::NonZeroU32::new(rand::Error::CUSTOM_START).unwrap(),
            ))
        }
    }

    impl CryptoRng for FailingRng {}

    fn new_test_circuit() -> Circuit {
        Circuit::new(
            5,
            vec![0.into(), 1.into()],
            vec![3.into(), 4.into()],
            vec![
                Gate::new_binary(GateTypeBinary::AND, 0.into(), 1.into(), 2.into()),
                Gate::new_unary(GateTypeUnary::INV, 2.into(), 3.into()),
                Gate::new_binary(GateTypeBinary::XOR, 0.into(), 2.into(), 4.into()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_gate_to_garble_rows_are_a_permutation() {
        let circ = new_test_circuit();
        let mut rng = ChaChaRng::seed_from_u64(11);
        let wire_values = WireValues::assign::<Aes128Cipher, _>(5, &mut rng).unwrap();

        for gate in circ.get_gates() {
            let to_garble = GateToGarble::new(gate, &wire_values).unwrap();
            let mut seen: Vec<usize> = to_garble.rows.iter().map(|row| row.row).collect();
            seen.sort_unstable();
            let expected: Vec<usize> = (0..to_garble.rows.len()).collect();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn test_garble_fills_input_map() {
        let circ = new_test_circuit();
        let mut all_input_wire_values = AllInputWireValues::new();
        let mut gate_garbler = MinimizeSetKeyGateGarbler::new(Aes128Cipher::new());

        let (garbled, translation_table) = garble(
            &circ,
            &mut gate_garbler,
            &mut all_input_wire_values,
            &mut ChaChaRng::seed_from_u64(12),
        )
        .unwrap();

        assert_eq!(all_input_wire_values.len(), 2);
        assert_eq!(garbled.get_gates().len(), 3);
        assert_eq!(translation_table.len(), 2);
        assert!(garbled.get_gates().iter().all(GarbledGate::is_well_formed));
    }

    #[test]
    fn test_garble_rejects_non_empty_input_map() {
        let circ = new_test_circuit();
        let mut all_input_wire_values = AllInputWireValues::new();
        let mut gate_garbler = StandardGateGarbler::new(Aes128Cipher::new());
        garble(
            &circ,
            &mut gate_garbler,
            &mut all_input_wire_values,
            &mut ChaChaRng::seed_from_u64(13),
        )
        .unwrap();
        let before = all_input_wire_values.clone();

        let res = garble(
            &circ,
            &mut gate_garbler,
            &mut all_input_wire_values,
            &mut ChaChaRng::seed_from_u64(14),
        );

        assert_eq!(
            res.err(),
            Some(GarblerError::InputShapeMismatch {
                expected: 0,
                got: 2
            })
        );
        assert_eq!(all_input_wire_values, before);
    }

    #[test]
    fn test_garble_key_generation_failure() {
        let circ = new_test_circuit();
        let mut all_input_wire_values = AllInputWireValues::new();

        let res = garble(
            &circ,
            &mut StandardGateGarbler::new(Aes128Cipher::new()),
            &mut all_input_wire_values,
            &mut FailingRng,
        );

        assert_eq!(
            res.err(),
            Some(GarblerError::KeyGenerationFailure {
                wire: 0.into(),
                source: EncryptionError::KeyGeneration
            })
        );
        assert!(all_input_wire_values.is_empty());

        #[cfg(feature = "std")]
        {
            let res = garble_parallel::<MinimizeSetKeyGateGarbler<Aes128Cipher>, _>(
                &circ,
                &mut all_input_wire_values,
                &mut FailingRng,
            );
            assert!(matches!(
                res,
                Err(GarblerError::KeyGenerationFailure { wire, .. }) if wire == 0.into()
            ));
            assert!(all_input_wire_values.is_empty());
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_garble_parallel_same_as_sequential() {
        let circ = new_test_circuit();

        let mut inputs_seq = AllInputWireValues::new();
        let sequential = garble(
            &circ,
            &mut MinimizeSetKeyGateGarbler::new(Aes128Cipher::new()),
            &mut inputs_seq,
            &mut ChaChaRng::seed_from_u64(15),
        )
        .unwrap();

        let mut inputs_par = AllInputWireValues::new();
        let parallel = garble_parallel::<MinimizeSetKeyGateGarbler<Aes128Cipher>, _>(
            &circ,
            &mut inputs_par,
            &mut ChaChaRng::seed_from_u64(15),
        )
        .unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(inputs_seq, inputs_par);
    }
}
