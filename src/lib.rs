#![cfg_attr(not(feature = "std"), no_std)]
#![deny(elided_lifetimes_in_paths)]

extern crate alloc;

mod block;
mod circuit;
mod config;
mod constant;
mod encoding;
mod encryption;
mod evaluate;
mod garble;
mod serialize_deserialize;
mod translation_table;
mod verify;
mod wire;
mod wire_value;
mod wire_values;

#[doc(hidden)]
pub mod tests_utils;

use alloc::vec::Vec;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

// re-export
pub use block::Block;
pub use circuit::{
    Circuit, CircuitError, Gate, GateType, GateTypeBinary, GateTypeUnary, TruthTable, WireRef,
};
pub use config::GarbleConfig;
pub use encoding::{AllInputWireValues, EncodedInputs};
pub use encryption::{Aes128Cipher, BlockCipher, EncryptionError, MultiKeyEncryption};
#[cfg(feature = "std")]
pub use evaluate::evaluate_parallel;
pub use evaluate::{evaluate, EvaluatorError, OutputLabels};
#[cfg(feature = "std")]
pub use garble::garble_parallel;
pub use garble::{
    garble, GarbledCircuit, GarbledGate, GarbledGateInputs, GarblerError, GarblingStrategy,
    GateGarbler, MinimizeSetKeyGateGarbler, StandardGateGarbler,
};
pub use serialize_deserialize::{
    deserialize_for_evaluator, serialize_for_evaluator, SerializationError,
};
pub use translation_table::TranslationTable;
pub use verify::{verify, verify_from_input_wire_values, VerificationError};
pub use wire::{Wire, WireLabel};
pub use wire_value::WireValue;
pub use wire_values::WireValues;

fn new_rng(config: &GarbleConfig) -> Result<ChaChaRng, GarblerError> {
    match config.rng_seed {
        Some(rng_seed) => Ok(ChaChaRng::from_seed(rng_seed)),
        #[cfg(feature = "std")]
        None => Ok(ChaChaRng::from_entropy()),
        #[cfg(not(feature = "std"))]
        None => Err(GarblerError::MissingRngSeed),
    }
}

/// This is the main entry point for the garbler, using AES-128.
///
/// It:
/// - assigns the wire values
/// - garbles every Gate with `config.strategy`(concurrently if `config.parallel`)
/// - fills `all_input_wire_values`, which MUST be empty
///
/// # Errors
///
/// See `garble`; and `MissingRngSeed` without `std` when `config.rng_seed` is `None`
pub fn garble_circuit(
    circuit: &Circuit,
    config: &GarbleConfig,
    all_input_wire_values: &mut AllInputWireValues,
) -> Result<(GarbledCircuit, TranslationTable), GarblerError> {
    let mut rng = new_rng(config)?;

    if config.parallel {
        return garble_with_strategy_parallel(
            circuit,
            config.strategy,
            all_input_wire_values,
            &mut rng,
        );
    }

    garble_with_strategy(circuit, config.strategy, all_input_wire_values, &mut rng)
}

fn garble_with_strategy(
    circuit: &Circuit,
    strategy: GarblingStrategy,
    all_input_wire_values: &mut AllInputWireValues,
    rng: &mut ChaChaRng,
) -> Result<(GarbledCircuit, TranslationTable), GarblerError> {
    match strategy {
        GarblingStrategy::Standard => garble(
            circuit,
            &mut StandardGateGarbler::new(Aes128Cipher::new()),
            all_input_wire_values,
            rng,
        ),
        GarblingStrategy::MinimizeSetKey => garble(
            circuit,
            &mut MinimizeSetKeyGateGarbler::new(Aes128Cipher::new()),
            all_input_wire_values,
            rng,
        ),
    }
}

#[cfg(feature = "std")]
fn garble_with_strategy_parallel(
    circuit: &Circuit,
    strategy: GarblingStrategy,
    all_input_wire_values: &mut AllInputWireValues,
    rng: &mut ChaChaRng,
) -> Result<(GarbledCircuit, TranslationTable), GarblerError> {
    match strategy {
        GarblingStrategy::Standard => garble_parallel::<StandardGateGarbler<Aes128Cipher>, _>(
            circuit,
            all_input_wire_values,
            rng,
        ),
        GarblingStrategy::MinimizeSetKey => garble_parallel::<
            MinimizeSetKeyGateGarbler<Aes128Cipher>,
            _,
        >(circuit, all_input_wire_values, rng),
    }
}

#[cfg(not(feature = "std"))]
fn garble_with_strategy_parallel(
    circuit: &Circuit,
    strategy: GarblingStrategy,
    all_input_wire_values: &mut AllInputWireValues,
    rng: &mut ChaChaRng,
) -> Result<(GarbledCircuit, TranslationTable), GarblerError> {
    log::warn!("garble_circuit: `parallel` requires `std`; garbling sequentially");
    garble_with_strategy(circuit, strategy, all_input_wire_values, rng)
}

/// The evaluator side, using AES-128: evaluate then decode every output.
///
/// `translation_table` MUST cover all the outputs.
///
/// # Errors
///
/// See `evaluate`; and `UnknownOutputWire` if an output is not in `translation_table`
pub fn evaluate_circuit(
    garbled: &GarbledCircuit,
    encoded_inputs: &EncodedInputs,
    translation_table: &TranslationTable,
) -> Result<Vec<WireValue>, EvaluatorError> {
    let output_labels = evaluate(garbled, encoded_inputs, Aes128Cipher::new())?;
    translation_table.decode_outputs(&output_labels)
}

/// Re-derive the full wire assignment of a circuit garbled with `rng_seed`
///
/// This is what the garbler discloses for an opened circuit: the seed alone is enough.
///
/// # Errors
///
/// `KeyGenerationFailure`
pub fn derive_wire_values(
    circuit: &Circuit,
    rng_seed: [u8; 32],
) -> Result<WireValues, GarblerError> {
    WireValues::assign::<Aes128Cipher, _>(
        circuit.get_nb_wires(),
        &mut ChaChaRng::from_seed(rng_seed),
    )
}

/// Cut-and-choose: audit an opened circuit given the seed it was garbled with.
///
/// # Errors
///
/// See `verify`; and `KeyGenerationFailure` if the wire assignment can not be re-derived
pub fn verify_opened_circuit(
    circuit: &Circuit,
    rng_seed: [u8; 32],
    candidate: &GarbledCircuit,
    translation_table: &TranslationTable,
) -> Result<(), VerificationError> {
    let wire_values = derive_wire_values(circuit, rng_seed)
        .map_err(|source| VerificationError::KeyGenerationFailure { source })?;

    verify::<Aes128Cipher>(circuit, &wire_values, candidate, translation_table)
}

/// Cut-and-choose: audit an opened circuit given both labels of its inputs.
///
/// Works whatever the rng the circuit was garbled with, ie also without a `rng_seed`.
///
/// # Errors
///
/// See `verify_from_input_wire_values`
pub fn verify_opened_circuit_with_inputs(
    circuit: &Circuit,
    all_input_wire_values: &AllInputWireValues,
    candidate: &GarbledCircuit,
    translation_table: &TranslationTable,
) -> Result<(), VerificationError> {
    verify_from_input_wire_values::<Aes128Cipher>(
        circuit,
        all_input_wire_values,
        candidate,
        translation_table,
    )
}
