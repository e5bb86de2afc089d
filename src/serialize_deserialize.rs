//! (De)serialization using Postcard <https://github.com/jamesmunns/postcard>
//! Postcard is `no_std` compatible and works directly with the serde derives.
//!
//! Only the evaluator-side "package" is exposed here; the garbler secrets
//! (`AllInputWireValues`, `WireValues`) are serde-serializable but are only meant to be
//! sent for a circuit opened during cut-and-choose.

use alloc::vec::Vec;
use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::encoding::EncodedInputs;
use crate::garble::GarbledCircuit;

#[derive(Debug, Snafu)]
pub enum SerializationError {
    Postcard { err: postcard::Error },
}

/// What is sent to the evaluator: the garbled circuit, and the ALREADY encoded garbler
/// inputs. The evaluator's own inputs are obtained separately(ie OT).
#[derive(PartialEq, Debug, Serialize, Deserialize)]
struct EvaluableGarbledCircuit {
    garbled: GarbledCircuit,
    encoded_garbler_inputs: EncodedInputs,
}

/// Serialize
///
/// # Errors
///
/// `SerializationError::Postcard` if Postcard fails
pub fn serialize_for_evaluator(
    garbled: GarbledCircuit,
    encoded_garbler_inputs: EncodedInputs,
) -> Result<Vec<u8>, SerializationError> {
    let eval_garb = EvaluableGarbledCircuit {
        garbled,
        encoded_garbler_inputs,
    };

    to_allocvec(&eval_garb).map_err(|err| SerializationError::Postcard { err })
}

/// Deserialize
///
/// # Errors
///
/// `SerializationError::Postcard` if `buf` is not a valid serialized package
pub fn deserialize_for_evaluator(
    buf: &[u8],
) -> Result<(GarbledCircuit, EncodedInputs), SerializationError> {
    let eval_garb: EvaluableGarbledCircuit =
        from_bytes(buf).map_err(|err| SerializationError::Postcard { err })?;

    Ok((eval_garb.garbled, eval_garb.encoded_garbler_inputs))
}
