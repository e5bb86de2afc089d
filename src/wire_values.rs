use alloc::vec::Vec;
use bitvec::vec::BitVec;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, WireRef};
use crate::encoding::AllInputWireValues;
use crate::encryption::{BlockCipher, EncryptionError};
use crate::garble::GarblerError;
use crate::wire::Wire;

/// The full wire assignment: for EVERY wire of the circuit, its (label0, label1) pair
/// and its signal bit.
///
/// Built once by `assign` then read-only: it is shared as-is between concurrent
/// gate garblers.
///
/// Garbler-side secret. It is only ever disclosed for a circuit "opened" during
/// cut-and-choose, cf `verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireValues {
    /// Indexed by `WireRef.id`
    wires: Vec<Wire>,
    /// Indexed by `WireRef.id`; `signal_bits[i] == wires[i].signal_bit()`
    signal_bits: BitVec,
}

impl WireValues {
    /// Label sampling, for each wire id in `[0, nb_wires)`:
    /// - draw two independent keys using the scheme's key generation
    /// - draw a uniform signal bit
    /// - force `lsb(key0) = signal_bit` and `lsb(key1) = !signal_bit`
    ///
    /// NOTE: the draws are done in wire order; given the same `rng` state the result
    /// is fully reproducible, which is what allows to re-derive an opened circuit.
    ///
    /// # Errors
    ///
    /// `KeyGenerationFailure` if the randomness source fails
    pub fn assign<C: BlockCipher, R: RngCore + CryptoRng>(
        nb_wires: usize,
        rng: &mut R,
    ) -> Result<Self, GarblerError> {
        let mut wires = Vec::with_capacity(nb_wires);
        let mut signal_bits = BitVec::with_capacity(nb_wires);

        for wire_id in 0..nb_wires {
            let key_generation_failure = |source: EncryptionError| GarblerError::KeyGenerationFailure {
                wire: WireRef { id: wire_id },
                source,
            };
            let key0 = C::generate_key(rng).map_err(key_generation_failure)?;
            let key1 = C::generate_key(rng).map_err(key_generation_failure)?;

            let mut signal_byte = [0u8; 1];
            rng.try_fill_bytes(&mut signal_byte)
                .map_err(|_err| key_generation_failure(EncryptionError::KeyGeneration))?;
            let signal_bit = signal_byte[0] & 1 == 1;

            wires.push(Wire::new_point_and_permute(key0, key1, signal_bit));
            signal_bits.push(signal_bit);
        }

        log::trace!("WireValues::assign: {} wires", nb_wires);

        Ok(Self { wires, signal_bits })
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn get(&self, wire: &WireRef) -> Option<&Wire> {
        self.wires.get(wire.id)
    }

    pub fn signal_bit(&self, wire: &WireRef) -> Option<bool> {
        self.signal_bits.get(wire.id).map(|bit| *bit)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (WireRef, &Wire, Option<bool>)> + '_ {
        self.wires
            .iter()
            .enumerate()
            .map(|(id, wire)| (WireRef { id }, wire, self.signal_bits.get(id).map(|bit| *bit)))
    }

    /// Extract the (label0, label1) pairs of the circuit's inputs
    ///
    /// # Errors
    ///
    /// `GarbleMissingWire` if an input is not part of the assignment
    pub(crate) fn input_wire_values(
        &self,
        circuit: &Circuit,
    ) -> Result<AllInputWireValues, GarblerError> {
        let mut all_input_wire_values = AllInputWireValues::with_capacity(circuit.get_nb_inputs());
        for input in circuit.get_inputs() {
            let wire = self
                .get(input)
                .ok_or_else(|| GarblerError::GarbleMissingWire {
                    wire: input.clone(),
                })?;
            all_input_wire_values.insert(input.clone(), wire.clone());
        }

        Ok(all_input_wire_values)
    }
}
