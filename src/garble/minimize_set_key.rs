use alloc::vec;

use super::{GarbledGate, GarblerError, GateGarbler, GateToGarble};
use crate::block::Block;
use crate::circuit::Gate;
use crate::encryption::{tweak, BlockCipher, EncryptionError};
use crate::wire_values::WireValues;

/// Same garbled tables as `StandardGateGarbler`, with the cipher operations grouped
/// by key.
///
/// There are only 4 distinct keys per Binary Gate(2 per input wire), and each of them
/// appears in exactly 2 rows. So:
/// - start with every row = the plaintext output label at its permuted index
/// - for each distinct key: run its key schedule ONCE, and XOR `E_k(tweak(gate, row))`
///   into every row using it
///
/// XOR being commutative, the result is the same `m ⊕ E_ka(T) ⊕ E_kb(T)` as the
/// standard way; only the number of key schedules changes: 4 per Binary Gate, 2 per Unary.
#[derive(Debug, Clone, Default)]
pub struct MinimizeSetKeyGateGarbler<C: BlockCipher> {
    cipher: C,
}

impl<C: BlockCipher> MinimizeSetKeyGateGarbler<C> {
    pub fn new(cipher: C) -> Self {
        Self { cipher }
    }
}

impl<C: BlockCipher> GateGarbler for MinimizeSetKeyGateGarbler<C> {
    type Cipher = C;

    fn garble_gate(
        &mut self,
        gate: &Gate,
        wire_values: &WireValues,
    ) -> Result<GarbledGate, GarblerError> {
        let to_garble = GateToGarble::new(gate, wire_values)?;
        let gate_id = to_garble.gate_id;

        let mut table = vec![Block::ZERO; to_garble.rows.len()];
        for plain_row in &to_garble.rows {
            table[plain_row.row] = plain_row.output_label;
        }

        for value in [false, true] {
            let key_a = to_garble.wire_a.label(value.into()).get_block();
            self.cipher
                .with_key(key_a, |cipher| -> Result<(), EncryptionError> {
                    for plain_row in to_garble.rows.iter().filter(|row| row.a == value) {
                        table[plain_row.row] ^= cipher.encrypt_block(&tweak(gate_id, plain_row.row))?;
                    }
                    Ok(())
                })
                .map_err(|source| GarblerError::EncryptionFailure { gate_id, source })?;

            if let Some(wire_b) = to_garble.wire_b {
                let key_b = wire_b.label(value.into()).get_block();
                self.cipher
                    .with_key(key_b, |cipher| -> Result<(), EncryptionError> {
                        for plain_row in to_garble.rows.iter().filter(|row| row.b == Some(value)) {
                            table[plain_row.row] ^=
                                cipher.encrypt_block(&tweak(gate_id, plain_row.row))?;
                        }
                        Ok(())
                    })
                    .map_err(|source| GarblerError::EncryptionFailure { gate_id, source })?;
            }
        }

        log::trace!(
            "MinimizeSetKeyGateGarbler: gate {} {}: {} rows",
            gate_id,
            gate.kind_name(),
            table.len()
        );

        Ok(to_garble.into_garbled_gate(gate, table))
    }

    fn key_schedule_count(&self) -> u64 {
        self.cipher.key_schedule_count()
    }
}
