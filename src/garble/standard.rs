use alloc::vec;

use super::{GarbledGate, GarblerError, GateGarbler, GateToGarble};
use crate::block::Block;
use crate::circuit::Gate;
use crate::encryption::{tweak, BlockCipher, MultiKeyEncryption};
use crate::wire_values::WireValues;

/// Each row is an independent black-box `MultiKeyEncryption::encrypt` under the
/// two input labels: 4 rows x 2 key schedules = 8 per Binary Gate.
///
/// Also used to re-derive the Gates when verifying an opened circuit.
#[derive(Debug, Clone, Default)]
pub struct StandardGateGarbler<C: BlockCipher> {
    encryption: MultiKeyEncryption<C>,
}

impl<C: BlockCipher> StandardGateGarbler<C> {
    pub fn new(cipher: C) -> Self {
        Self {
            encryption: MultiKeyEncryption::new(cipher),
        }
    }
}

impl<C: BlockCipher> GateGarbler for StandardGateGarbler<C> {
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
            let (keys, nb_keys) = to_garble.keys(plain_row);
            self.encryption.set_keys(&keys[..nb_keys]);
            self.encryption.set_tweak(tweak(gate_id, plain_row.row));
            table[plain_row.row] = self
                .encryption
                .encrypt(plain_row.output_label.as_bytes())
                .map_err(|source| GarblerError::EncryptionFailure { gate_id, source })?;
        }

        log::trace!(
            "StandardGateGarbler: gate {} {}: {} rows",
            gate_id,
            gate.kind_name(),
            table.len()
        );

        Ok(to_garble.into_garbled_gate(gate, table))
    }

    fn key_schedule_count(&self) -> u64 {
        self.encryption.cipher().key_schedule_count()
    }
}
