use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;

use super::{BlockCipher, EncryptionError};
use crate::block::Block;
use crate::constant::BLOCK_BYTES;

/// AES-128 as a keyed PRF.
///
/// Each `set_key` runs the full AES key expansion; `key_schedule_count` is
/// what the "minimize set key" strategy is measured against.
#[derive(Clone, Default)]
pub struct Aes128Cipher {
    cipher: Option<Aes128>,
    nb_key_schedules: u64,
}

impl Aes128Cipher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl core::fmt::Debug for Aes128Cipher {
    // NEVER print the expanded key
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Aes128Cipher")
            .field("is_key_set", &self.cipher.is_some())
            .field("nb_key_schedules", &self.nb_key_schedules)
            .finish()
    }
}

impl BlockCipher for Aes128Cipher {
    fn set_key(&mut self, key: &Block) {
        self.cipher = Some(Aes128::new(&GenericArray::from(*key.as_bytes())));
        self.nb_key_schedules += 1;
    }

    fn is_key_set(&self) -> bool {
        self.cipher.is_some()
    }

    fn encrypt_block(&self, input: &Block) -> Result<Block, EncryptionError> {
        let cipher = self.cipher.as_ref().ok_or(EncryptionError::KeyNotSet)?;

        let mut block = GenericArray::from(*input.as_bytes());
        cipher.encrypt_block(&mut block);

        let mut output = [0u8; BLOCK_BYTES];
        output.copy_from_slice(&block);
        Ok(Block::new_with(output))
    }

    fn key_schedule_count(&self) -> u64 {
        self.nb_key_schedules
    }
}
