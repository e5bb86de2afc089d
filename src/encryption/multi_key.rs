use alloc::vec::Vec;

use super::{BlockCipher, EncryptionError};
use crate::block::Block;

/// Tweakable multi-key encryption over a `BlockCipher`:
/// `Enc_{k1..kn}^T(m) = m ⊕ E_k1(T) ⊕ ... ⊕ E_kn(T)`
///
/// Every `encrypt`/`decrypt` re-runs the key schedule once per key, which is
/// exactly the cost the "minimize set key" garbler avoids.
#[derive(Debug, Clone, Default)]
pub struct MultiKeyEncryption<C: BlockCipher> {
    cipher: C,
    keys: Vec<Block>,
    tweak: Option<Block>,
}

impl<C: BlockCipher> MultiKeyEncryption<C> {
    pub fn new(cipher: C) -> Self {
        Self {
            cipher,
            keys: Vec::with_capacity(2),
            tweak: None,
        }
    }

    /// Store the keys; the key schedules are only run when encrypting/decrypting
    pub fn set_keys(&mut self, keys: &[Block]) {
        self.keys.clear();
        self.keys.extend_from_slice(keys);
    }

    pub fn set_tweak(&mut self, tweak: Block) {
        self.tweak = Some(tweak);
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    fn pad(&mut self) -> Result<Block, EncryptionError> {
        if self.keys.is_empty() {
            return Err(EncryptionError::KeyNotSet);
        }
        let tweak = self.tweak.ok_or(EncryptionError::TweakNotSet)?;

        let mut pad = Block::ZERO;
        for key in &self.keys {
            self.cipher.set_key(key);
            pad ^= self.cipher.encrypt_block(&tweak)?;
        }

        Ok(pad)
    }

    /// # Errors
    ///
    /// - `PlaintextTooLong` if `plaintext` does not fit in a `Block`
    /// - `KeyNotSet`/`TweakNotSet` if `set_keys`/`set_tweak` were not called
    pub fn encrypt(&mut self, plaintext: &[u8]) -> Result<Block, EncryptionError> {
        let plaintext =
            Block::from_slice_padded(plaintext).ok_or(EncryptionError::PlaintextTooLong {
                len: plaintext.len(),
            })?;

        Ok(plaintext ^ self.pad()?)
    }

    /// # Errors
    ///
    /// `KeyNotSet`/`TweakNotSet` if `set_keys`/`set_tweak` were not called
    pub fn decrypt(&mut self, ciphertext: &Block) -> Result<Block, EncryptionError> {
        Ok(*ciphertext ^ self.pad()?)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    use super::*;
    use crate::constant::BLOCK_BYTES;
    use crate::encryption::{tweak, Aes128Cipher};

    fn new_keys(nb: usize) -> Vec<Block> {
        let mut rng = ChaChaRng::seed_from_u64(7);
        (0..nb)
            .map(|_| Aes128Cipher::generate_key(&mut rng).unwrap())
            .collect()
    }

    #[test]
    fn test_encrypt_decrypt_two_keys() {
        let keys = new_keys(2);
        let message = Block::new_with([0x42; BLOCK_BYTES]);
        let mut mke = MultiKeyEncryption::new(Aes128Cipher::new());
        mke.set_keys(&keys);
        mke.set_tweak(tweak(3, 1));

        let ciphertext = mke.encrypt(message.as_bytes()).unwrap();
        assert_ne!(ciphertext, message);

        // decrypting with the keys in the other order MUST work: the pads are XORed
        let mut mke2 = MultiKeyEncryption::new(Aes128Cipher::new());
        mke2.set_keys(&[keys[1], keys[0]]);
        mke2.set_tweak(tweak(3, 1));
        assert_eq!(mke2.decrypt(&ciphertext).unwrap(), message);
    }

    #[test]
    fn test_wrong_tweak_does_not_decrypt() {
        let keys = new_keys(2);
        let message = Block::new_with([0x42; BLOCK_BYTES]);
        let mut mke = MultiKeyEncryption::new(Aes128Cipher::new());
        mke.set_keys(&keys);
        mke.set_tweak(tweak(3, 1));
        let ciphertext = mke.encrypt(message.as_bytes()).unwrap();

        mke.set_tweak(tweak(3, 2));
        assert_ne!(mke.decrypt(&ciphertext).unwrap(), message);
    }

    #[test]
    fn test_one_set_key_per_key() {
        let keys = new_keys(2);
        let mut mke = MultiKeyEncryption::new(Aes128Cipher::new());
        mke.set_keys(&keys);
        mke.set_tweak(tweak(0, 0));

        mke.encrypt(&[1, 2, 3]).unwrap();

        assert_eq!(mke.cipher().key_schedule_count(), 2);
    }

    #[test]
    fn test_errors() {
        let mut mke = MultiKeyEncryption::new(Aes128Cipher::new());
        assert_eq!(mke.encrypt(&[0]), Err(EncryptionError::KeyNotSet));

        mke.set_keys(&new_keys(1));
        assert_eq!(mke.encrypt(&[0]), Err(EncryptionError::TweakNotSet));

        mke.set_tweak(tweak(0, 0));
        assert_eq!(
            mke.encrypt(&[0u8; BLOCK_BYTES + 1]),
            Err(EncryptionError::PlaintextTooLong {
                len: BLOCK_BYTES + 1
            })
        );
    }
}
