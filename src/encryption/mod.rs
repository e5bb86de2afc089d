//! The encryption capability consumed by the garbling core.
//!
//! Two layers:
//! - `BlockCipher`: a keyed PRF (eg AES-128) with an EXPLICIT key-schedule lifecycle;
//!   `set_key` is assumed expensive compared to `encrypt_block`.
//! - `MultiKeyEncryption`: the tweakable multi-key scheme used to garble/evaluate a row
//!   `Enc_{k1..kn}^T(m) = m ⊕ E_k1(T) ⊕ ... ⊕ E_kn(T)`
//!
//! The "minimize set key" garbler drives `BlockCipher` directly through `with_key`
//! so that every pad computed under one key is batched before switching.

mod aes128;
mod multi_key;

use rand::{CryptoRng, RngCore};
use snafu::prelude::*;

use crate::block::Block;
use crate::constant::BLOCK_BYTES;

pub use aes128::Aes128Cipher;
pub use multi_key::MultiKeyEncryption;

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum EncryptionError {
    /// `encrypt`/`decrypt` called before `set_key`/`set_keys`
    KeyNotSet,
    /// `MultiKeyEncryption::encrypt`/`decrypt` called before `set_tweak`
    TweakNotSet,
    /// The plaintext does not fit in one block
    PlaintextTooLong { len: usize },
    /// The randomness source failed while drawing a new key
    KeyGeneration,
}

/// A keyed pseudo-random function on `Block`s, with an explicit key schedule.
///
/// Implementations MUST be deterministic for a given key: garbling, evaluation and
/// verification each use their own instance and MUST agree on every pad.
pub trait BlockCipher {
    /// Draw a fresh key from the scheme's key space
    ///
    /// # Errors
    ///
    /// `EncryptionError::KeyGeneration` if the randomness source fails
    fn generate_key<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Block, EncryptionError>
    where
        Self: Sized,
    {
        Block::try_new_random(rng).map_err(|_err| EncryptionError::KeyGeneration)
    }

    /// Run the key schedule for `key`; this is the expensive operation
    fn set_key(&mut self, key: &Block);

    fn is_key_set(&self) -> bool;

    /// Compute `E_k(input)` under the currently set key
    ///
    /// # Errors
    ///
    /// `EncryptionError::KeyNotSet` if no key was set
    fn encrypt_block(&self, input: &Block) -> Result<Block, EncryptionError>;

    /// Number of times the key schedule was run since construction
    fn key_schedule_count(&self) -> u64;

    /// Scoped keyed-batch acquisition: set `key` ONCE, then run every computation
    /// that needs it through `f` before the caller moves on to the next key.
    fn with_key<T, E, F>(&mut self, key: &Block, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        Self: Sized,
    {
        self.set_key(key);
        f(self)
    }
}

/// The tweak is what makes each (gate, row) pad independent.
///
/// Layout: `gate_id` u64 LE || `row` u64 LE; with `gate_id` the Gate's output wire id
/// and `row` the PERMUTED row index.
pub(crate) fn tweak(gate_id: usize, row: usize) -> Block {
    let mut bytes = [0u8; BLOCK_BYTES];
    bytes[..8].copy_from_slice(&(gate_id as u64).to_le_bytes());
    bytes[8..].copy_from_slice(&(row as u64).to_le_bytes());
    Block::new_with(bytes)
}
