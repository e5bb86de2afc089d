use core::ops::{BitXor, BitXorAssign};

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::constant::BLOCK_BYTES;

type MyByteArray = [u8; BLOCK_BYTES];

/// A `KAPPA` bits string.
///
/// Used for everything that crosses the cipher: wire labels (which are also
/// the cipher keys), tweaks, pads and garbled rows.
///
/// The "low-order bit" is the least significant bit of the LAST byte;
/// it carries the point-and-permute bit of a label.
#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone, Copy, Default)]
pub struct Block {
    bytes: MyByteArray,
}

impl Block {
    pub(crate) const ZERO: Self = Self {
        bytes: [0; BLOCK_BYTES],
    };

    pub fn new_with(initial_value: MyByteArray) -> Self {
        Self {
            bytes: initial_value,
        }
    }

    /// Build a `Block` from a slice of AT MOST `BLOCK_BYTES` bytes.
    /// Shorter slices are zero-padded on the right.
    ///
    /// return: None if the slice is too long
    pub(crate) fn from_slice_padded(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > BLOCK_BYTES {
            return None;
        }
        let mut block = Self::ZERO;
        block.bytes[..bytes.len()].copy_from_slice(bytes);
        Some(block)
    }

    /// Draw a new uniformly random `Block`
    ///
    /// NOTE: use `try_fill_bytes` so that a failing RNG is surfaced instead of panicking
    pub(crate) fn try_new_random<R: RngCore + CryptoRng>(
        rng: &mut R,
    ) -> Result<Self, rand::Error> {
        let mut bytes = [0u8; BLOCK_BYTES];
        rng.try_fill_bytes(&mut bytes)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &MyByteArray {
        &self.bytes
    }

    /// Return the low-order bit
    pub fn lsb(&self) -> bool {
        self.bytes[BLOCK_BYTES - 1] & 1 == 1
    }

    /// Force the low-order bit to `value`; all the other bits are untouched
    pub(crate) fn set_lsb(&mut self, value: bool) {
        if value {
            self.bytes[BLOCK_BYTES - 1] |= 1;
        } else {
            self.bytes[BLOCK_BYTES - 1] &= 0xfe;
        }
    }
}

impl BitXor for Block {
    type Output = Self;

    fn bitxor(mut self, rhs: Self) -> Self::Output {
        self ^= rhs;
        self
    }
}

impl BitXorAssign for Block {
    fn bitxor_assign(&mut self, rhs: Self) {
        for (left, right) in self.bytes.iter_mut().zip(rhs.bytes.iter()) {
            *left ^= right;
        }
    }
}
