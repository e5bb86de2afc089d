/// Kappa: κ
/// This is the "computational security parameter" which is for example 128 bits
///
/// Both the wire labels and the cipher blocks are exactly `KAPPA` bits; the labels
/// ARE the block cipher keys.
pub(crate) const KAPPA: usize = 128;

/// The number of Bytes needed to store a `Block`
pub(crate) const BLOCK_BYTES: usize = KAPPA / 8;

/// Number of rows in the garbled truth table of a 2-inputs Gate
pub(crate) const NB_ROWS_BINARY: usize = 4;

/// Number of rows in the garbled truth table of a 1-input Gate
pub(crate) const NB_ROWS_UNARY: usize = 2;
