use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::wire_value::WireValue;

/// Represent either the TRUE or the FALSE part of a `Wire`
///
/// This is what the evaluator manipulates: ONE opaque label per wire.
/// The `label` SHOULD match either a `Wire.label0` OR a `Wire.label1` but the
/// evaluator has no way to know which one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLabel {
    label: Block,
}

impl WireLabel {
    pub(crate) fn new(block: Block) -> Self {
        Self { label: block }
    }

    pub(crate) fn get_block(&self) -> &Block {
        &self.label
    }

    /// The permuted bit carried by the label.
    /// It selects the garbled row; on its own it reveals nothing about the semantic value.
    pub fn point_bit(&self) -> bool {
        self.label.lsb()
    }
}

/// A pair of labels, one representing a 0 on the Wire, and one for 1.
///
/// Point-and-permute: the low-order bit of each label is
/// `signal_bit XOR semantic bit`, so `label0` and `label1` ALWAYS differ in their lsb.
///
/// Garbler-side ONLY: giving a `Wire` to the evaluator leaks both semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    label0: WireLabel,
    label1: WireLabel,
}

impl Wire {
    /// Create a new `Wire` by baking `signal_bit` into two freshly drawn keys
    pub(crate) fn new_point_and_permute(
        mut key0: Block,
        mut key1: Block,
        signal_bit: bool,
    ) -> Self {
        key0.set_lsb(signal_bit);
        key1.set_lsb(!signal_bit);

        Self {
            label0: WireLabel::new(key0),
            label1: WireLabel::new(key1),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_labels(label0: Block, label1: Block) -> Self {
        Self {
            label0: WireLabel::new(label0),
            label1: WireLabel::new(label1),
        }
    }

    pub fn value0(&self) -> &Block {
        self.label0.get_block()
    }

    pub fn value1(&self) -> &Block {
        self.label1.get_block()
    }

    /// Select the label encoding `value`
    pub fn label(&self, value: WireValue) -> &WireLabel {
        if value.value {
            &self.label1
        } else {
            &self.label0
        }
    }

    pub fn signal_bit(&self) -> bool {
        self.label0.point_bit()
    }

    /// `lsb(label0) == signal_bit` and `lsb(label1) == !signal_bit`
    ///
    /// Always true for a `Wire` built by `new_point_and_permute`; used to check
    /// disclosed wires which come from the (potentially malicious) garbler.
    pub fn satisfies_point_and_permute(&self) -> bool {
        self.label0.point_bit() != self.label1.point_bit()
    }
}
