use serde::{Deserialize, Serialize};

/// Represent a Wire's semantic value, so essentially ON/OFF <=> a boolean
///
/// This is the CLEAR value; it only exists on the garbler side(when encoding)
/// and after decoding the outputs.
#[repr(transparent)]
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Default, Clone, Copy)]
pub struct WireValue {
    pub value: bool,
}

impl PartialEq<bool> for WireValue {
    fn eq(&self, other: &bool) -> bool {
        &self.value == other
    }
}

impl PartialEq<bool> for &WireValue {
    fn eq(&self, other: &bool) -> bool {
        &self.value == other
    }
}

impl From<bool> for WireValue {
    fn from(value: bool) -> Self {
        Self { value }
    }
}

impl From<&u8> for WireValue {
    fn from(value: &u8) -> Self {
        Self { value: *value >= 1 }
    }
}

impl From<WireValue> for bool {
    fn from(wire_value: WireValue) -> Self {
        wire_value.value
    }
}
