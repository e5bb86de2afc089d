use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// This is a "reference" to either:
/// - another Gate's inputs
/// - a Gate's output
/// - a Circuit's input/output
#[derive(Debug, Clone, PartialEq, Hash, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WireRef {
    pub id: usize,
}

impl From<usize> for WireRef {
    fn from(id: usize) -> Self {
        Self { id }
    }
}

/// The truth table of a 1 or 2 inputs Gate, packed in the low bits of a `u8`.
///
/// - Binary: bit `(a << 1) | b` is the output for the semantic inputs (a, b)
/// - Unary: bit `a` is the output for the semantic input a
///
/// With this packing the named binary gates have the same code as in `GateTypeBinary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruthTable {
    bits: u8,
}

impl TruthTable {
    /// `outputs[(a << 1) | b]` is the output for (a, b)
    pub fn from_binary_outputs(outputs: [bool; 4]) -> Self {
        let bits = outputs
            .iter()
            .enumerate()
            .fold(0u8, |acc, (idx, out)| acc | (u8::from(*out) << idx));
        Self { bits }
    }

    /// `outputs[a]` is the output for a
    pub fn from_unary_outputs(outputs: [bool; 2]) -> Self {
        Self {
            bits: u8::from(outputs[0]) | (u8::from(outputs[1]) << 1),
        }
    }

    pub fn eval_binary(&self, a: bool, b: bool) -> bool {
        let idx = (usize::from(a) << 1) | usize::from(b);
        (self.bits >> idx) & 1 == 1
    }

    pub fn eval_unary(&self, a: bool) -> bool {
        (self.bits >> usize::from(a)) & 1 == 1
    }

    pub fn code(&self) -> u8 {
        self.bits
    }
}

/// The usual 2-inputs gates; the discriminant IS the packed `TruthTable`
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum GateTypeBinary {
    NOR = 1,
    XOR = 6,
    NAND = 7,
    AND = 8,
    XNOR = 9,
    OR = 14,
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum GateTypeUnary {
    /// NOT A
    INV = 1,
    BUF = 2,
}

impl From<GateTypeBinary> for TruthTable {
    fn from(gate_type: GateTypeBinary) -> Self {
        Self {
            bits: gate_type.into(),
        }
    }
}

impl From<GateTypeUnary> for TruthTable {
    fn from(gate_type: GateTypeUnary) -> Self {
        Self {
            bits: gate_type.into(),
        }
    }
}

/// A Gate has either one or two inputs; the function is given as a `TruthTable`
/// so any 1/2 inputs boolean function can be garbled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateType {
    Binary {
        truth_table: TruthTable,
        input_a: WireRef,
        input_b: WireRef,
    },
    Unary {
        truth_table: TruthTable,
        input_a: WireRef,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    internal: GateType,
    /// Gate's output is in practice a Gate's ID
    output: WireRef,
}

impl Gate {
    pub fn new_binary(
        gate_type: GateTypeBinary,
        input_a: WireRef,
        input_b: WireRef,
        output: WireRef,
    ) -> Self {
        Self::new_binary_with_truth_table(gate_type.into(), input_a, input_b, output)
    }

    pub fn new_binary_with_truth_table(
        truth_table: TruthTable,
        input_a: WireRef,
        input_b: WireRef,
        output: WireRef,
    ) -> Self {
        Self {
            internal: GateType::Binary {
                truth_table,
                input_a,
                input_b,
            },
            output,
        }
    }

    pub fn new_unary(gate_type: GateTypeUnary, input_a: WireRef, output: WireRef) -> Self {
        Self::new_unary_with_truth_table(gate_type.into(), input_a, output)
    }

    pub fn new_unary_with_truth_table(
        truth_table: TruthTable,
        input_a: WireRef,
        output: WireRef,
    ) -> Self {
        Self {
            internal: GateType::Unary {
                truth_table,
                input_a,
            },
            output,
        }
    }

    pub fn get_type(&self) -> &GateType {
        &self.internal
    }

    pub fn get_id(&self) -> usize {
        self.output.id
    }

    pub fn get_output(&self) -> &WireRef {
        &self.output
    }

    /// return: (input_a, Some(input_b)) for Binary gates; (input_a, None) for Unary ones
    pub fn get_inputs(&self) -> (&WireRef, Option<&WireRef>) {
        match &self.internal {
            GateType::Binary {
                input_a, input_b, ..
            } => (input_a, Some(input_b)),
            GateType::Unary { input_a, .. } => (input_a, None),
        }
    }

    /// Clear text evaluation of the Gate's function
    pub(crate) fn eval(&self, a: bool, b: Option<bool>) -> Option<bool> {
        match (&self.internal, b) {
            (GateType::Binary { truth_table, .. }, Some(b)) => Some(truth_table.eval_binary(a, b)),
            (GateType::Unary { truth_table, .. }, None) => Some(truth_table.eval_unary(a)),
            _ => None,
        }
    }

    /// Name of the gate when it is one of the usual ones; only for logging
    pub(crate) fn kind_name(&self) -> &'static str {
        match &self.internal {
            GateType::Binary { truth_table, .. } => {
                match GateTypeBinary::try_from(truth_table.code()) {
                    Ok(GateTypeBinary::NOR) => "NOR",
                    Ok(GateTypeBinary::XOR) => "XOR",
                    Ok(GateTypeBinary::NAND) => "NAND",
                    Ok(GateTypeBinary::AND) => "AND",
                    Ok(GateTypeBinary::XNOR) => "XNOR",
                    Ok(GateTypeBinary::OR) => "OR",
                    Err(_) => "BINARY",
                }
            }
            GateType::Unary { truth_table, .. } => {
                match GateTypeUnary::try_from(truth_table.code()) {
                    Ok(GateTypeUnary::INV) => "INV",
                    Ok(GateTypeUnary::BUF) => "BUF",
                    Err(_) => "UNARY",
                }
            }
        }
    }
}
