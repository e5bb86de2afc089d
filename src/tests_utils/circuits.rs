use alloc::vec;
use alloc::vec::Vec;
use rand::Rng;

use crate::circuit::{Circuit, Gate, GateTypeBinary, TruthTable, WireRef};

/// 1-bit AND: inputs [0, 1], output [2]
#[allow(clippy::unwrap_used, clippy::must_use_candidate)]
pub fn new_and_gate() -> Circuit {
    Circuit::new(
        3,
        vec![0.into(), 1.into()],
        vec![2.into()],
        vec![Gate::new_binary(
            GateTypeBinary::AND,
            0.into(),
            1.into(),
            2.into(),
        )],
    )
    .unwrap()
}

/// Append a full adder to `gates`; returns (sum, carry_out)
fn push_full_adder(
    gates: &mut Vec<Gate>,
    next_wire: &mut usize,
    a: WireRef,
    b: WireRef,
    carry_in: WireRef,
) -> (WireRef, WireRef) {
    let mut new_wire = || {
        let wire = WireRef { id: *next_wire };
        *next_wire += 1;
        wire
    };
    let a_xor_b = new_wire();
    let sum = new_wire();
    let a_and_b = new_wire();
    let carry_and = new_wire();
    let carry_out = new_wire();

    gates.push(Gate::new_binary(
        GateTypeBinary::XOR,
        a.clone(),
        b.clone(),
        a_xor_b.clone(),
    ));
    gates.push(Gate::new_binary(
        GateTypeBinary::XOR,
        a_xor_b.clone(),
        carry_in.clone(),
        sum.clone(),
    ));
    gates.push(Gate::new_binary(GateTypeBinary::AND, a, b, a_and_b.clone()));
    gates.push(Gate::new_binary(
        GateTypeBinary::AND,
        a_xor_b,
        carry_in,
        carry_and.clone(),
    ));
    gates.push(Gate::new_binary(
        GateTypeBinary::OR,
        a_and_b,
        carry_and,
        carry_out.clone(),
    ));

    (sum, carry_out)
}

/// inputs: [a, b, carry_in]; outputs: [sum, carry_out]
#[allow(clippy::unwrap_used, clippy::must_use_candidate)]
pub fn new_full_adder() -> Circuit {
    let mut gates = Vec::with_capacity(5);
    let mut next_wire = 3;
    let (sum, carry_out) =
        push_full_adder(&mut gates, &mut next_wire, 0.into(), 1.into(), 2.into());

    Circuit::new(
        next_wire,
        vec![0.into(), 1.into(), 2.into()],
        vec![sum, carry_out],
        gates,
    )
    .unwrap()
}

/// `nb_bits` ripple-carry adder
///
/// inputs: a[0..nb_bits] then b[0..nb_bits] then carry_in, little endian
/// outputs: sum[0..nb_bits] then carry_out
#[allow(clippy::unwrap_used, clippy::must_use_candidate)]
pub fn new_ripple_carry_adder(nb_bits: usize) -> Circuit {
    let nb_inputs = 2 * nb_bits + 1;
    let inputs: Vec<WireRef> = (0..nb_inputs).map(WireRef::from).collect();
    let mut gates = Vec::with_capacity(5 * nb_bits);
    let mut next_wire = nb_inputs;

    let mut outputs = Vec::with_capacity(nb_bits + 1);
    let mut carry = WireRef { id: 2 * nb_bits };
    for bit in 0..nb_bits {
        let (sum, carry_out) = push_full_adder(
            &mut gates,
            &mut next_wire,
            bit.into(),
            (nb_bits + bit).into(),
            carry,
        );
        outputs.push(sum);
        carry = carry_out;
    }
    outputs.push(carry);

    Circuit::new(next_wire, inputs, outputs, gates).unwrap()
}

/// A random circuit of `nb_gates` Gates with random truth tables.
///
/// Each Gate reads random wires among the inputs and the previous Gates' outputs;
/// the outputs are the last `nb_outputs` Gates.
#[allow(clippy::unwrap_used)]
pub fn new_random_circuit<R: Rng>(
    rng: &mut R,
    nb_inputs: usize,
    nb_gates: usize,
    nb_outputs: usize,
) -> Circuit {
    assert!(nb_inputs >= 1 && nb_outputs <= nb_gates);

    let mut gates = Vec::with_capacity(nb_gates);
    for gate_idx in 0..nb_gates {
        let nb_available = nb_inputs + gate_idx;
        let output = WireRef {
            id: nb_inputs + gate_idx,
        };
        let input_a = WireRef {
            id: rng.gen_range(0..nb_available),
        };

        if nb_available >= 2 && rng.gen_bool(0.8) {
            // pick a different wire for b
            let mut input_b = rng.gen_range(0..nb_available - 1);
            if input_b >= input_a.id {
                input_b += 1;
            }
            let code: u8 = rng.gen_range(0..16);
            let outputs = [code & 1 == 1, code & 2 == 2, code & 4 == 4, code & 8 == 8];
            gates.push(Gate::new_binary_with_truth_table(
                TruthTable::from_binary_outputs(outputs),
                input_a,
                input_b.into(),
                output,
            ));
        } else {
            let outputs = [rng.gen_bool(0.5), rng.gen_bool(0.5)];
            gates.push(Gate::new_unary_with_truth_table(
                TruthTable::from_unary_outputs(outputs),
                input_a,
                output,
            ));
        }
    }

    let nb_wires = nb_inputs + nb_gates;
    Circuit::new(
        nb_wires,
        (0..nb_inputs).map(WireRef::from).collect(),
        (nb_wires - nb_outputs..nb_wires).map(WireRef::from).collect(),
        gates,
    )
    .unwrap()
}

/// Every possible assignment of `nb_inputs` bits, little endian; only for small circuits
#[allow(clippy::must_use_candidate)]
pub fn all_inputs(nb_inputs: usize) -> Vec<Vec<bool>> {
    (0..1usize << nb_inputs)
        .map(|x| (0..nb_inputs).map(|bit| (x >> bit) & 1 == 1).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    use super::*;
    use crate::wire_value::WireValue;

    #[test]
    fn test_ripple_carry_adder_plain() {
        let circ = new_ripple_carry_adder(4);
        assert_eq!(circ.get_nb_inputs(), 9);
        assert_eq!(circ.get_nb_outputs(), 5);

        for (a, b, carry_in) in [(0usize, 0usize, 0usize), (5, 9, 1), (15, 15, 1), (7, 1, 0)] {
            let mut inputs: Vec<WireValue> = Vec::new();
            inputs.extend((0..4).map(|bit| WireValue::from((a >> bit) & 1 == 1)));
            inputs.extend((0..4).map(|bit| WireValue::from((b >> bit) & 1 == 1)));
            inputs.push((carry_in == 1).into());

            let outputs = circ.eval_plain(&inputs).unwrap();
            let result = outputs
                .iter()
                .enumerate()
                .fold(0usize, |acc, (bit, value)| acc | (usize::from(value.value) << bit));
            assert_eq!(result, a + b + carry_in);
        }
    }

    #[test]
    fn test_random_circuit_is_valid() {
        let mut rng = ChaChaRng::seed_from_u64(81);
        for _ in 0..20 {
            let circ = new_random_circuit(&mut rng, 4, 30, 3);
            assert_eq!(circ.get_gates().len(), 30);
            assert_eq!(circ.get_nb_outputs(), 3);
        }
    }

    #[test]
    fn test_all_inputs() {
        let all = all_inputs(2);
        assert_eq!(
            all,
            vec![
                vec![false, false],
                vec![true, false],
                vec![false, true],
                vec![true, true]
            ]
        );
    }
}
