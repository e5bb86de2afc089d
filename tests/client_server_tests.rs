/// Test the client-side use case, or as close as possible:
/// - [server 1] server garbles a circuit
/// - [server 2] server encodes its own inputs("garbler inputs")
/// - [server 3] server serializes all the above
/// - [client 1] client receives those
/// - [client 2] client gets the labels for its own inputs(ie OT; simulated here)
/// - [client 3] client evaluates the garbled circuit and decodes the outputs
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use lib_yao_garble_rs::tests_utils::circuits::new_ripple_carry_adder;
use lib_yao_garble_rs::tests_utils::garble_and_eval_utils::garble_helper;
use lib_yao_garble_rs::{
    deserialize_for_evaluator, evaluate_circuit, serialize_for_evaluator, GarbleConfig,
    WireValue,
};

fn to_bits(x: u16, nb_bits: usize) -> Vec<WireValue> {
    (0..nb_bits)
        .map(|bit| WireValue::from((x >> bit) & 1 == 1))
        .collect()
}

#[test]
fn test_server_client_adder() {
    const NB_BITS: usize = 8;
    let circ = new_ripple_carry_adder(NB_BITS);
    let mut rng = ChaChaRng::seed_from_u64(201);

    // server: "a" is the garbler's input
    let server = garble_helper(&circ, &GarbleConfig::default());
    let garbler_wires = &circ.get_inputs()[..NB_BITS];
    let evaluator_wires = &circ.get_inputs()[NB_BITS..];
    let a: u16 = rng.gen_range(0..256);
    let encoded_garbler_inputs = server
        .all_input_wire_values
        .encode(garbler_wires, &to_bits(a, NB_BITS))
        .unwrap();
    let buf = serialize_for_evaluator(server.garbled.clone(), encoded_garbler_inputs).unwrap();

    // client
    let (garbled, encoded_inputs) = deserialize_for_evaluator(&buf).unwrap();
    assert_eq!(encoded_inputs.len(), NB_BITS);
    for _ in 0..16 {
        let b: u16 = rng.gen_range(0..256);
        let mut evaluator_values = to_bits(b, NB_BITS);
        evaluator_values.push(false.into());

        // OT: the client obtains exactly ONE label per wire of its own inputs
        let encoded_evaluator_inputs = server
            .all_input_wire_values
            .encode(evaluator_wires, &evaluator_values)
            .unwrap();
        let mut all_encoded = encoded_inputs.clone();
        all_encoded.merge(encoded_evaluator_inputs);

        let outputs = evaluate_circuit(&garbled, &all_encoded, &server.translation_table).unwrap();
        let sum = outputs
            .iter()
            .enumerate()
            .fold(0u16, |acc, (bit, value)| acc | (u16::from(value.value) << bit));
        assert_eq!(sum, a + b, "a = {a}, b = {b}");
    }
}

/// The package sent to the client contains ONE label per garbler input, not the pairs
#[test]
fn test_client_package_has_no_pairs() {
    let circ = new_ripple_carry_adder(2);
    let server = garble_helper(&circ, &GarbleConfig::default());
    let garbler_wires = &circ.get_inputs()[..2];
    let encoded_garbler_inputs = server
        .all_input_wire_values
        .encode(garbler_wires, &[true.into(), false.into()])
        .unwrap();

    let buf = serialize_for_evaluator(server.garbled, encoded_garbler_inputs).unwrap();
    let (_, encoded) = deserialize_for_evaluator(&buf).unwrap();

    for wire in garbler_wires {
        let pair = server.all_input_wire_values.get(wire).unwrap();
        let label = encoded.get(wire).unwrap();
        let other = if wire.id == 0 { pair.value0() } else { pair.value1() };
        assert_ne!(label.point_bit(), other.lsb());
    }
    assert!(encoded.get(&circ.get_inputs()[2]).is_none());
}
