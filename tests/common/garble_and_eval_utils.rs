use rand::Rng;
use rand_chacha::ChaChaRng;

use lib_yao_garble_rs::tests_utils::circuits::new_random_circuit;
use lib_yao_garble_rs::tests_utils::garble_and_eval_utils::{
    eval_helper, eval_plain_helper, garble_helper, Garbled,
};
use lib_yao_garble_rs::{Circuit, GarbleConfig};

pub fn random_inputs(rng: &mut ChaChaRng, nb_inputs: usize) -> Vec<bool> {
    (0..nb_inputs).map(|_| rng.gen_bool(0.5)).collect()
}

/// A random circuit of random size; small enough to loop on many of them
pub fn random_circuit(rng: &mut ChaChaRng) -> Circuit {
    let nb_inputs = rng.gen_range(1..8);
    let nb_gates = rng.gen_range(1..64);
    let nb_outputs = rng.gen_range(1..=nb_gates.min(8));

    new_random_circuit(rng, nb_inputs, nb_gates, nb_outputs)
}

/// Garble `circ`, then check garbled evaluation == plaintext evaluation on `nb_evals` random inputs
pub fn check_garbled_matches_plain(
    rng: &mut ChaChaRng,
    circ: &Circuit,
    config: &GarbleConfig,
    nb_evals: usize,
) -> Garbled {
    let garbled = garble_helper(circ, config);

    for _ in 0..nb_evals {
        let inputs = random_inputs(rng, circ.get_nb_inputs());
        assert_eq!(
            eval_helper(&garbled, &inputs),
            eval_plain_helper(circ, &inputs),
            "inputs: {inputs:?}"
        );
    }

    garbled
}
