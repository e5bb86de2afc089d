use serde::{Deserialize, Serialize};

use crate::garble::GarblingStrategy;

/// How `garble_circuit` garbles.
///
/// `rng_seed`: when set, garbling is reproducible: the full wire assignment of an
/// opened circuit can be re-derived from it, cf `derive_wire_values`.
/// When `None` a fresh `ChaChaRng` is seeded from the OS(`std` only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GarbleConfig {
    pub strategy: GarblingStrategy,
    /// Use `garble_parallel`; ignored without `std`
    pub parallel: bool,
    pub rng_seed: Option<[u8; 32]>,
}

impl GarbleConfig {
    #[must_use]
    pub fn with_strategy(mut self, strategy: GarblingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_rng_seed(mut self, rng_seed: [u8; 32]) -> Self {
        self.rng_seed = Some(rng_seed);
        self
    }
}
