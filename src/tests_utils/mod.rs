//! Helpers shared by the unit tests, the integration tests and the benches.
//! NOT part of the public API.

pub mod circuits;
pub mod garble_and_eval_utils;
