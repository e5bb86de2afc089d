#![allow(dead_code)]

pub mod garble_and_eval_utils;
