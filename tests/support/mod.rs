#![allow(dead_code)]

pub mod data;
pub mod harness_env;
