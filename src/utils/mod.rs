// src/utils/mod.rs

pub mod rounding;
pub mod shuffle;
