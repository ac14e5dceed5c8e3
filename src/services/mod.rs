// src/services/mod.rs

pub mod grading;
pub mod quiz_id;
pub mod selector;
pub mod stats;
