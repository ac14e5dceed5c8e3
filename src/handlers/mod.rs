// src/handlers/mod.rs

pub mod category;
pub mod health;
pub mod quiz;
